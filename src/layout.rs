//! Available-width resolution for embedded media.
//!
//! Images inside a table cell share the row with their sibling cells, so they
//! get an equal slice of the content width. Everything else gets the full
//! width.

use crate::dom::{ContentTree, NodeId};
use crate::error::{Error, Result};

/// Tag of the document root container.
const ROOT_CONTAINER: &str = "body";

/// Tag of a table cell.
const TABLE_CELL: &str = "td";

/// Result of walking a node's ancestors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Width available to the node, in logical pixels.
    pub width: f32,
    /// The table cell the walk stopped at, if any.
    pub table_cell: Option<NodeId>,
}

impl Layout {
    /// Whether the node sits in a table-cell context.
    pub fn in_table_cell(&self) -> bool {
        self.table_cell.is_some()
    }
}

/// Walks ancestors to find the width a node may occupy.
///
/// Without an explicit cap the walk is bounded by the tree's node count, the
/// longest ancestor chain an acyclic tree can have. Only a cycle exceeds it.
#[derive(Debug, Clone, Copy, Default)]
pub struct WidthResolver {
    max_depth: Option<usize>,
}

impl WidthResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the walk at `max_depth` ancestors, or at the tree size for `None`.
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Resolve the layout of `node` within `content_width`.
    ///
    /// The walk moves up one parent at a time:
    /// - no parent, or the parent is `body` or the document: full width
    /// - the parent is a `td`: `content_width` divided by the number of
    ///   cells in that row (nested tables are not subdivided further)
    /// - otherwise: continue from the parent
    ///
    /// A row with no element children is a broken tree and reported as
    /// [`Error::EmptyTableRow`].
    pub fn resolve(&self, tree: &ContentTree, node: NodeId, content_width: f32) -> Result<Layout> {
        if tree.get(node).is_none() {
            return Err(Error::UnknownNode(node));
        }

        let full = Layout {
            width: content_width,
            table_cell: None,
        };

        let limit = self.max_depth.unwrap_or_else(|| tree.len());
        let mut current = node;
        for _ in 0..limit {
            let Some(parent) = tree.parent(current) else {
                return Ok(full);
            };

            if tree.is_document(parent) || tree.is_tag(parent, ROOT_CONTAINER) {
                return Ok(full);
            }

            if tree.is_tag(parent, TABLE_CELL) {
                let columns = tree
                    .parent(parent)
                    .map(|row| tree.element_children(row).count())
                    .unwrap_or(0);
                if columns == 0 {
                    return Err(Error::EmptyTableRow { cell: parent });
                }
                let width = content_width / columns as f32;
                tracing::trace!(?node, columns, width, "table cell width");
                return Ok(Layout {
                    width,
                    table_cell: Some(parent),
                });
            }

            current = parent;
        }

        Err(Error::DepthLimitExceeded { node, limit })
    }
}

/// Resolve the width available to `node`.
pub fn resolve_width(tree: &ContentTree, node: NodeId, content_width: f32) -> Result<f32> {
    WidthResolver::default()
        .resolve(tree, node, content_width)
        .map(|layout| layout.width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Attribute, parse_body};
    use proptest::prelude::*;

    fn first_img(tree: &ContentTree) -> NodeId {
        tree.find_by_tag("img").expect("should find img")
    }

    #[test]
    fn test_full_width_outside_table() {
        let tree = parse_body(r#"<div><p><img src="a.png"></p></div>"#);
        assert_eq!(resolve_width(&tree, first_img(&tree), 360.0).unwrap(), 360.0);
    }

    #[test]
    fn test_three_column_row() {
        let tree = parse_body(
            r#"<table><tr><td><img src="a.png"></td><td>b</td><td>c</td></tr></table>"#,
        );
        let layout = WidthResolver::default()
            .resolve(&tree, first_img(&tree), 300.0)
            .unwrap();
        assert_eq!(layout.width, 100.0);
        assert!(layout.in_table_cell());
    }

    #[test]
    fn test_whitespace_between_cells_is_not_a_column() {
        let tree = parse_body(
            "<table>\n<tr>\n  <td><img src=\"a.png\"></td>\n  <td>b</td>\n</tr>\n</table>",
        );
        assert_eq!(resolve_width(&tree, first_img(&tree), 300.0).unwrap(), 150.0);
    }

    #[test]
    fn test_deep_nesting_inside_cell() {
        let tree = parse_body(
            r#"<table><tr><td><div><a href="x"><img src="a.png"></a></div></td><td></td></tr></table>"#,
        );
        assert_eq!(resolve_width(&tree, first_img(&tree), 400.0).unwrap(), 200.0);
    }

    #[test]
    fn test_nested_tables_use_innermost_cell_only() {
        let tree = parse_body(
            r#"<table><tr><td>
                <table><tr><td><img src="a.png"></td><td></td><td></td><td></td></tr></table>
            </td><td></td></tr></table>"#,
        );
        assert_eq!(resolve_width(&tree, first_img(&tree), 400.0).unwrap(), 100.0);
    }

    #[test]
    fn test_detached_node_gets_full_width() {
        let mut tree = ContentTree::new();
        let img = tree.create_element("img", vec![Attribute::new("src", "a.png")]);
        assert_eq!(resolve_width(&tree, img, 320.0).unwrap(), 320.0);
    }

    #[test]
    fn test_cell_without_row_is_an_error() {
        let mut tree = ContentTree::new();
        let td = tree.create_element("td", vec![]);
        let img = tree.create_element("img", vec![]);
        tree.append(td, img);

        let err = resolve_width(&tree, img, 300.0).unwrap_err();
        assert!(matches!(err, Error::EmptyTableRow { cell } if cell == td));
    }

    #[test]
    fn test_depth_limit() {
        let mut tree = ContentTree::new();
        let mut parent = tree.document();
        for _ in 0..10 {
            let div = tree.create_element("div", vec![]);
            tree.append(parent, div);
            parent = div;
        }
        let img = tree.create_element("img", vec![]);
        tree.append(parent, img);

        let capped = |depth| WidthResolver::new().with_max_depth(Some(depth));
        let err = capped(4).resolve(&tree, img, 300.0).unwrap_err();
        assert!(matches!(err, Error::DepthLimitExceeded { limit: 4, .. }));
        assert!(capped(16).resolve(&tree, img, 300.0).is_ok());
    }

    #[test]
    fn test_deeply_nested_body_gets_full_width() {
        let body = format!(
            "{}<img src=\"a.png\">{}",
            "<blockquote>".repeat(300),
            "</blockquote>".repeat(300)
        );
        let tree = parse_body(&body);
        assert_eq!(resolve_width(&tree, first_img(&tree), 360.0).unwrap(), 360.0);
    }

    #[test]
    fn test_unknown_node() {
        let tree = ContentTree::new();
        let err = resolve_width(&tree, NodeId(99), 300.0).unwrap_err();
        assert!(matches!(err, Error::UnknownNode(NodeId(99))));
    }

    proptest! {
        #[test]
        fn prop_cell_width_divides_by_column_count(
            columns in 1usize..12,
            target in 0usize..12,
            width in 1.0f32..2000.0,
        ) {
            let target = target % columns;
            let mut tree = ContentTree::new();
            let table = tree.create_element("table", vec![]);
            let row = tree.create_element("tr", vec![]);
            tree.append(tree.document(), table);
            tree.append(table, row);

            let mut img = None;
            for col in 0..columns {
                let td = tree.create_element("td", vec![]);
                tree.append(row, td);
                if col == target {
                    let node = tree.create_element("img", vec![]);
                    tree.append(td, node);
                    img = Some(node);
                }
            }

            let resolved = resolve_width(&tree, img.unwrap(), width).unwrap();
            prop_assert_eq!(resolved, width / columns as f32);
            prop_assert!(resolved <= width);
        }
    }
}
