//! Parsed content trees for post and comment bodies.
//!
//! The HTML itself is parsed by html5ever; this module only owns the arena the
//! parser writes into and the small amount of body preprocessing done before
//! parsing.

mod arena;
mod tree_sink;

pub use arena::{Attribute, ChildrenIter, ContentNode, ContentTree, Descendants, NodeData, NodeId};
pub use tree_sink::ContentSink;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

/// Rewrite legacy markup the renderer has no style for.
///
/// `<center>` becomes `<div class="text-center">` so the `text-center` class
/// style picks it up.
pub fn preprocess_body(body: &str) -> String {
    body.replace("<center>", r#"<div class="text-center">"#)
        .replace("</center>", "</div>")
}

/// Parse a post or comment body into a content tree.
///
/// The body is preprocessed with [`preprocess_body`] first. Parsing is lenient:
/// malformed markup is repaired the way a browser would repair it.
pub fn parse_body(body: &str) -> ContentTree {
    let body = preprocess_body(body);
    let tree = parse_document(ContentSink::new(), ParseOpts::default())
        .from_utf8()
        .one(body.as_bytes())
        .into_tree();
    tracing::debug!(nodes = tree.len(), "parsed content body");
    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_is_rewritten() {
        assert_eq!(
            preprocess_body("<center><img src=\"x.png\"></center>"),
            r#"<div class="text-center"><img src="x.png"></div>"#
        );
    }

    #[test]
    fn test_parse_body_applies_preprocessing() {
        let tree = parse_body("<center>hi</center>");
        let div = tree.find_by_tag("div").expect("center should become div");
        assert!(tree.has_class(div, "text-center"));
        assert!(tree.find_by_tag("center").is_none());
    }
}
