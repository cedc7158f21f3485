//! Media classification for image and anchor nodes.

use serde::{Deserialize, Serialize};

use crate::dom::{ContentTree, NodeId};
use crate::error::Result;
use crate::layout::WidthResolver;
use crate::links::LinkType;

/// Class marking an image (or an anchor's child) as a video thumbnail.
pub const VIDEO_THUMBNAIL_CLASS: &str = "video-thumbnail";

/// How an image node should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageKind {
    PlainImage,
    VideoThumbnail,
    TableImage,
}

/// Rendering parameters for one image node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderDecision {
    pub kind: ImageKind,
    pub resolved_width: f32,
    /// The image's direct parent is an anchor. Image taps are suppressed so
    /// the anchor handles the press.
    pub is_anchored: bool,
}

/// Check whether the image carries the video-thumbnail marker.
pub fn is_video_thumbnail(tree: &ContentTree, node: NodeId) -> bool {
    tree.has_class(node, VIDEO_THUMBNAIL_CLASS)
}

/// Check whether the node's direct parent is an anchor.
pub fn is_anchored(tree: &ContentTree, node: NodeId) -> bool {
    tree.parent(node).is_some_and(|p| tree.is_tag(p, "a"))
}

/// A video anchor with no thumbnail child of its own.
///
/// These render as a generic play control instead of their content.
pub fn is_bare_video_anchor(tree: &ContentTree, node: NodeId) -> bool {
    let video_class = LinkType::VideoLink.class_name().unwrap_or("markdown-video-link");
    tree.has_class(node, video_class)
        && !tree
            .children(node)
            .any(|child| tree.has_class(child, VIDEO_THUMBNAIL_CLASS))
}

/// Classify an image node and resolve its width.
///
/// Video thumbnails are recognized by class alone and always get the full
/// content width. Other images take the width of their layout context and are
/// `TableImage` when that context is a table cell.
pub fn classify_image(
    tree: &ContentTree,
    node: NodeId,
    content_width: f32,
    resolver: &WidthResolver,
) -> Result<RenderDecision> {
    let anchored = is_anchored(tree, node);

    if is_video_thumbnail(tree, node) {
        return Ok(RenderDecision {
            kind: ImageKind::VideoThumbnail,
            resolved_width: content_width,
            is_anchored: anchored,
        });
    }

    let layout = resolver.resolve(tree, node, content_width)?;
    let kind = if layout.in_table_cell() {
        ImageKind::TableImage
    } else {
        ImageKind::PlainImage
    };

    tracing::debug!(?node, ?kind, width = layout.width, "classified image");
    Ok(RenderDecision {
        kind,
        resolved_width: layout.width,
        is_anchored: anchored,
    })
}
