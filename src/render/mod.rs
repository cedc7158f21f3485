//! Render configuration for the HTML rendering engine.
//!
//! A [`RenderConfig`] is assembled once per content width and bundles
//! everything the engine needs from us:
//!
//! - the style maps (base, per tag, per class)
//! - renderer overrides for `img`, `a` and `p` ([`RenderConfig::render`])
//! - a node visitor called once per element ([`RenderConfig::on_element`])
//! - tap handlers for anchors and images
//!
//! None of these keep state between calls; each entry point may be invoked in
//! any order and any number of times.
//!
//! # Example
//!
//! ```
//! use postrender::{RenderConfig, RenderOptions, parse_body};
//!
//! let tree = parse_body(r#"<table><tr><td><img src="a.png"></td><td></td></tr></table>"#);
//! let config = RenderConfig::new(&RenderOptions::default().with_content_width(300.0)).unwrap();
//! let plan = config.plan(&tree).unwrap();
//!
//! assert_eq!(plan.images, vec!["a.png".to_string()]);
//! ```

mod styles;

pub use styles::{STYLED_CLASSES, STYLED_TAGS, Style, StyleOverrides, Stylesheet, TextAlign};

use std::collections::BTreeMap;

use serde::Serialize;

use crate::classify::{self, ImageKind, RenderDecision};
use crate::dispatch::{self, HostCallbacks, Route};
use crate::dom::{ContentTree, NodeId};
use crate::error::Result;
use crate::layout::WidthResolver;
use crate::links::{LinkData, LinkParser};
use crate::options::RenderOptions;

/// Tags whose renderer is overridden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverriddenTag {
    Img,
    A,
    P,
}

impl OverriddenTag {
    pub const ALL: [OverriddenTag; 3] = [OverriddenTag::Img, OverriddenTag::A, OverriddenTag::P];

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "img" => Some(Self::Img),
            "a" => Some(Self::A),
            "p" => Some(Self::P),
            _ => None,
        }
    }
}

/// What an overridden renderer should draw for one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "renderer", rename_all = "camelCase")]
pub enum RenderInstruction {
    /// An image sized to its width, keeping its aspect ratio.
    #[serde(rename_all = "camelCase")]
    AutoHeightImage {
        url: String,
        decision: RenderDecision,
    },
    /// A video play control. `uri` is the thumbnail, when the body has one.
    #[serde(rename_all = "camelCase")]
    VideoThumb { uri: Option<String>, width: f32 },
    /// The engine's own anchor renderer, with a press handler attached.
    Anchor { link: LinkData },
    /// The engine's own paragraph renderer with a replaced style.
    #[serde(rename_all = "camelCase")]
    Paragraph { in_list_item: bool, style: Style },
}

/// Configuration handed to the rendering engine.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    pub content_width: f32,
    pub base_style: Style,
    pub tags_styles: BTreeMap<String, Style>,
    pub classes_styles: BTreeMap<String, Style>,
    pub renderers: Vec<OverriddenTag>,
    #[serde(skip)]
    paragraph_in_list: Style,
    #[serde(skip)]
    resolver: WidthResolver,
    #[serde(skip)]
    links: LinkParser,
}

impl RenderConfig {
    /// Assemble the configuration for the given options.
    pub fn new(options: &RenderOptions) -> Result<Self> {
        options.validate()?;
        let width = options.content_width;
        let sheet = Stylesheet::default().with_overrides(&options.styles);

        let mut tags_styles = sheet.tags;
        // Without an explicit width, rows inside centered blocks collapse to
        // zero width.
        if let Some(tr) = tags_styles.get_mut("tr") {
            *tr = tr.clone().with_width(width);
        }

        tracing::debug!(content_width = width, "assembled render config");
        Ok(Self {
            content_width: width,
            base_style: sheet.base.with_width(width),
            tags_styles,
            classes_styles: sheet.classes,
            renderers: OverriddenTag::ALL.to_vec(),
            paragraph_in_list: sheet.paragraph_in_list,
            resolver: WidthResolver::new().with_max_depth(options.max_depth),
            links: LinkParser::new().with_bare_anchors_as_external(options.bare_anchors_as_external),
        })
    }

    /// The overridden renderer for `node`.
    ///
    /// Returns `None` for nodes the engine renders with its defaults.
    pub fn render(&self, tree: &ContentTree, node: NodeId) -> Result<Option<RenderInstruction>> {
        let Some(tag) = tree.tag(node).and_then(OverriddenTag::from_tag) else {
            return Ok(None);
        };

        let instruction = match tag {
            OverriddenTag::Img => self.render_image(tree, node)?,
            OverriddenTag::A => self.render_anchor(tree, node),
            OverriddenTag::P => self.render_paragraph(tree, node),
        };
        Ok(Some(instruction))
    }

    fn render_image(&self, tree: &ContentTree, node: NodeId) -> Result<RenderInstruction> {
        let url = tree.attr(node, "src").unwrap_or_default().to_string();
        let decision = classify::classify_image(tree, node, self.content_width, &self.resolver)?;

        Ok(match decision.kind {
            ImageKind::VideoThumbnail => RenderInstruction::VideoThumb {
                uri: Some(url),
                width: self.content_width,
            },
            ImageKind::PlainImage | ImageKind::TableImage => {
                RenderInstruction::AutoHeightImage { url, decision }
            }
        })
    }

    fn render_anchor(&self, tree: &ContentTree, node: NodeId) -> RenderInstruction {
        if classify::is_bare_video_anchor(tree, node) {
            return RenderInstruction::VideoThumb {
                uri: None,
                width: self.content_width,
            };
        }
        RenderInstruction::Anchor {
            link: self.links.parse(tree, node),
        }
    }

    fn render_paragraph(&self, tree: &ContentTree, node: NodeId) -> RenderInstruction {
        // Paragraph margins misalign list bullets.
        let in_list_item = tree.parent(node).is_some_and(|p| tree.is_tag(p, "li"));
        let style = if in_list_item {
            self.paragraph_in_list.clone()
        } else {
            self.tags_styles.get("p").cloned().unwrap_or_default()
        };
        RenderInstruction::Paragraph {
            in_list_item,
            style,
        }
    }

    /// Node visitor: reports every `img` element with a `src` to the host.
    pub fn on_element(&self, tree: &ContentTree, node: NodeId, callbacks: &mut dyn HostCallbacks) {
        if !tree.is_tag(node, "img") {
            return;
        }
        let Some(url) = tree.attr(node, "src").filter(|s| !s.is_empty()) else {
            return;
        };
        tracing::trace!(%url, "img element detected");
        if let Err(e) = dispatch::guarded(|| callbacks.element_is_image(url)) {
            tracing::warn!(%url, error = %e, "image notifier failed");
        }
    }

    /// Tap on an anchor: parse its current attributes and dispatch.
    ///
    /// Returns the route taken, if any. Callback failures are logged and
    /// dropped.
    pub fn on_anchor_press(
        &self,
        tree: &ContentTree,
        node: NodeId,
        callbacks: &mut dyn HostCallbacks,
    ) -> Option<Route> {
        dispatch::dispatch(&self.links.parse(tree, node), callbacks)
    }

    /// Tap on an image: open it in the viewer.
    ///
    /// Anchored images leave the press to their anchor, and video thumbnails
    /// render as a play control with no press handler.
    pub fn on_image_press(&self, tree: &ContentTree, node: NodeId, callbacks: &mut dyn HostCallbacks) {
        if classify::is_anchored(tree, node) || classify::is_video_thumbnail(tree, node) {
            return;
        }
        let Some(url) = tree.attr(node, "src") else {
            return;
        };
        if let Err(e) = dispatch::guarded(|| callbacks.open_image(url)) {
            tracing::warn!(%url, error = %e, "image callback failed");
        }
    }

    /// Walk the whole tree the way the engine would.
    ///
    /// Fails only when the tree breaks a structural contract (see
    /// [`Error`](crate::Error)).
    pub fn plan(&self, tree: &ContentTree) -> Result<RenderPlan> {
        let mut collector = ImageCollector::default();
        let mut nodes = Vec::new();

        for node in tree.descendants(tree.document()) {
            if !tree.is_element(node) {
                continue;
            }
            self.on_element(tree, node, &mut collector);
            if let Some(instruction) = self.render(tree, node)? {
                nodes.push(PlannedNode { node, instruction });
            }
        }

        Ok(RenderPlan {
            content_width: self.content_width,
            nodes,
            images: collector.urls,
        })
    }
}

/// One overridden node in a [`RenderPlan`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedNode {
    pub node: NodeId,
    #[serde(flatten)]
    pub instruction: RenderInstruction,
}

/// Every renderer decision for a body, in document order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPlan {
    pub content_width: f32,
    pub nodes: Vec<PlannedNode>,
    /// Image URLs reported by the node visitor.
    pub images: Vec<String>,
}

#[derive(Default)]
struct ImageCollector {
    urls: Vec<String>,
}

impl HostCallbacks for ImageCollector {
    fn element_is_image(&mut self, url: &str) -> dispatch::CallbackResult {
        self.urls.push(url.to_string());
        Ok(())
    }
}
