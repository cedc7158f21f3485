//! Typed link descriptors for anchors in post bodies.
//!
//! The markdown renderer that produced the post HTML tags every anchor it
//! understands with a `markdown-*-link` class and a handful of `data-*`
//! attributes. [`LinkParser::parse`] decodes those once into a [`LinkData`]
//! so the dispatcher can match on a closed [`LinkType`] instead of comparing
//! class strings at every use site.

use serde::{Deserialize, Serialize};

use crate::dom::{ContentTree, NodeId};

/// Semantic subtype of an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkType {
    External,
    AuthorLink,
    PostLink,
    TagLink,
    VideoLink,
    VideoLinkYoutube,
    WitnessesLink,
    ProposalLink,
    CommunityLink,
    Unknown,
}

impl LinkType {
    /// Class names in match precedence order.
    ///
    /// Youtube anchors also carry `markdown-video-link`, so the youtube class
    /// has to be checked first.
    pub const CLASS_PRECEDENCE: [(&'static str, LinkType); 9] = [
        ("markdown-external-link", LinkType::External),
        ("markdown-author-link", LinkType::AuthorLink),
        ("markdown-post-link", LinkType::PostLink),
        ("markdown-tag-link", LinkType::TagLink),
        ("markdown-community-link", LinkType::CommunityLink),
        ("markdown-witnesses-link", LinkType::WitnessesLink),
        ("markdown-proposal-link", LinkType::ProposalLink),
        ("markdown-video-link-youtube", LinkType::VideoLinkYoutube),
        ("markdown-video-link", LinkType::VideoLink),
    ];

    /// Resolve the link type from an element's class list.
    pub fn from_classes<S: AsRef<str>>(classes: &[S]) -> LinkType {
        Self::CLASS_PRECEDENCE
            .iter()
            .find(|(class, _)| classes.iter().any(|c| c.as_ref() == *class))
            .map(|&(_, ty)| ty)
            .unwrap_or(LinkType::Unknown)
    }

    /// The marker class for this type, if it has one.
    pub fn class_name(self) -> Option<&'static str> {
        Self::CLASS_PRECEDENCE
            .iter()
            .find(|&&(_, ty)| ty == self)
            .map(|&(class, _)| class)
    }
}

/// Structured description of a tapped anchor.
///
/// Only the fields belonging to `link_type` are populated; everything else is
/// `None`. A value is built fresh for each tap and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkData {
    #[serde(rename = "type")]
    pub link_type: LinkType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permlink: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_id: Option<String>,
    /// Seconds into the video; `None` means start from the beginning.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_href: Option<String>,
}

impl LinkData {
    /// An empty descriptor of the given type.
    pub fn new(link_type: LinkType) -> Self {
        Self {
            link_type,
            href: None,
            author: None,
            permlink: None,
            tag: None,
            filter: None,
            community: None,
            youtube_id: None,
            start_time: None,
            video_href: None,
        }
    }
}

/// Parses anchors into [`LinkData`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkParser {
    /// Treat an anchor with an `href` but no recognized class as external.
    pub bare_anchors_as_external: bool,
}

impl LinkParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bare_anchors_as_external(mut self, enabled: bool) -> Self {
        self.bare_anchors_as_external = enabled;
        self
    }

    /// Decode the anchor at `node`.
    ///
    /// Never fails: missing attributes stay `None`, a non-numeric
    /// `data-start-time` is dropped, and a node with no recognized class
    /// yields [`LinkType::Unknown`].
    pub fn parse(&self, tree: &ContentTree, node: NodeId) -> LinkData {
        let attr = |name: &str| tree.attr(node, name).map(str::to_string);

        let mut link_type = LinkType::from_classes(tree.classes(node));
        let href = attr("href").or_else(|| attr("data-href"));

        if link_type == LinkType::Unknown && self.bare_anchors_as_external && href.is_some() {
            link_type = LinkType::External;
        }

        let mut data = LinkData::new(link_type);
        data.href = href;

        match link_type {
            LinkType::AuthorLink => {
                data.author = attr("data-author");
            }
            LinkType::PostLink => {
                data.author = attr("data-author");
                data.permlink = attr("data-permlink");
                data.tag = attr("data-tag");
            }
            LinkType::TagLink => {
                data.tag = attr("data-tag");
                data.filter = attr("data-filter");
            }
            LinkType::CommunityLink => {
                data.community = attr("data-community");
                data.filter = attr("data-filter");
            }
            LinkType::VideoLink => {
                data.video_href = attr("data-video-href");
            }
            LinkType::VideoLinkYoutube => {
                data.youtube_id = attr("data-youtube-id");
                data.start_time = tree.attr(node, "data-start-time").and_then(parse_start_time);
            }
            LinkType::External
            | LinkType::WitnessesLink
            | LinkType::ProposalLink
            | LinkType::Unknown => {}
        }

        tracing::debug!(?node, ?link_type, "parsed link data");
        data
    }
}

/// Decode a start offset in whole seconds.
fn parse_start_time(raw: &str) -> Option<u32> {
    raw.trim().parse().ok()
}

/// Parse `node` with the default [`LinkParser`].
pub fn parse_link_data(tree: &ContentTree, node: NodeId) -> LinkData {
    LinkParser::default().parse(tree, node)
}
