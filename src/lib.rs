//! # postrender
//!
//! Node classification, layout width resolution and tap dispatch for the
//! rich-text bodies of blog posts and comments.
//!
//! The HTML is parsed by html5ever into an arena [`ContentTree`]; this crate
//! decides, per node, which renderer applies and with what parameters, and
//! turns taps on links into calls on a host-supplied [`HostCallbacks`].
//!
//! ## Features
//!
//! - Typed link descriptors decoded from `markdown-*-link` anchors
//! - Image classification (plain, table-embedded, video thumbnail)
//! - Column-aware width resolution for images inside tables
//! - Fire-and-forget dispatch that contains failing callbacks
//! - A serializable render configuration and per-body render plan
//!
//! ## Quick Start
//!
//! ```
//! use postrender::{HostCallbacks, RenderConfig, RenderOptions, parse_body};
//! use postrender::dispatch::CallbackResult;
//!
//! struct Screen;
//!
//! impl HostCallbacks for Screen {
//!     fn open_profile(&mut self, username: &str) -> CallbackResult {
//!         println!("navigate to @{username}");
//!         Ok(())
//!     }
//! }
//!
//! let tree = parse_body(r#"<p><a class="markdown-author-link" data-author="alice">@alice</a></p>"#);
//! let config = RenderConfig::new(&RenderOptions::default()).unwrap();
//!
//! let anchor = tree.find_by_tag("a").unwrap();
//! config.on_anchor_press(&tree, anchor, &mut Screen);
//! ```

pub mod classify;
pub mod dispatch;
pub mod dom;
pub mod error;
pub mod layout;
pub mod links;
pub mod options;
pub mod render;

pub use classify::{ImageKind, RenderDecision, classify_image, is_bare_video_anchor};
pub use dispatch::{HostCallbacks, Route, dispatch, route};
pub use dom::{ContentTree, NodeId, parse_body};
pub use error::{CallbackError, Error, Result};
pub use layout::{Layout, WidthResolver, resolve_width};
pub use links::{LinkData, LinkParser, LinkType, parse_link_data};
pub use options::RenderOptions;
pub use render::{RenderConfig, RenderInstruction, RenderPlan, Style};
