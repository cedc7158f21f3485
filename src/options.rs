//! Render options.
//!
//! Options are read from JSON. Every field has a default, so an empty object
//! is a valid options file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::render::StyleOverrides;

/// Width used when the host has not measured its container yet.
pub const DEFAULT_CONTENT_WIDTH: f32 = 360.0;

/// Options for assembling a [`RenderConfig`](crate::RenderConfig).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Available rendering width in logical pixels.
    pub content_width: f32,
    /// Cap on the ancestor walk during width resolution. Unset means the
    /// tree's node count.
    pub max_depth: Option<usize>,
    /// Treat anchors with an `href` but no recognized class as external links.
    pub bare_anchors_as_external: bool,
    pub styles: StyleOverrides,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            content_width: DEFAULT_CONTENT_WIDTH,
            max_depth: None,
            bare_anchors_as_external: false,
            styles: StyleOverrides::default(),
        }
    }
}

impl RenderOptions {
    /// Parse options from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: RenderOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "loading render options");
        Self::from_json(&json)
    }

    pub fn with_content_width(mut self, width: f32) -> Self {
        self.content_width = width;
        self
    }

    /// Check the options describe a usable layout.
    pub fn validate(&self) -> Result<()> {
        if !self.content_width.is_finite() || self.content_width <= 0.0 {
            return Err(Error::InvalidContentWidth(self.content_width));
        }
        if self.max_depth == Some(0) {
            return Err(Error::InvalidOption("max_depth must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let options = RenderOptions::from_json("{}").unwrap();
        assert_eq!(options, RenderOptions::default());
    }

    #[test]
    fn test_partial_options() {
        let options = RenderOptions::from_json(
            r#"{
                "content_width": 414,
                "bare_anchors_as_external": true,
                "styles": { "tags": { "p": { "marginTop": 2 } } }
            }"#,
        )
        .unwrap();
        assert_eq!(options.content_width, 414.0);
        assert!(options.bare_anchors_as_external);
        assert_eq!(options.max_depth, None);
        assert_eq!(options.styles.tags["p"].margin_top, Some(2.0));
    }

    #[test]
    fn test_rejects_non_positive_width() {
        let err = RenderOptions::from_json(r#"{"content_width": 0}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidContentWidth(_)));

        let err = RenderOptions::default()
            .with_content_width(f32::NAN)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidContentWidth(_)));
    }

    #[test]
    fn test_rejects_zero_depth() {
        let err = RenderOptions::from_json(r#"{"max_depth": 0}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidOption(_)));

        let options = RenderOptions::from_json(r#"{"max_depth": 64}"#).unwrap();
        assert_eq!(options.max_depth, Some(64));
    }

    #[test]
    fn test_malformed_json() {
        let err = RenderOptions::from_json("{ content_width: ").unwrap_err();
        assert!(matches!(err, Error::Options(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        std::fs::write(&path, r#"{"content_width": 320}"#).unwrap();
        assert_eq!(RenderOptions::load(&path).unwrap().content_width, 320.0);

        let err = RenderOptions::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
