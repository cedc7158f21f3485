//! Style sheet handed to the rendering engine.
//!
//! Styles are plain declarations the engine applies as-is; nothing here
//! cascades. Hosts adjust them through [`StyleOverrides`] in the render
//! options.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Tags with an entry in the tag style map.
pub const STYLED_TAGS: [&str; 11] = [
    "body",
    "a",
    "img",
    "th",
    "tr",
    "td",
    "blockquote",
    "code",
    "li",
    "p",
    "table",
];

/// Classes with an entry in the class style map.
pub const STYLED_CLASSES: [&str; 3] = ["phishy", "text-justify", "text-center"];

/// Text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

/// A flat set of style declarations.
///
/// Unset properties are left to the engine's defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_top: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_bottom: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_left: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_left_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
}

macro_rules! merge_fields {
    ($dst:ident, $src:ident, $($field:ident),+ $(,)?) => {
        $(
            if $src.$field.is_some() {
                $dst.$field = $src.$field.clone();
            }
        )+
    };
}

impl Style {
    /// Apply every property set in `other` on top of `self`.
    pub fn merged(&self, other: &Style) -> Style {
        let mut out = self.clone();
        merge_fields!(
            out,
            other,
            color,
            background_color,
            font_size,
            font_family,
            font_weight,
            line_height,
            text_align,
            margin_top,
            margin_bottom,
            margin_left,
            padding,
            border_width,
            border_left_width,
            border_color,
            width,
        );
        out
    }

    pub fn with_width(mut self, width: f32) -> Style {
        self.width = Some(width);
        self
    }
}

/// User-supplied adjustments to the default style sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleOverrides {
    pub base: Option<Style>,
    pub tags: BTreeMap<String, Style>,
    pub classes: BTreeMap<String, Style>,
}

/// The complete style sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stylesheet {
    pub base: Style,
    pub tags: BTreeMap<String, Style>,
    pub classes: BTreeMap<String, Style>,
    /// Paragraph style used directly inside a list item.
    pub paragraph_in_list: Style,
}

impl Default for Stylesheet {
    fn default() -> Self {
        let text = |s: &str| Some(s.to_string());

        let mut tags = BTreeMap::new();
        tags.insert("body".to_string(), Style::default());
        tags.insert(
            "a".to_string(),
            Style {
                color: text("#357ce6"),
                ..Style::default()
            },
        );
        tags.insert(
            "img".to_string(),
            Style {
                margin_top: Some(8.0),
                margin_bottom: Some(8.0),
                ..Style::default()
            },
        );
        tags.insert(
            "th".to_string(),
            Style {
                padding: Some(8.0),
                font_weight: text("bold"),
                ..Style::default()
            },
        );
        tags.insert("tr".to_string(), Style::default());
        tags.insert(
            "td".to_string(),
            Style {
                padding: Some(8.0),
                border_width: Some(0.5),
                border_color: text("#e7e7e7"),
                ..Style::default()
            },
        );
        tags.insert(
            "blockquote".to_string(),
            Style {
                border_left_width: Some(5.0),
                border_color: text("#c1c5c7"),
                margin_left: Some(0.0),
                padding: Some(8.0),
                ..Style::default()
            },
        );
        tags.insert(
            "code".to_string(),
            Style {
                background_color: text("#f5f5f5"),
                font_family: text("monospace"),
                ..Style::default()
            },
        );
        tags.insert(
            "li".to_string(),
            Style {
                margin_bottom: Some(12.0),
                ..Style::default()
            },
        );
        tags.insert(
            "p".to_string(),
            Style {
                margin_top: Some(6.0),
                margin_bottom: Some(6.0),
                ..Style::default()
            },
        );
        tags.insert(
            "table".to_string(),
            Style {
                border_width: Some(0.5),
                border_color: text("#e7e7e7"),
                ..Style::default()
            },
        );

        let mut classes = BTreeMap::new();
        classes.insert(
            "phishy".to_string(),
            Style {
                color: text("#ff1d1d"),
                ..Style::default()
            },
        );
        classes.insert(
            "text-justify".to_string(),
            Style {
                text_align: Some(TextAlign::Justify),
                ..Style::default()
            },
        );
        classes.insert(
            "text-center".to_string(),
            Style {
                text_align: Some(TextAlign::Center),
                ..Style::default()
            },
        );

        Self {
            base: Style {
                color: text("#3c4449"),
                font_size: Some(16.0),
                line_height: Some(25.0),
                ..Style::default()
            },
            tags,
            classes,
            paragraph_in_list: Style {
                margin_top: Some(0.0),
                margin_bottom: Some(0.0),
                ..Style::default()
            },
        }
    }
}

impl Stylesheet {
    /// Apply overrides on top of this sheet.
    ///
    /// Overrides for tags or classes outside the fixed key sets are dropped
    /// with a warning.
    pub fn with_overrides(mut self, overrides: &StyleOverrides) -> Stylesheet {
        if let Some(base) = &overrides.base {
            self.base = self.base.merged(base);
        }
        for (tag, style) in &overrides.tags {
            match self.tags.get_mut(tag) {
                Some(existing) => *existing = existing.merged(style),
                None => tracing::warn!(%tag, "ignoring style override for unstyled tag"),
            }
        }
        for (class, style) in &overrides.classes {
            match self.classes.get_mut(class) {
                Some(existing) => *existing = existing.merged(style),
                None => tracing::warn!(%class, "ignoring style override for unstyled class"),
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_key_sets() {
        let sheet = Stylesheet::default();
        let tags: Vec<_> = sheet.tags.keys().map(String::as_str).collect();
        let mut expected = STYLED_TAGS.to_vec();
        expected.sort();
        assert_eq!(tags, expected);

        let classes: Vec<_> = sheet.classes.keys().map(String::as_str).collect();
        let mut expected = STYLED_CLASSES.to_vec();
        expected.sort();
        assert_eq!(classes, expected);
    }

    #[test]
    fn test_paragraph_in_list_has_no_vertical_margin() {
        let sheet = Stylesheet::default();
        assert_eq!(sheet.paragraph_in_list.margin_top, Some(0.0));
        assert_eq!(sheet.paragraph_in_list.margin_bottom, Some(0.0));
        assert_ne!(sheet.tags.get("p"), Some(&sheet.paragraph_in_list));
    }

    #[test]
    fn test_merge_keeps_unset_properties() {
        let base = Style {
            color: Some("#000".into()),
            font_size: Some(14.0),
            ..Style::default()
        };
        let merged = base.merged(&Style {
            font_size: Some(18.0),
            ..Style::default()
        });
        assert_eq!(merged.color.as_deref(), Some("#000"));
        assert_eq!(merged.font_size, Some(18.0));
    }

    #[test]
    fn test_overrides_only_touch_known_keys() {
        let mut overrides = StyleOverrides::default();
        overrides.tags.insert(
            "p".into(),
            Style {
                margin_top: Some(10.0),
                ..Style::default()
            },
        );
        overrides.tags.insert("marquee".into(), Style::default());

        let sheet = Stylesheet::default().with_overrides(&overrides);
        assert_eq!(sheet.tags.get("p").unwrap().margin_top, Some(10.0));
        assert_eq!(sheet.tags.get("p").unwrap().margin_bottom, Some(6.0));
        assert!(sheet.tags.get("marquee").is_none());
    }

    #[test]
    fn test_style_json_is_camel_case() {
        let json = serde_json::to_value(Style {
            margin_top: Some(0.0),
            text_align: Some(TextAlign::Center),
            ..Style::default()
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"marginTop": 0.0, "textAlign": "center"})
        );
    }
}
