//! Editor configuration.
//!
//! Passed explicitly into the reducer so element construction never reads
//! ambient state.

use mindmap_tree::Direction;
use serde::{Deserialize, Serialize};

/// Default maximum depth a drop target may have
pub const DEFAULT_MAX_DEPTH: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Number of text sections given to new elements
    #[serde(default = "default_section_count")]
    pub section_count: usize,

    /// Text placed in the first section of new elements
    #[serde(default = "default_text")]
    pub default_text: String,

    /// Direction given to first-level elements
    #[serde(default = "default_direction")]
    pub default_direction: Direction,

    /// Drops onto targets at or beyond this depth are rejected
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Maximum undo levels kept (0 = unlimited)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    #[serde(default)]
    pub layout: LayoutConfig,
}

/// Inputs handed to the layout collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    #[serde(default = "default_zoom_ratio")]
    pub zoom_ratio: f64,
    #[serde(default = "default_canvas_width")]
    pub canvas_width: f64,
    #[serde(default = "default_canvas_height")]
    pub canvas_height: f64,
}

fn default_section_count() -> usize {
    1
}

fn default_text() -> String {
    "New Node".to_string()
}

fn default_direction() -> Direction {
    Direction::Right
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

fn default_history_limit() -> usize {
    100
}

fn default_zoom_ratio() -> f64 {
    1.0
}

fn default_canvas_width() -> f64 {
    1920.0
}

fn default_canvas_height() -> f64 {
    1080.0
}

impl EditorConfig {
    pub fn from_json_str(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }

    /// Text sections for a freshly created element
    pub fn new_texts(&self) -> Vec<String> {
        let count = self.section_count.max(1);
        let mut texts = vec![String::new(); count];
        texts[0] = self.default_text.clone();
        texts
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            section_count: default_section_count(),
            default_text: default_text(),
            default_direction: default_direction(),
            max_depth: default_max_depth(),
            history_limit: default_history_limit(),
            layout: LayoutConfig::default(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            zoom_ratio: default_zoom_ratio(),
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let config = EditorConfig::from_json_str(
            r#"{
                "sectionCount": 3,
                "layout": { "zoomRatio": 2.0 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.section_count, 3);
        assert_eq!(config.max_depth, 10);
        assert_eq!(config.layout.zoom_ratio, 2.0);
        assert_eq!(config.layout.canvas_width, 1920.0);
    }

    #[test]
    fn test_empty_config_matches_default() {
        let config = EditorConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_new_texts_fill_sections() {
        let config = EditorConfig {
            section_count: 2,
            ..Default::default()
        };
        assert_eq!(config.new_texts(), vec!["New Node".to_string(), String::new()]);
    }
}
