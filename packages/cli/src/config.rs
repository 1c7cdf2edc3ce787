use mindmap_editor::EditorConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "mindmap.config.json";

/// Mind-map configuration file format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Settings handed to the editor
    #[serde(flatten)]
    pub editor: EditorConfig,

    /// Recompute positions after replayed actions
    #[serde(default)]
    pub auto_layout: bool,
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "sectionCount": 2,
            "defaultText": "Idea",
            "maxDepth": 6,
            "autoLayout": true,
            "layout": { "canvasWidth": 800 }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.editor.section_count, 2);
        assert_eq!(config.editor.default_text, "Idea");
        assert_eq!(config.editor.max_depth, 6);
        assert_eq!(config.editor.history_limit, 100);
        assert_eq!(config.editor.layout.canvas_width, 800.0);
        assert!(config.auto_layout);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.editor, EditorConfig::default());
        assert!(!config.auto_layout);
    }

    #[test]
    fn test_load_missing_config_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().display().to_string()).unwrap();
        assert_eq!(config.editor.max_depth, 10);
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{ "historyLimit": 5 }"#).unwrap();

        let config = Config::load(&dir.path().display().to_string()).unwrap();
        assert_eq!(config.editor.history_limit, 5);
    }
}
