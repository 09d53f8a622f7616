//! Wiki configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main wiki configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiConfig {
    /// Heading of the table of contents
    pub title: String,

    // Server
    pub ip: String,
    pub port: u16,
    /// Largest accepted request body, uploads included
    pub upload_limit: usize,

    // Directory
    pub pages_dir: String,
    pub images_dir: String,
    pub templates_dir: Option<String>,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            title: "Quick and Simple Wiki".to_string(),

            ip: "0.0.0.0".to_string(),
            port: 8099,
            upload_limit: 32 << 20,

            pages_dir: ".".to_string(),
            images_dir: "images".to_string(),
            templates_dir: None,
        }
    }
}

impl WikiConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: WikiConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WikiConfig::default();
        assert_eq!(config.port, 8099);
        assert_eq!(config.pages_dir, ".");
        assert_eq!(config.images_dir, "images");
        assert_eq!(config.upload_limit, 32 * 1024 * 1024);
        assert!(config.templates_dir.is_none());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Notes
port: 9000
pages_dir: pages
templates_dir: tpl
"#;
        let config: WikiConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Notes");
        assert_eq!(config.port, 9000);
        assert_eq!(config.pages_dir, "pages");
        assert_eq!(config.images_dir, "images");
        assert_eq!(config.templates_dir.as_deref(), Some("tpl"));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(WikiConfig::load("/nonexistent/_config.yml").is_err());
    }
}
