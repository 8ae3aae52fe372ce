//! Site configuration (site.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Site configuration, loaded from `site.yml` at the site root.
///
/// Every field has a default so the file may be absent or partial. All
/// directories are resolved relative to the site base directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title, exposed to templates as `site_title`
    pub title: String,

    /// Directory holding `pages/` and `blog/` content
    pub content_dir: String,

    /// Directory holding the named template files
    pub template_dir: String,

    /// Directory of static assets copied verbatim to the output root
    pub static_dir: String,

    /// Output directory, fully rebuilt on every run
    pub output_dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Site".to_string(),
            content_dir: "content".to_string(),
            template_dir: "templates".to_string(),
            static_dir: "static".to_string(),
            output_dir: "dist".to_string(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SiteConfig::default();
        assert_eq!(config.content_dir, "content");
        assert_eq!(config.output_dir, "dist");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.yml");
        fs::write(&path, "title: Demo Blog\noutput_dir: public\n").unwrap();

        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.title, "Demo Blog");
        assert_eq!(config.output_dir, "public");
        assert_eq!(config.template_dir, "templates");
    }
}
