//! sitegen: a small static site generator
//!
//! Reads Markdown content with front-matter from a content directory,
//! renders it through plain-text placeholder templates, and writes a tree
//! of static HTML plus copied assets. Every run is a full rebuild; the
//! output directory is cleared first, so concurrent builds against the same
//! output are not supported.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod template;

use anyhow::Result;
use std::path::Path;

/// A site rooted at a base directory, with all paths resolved from its
/// configuration. This is the explicit configuration handed to every
/// component; there is no global state.
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Content directory (holds pages/ and blog/)
    pub content_dir: std::path::PathBuf,
    /// Template directory
    pub template_dir: std::path::PathBuf,
    /// Static assets directory
    pub static_dir: std::path::PathBuf,
    /// Output directory
    pub output_dir: std::path::PathBuf,
}

impl Site {
    /// Create a new Site from a base directory, loading `site.yml` if
    /// present.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("site.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);
        let template_dir = base_dir.join(&config.template_dir);
        let static_dir = base_dir.join(&config.static_dir);
        let output_dir = base_dir.join(&config.output_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
            template_dir,
            static_dir,
            output_dir,
        })
    }

    /// The pages content directory.
    pub fn pages_dir(&self) -> std::path::PathBuf {
        self.content_dir.join("pages")
    }

    /// The blog content directory.
    pub fn blog_dir(&self) -> std::path::PathBuf {
        self.content_dir.join("blog")
    }

    /// Build the static site.
    pub fn build(&self) -> Result<()> {
        commands::build::run(self)
    }

    /// Delete the output directory.
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
