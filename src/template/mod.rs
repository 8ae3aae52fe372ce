//! Template loading and rendering

pub mod engine;

pub use engine::{render, TemplateError};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Loads named template files from the template directory.
///
/// Templates are read fresh on every load; there is no caching across
/// builds. A missing template is a fatal error with no fallback.
pub struct TemplateStore {
    template_dir: PathBuf,
}

impl TemplateStore {
    pub fn new<P: AsRef<Path>>(template_dir: P) -> Self {
        Self {
            template_dir: template_dir.as_ref().to_path_buf(),
        }
    }

    /// Read a template file by exact name, e.g. `base.html`.
    pub fn load(&self, name: &str) -> Result<String> {
        let path = self.template_dir.join(name);
        fs::read_to_string(&path).with_context(|| format!("failed to read template {:?}", path))
    }
}
