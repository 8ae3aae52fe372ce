//! Front-matter parsing
//!
//! A content file may start with a YAML front-matter block delimited by
//! `---` lines; the remainder is the Markdown body. Attributes survive as an
//! untyped, insertion-ordered key/value map so arbitrary front-matter keys
//! reach the templates.

use anyhow::{anyhow, Result};
use serde_json::{Map, Value};

/// A parsed content file: front-matter attributes plus the raw body.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub attributes: Map<String, Value>,
    pub body: String,
}

impl Document {
    /// Parse a content file into attributes and body.
    ///
    /// Malformed front-matter (an opening `---` with no closing delimiter,
    /// YAML that does not parse, or YAML that is not a mapping) is an error;
    /// the build aborts rather than skipping the file. A file with no
    /// leading `---` parses as body-only with empty attributes.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim_start();
        if !trimmed.starts_with("---") {
            return Ok(Self {
                attributes: Map::new(),
                body: text.to_string(),
            });
        }

        let rest = &trimmed[3..];
        let end = rest
            .find("\n---")
            .ok_or_else(|| anyhow!("front-matter opened with --- but never closed"))?;

        let yaml = &rest[..end];
        let body = rest[end + 4..].trim_start_matches(['\n', '\r']).to_string();

        if yaml.trim().is_empty() {
            return Ok(Self {
                attributes: Map::new(),
                body,
            });
        }

        let attributes: Map<String, Value> =
            serde_yaml::from_str(yaml).map_err(|e| anyhow!("invalid front-matter: {}", e))?;

        Ok(Self { attributes, body })
    }

    /// Fetch a string attribute, if present and actually a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(|v| v.as_str())
    }

    /// The document title, defaulting to "Untitled".
    pub fn title(&self) -> &str {
        self.get_str("title").unwrap_or("Untitled")
    }
}

/// A document whose body has been rendered to HTML. The HTML is derived
/// once and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub attributes: Map<String, Value>,
    pub html: String,
}
