//! Markdown rendering

use anyhow::Result;
use pulldown_cmark::{html, Options, Parser};

use super::{Document, RenderedDocument};

/// Markdown renderer wrapping pulldown-cmark.
///
/// Rendering is a pure function of the input text: the same Markdown always
/// produces the same HTML.
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS;
        Self { options }
    }

    /// Render Markdown to HTML.
    pub fn render(&self, markdown: &str) -> Result<String> {
        let parser = Parser::new_ext(markdown, self.options);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);
        Ok(html_output)
    }

    /// Render a parsed document's body, pairing the HTML with its attributes.
    pub fn render_document(&self, doc: &Document) -> Result<RenderedDocument> {
        let html = self.render(&doc.body)?;
        Ok(RenderedDocument {
            attributes: doc.attributes.clone(),
            html,
        })
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}
