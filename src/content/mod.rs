//! Content module - front-matter parsing and Markdown rendering

mod frontmatter;
mod markdown;

pub use frontmatter::{Document, RenderedDocument};
pub use markdown::MarkdownRenderer;
