//! Generator module - renders pages and blog posts to static HTML

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::content::{Document, MarkdownRenderer, RenderedDocument};
use crate::helpers::{full_date, parse_date_string};
use crate::template::{self, TemplateStore};
use crate::Site;

/// Summary of one blog post, used only for the index page.
#[derive(Debug, Clone)]
pub struct PostSummary {
    pub title: String,
    /// Parsed date, used for sorting. None when the front-matter date is
    /// missing or unparseable; such posts sort after all dated posts.
    pub date: Option<NaiveDateTime>,
    /// Long-form date shown on the index, empty when `date` is None
    pub formatted_date: String,
    pub author: Option<String>,
    pub slug: String,
    pub excerpt: String,
    pub url: String,
}

impl PostSummary {
    /// Project into a loop element for the index template.
    fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("title".into(), Value::String(self.title.clone()));
        map.insert("date".into(), Value::String(self.formatted_date.clone()));
        map.insert(
            "author".into(),
            Value::String(self.author.clone().unwrap_or_default()),
        );
        map.insert("slug".into(), Value::String(self.slug.clone()));
        map.insert("excerpt".into(), Value::String(self.excerpt.clone()));
        map.insert("url".into(), Value::String(self.url.clone()));
        Value::Object(map)
    }
}

/// Static site generator: pages, blog posts, blog index.
pub struct Generator {
    site: Site,
    store: TemplateStore,
    renderer: MarkdownRenderer,
}

impl Generator {
    pub fn new(site: &Site) -> Self {
        let store = TemplateStore::new(&site.template_dir);
        Self {
            site: site.clone(),
            store,
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Generate the entire site: clear the output directory, copy static
    /// assets, render pages, render the blog.
    pub fn generate(&self) -> Result<()> {
        self.clear_output()?;
        self.copy_static_assets()?;
        self.render_pages()?;
        self.render_blog()?;
        Ok(())
    }

    /// Empty (or create) the output directory.
    fn clear_output(&self) -> Result<()> {
        if self.site.output_dir.exists() {
            fs::remove_dir_all(&self.site.output_dir).with_context(|| {
                format!("failed to clear output directory {:?}", self.site.output_dir)
            })?;
        }
        fs::create_dir_all(&self.site.output_dir)?;
        Ok(())
    }

    /// Copy every file under the static directory into the output root
    /// verbatim, preserving relative paths.
    fn copy_static_assets(&self) -> Result<()> {
        if !self.site.static_dir.exists() {
            return Ok(());
        }

        let mut copied = 0;
        for entry in WalkDir::new(&self.site.static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() {
                let relative = path.strip_prefix(&self.site.static_dir)?;
                let dest = self.site.output_dir.join(relative);
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(path, &dest)
                    .with_context(|| format!("failed to copy static asset {:?}", path))?;
                copied += 1;
            }
        }

        tracing::debug!("Copied {} static assets", copied);
        Ok(())
    }

    /// Render every page under `<content>/pages` through the base template.
    pub fn render_pages(&self) -> Result<()> {
        let pages_dir = self.site.pages_dir();
        let base_template = self.store.load("base.html")?;

        let mut count = 0;
        for path in list_markdown_files(&pages_dir)? {
            let rendered = self.load_document(&path)?;

            let mut data = rendered.attributes.clone();
            data.insert("title".into(), Value::String(page_title(&rendered)));
            data.insert("content".into(), Value::String(rendered.html.clone()));
            data.insert(
                "site_title".into(),
                Value::String(self.site.config.title.clone()),
            );

            let html = template::render(&base_template, &data)
                .with_context(|| format!("failed to render page {:?}", path))?;

            let output = self.site.output_dir.join(output_name(&path));
            write_output(&output, &html)?;
            tracing::debug!("Rendered page {:?}", output);
            count += 1;
        }

        tracing::info!("Rendered {} pages", count);
        Ok(())
    }

    /// Render every post under `<content>/blog` through the post template,
    /// then the sorted index through the index template.
    pub fn render_blog(&self) -> Result<()> {
        let blog_dir = self.site.blog_dir();
        let post_template = self.store.load("post.html")?;

        let mut summaries = Vec::new();

        for path in list_markdown_files(&blog_dir)? {
            let rendered = self.load_document(&path)?;

            let slug = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("untitled")
                .to_string();
            let url = format!("{}.html", slug);

            let date = rendered
                .attributes
                .get("date")
                .and_then(|v| v.as_str())
                .and_then(parse_date_string);
            let formatted_date = date.as_ref().map(full_date).unwrap_or_default();

            let author = rendered
                .attributes
                .get("author")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string());

            // Excerpt defaults to the first line of the rendered HTML.
            let excerpt = rendered
                .attributes
                .get("excerpt")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| {
                    rendered.html.lines().next().unwrap_or_default().to_string()
                });

            let mut data = rendered.attributes.clone();
            data.insert("title".into(), Value::String(page_title(&rendered)));
            data.insert("content".into(), Value::String(rendered.html.clone()));
            data.insert("date".into(), Value::String(formatted_date.clone()));
            data.insert(
                "author".into(),
                Value::String(author.clone().unwrap_or_default()),
            );
            data.insert(
                "site_title".into(),
                Value::String(self.site.config.title.clone()),
            );

            let html = template::render(&post_template, &data)
                .with_context(|| format!("failed to render post {:?}", path))?;

            let output = self.site.output_dir.join("blog").join(&url);
            write_output(&output, &html)?;
            tracing::debug!("Rendered post {:?}", output);

            summaries.push(PostSummary {
                title: page_title(&rendered),
                date,
                formatted_date,
                author,
                slug,
                excerpt,
                url,
            });
        }

        // Newest first; sort_by is stable, so equal dates keep their
        // encounter order. Undated posts (None) land at the end.
        summaries.sort_by(|a, b| b.date.cmp(&a.date));

        self.render_blog_index(&summaries)?;

        tracing::info!("Rendered {} posts", summaries.len());
        Ok(())
    }

    /// Render `blog/index.html`, produced even when there are no posts.
    fn render_blog_index(&self, summaries: &[PostSummary]) -> Result<()> {
        let index_template = self.store.load("index.html")?;

        let posts: Vec<Value> = summaries.iter().map(|s| s.to_value()).collect();

        let mut data = Map::new();
        data.insert("title".into(), Value::String("Blog".to_string()));
        data.insert(
            "site_title".into(),
            Value::String(self.site.config.title.clone()),
        );
        data.insert("posts".into(), Value::Array(posts));

        let html = template::render(&index_template, &data)
            .context("failed to render blog index")?;

        let output = self.site.output_dir.join("blog").join("index.html");
        write_output(&output, &html)?;
        Ok(())
    }

    /// Read, parse and render one content file.
    fn load_document(&self, path: &Path) -> Result<RenderedDocument> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read content file {:?}", path))?;
        let doc = Document::parse(&text)
            .with_context(|| format!("failed to parse front-matter of {:?}", path))?;
        self.renderer.render_document(&doc)
    }
}

/// Title for template data: the `title` attribute when it is a string,
/// otherwise "Untitled".
fn page_title(rendered: &RenderedDocument) -> String {
    rendered
        .attributes
        .get("title")
        .and_then(|v| v.as_str())
        .unwrap_or("Untitled")
        .to_string()
}

/// Output file name for a content file: same base name, `.html` extension.
fn output_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled");
    format!("{}.html", stem)
}

/// List the `.md` files directly under a directory in file-name order.
/// A missing directory lists as empty.
fn list_markdown_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("failed to read directory {:?}", dir))? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("md") {
            files.push(path);
        }
    }

    // read_dir order is platform-dependent; sort for deterministic output.
    files.sort();
    Ok(files)
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).with_context(|| format!("failed to write {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_markdown_files_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.md"), "b").unwrap();
        fs::write(dir.path().join("a.md"), "a").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let files = list_markdown_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.md", "b.md"]);
    }

    #[test]
    fn test_list_markdown_files_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let files = list_markdown_files(&dir.path().join("nope")).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_post_summary_to_value() {
        let summary = PostSummary {
            title: "Hello".into(),
            date: parse_date_string("2024-01-05"),
            formatted_date: "January 5, 2024".into(),
            author: None,
            slug: "hello".into(),
            excerpt: "<p>Hi</p>".into(),
            url: "hello.html".into(),
        };

        let value = summary.to_value();
        assert_eq!(value["title"], "Hello");
        assert_eq!(value["date"], "January 5, 2024");
        // Absent author projects as empty string so templates render cleanly.
        assert_eq!(value["author"], "");
        assert_eq!(value["url"], "hello.html");
    }
}
