//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Scaffold a new site in the given directory: config file, templates, a
/// sample page, a sample post, and a stylesheet.
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("content/pages"))?;
    fs::create_dir_all(target_dir.join("content/blog"))?;
    fs::create_dir_all(target_dir.join("templates"))?;
    fs::create_dir_all(target_dir.join("static"))?;

    let config_content = r#"# Site configuration
title: My Site

# Directories, relative to this file
content_dir: content
template_dir: templates
static_dir: static
output_dir: dist
"#;
    fs::write(target_dir.join("site.yml"), config_content)?;

    let base_template = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{{title}} - {{site_title}}</title>
  <link rel="stylesheet" href="/style.css">
</head>
<body>
  <header><a href="/">{{site_title}}</a></header>
  <main>
{{content}}
  </main>
</body>
</html>
"#;

    let post_template = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{{title}} - {{site_title}}</title>
  <link rel="stylesheet" href="/style.css">
</head>
<body>
  <header><a href="/">{{site_title}}</a></header>
  <main>
    <article>
      <h1>{{title}}</h1>
      <div class="meta">
        <time>{{date}}</time>
{{#if author}}
        <span class="author">by {{author}}</span>
{{/if}}
      </div>
{{content}}
    </article>
  </main>
</body>
</html>
"#;

    let index_template = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{{title}} - {{site_title}}</title>
  <link rel="stylesheet" href="/style.css">
</head>
<body>
  <header><a href="/">{{site_title}}</a></header>
  <main>
    <h1>Blog Posts</h1>
    <div class="posts-list">
{{#each posts}}
      <article class="post-preview">
        <h2><a href="/blog/{{url}}">{{title}}</a></h2>
        <div class="meta"><time>{{date}}</time></div>
        <p>{{excerpt}}</p>
        <a href="/blog/{{url}}" class="read-more">Read more</a>
      </article>
{{/each}}
    </div>
  </main>
</body>
</html>
"#;

    fs::write(target_dir.join("templates/base.html"), base_template)?;
    fs::write(target_dir.join("templates/post.html"), post_template)?;
    fs::write(target_dir.join("templates/index.html"), index_template)?;

    let sample_page = r#"---
title: About
---

# About

This site is built with sitegen. Edit `content/pages/about.md` to change
this page.
"#;
    fs::write(target_dir.join("content/pages/about.md"), sample_page)?;

    let today = chrono::Local::now().format("%Y-%m-%d");
    let sample_post = format!(
        r#"---
title: Hello World
date: {}
---

Welcome to your new site. This is your first post; add more Markdown files
under `content/blog/` and rebuild.
"#,
        today
    );
    fs::write(target_dir.join("content/blog/hello-world.md"), sample_post)?;

    let stylesheet = r#"body {
  max-width: 42rem;
  margin: 0 auto;
  padding: 1rem;
  font-family: sans-serif;
  line-height: 1.6;
}

.meta {
  color: #666;
  font-size: 0.875rem;
}

.post-preview {
  margin-bottom: 2rem;
}
"#;
    fs::write(target_dir.join("static/style.css"), stylesheet)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Site;

    #[test]
    fn test_init_creates_layout() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();

        assert!(dir.path().join("site.yml").exists());
        assert!(dir.path().join("templates/base.html").exists());
        assert!(dir.path().join("templates/post.html").exists());
        assert!(dir.path().join("templates/index.html").exists());
        assert!(dir.path().join("content/pages/about.md").exists());
        assert!(dir.path().join("content/blog/hello-world.md").exists());
        assert!(dir.path().join("static/style.css").exists());
    }

    #[test]
    fn test_scaffold_site_builds() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();

        let site = Site::new(dir.path()).unwrap();
        site.build().unwrap();

        assert!(site.output_dir.join("about.html").exists());
        assert!(site.output_dir.join("blog/hello-world.html").exists());
        assert!(site.output_dir.join("blog/index.html").exists());
        assert!(site.output_dir.join("style.css").exists());
    }
}
