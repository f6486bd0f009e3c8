//! Scaffold a new quire site.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing quire...");

    scaffold(config_path, Path::new("content"), yes)?;

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'quire dev' to start the development server.");

    Ok(())
}

/// Write the config file and starter content below `content_dir`.
///
/// Existing files are only replaced when `overwrite` is set.
fn scaffold(config_path: &Path, content_dir: &Path, overwrite: bool) -> Result<()> {
    let docs_dir = content_dir.join("docs");

    if docs_dir.exists() && !overwrite {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            docs_dir.display()
        );
        return Ok(());
    }

    let files = [
        (config_path.to_path_buf(), DEFAULT_CONFIG),
        (docs_dir.join("index.md"), DEFAULT_INDEX),
        (docs_dir.join("getting-started.md"), DEFAULT_GETTING_STARTED),
        (docs_dir.join("help/faq.md"), DEFAULT_FAQ),
        (content_dir.join("blog/posts.json"), DEFAULT_POSTS),
    ];

    for (path, contents) in files {
        if path.exists() && !overwrite {
            continue;
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Created {}", path.display());
    }

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# quire configuration

[site]
title = "My Documentation"
# Absolute URL used in sitemap.xml
url = "https://example.com"

[docs]
dir = "content/docs"

[blog]
posts = "content/blog/posts.json"

[build]
output = "dist"
minify = true
public = "public"

# Docs navigation, in reading order. The page with an empty slug is /docs.
[[nav]]
group = "Getting Started"
pages = [
  { slug = "", title = "Introduction" },
  { slug = "getting-started", title = "Getting Started" },
]

[[nav]]
group = "Help"
pages = [
  { slug = "help/faq", title = "FAQ" },
]
"#;

const DEFAULT_INDEX: &str = r#"---
title: "Introduction"
description: "Welcome to your documentation"
---

# Introduction

This site is built with **quire**.

<Note>
  Pages live in `content/docs` and are listed in `quire.toml`.
</Note>

<CardGroup cols={2}>
  <Card title="Getting Started" href="/getting-started">Set up your first page</Card>
  <Card title="FAQ" href="/help/faq">Common questions</Card>
</CardGroup>
"#;

const DEFAULT_GETTING_STARTED: &str = r#"---
title: "Getting Started"
description: "Write and preview your first page"
---

# Getting Started

Start the development server:

```bash
quire dev
```

Add a Markdown file under `content/docs` and list it in the `[[nav]]`
section of `quire.toml`. Links starting with `/` point into the docs, so
`[FAQ](/help/faq)` becomes a link to `/docs/help/faq`.

<Warning>
  Pages missing from `[[nav]]` are still served, but they are not built.
</Warning>

When you are done, build the static site:

```bash
quire build
```
"#;

const DEFAULT_FAQ: &str = r#"---
title: "FAQ"
description: "Frequently asked questions"
---

# FAQ

## Where do blog posts come from?

From `content/blog/posts.json`, a JSON object keyed by post slug.
"#;

const DEFAULT_POSTS: &str = r#"{
  "hello-world": {
    "title": "Hello, world",
    "excerpt": "The first post on this blog.",
    "date": "January 1, 2025",
    "readTime": "1 min read",
    "category": "News",
    "content": "Welcome to the blog.\n\n## What to expect\n\n- Release notes\n- Guides\n\n```\nquire build\n```"
  }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load_config, CONFIG_FILE};
    use pretty_assertions::assert_eq;
    use quire_content::{preprocess, BlogStore};
    use tempfile::tempdir;

    #[test]
    fn scaffolds_site() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join(CONFIG_FILE);
        let content = temp.path().join("content");

        scaffold(&config_path, &content, false).unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.site.title, "My Documentation");

        let catalog = config.catalog().unwrap();
        for slug in catalog.all_slugs() {
            let path = content.join("docs").join(format!("{}.md", slug.join("/")));
            assert!(path.exists(), "{}", path.display());
        }

        let blog = BlogStore::load(&content.join("blog/posts.json")).unwrap();
        assert_eq!(blog.slugs().collect::<Vec<_>>(), vec!["hello-world"]);
    }

    #[test]
    fn starter_index_uses_custom_tags() {
        let doc = preprocess(DEFAULT_INDEX);

        assert_eq!(doc.frontmatter.title, "Introduction");
        assert!(doc
            .body
            .contains("- [**Getting Started**](/docs/getting-started) — Set up your first page"));
        assert!(doc.body.contains("> **Note:** Pages live in"));
    }

    #[test]
    fn keeps_existing_docs() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join(CONFIG_FILE);
        let content = temp.path().join("content");
        fs::create_dir_all(content.join("docs")).unwrap();
        fs::write(content.join("docs/index.md"), "mine").unwrap();

        scaffold(&config_path, &content, false).unwrap();

        assert_eq!(
            fs::read_to_string(content.join("docs/index.md")).unwrap(),
            "mine"
        );
        assert!(!config_path.exists());
    }

    #[test]
    fn overwrites_with_yes() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join(CONFIG_FILE);
        let content = temp.path().join("content");
        fs::create_dir_all(content.join("docs")).unwrap();
        fs::write(content.join("docs/index.md"), "mine").unwrap();

        scaffold(&config_path, &content, true).unwrap();

        assert_eq!(
            fs::read_to_string(content.join("docs/index.md")).unwrap(),
            DEFAULT_INDEX
        );
        assert!(config_path.exists());
    }
}
