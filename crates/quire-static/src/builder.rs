//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

use quire_content::{preprocess, BlogError, BlogStore, ContentSource, DocsDir};
use quire_nav::{NavigationCatalog, DOCS_ROOT};

use crate::assets::AssetPipeline;
use crate::render::SiteRenderer;
use crate::templates::Layout;

/// Maximum number of body lines kept in a search entry.
const SEARCH_EXCERPT_LINES: usize = 10;

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Source docs directory
    pub docs_dir: PathBuf,

    /// Blog posts dataset (JSON object keyed by slug)
    pub blog_posts: Option<PathBuf>,

    /// Directory copied verbatim into the output
    pub public_dir: Option<PathBuf>,

    /// Output directory
    pub output_dir: PathBuf,

    /// Minify CSS output
    pub minify: bool,

    /// Absolute site URL used in the sitemap, e.g. `https://example.com`
    pub site_url: String,

    /// Site title
    pub title: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("content/docs"),
            blog_posts: None,
            public_dir: None,
            output_dir: PathBuf::from("dist"),
            minify: true,
            site_url: String::new(),
            title: "Documentation".to_string(),
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of docs pages generated
    pub pages: usize,

    /// Number of blog posts generated
    pub posts: usize,

    /// Catalog pages without content
    pub skipped: Vec<String>,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read docs directory: {0}")]
    ReadError(String),

    #[error("Failed to load blog posts: {0}")]
    BlogError(#[from] BlogError),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// A docs page entry in `search-index.json`.
#[derive(Debug, Clone, Serialize)]
struct SearchEntry {
    title: String,
    description: String,
    url: String,
    excerpt: String,
}

/// What happened to one catalog page.
enum PageOutcome {
    Written(SearchEntry),
    Missing(String),
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    docs: DocsDir,
    renderer: SiteRenderer,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig, catalog: Arc<NavigationCatalog>) -> Self {
        let renderer = SiteRenderer::new(catalog, Layout::new(config.title.clone()));

        Self {
            docs: DocsDir::new(&config.docs_dir),
            config,
            renderer,
        }
    }

    /// Build the static site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        if !self.config.docs_dir.is_dir() {
            return Err(BuildError::ReadError(format!(
                "Docs directory not found: {}",
                self.config.docs_dir.display()
            )));
        }

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        // The index page is not part of `all_slugs`
        let mut slugs = vec![String::new()];
        slugs.extend(
            self.renderer
                .catalog()
                .all_slugs()
                .into_iter()
                .map(|segments| segments.join("/")),
        );

        let outcomes: Vec<Result<PageOutcome, BuildError>> = slugs
            .par_iter()
            .map(|slug| self.build_doc(slug))
            .collect();

        let mut search = Vec::new();
        let mut skipped = Vec::new();

        for outcome in outcomes {
            match outcome? {
                PageOutcome::Written(entry) => search.push(entry),
                PageOutcome::Missing(slug) => skipped.push(slug),
            }
        }

        let blog = self.load_blog()?;
        self.build_blog(&blog)?;

        let not_found = self
            .renderer
            .render_not_found()
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;
        write_file(&self.config.output_dir.join("404.html"), &not_found)?;

        self.generate_assets()?;
        self.copy_public()?;
        self.generate_search_index(&search)?;
        self.generate_sitemap(&search, &blog)?;

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: search.len(),
            posts: blog.len(),
            skipped,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Render and write one docs page.
    fn build_doc(&self, slug: &str) -> Result<PageOutcome, BuildError> {
        let segments = quire_content::slug_segments(slug);

        let Some(source) = self.docs.load_doc(&segments) else {
            tracing::warn!(
                "No content for docs page '{}' in {}",
                slug,
                self.config.docs_dir.display()
            );
            return Ok(PageOutcome::Missing(slug.to_string()));
        };

        let doc = preprocess(&source);
        let html = self
            .renderer
            .render_document(slug, &doc)
            .map_err(|e| BuildError::TemplateError(format!("docs/{}: {}", slug, e)))?;

        let mut path = self.config.output_dir.join("docs");
        path.extend(&segments);
        write_file(&path.join("index.html"), &html)?;

        let excerpt = doc
            .body
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#') && !l.starts_with("```"))
            .take(SEARCH_EXCERPT_LINES)
            .collect::<Vec<_>>()
            .join(" ");

        Ok(PageOutcome::Written(SearchEntry {
            title: self.renderer.page_title(slug, &doc).to_string(),
            description: doc.frontmatter.description.clone(),
            url: doc_url(slug),
            excerpt,
        }))
    }

    /// Load the blog dataset, if one is configured and present.
    fn load_blog(&self) -> Result<BlogStore, BuildError> {
        match &self.config.blog_posts {
            Some(path) if path.is_file() => Ok(BlogStore::load(path)?),
            Some(path) => {
                tracing::warn!("Blog posts not found: {}", path.display());
                Ok(BlogStore::new())
            }
            None => Ok(BlogStore::new()),
        }
    }

    /// Write the blog index and every post.
    fn build_blog(&self, blog: &BlogStore) -> Result<(), BuildError> {
        let blog_dir = self.config.output_dir.join("blog");

        let index = self
            .renderer
            .render_blog_index(blog.posts())
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;
        write_file(&blog_dir.join("index.html"), &index)?;

        blog.posts().par_iter().try_for_each(|post| {
            let html = self
                .renderer
                .render_post(post)
                .map_err(|e| BuildError::TemplateError(format!("blog/{}: {}", post.slug, e)))?;
            write_file(&blog_dir.join(&post.slug).join("index.html"), &html)
        })
    }

    /// Generate static assets.
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");

        write_file(
            &assets_dir.join("main.css"),
            &AssetPipeline::css(self.config.minify),
        )?;
        write_file(&assets_dir.join("main.js"), AssetPipeline::js())
    }

    /// Copy the public directory into the output root.
    fn copy_public(&self) -> Result<(), BuildError> {
        let Some(public_dir) = &self.config.public_dir else {
            return Ok(());
        };

        if !public_dir.is_dir() {
            return Ok(());
        }

        let mut copied = 0;

        for entry in WalkDir::new(public_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let relative = entry.path().strip_prefix(public_dir).unwrap_or(entry.path());
            let target = self.config.output_dir.join(relative);

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
            }
            fs::copy(entry.path(), &target)
                .map_err(|e| BuildError::WriteError(format!("{}: {}", target.display(), e)))?;
            copied += 1;
        }

        tracing::info!("Copied {} files from {}", copied, public_dir.display());

        Ok(())
    }

    /// Generate search index.
    fn generate_search_index(&self, entries: &[SearchEntry]) -> Result<(), BuildError> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        write_file(&self.config.output_dir.join("search-index.json"), &json)
    }

    /// Generate sitemap and robots.txt.
    fn generate_sitemap(&self, docs: &[SearchEntry], blog: &BlogStore) -> Result<(), BuildError> {
        let site_url = self.config.site_url.trim_end_matches('/');

        let paths = docs
            .iter()
            .map(|entry| entry.url.clone())
            .chain(std::iter::once("/blog".to_string()))
            .chain(blog.slugs().map(|slug| format!("/blog/{}", slug)));

        let urls: Vec<String> = paths
            .map(|path| format!("  <url>\n    <loc>{}{}</loc>\n  </url>", site_url, path))
            .collect();

        let sitemap = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>"#,
            urls.join("\n")
        );

        write_file(&self.config.output_dir.join("sitemap.xml"), &sitemap)?;

        let robots = format!("User-agent: *\nAllow: /\nSitemap: {}/sitemap.xml", site_url);
        write_file(&self.config.output_dir.join("robots.txt"), &robots)
    }
}

fn doc_url(slug: &str) -> String {
    if slug.is_empty() {
        DOCS_ROOT.to_string()
    } else {
        format!("{}/{}", DOCS_ROOT, slug)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
    }

    fs::write(path, contents)
        .map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quire_nav::{DocGroup, DocPage};
    use tempfile::{tempdir, TempDir};

    fn catalog() -> Arc<NavigationCatalog> {
        Arc::new(
            NavigationCatalog::new(vec![
                DocGroup::new(
                    "Getting Started",
                    vec![
                        DocPage::new("", "Introduction"),
                        DocPage::new("getting-started", "Getting Started"),
                    ],
                ),
                DocGroup::new(
                    "Help",
                    vec![
                        DocPage::new("help/faq", "FAQ"),
                        DocPage::new("help/support", "Support"),
                    ],
                ),
            ])
            .unwrap(),
        )
    }

    fn site() -> (TempDir, BuildConfig) {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");

        fs::create_dir_all(docs.join("help")).unwrap();
        fs::write(
            docs.join("index.md"),
            "---\ntitle: \"Welcome\"\ndescription: \"Start here\"\n---\n# Welcome\n\nHello there.\n",
        )
        .unwrap();
        fs::write(docs.join("getting-started.md"), "# Setup\n\nInstall it.").unwrap();
        fs::write(docs.join("help/faq.md"), "# FAQ\n\nAsk away.").unwrap();

        let posts = temp.path().join("posts.json");
        fs::write(
            &posts,
            r#"{
                "launch": { "title": "Launch", "content": "Hi\n\n## Next" },
                "roadmap": { "title": "Roadmap", "content": "Soon" }
            }"#,
        )
        .unwrap();

        let config = BuildConfig {
            docs_dir: docs,
            blog_posts: Some(posts),
            output_dir: temp.path().join("dist"),
            minify: false,
            site_url: "https://example.com/".to_string(),
            ..Default::default()
        };

        (temp, config)
    }

    #[tokio::test]
    async fn builds_docs_and_blog() {
        let (_temp, config) = site();
        let out = config.output_dir.clone();

        let result = StaticBuilder::new(config, catalog()).build().await.unwrap();

        assert_eq!(result.pages, 3);
        assert_eq!(result.posts, 2);
        assert_eq!(result.skipped, vec!["help/support".to_string()]);

        assert!(out.join("docs/index.html").exists());
        assert!(out.join("docs/getting-started/index.html").exists());
        assert!(out.join("docs/help/faq/index.html").exists());
        assert!(!out.join("docs/help/support").exists());
        assert!(out.join("blog/index.html").exists());
        assert!(out.join("blog/launch/index.html").exists());
        assert!(out.join("404.html").exists());
        assert!(out.join("assets/main.css").exists());
        assert!(out.join("assets/main.js").exists());
    }

    #[tokio::test]
    async fn writes_search_index() {
        let (_temp, config) = site();
        let out = config.output_dir.clone();

        StaticBuilder::new(config, catalog()).build().await.unwrap();

        let index: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("search-index.json")).unwrap())
                .unwrap();

        assert_eq!(
            index[0],
            serde_json::json!({
                "title": "Welcome",
                "description": "Start here",
                "url": "/docs",
                "excerpt": "Hello there.",
            })
        );
        assert_eq!(index[1]["title"], "Getting Started");
        assert_eq!(index[2]["url"], "/docs/help/faq");
    }

    #[tokio::test]
    async fn writes_sitemap_and_robots() {
        let (_temp, config) = site();
        let out = config.output_dir.clone();

        StaticBuilder::new(config, catalog()).build().await.unwrap();

        let sitemap = fs::read_to_string(out.join("sitemap.xml")).unwrap();
        assert!(sitemap.contains("<loc>https://example.com/docs</loc>"));
        assert!(sitemap.contains("<loc>https://example.com/docs/help/faq</loc>"));
        assert!(sitemap.contains("<loc>https://example.com/blog/roadmap</loc>"));
        assert!(!sitemap.contains("help/support"));

        let robots = fs::read_to_string(out.join("robots.txt")).unwrap();
        assert!(robots.ends_with("Sitemap: https://example.com/sitemap.xml"));
    }

    #[tokio::test]
    async fn copies_public_files() {
        let (temp, mut config) = site();
        let public = temp.path().join("public");
        fs::create_dir_all(public.join("img")).unwrap();
        fs::write(public.join("img/logo.svg"), "<svg/>").unwrap();
        config.public_dir = Some(public);
        let out = config.output_dir.clone();

        StaticBuilder::new(config, catalog()).build().await.unwrap();

        assert_eq!(
            fs::read_to_string(out.join("img/logo.svg")).unwrap(),
            "<svg/>"
        );
    }

    #[tokio::test]
    async fn missing_blog_dataset_builds_empty_blog() {
        let (temp, mut config) = site();
        config.blog_posts = Some(temp.path().join("nope.json"));

        let result = StaticBuilder::new(config, catalog()).build().await.unwrap();

        assert_eq!(result.posts, 0);
        assert!(result.output_dir.join("blog/index.html").exists());
    }

    #[tokio::test]
    async fn malformed_blog_dataset_fails() {
        let (temp, config) = site();
        fs::write(temp.path().join("posts.json"), "[1, 2]").unwrap();

        let result = StaticBuilder::new(config, catalog()).build().await;

        assert!(matches!(result, Err(BuildError::BlogError(_))));
    }

    #[tokio::test]
    async fn missing_docs_dir_fails() {
        let temp = tempdir().unwrap();
        let config = BuildConfig {
            docs_dir: temp.path().join("missing"),
            output_dir: temp.path().join("dist"),
            ..Default::default()
        };

        let result = StaticBuilder::new(config, catalog()).build().await;

        assert!(matches!(result, Err(BuildError::ReadError(_))));
    }
}
