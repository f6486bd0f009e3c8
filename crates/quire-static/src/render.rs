//! Turning preprocessed content into full HTML pages.

use std::sync::Arc;

use pulldown_cmark::{html, CowStr, Event, LinkType, Options, Parser, Tag};
use serde::Serialize;

use quire_content::{preprocess, BlogPost, ContentBlock, ContentDocument};
use quire_nav::{NavigationCatalog, Pager, SidebarSection};

use crate::templates::{Layout, TemplateEngine};

/// Render Markdown to HTML.
///
/// Site links (`/…` and `#…`) are left alone. Every other link opens in a
/// new tab with `rel="noopener noreferrer"`. Raw HTML in the source is shown
/// as escaped text, never emitted as markup.
pub fn render_markdown(body: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let parser = Parser::new_ext(body, options).map(|event| match event {
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            ..
        }) if link_type != LinkType::Email && !is_site_link(&dest_url) => {
            Event::InlineHtml(CowStr::from(external_anchor(&dest_url, &title)))
        }
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    html_output
}

/// Whether a link target stays on this site.
pub fn is_site_link(href: &str) -> bool {
    (href.starts_with('/') && !href.starts_with("//")) || href.starts_with('#')
}

fn external_anchor(href: &str, title: &str) -> String {
    let mut anchor = format!(r#"<a href="{}""#, escape_attr(href));
    if !title.is_empty() {
        anchor.push_str(&format!(r#" title="{}""#, escape_attr(title)));
    }
    anchor.push_str(r#" target="_blank" rel="noopener noreferrer">"#);
    anchor
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[derive(Serialize)]
struct DocView<'a> {
    title: &'a str,
    description: &'a str,
    content: String,
    sidebar: Vec<SidebarSection>,
    pager: Pager,
}

#[derive(Serialize)]
struct PostView<'a> {
    title: &'a str,
    description: &'a str,
    post: &'a BlogPost,
    blocks: Vec<ContentBlock<'a>>,
}

#[derive(Serialize)]
struct BlogIndexView<'a> {
    title: &'static str,
    posts: &'a [BlogPost],
}

#[derive(Serialize)]
struct NotFoundView {
    title: &'static str,
}

/// Renders every kind of site page.
pub struct SiteRenderer {
    templates: TemplateEngine,
    catalog: Arc<NavigationCatalog>,
    layout: Layout,
}

impl SiteRenderer {
    /// Create a renderer for the given catalog and layout.
    pub fn new(catalog: Arc<NavigationCatalog>, layout: Layout) -> Self {
        Self {
            templates: TemplateEngine::new(),
            catalog,
            layout,
        }
    }

    /// The docs catalog.
    pub fn catalog(&self) -> &NavigationCatalog {
        &self.catalog
    }

    /// The site layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Render the docs page at `slug` from its raw source.
    pub fn render_doc(&self, slug: &str, source: &str) -> Result<String, minijinja::Error> {
        self.render_document(slug, &preprocess(source))
    }

    /// Render an already preprocessed docs page.
    pub fn render_document(
        &self,
        slug: &str,
        doc: &ContentDocument,
    ) -> Result<String, minijinja::Error> {
        let view = DocView {
            title: self.page_title(slug, doc),
            description: &doc.frontmatter.description,
            content: render_markdown(&doc.body),
            sidebar: self.catalog.sidebar(Some(slug)),
            pager: Pager::from(self.catalog.prev_next(slug)),
        };

        self.templates.render("doc.html", &self.layout, view)
    }

    /// Title of a docs page: its frontmatter title, or the catalog title when
    /// the frontmatter has none.
    pub fn page_title<'a>(&'a self, slug: &str, doc: &'a ContentDocument) -> &'a str {
        if !doc.frontmatter.title.is_empty() {
            return &doc.frontmatter.title;
        }

        self.catalog
            .lookup(slug)
            .map(|page| page.title.as_str())
            .unwrap_or_default()
    }

    /// Render a blog post.
    pub fn render_post(&self, post: &BlogPost) -> Result<String, minijinja::Error> {
        let view = PostView {
            title: &post.title,
            description: &post.excerpt,
            post,
            blocks: post.blocks().collect(),
        };

        self.templates.render("blog_post.html", &self.layout, view)
    }

    /// Render the list of blog posts.
    pub fn render_blog_index(&self, posts: &[BlogPost]) -> Result<String, minijinja::Error> {
        let view = BlogIndexView {
            title: "Blog",
            posts,
        };

        self.templates.render("blog_index.html", &self.layout, view)
    }

    /// Render the not-found page.
    pub fn render_not_found(&self) -> Result<String, minijinja::Error> {
        let view = NotFoundView {
            title: "Page not found",
        };

        self.templates.render("not_found.html", &self.layout, view)
    }
}
