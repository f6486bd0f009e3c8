//! Template engine for rendering site pages.

use minijinja::{context, Environment};
use serde::Serialize;

/// Site-wide values shared by every page.
#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    /// Site title, shown in the header and `<title>`
    pub site_title: String,

    /// Stylesheet URLs
    pub styles: Vec<String>,

    /// Script URLs, loaded at the end of `<body>`
    pub scripts: Vec<String>,
}

impl Layout {
    /// Layout with the default stylesheet and script.
    pub fn new(site_title: impl Into<String>) -> Self {
        Self {
            site_title: site_title.into(),
            styles: vec!["/assets/main.css".to_string()],
            scripts: vec!["/assets/main.js".to_string()],
        }
    }

    /// Add a script URL, builder style.
    pub fn with_script(mut self, src: impl Into<String>) -> Self {
        self.scripts.push(src.into());
        self
    }
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        for (name, source) in TEMPLATES {
            env.add_template_owned(name.to_string(), source.to_string())
                .expect("Failed to add built-in template");
        }

        Self { env }
    }

    /// Render `template` with the site layout and page values.
    pub fn render<S: Serialize>(
        &self,
        template: &str,
        layout: &Layout,
        page: S,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template)?;

        tmpl.render(context! {
            site => layout,
            page => page,
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const TEMPLATES: [(&str, &str); 6] = [
    ("base.html", BASE_TEMPLATE),
    ("sidebar.html", SIDEBAR_TEMPLATE),
    ("doc.html", DOC_TEMPLATE),
    ("blog_post.html", BLOG_POST_TEMPLATE),
    ("blog_index.html", BLOG_INDEX_TEMPLATE),
    ("not_found.html", NOT_FOUND_TEMPLATE),
];

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{% if page.title %}{{ page.title }} - {% endif %}{{ site.site_title }}</title>
  {% if page.description %}<meta name="description" content="{{ page.description }}">
  {% endif %}{% for style in site.styles %}<link rel="stylesheet" href="{{ style }}">
  {% endfor %}
</head>
<body>
  <header class="site-header">
    <a href="/" class="site-logo">{{ site.site_title }}</a>
    <nav class="site-links">
      <a href="/docs">Docs</a>
      <a href="/blog">Blog</a>
    </nav>
  </header>
  {% block body %}{% endblock %}
  {% for script in site.scripts %}<script src="{{ script }}"></script>
  {% endfor %}
</body>
</html>"##;

const SIDEBAR_TEMPLATE: &str = r##"<button class="menu-btn" type="button" aria-label="Toggle docs navigation">Menu</button>
<aside class="sidebar">
  <a href="/" class="sidebar-back">Back to home</a>
  {% for section in page.sidebar %}
  <div class="sidebar-section">
    <h3 class="sidebar-group">{{ section.group }}</h3>
    <ul class="nav-list">
    {% for link in section.links %}
      <li class="nav-item{% if link.active %} active{% endif %}">
        <a href="{{ link.href }}"{% if link.active %} aria-current="page"{% endif %}>{{ link.title }}</a>
      </li>
    {% endfor %}
    </ul>
  </div>
  {% endfor %}
</aside>"##;

const DOC_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block body %}
<div class="docs-layout">
  {% include "sidebar.html" %}
  <main class="main">
    {% if page.description %}
    <p class="doc-description">{{ page.description }}</p>
    {% endif %}
    <article class="content">
      {{ page.content | safe }}
    </article>
    {% if page.pager.prev or page.pager.next %}
    <nav class="pager">
      {% if page.pager.prev %}
      <a class="pager-prev" href="{{ page.pager.prev.href }}">
        <span class="pager-label">Previous</span>
        <span class="pager-title">{{ page.pager.prev.title }}</span>
      </a>
      {% else %}<div></div>{% endif %}
      {% if page.pager.next %}
      <a class="pager-next" href="{{ page.pager.next.href }}">
        <span class="pager-label">Next</span>
        <span class="pager-title">{{ page.pager.next.title }}</span>
      </a>
      {% else %}<div></div>{% endif %}
    </nav>
    {% endif %}
  </main>
</div>
{% endblock %}"##;

const BLOG_POST_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block body %}
<main class="post">
  <a href="/blog" class="post-back">Back to Blog</a>
  <header class="post-header">
    <div class="post-meta">
      <span class="post-category">{{ page.post.category }}</span>
      <span>{{ page.post.date }}</span>
      <span>&bull;</span>
      <span>{{ page.post.readTime }}</span>
    </div>
    <h1>{{ page.post.title }}</h1>
    <p class="post-excerpt">{{ page.post.excerpt }}</p>
  </header>
  <article class="content">
  {% for block in page.blocks %}
    {% if block.kind == "heading2" %}<h2>{{ block.text }}</h2>
    {% elif block.kind == "heading3" %}<h3>{{ block.text }}</h3>
    {% elif block.kind == "code_block" %}<pre><code>{{ block.code }}</code></pre>
    {% elif block.kind == "list" and block.ordered %}<ol>{% for item in block.items %}<li>{{ item }}</li>{% endfor %}</ol>
    {% elif block.kind == "list" %}<ul>{% for item in block.items %}<li>{{ item }}</li>{% endfor %}</ul>
    {% else %}<p>{{ block.text }}</p>
    {% endif %}
  {% endfor %}
  </article>
</main>
{% endblock %}"##;

const BLOG_INDEX_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block body %}
<main class="blog-index">
  <h1>Blog</h1>
  {% for post in page.posts %}
  <a class="post-card" href="/blog/{{ post.slug }}">
    <div class="post-meta">
      <span class="post-category">{{ post.category }}</span>
      <span>{{ post.date }}</span>
      <span>&bull;</span>
      <span>{{ post.readTime }}</span>
    </div>
    <h2>{{ post.title }}</h2>
    <p class="post-excerpt">{{ post.excerpt }}</p>
  </a>
  {% else %}
  <p>No posts yet.</p>
  {% endfor %}
</main>
{% endblock %}"##;

const NOT_FOUND_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block body %}
<main class="not-found">
  <h1>Page not found</h1>
  <p>The page you are looking for does not exist.</p>
  <a href="/docs">Go to the docs</a>
</main>
{% endblock %}"##;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_layout() {
        let engine = TemplateEngine::new();
        let layout = Layout::new("Acme").with_script("/__hmr.js");

        let html = engine
            .render("not_found.html", &layout, json!({ "title": "Not found" }))
            .unwrap();

        assert!(html.contains("<title>Not found - Acme</title>"));
        assert!(html.contains("main.css"));
        assert!(html.contains("main.js"));
        assert!(html.contains("__hmr.js"));
    }

    #[test]
    fn title_falls_back_to_site_title() {
        let engine = TemplateEngine::new();

        let html = engine
            .render("not_found.html", &Layout::new("Acme"), json!({}))
            .unwrap();

        assert!(html.contains("<title>Acme</title>"));
    }

    #[test]
    fn doc_content_is_not_escaped() {
        let engine = TemplateEngine::new();

        let html = engine
            .render(
                "doc.html",
                &Layout::new("Acme"),
                json!({
                    "title": "Intro",
                    "content": "<p>Hello <em>world</em></p>",
                    "sidebar": [],
                    "pager": { "prev": null, "next": null },
                }),
            )
            .unwrap();

        assert!(html.contains("<p>Hello <em>world</em></p>"));
        assert!(!html.contains("class=\"pager\""));
    }

    #[test]
    fn blog_blocks_are_escaped() {
        let engine = TemplateEngine::new();

        let html = engine
            .render(
                "blog_post.html",
                &Layout::new("Acme"),
                json!({
                    "title": "Post",
                    "post": { "title": "Post", "readTime": "3 min read" },
                    "blocks": [{ "kind": "paragraph", "text": "<script>alert(1)</script>" }],
                }),
            )
            .unwrap();

        assert!(html.contains("&lt;script&gt;alert(1)&lt;&#x2f;script&gt;"));
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("3 min read"));
    }
}
