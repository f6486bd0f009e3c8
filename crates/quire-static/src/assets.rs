//! Stylesheet and script served with every page.

/// Built-in site assets.
pub struct AssetPipeline;

impl AssetPipeline {
    /// The site stylesheet, minified when `minify` is set.
    ///
    /// Falls back to the unminified source if lightningcss rejects it.
    pub fn css(minify: bool) -> String {
        if !minify {
            return SITE_CSS.to_string();
        }

        match Self::minify_css(SITE_CSS) {
            Ok(css) => css,
            Err(e) => {
                tracing::warn!("Serving unminified CSS: {}", e);
                SITE_CSS.to_string()
            }
        }
    }

    /// The site script.
    pub fn js() -> &'static str {
        SITE_JS
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

const SITE_CSS: &str = r#"
:root {
  --background: #020617;
  --surface: #0f172a;
  --border: #1e293b;
  --foreground: #f8fafc;
  --muted: #94a3b8;
  --body: #cbd5e1;
  --accent: #f87171;
  --accent-strong: #ef4444;
  --sidebar-width: 16rem;
  --content-max-width: 56rem;
  --radius: 0.75rem;
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: system-ui, -apple-system, sans-serif;
  background: var(--background);
  color: var(--body);
  line-height: 1.6;
}

a {
  color: var(--accent);
  text-decoration: none;
}

a:hover {
  text-decoration: underline;
}

.site-header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  padding: 1rem 1.5rem;
  border-bottom: 1px solid var(--border);
}

.site-logo {
  font-weight: 700;
  color: var(--foreground);
}

.site-links a {
  margin-left: 1.5rem;
  color: var(--muted);
}

/* Docs */
.docs-layout {
  display: grid;
  grid-template-columns: var(--sidebar-width) 1fr;
  min-height: 100vh;
}

.sidebar {
  position: sticky;
  top: 0;
  height: 100vh;
  overflow-y: auto;
  padding: 2rem 1.25rem;
  border-right: 1px solid var(--border);
  background: rgba(2, 6, 23, 0.8);
}

.sidebar-back {
  display: block;
  font-size: 0.875rem;
  color: var(--muted);
  margin-bottom: 1.5rem;
}

.sidebar-group {
  font-size: 0.75rem;
  font-weight: 600;
  text-transform: uppercase;
  letter-spacing: 0.05em;
  color: var(--muted);
  margin: 1.25rem 0 0.5rem;
}

.nav-list {
  list-style: none;
}

.nav-item a {
  display: block;
  padding: 0.375rem 0.75rem;
  border-radius: 0.5rem;
  font-size: 0.875rem;
  color: var(--muted);
}

.nav-item a:hover {
  color: var(--foreground);
  text-decoration: none;
}

.nav-item.active > a {
  color: var(--accent);
  background: rgba(239, 68, 68, 0.1);
}

.main {
  max-width: var(--content-max-width);
  margin: 0 auto;
  padding: 3rem 1.5rem;
  width: 100%;
}

.doc-description {
  font-size: 1.125rem;
  color: var(--muted);
  margin-bottom: 0.5rem;
}

.content h1 {
  font-size: 2.25rem;
  font-weight: 700;
  color: var(--foreground);
  margin-bottom: 1.5rem;
}

.content h2 {
  font-size: 1.5rem;
  font-weight: 700;
  color: var(--foreground);
  margin: 3rem 0 1rem;
  padding-bottom: 0.5rem;
  border-bottom: 1px solid var(--border);
}

.content h3 {
  font-size: 1.25rem;
  font-weight: 600;
  color: var(--foreground);
  margin: 2rem 0 0.75rem;
}

.content p,
.content li {
  margin: 1rem 0;
}

.content ul,
.content ol {
  margin-left: 1.5rem;
}

.content li {
  margin: 0.375rem 0;
}

.content blockquote {
  border-left: 4px solid rgba(239, 68, 68, 0.5);
  background: rgba(239, 68, 68, 0.05);
  border-radius: 0 0.5rem 0.5rem 0;
  padding: 0.75rem 1rem;
  margin: 1.5rem 0;
}

.content blockquote p {
  margin: 0.25rem 0;
}

.content strong {
  color: var(--foreground);
  font-weight: 600;
}

.content table {
  width: 100%;
  border-collapse: collapse;
  font-size: 0.875rem;
  margin: 1.5rem 0;
}

.content th,
.content td {
  padding: 0.75rem 1rem;
  border-bottom: 1px solid var(--border);
  text-align: left;
}

.content pre {
  position: relative;
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 1rem;
  overflow-x: auto;
  margin: 1.5rem 0;
  font-size: 0.875rem;
}

.content code {
  font-family: ui-monospace, monospace;
  font-size: 0.875em;
  color: var(--accent);
  background: var(--border);
  padding: 0.125rem 0.375rem;
  border-radius: 0.25rem;
}

.content pre code {
  color: var(--body);
  background: none;
  padding: 0;
}

.content hr {
  border: none;
  border-top: 1px solid var(--border);
  margin: 2rem 0;
}

.copy-btn {
  position: absolute;
  top: 0.5rem;
  right: 0.5rem;
  padding: 0.25rem 0.75rem;
  font-size: 0.75rem;
  color: var(--body);
  background: var(--border);
  border: none;
  border-radius: 0.375rem;
  cursor: pointer;
}

.pager {
  display: flex;
  justify-content: space-between;
  margin-top: 4rem;
  padding-top: 2rem;
  border-top: 1px solid var(--border);
}

.pager a {
  display: flex;
  flex-direction: column;
  gap: 0.25rem;
}

.pager-next {
  align-items: flex-end;
}

.pager-label {
  font-size: 0.75rem;
  text-transform: uppercase;
  letter-spacing: 0.05em;
  color: var(--muted);
}

.pager-title {
  font-size: 0.875rem;
}

/* Blog */
.post,
.blog-index,
.not-found {
  max-width: 48rem;
  margin: 0 auto;
  padding: 4rem 1.5rem;
}

.post-back {
  display: inline-block;
  color: var(--muted);
  margin-bottom: 2rem;
}

.post-header {
  margin-bottom: 3rem;
}

.post-header h1,
.blog-index h1,
.not-found h1 {
  font-size: 2.5rem;
  font-weight: 700;
  color: var(--foreground);
  margin-bottom: 1.5rem;
}

.post-meta {
  display: flex;
  gap: 0.75rem;
  align-items: center;
  font-size: 0.875rem;
  color: var(--muted);
  margin-bottom: 1rem;
}

.post-category {
  padding: 0.25rem 0.75rem;
  border-radius: 9999px;
  color: var(--accent);
  background: rgba(239, 68, 68, 0.1);
  border: 1px solid rgba(239, 68, 68, 0.2);
}

.post-excerpt {
  font-size: 1.25rem;
  color: var(--muted);
}

.post-card {
  display: block;
  padding: 1.5rem;
  margin-bottom: 1.5rem;
  border: 1px solid var(--border);
  border-radius: var(--radius);
  background: var(--surface);
}

.post-card:hover {
  border-color: rgba(239, 68, 68, 0.4);
  text-decoration: none;
}

.post-card h2 {
  color: var(--foreground);
  margin-bottom: 0.5rem;
}

.menu-btn {
  display: none;
  position: fixed;
  right: 1.5rem;
  bottom: 1.5rem;
  z-index: 50;
  padding: 0.75rem 1rem;
  border: none;
  border-radius: 9999px;
  color: var(--foreground);
  background: var(--accent-strong);
  cursor: pointer;
}

@media (max-width: 1024px) {
  .docs-layout {
    grid-template-columns: 1fr;
  }

  .sidebar {
    position: fixed;
    left: 0;
    z-index: 40;
    width: var(--sidebar-width);
    transform: translateX(-100%);
    transition: transform 0.3s;
  }

  .sidebar.open {
    transform: translateX(0);
  }

  .menu-btn {
    display: block;
  }
}
"#;

const SITE_JS: &str = r#"(function() {
  'use strict';

  const menuBtn = document.querySelector('.menu-btn');
  const sidebar = document.querySelector('.sidebar');

  if (menuBtn && sidebar) {
    menuBtn.addEventListener('click', () => sidebar.classList.toggle('open'));
    sidebar.querySelectorAll('a').forEach(link => {
      link.addEventListener('click', () => sidebar.classList.remove('open'));
    });
  }

  document.querySelectorAll('.content pre').forEach(pre => {
    if (pre.querySelector('.copy-btn')) return;

    const btn = document.createElement('button');
    btn.className = 'copy-btn';
    btn.type = 'button';
    btn.textContent = 'Copy';

    btn.addEventListener('click', async () => {
      const code = pre.querySelector('code');
      try {
        await navigator.clipboard.writeText((code || pre).textContent || '');
        btn.textContent = 'Copied!';
      } catch (err) {
        btn.textContent = 'Error';
      }
      setTimeout(() => { btn.textContent = 'Copy'; }, 2000);
    });

    pre.appendChild(btn);
  });
})();
"#;
