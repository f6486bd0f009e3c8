//! Resolving docs slugs to raw page source.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Anything that can supply the raw source of a docs page.
///
/// A `None` result means the page does not exist; loaders never retry.
pub trait ContentSource: Send + Sync {
    /// Raw source for the page at `slug` (path segments, empty for the index).
    fn load_doc(&self, slug: &[&str]) -> Option<String>;
}

/// Split a `/`-joined slug into its segments. The index slug has none.
pub fn slug_segments(slug: &str) -> Vec<&str> {
    if slug.is_empty() {
        Vec::new()
    } else {
        slug.split('/').collect()
    }
}

/// Relative file paths probed for a slug, in order.
///
/// `a/b` tries `a/b.md` and then `a/b/index.md`; the index page is `index.md`.
/// Returns nothing for slugs with empty, `.` or `..` segments.
pub fn candidate_paths(slug: &[&str]) -> Vec<String> {
    if slug.iter().any(|segment| !is_plain_segment(segment)) {
        return Vec::new();
    }

    if slug.is_empty() {
        return vec!["index.md".to_string()];
    }

    let joined = slug.join("/");
    vec![format!("{joined}.md"), format!("{joined}/index.md")]
}

fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty() && segment != "." && segment != ".." && !segment.contains('\\')
}

/// Docs stored as Markdown files under a root directory.
#[derive(Debug, Clone)]
pub struct DocsDir {
    root: PathBuf,
}

impl DocsDir {
    /// Create a loader for the given docs directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The docs root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ContentSource for DocsDir {
    fn load_doc(&self, slug: &[&str]) -> Option<String> {
        for relative in candidate_paths(slug) {
            let path = self.root.join(&relative);
            match fs::read_to_string(&path) {
                Ok(source) => return Some(source),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => tracing::warn!("Failed to read {}: {}", path.display(), e),
            }
        }

        tracing::debug!("No docs content for '{}'", slug.join("/"));
        None
    }
}

/// Docs held in memory, keyed by relative path such as `features/index.md`.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, String>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, builder style.
    pub fn with_file(mut self, path: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(path, source);
        self
    }

    /// Add or replace a file.
    pub fn insert(&mut self, path: impl Into<String>, source: impl Into<String>) {
        self.files.insert(path.into(), source.into());
    }
}

impl ContentSource for MemorySource {
    fn load_doc(&self, slug: &[&str]) -> Option<String> {
        candidate_paths(slug)
            .iter()
            .find_map(|path| self.files.get(path).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn splits_slugs() {
        assert!(slug_segments("").is_empty());
        assert_eq!(slug_segments("features/channels"), vec!["features", "channels"]);
    }

    #[test]
    fn probes_file_then_index() {
        assert_eq!(candidate_paths(&[]), vec!["index.md"]);
        assert_eq!(
            candidate_paths(&["features"]),
            vec!["features.md", "features/index.md"]
        );
        assert_eq!(
            candidate_paths(&["platform", "v1.2"]),
            vec!["platform/v1.2.md", "platform/v1.2/index.md"]
        );
    }

    #[test]
    fn rejects_traversal() {
        assert!(candidate_paths(&["..", "secret"]).is_empty());
        assert!(candidate_paths(&["a", ""]).is_empty());
        assert!(candidate_paths(&["a\\..\\b"]).is_empty());
    }

    #[test]
    fn loads_direct_file_before_index() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("features")).unwrap();
        fs::write(temp.path().join("features.md"), "direct").unwrap();
        fs::write(temp.path().join("features/index.md"), "index").unwrap();

        let docs = DocsDir::new(temp.path());

        assert_eq!(docs.load_doc(&["features"]), Some("direct".to_string()));
    }

    #[test]
    fn falls_back_to_directory_index() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("features")).unwrap();
        fs::write(temp.path().join("features/index.md"), "index").unwrap();
        fs::write(temp.path().join("index.md"), "home").unwrap();

        let docs = DocsDir::new(temp.path());

        assert_eq!(docs.load_doc(&["features"]), Some("index".to_string()));
        assert_eq!(docs.load_doc(&[]), Some("home".to_string()));
    }

    #[test]
    fn missing_page_is_none() {
        let temp = tempdir().unwrap();
        let docs = DocsDir::new(temp.path());

        assert_eq!(docs.load_doc(&["help", "faq"]), None);
    }

    #[test]
    fn memory_source_uses_same_probing() {
        let source = MemorySource::new()
            .with_file("index.md", "home")
            .with_file("help/index.md", "help");

        assert_eq!(source.load_doc(&[]), Some("home".to_string()));
        assert_eq!(source.load_doc(&["help"]), Some("help".to_string()));
        assert_eq!(source.load_doc(&["nope"]), None);
    }
}
