//! Docs page preprocessing.

use serde::Serialize;

use crate::frontmatter::{extract_frontmatter, Frontmatter};
use crate::links::normalize_links;
use crate::tags::transform_tags;

/// A docs page ready to hand to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentDocument {
    /// Parsed frontmatter
    pub frontmatter: Frontmatter,

    /// Standard Markdown body with custom tags resolved and links normalized
    pub body: String,
}

/// Run the full docs pipeline on raw page source.
///
/// Frontmatter is stripped, custom tags are rewritten and root-relative links
/// are moved under the docs mount. Never fails: anything malformed is kept
/// as-is or defaulted.
pub fn preprocess(source: &str) -> ContentDocument {
    let (frontmatter, body) = extract_frontmatter(source);
    let body = transform_tags(body);
    let body = normalize_links(&body);

    ContentDocument { frontmatter, body }
}
