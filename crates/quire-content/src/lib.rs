//! Content preprocessing for quire docs and blog pages.
//!
//! Docs pages go through [`preprocess`]: frontmatter is stripped, custom block
//! tags are rewritten to Markdown and root-relative links are moved under the
//! docs mount. Blog posts are split into typed blocks by [`segment`].

pub mod blog;
pub mod frontmatter;
pub mod links;
pub mod loader;
pub mod preprocess;
pub mod tags;

pub use blog::{segment, BlogError, BlogPost, BlogStore, Blocks, ContentBlock};
pub use frontmatter::{extract_frontmatter, Frontmatter};
pub use links::{normalize_links, DOCS_PREFIX};
pub use loader::{candidate_paths, slug_segments, ContentSource, DocsDir, MemorySource};
pub use preprocess::{preprocess, ContentDocument};
pub use tags::transform_tags;
