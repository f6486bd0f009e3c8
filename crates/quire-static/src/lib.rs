//! Page rendering and static site generation for quire.
//!
//! [`SiteRenderer`] turns docs pages, blog posts and the not-found page into
//! HTML. [`StaticBuilder`] uses it to write a complete site to disk.

pub mod assets;
pub mod builder;
pub mod render;
pub mod templates;

pub use assets::AssetPipeline;
pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder};
pub use render::{is_site_link, render_markdown, SiteRenderer};
pub use templates::{Layout, TemplateEngine};
