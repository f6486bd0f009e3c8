//! Static site build command.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use quire_static::{BuildConfig, StaticBuilder};

use crate::config::load_config;

/// Run the build command.
pub async fn run(config_path: &Path, output: Option<PathBuf>, minify: Option<bool>) -> Result<()> {
    tracing::info!("Building static site...");

    let file_config = load_config(config_path)?;
    let catalog = Arc::new(file_config.catalog()?);

    let config = BuildConfig {
        docs_dir: file_config.docs.dir.clone(),
        blog_posts: Some(file_config.blog.posts.clone()),
        public_dir: file_config.public_dir(),
        output_dir: output.unwrap_or_else(|| file_config.build.output.clone()),
        minify: minify.unwrap_or(file_config.build.minify),
        site_url: file_config.site.url.clone(),
        title: file_config.site.title.clone(),
    };

    let result = StaticBuilder::new(config, catalog).build().await?;

    tracing::info!(
        "Built {} docs pages and {} blog posts in {}ms",
        result.pages,
        result.posts,
        result.duration_ms
    );

    if !result.skipped.is_empty() {
        tracing::warn!(
            "Skipped {} docs pages without content: {}",
            result.skipped.len(),
            result.skipped.join(", ")
        );
    }

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
