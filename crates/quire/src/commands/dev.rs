//! Development server command.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use quire_server::{DevServer, DevServerConfig};

use crate::config::load_config;

/// Run the dev server.
pub async fn run(config_path: &Path, port: u16, open: bool) -> Result<()> {
    let file_config = load_config(config_path)?;
    let catalog = Arc::new(file_config.catalog()?);

    tracing::info!("Starting development server on port {}", port);

    let config = DevServerConfig {
        docs_dir: file_config.docs.dir.clone(),
        blog_posts: Some(file_config.blog.posts.clone()),
        public_dir: file_config.public_dir(),
        title: file_config.site.title.clone(),
        port,
        open,
        ..Default::default()
    };

    DevServer::new(config, catalog).start().await?;

    Ok(())
}
