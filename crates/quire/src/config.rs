//! `quire.toml` configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use quire_nav::{DocGroup, DocPage, NavigationCatalog};

/// Default config file name.
pub const CONFIG_FILE: &str = "quire.toml";

/// Configuration file structure.
#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub docs: DocsConfig,
    #[serde(default)]
    pub blog: BlogConfig,
    #[serde(default)]
    pub build: BuildSettings,
    /// Docs navigation, in reading order
    #[serde(default = "default_nav")]
    pub nav: Vec<DocGroup>,
}

#[derive(Debug, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_title")]
    pub title: String,
    /// Absolute URL the site is deployed at
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct DocsConfig {
    #[serde(default = "default_docs_dir")]
    pub dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct BlogConfig {
    #[serde(default = "default_posts")]
    pub posts: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct BuildSettings {
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_minify")]
    pub minify: bool,
    /// Copied verbatim to the output root
    #[serde(default = "default_public")]
    pub public: PathBuf,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            docs: DocsConfig::default(),
            blog: BlogConfig::default(),
            build: BuildSettings::default(),
            nav: default_nav(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            url: String::new(),
        }
    }
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            dir: default_docs_dir(),
        }
    }
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            posts: default_posts(),
        }
    }
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            output: default_output(),
            minify: default_minify(),
            public: default_public(),
        }
    }
}

fn default_title() -> String {
    "Documentation".to_string()
}
fn default_docs_dir() -> PathBuf {
    PathBuf::from("content/docs")
}
fn default_posts() -> PathBuf {
    PathBuf::from("content/blog/posts.json")
}
fn default_output() -> PathBuf {
    PathBuf::from("dist")
}
fn default_minify() -> bool {
    true
}
fn default_public() -> PathBuf {
    PathBuf::from("public")
}

/// Navigation used when the config has no `[[nav]]` tables.
pub fn default_nav() -> Vec<DocGroup> {
    vec![
        DocGroup::new(
            "Getting Started",
            vec![
                DocPage::new("", "Introduction"),
                DocPage::new("getting-started", "Getting Started"),
                DocPage::new("how-it-works", "How It Works"),
            ],
        ),
        DocGroup::new(
            "Features",
            vec![
                DocPage::new("features", "Overview"),
                DocPage::new("features/channels", "Chat Channels"),
                DocPage::new("features/skills", "Skills & Integrations"),
            ],
        ),
        DocGroup::new(
            "Platform",
            vec![
                DocPage::new("platform/dashboard", "Dashboard"),
                DocPage::new("platform/cost-tracking", "Cost Tracking"),
                DocPage::new("platform/security", "Security"),
            ],
        ),
        DocGroup::new(
            "Help",
            vec![
                DocPage::new("help/faq", "FAQ"),
                DocPage::new("help/support", "Support"),
            ],
        ),
    ]
}

impl ConfigFile {
    /// Parse a config document.
    pub fn parse(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Build the docs catalog from `[[nav]]`.
    pub fn catalog(&self) -> Result<NavigationCatalog> {
        NavigationCatalog::new(self.nav.clone()).context("Invalid docs navigation")
    }

    /// The public directory, if it exists.
    pub fn public_dir(&self) -> Option<PathBuf> {
        self.build.public.is_dir().then(|| self.build.public.clone())
    }
}

/// Load configuration from `path` if it exists.
///
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!("No {} found, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config = ConfigFile::parse(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}
