//! The documentation catalog.
//!
//! The catalog lists every docs page, grouped into sections. Its order is the
//! reading order of the docs: pages are visited group by group, and within a
//! group in the order they are listed. Nothing is ever re-sorted.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// URL path the docs are served under.
pub const DOCS_ROOT: &str = "/docs";

/// A page in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocPage {
    /// `/`-joined path below the docs root, empty for the index page
    pub slug: String,

    /// Title shown in navigation
    pub title: String,
}

impl DocPage {
    /// Create a page.
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
        }
    }

    /// Whether this is the docs index page.
    pub fn is_index(&self) -> bool {
        self.slug.is_empty()
    }

    /// Site path of the page.
    pub fn href(&self) -> String {
        if self.is_index() {
            DOCS_ROOT.to_string()
        } else {
            format!("{}/{}", DOCS_ROOT, self.slug)
        }
    }
}

/// A titled section of pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocGroup {
    /// Section label
    pub group: String,

    /// Pages in reading order
    #[serde(default)]
    pub pages: Vec<DocPage>,
}

impl DocGroup {
    /// Create a section.
    pub fn new(group: impl Into<String>, pages: Vec<DocPage>) -> Self {
        Self {
            group: group.into(),
            pages,
        }
    }
}

/// Neighbours of a page in reading order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrevNext<'a> {
    /// Page before, `None` at the start
    pub prev: Option<&'a DocPage>,

    /// Page after, `None` at the end
    pub next: Option<&'a DocPage>,
}

/// Errors that can occur when building a catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Duplicate slug '{slug}' in groups '{first}' and '{second}'")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },

    #[error("Invalid slug '{slug}' in group '{group}': segments must not be empty")]
    InvalidSlug { slug: String, group: String },

    #[error("Invalid nav config: {0}")]
    Config(String),
}

/// The `[[nav]]` tables of a config file.
#[derive(Debug, Deserialize)]
struct NavConfig {
    #[serde(default)]
    nav: Vec<DocGroup>,
}

/// Ordered, immutable listing of all docs pages.
#[derive(Debug, Clone, Default)]
pub struct NavigationCatalog {
    groups: Vec<DocGroup>,

    /// `(group, page)` indices in reading order
    order: Vec<(usize, usize)>,

    /// Slug to position in `order`
    positions: HashMap<String, usize>,
}

impl NavigationCatalog {
    /// Build a catalog, checking that slugs are unique and well formed.
    pub fn new(groups: Vec<DocGroup>) -> Result<Self, CatalogError> {
        let mut order: Vec<(usize, usize)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for (group_index, group) in groups.iter().enumerate() {
            for (page_index, page) in group.pages.iter().enumerate() {
                if !page.is_index() && page.slug.split('/').any(str::is_empty) {
                    return Err(CatalogError::InvalidSlug {
                        slug: page.slug.clone(),
                        group: group.group.clone(),
                    });
                }

                if let Some(&existing) = positions.get(&page.slug) {
                    let (first_group, _) = order[existing];
                    return Err(CatalogError::DuplicateSlug {
                        slug: page.slug.clone(),
                        first: groups[first_group].group.clone(),
                        second: group.group.clone(),
                    });
                }

                positions.insert(page.slug.clone(), order.len());
                order.push((group_index, page_index));
            }
        }

        tracing::debug!(
            "Built docs catalog with {} groups and {} pages",
            groups.len(),
            order.len()
        );

        Ok(Self {
            groups,
            order,
            positions,
        })
    }

    /// Build a catalog from the `[[nav]]` tables of a TOML document.
    ///
    /// Other tables in the document are ignored.
    pub fn from_config(source: &str) -> Result<Self, CatalogError> {
        let config: NavConfig =
            toml::from_str(source).map_err(|e| CatalogError::Config(e.message().to_string()))?;
        Self::new(config.nav)
    }

    /// Sections in display order.
    pub fn groups(&self) -> &[DocGroup] {
        &self.groups
    }

    /// All pages in reading order.
    pub fn pages(&self) -> impl Iterator<Item = &DocPage> + '_ {
        self.order
            .iter()
            .map(|&(group, page)| &self.groups[group].pages[page])
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the catalog has no pages.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Path segments of every page that lives below the docs root.
    ///
    /// The index page is served at the root itself and is not included.
    pub fn all_slugs(&self) -> Vec<Vec<String>> {
        self.pages()
            .filter(|page| !page.is_index())
            .map(|page| page.slug.split('/').map(str::to_string).collect())
            .collect()
    }

    /// The page with exactly this slug.
    pub fn lookup(&self, slug: &str) -> Option<&DocPage> {
        self.positions.get(slug).map(|&position| self.page_at(position))
    }

    /// Pages before and after `slug` in reading order.
    ///
    /// The empty slug is the index page. A slug that is not in the catalog
    /// has no neighbours; the first page is not offered as its `next`.
    pub fn prev_next(&self, slug: &str) -> PrevNext<'_> {
        let Some(&position) = self.positions.get(slug) else {
            return PrevNext::default();
        };

        PrevNext {
            prev: position.checked_sub(1).map(|p| self.page_at(p)),
            next: (position + 1 < self.order.len()).then(|| self.page_at(position + 1)),
        }
    }

    fn page_at(&self, position: usize) -> &DocPage {
        let (group, page) = self.order[position];
        &self.groups[group].pages[page]
    }
}
