//! Ordered docs catalog for quire.
//!
//! The catalog drives the docs sidebar, the previous/next links at the
//! bottom of each page and the set of pages a static build generates.

pub mod catalog;
pub mod sidebar;

pub use catalog::{CatalogError, DocGroup, DocPage, NavigationCatalog, PrevNext, DOCS_ROOT};
pub use sidebar::{NavLink, Pager, SidebarLink, SidebarSection};
