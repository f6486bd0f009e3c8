//! Template-facing navigation data.

use serde::Serialize;

use crate::catalog::{DocPage, NavigationCatalog, PrevNext};

/// A link to a docs page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub title: String,
    pub href: String,
}

impl From<&DocPage> for NavLink {
    fn from(page: &DocPage) -> Self {
        Self {
            title: page.title.clone(),
            href: page.href(),
        }
    }
}

/// A sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarLink {
    pub title: String,
    pub href: String,
    pub active: bool,
}

/// A titled sidebar section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarSection {
    pub group: String,
    pub links: Vec<SidebarLink>,
}

/// Previous and next links shown at the bottom of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Pager {
    pub prev: Option<NavLink>,
    pub next: Option<NavLink>,
}

impl From<PrevNext<'_>> for Pager {
    fn from(nav: PrevNext<'_>) -> Self {
        Self {
            prev: nav.prev.map(NavLink::from),
            next: nav.next.map(NavLink::from),
        }
    }
}

impl NavigationCatalog {
    /// Sidebar sections, marking the page at `active_slug` if any.
    pub fn sidebar(&self, active_slug: Option<&str>) -> Vec<SidebarSection> {
        self.groups()
            .iter()
            .map(|group| SidebarSection {
                group: group.group.clone(),
                links: group
                    .pages
                    .iter()
                    .map(|page| SidebarLink {
                        title: page.title.clone(),
                        href: page.href(),
                        active: active_slug == Some(page.slug.as_str()),
                    })
                    .collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DocGroup;
    use pretty_assertions::assert_eq;

    fn catalog() -> NavigationCatalog {
        NavigationCatalog::new(vec![
            DocGroup::new(
                "Getting Started",
                vec![
                    DocPage::new("", "Introduction"),
                    DocPage::new("getting-started", "Getting Started"),
                ],
            ),
            DocGroup::new("Help", vec![DocPage::new("help/faq", "FAQ")]),
        ])
        .unwrap()
    }

    #[test]
    fn marks_active_page() {
        let sidebar = catalog().sidebar(Some("help/faq"));

        assert_eq!(sidebar.len(), 2);
        assert_eq!(sidebar[1].group, "Help");
        assert_eq!(
            sidebar[1].links,
            vec![SidebarLink {
                title: "FAQ".to_string(),
                href: "/docs/help/faq".to_string(),
                active: true,
            }]
        );
        assert!(sidebar[0].links.iter().all(|link| !link.active));
    }

    #[test]
    fn index_page_can_be_active() {
        let sidebar = catalog().sidebar(Some(""));

        assert!(sidebar[0].links[0].active);
        assert_eq!(sidebar[0].links[0].href, "/docs");
    }

    #[test]
    fn nothing_active_outside_docs() {
        let sidebar = catalog().sidebar(None);

        assert!(sidebar
            .iter()
            .flat_map(|section| &section.links)
            .all(|link| !link.active));
    }

    #[test]
    fn pager_from_neighbours() {
        let catalog = catalog();
        let pager = Pager::from(catalog.prev_next("getting-started"));

        assert_eq!(
            pager,
            Pager {
                prev: Some(NavLink {
                    title: "Introduction".to_string(),
                    href: "/docs".to_string(),
                }),
                next: Some(NavLink {
                    title: "FAQ".to_string(),
                    href: "/docs/help/faq".to_string(),
                }),
            }
        );
    }
}
