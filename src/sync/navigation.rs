// src/sync/navigation.rs
//! Sidebar navigation derived from the synced page tree.

use super::mapper::PageNode;
use crate::error::AppError;
use crate::output::site_link;
use serde::Serialize;
use std::path::Path;

/// One sidebar entry, in the shape the site generator expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavItem {
    pub text: String,
    /// Site-absolute link, e.g. `/guides/setup/`
    pub link: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<NavItem>,
}

/// Builds the navigation for everything below the root page.
///
/// The root itself is the site home and gets no entry; its children are
/// the top-level sections, in editorial order.
pub fn project_navigation(root: &PageNode, site_root: &Path) -> Result<Vec<NavItem>, AppError> {
    root.children
        .iter()
        .map(|child| nav_item(child, site_root))
        .collect()
}

fn nav_item(node: &PageNode, site_root: &Path) -> Result<NavItem, AppError> {
    Ok(NavItem {
        text: node.title.clone(),
        link: site_link(site_root, &node.dir)?,
        items: node
            .children
            .iter()
            .map(|child| nav_item(child, site_root))
            .collect::<Result<_, _>>()?,
    })
}
