// src/sync/context.rs
//! Immutable traversal state threaded through each recursive page visit.

use crate::constants::MAX_PAGE_DEPTH;
use crate::types::NotionId;

/// Where a page visit sits in the tree.
///
/// Cloned per child rather than shared, so siblings never observe each
/// other's state. The visited set is persistent, which keeps clones cheap.
#[derive(Debug, Clone, Default)]
pub struct TraversalContext {
    /// Pages on the path from the root down to this one
    visited: im::HashSet<NotionId>,
    /// Nesting depth of the page being visited; the root is 0
    pub depth: usize,
    /// Title of the top-level section this page belongs to
    pub category: Option<String>,
}

impl TraversalContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new context with the given ID marked as visited.
    pub fn with_visited(self, id: NotionId) -> Self {
        let mut visited = self.visited;
        visited.insert(id);
        Self { visited, ..self }
    }

    /// Context for a child page. Direct children of the root start a new
    /// category; deeper pages inherit their ancestor's.
    pub fn descend(&self, child_title: &str) -> Self {
        let category = match self.depth {
            0 => Some(child_title.to_string()),
            _ => self.category.clone(),
        };
        Self {
            visited: self.visited.clone(),
            depth: self.depth + 1,
            category,
        }
    }

    /// Checks whether a child page should be visited from here.
    pub fn should_visit(&self, id: &NotionId) -> bool {
        !self.visited.contains(id) && self.depth < MAX_PAGE_DEPTH
    }

    pub fn has_visited(&self, id: &NotionId) -> bool {
        self.visited.contains(id)
    }
}
