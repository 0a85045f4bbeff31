// src/sync/mod.rs
//! The sync engine: maps a Notion page tree onto a docs directory and
//! derives the navigation, posts and report artifacts from it.

mod context;
mod document;
mod mapper;
mod navigation;
mod posts;
mod report;
mod runner;

pub use context::TraversalContext;
pub use document::{assemble_document, ContentsLink, FrontMatter};
pub use mapper::{MapperOptions, PageFailure, PageNode, SiteMap, SiteMapper};
pub use navigation::{project_navigation, NavItem};
pub use posts::{excerpt, Post, PostsExport};
pub use report::{CategoryEntry, FailureEntry, SyncReport, SyncType};
pub use runner::{run_sync, SyncOutcome};

use crate::error::AppError;
use crate::output::{write_atomic, ChangeDecision, ChangeDetector, HashIndex};
use serde::Serialize;
use std::path::Path;

/// Writes a JSON artifact unless the file already holds the same content.
pub fn write_artifact<T: Serialize>(
    path: &Path,
    value: &T,
    dry_run: bool,
) -> Result<ChangeDecision, AppError> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');

    let root = path.parent().unwrap_or_else(|| Path::new("."));
    let decision = ChangeDetector::new(root, HashIndex::default()).decide(path, &json)?;
    match decision {
        ChangeDecision::Updated if dry_run => log::info!("Would write {}", path.display()),
        ChangeDecision::Updated => {
            write_atomic(path, &json)?;
            log::info!("Wrote {}", path.display());
        }
        _ => log::debug!("{} is up to date", path.display()),
    }
    Ok(decision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_artifact_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".vitepress/navigation.json");
        let value = serde_json::json!([{"text": "A", "link": "/a/"}]);

        assert_eq!(
            write_artifact(&path, &value, false).unwrap(),
            ChangeDecision::Updated
        );
        assert_eq!(
            write_artifact(&path, &value, false).unwrap(),
            ChangeDecision::Unchanged
        );
        assert!(std::fs::read_to_string(&path).unwrap().ends_with("]\n"));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nav.json");
        write_artifact(&path, &serde_json::json!([]), true).unwrap();
        assert!(!path.exists());
    }
}
