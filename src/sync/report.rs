// src/sync/report.rs
//! End-of-run summary.

use super::mapper::{PageNode, SiteMap};
use crate::error::AppError;
use crate::output::{site_link, ChangeDecision};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncType {
    Full,
    Incremental,
    DryRun,
}

impl SyncType {
    pub fn from_flags(full: bool, dry_run: bool) -> Self {
        match (full, dry_run) {
            (_, true) => SyncType::DryRun,
            (true, false) => SyncType::Full,
            (false, false) => SyncType::Incremental,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureEntry {
    pub title: String,
    pub id: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryEntry {
    pub title: String,
    pub path: String,
    pub page_count: usize,
    pub updated_count: usize,
}

/// What a sync run did, written as JSON and printed for humans.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub sync_time: String,
    pub sync_type: SyncType,
    pub total_categories: usize,
    pub total_pages: usize,
    pub updated_pages: usize,
    pub unchanged_pages: usize,
    pub skipped_pages: usize,
    pub degraded_pages: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts_exported: Option<usize>,
    pub failures: Vec<FailureEntry>,
    pub categories: Vec<CategoryEntry>,
}

impl SyncReport {
    pub fn new(
        map: &SiteMap,
        sync_type: SyncType,
        site_root: &Path,
        sync_time: DateTime<Utc>,
    ) -> Result<Self, AppError> {
        let pages: Vec<&PageNode> = map.root.walk().into_iter().filter(|p| p.is_synced()).collect();
        let count = |decision: ChangeDecision| {
            pages
                .iter()
                .filter(|p| p.decision == Some(decision))
                .count()
        };

        let categories = map
            .root
            .children
            .iter()
            .map(|section| category_entry(section, site_root))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            sync_time: sync_time.to_rfc3339_opts(SecondsFormat::Millis, true),
            sync_type,
            total_categories: categories.len(),
            total_pages: pages.len(),
            updated_pages: count(ChangeDecision::Updated),
            unchanged_pages: count(ChangeDecision::Unchanged),
            skipped_pages: count(ChangeDecision::Skipped),
            degraded_pages: pages.iter().filter(|p| p.degraded).count(),
            posts_exported: None,
            failures: map
                .failures
                .iter()
                .map(|f| FailureEntry {
                    title: f.title.clone(),
                    id: f.id.to_hyphenated(),
                    error: f.error.clone(),
                })
                .collect(),
            categories,
        })
    }

    pub fn with_posts_exported(self, posts: usize) -> Self {
        Self {
            posts_exported: Some(posts),
            ..self
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Multi-line summary for the console.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let verb = match self.sync_type {
            SyncType::DryRun => "would be updated",
            _ => "updated",
        };
        let _ = writeln!(
            out,
            "Synced {} pages in {} categories: {} {}, {} unchanged, {} skipped",
            self.total_pages,
            self.total_categories,
            self.updated_pages,
            verb,
            self.unchanged_pages,
            self.skipped_pages
        );
        for category in &self.categories {
            let _ = writeln!(
                out,
                "  {} ({}): {} pages, {} updated",
                category.title, category.path, category.page_count, category.updated_count
            );
        }
        if self.degraded_pages > 0 {
            let _ = writeln!(
                out,
                "{} pages are incomplete after retries ran out",
                self.degraded_pages
            );
        }
        if let Some(posts) = self.posts_exported {
            let _ = writeln!(out, "Exported {} posts", posts);
        }
        if !self.failures.is_empty() {
            let _ = writeln!(out, "{} pages failed:", self.failures.len());
            for failure in &self.failures {
                let _ = writeln!(out, "  {} ({}): {}", failure.title, failure.id, failure.error);
            }
        }
        out
    }
}

/// A top-level section; a section that failed this run is listed with no pages.
fn category_entry(section: &PageNode, site_root: &Path) -> Result<CategoryEntry, AppError> {
    let pages: Vec<&PageNode> = section.walk().into_iter().filter(|p| p.is_synced()).collect();
    Ok(CategoryEntry {
        title: section.title.clone(),
        path: site_link(site_root, &section.dir)?,
        page_count: pages.len(),
        updated_count: pages
            .iter()
            .filter(|p| p.decision == Some(ChangeDecision::Updated))
            .count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::HashIndex;
    use crate::sync::mapper::PageFailure;
    use crate::types::NotionId;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn node(n: u8, title: &str, dir: &str, decision: ChangeDecision, children: Vec<PageNode>) -> PageNode {
        PageNode {
            id: NotionId::parse(&format!("{:032x}", n)).unwrap(),
            title: title.to_string(),
            slug: title.to_lowercase(),
            dir: PathBuf::from(dir),
            category: None,
            children,
            body: String::new(),
            digest: String::new(),
            decision: Some(decision),
            degraded: n == 4,
        }
    }

    fn site_map() -> SiteMap {
        let root = node(
            1,
            "Docs",
            "docs",
            ChangeDecision::Unchanged,
            vec![
                node(2, "A", "docs/a", ChangeDecision::Updated, vec![]),
                node(
                    3,
                    "B",
                    "docs/b",
                    ChangeDecision::Unchanged,
                    vec![node(4, "B1", "docs/b/b1", ChangeDecision::Skipped, vec![])],
                ),
            ],
        );
        SiteMap {
            root,
            failures: vec![PageFailure {
                title: "C".to_string(),
                id: NotionId::parse(&format!("{:032x}", 5)).unwrap(),
                error: "object_not_found".to_string(),
            }],
            hashes: HashIndex::default(),
            files_written: 1,
        }
    }

    #[test]
    fn test_counts_and_categories() {
        let time = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let report =
            SyncReport::new(&site_map(), SyncType::Incremental, Path::new("docs"), time).unwrap();

        assert_eq!(report.sync_time, "2024-03-01T10:00:00.000Z");
        assert_eq!(report.total_categories, 2);
        assert_eq!(report.total_pages, 4);
        assert_eq!(report.updated_pages, 1);
        assert_eq!(report.unchanged_pages, 2);
        assert_eq!(report.skipped_pages, 1);
        assert_eq!(report.degraded_pages, 1);
        assert!(report.has_failures());
        assert_eq!(
            report.categories[1],
            CategoryEntry {
                title: "B".to_string(),
                path: "/b/".to_string(),
                page_count: 2,
                updated_count: 0,
            }
        );
    }

    #[test]
    fn test_json_shape() {
        let time = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let report = SyncReport::new(&site_map(), SyncType::DryRun, Path::new("docs"), time).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["syncType"], "dry-run");
        assert_eq!(json["updatedPages"], 1);
        assert_eq!(json["categories"][0]["pageCount"], 1);
        assert_eq!(json["failures"][0]["title"], "C");
        assert!(json.get("postsExported").is_none());
    }

    #[test]
    fn test_summary_names_failures() {
        let time = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let report = SyncReport::new(&site_map(), SyncType::Full, Path::new("docs"), time)
            .unwrap()
            .with_posts_exported(3);
        let summary = report.summary();

        assert!(summary.starts_with("Synced 4 pages in 2 categories: 1 updated"));
        assert!(summary.contains("Exported 3 posts"));
        assert!(summary.contains("C (00000000-0000-0000-0000-000000000005): object_not_found"));
    }

    #[test]
    fn test_failed_section_keeps_its_category() {
        let time = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let mut map = site_map();
        let mut failed = node(5, "C", "docs/c", ChangeDecision::Unchanged, vec![]);
        failed.decision = None;
        map.root.children.push(failed);

        let report = SyncReport::new(&map, SyncType::Incremental, Path::new("docs"), time).unwrap();

        assert_eq!(report.total_pages, 4);
        assert_eq!(report.unchanged_pages, 2);
        assert_eq!(report.total_categories, 3);
        assert_eq!(
            report.categories[2],
            CategoryEntry {
                title: "C".to_string(),
                path: "/c/".to_string(),
                page_count: 0,
                updated_count: 0,
            }
        );
    }

    #[test]
    fn test_sync_type_from_flags() {
        assert_eq!(SyncType::from_flags(true, true), SyncType::DryRun);
        assert_eq!(SyncType::from_flags(true, false), SyncType::Full);
        assert_eq!(SyncType::from_flags(false, false), SyncType::Incremental);
    }
}
