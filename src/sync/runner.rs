// src/sync/runner.rs
//! One complete sync run: pages, then the artifacts derived from them.

use super::mapper::{MapperOptions, SiteMapper};
use super::navigation::project_navigation;
use super::posts::PostsExport;
use super::report::{FailureEntry, SyncReport, SyncType};
use super::write_artifact;
use crate::api::TreeFetcher;
use crate::config::SyncConfig;
use crate::error::AppError;
use crate::output::{write_json, ChangeDecision, ChangeDetector, HashIndex};
use chrono::Utc;

/// What a run produced.
#[derive(Debug)]
pub struct SyncOutcome {
    pub report: SyncReport,
    /// Documents and artifacts whose bytes changed on disk. The report
    /// file, which is rewritten every run, is not counted.
    pub files_written: usize,
}

impl SyncOutcome {
    pub fn succeeded(&self) -> bool {
        !self.report.has_failures()
    }
}

/// Runs a sync as configured.
///
/// Remote failures below the root end up in the report; a failing root
/// page, an unreadable output directory or a failed write is returned as
/// an error.
pub async fn run_sync(fetcher: &TreeFetcher, config: &SyncConfig) -> Result<SyncOutcome, AppError> {
    let dry_run = config.dry_run;
    let previous = HashIndex::load(&config.hash_index);
    let detector = ChangeDetector::new(&config.output_dir, previous)
        .forcing(config.full)
        .protecting_local_edits(config.protect_local_edits);
    let options = MapperOptions {
        block_depth: config.block_depth,
        child_pages: config.child_pages,
        skip_titles: config.skip_titles.clone(),
        dry_run,
    };

    let map = SiteMapper::new(fetcher, &detector, &options)
        .map(&config.root_id, &config.output_dir)
        .await?;

    let mut files_written = map.files_written;
    let mut count = |decision: ChangeDecision| {
        if decision == ChangeDecision::Updated && !dry_run {
            files_written += 1;
        }
    };

    let navigation = project_navigation(&map.root, &config.site_root)?;
    count(write_artifact(&config.nav_file, &navigation, dry_run)?);

    let mut posts_exported = None;
    let mut extra_failures = Vec::new();
    if let Some(database_id) = &config.database_id {
        match fetcher.query_database(database_id).await {
            Ok(rows) => {
                let export = PostsExport::from_rows(&rows);
                log::info!("Exporting {} posts", export.total);
                posts_exported = Some(export.total);
                count(write_artifact(&config.posts_file, &export, dry_run)?);
            }
            Err(e) if e.is_remote() => {
                log::error!("Failed to export database {}: {}", database_id, e);
                extra_failures.push(FailureEntry {
                    title: "posts database".to_string(),
                    id: database_id.to_hyphenated(),
                    error: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    if !dry_run {
        count(write_artifact(&config.hash_index, &map.hashes, false)?);
    }

    let sync_type = SyncType::from_flags(config.full, dry_run);
    let mut report = SyncReport::new(&map, sync_type, &config.site_root, Utc::now())?;
    report.failures.extend(extra_failures);
    if let Some(posts) = posts_exported {
        report = report.with_posts_exported(posts);
    }

    if !dry_run {
        write_json(&config.report_file, &report)?;
    }

    Ok(SyncOutcome {
        report,
        files_written,
    })
}
