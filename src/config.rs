// src/config.rs
use crate::api::CachePolicy;
use crate::constants::{
    DEFAULT_BLOCK_DEPTH, DEFAULT_CACHE_DIR, DEFAULT_CACHE_TTL_SECS, DEFAULT_SKIP_TITLES,
};
use crate::error::AppError;
use crate::formatting::ChildPagePolicy;
use crate::types::{ApiKey, NotionId};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Directory under the site root where generated site artifacts live.
const SITE_CONFIG_DIR: &str = ".vitepress";

/// Parsed command-line input.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Syncs a Notion page tree into a Markdown docs site", long_about = None)]
pub struct CommandLineInput {
    /// Root Notion page URL or ID (defaults to NOTION_ROOT_PAGE_ID)
    pub root: Option<String>,

    /// Directory the root page is written to
    #[arg(short, long, default_value = "docs")]
    pub output_dir: String,

    /// Site root that navigation links are relative to (defaults to the output dir)
    #[arg(long)]
    pub site_root: Option<String>,

    /// Ignore the cache and rewrite every page
    #[arg(long, default_value_t = false)]
    pub full: bool,

    /// Report what would change without writing anything
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// How deep nested blocks are expanded within a page
    #[arg(long, default_value_t = DEFAULT_BLOCK_DEPTH)]
    pub max_depth: u8,

    /// Directory for cached API responses
    #[arg(long, default_value = DEFAULT_CACHE_DIR)]
    pub cache_dir: String,

    /// Cache TTL in seconds
    #[arg(long, default_value_t = DEFAULT_CACHE_TTL_SECS)]
    pub cache_ttl: u64,

    /// Disable response caching entirely
    #[arg(long, default_value_t = false)]
    pub no_cache: bool,

    /// Delete all cached responses before syncing
    #[arg(long, default_value_t = false)]
    pub clear_cache: bool,

    /// Page title to leave out of the site (repeatable)
    #[arg(long = "skip-title")]
    pub skip_titles: Vec<String>,

    /// Link child pages inline where they appear instead of listing them in a contents section
    #[arg(long, default_value_t = false)]
    pub inline_child_links: bool,

    /// Do not overwrite pages edited locally since the last sync
    #[arg(long, default_value_t = false)]
    pub protect_local_edits: bool,

    /// Database to export as blog posts (defaults to NOTION_DATABASE_ID)
    #[arg(long)]
    pub database: Option<String>,

    /// Navigation JSON path
    #[arg(long)]
    pub nav_file: Option<String>,

    /// Sync report JSON path
    #[arg(long)]
    pub report_file: Option<String>,

    /// Page hash index path
    #[arg(long)]
    pub hash_index: Option<String>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Resolved sync configuration, validated and ready to drive a run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub root_id: NotionId,
    pub api_key: ApiKey,
    pub database_id: Option<NotionId>,
    pub output_dir: PathBuf,
    pub site_root: PathBuf,
    pub block_depth: u8,
    pub full: bool,
    pub dry_run: bool,
    pub cache_dir: PathBuf,
    pub cache_ttl: Duration,
    pub cache_policy: CachePolicy,
    pub clear_cache: bool,
    pub skip_titles: Vec<String>,
    pub child_pages: ChildPagePolicy,
    pub protect_local_edits: bool,
    pub nav_file: PathBuf,
    pub report_file: PathBuf,
    pub posts_file: PathBuf,
    pub hash_index: PathBuf,
    pub verbose: bool,
}

impl SyncConfig {
    /// Resolves the configuration from CLI input and the process environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        Self::resolve_with(cli, |name| std::env::var(name).ok())
    }

    /// Resolves the configuration with an explicit environment lookup.
    pub fn resolve_with<F>(cli: CommandLineInput, env: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let first_set = |names: &[&str]| {
            names
                .iter()
                .find_map(|name| env(*name).filter(|v| !v.trim().is_empty()))
        };

        let api_key = first_set(&["NOTION_API_KEY", "NOTION_TOKEN"]).ok_or_else(|| {
            AppError::MissingConfiguration(
                "NOTION_API_KEY environment variable not set".to_string(),
            )
        })?;
        let api_key = ApiKey::new(api_key)?;

        let root = cli
            .root
            .clone()
            .or_else(|| first_set(&["NOTION_ROOT_PAGE_ID", "NOTION_MAIN_PAGE_ID"]))
            .ok_or_else(|| {
                AppError::MissingConfiguration(
                    "no root page given and NOTION_ROOT_PAGE_ID is not set".to_string(),
                )
            })?;
        let root_id = NotionId::parse(&root)?;

        let database_id = cli
            .database
            .clone()
            .or_else(|| first_set(&["NOTION_DATABASE_ID"]))
            .map(|id| NotionId::parse(&id))
            .transpose()?;

        let output_dir = PathBuf::from(&cli.output_dir);
        let site_root = cli
            .site_root
            .map(PathBuf::from)
            .unwrap_or_else(|| output_dir.clone());
        let site_config = site_root.join(SITE_CONFIG_DIR);
        let artifact = |given: Option<String>, default_name: &str| {
            given
                .map(PathBuf::from)
                .unwrap_or_else(|| site_config.join(default_name))
        };

        let skip_titles = if cli.skip_titles.is_empty() {
            DEFAULT_SKIP_TITLES.iter().map(|t| t.to_string()).collect()
        } else {
            cli.skip_titles
        };

        let cache_policy = if cli.no_cache {
            CachePolicy::DISABLED
        } else {
            CachePolicy {
                read: !cli.full,
                write: !cli.dry_run,
            }
        };

        Ok(SyncConfig {
            root_id,
            api_key,
            database_id,
            nav_file: artifact(cli.nav_file, "navigation.json"),
            report_file: artifact(cli.report_file, "notion-sync-report.json"),
            hash_index: artifact(cli.hash_index, "page-hashes.json"),
            posts_file: site_root.join("public").join("notion-data.json"),
            output_dir,
            site_root,
            block_depth: cli.max_depth,
            full: cli.full,
            dry_run: cli.dry_run,
            cache_dir: PathBuf::from(cli.cache_dir),
            cache_ttl: Duration::from_secs(cli.cache_ttl),
            cache_policy,
            clear_cache: cli.clear_cache,
            skip_titles,
            child_pages: if cli.inline_child_links {
                ChildPagePolicy::Link
            } else {
                ChildPagePolicy::Omit
            },
            protect_local_edits: cli.protect_local_edits,
            verbose: cli.verbose,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    const KEY: &str = "secret_abcdefghijklmnopqrstuvwxyz";
    const ROOT: &str = "550e8400e29b41d4a716446655440000";

    fn cli(args: &[&str]) -> CommandLineInput {
        let mut argv = vec!["notion2docs"];
        argv.extend_from_slice(args);
        CommandLineInput::parse_from(argv)
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            SyncConfig::resolve_with(cli(&[ROOT]), env(&[("NOTION_API_KEY", KEY)])).unwrap();

        assert_eq!(config.root_id.as_str(), ROOT);
        assert_eq!(config.output_dir, PathBuf::from("docs"));
        assert_eq!(config.site_root, PathBuf::from("docs"));
        assert_eq!(config.nav_file, PathBuf::from("docs/.vitepress/navigation.json"));
        assert_eq!(config.hash_index, PathBuf::from("docs/.vitepress/page-hashes.json"));
        assert_eq!(config.posts_file, PathBuf::from("docs/public/notion-data.json"));
        assert_eq!(config.block_depth, 10);
        assert_eq!(config.cache_ttl, Duration::from_secs(3600));
        assert_eq!(config.cache_policy, CachePolicy::READ_WRITE);
        assert_eq!(config.skip_titles, vec!["About"]);
        assert_eq!(config.child_pages, ChildPagePolicy::Omit);
        assert!(config.database_id.is_none());
    }

    #[test]
    fn test_legacy_environment_names() {
        let token = format!("Bearer {}", KEY);
        let config = SyncConfig::resolve_with(
            cli(&[]),
            env(&[
                ("NOTION_TOKEN", token.as_str()),
                ("NOTION_MAIN_PAGE_ID", ROOT),
                ("NOTION_DATABASE_ID", "12345678123456781234567812345678"),
            ]),
        )
        .unwrap();

        assert_eq!(config.api_key.as_str(), KEY);
        assert_eq!(config.root_id.as_str(), ROOT);
        assert!(config.database_id.is_some());
    }

    #[test]
    fn test_missing_key_and_root() {
        let err = SyncConfig::resolve_with(cli(&[ROOT]), env(&[])).unwrap_err();
        assert!(matches!(err, AppError::MissingConfiguration(_)));

        let err = SyncConfig::resolve_with(cli(&[]), env(&[("NOTION_API_KEY", KEY)])).unwrap_err();
        assert!(matches!(err, AppError::MissingConfiguration(_)));
    }

    #[test]
    fn test_cache_policy_follows_flags() {
        let resolve = |args: &[&str]| {
            SyncConfig::resolve_with(cli(args), env(&[("NOTION_API_KEY", KEY)]))
                .unwrap()
                .cache_policy
        };

        assert_eq!(
            resolve(&[ROOT, "--full"]),
            CachePolicy {
                read: false,
                write: true
            }
        );
        assert_eq!(
            resolve(&[ROOT, "--dry-run"]),
            CachePolicy {
                read: true,
                write: false
            }
        );
        assert_eq!(resolve(&[ROOT, "--no-cache", "--full"]), CachePolicy::DISABLED);
    }

    #[test]
    fn test_site_root_and_overrides() {
        let config = SyncConfig::resolve_with(
            cli(&[
                ROOT,
                "--output-dir",
                "site/docs",
                "--site-root",
                "site",
                "--skip-title",
                "Drafts",
                "--skip-title",
                "Archive",
                "--inline-child-links",
                "--report-file",
                "report.json",
            ]),
            env(&[("NOTION_API_KEY", KEY)]),
        )
        .unwrap();

        assert_eq!(config.nav_file, PathBuf::from("site/.vitepress/navigation.json"));
        assert_eq!(config.report_file, PathBuf::from("report.json"));
        assert_eq!(config.skip_titles, vec!["Drafts", "Archive"]);
        assert_eq!(config.child_pages, ChildPagePolicy::Link);
    }
}
