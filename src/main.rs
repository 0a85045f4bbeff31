// src/main.rs

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion2docs::{
    run_sync, CommandLineInput, DiskCache, NotionHttpClient, NotionRepository, SyncConfig,
    SyncOutcome, TreeFetcher,
};
use std::fs;
use std::process::ExitCode;
use std::sync::Arc;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let log_file_path = std::env::temp_dir().join("notion2docs.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(log_level)))
                .build("stdout", Box::new(stdout_appender)),
        )
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(LevelFilter::Debug),
        )?;

    log4rs::init_config(config)?;
    log::debug!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Wires the HTTP client, cache and fetcher together for one run.
struct NotionToDocs<'a> {
    config: &'a SyncConfig,
}

impl<'a> NotionToDocs<'a> {
    fn new(config: &'a SyncConfig) -> Self {
        Self { config }
    }

    fn cache(&self) -> DiskCache {
        DiskCache::new(&self.config.cache_dir, self.config.cache_ttl)
            .with_policy(self.config.cache_policy)
    }

    async fn clear_cache(&self) -> anyhow::Result<()> {
        let removed = self.cache().clear().await.with_context(|| {
            format!(
                "Failed to clear cache at {}",
                self.config.cache_dir.display()
            )
        })?;
        log::info!("Removed {} cached responses", removed);
        Ok(())
    }

    fn fetcher(&self) -> anyhow::Result<TreeFetcher> {
        let client = NotionHttpClient::new(&self.config.api_key)
            .context("Failed to create the Notion HTTP client")?;
        let repository: Arc<dyn NotionRepository> = Arc::new(client);

        let policy = self.config.cache_policy;
        if policy.read || policy.write {
            log::debug!(
                "Cache at {} (TTL: {}s, read: {}, write: {})",
                self.config.cache_dir.display(),
                self.config.cache_ttl.as_secs(),
                policy.read,
                policy.write
            );
            Ok(TreeFetcher::new(repository).with_cache(self.cache()))
        } else {
            log::debug!("Cache disabled; all requests go to the Notion API");
            Ok(TreeFetcher::new(repository))
        }
    }

    async fn sync(&self) -> anyhow::Result<SyncOutcome> {
        if self.config.clear_cache {
            self.clear_cache().await?;
        }

        let fetcher = self.fetcher()?;
        let outcome = run_sync(&fetcher, self.config)
            .await
            .with_context(|| format!("Sync of {} failed", self.config.root_id))?;

        println!("{}", outcome.report.summary().trim_end());
        if self.config.dry_run {
            println!("Dry run: nothing was written.");
        } else {
            println!(
                "✓ {} files written; report saved to {}",
                outcome.files_written,
                self.config.report_file.display()
            );
        }
        Ok(outcome)
    }
}

async fn run(cli: CommandLineInput) -> anyhow::Result<SyncOutcome> {
    let config = SyncConfig::resolve(cli).context("Invalid configuration")?;
    NotionToDocs::new(&config).sync().await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CommandLineInput::parse();

    if let Err(e) = setup_logging(cli.verbose) {
        eprintln!("Failed to set up logging: {:#}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(outcome) if outcome.succeeded() => ExitCode::SUCCESS,
        Ok(_) => {
            log::error!("Some pages could not be synced");
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
