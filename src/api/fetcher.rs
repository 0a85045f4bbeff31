// src/api/fetcher.rs
//! Retrieves block trees, page metadata and database rows.
//!
//! Every remote call goes through the same path: cache lookup, courtesy
//! pause, retry with backoff, then cache store. Raw JSON is cached and
//! parsed afterwards, so cached and live data take the same route.

use super::cache::DiskCache;
use super::parser::{parse_blocks, parse_database_row, parse_page_summary};
use super::simple_pagination::fetch_all_pages;
use super::types::{BlockFailure, FetchedBlocks};
use super::NotionRepository;
use crate::constants::RATE_COURTESY_DELAY;
use crate::error::AppError;
use crate::error_recovery::{retry_with_backoff, RetryPolicy};
use crate::model::{Block, DatabaseRow, PageSummary};
use crate::types::NotionId;
use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub struct TreeFetcher {
    repository: Arc<dyn NotionRepository>,
    cache: Option<DiskCache>,
    retry: RetryPolicy,
    courtesy_delay: Duration,
}

impl TreeFetcher {
    pub fn new(repository: Arc<dyn NotionRepository>) -> Self {
        Self {
            repository,
            cache: None,
            retry: RetryPolicy::default(),
            courtesy_delay: RATE_COURTESY_DELAY,
        }
    }

    pub fn with_cache(self, cache: DiskCache) -> Self {
        Self {
            cache: Some(cache),
            ..self
        }
    }

    pub fn with_retry_policy(self, retry: RetryPolicy) -> Self {
        Self { retry, ..self }
    }

    pub fn with_courtesy_delay(self, courtesy_delay: Duration) -> Self {
        Self {
            courtesy_delay,
            ..self
        }
    }

    /// Fetches the ordered child blocks of a page or block.
    ///
    /// Blocks flagged with children are expanded recursively while `depth`
    /// is above zero; child pages are never expanded. A subtree whose
    /// fetch keeps failing transiently comes back empty and marked
    /// degraded. A permanent failure of the requested block itself is
    /// returned as an error; one below it only empties that block and is
    /// listed in [`FetchedBlocks::failures`].
    pub fn fetch_children<'a>(
        &'a self,
        id: &'a NotionId,
        depth: u8,
    ) -> BoxFuture<'a, Result<FetchedBlocks, AppError>> {
        async move {
            let raw = match self.list_all_children(id).await {
                Ok(raw) => raw,
                Err(e) if e.is_transient() => {
                    log::warn!(
                        "Giving up on children of {} after retries, continuing with empty content: {}",
                        id,
                        e
                    );
                    return Ok(FetchedBlocks {
                        blocks: Vec::new(),
                        degraded: true,
                        failures: Vec::new(),
                    });
                }
                Err(e) => return Err(e),
            };

            let mut blocks = parse_blocks(&raw);
            let mut degraded = false;
            let mut failures = Vec::new();

            if depth > 0 {
                for block in blocks.iter_mut() {
                    if !block.has_children() || matches!(block, Block::ChildPage(_)) {
                        continue;
                    }
                    let child_id = block.id().clone();
                    match self.fetch_children(&child_id, depth - 1).await {
                        Ok(nested) => {
                            degraded |= nested.degraded;
                            failures.extend(nested.failures);
                            block.set_children(nested.blocks);
                        }
                        Err(e) if e.is_remote() => {
                            log::error!("Failed to fetch children of block {}: {}", child_id, e);
                            failures.push(BlockFailure {
                                id: child_id,
                                error: e.to_string(),
                            });
                        }
                        Err(e) => return Err(e),
                    }
                }
            }

            Ok(FetchedBlocks {
                blocks,
                degraded,
                failures,
            })
        }
        .boxed()
    }

    /// Retrieves a page's title and edit time.
    pub async fn fetch_page(&self, id: &NotionId) -> Result<PageSummary, AppError> {
        let key = format!("page_{}", id.as_str());
        if let Some(cached) = self.cache_get(&key).await {
            return parse_page_summary(&cached);
        }

        self.pace().await;
        let raw = retry_with_backoff(|| self.repository.retrieve_page(id), &self.retry).await?;
        self.cache_set(&key, &raw).await;
        parse_page_summary(&raw)
    }

    /// Retrieves every row of a database in query order.
    pub async fn query_database(&self, id: &NotionId) -> Result<Vec<DatabaseRow>, AppError> {
        let key = format!("database_{}", id.as_str());
        let raw = match self.cache_get(&key).await {
            Some(Value::Array(rows)) => rows,
            _ => {
                let result = fetch_all_pages(|page_size, cursor| async move {
                    self.pace().await;
                    retry_with_backoff(
                        || self.repository.query_database(id, page_size, cursor.clone()),
                        &self.retry,
                    )
                    .await
                })
                .await?;
                self.cache_set(&key, &Value::Array(result.items.clone()))
                    .await;
                result.items
            }
        };

        Ok(raw.iter().filter_map(parse_database_row).collect())
    }

    async fn list_all_children(&self, id: &NotionId) -> Result<Vec<Value>, AppError> {
        let key = format!("blocks_{}", id.as_str());
        if let Some(Value::Array(cached)) = self.cache_get(&key).await {
            return Ok(cached);
        }

        let result = fetch_all_pages(|page_size, cursor| async move {
            self.pace().await;
            retry_with_backoff(
                || self.repository.list_children(id, page_size, cursor.clone()),
                &self.retry,
            )
            .await
        })
        .await?;

        log::debug!(
            "Fetched {} blocks under {} in {} request(s)",
            result.items.len(),
            id,
            result.pages_fetched
        );
        self.cache_set(&key, &Value::Array(result.items.clone()))
            .await;
        Ok(result.items)
    }

    async fn pace(&self) {
        if !self.courtesy_delay.is_zero() {
            tokio::time::sleep(self.courtesy_delay).await;
        }
    }

    async fn cache_get(&self, key: &str) -> Option<Value> {
        match &self.cache {
            Some(cache) => cache.get(key).await,
            None => None,
        }
    }

    async fn cache_set(&self, key: &str, payload: &Value) {
        if let Some(cache) = &self.cache {
            cache.set(key, payload).await;
        }
    }
}
