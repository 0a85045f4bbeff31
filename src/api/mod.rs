// src/api/mod.rs
//! Notion API interaction: the ability to retrieve content from a workspace.
//!
//! Separates I/O (the repository), parsing, caching and the traversal
//! policy of the fetcher.

pub mod cache;
pub mod client;
mod fetcher;
pub mod parser;
mod simple_pagination;
mod types;

use crate::error::AppError;
use crate::types::NotionId;
use serde_json::Value;

/// The ability to retrieve raw content from a Notion workspace.
///
/// Each method is one remote round-trip. Business logic depends on this
/// trait, never on HTTP details; raw JSON is returned so that it can be
/// cached verbatim and parsed tolerantly.
#[async_trait::async_trait]
pub trait NotionRepository: Send + Sync {
    /// One page of the children of a block or page.
    async fn list_children(
        &self,
        parent: &NotionId,
        page_size: u32,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<Value>, AppError>;

    /// Page object with properties and timestamps.
    async fn retrieve_page(&self, id: &NotionId) -> Result<Value, AppError>;

    /// One page of database rows.
    async fn query_database(
        &self,
        id: &NotionId,
        page_size: u32,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<Value>, AppError>;
}

// Re-export the public interface
pub use cache::{CachePolicy, DiskCache};
pub use client::NotionHttpClient;
pub use fetcher::TreeFetcher;
pub use simple_pagination::fetch_all_pages;
pub use types::{BlockFailure, FetchedBlocks, PaginatedResponse, PaginationResult};
