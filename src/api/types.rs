// src/api/types.rs
//! Type definitions for the Notion API module.

use crate::types::NotionId;
use serde::Deserialize;

/// One page of a cursor-paginated list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginatedResponse<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

/// Concatenated results of a full pagination run.
#[derive(Debug, Clone)]
pub struct PaginationResult<T> {
    /// All items in received order
    pub items: Vec<T>,
    pub pages_fetched: u32,
}

/// A nested block whose children could not be fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockFailure {
    pub id: NotionId,
    pub error: String,
}

/// Block tree returned by the fetcher.
#[derive(Debug, Clone, Default)]
pub struct FetchedBlocks {
    pub blocks: Vec<crate::model::Block>,
    /// Set when some subtree gave up after exhausting its retries and was
    /// left empty.
    pub degraded: bool,
    /// Nested blocks that failed permanently; their children are left empty.
    pub failures: Vec<BlockFailure>,
}
