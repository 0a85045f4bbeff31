//! notion2docs library: mirrors a Notion page tree into a Markdown docs site.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `ValidationError`
//! - **Configuration**: `CommandLineInput`, `SyncConfig`
//! - **Domain model**: `Block`, `RichTextRun`, `PageSummary`, `DatabaseRow`
//! - **Domain types**: `NotionId`, `ApiKey`, `ValidatedUrl`
//! - **API client**: `NotionRepository`, `NotionHttpClient`, `TreeFetcher`, `DiskCache`
//! - **Formatting**: `render_blocks`, `format_block`, `RenderContext`
//! - **Output**: `slugify`, `ChangeDetector`, `HashIndex`
//! - **Sync**: `SiteMapper`, `run_sync`, `SyncReport`

pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod error_recovery;
pub mod formatting;
pub mod model;
pub mod output;
pub mod sync;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, NotionErrorCode};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, SyncConfig};

// --- Domain Model ---
pub use crate::model::{Annotations, Block, BlockCommon, DatabaseRow, PageSummary, RichTextRun};

// --- Domain Types ---
pub use crate::types::{ApiKey, NotionId, ValidatedUrl};

// --- API Client ---
pub use crate::api::{
    CachePolicy, DiskCache, FetchedBlocks, NotionHttpClient, NotionRepository, PaginatedResponse,
    TreeFetcher,
};
pub use crate::error_recovery::RetryPolicy;

// --- Formatting ---
pub use crate::formatting::{
    format_block, render_blocks, ChildPagePolicy, ChildSlugResolver, Fragment, RenderContext,
};

// --- Output ---
pub use crate::output::{slugify, ChangeDecision, ChangeDetector, HashIndex};

// --- Sync ---
pub use crate::sync::{
    run_sync, MapperOptions, NavItem, PageNode, PostsExport, SiteMap, SiteMapper, SyncOutcome,
    SyncReport, SyncType,
};
