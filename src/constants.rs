// src/constants.rs
//! Domain constants that define the operational boundaries of a sync run.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100. We use the maximum to minimize
/// round-trips while walking a page.
pub const NOTION_API_PAGE_SIZE: usize = 100;

/// Protocol version sent with every request.
pub const NOTION_API_VERSION: &str = "2022-06-28";

pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";

/// Upper bound on a single HTTP round-trip.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Pause between consecutive remote calls, independent of backoff.
pub const RATE_COURTESY_DELAY: Duration = Duration::from_millis(150);

// ---------------------------------------------------------------------------
// Retry policy
// ---------------------------------------------------------------------------

pub const RETRY_MAX_RETRIES: u32 = 3;
pub const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);
pub const RETRY_MAX_DELAY: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Traversal boundaries
// ---------------------------------------------------------------------------

/// Default nesting depth for block children inside one page.
pub const DEFAULT_BLOCK_DEPTH: u8 = 10;

/// Maximum nesting depth of child pages below the root.
///
/// Notion pages can nest arbitrarily deep. 50 levels is far deeper than
/// any real workspace; the cap keeps a corrupted tree from running away.
pub const MAX_PAGE_DEPTH: usize = 50;

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

pub const DEFAULT_CACHE_DIR: &str = ".notion-cache";

/// Cached responses older than this are ignored.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

// ---------------------------------------------------------------------------
// Rendered output
// ---------------------------------------------------------------------------

/// Slug used when a title has no slug-safe characters at all.
pub const UNTITLED_SLUG: &str = "untitled";

/// Icon for callouts that carry no emoji of their own.
pub const DEFAULT_CALLOUT_ICON: &str = "💡";

pub const CONTENTS_HEADING: &str = "## Contents";

/// File name of every generated page document.
pub const INDEX_FILE_NAME: &str = "index.md";

/// Titles excluded from the generated tree unless overridden.
pub const DEFAULT_SKIP_TITLES: &[&str] = &["About"];

/// Estimated characters per block, used to pre-allocate output strings.
pub const CHARS_PER_BLOCK_ESTIMATE: usize = 256;

// ---------------------------------------------------------------------------
// Database posts export
// ---------------------------------------------------------------------------

pub const EXCERPT_MAX_CHARS: usize = 200;
pub const DEFAULT_POST_TAG: &str = "Uncategorized";

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
