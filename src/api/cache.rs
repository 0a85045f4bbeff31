// src/api/cache.rs
//! Disk-based response cache for Notion API calls.
//!
//! Caches raw JSON responses keyed by purpose and object id (`blocks_<id>`,
//! `page_<id>`, `database_<id>`). Freshness is judged from the cache file's
//! modification time. The domain model is never serialized: cache hits are
//! re-parsed through the same parsers used for live responses.

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Which directions of cache traffic are enabled for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub read: bool,
    pub write: bool,
}

impl CachePolicy {
    pub const READ_WRITE: Self = Self {
        read: true,
        write: true,
    };
    pub const DISABLED: Self = Self {
        read: false,
        write: false,
    };
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::READ_WRITE
    }
}

/// TTL-based file cache for raw API responses.
///
/// Cache operations are best-effort: read/write failures are logged and
/// treated as a miss, so a broken cache never prevents fresh API calls.
/// Stale entries are ignored, not deleted; the next `set` overwrites them.
#[derive(Debug, Clone)]
pub struct DiskCache {
    cache_dir: PathBuf,
    ttl: Duration,
    policy: CachePolicy,
}

impl DiskCache {
    pub fn new(cache_dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            ttl,
            policy: CachePolicy::default(),
        }
    }

    pub fn with_policy(self, policy: CachePolicy) -> Self {
        Self { policy, ..self }
    }

    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the cached payload if present and younger than the TTL.
    pub async fn get(&self, key: &str) -> Option<Value> {
        if !self.policy.read {
            return None;
        }

        let path = self.key_to_path(key);
        let metadata = tokio::fs::metadata(&path).await.ok()?;
        let modified = metadata.modified().ok()?;
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);
        if age >= self.ttl {
            log::debug!("Cache stale: {} ({}s old)", key, age.as_secs());
            return None;
        }

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Cache read failed for {}: {}", key, e);
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(value) => {
                log::debug!("Cache hit: {}", key);
                Some(value)
            }
            Err(e) => {
                log::warn!("Ignoring corrupt cache entry {}: {}", key, e);
                None
            }
        }
    }

    /// Stores a payload, replacing any previous entry for the key.
    pub async fn set(&self, key: &str, payload: &Value) {
        if !self.policy.write {
            return;
        }

        if let Err(e) = tokio::fs::create_dir_all(&self.cache_dir).await {
            log::warn!(
                "Cannot create cache directory {}: {}",
                self.cache_dir.display(),
                e
            );
            return;
        }
        let json = match serde_json::to_string(payload) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Cannot serialize cache entry {}: {}", key, e);
                return;
            }
        };
        if let Err(e) = tokio::fs::write(self.key_to_path(key), json).await {
            log::warn!("Cache write failed for {}: {}", key, e);
        }
    }

    /// Removes every cache file. Returns how many were removed.
    pub async fn clear(&self) -> std::io::Result<usize> {
        let mut dir = match tokio::fs::read_dir(&self.cache_dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };

        let mut removed = 0;
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                tokio::fs::remove_file(&path).await?;
                removed += 1;
            }
        }
        log::info!(
            "Cleared {} cache entries from {}",
            removed,
            self.cache_dir.display()
        );
        Ok(removed)
    }

    fn key_to_path(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.cache_dir.join(format!("{}.json", safe))
    }
}
