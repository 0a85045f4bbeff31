// src/output/change.rs
//! Content-hash change detection.
//!
//! A document is only written when its digest differs from what is already
//! on disk. The hash index remembers the digest of every file as last
//! written by a sync, which is how local edits are told apart from stale
//! output.

use super::paths::relative_key;
use crate::error::AppError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Outcome of comparing fresh content with the file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDecision {
    /// Identical digest; nothing to write
    Unchanged,
    /// Missing or different; the file must be (re)written
    Updated,
    /// Edited locally since the last sync and protected from overwrite
    Skipped,
}

/// SHA-256 of `content`, lowercase hex.
pub fn content_digest(content: &str) -> String {
    format!("{:x}", Sha256::digest(content.as_bytes()))
}

/// Output-relative path to digest, in the order pages were visited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashIndex {
    entries: IndexMap<String, String>,
}

impl HashIndex {
    /// Loads an index; a missing or unreadable file yields an empty one.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                log::warn!("Cannot read hash index {}: {}", path.display(), e);
                return Self::default();
            }
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("Ignoring corrupt hash index {}: {}", path.display(), e);
            Self::default()
        })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn record(&mut self, key: impl Into<String>, digest: impl Into<String>) {
        self.entries.insert(key.into(), digest.into());
    }

    /// Entries in recorded order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        super::writer::write_json(path, self)?;
        Ok(())
    }
}

/// Decides whether a rendered document needs writing.
///
/// Reads the existing file and nothing else: no network, no clock.
#[derive(Debug, Clone)]
pub struct ChangeDetector {
    root: PathBuf,
    force: bool,
    protect_local_edits: bool,
    previous: HashIndex,
}

impl ChangeDetector {
    /// `root` is the directory index keys are relative to.
    pub fn new(root: impl Into<PathBuf>, previous: HashIndex) -> Self {
        Self {
            root: root.into(),
            force: false,
            protect_local_edits: false,
            previous,
        }
    }

    /// Treat every document as changed.
    pub fn forcing(self, force: bool) -> Self {
        Self { force, ..self }
    }

    /// Refuse to overwrite files edited since the last sync.
    pub fn protecting_local_edits(self, protect_local_edits: bool) -> Self {
        Self {
            protect_local_edits,
            ..self
        }
    }

    /// Index key for an output path.
    pub fn key_for(&self, path: &Path) -> String {
        relative_key(&self.root, path)
    }

    /// The index loaded at the start of the run.
    pub fn previous(&self) -> &HashIndex {
        &self.previous
    }

    /// Digest last recorded for `path`, if any.
    pub fn recorded_digest(&self, path: &Path) -> Option<&str> {
        self.previous.get(&self.key_for(path))
    }

    pub fn decide(&self, path: &Path, new_content: &str) -> Result<ChangeDecision, AppError> {
        if self.force {
            return Ok(ChangeDecision::Updated);
        }

        let existing = match std::fs::read_to_string(path) {
            Ok(existing) => existing,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ChangeDecision::Updated)
            }
            Err(e) => return Err(e.into()),
        };

        let existing_digest = content_digest(&existing);
        if existing_digest == content_digest(new_content) {
            return Ok(ChangeDecision::Unchanged);
        }

        if self.protect_local_edits {
            if let Some(recorded) = self.recorded_digest(path) {
                if recorded != existing_digest {
                    return Ok(ChangeDecision::Skipped);
                }
            }
        }

        Ok(ChangeDecision::Updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_digest_is_stable_hex() {
        let digest = content_digest("hello");
        assert_eq!(digest.len(), 64);
        assert_eq!(
            digest,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_missing_equal_and_different() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.md");
        let detector = ChangeDetector::new(dir.path(), HashIndex::default());

        assert_eq!(detector.decide(&path, "a").unwrap(), ChangeDecision::Updated);
        fs::write(&path, "a").unwrap();
        assert_eq!(
            detector.decide(&path, "a").unwrap(),
            ChangeDecision::Unchanged
        );
        assert_eq!(detector.decide(&path, "b").unwrap(), ChangeDecision::Updated);
    }

    #[test]
    fn test_force_always_updates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.md");
        fs::write(&path, "a").unwrap();
        let detector = ChangeDetector::new(dir.path(), HashIndex::default()).forcing(true);
        assert_eq!(detector.decide(&path, "a").unwrap(), ChangeDecision::Updated);
    }

    #[test]
    fn test_local_edits_are_protected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guide/index.md");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "edited by hand").unwrap();

        let mut index = HashIndex::default();
        index.record("guide/index.md", content_digest("as synced"));

        let unprotected = ChangeDetector::new(dir.path(), index.clone());
        assert_eq!(
            unprotected.decide(&path, "fresh").unwrap(),
            ChangeDecision::Updated
        );

        let protected = ChangeDetector::new(dir.path(), index).protecting_local_edits(true);
        assert_eq!(
            protected.decide(&path, "fresh").unwrap(),
            ChangeDecision::Skipped
        );
    }

    #[test]
    fn test_unedited_files_are_updated_under_protection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.md");
        fs::write(&path, "as synced").unwrap();

        let mut index = HashIndex::default();
        index.record("index.md", content_digest("as synced"));
        let detector = ChangeDetector::new(dir.path(), index).protecting_local_edits(true);

        assert_eq!(
            detector.decide(&path, "fresh").unwrap(),
            ChangeDecision::Updated
        );
    }

    #[test]
    fn test_index_round_trip_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".vitepress/page-hashes.json");

        let mut index = HashIndex::default();
        index.record("index.md", "1");
        index.record("b/index.md", "2");
        index.record("a/index.md", "3");
        index.save(&path).unwrap();

        let loaded = HashIndex::load(&path);
        assert_eq!(loaded, index);
        let saved = fs::read_to_string(&path).unwrap();
        assert!(saved.find("b/index.md") < saved.find("a/index.md"));
    }

    #[test]
    fn test_corrupt_index_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hashes.json");
        fs::write(&path, "[1,2").unwrap();
        assert!(HashIndex::load(&path).is_empty());
    }
}
