// src/output/mod.rs
//! Filesystem projection: slugs and paths (pure), change detection, and
//! the writer, which is the only place documents hit the disk.

pub mod change;
pub mod paths;
mod writer;

// Re-export the public interface
pub use change::{content_digest, ChangeDecision, ChangeDetector, HashIndex};
pub use paths::{child_link, index_path, site_link, slugify};
pub use writer::{write_atomic, write_json};
