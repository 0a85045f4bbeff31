// src/output/writer.rs
//! Performs the actual file I/O for generated documents and artifacts.
//!
//! Every write is a single atomic replacement: the content goes to a
//! temporary file in the target directory, which is then renamed over the
//! target. An interrupted run never leaves a half-written document behind.

use crate::error::AppError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes `content` to `path` atomically, creating parent directories.
///
/// Returns the number of bytes written.
pub fn write_atomic(path: &Path, content: &str) -> Result<usize, AppError> {
    log::debug!("Writing {} bytes to {}", content.len(), path.display());

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;

    let file_name = path
        .file_name()
        .ok_or_else(|| AppError::PathError(format!("{} has no file name", path.display())))?;
    let temp_path = parent.join(format!(
        ".{}.{}.tmp",
        file_name.to_string_lossy(),
        std::process::id()
    ));

    let result = write_and_sync(&temp_path, content).and_then(|_| fs::rename(&temp_path, path));
    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(AppError::Io(e));
    }

    log::debug!("Wrote file: {}", path.display());
    Ok(content.len())
}

fn write_and_sync(path: &Path, content: &str) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()
}

/// Serializes `value` as pretty JSON and writes it atomically.
pub fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<usize, AppError> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    write_atomic(path, &json)
}
