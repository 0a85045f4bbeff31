// src/output/paths.rs
//! Pure functions for slugs, output paths and site links.
//!
//! This module handles all path-related operations without
//! performing any I/O operations.

use crate::constants::{INDEX_FILE_NAME, UNTITLED_SLUG};
use crate::error::AppError;
use regex::Regex;
use std::path::{Component, Path, PathBuf};

lazy_static::lazy_static! {
    // Unicode word characters cover Latin, accented and CJK ideographs alike.
    static ref NON_SLUG_CHARS: Regex =
        Regex::new(r"[^\w\s-]").expect("slug character class is valid");
    static ref SEPARATOR_RUNS: Regex =
        Regex::new(r"[\s-]+").expect("separator pattern is valid");
}

/// Derives a URL-safe slug from a page title.
///
/// Characters other than word characters, whitespace and hyphens are
/// dropped, whitespace runs become single hyphens, the result is trimmed of
/// hyphens and lowercased. Never returns an empty string.
pub fn slugify(title: &str) -> String {
    let kept = NON_SLUG_CHARS.replace_all(title, "");
    let hyphenated = SEPARATOR_RUNS.replace_all(kept.trim(), "-");
    let slug = hyphenated.trim_matches('-').to_lowercase();

    if slug.is_empty() {
        UNTITLED_SLUG.to_string()
    } else {
        slug
    }
}

/// The Markdown document for a page directory.
pub fn index_path(page_dir: &Path) -> PathBuf {
    page_dir.join(INDEX_FILE_NAME)
}

/// Link from a page to one of its direct children.
pub fn child_link(slug: &str) -> String {
    format!("./{}/", slug)
}

/// Site-absolute link (`/guide/setup/`) for a page directory under `site_root`.
pub fn site_link(site_root: &Path, page_dir: &Path) -> Result<String, AppError> {
    let relative = pathdiff::diff_paths(page_dir, site_root).ok_or_else(|| {
        AppError::PathError(format!(
            "Could not calculate path of {} relative to {}",
            page_dir.display(),
            site_root.display()
        ))
    })?;

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => segments.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => {
                return Err(AppError::PathError(format!(
                    "{} is outside the site root {}",
                    page_dir.display(),
                    site_root.display()
                )))
            }
        }
    }

    if segments.is_empty() {
        Ok("/".to_string())
    } else {
        Ok(format!("/{}/", segments.join("/")))
    }
}

/// Path of `path` relative to `base`, with forward slashes.
pub fn relative_key(base: &Path, path: &Path) -> String {
    pathdiff::diff_paths(path, base)
        .unwrap_or_else(|| path.to_path_buf())
        .to_string_lossy()
        .replace('\\', "/")
}
