// src/sync/document.rs
//! Assembles the Markdown document written for one page.
//!
//! A document is YAML front matter, a title heading, an optional contents
//! section linking the page's children, and the rendered body. Only values
//! that come from the remote page go in, so the same remote state always
//! produces the same bytes.

use crate::constants::CONTENTS_HEADING;
use crate::error::AppError;
use crate::output::child_link;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Front matter keys read by the site generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontMatter {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl FrontMatter {
    pub fn new(
        title: &str,
        category: Option<&str>,
        last_edited: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            title: title.to_string(),
            description: title.to_string(),
            category: category.map(str::to_string),
            last_updated: last_edited.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true)),
        }
    }

    fn to_yaml(&self) -> Result<String, AppError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// One entry of a page's contents section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentsLink {
    pub title: String,
    pub slug: String,
}

/// Builds the full document text.
///
/// `contents` is rendered only when non-empty; pass an empty slice when
/// child pages are linked inline in the body instead.
pub fn assemble_document(
    front_matter: &FrontMatter,
    contents: &[ContentsLink],
    body: &str,
) -> Result<String, AppError> {
    let mut document = String::new();
    document.push_str("---\n");
    document.push_str(&front_matter.to_yaml()?);
    document.push_str("---\n\n");

    document.push_str(&format!("# {}\n", front_matter.title));

    if !contents.is_empty() {
        document.push('\n');
        document.push_str(CONTENTS_HEADING);
        document.push_str("\n\n");
        for link in contents {
            document.push_str(&format!("- [{}]({})\n", link.title, child_link(&link.slug)));
        }
    }

    let body = body.trim();
    if !body.is_empty() {
        document.push('\n');
        document.push_str(body);
        document.push('\n');
    }

    Ok(document)
}
