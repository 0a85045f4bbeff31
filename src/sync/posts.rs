// src/sync/posts.rs
//! Exports the rows of a Notion database as blog post summaries.

use crate::constants::{DEFAULT_POST_TAG, EXCERPT_MAX_CHARS};
use crate::model::DatabaseRow;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// The `notion-data.json` payload read by the blog pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostsExport {
    pub success: bool,
    pub total: usize,
    pub posts: Vec<Post>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub created_time: Option<String>,
    pub last_edited_time: Option<String>,
    pub url: Option<String>,
}

impl PostsExport {
    pub fn from_rows(rows: &[DatabaseRow]) -> Self {
        let posts: Vec<Post> = rows.iter().map(Post::from_row).collect();
        Self {
            success: true,
            total: posts.len(),
            posts,
        }
    }
}

impl Post {
    fn from_row(row: &DatabaseRow) -> Self {
        let title = row
            .title()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| "Untitled".to_string());
        let tags = match row.first_multi_select() {
            Some(options) if !options.is_empty() => options.to_vec(),
            _ => vec![DEFAULT_POST_TAG.to_string()],
        };

        Self {
            id: row.id.to_hyphenated(),
            title,
            slug: format!("post-{}", row.id.as_str()),
            excerpt: excerpt(&row.first_rich_text().unwrap_or_default()),
            tags,
            created_time: row.created_time.map(timestamp),
            last_edited_time: row.last_edited_time.map(timestamp),
            url: row.url.clone(),
        }
    }
}

/// First [`EXCERPT_MAX_CHARS`] characters, with `...` when cut.
pub fn excerpt(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() <= EXCERPT_MAX_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(EXCERPT_MAX_CHARS).collect();
    cut.push_str("...");
    cut
}

fn timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}
