use super::common::BlockCommon;
use super::rich_text::RichTextRun;
use chrono::{DateTime, Utc};

/// Rich text payload shared by the text-bearing block kinds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextBlockContent {
    pub rich_text: Vec<RichTextRun>,
}

impl TextBlockContent {
    pub fn new(rich_text: Vec<RichTextRun>) -> Self {
        Self { rich_text }
    }
}

/// Paragraph, heading, list item, quote and toggle blocks.
///
/// `content` is `None` when the remote payload lacked the type-specific
/// field; such blocks render as nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub common: BlockCommon,
    pub content: Option<TextBlockContent>,
}

/// To-do block
#[derive(Debug, Clone, PartialEq)]
pub struct ToDoBlock {
    pub common: BlockCommon,
    pub content: Option<TextBlockContent>,
    pub checked: bool,
}

/// Code block
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    pub common: BlockCommon,
    pub content: Option<TextBlockContent>,
    pub language: String,
}

/// Callout block. Only emoji icons are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct CalloutBlock {
    pub common: BlockCommon,
    pub content: Option<TextBlockContent>,
    pub icon: Option<String>,
}

/// Image block, hosted by Notion or linked externally.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlock {
    pub common: BlockCommon,
    /// `None` when the payload carried neither a file nor an external URL
    pub url: Option<String>,
}

/// Divider block
#[derive(Debug, Clone, PartialEq)]
pub struct DividerBlock {
    pub common: BlockCommon,
}

/// Table of contents marker
#[derive(Debug, Clone, PartialEq)]
pub struct TableOfContentsBlock {
    pub common: BlockCommon,
}

/// Reference to a nested page, synchronized separately from its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildPageBlock {
    pub common: BlockCommon,
    pub title: String,
    /// Remote edit time of the reference, when reported
    pub last_edited: Option<DateTime<Utc>>,
}

/// Child database block
#[derive(Debug, Clone, PartialEq)]
pub struct ChildDatabaseBlock {
    pub common: BlockCommon,
    pub title: String,
}

/// Unsupported block type
#[derive(Debug, Clone, PartialEq)]
pub struct UnsupportedBlock {
    pub common: BlockCommon,
    pub block_type: String,
}
