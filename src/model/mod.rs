mod block;
pub mod blocks;
mod common;
mod rich_text;

pub use block::Block;
pub use blocks::*;
pub use common::BlockCommon;
pub use rich_text::{plain_text_of, Annotations, RichTextRun};

use crate::types::NotionId;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;

/// Page metadata needed to place a page in the docs tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSummary {
    pub id: NotionId,
    pub title: String,
    pub last_edited: Option<DateTime<Utc>>,
    pub url: Option<String>,
}

/// One row of a queried database.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseRow {
    pub id: NotionId,
    pub created_time: Option<DateTime<Utc>>,
    pub last_edited_time: Option<DateTime<Utc>>,
    pub url: Option<String>,
    /// Properties in the order the API listed them.
    pub properties: IndexMap<String, PropertyValue>,
}

/// Typed value of a database property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Title(Vec<RichTextRun>),
    RichText(Vec<RichTextRun>),
    Select(Option<String>),
    MultiSelect(Vec<String>),
    Date(Option<String>),
    Checkbox(bool),
    Number(Option<f64>),
    Url(Option<String>),
    /// A property type the exporter does not read.
    Other(String),
}

impl DatabaseRow {
    /// Plain text of the row's title property.
    pub fn title(&self) -> Option<String> {
        self.properties.values().find_map(|value| match value {
            PropertyValue::Title(runs) => Some(plain_text_of(runs)),
            _ => None,
        })
    }

    /// Plain text of the first rich-text property that has any text.
    pub fn first_rich_text(&self) -> Option<String> {
        self.properties.values().find_map(|value| match value {
            PropertyValue::RichText(runs) => {
                let text = plain_text_of(runs);
                (!text.trim().is_empty()).then_some(text)
            }
            _ => None,
        })
    }

    /// Options of the first multi-select property.
    pub fn first_multi_select(&self) -> Option<&[String]> {
        self.properties.values().find_map(|value| match value {
            PropertyValue::MultiSelect(options) => Some(options.as_slice()),
            _ => None,
        })
    }
}
