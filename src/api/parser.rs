// src/api/parser.rs
//! Tolerant parsing of raw Notion JSON into the domain model.
//!
//! The remote schema is not validated locally. A block whose type-specific
//! payload is missing still parses, with `content: None`, so that the
//! formatter can render it as nothing instead of failing the page.

use crate::error::AppError;
use crate::model::*;
use crate::types::NotionId;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::Value;

/// Parses a list of raw block objects, dropping entries without a usable id.
pub fn parse_blocks(values: &[Value]) -> Vec<Block> {
    values.iter().filter_map(parse_block).collect()
}

/// Parses one raw block object.
pub fn parse_block(value: &Value) -> Option<Block> {
    let raw_id = value.get("id").and_then(Value::as_str);
    let id = match raw_id.map(NotionId::parse) {
        Some(Ok(id)) => id,
        _ => {
            log::warn!("Skipping block without a valid id: {:?}", raw_id);
            return None;
        }
    };

    let common = BlockCommon {
        id,
        children: Vec::new(),
        has_children: value
            .get("has_children")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        archived: value
            .get("archived")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    };

    let block_type = value.get("type").and_then(Value::as_str).unwrap_or("");
    let payload = value.get(block_type).filter(|p| p.is_object());

    let text = |common: BlockCommon| TextBlock {
        common,
        content: payload.map(text_content),
    };

    let block = match block_type {
        "paragraph" => Block::Paragraph(text(common)),
        "heading_1" => Block::Heading1(text(common)),
        "heading_2" => Block::Heading2(text(common)),
        "heading_3" => Block::Heading3(text(common)),
        "bulleted_list_item" => Block::BulletedListItem(text(common)),
        "numbered_list_item" => Block::NumberedListItem(text(common)),
        "toggle" => Block::Toggle(text(common)),
        "quote" => Block::Quote(text(common)),
        "to_do" => Block::ToDo(ToDoBlock {
            common,
            content: payload.map(text_content),
            checked: payload
                .and_then(|p| p.get("checked"))
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }),
        "code" => Block::Code(CodeBlock {
            common,
            content: payload.map(text_content),
            language: payload
                .and_then(|p| p.get("language"))
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
        }),
        "callout" => Block::Callout(CalloutBlock {
            common,
            content: payload.map(text_content),
            icon: payload
                .and_then(|p| p.get("icon"))
                .and_then(|i| i.get("emoji"))
                .and_then(Value::as_str)
                .map(str::to_string),
        }),
        "image" => Block::Image(ImageBlock {
            common,
            url: payload.and_then(image_url),
        }),
        "divider" => Block::Divider(DividerBlock { common }),
        "table_of_contents" => Block::TableOfContents(TableOfContentsBlock { common }),
        "child_page" => Block::ChildPage(ChildPageBlock {
            common,
            title: payload_title(payload),
            last_edited: timestamp(value, "last_edited_time"),
        }),
        "child_database" => Block::ChildDatabase(ChildDatabaseBlock {
            common,
            title: payload_title(payload),
        }),
        other => Block::Unsupported(UnsupportedBlock {
            common,
            block_type: other.to_string(),
        }),
    };

    Some(block)
}

/// Notion-hosted files take precedence over external links.
fn image_url(payload: &Value) -> Option<String> {
    ["file", "external"]
        .iter()
        .filter_map(|source| payload.get(*source))
        .filter_map(|source| source.get("url").and_then(Value::as_str))
        .find(|url| !url.is_empty())
        .map(str::to_string)
}

fn payload_title(payload: Option<&Value>) -> String {
    payload
        .and_then(|p| p.get("title"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

fn text_content(payload: &Value) -> TextBlockContent {
    TextBlockContent::new(
        payload
            .get("rich_text")
            .map(parse_rich_text)
            .unwrap_or_default(),
    )
}

/// Parses a rich-text array. Non-array input yields no runs.
pub fn parse_rich_text(value: &Value) -> Vec<RichTextRun> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(parse_run).collect())
        .unwrap_or_default()
}

fn parse_run(item: &Value) -> Option<RichTextRun> {
    let plain_text = item
        .get("plain_text")
        .and_then(Value::as_str)
        .or_else(|| {
            item.get("text")
                .and_then(|t| t.get("content"))
                .and_then(Value::as_str)
        })?
        .to_string();

    let annotations = item
        .get("annotations")
        .cloned()
        .and_then(|a| serde_json::from_value::<Annotations>(a).ok())
        .unwrap_or_default();

    let href = item
        .get("href")
        .and_then(Value::as_str)
        .or_else(|| {
            item.get("text")
                .and_then(|t| t.get("link"))
                .and_then(|l| l.get("url"))
                .and_then(Value::as_str)
        })
        .map(str::to_string);

    Some(RichTextRun {
        plain_text,
        annotations,
        href,
    })
}

/// Parses a page object into the metadata the mapper needs.
pub fn parse_page_summary(value: &Value) -> Result<PageSummary, AppError> {
    let id = value
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::MalformedResponse("page without id".to_string()))?;
    let id = NotionId::parse(id)?;

    let title = value
        .get("properties")
        .and_then(Value::as_object)
        .and_then(|props| {
            props
                .values()
                .find(|p| p.get("type").and_then(Value::as_str) == Some("title"))
        })
        .and_then(|p| p.get("title"))
        .map(|runs| plain_text_of(&parse_rich_text(runs)))
        .unwrap_or_default();

    Ok(PageSummary {
        id,
        title,
        last_edited: timestamp(value, "last_edited_time"),
        url: value.get("url").and_then(Value::as_str).map(str::to_string),
    })
}

/// Parses one database row. Rows without a usable id are dropped.
pub fn parse_database_row(value: &Value) -> Option<DatabaseRow> {
    let id = NotionId::parse(value.get("id")?.as_str()?).ok()?;

    let properties = value
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .iter()
                .map(|(name, prop)| (name.clone(), parse_property(prop)))
                .collect::<IndexMap<_, _>>()
        })
        .unwrap_or_default();

    Some(DatabaseRow {
        id,
        created_time: timestamp(value, "created_time"),
        last_edited_time: timestamp(value, "last_edited_time"),
        url: value.get("url").and_then(Value::as_str).map(str::to_string),
        properties,
    })
}

fn parse_property(prop: &Value) -> PropertyValue {
    let kind = prop.get("type").and_then(Value::as_str).unwrap_or("");
    let field = prop.get(kind).unwrap_or(&Value::Null);
    let name_of = |v: &Value| v.get("name").and_then(Value::as_str).map(str::to_string);

    match kind {
        "title" => PropertyValue::Title(parse_rich_text(field)),
        "rich_text" => PropertyValue::RichText(parse_rich_text(field)),
        "select" => PropertyValue::Select(name_of(field)),
        "multi_select" => PropertyValue::MultiSelect(
            field
                .as_array()
                .map(|options| options.iter().filter_map(name_of).collect())
                .unwrap_or_default(),
        ),
        "date" => PropertyValue::Date(
            field
                .get("start")
                .and_then(Value::as_str)
                .map(str::to_string),
        ),
        "checkbox" => PropertyValue::Checkbox(field.as_bool().unwrap_or(false)),
        "number" => PropertyValue::Number(field.as_f64()),
        "url" => PropertyValue::Url(field.as_str().map(str::to_string)),
        other => PropertyValue::Other(other.to_string()),
    }
}

fn timestamp(value: &Value, field: &str) -> Option<DateTime<Utc>> {
    value
        .get(field)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
