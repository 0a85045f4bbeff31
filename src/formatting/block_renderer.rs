// src/formatting/block_renderer.rs
//! Block rendering engine: converts Notion blocks to Markdown.
//!
//! [`format_block`] maps one block to a [`Fragment`]; [`render_blocks`]
//! joins fragments, dropping empty ones and keeping consecutive list items
//! on adjacent lines so lists stay tight.

use super::rich_text::format_rich_text;
use crate::constants::{CHARS_PER_BLOCK_ESTIMATE, DEFAULT_CALLOUT_ICON};
use crate::model::{Block, TextBlockContent};
use crate::output::paths::{child_link, slugify};
use crate::types::NotionId;

// --- Core Types ---

/// What a child-page reference turns into inside its parent's body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChildPagePolicy {
    /// Dropped from the body; the page's contents section lists it instead.
    #[default]
    Omit,
    /// Rendered inline as a relative link to the child's directory.
    Link,
}

/// Something that knows the slug each child page was written under.
pub trait ChildSlugResolver {
    fn child_slug(&self, id: &NotionId) -> Option<String>;
}

impl ChildSlugResolver for std::collections::HashMap<NotionId, String> {
    fn child_slug(&self, id: &NotionId) -> Option<String> {
        self.get(id).cloned()
    }
}

/// Context passed through the rendering pipeline.
#[derive(Clone, Copy, Default)]
pub struct RenderContext<'a> {
    pub child_pages: ChildPagePolicy,
    /// Resolver for slugs chosen by the mapper; titles are slugified when absent
    pub slugs: Option<&'a dyn ChildSlugResolver>,
}

impl std::fmt::Debug for RenderContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("child_pages", &self.child_pages)
            .field("slugs", &self.slugs.is_some())
            .finish()
    }
}

/// Rendered Markdown for one block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fragment {
    pub markdown: String,
    pub non_empty: bool,
}

impl Fragment {
    fn new(markdown: String) -> Self {
        let non_empty = !markdown.trim().is_empty();
        Self {
            markdown,
            non_empty,
        }
    }

    fn empty() -> Self {
        Self::default()
    }
}

// --- Public API ---

/// Renders a sequence of blocks into Markdown.
pub fn render_blocks(blocks: &[Block], ctx: &RenderContext) -> String {
    let mut output = String::with_capacity(blocks.len() * CHARS_PER_BLOCK_ESTIMATE);
    let mut previous_was_list = false;

    for block in blocks {
        let fragment = format_block(block, ctx);
        if !fragment.non_empty {
            continue;
        }

        if !output.is_empty() {
            let separator = if previous_was_list && block.is_list_item() {
                "\n"
            } else {
                "\n\n"
            };
            output.push_str(separator);
        }
        output.push_str(&fragment.markdown);
        previous_was_list = block.is_list_item();
    }

    output
}

/// Formats one block, rendering any fetched children first.
pub fn format_block(block: &Block, ctx: &RenderContext) -> Fragment {
    let children = render_blocks(block.children(), ctx);
    format_block_with_children(block, &children, ctx)
}

/// Formats one block around its already-rendered children.
pub fn format_block_with_children(block: &Block, children: &str, ctx: &RenderContext) -> Fragment {
    match block {
        Block::Paragraph(b) => text_with_children(&b.content, children, |text| {
            non_blank(text).map(str::to_string)
        }),
        Block::Heading1(b) => text_with_children(&b.content, children, |t| heading(1, t)),
        Block::Heading2(b) => text_with_children(&b.content, children, |t| heading(2, t)),
        Block::Heading3(b) => text_with_children(&b.content, children, |t| heading(3, t)),
        Block::BulletedListItem(b) => list_item("- ", 2, &b.content, children),
        // Every item is `1.`; Markdown renderers number ordered lists themselves.
        Block::NumberedListItem(b) => list_item("1. ", 3, &b.content, children),
        Block::ToDo(b) => {
            let marker = if b.checked { "- [x] " } else { "- [ ] " };
            list_item(marker, 2, &b.content, children)
        }
        Block::Quote(b) => text_with_children(&b.content, children, |text| {
            non_blank(text).map(|t| quote_lines(t, ""))
        }),
        Block::Callout(b) => {
            let icon = b.icon.as_deref().unwrap_or(DEFAULT_CALLOUT_ICON).to_string();
            text_with_children(&b.content, children, move |text| {
                Some(quote_lines(text, &format!("{} ", icon)))
            })
        }
        Block::Toggle(b) => match &b.content {
            Some(content) => Fragment::new(format_toggle(content, children)),
            None => Fragment::empty(),
        },
        Block::Code(b) => match &b.content {
            Some(content) => Fragment::new(format_code_block(content, &b.language)),
            None => Fragment::empty(),
        },
        Block::Image(b) => match &b.url {
            Some(url) => Fragment::new(format!("![image]({})", url)),
            None => Fragment::empty(),
        },
        Block::Divider(_) => Fragment::new("---".to_string()),
        Block::TableOfContents(_) => Fragment::new("[[toc]]".to_string()),
        Block::ChildPage(b) => match ctx.child_pages {
            ChildPagePolicy::Omit => Fragment::empty(),
            ChildPagePolicy::Link => {
                let slug = ctx
                    .slugs
                    .and_then(|s| s.child_slug(&b.common.id))
                    .unwrap_or_else(|| slugify(&b.title));
                Fragment::new(format!("[{}]({})", b.title, child_link(&slug)))
            }
        },
        Block::ChildDatabase(b) => {
            Fragment::new(format!("::: tip Database\n{}\n:::", b.title))
        }
        Block::Unsupported(b) => {
            log::debug!(
                "Skipping unsupported block type '{}' ({})",
                b.block_type,
                b.common.id
            );
            Fragment::empty()
        }
    }
}

// --- Block Shapes ---

/// Renders a text block and appends its children after a blank line.
///
/// A block whose payload is missing renders as nothing, children included.
fn text_with_children<F>(content: &Option<TextBlockContent>, children: &str, shape: F) -> Fragment
where
    F: FnOnce(&str) -> Option<String>,
{
    let Some(content) = content else {
        return Fragment::empty();
    };

    let text = format_rich_text(&content.rich_text);
    let own = shape(&text).unwrap_or_default();

    let markdown = match (own.is_empty(), children.trim().is_empty()) {
        (_, true) => own,
        (true, false) => children.to_string(),
        (false, false) => format!("{}\n\n{}", own, children),
    };
    Fragment::new(markdown)
}

fn heading(level: usize, text: &str) -> Option<String> {
    non_blank(text).map(|t| format!("{} {}", "#".repeat(level), t))
}

fn non_blank(text: &str) -> Option<&str> {
    (!text.trim().is_empty()).then_some(text)
}

/// A list item with its children indented to the item's content column.
fn list_item(
    marker: &str,
    indent_width: usize,
    content: &Option<TextBlockContent>,
    children: &str,
) -> Fragment {
    let Some(content) = content else {
        return Fragment::empty();
    };

    let mut markdown = format!("{}{}", marker, format_rich_text(&content.rich_text));
    if !children.trim().is_empty() {
        let indent = " ".repeat(indent_width);
        markdown.push('\n');
        markdown.push_str(&indent_block_content(children, &indent));
    }
    Fragment::new(markdown)
}

/// Prefixes every line with `> `, the first one also with `lead`.
fn quote_lines(text: &str, lead: &str) -> String {
    let mut lines = text.lines();
    let first = lines.next().unwrap_or("");
    std::iter::once(format!("> {}{}", lead, first).trim_end().to_string())
        .chain(lines.map(|line| format!("> {}", line).trim_end().to_string()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_toggle(content: &TextBlockContent, children: &str) -> String {
    let summary = format_rich_text(&content.rich_text);
    if children.trim().is_empty() {
        format!("<details>\n<summary>{}</summary>\n\n</details>", summary)
    } else {
        format!(
            "<details>\n<summary>{}</summary>\n\n{}\n\n</details>",
            summary, children
        )
    }
}

/// Fenced code block. The body is the raw text of the runs, never styled.
fn format_code_block(content: &TextBlockContent, language: &str) -> String {
    let language = if language == "plain text" { "" } else { language };
    let body: String = content
        .rich_text
        .iter()
        .map(|run| run.plain_text.as_str())
        .collect();
    format!("```{}\n{}\n```", language, body)
}

/// Indents each non-empty line of `text` by `indent`, preserving blank lines.
fn indent_block_content(text: &str, indent: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                line.to_string()
            } else {
                format!("{}{}", indent, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
