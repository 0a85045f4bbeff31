// src/formatting/mod.rs
//! Renders Notion blocks and rich text into Markdown.

pub mod block_renderer;
mod rich_text;

pub use block_renderer::{
    format_block, format_block_with_children, render_blocks, ChildPagePolicy, ChildSlugResolver,
    Fragment, RenderContext,
};
pub use rich_text::{format_rich_text, format_run};
