// src/formatting/rich_text/annotations.rs
//! Annotation processing for rich text.

use crate::model::Annotations;

/// Renderer for text styles to Markdown.
pub struct MarkdownStyleRenderer;

impl MarkdownStyleRenderer {
    /// Wraps `content` in Markdown markers.
    ///
    /// Wrapping order is fixed: bold, italic, inline code, strikethrough,
    /// with the link applied last so it encloses every marker. Underline has
    /// no Markdown form and is ignored.
    ///
    /// Leading and trailing whitespace stays outside the markers, since
    /// Markdown does not treat `* x *` as emphasis. Whitespace-only content
    /// is returned as is.
    pub fn apply_styles(content: &str, annotations: &Annotations, href: Option<&str>) -> String {
        let core = content.trim();
        if core.is_empty() {
            return content.to_string();
        }
        let start = content.len() - content.trim_start().len();
        let (leading, trailing) = (&content[..start], &content[start + core.len()..]);

        let mut result = core.to_string();

        if annotations.bold {
            result = format!("**{}**", result);
        }

        if annotations.italic {
            result = format!("*{}*", result);
        }

        if annotations.code {
            result = format!("`{}`", result);
        }

        if annotations.strikethrough {
            result = format!("~~{}~~", result);
        }

        if let Some(url) = href {
            result = format!("[{}]({})", result, url);
        }

        format!("{}{}{}", leading, result, trailing)
    }
}
