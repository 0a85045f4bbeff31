// src/formatting/rich_text/mod.rs
//! Rich text runs to inline Markdown.

mod annotations;

use crate::model::RichTextRun;
pub use annotations::MarkdownStyleRenderer;

/// Formats one run with its annotations and link.
pub fn format_run(run: &RichTextRun) -> String {
    MarkdownStyleRenderer::apply_styles(&run.plain_text, &run.annotations, run.href.as_deref())
}

/// Formats a sequence of runs. An empty sequence yields an empty string.
pub fn format_rich_text(runs: &[RichTextRun]) -> String {
    runs.iter().map(format_run).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unannotated_runs_are_unchanged() {
        let runs = vec![RichTextRun::plain("Hello, "), RichTextRun::plain("world")];
        assert_eq!(format_rich_text(&runs), "Hello, world");
    }

    #[test]
    fn runs_are_concatenated_in_order() {
        let runs = vec![
            RichTextRun::plain("Use "),
            RichTextRun::plain("cargo").code(),
            RichTextRun::plain(" or read ").italic(),
            RichTextRun::plain("the book").linked("https://doc.rust-lang.org/book/"),
        ];
        assert_eq!(
            format_rich_text(&runs),
            "Use `cargo` *or read* [the book](https://doc.rust-lang.org/book/)"
        );
    }

    #[test]
    fn empty_runs_render_empty() {
        assert_eq!(format_rich_text(&[]), "");
    }
}
