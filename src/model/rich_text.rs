use serde::Deserialize;

/// Inline styling flags on a run of text. Missing flags are off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
}

/// A span of text sharing one set of annotations and an optional link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichTextRun {
    pub plain_text: String,
    pub annotations: Annotations,
    pub href: Option<String>,
}

impl RichTextRun {
    /// Create a plain, unannotated run.
    pub fn plain(text: &str) -> Self {
        Self {
            plain_text: text.to_string(),
            annotations: Annotations::default(),
            href: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.annotations.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.annotations.italic = true;
        self
    }

    pub fn code(mut self) -> Self {
        self.annotations.code = true;
        self
    }

    pub fn strikethrough(mut self) -> Self {
        self.annotations.strikethrough = true;
        self
    }

    pub fn linked(mut self, href: &str) -> Self {
        self.href = Some(href.to_string());
        self
    }
}

/// Concatenates the visible text of a sequence of runs.
pub fn plain_text_of(runs: &[RichTextRun]) -> String {
    runs.iter().map(|r| r.plain_text.as_str()).collect()
}
