//! Parser configuration.

/// Default synthetic inner text of `br` elements.
pub const DEFAULT_BR_TEXT: &str = "\r\n";

/// Default text appended after `span` elements in plain text.
pub const DEFAULT_SPAN_TEXT: &str = " ";

/// Settings for one parse.
///
/// # Example
/// ```ignore
/// let options = ParseOptions::default()
///     .with_case_preserved()
///     .with_line_breaks_kept();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Fold tag and attribute names to lowercase.
    pub case_insensitive_tags: bool,
    /// Replace `\r` and `\n` with spaces before tokenizing.
    pub strip_cr_lf: bool,
    /// Close open elements implied by an optional-closing tag, such as an
    /// open `li` when another `li` starts. When off, only explicit end tags
    /// close elements.
    pub force_tags_closed: bool,
    /// Inner text given to `br` elements, surfaced by plain-text rendering.
    pub break_text: String,
    /// Appended after each `span` element in plain text.
    pub span_separator: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            case_insensitive_tags: true,
            strip_cr_lf: true,
            force_tags_closed: true,
            break_text: DEFAULT_BR_TEXT.to_string(),
            span_separator: DEFAULT_SPAN_TEXT.to_string(),
        }
    }
}

impl ParseOptions {
    /// Keep tag and attribute names as written.
    #[must_use]
    pub const fn with_case_preserved(mut self) -> Self {
        self.case_insensitive_tags = false;
        self
    }

    /// Keep `\r` and `\n` in the input.
    #[must_use]
    pub const fn with_line_breaks_kept(mut self) -> Self {
        self.strip_cr_lf = false;
        self
    }

    /// Only close elements on explicit end tags.
    #[must_use]
    pub const fn with_markup_trusted(mut self) -> Self {
        self.force_tags_closed = false;
        self
    }

    /// Use `text` as the inner text of `br` elements.
    #[must_use]
    pub fn with_break_text(mut self, text: impl Into<String>) -> Self {
        self.break_text = text.into();
        self
    }

    /// Use `text` after `span` elements in plain text.
    #[must_use]
    pub fn with_span_separator(mut self, text: impl Into<String>) -> Self {
        self.span_separator = text.into();
        self
    }
}
