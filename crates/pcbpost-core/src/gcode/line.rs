//! A single line of G-code text

use super::markers::LineKind;

/// One line of an `.ngc` file, including its line ending.
///
/// The last line of a file may have no line ending; it is kept that way so
/// rewriting a file never changes bytes it did not mean to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GcodeLine(String);

impl GcodeLine {
    /// Create a line from raw text
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Split file content into lines, keeping each line ending attached
    pub fn split(content: &str) -> Vec<GcodeLine> {
        content
            .split_inclusive('\n')
            .map(|line| GcodeLine(line.to_string()))
            .collect()
    }

    /// Raw text including the line ending
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Text without the trailing line ending
    pub fn text(&self) -> &str {
        self.0.trim_end_matches(['\n', '\r'])
    }

    /// Whether the line ends with a newline
    pub fn has_line_ending(&self) -> bool {
        self.0.ends_with('\n')
    }

    /// Classify against the drill file markers
    pub fn kind(&self) -> LineKind {
        LineKind::classify(&self.0)
    }

    /// Replace the text, keeping this line's own ending
    pub fn with_text(&self, text: &str) -> GcodeLine {
        let ending = &self.0[self.text().len()..];
        GcodeLine(format!("{}{}", text.trim_end_matches(['\n', '\r']), ending))
    }
}

impl AsRef<str> for GcodeLine {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GcodeLine {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for GcodeLine {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl std::fmt::Display for GcodeLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
