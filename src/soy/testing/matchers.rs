//! Text matchers for template text, doc blocks and raw captures

use std::fmt;

/// How an expected piece of text is compared against what the parser kept.
///
/// Body text keeps the template's own indentation and line breaks, so the
/// `Trimmed` and `Lines` forms compare without that layout.
#[derive(Debug, Clone, PartialEq)]
pub enum TextMatch {
    Exact(String),
    StartsWith(String),
    Contains(String),
    /// Equal once leading and trailing whitespace is dropped
    Trimmed(String),
    /// The non-blank lines, each trimmed, in order
    Lines(Vec<String>),
}

impl TextMatch {
    /// `Lines` from anything that yields string slices
    pub fn lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        TextMatch::Lines(lines.into_iter().map(str::to_string).collect())
    }

    pub fn matches(&self, actual: &str) -> bool {
        match self {
            TextMatch::Exact(expected) => actual == expected,
            TextMatch::StartsWith(prefix) => actual.starts_with(prefix.as_str()),
            TextMatch::Contains(needle) => actual.contains(needle.as_str()),
            TextMatch::Trimmed(expected) => actual.trim() == expected.trim(),
            TextMatch::Lines(expected) => {
                let found: Vec<&str> = layout_free_lines(actual).collect();
                found == expected.iter().map(String::as_str).collect::<Vec<_>>()
            }
        }
    }

    /// Panic with `context` unless `actual` matches
    pub fn assert(&self, actual: &str, context: &str) {
        assert!(
            self.matches(actual),
            "{}: expected text {}, found {:?}",
            context,
            self,
            actual
        );
    }
}

fn layout_free_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

impl fmt::Display for TextMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextMatch::Exact(text) => write!(f, "{:?}", text),
            TextMatch::StartsWith(prefix) => write!(f, "starting with {:?}", prefix),
            TextMatch::Contains(needle) => write!(f, "containing {:?}", needle),
            TextMatch::Trimmed(text) => write!(f, "{:?} (ignoring outer whitespace)", text.trim()),
            TextMatch::Lines(lines) => write!(f, "with lines {:?}", lines),
        }
    }
}

impl From<&str> for TextMatch {
    fn from(text: &str) -> Self {
        TextMatch::Exact(text.to_string())
    }
}

impl From<String> for TextMatch {
    fn from(text: String) -> Self {
        TextMatch::Exact(text)
    }
}
