//! Position and mark tracking for source locations
//!
//! This module defines the data structures for representing positions
//! and marks (start/end pairs) in template source.

use serde::Serialize;
use std::fmt;

/// A position in source text.
///
/// `line` and `column` are 0-based; `index` is the 0-based character offset
/// from the start of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub index: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, index: usize) -> Self {
        Self {
            line,
            column,
            index,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The span of input consumed to build a node (end is exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Mark {
    pub start: Position,
    pub end: Position,
}

impl Mark {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Number of characters covered by this mark
    pub fn len(&self) -> usize {
        self.end.index.saturating_sub(self.start.index)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check whether `other` lies entirely within this mark
    pub fn encloses(&self, other: &Mark) -> bool {
        self.start.index <= other.start.index && other.end.index <= self.end.index
    }

    /// Slice the marked text out of the source it was produced from
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        let mut chars = source.char_indices().map(|(byte, _)| byte);
        let start = chars.nth(self.start.index).unwrap_or(source.len());
        let end = if self.is_empty() {
            start
        } else {
            source
                .char_indices()
                .map(|(byte, _)| byte)
                .nth(self.end.index)
                .unwrap_or(source.len())
        };
        &source[start..end]
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
