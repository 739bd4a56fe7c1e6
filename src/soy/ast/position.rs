//! Source location utilities for converting character offsets to positions
//!
//! The grammar runs over a stream of `char`s, so every span it reports is a
//! range of character offsets. This module turns those offsets into
//! line/column positions for marks and error reporting.

use super::span::{Mark, Position};
use std::ops::Range;

/// Provides fast conversion from character offsets to line/column positions
#[derive(Debug, Clone)]
pub struct SourceLocation {
    /// Character offsets where each line starts
    line_starts: Vec<usize>,
    /// Total number of characters in the source
    len: usize,
}

impl SourceLocation {
    /// Create a new SourceLocation from source text
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        let mut len = 0;

        for (index, ch) in source.chars().enumerate() {
            if ch == '\n' {
                line_starts.push(index + 1);
            }
            len = index + 1;
        }

        Self { line_starts, len }
    }

    /// Convert a character offset to a position; offsets past the end clamp to it
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .binary_search(&offset)
            .unwrap_or_else(|i| i - 1);

        Position::new(line, offset - self.line_starts[line], offset)
    }

    /// Convert a character range to a mark
    pub fn range_to_mark(&self, range: &Range<usize>) -> Mark {
        Mark::new(
            self.offset_to_position(range.start),
            self.offset_to_position(range.end.max(range.start)),
        )
    }

    /// Get the total number of lines in the source
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get the total number of characters in the source
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
