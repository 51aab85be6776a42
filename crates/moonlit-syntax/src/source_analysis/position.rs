// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Line/column positions.
//!
//! Diagnostics carry byte [`Span`]s; tools that talk to humans (or editors)
//! want lines and columns. [`LineIndex`] precomputes line starts once so that
//! conversions in both directions are a binary search.
//!
//! Line breaks follow Lua's lexer: `\n`, `\r`, `\r\n` and `\n\r` each count
//! as a single line break.

use super::Span;

/// A position in a source file (line and column, both 0-indexed).
///
/// The `column` field is a **byte offset within the line**, not a character
/// count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Line number (0-indexed).
    pub line: u32,
    /// Column offset in bytes from the start of the line (0-indexed).
    pub column: u32,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    /// Formats as `line:column`, 1-indexed, the way compilers print locations.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// Precomputed line starts for one source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the first character of every line; always starts with 0.
    line_starts: Vec<u32>,
    /// Total length of the indexed text.
    len: u32,
}

impl LineIndex {
    /// Indexes `text`.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "source files over 4GB are not supported"
    )]
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = vec![0];
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' | b'\r' => {
                    let first = bytes[i];
                    i += 1;
                    // `\r\n` and `\n\r` are one break.
                    if i < bytes.len() && matches!(bytes[i], b'\n' | b'\r') && bytes[i] != first {
                        i += 1;
                    }
                    line_starts.push(i as u32);
                }
                _ => i += 1,
            }
        }
        Self {
            line_starts,
            len: text.len() as u32,
        }
    }

    /// Returns the number of lines (an empty text has one line).
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Converts a byte offset to a position.
    ///
    /// Returns `None` if the offset is past the end of the text.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "line counts are bounded by the u32 text length"
    )]
    pub fn position(&self, offset: u32) -> Option<Position> {
        if offset > self.len {
            return None;
        }
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        Some(Position::new(line as u32, offset - self.line_starts[line]))
    }

    /// Converts a position back to a byte offset.
    ///
    /// Returns `None` if the line does not exist or the column runs past the
    /// end of the text.
    #[must_use]
    pub fn offset(&self, position: Position) -> Option<u32> {
        let start = *self.line_starts.get(position.line as usize)?;
        let offset = start.checked_add(position.column)?;
        (offset <= self.len).then_some(offset)
    }

    /// Returns the start and end positions of a span.
    #[must_use]
    pub fn range(&self, span: Span) -> Option<(Position, Position)> {
        Some((self.position(span.start())?, self.position(span.end())?))
    }

    /// Returns the byte span of a line, excluding its line break.
    #[must_use]
    pub fn line_span(&self, line: u32, text: &str) -> Option<Span> {
        let start = *self.line_starts.get(line as usize)?;
        let next = self
            .line_starts
            .get(line as usize + 1)
            .copied()
            .unwrap_or(self.len);
        let mut end = next;
        let bytes = text.as_bytes();
        while end > start && matches!(bytes.get(end as usize - 1), Some(b'\n' | b'\r')) {
            end -= 1;
        }
        Some(Span::new(start, end))
    }
}
