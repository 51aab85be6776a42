// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Byte ranges into Lua source.
//!
//! Offsets are `u32`: a chunk larger than 4 GiB is not supported. Every
//! span a tree or diagnostic hands out is half-open and lies on `char`
//! boundaries of the text that was parsed.

use std::fmt;
use std::ops::Range;

/// A half-open byte range `start..end`.
///
/// Missing tokens and empty placeholder nodes get empty spans, so
/// `start == end` is common and meaningful.
///
/// ```
/// use moonlit_syntax::source_analysis::Span;
///
/// let name = Span::with_len(6, 1);
/// assert_eq!(name.as_range(), 6..7);
/// assert_eq!(name.to_string(), "6..7");
/// assert!(Span::empty(9).is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Span {
    start: u32,
    end: u32,
}

impl Span {
    /// `start..end`. Callers keep `start <= end`.
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// A zero-width span at `offset`.
    #[must_use]
    pub const fn empty(offset: u32) -> Self {
        Self::new(offset, offset)
    }

    /// `len` bytes from `start`.
    #[must_use]
    pub const fn with_len(start: u32, len: u32) -> Self {
        Self::new(start, start + len)
    }

    /// First byte.
    #[must_use]
    pub const fn start(self) -> u32 {
        self.start
    }

    /// One past the last byte.
    #[must_use]
    pub const fn end(self) -> u32 {
        self.end
    }

    #[must_use]
    pub const fn len(self) -> u32 {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// The smallest span covering both.
    #[must_use]
    pub fn cover(self, other: Self) -> Self {
        Self::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// The range for slicing the source text.
    #[must_use]
    pub const fn as_range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start as usize, span.len() as usize).into()
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
