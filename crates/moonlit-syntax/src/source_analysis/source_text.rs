// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source bytes that are not entirely UTF-8.
//!
//! Lua source is a byte sequence: comments and string literals may hold
//! Latin-1 or other non-UTF-8 bytes. The lexer works on `&str`, so raw
//! input goes through [`DecodedSource::decode`] first. Each invalid
//! sequence becomes one `U+FFFD` in the text, and the original bytes are
//! kept alongside so that string values and the round-trip stay exact.

use ecow::EcoVec;

/// Bytes that were replaced by `U+FFFD` during decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacedBytes {
    offset: u32,
    bytes: EcoVec<u8>,
}

impl ReplacedBytes {
    /// Byte offset of the replacement character in the decoded text.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    /// The original bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Source text decoded from bytes, plus the bytes it could not decode.
///
/// ```
/// use moonlit_syntax::source_analysis::DecodedSource;
///
/// let decoded = DecodedSource::decode(b"-- caf\xe9\nx = 1");
/// assert_eq!(decoded.text(), "-- caf\u{FFFD}\nx = 1");
/// assert_eq!(decoded.replaced()[0].bytes(), b"\xe9");
/// assert_eq!(decoded.restore(decoded.text()), b"-- caf\xe9\nx = 1");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedSource {
    text: String,
    replaced: Vec<ReplacedBytes>,
}

impl DecodedSource {
    /// Decodes `bytes`, replacing each invalid sequence with `U+FFFD`.
    #[must_use]
    pub fn decode(bytes: &[u8]) -> Self {
        let mut text = String::with_capacity(bytes.len());
        let mut replaced = Vec::new();
        for chunk in bytes.utf8_chunks() {
            text.push_str(chunk.valid());
            if !chunk.invalid().is_empty() {
                replaced.push(ReplacedBytes {
                    offset: u32::try_from(text.len()).unwrap_or(u32::MAX),
                    bytes: EcoVec::from(chunk.invalid()),
                });
                text.push(char::REPLACEMENT_CHARACTER);
            }
        }
        Self { text, replaced }
    }

    /// Returns the decoded text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the replaced byte sequences, in source order.
    #[must_use]
    pub fn replaced(&self) -> &[ReplacedBytes] {
        &self.replaced
    }

    /// Returns `true` if the input was valid UTF-8.
    #[must_use]
    pub fn is_lossless(&self) -> bool {
        self.replaced.is_empty()
    }

    /// Turns `text` (the decoded text, or a tree printed from it) back into
    /// the original bytes.
    #[must_use]
    pub fn restore(&self, text: &str) -> Vec<u8> {
        restore_bytes(text, &self.replaced)
    }
}

/// Puts the original bytes back in place of their replacement characters.
pub(crate) fn restore_bytes(text: &str, replaced: &[ReplacedBytes]) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut copied = 0;
    for replacement in replaced {
        let at = replacement.offset as usize;
        let Some(before) = text.get(copied..at) else {
            break;
        };
        out.extend_from_slice(before.as_bytes());
        out.extend_from_slice(&replacement.bytes);
        copied = at + char::REPLACEMENT_CHARACTER.len_utf8();
    }
    out.extend_from_slice(text.get(copied..).unwrap_or_default().as_bytes());
    out
}

/// Looks up the original bytes of a replacement character at `offset`.
pub(crate) fn replaced_at(replaced: &[ReplacedBytes], offset: u32) -> Option<&[u8]> {
    replaced
        .binary_search_by_key(&offset, ReplacedBytes::offset)
        .ok()
        .map(|index| replaced[index].bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_utf8_is_unchanged() {
        let decoded = DecodedSource::decode("local s = 'héllo'".as_bytes());
        assert!(decoded.is_lossless());
        assert_eq!(decoded.text(), "local s = 'héllo'");
    }

    #[test]
    fn each_invalid_sequence_is_one_replacement() {
        let decoded = DecodedSource::decode(b"a\xff\xfeb\xe9");
        assert_eq!(decoded.text(), "a\u{FFFD}\u{FFFD}b\u{FFFD}");
        let offsets: Vec<_> = decoded.replaced().iter().map(ReplacedBytes::offset).collect();
        assert_eq!(offsets, [1, 4, 8]);
    }

    #[test]
    fn restore_gives_back_the_input() {
        let input = b"\xe9-- caf\xe9\n'\xc3' .. \"\xff\xff\"";
        let decoded = DecodedSource::decode(input);
        assert_eq!(decoded.restore(decoded.text()), input);
    }

    #[test]
    fn genuine_replacement_characters_are_kept() {
        let input = "x = '\u{FFFD}'".as_bytes();
        let decoded = DecodedSource::decode(input);
        assert!(decoded.is_lossless());
        assert_eq!(decoded.restore(decoded.text()), input);
    }

    #[test]
    fn lookup_by_offset() {
        let decoded = DecodedSource::decode(b"ab\x80c");
        assert_eq!(replaced_at(decoded.replaced(), 2), Some(&b"\x80"[..]));
        assert_eq!(replaced_at(decoded.replaced(), 3), None);
    }
}
