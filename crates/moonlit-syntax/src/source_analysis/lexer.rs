// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for Lua source code.
//!
//! This module converts source text into a stream of [`Token`]s. The lexer
//! is hand-written for maximum control over error recovery and lossless
//! trivia handling.
//!
//! # Design Principles
//!
//! - **Error recovery**: Never panic on malformed input; emit [`TokenKind::Error`]
//!   tokens and [`Diagnostic`]s instead
//! - **Trivia preservation**: Every byte of whitespace and every comment is kept
//! - **Decoded literals**: Numerals and strings carry their [`TokenValue`]
//!
//! # Example
//!
//! ```
//! use moonlit_syntax::source_analysis::{Lexer, ParseOptions, TokenKind};
//!
//! let kinds: Vec<_> = Lexer::new("x + 1", &ParseOptions::default())
//!     .map(|token| token.kind())
//!     .collect();
//! assert_eq!(kinds, [TokenKind::Identifier, TokenKind::Plus, TokenKind::Number]);
//! ```

use std::iter::Peekable;
use std::str::CharIndices;

use ecow::{EcoString, EcoVec};

use super::source_text::{ReplacedBytes, replaced_at};
use super::{
    DecodedSource, Diagnostic, DiagnosticCode, ParseOptions, SourceKind, Span, SyntaxOptions,
    Token, TokenKind, TokenValue, Trivia,
};

/// A lexer that tokenizes Lua source code.
///
/// Tokens are produced one at a time. The [`Iterator`] implementation stops
/// before the end-of-file token; use [`Lexer::next_token`] or [`tokenize`]
/// when the trivia after the last token matters.
///
/// # Error Recovery
///
/// The lexer never fails completely. Unknown characters produce
/// [`TokenKind::Error`] tokens; unterminated strings and malformed numerals
/// still produce `String` and `Number` tokens. Every problem is recorded as
/// a diagnostic.
pub struct Lexer<'src> {
    /// The source text being lexed.
    source: &'src str,
    /// Character iterator with byte positions.
    chars: Peekable<CharIndices<'src>>,
    /// Byte offset of the next unconsumed character.
    position: usize,
    /// Enabled grammar features.
    syntax: SyntaxOptions,
    /// Pending trivia to attach to the next token.
    pending_trivia: Vec<Trivia>,
    /// Problems found so far.
    diagnostics: Vec<Diagnostic>,
    /// Raw bytes behind replacement characters, when lexing decoded bytes.
    replaced: &'src [ReplacedBytes],
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("position", &self.position)
            .field("remaining", &self.source.get(self.position..).unwrap_or(""))
            .finish_non_exhaustive()
    }
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source text.
    #[must_use]
    pub fn new(source: &'src str, options: &ParseOptions) -> Self {
        let mut lexer = Self {
            source,
            chars: source.char_indices().peekable(),
            position: 0,
            syntax: options.syntax,
            pending_trivia: Vec::new(),
            diagnostics: Vec::new(),
            replaced: &[],
        };
        if options.kind == SourceKind::Script && source.starts_with('#') {
            lexer.lex_shebang();
        }
        lexer
    }

    /// Creates a lexer over source decoded from bytes.
    ///
    /// Every invalid byte sequence is reported as a warning. Inside string
    /// literals the original bytes are decoded into the value.
    #[must_use]
    pub fn for_decoded(source: &'src DecodedSource, options: &ParseOptions) -> Self {
        let mut lexer = Self::new(source.text(), options);
        lexer.replaced = source.replaced();
        for replacement in source.replaced() {
            let span = Span::with_len(
                replacement.offset(),
                len_u32(char::REPLACEMENT_CHARACTER.len_utf8()),
            );
            lexer.diagnostics.push(Diagnostic::warning(
                DiagnosticCode::InvalidUtf8,
                span,
                ecow::eco_format!(
                    "invalid UTF-8 sequence {}",
                    HexBytes(replacement.bytes())
                ),
            ));
        }
        lexer
    }

    /// Returns the diagnostics reported so far.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consumes the lexer, returning its diagnostics.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    // ========================================================================
    // Character Management
    // ========================================================================

    /// Peeks at the next character without consuming it.
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Peeks `n+1` characters ahead without consuming (n=0 is same as `peek_char`).
    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.chars.clone().nth(n).map(|(_, c)| c)
    }

    /// Returns the byte `n` bytes past the current position.
    fn peek_byte_n(&self, n: usize) -> Option<u8> {
        self.source.as_bytes().get(self.position + n).copied()
    }

    /// Consumes the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.position = pos + c.len_utf8();
        Some(c)
    }

    /// Consumes characters while the predicate is true.
    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&predicate) {
            self.advance();
        }
    }

    /// Returns the current byte position.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "source files over 4GB are not supported"
    )]
    fn current_position(&self) -> u32 {
        self.position as u32
    }

    /// Creates a span from start to current position.
    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.current_position())
    }

    /// Extracts source text for a span.
    fn text_for(&self, span: Span) -> &'src str {
        &self.source[span.as_range()]
    }

    /// Records an error diagnostic.
    fn report(&mut self, code: DiagnosticCode, span: Span, message: impl Into<EcoString>) {
        self.diagnostics.push(Diagnostic::error(code, span, message));
    }

    /// Reports `what` if the grammar options switch it off.
    fn require_feature(&mut self, enabled: bool, span: Span, what: &str) {
        if !enabled {
            self.report(
                DiagnosticCode::FeatureNotAvailable,
                span,
                ecow::eco_format!("{what} is not available in the selected Lua version"),
            );
        }
    }

    // ========================================================================
    // Trivia
    // ========================================================================

    /// Skips whitespace, line breaks and comments, collecting them as trivia.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek_char() {
                Some(' ' | '\t' | '\x0B' | '\x0C') => self.lex_whitespace(),
                Some('\n' | '\r') => {
                    let start = self.current_position();
                    self.consume_line_break();
                    let text = self.text_for(self.span_from(start));
                    self.pending_trivia
                        .push(Trivia::EndOfLine(EcoString::from(text)));
                }
                Some('-') if self.peek_char_n(1) == Some('-') => self.lex_comment(),
                _ => break,
            }
        }
    }

    /// Collects trailing trivia (same-line whitespace and a line comment).
    ///
    /// Long comments are left for the next token's leading trivia.
    fn collect_trailing_trivia(&mut self) {
        loop {
            match self.peek_char() {
                Some(' ' | '\t' | '\x0B' | '\x0C') => self.lex_whitespace(),
                Some('-')
                    if self.peek_char_n(1) == Some('-') && self.long_bracket_level(2).is_none() =>
                {
                    self.lex_comment();
                    break; // Line comment ends trailing trivia
                }
                _ => break,
            }
        }
    }

    /// Lexes a run of horizontal whitespace.
    fn lex_whitespace(&mut self) {
        let start = self.current_position();
        self.advance_while(|c| matches!(c, ' ' | '\t' | '\x0B' | '\x0C'));
        let text = self.text_for(self.span_from(start));
        self.pending_trivia
            .push(Trivia::Whitespace(EcoString::from(text)));
    }

    /// Consumes one line break: `\n`, `\r`, `\r\n` or `\n\r`.
    fn consume_line_break(&mut self) {
        let first = self.advance();
        let second = self.peek_char();
        if matches!(second, Some('\n' | '\r')) && second != first {
            self.advance();
        }
    }

    /// Lexes a comment: `-- ...` or `--[==[ ... ]==]`.
    fn lex_comment(&mut self) {
        let start = self.current_position();
        self.advance(); // -
        self.advance(); // -

        if let Some(level) = self.long_bracket_level(0) {
            self.consume_long_bracket_open(level);
            let mut discarded = Vec::new();
            if !self.lex_long_bracket_body(level, &mut discarded) {
                self.report(
                    DiagnosticCode::UnterminatedComment,
                    self.span_from(start),
                    "unfinished long comment",
                );
            }
            let text = self.text_for(self.span_from(start));
            self.pending_trivia
                .push(Trivia::BlockComment(EcoString::from(text)));
        } else {
            self.advance_while(|c| c != '\n' && c != '\r');
            let text = self.text_for(self.span_from(start));
            self.pending_trivia
                .push(Trivia::LineComment(EcoString::from(text)));
        }
    }

    /// Lexes a `#` first line.
    fn lex_shebang(&mut self) {
        let start = self.current_position();
        self.advance_while(|c| c != '\n' && c != '\r');
        let text = self.text_for(self.span_from(start));
        self.pending_trivia.push(Trivia::Shebang(EcoString::from(text)));
    }

    // ========================================================================
    // Tokens
    // ========================================================================

    /// Lexes the next token, including the end-of-file token.
    ///
    /// Once the input is exhausted every call returns another end-of-file
    /// token with no trivia.
    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();
        let leading_trivia = std::mem::take(&mut self.pending_trivia);

        let start = self.current_position();
        let (kind, value) = match self.peek_char() {
            None => (TokenKind::EndOfFile, TokenValue::None),
            Some(c) => self.lex_token_kind(c, start),
        };
        let text = self.text_for(self.span_from(start));

        self.collect_trailing_trivia();
        let trailing_trivia = std::mem::take(&mut self.pending_trivia);

        Token::new(kind, text)
            .with_value(value)
            .with_trivia(leading_trivia, trailing_trivia)
    }

    /// Lexes a token based on its first character.
    fn lex_token_kind(&mut self, c: char, start: u32) -> (TokenKind, TokenValue) {
        let kind = match c {
            // Names and keywords
            'a'..='z' | 'A'..='Z' | '_' => self.lex_name(start),

            // Numerals
            '0'..='9' => return self.lex_number(start),
            '.' if self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit()) => {
                return self.lex_number(start);
            }

            // Strings
            '"' | '\'' => return self.lex_short_string(c, start),
            '[' => match self.long_bracket_level(0) {
                Some(level) => return self.lex_long_string(level, start),
                None if self.peek_char_n(1) == Some('=') => {
                    self.advance(); // [
                    self.advance_while(|c| c == '=');
                    self.report(
                        DiagnosticCode::InvalidLongStringDelimiter,
                        self.span_from(start),
                        "invalid long string delimiter",
                    );
                    TokenKind::Error
                }
                None => self.single(TokenKind::LeftBracket),
            },

            '.' => {
                if self.peek_char_n(1) == Some('.') {
                    self.advance(); // .
                    self.one_or_two('.', TokenKind::DotDotDot, TokenKind::DotDot)
                } else {
                    self.single(TokenKind::Dot)
                }
            }

            // Operators with a two-character form
            '/' => self.one_or_two('/', TokenKind::DoubleSlash, TokenKind::Slash),
            '~' => self.one_or_two('=', TokenKind::TildeEquals, TokenKind::Tilde),
            '=' => self.one_or_two('=', TokenKind::EqualsEquals, TokenKind::Equals),
            ':' => self.one_or_two(':', TokenKind::ColonColon, TokenKind::Colon),
            '<' => match self.peek_char_n(1) {
                Some('<') => self.double(TokenKind::LessLess),
                Some('=') => self.double(TokenKind::LessEquals),
                _ => self.single(TokenKind::Less),
            },
            '>' => match self.peek_char_n(1) {
                Some('>') => self.double(TokenKind::GreaterGreater),
                Some('=') => self.double(TokenKind::GreaterEquals),
                _ => self.single(TokenKind::Greater),
            },

            // Single-character tokens
            '+' => self.single(TokenKind::Plus),
            '-' => self.single(TokenKind::Minus),
            '*' => self.single(TokenKind::Star),
            '%' => self.single(TokenKind::Percent),
            '^' => self.single(TokenKind::Caret),
            '#' => self.single(TokenKind::Hash),
            '&' => self.single(TokenKind::Ampersand),
            '|' => self.single(TokenKind::Pipe),
            '(' => self.single(TokenKind::LeftParen),
            ')' => self.single(TokenKind::RightParen),
            '{' => self.single(TokenKind::LeftBrace),
            '}' => self.single(TokenKind::RightBrace),
            ']' => self.single(TokenKind::RightBracket),
            ';' => self.single(TokenKind::Semicolon),
            ',' => self.single(TokenKind::Comma),

            // Unknown character - error recovery
            _ => {
                self.advance();
                let span = self.span_from(start);
                let message = ecow::eco_format!("unexpected character '{}'", self.text_for(span));
                self.report(DiagnosticCode::UnexpectedCharacter, span, message);
                TokenKind::Error
            }
        };
        (kind, TokenValue::None)
    }

    /// Consumes one character and returns `kind`.
    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    /// Consumes two characters and returns `kind`.
    fn double(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        self.advance();
        kind
    }

    /// Consumes one character, plus `second` if it follows.
    fn one_or_two(&mut self, second: char, two: TokenKind, one: TokenKind) -> TokenKind {
        self.advance();
        if self.peek_char() == Some(second) {
            self.advance();
            two
        } else {
            one
        }
    }

    /// Lexes a name, checking it against the keyword table.
    fn lex_name(&mut self, start: u32) -> TokenKind {
        self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let text = self.text_for(self.span_from(start));
        TokenKind::keyword(text, self.syntax.goto_statements).unwrap_or(TokenKind::Identifier)
    }

    /// Lexes a numeral.
    ///
    /// Takes the maximal run Lua's lexer takes (digits, `.`, exponent marker
    /// with optional sign) plus any touching name characters, then decodes it.
    fn lex_number(&mut self, start: u32) -> (TokenKind, TokenValue) {
        let exponent_markers = if self.peek_char() == Some('0')
            && matches!(self.peek_char_n(1), Some('x' | 'X'))
        {
            self.advance(); // 0
            self.advance(); // x
            ['p', 'P']
        } else {
            ['e', 'E']
        };

        loop {
            match self.peek_char() {
                Some(c) if exponent_markers.contains(&c) => {
                    self.advance();
                    if matches!(self.peek_char(), Some('+' | '-')) {
                        self.advance();
                    }
                }
                Some(c) if c.is_ascii_alphanumeric() || c == '_' || c == '.' => {
                    self.advance();
                }
                _ => break,
            }
        }

        let span = self.span_from(start);
        let text = self.text_for(span);
        if let Some(value) = decode_numeral(text) {
            (TokenKind::Number, value)
        } else {
            self.report(
                DiagnosticCode::MalformedNumber,
                span,
                ecow::eco_format!("malformed number near '{text}'"),
            );
            (TokenKind::Number, TokenValue::Integer(0))
        }
    }

    // ========================================================================
    // Strings
    // ========================================================================

    /// Lexes a quoted string, decoding escapes as it goes.
    fn lex_short_string(&mut self, quote: char, start: u32) -> (TokenKind, TokenValue) {
        self.advance(); // opening quote
        let mut bytes = Vec::new();

        loop {
            match self.peek_char() {
                None | Some('\n' | '\r') => {
                    self.report(
                        DiagnosticCode::UnterminatedString,
                        self.span_from(start),
                        "unfinished string",
                    );
                    break;
                }
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some('\\') => self.lex_escape(&mut bytes),
                Some(c) => {
                    let at = self.current_position();
                    self.advance();
                    self.push_source_char(&mut bytes, at, c);
                }
            }
        }

        (TokenKind::String, TokenValue::Bytes(EcoVec::from(bytes.as_slice())))
    }

    /// Decodes one escape sequence starting at the backslash.
    fn lex_escape(&mut self, bytes: &mut Vec<u8>) {
        let start = self.current_position();
        self.advance(); // \

        let Some(c) = self.peek_char() else {
            // The string loop reports the missing closing quote.
            return;
        };
        let simple = match c {
            'a' => Some(0x07),
            'b' => Some(0x08),
            'f' => Some(0x0C),
            'n' => Some(b'\n'),
            'r' => Some(b'\r'),
            't' => Some(b'\t'),
            'v' => Some(0x0B),
            '\\' => Some(b'\\'),
            '"' => Some(b'"'),
            '\'' => Some(b'\''),
            _ => None,
        };
        if let Some(byte) = simple {
            self.advance();
            bytes.push(byte);
            return;
        }

        match c {
            '\n' | '\r' => {
                self.consume_line_break();
                bytes.push(b'\n');
            }
            'x' => self.lex_hex_escape(start, bytes),
            'z' => {
                self.advance();
                self.require_feature(
                    self.syntax.hex_escapes_and_skip,
                    self.span_from(start),
                    "'\\z' escape",
                );
                self.advance_while(|c| matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C'));
            }
            'u' => self.lex_unicode_escape(start, bytes),
            '0'..='9' => self.lex_decimal_escape(start, bytes),
            _ => {
                self.advance();
                let span = self.span_from(start);
                let message =
                    ecow::eco_format!("invalid escape sequence '{}'", self.text_for(span));
                self.report(DiagnosticCode::InvalidEscape, span, message);
                push_char(bytes, c);
            }
        }
    }

    /// Decodes `\xHH`.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "two hex digits always fit in a byte"
    )]
    fn lex_hex_escape(&mut self, start: u32, bytes: &mut Vec<u8>) {
        self.advance(); // x
        let mut value = 0u32;
        let mut digits = 0;
        while digits < 2 {
            match self.peek_char().and_then(|c| c.to_digit(16)) {
                Some(digit) => {
                    self.advance();
                    value = value * 16 + digit;
                    digits += 1;
                }
                None => break,
            }
        }
        let span = self.span_from(start);
        self.require_feature(self.syntax.hex_escapes_and_skip, span, "'\\x' escape");
        if digits == 2 {
            bytes.push(value as u8);
        } else {
            self.report(
                DiagnosticCode::InvalidEscape,
                span,
                "hexadecimal digit expected",
            );
        }
    }

    /// Decodes `\d`, `\dd` or `\ddd`.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "checked against 255 before the cast"
    )]
    fn lex_decimal_escape(&mut self, start: u32, bytes: &mut Vec<u8>) {
        let mut value = 0u32;
        let mut digits = 0;
        while digits < 3 {
            match self.peek_char().and_then(|c| c.to_digit(10)) {
                Some(digit) => {
                    self.advance();
                    value = value * 10 + digit;
                    digits += 1;
                }
                None => break,
            }
        }
        if value > 255 {
            self.report(
                DiagnosticCode::DecimalEscapeTooLarge,
                self.span_from(start),
                "decimal escape too large",
            );
        } else {
            bytes.push(value as u8);
        }
    }

    /// Decodes `\u{XXX}` using Lua's extended UTF-8.
    fn lex_unicode_escape(&mut self, start: u32, bytes: &mut Vec<u8>) {
        self.advance(); // u
        if self.peek_char() != Some('{') {
            self.report(
                DiagnosticCode::InvalidEscape,
                self.span_from(start),
                "missing '{' in \\u{xxxx}",
            );
            return;
        }
        self.advance(); // {

        let mut value = 0u32;
        let mut digits = 0;
        let mut too_large = false;
        while let Some(digit) = self.peek_char().and_then(|c| c.to_digit(16)) {
            self.advance();
            digits += 1;
            value = value.saturating_mul(16).saturating_add(digit);
            too_large |= value > 0x7FFF_FFFF;
        }
        if digits == 0 {
            self.report(
                DiagnosticCode::InvalidEscape,
                self.span_from(start),
                "hexadecimal digit expected",
            );
            return;
        }
        if self.peek_char() == Some('}') {
            self.advance();
        } else {
            self.report(
                DiagnosticCode::InvalidEscape,
                self.span_from(start),
                "missing '}' in \\u{xxxx}",
            );
            return;
        }

        let span = self.span_from(start);
        self.require_feature(self.syntax.unicode_escapes, span, "'\\u' escape");
        if too_large {
            self.report(
                DiagnosticCode::UnicodeEscapeTooLarge,
                span,
                "UTF-8 value too large",
            );
        } else {
            push_extended_utf8(bytes, value);
        }
    }

    // ========================================================================
    // Long brackets
    // ========================================================================

    /// Returns the level of a valid long-bracket opener `n` bytes ahead.
    fn long_bracket_level(&self, n: usize) -> Option<usize> {
        if self.peek_byte_n(n) != Some(b'[') {
            return None;
        }
        let mut level = 0;
        while self.peek_byte_n(n + 1 + level) == Some(b'=') {
            level += 1;
        }
        (self.peek_byte_n(n + 1 + level) == Some(b'[')).then_some(level)
    }

    /// Returns `true` if a closing bracket of `level` starts here.
    fn at_long_bracket_close(&self, level: usize) -> bool {
        self.peek_byte_n(0) == Some(b']')
            && (1..=level).all(|i| self.peek_byte_n(i) == Some(b'='))
            && self.peek_byte_n(level + 1) == Some(b']')
    }

    /// Consumes `[`, `level` equals signs, and `[`.
    fn consume_long_bracket_open(&mut self, level: usize) {
        for _ in 0..level + 2 {
            self.advance();
        }
    }

    /// Scans a long-bracket body up to and including its closing bracket.
    ///
    /// Line breaks are normalised to `\n` in the decoded bytes. Returns
    /// `false` if the input ends first.
    fn lex_long_bracket_body(&mut self, level: usize, bytes: &mut Vec<u8>) -> bool {
        loop {
            match self.peek_char() {
                None => return false,
                Some(']') if self.at_long_bracket_close(level) => {
                    for _ in 0..level + 2 {
                        self.advance();
                    }
                    return true;
                }
                Some('\n' | '\r') => {
                    self.consume_line_break();
                    bytes.push(b'\n');
                }
                Some(c) => {
                    let at = self.current_position();
                    self.advance();
                    self.push_source_char(bytes, at, c);
                }
            }
        }
    }

    /// Appends a source character to a string value. A replacement
    /// character that stands for undecodable input contributes the original
    /// bytes instead.
    fn push_source_char(&self, bytes: &mut Vec<u8>, at: u32, c: char) {
        let raw = replaced_at(self.replaced, at).filter(|_| c == char::REPLACEMENT_CHARACTER);
        match raw {
            Some(raw) => bytes.extend_from_slice(raw),
            None => push_char(bytes, c),
        }
    }

    /// Lexes a long-bracket string: `[[...]]`, `[==[...]==]`.
    fn lex_long_string(&mut self, level: usize, start: u32) -> (TokenKind, TokenValue) {
        self.consume_long_bracket_open(level);
        // A line break right after the opener is not part of the string.
        if matches!(self.peek_char(), Some('\n' | '\r')) {
            self.consume_line_break();
        }

        let mut bytes = Vec::new();
        if !self.lex_long_bracket_body(level, &mut bytes) {
            self.report(
                DiagnosticCode::UnterminatedLongString,
                self.span_from(start),
                "unfinished long string",
            );
        }
        (TokenKind::String, TokenValue::Bytes(EcoVec::from(bytes.as_slice())))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind().is_eof() {
            None
        } else {
            Some(token)
        }
    }
}

// ============================================================================
// Literal decoding
// ============================================================================

/// Renders bytes as `<e9>`-style hex for messages.
struct HexBytes<'a>(&'a [u8]);

impl std::fmt::Display for HexBytes<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<")?;
        for (index, byte) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{byte:02x}")?;
        }
        f.write_str(">")
    }
}

fn len_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// Appends the UTF-8 bytes of `c`.
fn push_char(bytes: &mut Vec<u8>, c: char) {
    let mut buffer = [0; 4];
    bytes.extend_from_slice(c.encode_utf8(&mut buffer).as_bytes());
}

/// Appends `code` in Lua's UTF-8 encoding, which extends the standard
/// scheme to six bytes so that any value below 2^31 is representable.
#[expect(
    clippy::cast_possible_truncation,
    reason = "each pushed value is masked to a byte"
)]
fn push_extended_utf8(bytes: &mut Vec<u8>, code: u32) {
    if code < 0x80 {
        bytes.push(code as u8);
        return;
    }
    let mut continuation = Vec::with_capacity(5);
    let mut rest = code;
    // Largest payload that still fits in the lead byte.
    let mut lead_capacity = 0x3F_u32;
    loop {
        continuation.push(0x80 | (rest & 0x3F) as u8);
        rest >>= 6;
        lead_capacity >>= 1;
        if rest <= lead_capacity {
            break;
        }
    }
    bytes.push(((!lead_capacity << 1) | rest) as u8);
    bytes.extend(continuation.iter().rev());
}

/// Decodes a numeral, or returns `None` if it is malformed.
fn decode_numeral(text: &str) -> Option<TokenValue> {
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => decode_hex_numeral(hex),
        None => decode_decimal_numeral(text),
    }
}

fn is_digits(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_digit())
}

fn is_hex_digits(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Splits `text` at the first exponent marker.
fn split_exponent<'a>(text: &'a str, markers: [char; 2]) -> (&'a str, Option<&'a str>) {
    match text.find(markers) {
        Some(index) => (&text[..index], Some(&text[index + 1..])),
        None => (text, None),
    }
}

/// Parses an exponent with optional sign, saturating on overflow.
fn parse_exponent(text: &str) -> Option<i32> {
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if digits.is_empty() || !is_digits(digits) {
        return None;
    }
    let magnitude = digits.bytes().fold(0_i32, |acc, b| {
        acc.saturating_mul(10).saturating_add(i32::from(b - b'0'))
    });
    Some(if negative { -magnitude } else { magnitude })
}

/// Decodes a decimal numeral.
///
/// Integers that overflow `i64` become floats.
fn decode_decimal_numeral(text: &str) -> Option<TokenValue> {
    if !text.is_empty() && is_digits(text) {
        if let Ok(value) = text.parse::<i64>() {
            return Some(TokenValue::Integer(value));
        }
        return text.parse::<f64>().ok().map(TokenValue::Float);
    }

    let (mantissa, exponent) = split_exponent(text, ['e', 'E']);
    let (integer, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let mantissa_ok = is_digits(integer)
        && is_digits(fraction)
        && !(integer.is_empty() && fraction.is_empty());
    let exponent_ok = exponent.is_none_or(|e| parse_exponent(e).is_some());
    if !mantissa_ok || !exponent_ok {
        return None;
    }
    text.parse::<f64>().ok().map(TokenValue::Float)
}

/// Decodes the part of a hexadecimal numeral after `0x`.
///
/// Integers wrap modulo 2^64; a `.` or `p` exponent makes a float.
#[expect(
    clippy::cast_possible_wrap,
    reason = "hexadecimal integers wrap around like Lua's"
)]
fn decode_hex_numeral(digits: &str) -> Option<TokenValue> {
    let (mantissa, exponent) = split_exponent(digits, ['p', 'P']);
    let (integer, fraction) = match mantissa.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (mantissa, None),
    };
    if integer.is_empty() && fraction.is_none_or(str::is_empty) {
        return None;
    }
    if !is_hex_digits(integer) || !fraction.is_none_or(is_hex_digits) {
        return None;
    }

    if fraction.is_none() && exponent.is_none() {
        let value = integer.bytes().fold(0_u64, |acc, b| {
            acc.wrapping_mul(16).wrapping_add(u64::from(hex_digit(b)))
        });
        return Some(TokenValue::Integer(value as i64));
    }

    let exponent = match exponent {
        Some(exponent) => parse_exponent(exponent)?,
        None => 0,
    };
    Some(TokenValue::Float(hex_float(
        integer,
        fraction.unwrap_or(""),
        exponent,
    )))
}

/// Hex digits kept in a float mantissa: 60 bits, enough for an `f64` plus
/// a sticky bit.
const HEX_MANTISSA_DIGITS: u32 = 15;

fn hex_digit(b: u8) -> u32 {
    char::from(b).to_digit(16).unwrap_or(0)
}

/// Builds the value of `0x<integer>.<fraction>p<exponent>`, rounding once.
#[expect(
    clippy::cast_precision_loss,
    reason = "the mantissa is rounded to the nearest f64 exactly once"
)]
fn hex_float(integer: &str, fraction: &str, exponent: i32) -> f64 {
    let mut mantissa = 0_u64;
    let mut kept = 0;
    let mut sticky = false;
    let mut scale = i64::from(exponent);

    let digits = integer
        .bytes()
        .map(|b| (b, false))
        .chain(fraction.bytes().map(|b| (b, true)));
    for (b, in_fraction) in digits {
        let digit = hex_digit(b);
        if kept == 0 && digit == 0 {
            if in_fraction {
                scale -= 4;
            }
        } else if kept < HEX_MANTISSA_DIGITS {
            mantissa = (mantissa << 4) | u64::from(digit);
            kept += 1;
            if in_fraction {
                scale -= 4;
            }
        } else {
            sticky |= digit != 0;
            if !in_fraction {
                scale += 4;
            }
        }
    }

    if mantissa == 0 {
        return 0.0;
    }
    if sticky {
        mantissa |= 1;
    }
    scale_by_power_of_two(mantissa as f64, scale)
}

/// Multiplies `value` by `2^exponent` in steps that stay representable.
fn scale_by_power_of_two(mut value: f64, exponent: i64) -> f64 {
    const STEP: i32 = 1000;
    // Past this, any 60-bit mantissa is already zero or infinite.
    let mut exponent = i32::try_from(exponent.clamp(-2200, 2200)).unwrap_or_default();
    while exponent > STEP {
        value *= 2.0_f64.powi(STEP);
        exponent -= STEP;
    }
    while exponent < -STEP {
        value *= 2.0_f64.powi(-STEP);
        exponent += STEP;
    }
    value * 2.0_f64.powi(exponent)
}

// ============================================================================
// Entry points
// ============================================================================

/// Convenience function to lex source into a vector of tokens (excluding EOF)
/// with default options.
///
/// For most use cases, prefer using the `Lexer` iterator directly.
#[must_use]
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source, &ParseOptions::default()).collect()
}

/// Convenience function to lex source into a vector of tokens including EOF,
/// with default options.
#[must_use]
pub fn lex_with_eof(source: &str) -> Vec<Token> {
    tokenize(source, &ParseOptions::default()).0
}

/// Lexes the whole source, returning the tokens (always ending with exactly
/// one end-of-file token) and the lexical diagnostics.
#[must_use]
pub fn tokenize(source: &str, options: &ParseOptions) -> (Vec<Token>, Vec<Diagnostic>) {
    drain(Lexer::new(source, options))
}

/// Like [`tokenize`], for source decoded from bytes with
/// [`DecodedSource::decode`].
#[must_use]
pub fn tokenize_decoded(
    source: &DecodedSource,
    options: &ParseOptions,
) -> (Vec<Token>, Vec<Diagnostic>) {
    drain(Lexer::for_decoded(source, options))
}

fn drain(mut lexer: Lexer<'_>) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let is_eof = token.kind().is_eof();
        tokens.push(token);
        if is_eof {
            break;
        }
    }
    (tokens, lexer.into_diagnostics())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::{LuaVersion, StringStyle};

    /// Helper to lex and extract just the token kinds.
    fn lex_kinds(source: &str) -> Vec<TokenKind> {
        lex(source).iter().map(Token::kind).collect()
    }

    /// Helper to lex a single token and return its value.
    fn lex_value(source: &str) -> TokenValue {
        let tokens = lex(source);
        assert_eq!(tokens.len(), 1, "expected one token for {source:?}");
        tokens[0].value().clone()
    }

    /// Helper to decode a single string literal.
    fn lex_bytes(source: &str) -> Vec<u8> {
        lex_value(source)
            .as_bytes()
            .expect("string literal")
            .to_vec()
    }

    /// Helper to collect the diagnostic codes for a source.
    fn lex_codes(source: &str) -> Vec<DiagnosticCode> {
        tokenize(source, &ParseOptions::default())
            .1
            .iter()
            .map(|d| d.code)
            .collect()
    }

    fn full_text(tokens: &[Token]) -> String {
        tokens.iter().map(Token::to_full_string).collect()
    }

    #[test]
    fn lex_empty() {
        assert!(lex("").is_empty());
        assert!(lex("   ").is_empty());
        assert!(lex("-- comment").is_empty());
        assert!(lex("--[[ long\ncomment ]]").is_empty());
    }

    #[test]
    fn eof_is_always_last_and_unique() {
        let (tokens, diagnostics) = tokenize("", &ParseOptions::default());
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind(), TokenKind::EndOfFile);
        assert!(diagnostics.is_empty());

        let tokens = lex_with_eof("x -- trailing\n  ");
        assert_eq!(tokens.last().map(Token::kind), Some(TokenKind::EndOfFile));
        assert_eq!(
            tokens.iter().filter(|t| t.kind().is_eof()).count(),
            1
        );
    }

    #[test]
    fn lex_names_and_keywords() {
        assert_eq!(
            lex_kinds("local function foo_1 _ENV end"),
            vec![
                TokenKind::Local,
                TokenKind::Function,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::End,
            ]
        );
        assert_eq!(lex_kinds("End nil_ notx"), vec![TokenKind::Identifier; 3]);
    }

    #[test]
    fn goto_depends_on_version() {
        assert_eq!(lex_kinds("goto"), vec![TokenKind::Goto]);
        let options = ParseOptions::for_version(LuaVersion::Lua51);
        let tokens: Vec<_> = Lexer::new("goto", &options).map(|t| t.kind()).collect();
        assert_eq!(tokens, vec![TokenKind::Identifier]);
    }

    #[test]
    fn lex_operators() {
        assert_eq!(
            lex_kinds("+ - * / // % ^ # & ~ | << >> == ~= <= >= < > = ( ) { } [ ] :: ; : , . .. ..."),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::DoubleSlash,
                TokenKind::Percent,
                TokenKind::Caret,
                TokenKind::Hash,
                TokenKind::Ampersand,
                TokenKind::Tilde,
                TokenKind::Pipe,
                TokenKind::LessLess,
                TokenKind::GreaterGreater,
                TokenKind::EqualsEquals,
                TokenKind::TildeEquals,
                TokenKind::LessEquals,
                TokenKind::GreaterEquals,
                TokenKind::Less,
                TokenKind::Greater,
                TokenKind::Equals,
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::LeftBracket,
                TokenKind::RightBracket,
                TokenKind::ColonColon,
                TokenKind::Semicolon,
                TokenKind::Colon,
                TokenKind::Comma,
                TokenKind::Dot,
                TokenKind::DotDot,
                TokenKind::DotDotDot,
            ]
        );
    }

    #[test]
    fn lex_member_access_is_not_a_number() {
        assert_eq!(
            lex_kinds("a.b"),
            vec![TokenKind::Identifier, TokenKind::Dot, TokenKind::Identifier]
        );
    }

    #[test]
    fn lex_integers() {
        assert_eq!(lex_value("2"), TokenValue::Integer(2));
        assert_eq!(lex_value("200"), TokenValue::Integer(200));
        assert_eq!(lex_value("0xA"), TokenValue::Integer(10));
        assert_eq!(lex_value("0x10"), TokenValue::Integer(16));
        assert_eq!(
            lex_value("9223372036854775807"),
            TokenValue::Integer(i64::MAX)
        );
    }

    #[test]
    fn decimal_overflow_becomes_float() {
        assert_eq!(
            lex_value("9223372036854775808"),
            TokenValue::Float(9_223_372_036_854_775_808.0)
        );
    }

    #[test]
    fn hex_integers_wrap() {
        assert_eq!(lex_value("0xffffffffffffffff"), TokenValue::Integer(-1));
        assert_eq!(lex_value("0x10000000000000000"), TokenValue::Integer(0));
    }

    #[test]
    fn lex_floats() {
        assert_eq!(lex_value("12.3"), TokenValue::Float(12.3));
        assert_eq!(lex_value("3."), TokenValue::Float(3.0));
        assert_eq!(lex_value(".5"), TokenValue::Float(0.5));
        assert_eq!(lex_value("3e2"), TokenValue::Float(300.0));
        assert_eq!(lex_value("3E-2"), TokenValue::Float(0.03));
        assert_eq!(lex_value("1e+1"), TokenValue::Float(10.0));
    }

    #[test]
    fn lex_hex_floats() {
        assert_eq!(lex_value("0x1p4"), TokenValue::Float(16.0));
        assert_eq!(lex_value("0x.8"), TokenValue::Float(0.5));
        assert_eq!(lex_value("0x1.8P-1"), TokenValue::Float(0.75));
        assert_eq!(lex_value("0xA."), TokenValue::Float(10.0));
    }

    #[test]
    fn hex_floats_with_extreme_exponents() {
        assert_eq!(lex_value("0x0p99999999"), TokenValue::Float(0.0));
        assert_eq!(lex_value("0x0.000p-99999999"), TokenValue::Float(0.0));
        assert_eq!(lex_value("0x1p99999999"), TokenValue::Float(f64::INFINITY));
        assert_eq!(lex_value("0x1p-99999999"), TokenValue::Float(0.0));
        assert_eq!(lex_value("0x1p1023"), TokenValue::Float(2.0_f64.powi(1023)));
        assert_eq!(lex_value("0x1p-1074"), TokenValue::Float(f64::from_bits(1)));
        assert_eq!(lex_value("0x8p-3"), TokenValue::Float(1.0));
    }

    #[test]
    fn hex_float_mantissas_round_once() {
        // Exactly half an ulp above 1.0 rounds to even.
        assert_eq!(lex_value("0x1.00000000000008p0"), TokenValue::Float(1.0));
        // Any later nonzero digit tips it up.
        assert_eq!(
            lex_value("0x1.0000000000000800000001p0"),
            TokenValue::Float(1.0 + f64::EPSILON)
        );
        // Digits past the kept ones still scale an integer part.
        assert_eq!(
            lex_value("0x10000000000000000000p0"),
            TokenValue::Float(2.0_f64.powi(76))
        );
        assert_eq!(lex_value("0x.000000000000000000001p84"), TokenValue::Float(1.0));
    }

    #[test]
    fn malformed_numbers_keep_a_placeholder() {
        for source in ["3x", "1e", "0x", "1..2", "0x1p", "3.4.5", "08f"] {
            let (tokens, diagnostics) = tokenize(source, &ParseOptions::default());
            assert_eq!(tokens.len(), 2, "{source}");
            assert_eq!(tokens[0].kind(), TokenKind::Number, "{source}");
            assert_eq!(tokens[0].text(), source);
            assert_eq!(tokens[0].value(), &TokenValue::Integer(0));
            assert_eq!(diagnostics.len(), 1, "{source}");
            assert_eq!(diagnostics[0].code, DiagnosticCode::MalformedNumber);
            assert_eq!(diagnostics[0].span, Span::new(0, source.len().try_into().unwrap()));
        }
    }

    #[test]
    fn hex_numeral_stops_at_sign_without_exponent() {
        assert_eq!(
            lex_kinds("0xe+1"),
            vec![TokenKind::Number, TokenKind::Plus, TokenKind::Number]
        );
    }

    #[test]
    fn lex_simple_strings() {
        assert_eq!(lex_bytes("'hello'"), b"hello");
        assert_eq!(lex_bytes("\"it's\""), b"it's");
        assert_eq!(lex_bytes("''"), b"");
    }

    #[test]
    fn lex_simple_escapes() {
        assert_eq!(
            lex_bytes(r#""\a\b\f\n\r\t\v\\\"\'""#),
            b"\x07\x08\x0C\n\r\t\x0B\\\"'"
        );
    }

    #[test]
    fn lex_decimal_escapes() {
        assert_eq!(lex_bytes(r#""\0first :-)""#), b"\0first :-)");
        assert_eq!(lex_bytes(r#""\65\066\0671""#), b"ABC1");
        assert_eq!(lex_bytes(r#""\255""#), [255]);
    }

    #[test]
    fn decimal_escape_too_large() {
        assert_eq!(lex_codes(r#""\256""#), vec![DiagnosticCode::DecimalEscapeTooLarge]);
    }

    #[test]
    fn lex_hex_escapes() {
        assert_eq!(lex_bytes(r#""\xE1lo""#), [0xE1, b'l', b'o']);
        assert_eq!(lex_codes(r#""\xG0""#), vec![DiagnosticCode::InvalidEscape]);
    }

    #[test]
    fn lex_unicode_escapes() {
        assert_eq!(lex_bytes(r#""\u{48}\u{E9}""#), "Hé".as_bytes());
        assert_eq!(lex_bytes(r#""\u{10FFFF}""#), [0xF4, 0x8F, 0xBF, 0xBF]);
        assert_eq!(
            lex_bytes(r#""\u{7FFFFFFF}""#),
            [0xFD, 0xBF, 0xBF, 0xBF, 0xBF, 0xBF]
        );
        assert_eq!(
            lex_codes(r#""\u{80000000}""#),
            vec![DiagnosticCode::UnicodeEscapeTooLarge]
        );
        assert_eq!(lex_codes(r#""\u48""#), vec![DiagnosticCode::InvalidEscape]);
        assert_eq!(lex_codes(r#""\u{48""#), vec![DiagnosticCode::InvalidEscape]);
    }

    #[test]
    fn lex_skip_whitespace_escape() {
        assert_eq!(lex_bytes("\"a\\z  \n\t  b\""), b"ab");
    }

    #[test]
    fn lex_escaped_line_breaks() {
        assert_eq!(lex_bytes("\"a\\\nb\""), b"a\nb");
        assert_eq!(lex_bytes("\"a\\\r\nb\""), b"a\nb");
        assert_eq!(lex_bytes("\"a\\\n\rb\""), b"a\nb");
    }

    #[test]
    fn invalid_escape_continues_decoding() {
        let (tokens, diagnostics) = tokenize(r#""a\qb""#, &ParseOptions::default());
        assert_eq!(tokens[0].value().as_bytes(), Some(&b"aqb"[..]));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::InvalidEscape);
        assert_eq!(diagnostics[0].span, Span::new(2, 4));
    }

    #[test]
    fn escapes_report_unavailable_features() {
        let options = ParseOptions::for_version(LuaVersion::Lua51);
        let (tokens, diagnostics) = tokenize(r#""\x41\z  \u{42}""#, &options);
        assert_eq!(tokens[0].value().as_bytes(), Some(&b"AB"[..]));
        assert_eq!(diagnostics.len(), 3);
        assert!(
            diagnostics
                .iter()
                .all(|d| d.code == DiagnosticCode::FeatureNotAvailable)
        );
    }

    #[test]
    fn unterminated_string_at_eof() {
        let (tokens, diagnostics) = tokenize("\"unterminated", &ParseOptions::default());
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind(), TokenKind::String);
        assert_eq!(tokens[0].text(), "\"unterminated");
        assert_eq!(tokens[0].value().as_bytes(), Some(&b"unterminated"[..]));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::UnterminatedString);
        assert_eq!(diagnostics[0].span, Span::new(0, 13));
    }

    #[test]
    fn unterminated_string_stops_before_newline() {
        let (tokens, diagnostics) = tokenize("'abc\nx", &ParseOptions::default());
        assert_eq!(tokens[0].text(), "'abc");
        assert_eq!(tokens[1].kind(), TokenKind::Identifier);
        assert!(tokens[1].has_leading_newline());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(full_text(&tokens), "'abc\nx");
    }

    #[test]
    fn lex_long_strings() {
        assert_eq!(lex_bytes("[[abc]]"), b"abc");
        assert_eq!(lex_bytes("[==[\n]]x]==]"), b"]]x");
        assert_eq!(lex_bytes("[=[a]]b]=]"), b"a]]b");
        assert_eq!(lex_bytes("[[\r\nline]]"), b"line");
        assert_eq!(lex_bytes("[[a\r\nb\rc]]"), b"a\nb\nc");
        assert_eq!(lex_bytes("[[\\n]]"), b"\\n");
    }

    #[test]
    fn long_string_style() {
        let tokens = lex("[==[x]==]");
        assert_eq!(
            tokens[0].string_style(),
            Some(StringStyle::LongBracket { level: 2 })
        );
    }

    #[test]
    fn unterminated_long_string() {
        let (tokens, diagnostics) = tokenize("[[abc", &ParseOptions::default());
        assert_eq!(tokens[0].kind(), TokenKind::String);
        assert_eq!(tokens[0].text(), "[[abc");
        assert_eq!(
            diagnostics.iter().map(|d| d.code).collect::<Vec<_>>(),
            vec![DiagnosticCode::UnterminatedLongString]
        );
    }

    #[test]
    fn invalid_long_string_delimiter() {
        let (tokens, diagnostics) = tokenize("[=x", &ParseOptions::default());
        assert_eq!(tokens[0].kind(), TokenKind::Error);
        assert_eq!(tokens[0].text(), "[=");
        assert_eq!(tokens[1].kind(), TokenKind::Identifier);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].code,
            DiagnosticCode::InvalidLongStringDelimiter
        );
    }

    #[test]
    fn index_bracket_is_not_a_long_string() {
        assert_eq!(
            lex_kinds("t[ [[k]] ]"),
            vec![
                TokenKind::Identifier,
                TokenKind::LeftBracket,
                TokenKind::String,
                TokenKind::RightBracket,
            ]
        );
    }

    #[test]
    fn line_comment_is_trailing_trivia() {
        let tokens = lex("x -- note\ny");
        assert_eq!(
            tokens[0].trailing_trivia(),
            &[
                Trivia::Whitespace(" ".into()),
                Trivia::LineComment("-- note".into()),
            ]
        );
        assert_eq!(tokens[1].leading_trivia(), &[Trivia::EndOfLine("\n".into())]);
    }

    #[test]
    fn long_comment_is_leading_trivia() {
        let tokens = lex("x --[[ a\nb ]] y");
        assert_eq!(tokens[0].trailing_trivia(), &[Trivia::Whitespace(" ".into())]);
        assert_eq!(
            tokens[1].leading_trivia(),
            &[
                Trivia::BlockComment("--[[ a\nb ]]".into()),
                Trivia::Whitespace(" ".into()),
            ]
        );
    }

    #[test]
    fn leveled_long_comment() {
        let tokens = lex("--[==[ ]] ]=] ]==]x");
        assert_eq!(tokens.len(), 1);
        assert_eq!(
            tokens[0].leading_trivia(),
            &[Trivia::BlockComment("--[==[ ]] ]=] ]==]".into())]
        );
    }

    #[test]
    fn bracket_without_level_match_is_a_line_comment() {
        let (tokens, diagnostics) = tokenize("--[= x\ny", &ParseOptions::default());
        assert!(diagnostics.is_empty());
        assert_eq!(
            tokens[0].leading_trivia()[0],
            Trivia::LineComment("--[= x".into())
        );
    }

    #[test]
    fn unterminated_comment() {
        assert_eq!(
            lex_codes("x --[[ open"),
            vec![DiagnosticCode::UnterminatedComment]
        );
    }

    #[test]
    fn line_break_forms() {
        let tokens = lex_with_eof("a\r\nb\n\rc\rd\n\ne");
        let breaks: Vec<_> = tokens
            .iter()
            .flat_map(Token::leading_trivia)
            .map(Trivia::as_str)
            .collect();
        assert_eq!(breaks, vec!["\r\n", "\n\r", "\r", "\n", "\n"]);
    }

    #[test]
    fn shebang_in_scripts_only() {
        let tokens = lex("#!/usr/bin/env lua\nprint(1)");
        assert_eq!(tokens[0].kind(), TokenKind::Identifier);
        assert_eq!(
            tokens[0].leading_trivia(),
            &[
                Trivia::Shebang("#!/usr/bin/env lua".into()),
                Trivia::EndOfLine("\n".into()),
            ]
        );

        let kinds: Vec<_> = Lexer::new("#t", &ParseOptions::interactive())
            .map(|t| t.kind())
            .collect();
        assert_eq!(kinds, vec![TokenKind::Hash, TokenKind::Identifier]);
    }

    #[test]
    fn unexpected_characters() {
        let (tokens, diagnostics) = tokenize("a @ $ é", &ParseOptions::default());
        let kinds: Vec<_> = tokens.iter().map(Token::kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::Error,
                TokenKind::Error,
                TokenKind::Error,
                TokenKind::EndOfFile,
            ]
        );
        assert_eq!(tokens[3].text(), "é");
        assert_eq!(diagnostics.len(), 3);
        assert!(
            diagnostics
                .iter()
                .all(|d| d.code == DiagnosticCode::UnexpectedCharacter)
        );
        assert_eq!(diagnostics[2].span, Span::new(6, 8));
    }

    #[test]
    fn full_text_round_trips() {
        let source = "#!lua\n-- header\nlocal t = { [[x]], 'y\\n', 0x1p4 } --[=[ c ]=]\r\nreturn t ; ";
        let tokens = lex_with_eof(source);
        assert_eq!(full_text(&tokens), source);
    }

    #[test]
    fn trivia_after_last_token_belongs_to_eof() {
        let tokens = lex_with_eof("x\n-- bye\n");
        let eof = tokens.last().unwrap();
        assert_eq!(eof.text(), "");
        assert_eq!(eof.to_full_string(), "\n-- bye\n");
    }
}
