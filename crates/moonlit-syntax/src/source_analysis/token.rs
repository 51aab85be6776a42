// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Token types for Lua lexical analysis.
//!
//! This module defines the tokens produced by the lexer. Tokens are
//! position independent: each one owns its exact source text plus the
//! [`Trivia`] (whitespace and comments) around it, so concatenating every
//! token's full text reproduces the source byte-for-byte.
//!
//! # Token Structure
//!
//! Each token consists of:
//! - A [`TokenKind`] indicating the type of token
//! - The core text (the lexeme itself)
//! - A decoded [`TokenValue`] for numerals and strings
//! - Leading and trailing [`Trivia`]
//!
//! Absolute positions are assigned later by the red tree
//! ([`crate::syntax::SyntaxToken`]).

use std::hash::{Hash, Hasher};

use ecow::{EcoString, EcoVec};

/// The kind of token, not including text, value or trivia.
///
/// A closed set covering every Lua 5.4 keyword and operator plus the
/// open-ended classes (identifiers, numerals, strings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    // === Keywords ===
    /// `and`
    And,
    /// `break`
    Break,
    /// `do`
    Do,
    /// `else`
    Else,
    /// `elseif`
    ElseIf,
    /// `end`
    End,
    /// `false`
    False,
    /// `for`
    For,
    /// `function`
    Function,
    /// `goto` (Lua 5.2+; an identifier in Lua 5.1)
    Goto,
    /// `if`
    If,
    /// `in`
    In,
    /// `local`
    Local,
    /// `nil`
    Nil,
    /// `not`
    Not,
    /// `or`
    Or,
    /// `repeat`
    Repeat,
    /// `return`
    Return,
    /// `then`
    Then,
    /// `true`
    True,
    /// `until`
    Until,
    /// `while`
    While,

    // === Operators ===
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `//` (Lua 5.3+)
    DoubleSlash,
    /// `%`
    Percent,
    /// `^`
    Caret,
    /// `#`
    Hash,
    /// `&` (Lua 5.3+)
    Ampersand,
    /// `~`, binary xor or unary bitwise not (Lua 5.3+)
    Tilde,
    /// `|` (Lua 5.3+)
    Pipe,
    /// `<<` (Lua 5.3+)
    LessLess,
    /// `>>` (Lua 5.3+)
    GreaterGreater,
    /// `==`
    EqualsEquals,
    /// `~=`
    TildeEquals,
    /// `<=`
    LessEquals,
    /// `>=`
    GreaterEquals,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `=`
    Equals,

    // === Delimiters ===
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,

    // === Punctuation ===
    /// `::` (label delimiter, Lua 5.2+)
    ColonColon,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `..`
    DotDot,
    /// `...`
    DotDotDot,

    // === Open classes ===
    /// A name: `foo`, `_ENV`, `x1`
    Identifier,
    /// A numeral: `3`, `0x10`, `1e-3`, `0x1p4`
    Number,
    /// A string literal in any of the three quoting styles
    String,

    // === Special ===
    /// End of file; its leading trivia holds everything after the last token.
    EndOfFile,
    /// Invalid/error token (preserves unlexable text for error recovery)
    Error,
}

impl TokenKind {
    /// Looks up a reserved word.
    ///
    /// `goto` is only reserved when `goto_is_keyword` is set, which matches
    /// the difference between Lua 5.1 and later versions.
    #[must_use]
    pub fn keyword(text: &str, goto_is_keyword: bool) -> Option<Self> {
        let kind = match text {
            "and" => Self::And,
            "break" => Self::Break,
            "do" => Self::Do,
            "else" => Self::Else,
            "elseif" => Self::ElseIf,
            "end" => Self::End,
            "false" => Self::False,
            "for" => Self::For,
            "function" => Self::Function,
            "goto" if goto_is_keyword => Self::Goto,
            "if" => Self::If,
            "in" => Self::In,
            "local" => Self::Local,
            "nil" => Self::Nil,
            "not" => Self::Not,
            "or" => Self::Or,
            "repeat" => Self::Repeat,
            "return" => Self::Return,
            "then" => Self::Then,
            "true" => Self::True,
            "until" => Self::Until,
            "while" => Self::While,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns the fixed source text of keywords and punctuation.
    ///
    /// Open-class tokens (identifiers, numerals, strings, errors) and the
    /// end-of-file marker have no fixed text.
    #[must_use]
    pub const fn fixed_text(self) -> Option<&'static str> {
        let text = match self {
            Self::And => "and",
            Self::Break => "break",
            Self::Do => "do",
            Self::Else => "else",
            Self::ElseIf => "elseif",
            Self::End => "end",
            Self::False => "false",
            Self::For => "for",
            Self::Function => "function",
            Self::Goto => "goto",
            Self::If => "if",
            Self::In => "in",
            Self::Local => "local",
            Self::Nil => "nil",
            Self::Not => "not",
            Self::Or => "or",
            Self::Repeat => "repeat",
            Self::Return => "return",
            Self::Then => "then",
            Self::True => "true",
            Self::Until => "until",
            Self::While => "while",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::DoubleSlash => "//",
            Self::Percent => "%",
            Self::Caret => "^",
            Self::Hash => "#",
            Self::Ampersand => "&",
            Self::Tilde => "~",
            Self::Pipe => "|",
            Self::LessLess => "<<",
            Self::GreaterGreater => ">>",
            Self::EqualsEquals => "==",
            Self::TildeEquals => "~=",
            Self::LessEquals => "<=",
            Self::GreaterEquals => ">=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::Equals => "=",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::LeftBrace => "{",
            Self::RightBrace => "}",
            Self::LeftBracket => "[",
            Self::RightBracket => "]",
            Self::ColonColon => "::",
            Self::Semicolon => ";",
            Self::Colon => ":",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::DotDot => "..",
            Self::DotDotDot => "...",
            Self::Identifier | Self::Number | Self::String | Self::EndOfFile | Self::Error => {
                return None;
            }
        };
        Some(text)
    }

    /// Returns `true` if this token is a reserved word.
    #[must_use]
    pub const fn is_keyword(self) -> bool {
        matches!(
            self,
            Self::And
                | Self::Break
                | Self::Do
                | Self::Else
                | Self::ElseIf
                | Self::End
                | Self::False
                | Self::For
                | Self::Function
                | Self::Goto
                | Self::If
                | Self::In
                | Self::Local
                | Self::Nil
                | Self::Not
                | Self::Or
                | Self::Repeat
                | Self::Return
                | Self::Then
                | Self::True
                | Self::Until
                | Self::While
        )
    }

    /// Returns `true` if this token is a literal value.
    #[must_use]
    pub const fn is_literal(self) -> bool {
        matches!(
            self,
            Self::Nil | Self::True | Self::False | Self::Number | Self::String
        )
    }

    /// Returns `true` if this token closes a block (`end`, `else`, `elseif`,
    /// `until`) or ends the file.
    #[must_use]
    pub const fn is_block_end(self) -> bool {
        matches!(
            self,
            Self::End | Self::Else | Self::ElseIf | Self::Until | Self::EndOfFile
        )
    }

    /// Returns `true` if this is the end-of-file marker.
    #[must_use]
    pub const fn is_eof(self) -> bool {
        matches!(self, Self::EndOfFile)
    }

    /// Returns `true` if this is an error token.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.fixed_text() {
            Some(text) => write!(f, "'{text}'"),
            None => match self {
                Self::Identifier => write!(f, "<name>"),
                Self::Number => write!(f, "<number>"),
                Self::String => write!(f, "<string>"),
                Self::EndOfFile => write!(f, "<eof>"),
                _ => write!(f, "<error>"),
            },
        }
    }
}

/// The decoded value of a literal token.
///
/// Numerals keep Lua 5.3's integer/float subtype exactly as written; strings
/// decode to raw bytes because Lua strings are not required to be UTF-8.
#[derive(Debug, Clone, Default)]
pub enum TokenValue {
    /// The token carries no value (keywords, punctuation, names).
    #[default]
    None,
    /// An integer numeral.
    Integer(i64),
    /// A float numeral.
    Float(f64),
    /// The decoded contents of a string literal.
    Bytes(EcoVec<u8>),
}

impl TokenValue {
    /// Returns the integer value, if this is an integer numeral.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the float value, if this is a float numeral.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the decoded bytes, if this is a string literal.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Returns `true` if the token carries no value.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

// Floats compare by bit pattern so that values can key the token cache.
impl PartialEq for TokenValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for TokenValue {}

impl Hash for TokenValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::None => {}
            Self::Integer(value) => value.hash(state),
            Self::Float(value) => value.to_bits().hash(state),
            Self::Bytes(bytes) => bytes.hash(state),
        }
    }
}

/// The quoting style of a string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringStyle {
    /// `'text'`
    SingleQuoted,
    /// `"text"`
    DoubleQuoted,
    /// `[[text]]`, `[==[text]==]`; `level` counts the `=` signs.
    LongBracket {
        /// Number of `=` between the brackets.
        level: usize,
    },
}

/// Trivia represents non-semantic content like whitespace and comments.
///
/// Preserving trivia lets the tree reproduce the source exactly and lets
/// tools associate comments with adjacent tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Trivia {
    /// Spaces, tabs, form feeds and vertical tabs.
    Whitespace(EcoString),

    /// One line break: `\n`, `\r`, `\r\n` or `\n\r`.
    EndOfLine(EcoString),

    /// A line comment: `-- comment text`
    LineComment(EcoString),

    /// A long comment: `--[[ ... ]]`, `--[==[ ... ]==]`
    BlockComment(EcoString),

    /// A `#!` line at the very start of a script.
    Shebang(EcoString),
}

impl Trivia {
    /// Returns the text content of this trivia.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Whitespace(s)
            | Self::EndOfLine(s)
            | Self::LineComment(s)
            | Self::BlockComment(s)
            | Self::Shebang(s) => s,
        }
    }

    /// Returns the length of this trivia in bytes.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "source files over 4GB are not supported"
    )]
    pub fn len(&self) -> u32 {
        self.as_str().len() as u32
    }

    /// Returns `true` if this trivia has no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    /// Returns `true` if this trivia contains a line break.
    #[must_use]
    pub fn contains_newline(&self) -> bool {
        self.as_str().contains(['\n', '\r'])
    }

    /// Returns `true` if this is whitespace or a line break.
    #[must_use]
    pub const fn is_whitespace(&self) -> bool {
        matches!(self, Self::Whitespace(_) | Self::EndOfLine(_))
    }

    /// Returns `true` if this is a comment.
    #[must_use]
    pub const fn is_comment(&self) -> bool {
        matches!(self, Self::LineComment(_) | Self::BlockComment(_))
    }
}

/// A position-independent token with its surrounding trivia.
///
/// # Examples
///
/// ```
/// use moonlit_syntax::source_analysis::{Token, TokenKind, Trivia};
///
/// let token = Token::new(TokenKind::Identifier, "foo")
///     .with_trivia(vec![Trivia::Whitespace("  ".into())], Vec::new());
/// assert_eq!(token.text(), "foo");
/// assert_eq!(token.full_width(), 5);
/// assert_eq!(token.to_full_string(), "  foo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    kind: TokenKind,
    text: EcoString,
    value: TokenValue,
    leading_trivia: Vec<Trivia>,
    trailing_trivia: Vec<Trivia>,
    missing: bool,
}

impl Token {
    /// Creates a new token with no trivia and no value.
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<EcoString>) -> Self {
        Self {
            kind,
            text: text.into(),
            value: TokenValue::None,
            leading_trivia: Vec::new(),
            trailing_trivia: Vec::new(),
            missing: false,
        }
    }

    /// Creates a zero-width token standing in for one the parser expected
    /// but did not find.
    #[must_use]
    pub fn missing(kind: TokenKind) -> Self {
        Self {
            missing: true,
            ..Self::new(kind, EcoString::new())
        }
    }

    /// Attaches a decoded literal value.
    #[must_use]
    pub fn with_value(mut self, value: TokenValue) -> Self {
        self.value = value;
        self
    }

    /// Attaches leading and trailing trivia.
    #[must_use]
    pub fn with_trivia(mut self, leading_trivia: Vec<Trivia>, trailing_trivia: Vec<Trivia>) -> Self {
        self.leading_trivia = leading_trivia;
        self.trailing_trivia = trailing_trivia;
        self
    }

    /// Returns the kind of this token.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Returns the core text of this token, without trivia.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the decoded literal value.
    #[must_use]
    pub const fn value(&self) -> &TokenValue {
        &self.value
    }

    /// Returns `true` if the parser synthesised this token during recovery.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        self.missing
    }

    /// Returns the trivia that precedes this token.
    #[must_use]
    pub fn leading_trivia(&self) -> &[Trivia] {
        &self.leading_trivia
    }

    /// Returns the trivia that follows this token on the same line.
    #[must_use]
    pub fn trailing_trivia(&self) -> &[Trivia] {
        &self.trailing_trivia
    }

    /// Returns the width of the core text in bytes.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "source files over 4GB are not supported"
    )]
    pub fn width(&self) -> u32 {
        self.text.len() as u32
    }

    /// Returns the width of the leading trivia in bytes.
    #[must_use]
    pub fn leading_width(&self) -> u32 {
        self.leading_trivia.iter().map(Trivia::len).sum()
    }

    /// Returns the width of the trailing trivia in bytes.
    #[must_use]
    pub fn trailing_width(&self) -> u32 {
        self.trailing_trivia.iter().map(Trivia::len).sum()
    }

    /// Returns the width including leading and trailing trivia.
    #[must_use]
    pub fn full_width(&self) -> u32 {
        self.leading_width() + self.width() + self.trailing_width()
    }

    /// Appends the full text (trivia included) to `out`.
    pub fn write_full_text(&self, out: &mut String) {
        for trivia in &self.leading_trivia {
            out.push_str(trivia.as_str());
        }
        out.push_str(&self.text);
        for trivia in &self.trailing_trivia {
            out.push_str(trivia.as_str());
        }
    }

    /// Returns the full text, trivia included.
    #[must_use]
    pub fn to_full_string(&self) -> String {
        let mut out = String::with_capacity(self.full_width() as usize);
        self.write_full_text(&mut out);
        out
    }

    /// Returns the quoting style if this is a string literal.
    #[must_use]
    pub fn string_style(&self) -> Option<StringStyle> {
        if self.kind != TokenKind::String {
            return None;
        }
        match self.text.as_bytes().first()? {
            b'\'' => Some(StringStyle::SingleQuoted),
            b'"' => Some(StringStyle::DoubleQuoted),
            b'[' => {
                let level = self.text.bytes().skip(1).take_while(|&b| b == b'=').count();
                Some(StringStyle::LongBracket { level })
            }
            _ => None,
        }
    }

    /// Returns `true` if this token has any leading comments.
    #[must_use]
    pub fn has_leading_comment(&self) -> bool {
        self.leading_trivia.iter().any(Trivia::is_comment)
    }

    /// Returns `true` if this token has any trailing comments.
    #[must_use]
    pub fn has_trailing_comment(&self) -> bool {
        self.trailing_trivia.iter().any(Trivia::is_comment)
    }

    /// Returns `true` if there's a line break in the leading trivia.
    ///
    /// The parser uses this to pick recovery points: a token that starts a
    /// new line is a likely statement start.
    #[must_use]
    pub fn has_leading_newline(&self) -> bool {
        self.leading_trivia.iter().any(Trivia::contains_newline)
    }
}
