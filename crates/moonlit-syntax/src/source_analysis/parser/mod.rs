// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for Lua source code.
//!
//! This parser builds a lossless concrete syntax tree from a stream of
//! tokens. It is designed for tooling use with comprehensive error recovery
//! and diagnostics.
//!
//! # Design Philosophy
//!
//! - **Error recovery is mandatory** - Parser MUST always produce a tree
//! - **Multiple errors** - Report all errors, don't stop at first
//! - **Lossless** - Every token lands in the tree, skipped ones in `Error` nodes
//! - **Synchronization points** - Recover at statement boundaries
//!
//! # Operator Precedence (Pratt Parsing)
//!
//! Binary operators are parsed with binding powers, lowest first:
//!
//! | Level | Operators | Associativity |
//! |-------|-----------|---------------|
//! | 1  | `or`                          | Left  |
//! | 2  | `and`                         | Left  |
//! | 3  | `<` `>` `<=` `>=` `~=` `==`   | Left  |
//! | 4  | `\|`                          | Left  |
//! | 5  | `~`                           | Left  |
//! | 6  | `&`                           | Left  |
//! | 7  | `<<` `>>`                     | Left  |
//! | 8  | `..`                          | Right |
//! | 10 | `+` `-`                       | Left  |
//! | 11 | `*` `/` `//` `%`              | Left  |
//! | 12 | unary `not` `#` `-` `~`       | -     |
//! | 13 | `^`                           | Right |
//!
//! `^` binds tighter than a unary operator on its left, so `-x^2` is
//! `-(x^2)`, while its right operand may itself be unary (`2^-3`).
//!
//! # Usage
//!
//! ```
//! use moonlit_syntax::source_analysis::{ParseOptions, lex_with_eof, parse};
//! use moonlit_syntax::syntax::SyntaxKind;
//!
//! let tokens = lex_with_eof("x = 3 + 4");
//! let (root, diagnostics) = parse(tokens, &ParseOptions::default());
//!
//! assert!(diagnostics.is_empty());
//! assert_eq!(root.kind(), SyntaxKind::Chunk);
//! assert_eq!(root.to_string(), "x = 3 + 4");
//! ```

use std::sync::Arc;

use ecow::{EcoString, eco_format};
use tracing::trace;

use crate::source_analysis::{
    CancellationToken, Diagnostic, DiagnosticBag, DiagnosticCode, ParseOptions, Span, Token,
    TokenKind, tokenize,
};
use crate::syntax::{GreenElement, GreenNode, NodeCache, SyntaxKind, SyntaxNode};

// Submodules with additional impl blocks for Parser
mod expressions;
mod statements;

#[cfg(test)]
mod property_tests;

// ============================================================================
// Pratt Parsing for Binary Operator Precedence
// ============================================================================

/// Binding power for binary operators (Pratt parsing).
///
/// Higher values bind tighter. Left and right binding powers differ
/// for associativity:
/// - Left-associative: `left_bp == right_bp - 1` (e.g., `+`, `-`)
/// - Right-associative: `left_bp == right_bp + 1` (e.g., `..`, `^`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct BindingPower {
    /// Left binding power (how tightly this operator binds to its left operand).
    pub(super) left: u8,
    /// Right binding power (how tightly this operator binds to its right operand).
    pub(super) right: u8,
}

impl BindingPower {
    /// Creates a left-associative binding power.
    const fn left_assoc(precedence: u8) -> Self {
        Self {
            left: precedence,
            right: precedence + 1,
        }
    }

    /// Creates a right-associative binding power.
    const fn right_assoc(precedence: u8) -> Self {
        Self {
            left: precedence + 1,
            right: precedence,
        }
    }
}

/// Binding power of the operand of a unary operator.
///
/// Only `^` binds tighter.
pub(super) const UNARY_BINDING_POWER: u8 = 12;

/// Gets the binding power for a binary operator.
///
/// Returns `None` for tokens that are not binary operators, which ends the
/// current expression.
pub(super) const fn binary_binding_power(kind: TokenKind) -> Option<BindingPower> {
    Some(match kind {
        TokenKind::Or => BindingPower::left_assoc(1),
        TokenKind::And => BindingPower::left_assoc(2),
        TokenKind::Less
        | TokenKind::Greater
        | TokenKind::LessEquals
        | TokenKind::GreaterEquals
        | TokenKind::TildeEquals
        | TokenKind::EqualsEquals => BindingPower::left_assoc(3),
        TokenKind::Pipe => BindingPower::left_assoc(4),
        TokenKind::Tilde => BindingPower::left_assoc(5),
        TokenKind::Ampersand => BindingPower::left_assoc(6),
        TokenKind::LessLess | TokenKind::GreaterGreater => BindingPower::left_assoc(7),
        TokenKind::DotDot => BindingPower::right_assoc(8),
        TokenKind::Plus | TokenKind::Minus => BindingPower::left_assoc(10),
        TokenKind::Star | TokenKind::Slash | TokenKind::DoubleSlash | TokenKind::Percent => {
            BindingPower::left_assoc(11)
        }
        TokenKind::Caret => BindingPower::right_assoc(13),
        _ => return None,
    })
}

// ============================================================================
// Entry points
// ============================================================================

/// Parses a token stream into a syntax tree.
///
/// The tokens should come from [`tokenize`] or [`lex_with_eof`](super::lex_with_eof);
/// an end-of-file token is appended if missing. Only syntax diagnostics are
/// returned: lexical diagnostics stay with the lexer. Use
/// [`SyntaxTree::parse`](crate::syntax::SyntaxTree::parse) to get both.
#[must_use]
pub fn parse(tokens: Vec<Token>, options: &ParseOptions) -> (SyntaxNode, Vec<Diagnostic>) {
    let mut cache = NodeCache::new();
    let output = parse_tokens(tokens, Vec::new(), options, &mut cache, None);
    (SyntaxNode::new_root(output.green), output.diagnostics)
}

/// Returns `true` if `source` is complete enough to run as an interactive
/// line, i.e. it does not end inside an unclosed construct.
///
/// A line like `for i = 1, 3 do` is incomplete: its first problem is one
/// that more input could fix. Lines whose first error lies elsewhere count
/// as complete so that the caller reports them instead of waiting.
///
/// ```
/// use moonlit_syntax::source_analysis::is_input_complete;
///
/// assert!(is_input_complete("print(1)"));
/// assert!(!is_input_complete("function f()"));
/// assert!(!is_input_complete("x = [[unfinished"));
/// assert!(is_input_complete("x = = 1"));
/// ```
#[must_use]
pub fn is_input_complete(source: &str) -> bool {
    let options = ParseOptions::interactive();
    let (tokens, lexical) = tokenize(source, &options);
    let mut cache = NodeCache::new();
    let output = parse_tokens(tokens, lexical, &options, &mut cache, None);
    let end = u32::try_from(source.len()).unwrap_or(u32::MAX);
    let Some(first) = output.diagnostics.first() else {
        return true;
    };
    !match first.code {
        DiagnosticCode::UnterminatedLongString | DiagnosticCode::UnterminatedComment => true,
        DiagnosticCode::MissingToken | DiagnosticCode::ExpectedExpression => {
            first.span.start() >= end
        }
        _ => false,
    }
}

/// Result of a parse before it is wrapped into a tree.
pub(crate) struct ParseOutput {
    /// The `Chunk` root.
    pub(crate) green: Arc<GreenNode>,
    /// Lexical and syntax diagnostics, in source order.
    pub(crate) diagnostics: Vec<Diagnostic>,
    /// Whether the cancellation token fired.
    pub(crate) cancelled: bool,
}

/// Parses `tokens`, merging `lexical` diagnostics into the result.
pub(crate) fn parse_tokens(
    mut tokens: Vec<Token>,
    lexical: Vec<Diagnostic>,
    options: &ParseOptions,
    cache: &mut NodeCache,
    cancellation: Option<&CancellationToken>,
) -> ParseOutput {
    if !tokens.last().is_some_and(|token| token.kind().is_eof()) {
        tokens.push(Token::new(TokenKind::EndOfFile, ""));
    }
    let mut parser = Parser::new(tokens, *options, cache, cancellation);
    parser.diagnostics.extend(lexical);
    let green = parser.parse_chunk();
    ParseOutput {
        green,
        diagnostics: parser.diagnostics.into_sorted_vec(),
        cancelled: parser.cancelled,
    }
}

// ============================================================================
// Parser state
// ============================================================================

/// Maximum number of nested statements and expressions.
///
/// Matches the C-level limit of the reference interpreter, so anything it
/// accepts parses here too. As a second line of defence,
/// `stacker::maybe_grow` is used at the recursive entry points so the stack
/// is extended on the heap if needed.
const MAX_NESTING_DEPTH: usize = 200;

/// The parser state.
pub(super) struct Parser<'a> {
    /// The tokens being parsed; the last one is always end-of-file.
    tokens: Vec<Token>,
    /// Absolute start of each token's core text.
    starts: Vec<u32>,
    /// 1-based line of each token's core text.
    lines: Vec<u32>,
    /// Current token index.
    current: usize,
    /// Accumulated diagnostics.
    diagnostics: DiagnosticBag,
    /// Grammar variant.
    pub(super) options: ParseOptions,
    /// Current statement/expression nesting depth.
    nesting_depth: usize,
    /// Token interner shared with the caller.
    cache: &'a mut NodeCache,
    cancellation: Option<&'a CancellationToken>,
    /// Set once the cancellation token fired.
    cancelled: bool,
    /// Set after cancellation or a nesting overflow: the rest of the input
    /// is consumed without further diagnostics.
    abandoned: bool,
    /// Token at which the last syntax error was reported.
    last_error_at: Option<usize>,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given tokens.
    fn new(
        tokens: Vec<Token>,
        options: ParseOptions,
        cache: &'a mut NodeCache,
        cancellation: Option<&'a CancellationToken>,
    ) -> Self {
        let mut starts = Vec::with_capacity(tokens.len());
        let mut lines = Vec::with_capacity(tokens.len());
        let mut offset = 0u32;
        let mut line = 1u32;
        for token in &tokens {
            for trivia in token.leading_trivia() {
                offset += trivia.len();
                line += count_line_breaks(trivia.as_str());
            }
            starts.push(offset);
            lines.push(line);
            offset += token.width();
            line += count_line_breaks(token.text());
            for trivia in token.trailing_trivia() {
                offset += trivia.len();
                line += count_line_breaks(trivia.as_str());
            }
        }
        Self {
            tokens,
            starts,
            lines,
            current: 0,
            diagnostics: DiagnosticBag::new(),
            options,
            nesting_depth: 0,
            cache,
            cancellation,
            cancelled: false,
            abandoned: false,
            last_error_at: None,
        }
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// Returns the current token.
    pub(super) fn current_token(&self) -> &Token {
        &self.tokens[self.current]
    }

    /// Returns the current token kind.
    pub(super) fn current_kind(&self) -> TokenKind {
        self.current_token().kind()
    }

    /// Peeks at the kind of the token after the current one.
    pub(super) fn peek_kind(&self) -> TokenKind {
        self.tokens
            .get(self.current + 1)
            .map_or(TokenKind::EndOfFile, Token::kind)
    }

    /// Checks if we're at the end of input.
    pub(super) fn at_eof(&self) -> bool {
        self.current_kind().is_eof()
    }

    /// Checks if the current token matches the given kind.
    pub(super) fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Returns the index of the current token, for spans and openers.
    pub(super) const fn position(&self) -> usize {
        self.current
    }

    /// Consumes the current token into a green element.
    ///
    /// The end-of-file token belongs to the chunk; asking for it here yields
    /// a missing token instead.
    pub(super) fn bump(&mut self) -> GreenElement {
        if self.at_eof() {
            return self.missing(TokenKind::EndOfFile);
        }
        let token = self.tokens[self.current].clone();
        self.current += 1;
        GreenElement::Token(self.cache.token(token))
    }

    /// Consumes the current token if it matches the given kind.
    pub(super) fn eat(&mut self, kind: TokenKind) -> Option<GreenElement> {
        self.check(kind).then(|| self.bump())
    }

    /// A zero-width stand-in for a token that is not there.
    pub(super) fn missing(&mut self, kind: TokenKind) -> GreenElement {
        GreenElement::Token(self.cache.token(Token::missing(kind)))
    }

    /// Expects the current token to match `kind`, advancing if it does.
    ///
    /// Otherwise reports the absence and returns a missing token.
    pub(super) fn expect(&mut self, kind: TokenKind) -> GreenElement {
        if let Some(token) = self.eat(kind) {
            return token;
        }
        let message = eco_format!("{kind} expected near {}", self.near());
        self.error_here(DiagnosticCode::MissingToken, message);
        self.missing(kind)
    }

    /// Like [`expect`](Self::expect) for a closing token, naming the opener
    /// when it sits on an earlier line.
    pub(super) fn expect_closing(
        &mut self,
        kind: TokenKind,
        opener_position: usize,
    ) -> GreenElement {
        if let Some(token) = self.eat(kind) {
            return token;
        }
        let opener = self.tokens[opener_position].kind();
        let opener_line = self.lines[opener_position];
        let current_line = self.lines[self.current];
        let message = if opener_line == current_line {
            eco_format!("{kind} expected near {}", self.near())
        } else {
            eco_format!(
                "{kind} expected (to close {opener} at line {opener_line}) near {}",
                self.near()
            )
        };
        self.error_here(DiagnosticCode::MissingToken, message);
        self.missing(kind)
    }

    /// Expects a name.
    pub(super) fn expect_name(&mut self) -> GreenElement {
        self.expect(TokenKind::Identifier)
    }

    // ========================================================================
    // Spans
    // ========================================================================

    /// Returns the span of the current token's core text.
    pub(super) fn current_span(&self) -> Span {
        Span::with_len(self.starts[self.current], self.current_token().width())
    }

    /// Returns the span from the token at `start` to the last consumed one.
    pub(super) fn span_since(&self, start: usize) -> Span {
        let begin = self.starts[start];
        if self.current <= start {
            return Span::empty(begin);
        }
        let last = self.current - 1;
        Span::new(begin, self.starts[last] + self.tokens[last].width())
    }

    /// Describes the current token the way diagnostics quote it.
    pub(super) fn near(&self) -> EcoString {
        let token = self.current_token();
        if token.kind().is_eof() {
            return EcoString::from("<eof>");
        }
        let text = token.text();
        match text.char_indices().nth(40) {
            Some((cut, _)) => eco_format!("'{}...'", &text[..cut]),
            None => eco_format!("'{text}'"),
        }
    }

    // ========================================================================
    // Error Handling & Recovery
    // ========================================================================

    /// Reports an error, unless the parse has been abandoned.
    pub(super) fn report(
        &mut self,
        code: DiagnosticCode,
        span: Span,
        message: impl Into<EcoString>,
    ) {
        if !self.abandoned {
            self.diagnostics.error(code, span, message);
        }
    }

    /// Adds a prepared diagnostic, unless the parse has been abandoned.
    pub(super) fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        if !self.abandoned {
            self.diagnostics.push(diagnostic);
        }
    }

    /// Reports an error at the current token.
    ///
    /// Only the first error at any one token is kept: a missing expression
    /// followed by recovery over the same token is one problem, not two.
    pub(super) fn error_here(&mut self, code: DiagnosticCode, message: impl Into<EcoString>) {
        if self.last_error_at == Some(self.current) {
            return;
        }
        self.last_error_at = Some(self.current);
        self.report(code, self.current_span(), message);
    }

    /// Reports `feature` at the current token if the options switch it off.
    pub(super) fn require_feature(&mut self, enabled: bool, feature: &str) {
        if !enabled {
            let message = eco_format!("{feature} is not available in the selected Lua version");
            self.report(
                DiagnosticCode::FeatureNotAvailable,
                self.current_span(),
                message,
            );
        }
    }

    /// Skips tokens into an `Error` node until a synchronization point.
    ///
    /// Always consumes at least the current token. Reports `message` at
    /// that token unless it is a lexer error token, which the lexer has
    /// already reported.
    pub(super) fn recover(&mut self, code: DiagnosticCode, message: EcoString) -> GreenElement {
        self.recover_until(code, message, |_| false)
    }

    /// Like [`recover`](Self::recover), also stopping before any token for
    /// which `stop` returns `true`.
    pub(super) fn recover_until(
        &mut self,
        code: DiagnosticCode,
        message: EcoString,
        stop: impl Fn(TokenKind) -> bool,
    ) -> GreenElement {
        if !self.current_kind().is_error() {
            self.error_here(code, message);
        }
        let start = self.current;
        let mut skipped = vec![self.bump()];
        while !self.at_sync_point() && !stop(self.current_kind()) {
            skipped.push(self.bump());
        }
        trace!(
            skipped = skipped.len(),
            span = %self.span_since(start),
            "resynchronised"
        );
        node(SyntaxKind::Error, skipped)
    }

    /// Returns true if the current token is a recovery point.
    ///
    /// Statement keywords, block closers, `;`, end of input, and any token
    /// that begins a new source line.
    pub(super) fn at_sync_point(&self) -> bool {
        let kind = self.current_kind();
        kind.is_block_end()
            || matches!(
                kind,
                TokenKind::Semicolon
                    | TokenKind::ColonColon
                    | TokenKind::If
                    | TokenKind::While
                    | TokenKind::Do
                    | TokenKind::For
                    | TokenKind::Repeat
                    | TokenKind::Function
                    | TokenKind::Local
                    | TokenKind::Return
                    | TokenKind::Break
                    | TokenKind::Goto
            )
            || self.current_token().has_leading_newline()
    }

    /// Increments the nesting depth, or abandons the parse when it exceeds
    /// [`MAX_NESTING_DEPTH`]. Call [`leave_nesting`](Self::leave_nesting)
    /// on every exit path when this returns `Ok(())`.
    ///
    /// On overflow the rest of the input (end of file excluded) is returned
    /// as an `Error` node.
    pub(super) fn enter_nesting(&mut self) -> Result<(), GreenElement> {
        if self.nesting_depth >= MAX_NESTING_DEPTH {
            self.report(
                DiagnosticCode::NestingTooDeep,
                self.current_span(),
                "chunk has too many syntax levels",
            );
            self.abandoned = true;
            let mut rest = Vec::new();
            while !self.at_eof() {
                rest.push(self.bump());
            }
            return Err(node(SyntaxKind::Error, rest));
        }
        self.nesting_depth += 1;
        Ok(())
    }

    /// Decrements the nesting depth (pair with [`enter_nesting`](Self::enter_nesting)).
    pub(super) fn leave_nesting(&mut self) {
        debug_assert!(
            self.nesting_depth > 0,
            "leave_nesting called without matching enter_nesting"
        );
        self.nesting_depth = self.nesting_depth.saturating_sub(1);
    }

    /// Polls the cancellation token. Once it fires, the parser jumps to the
    /// end of input and stays abandoned.
    pub(super) fn check_cancelled(&mut self) -> bool {
        if !self.cancelled && self.cancellation.is_some_and(CancellationToken::is_cancelled) {
            trace!(at = self.current, "parse cancelled");
            self.cancelled = true;
            self.abandoned = true;
            self.current = self.tokens.len() - 1;
        }
        self.cancelled
    }

    // ========================================================================
    // Chunk Parsing
    // ========================================================================

    /// Parses a complete chunk (top-level).
    fn parse_chunk(&mut self) -> Arc<GreenNode> {
        let block = self.parse_block(true);
        let eof = self.tokens[self.current].clone();
        let eof = GreenElement::Token(self.cache.token(eof));
        Arc::new(GreenNode::new(SyntaxKind::Chunk, vec![block, eof]))
    }
}

/// Wraps `children` in a node of `kind`.
pub(super) fn node(kind: SyntaxKind, children: Vec<GreenElement>) -> GreenElement {
    GreenElement::Node(Arc::new(GreenNode::new(kind, children)))
}

/// Returns the node kind of `element`, or `None` for tokens.
pub(super) fn element_kind(element: &GreenElement) -> Option<SyntaxKind> {
    match element {
        GreenElement::Node(node) => Some(node.kind()),
        GreenElement::Token(_) => None,
    }
}

/// Counts line breaks, treating `\r\n` and `\n\r` as one.
fn count_line_breaks(text: &str) -> u32 {
    let bytes = text.as_bytes();
    let mut count = 0;
    let mut index = 0;
    while index < bytes.len() {
        let byte = bytes[index];
        if matches!(byte, b'\n' | b'\r') {
            count += 1;
            let next = bytes.get(index + 1).copied();
            if matches!(next, Some(b'\n' | b'\r')) && next != Some(byte) {
                index += 1;
            }
        }
        index += 1;
    }
    count
}
