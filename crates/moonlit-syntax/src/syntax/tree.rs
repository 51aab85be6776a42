// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The result of parsing one source text.
//!
//! A [`SyntaxTree`] owns the green root, the diagnostics of both phases
//! and a [`LineIndex`] for turning spans into line/column positions. It is
//! immutable once built and can be shared between threads.

use std::sync::Arc;

use tracing::{debug, instrument};

use super::ast::Chunk;
use super::{GreenNode, NodeCache, SyntaxNode};
use crate::source_analysis::{
    CancellationToken, DecodedSource, Diagnostic, LineIndex, ParseError, ParseOptions,
    ReplacedBytes, SourceDiagnostic, Token, parse_tokens, restore_bytes, tokenize,
    tokenize_decoded,
};

/// A parsed source text with its diagnostics.
///
/// ```
/// use moonlit_syntax::source_analysis::ParseOptions;
/// use moonlit_syntax::syntax::SyntaxTree;
///
/// let source = "local t = { 1, 2 }\nprint(#t)";
/// let tree = SyntaxTree::parse(source, &ParseOptions::default());
/// assert!(!tree.has_errors());
/// assert_eq!(tree.to_full_string(), source);
/// ```
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    green: Arc<GreenNode>,
    diagnostics: Vec<Diagnostic>,
    options: ParseOptions,
    line_index: LineIndex,
    replaced: Vec<ReplacedBytes>,
}

impl SyntaxTree {
    /// Parses `text`. Never fails: problems in the source are diagnostics.
    #[must_use]
    pub fn parse(text: &str, options: &ParseOptions) -> Self {
        let mut cache = NodeCache::new();
        let lexed = tokenize(text, options);
        Self::build(text, &[], lexed, options, &mut cache, None).0
    }

    /// Parses raw source bytes. Never fails.
    ///
    /// Lua source need not be UTF-8. Each invalid byte sequence appears in
    /// the tree text as `U+FFFD` with an [`InvalidUtf8`] warning, string
    /// literal values keep the original bytes, and
    /// [`to_full_bytes`](Self::to_full_bytes) gives back the input exactly.
    /// Spans refer to the decoded text.
    ///
    /// ```
    /// use moonlit_syntax::source_analysis::{DiagnosticCode, ParseOptions};
    /// use moonlit_syntax::syntax::SyntaxTree;
    ///
    /// let source = b"-- caf\xe9\nx = 1";
    /// let tree = SyntaxTree::parse_bytes(source, &ParseOptions::default());
    /// assert!(!tree.has_errors());
    /// assert_eq!(tree.diagnostics()[0].code, DiagnosticCode::InvalidUtf8);
    /// assert_eq!(tree.to_full_bytes(), source);
    /// ```
    ///
    /// [`InvalidUtf8`]: crate::source_analysis::DiagnosticCode::InvalidUtf8
    #[must_use]
    pub fn parse_bytes(bytes: &[u8], options: &ParseOptions) -> Self {
        let decoded = DecodedSource::decode(bytes);
        let mut cache = NodeCache::new();
        let lexed = tokenize_decoded(&decoded, options);
        Self::build(decoded.text(), decoded.replaced(), lexed, options, &mut cache, None).0
    }

    /// Parses `text` through a caller-owned token cache, stopping early if
    /// `cancellation` fires.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Cancelled`] if the token was cancelled before
    /// or during the parse.
    pub fn parse_with(
        text: &str,
        options: &ParseOptions,
        cache: &mut NodeCache,
        cancellation: Option<&CancellationToken>,
    ) -> Result<Self, ParseError> {
        if cancellation.is_some_and(CancellationToken::is_cancelled) {
            return Err(ParseError::Cancelled);
        }
        let lexed = tokenize(text, options);
        let (tree, cancelled) = Self::build(text, &[], lexed, options, cache, cancellation);
        if cancelled {
            return Err(ParseError::Cancelled);
        }
        Ok(tree)
    }

    #[instrument(skip_all, fields(len = text.len(), kind = ?options.kind))]
    fn build(
        text: &str,
        replaced: &[ReplacedBytes],
        lexed: (Vec<Token>, Vec<Diagnostic>),
        options: &ParseOptions,
        cache: &mut NodeCache,
        cancellation: Option<&CancellationToken>,
    ) -> (Self, bool) {
        let (tokens, lexical) = lexed;
        let token_count = tokens.len();
        let output = parse_tokens(tokens, lexical, options, cache, cancellation);
        debug!(
            tokens = token_count,
            diagnostics = output.diagnostics.len(),
            cancelled = output.cancelled,
            "parsed source"
        );
        let tree = Self {
            green: output.green,
            diagnostics: output.diagnostics,
            options: *options,
            line_index: LineIndex::new(text),
            replaced: replaced.to_vec(),
        };
        (tree, output.cancelled)
    }

    /// Returns the red root node (a `Chunk`).
    #[must_use]
    pub fn root(&self) -> SyntaxNode {
        SyntaxNode::new_root(Arc::clone(&self.green))
    }

    /// Returns the green root node.
    #[must_use]
    pub fn green(&self) -> &Arc<GreenNode> {
        &self.green
    }

    /// Returns the typed view of the root.
    #[must_use]
    pub fn chunk(&self) -> Chunk {
        Chunk::from_root(self.root())
    }

    /// Returns all diagnostics, lexical and syntax, in source order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Reconstructs the source text.
    #[must_use]
    pub fn to_full_string(&self) -> String {
        self.green.to_full_string()
    }

    /// Reconstructs the source bytes, restoring any that were not UTF-8.
    #[must_use]
    pub fn to_full_bytes(&self) -> Vec<u8> {
        restore_bytes(&self.to_full_string(), &self.replaced)
    }

    /// Returns the options the tree was parsed with.
    #[must_use]
    pub const fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Returns the line index of the source text.
    #[must_use]
    pub const fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// Binds every diagnostic to the source text under `name`, ready to be
    /// rendered with `miette`.
    #[must_use]
    pub fn reports(&self, name: &str) -> Vec<SourceDiagnostic> {
        let source = self.to_full_string();
        self.diagnostics
            .iter()
            .map(|diagnostic| diagnostic.to_report(name, &source))
            .collect()
    }
}
