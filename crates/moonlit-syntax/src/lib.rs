// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lossless Lua front-end.
//!
//! This crate turns Lua 5.1 to 5.4 source text into a concrete syntax tree
//! that keeps every byte of the input:
//! - Lexical analysis (tokens with attached trivia)
//! - Parsing (green/red syntax tree with error recovery)
//! - Diagnostics (stable codes, `miette` rendering)
//!
//! It is meant as the base of linters, formatters and language servers,
//! so it favours recovery over stopping: any input yields a tree, and
//! `tree.to_full_string()` always gives back the input.
//!
//! ```
//! use moonlit_syntax::prelude::*;
//!
//! let source = "local x = = 1\nprint(x)";
//! let tree = SyntaxTree::parse(source, &ParseOptions::default());
//! assert_eq!(tree.to_full_string(), source);
//! assert_eq!(tree.diagnostics().len(), 1);
//! // `= 1` is skipped into an error node that stands in for a statement.
//! assert_eq!(tree.chunk().block().unwrap().statements().count(), 3);
//! ```

pub mod source_analysis;
pub mod syntax;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::source_analysis::{
        Diagnostic, DiagnosticCode, LuaVersion, ParseError, ParseOptions, SourceKind, Span,
        TokenKind,
    };
    pub use crate::syntax::ast::{AstNode, Expression, Statement};
    pub use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxToken, SyntaxTree};
}
