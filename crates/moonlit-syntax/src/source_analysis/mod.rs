// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexing and parsing for Lua source code.
//!
//! This module contains the lexer, the parser and the diagnostics they
//! report.
//!
//! # Lexical Analysis
//!
//! The [`Lexer`] converts source text into a stream of [`Token`]s. Tokens
//! carry their core text and the trivia (whitespace and comments) around
//! them, but no positions: offsets are recomputed from widths, so a token
//! can be shared between trees.
//!
//! ```
//! use moonlit_syntax::source_analysis::{TokenKind, lex};
//!
//! let kinds: Vec<_> = lex("x + 1").iter().map(|t| t.kind()).collect();
//! assert_eq!(kinds, [TokenKind::Identifier, TokenKind::Plus, TokenKind::Number]);
//! ```
//!
//! See [`TokenKind`] for all supported syntactic elements.
//!
//! # Parsing
//!
//! The [`parse`] function converts tokens into a concrete syntax tree.
//! Binary operator precedence uses Pratt parsing (see [`parse`] for the
//! table). Most callers want [`SyntaxTree::parse`](crate::syntax::SyntaxTree::parse),
//! which lexes, parses and merges the diagnostics of both phases.
//!
//! # Error Handling
//!
//! Neither phase stops at the first problem. The lexer turns unusable input
//! into [`TokenKind::Error`] tokens, the parser skips unexpected tokens into
//! `Error` nodes, and both report [`Diagnostic`]s. [`ParseError`] is only
//! for failures of the call itself, such as cancellation. Source bytes
//! that are not UTF-8 go through [`DecodedSource`] and are reported as
//! warnings.

mod diagnostics;
mod error;
mod lexer;
mod options;
mod parser;
mod position;
mod source_text;
mod span;
mod token;


pub use diagnostics::{Diagnostic, DiagnosticBag, DiagnosticCode, Severity, SourceDiagnostic};
pub use error::{CancellationToken, ParseError};
pub use lexer::{Lexer, lex, lex_with_eof, tokenize, tokenize_decoded};
pub use options::{LuaVersion, ParseOptions, SourceKind, SyntaxOptions};
pub(crate) use parser::parse_tokens;
pub use parser::{is_input_complete, parse};
pub use position::{LineIndex, Position};
pub(crate) use source_text::restore_bytes;
pub use source_text::{DecodedSource, ReplacedBytes};
pub use span::Span;
pub use token::{StringStyle, Token, TokenKind, TokenValue, Trivia};
