// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Diagnostics produced while lexing and parsing.
//!
//! Problems in the source never abort a parse. The lexer and parser record
//! them as [`Diagnostic`]s in a [`DiagnosticBag`], which is frozen into the
//! resulting [`SyntaxTree`](crate::syntax::SyntaxTree).
//!
//! Every diagnostic carries a stable [`DiagnosticCode`] (`LUA0001`,
//! `LUA1003`, ...). Codes below `LUA1000` come from the lexer, codes from
//! `LUA1000` up come from the parser.
//!
//! For printing, [`Diagnostic::to_report`] converts a diagnostic into a
//! [`SourceDiagnostic`], which implements [`miette::Diagnostic`].

use std::fmt;

use ecow::EcoString;
use miette::{LabeledSpan, NamedSource, SourceCode};
use serde::{Deserialize, Serialize};

use super::Span;

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    /// The source is not valid Lua for the selected options.
    Error,
    /// Valid, but probably not what the author meant.
    Warning,
    /// Informational note.
    Hint,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Hint => write!(f, "hint"),
        }
    }
}

impl From<Severity> for miette::Severity {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Error => Self::Error,
            Severity::Warning => Self::Warning,
            Severity::Hint => Self::Advice,
        }
    }
}

/// Stable identifier for each kind of problem the front-end reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticCode {
    // === Lexical ===
    /// A character that cannot start any token.
    UnexpectedCharacter,
    /// A short string hit a line break or the end of input.
    UnterminatedString,
    /// A long-bracket string has no matching closing bracket.
    UnterminatedLongString,
    /// A long comment has no matching closing bracket.
    UnterminatedComment,
    /// `[=` not followed by more `=` and a `[`.
    InvalidLongStringDelimiter,
    /// A numeral that does not decode.
    MalformedNumber,
    /// An unknown or incomplete escape sequence.
    InvalidEscape,
    /// A `\ddd` escape above 255.
    DecimalEscapeTooLarge,
    /// A `\u{...}` escape above 2^31 - 1.
    UnicodeEscapeTooLarge,
    /// Source bytes that are not UTF-8.
    InvalidUtf8,

    // === Syntax ===
    /// A token that cannot start or continue the current construct.
    UnexpectedToken,
    /// An expected token was absent.
    MissingToken,
    /// An expression was required here.
    ExpectedExpression,
    /// The left-hand side of an assignment is not a variable.
    InvalidAssignmentTarget,
    /// An expression used where a statement is required.
    NotAStatement,
    /// A local attribute other than `const` or `close`.
    UnknownAttribute,
    /// A statement following `return` in the same block.
    StatementAfterReturn,
    /// Syntax that the selected Lua version does not have.
    FeatureNotAvailable,
    /// Too many nested syntactic levels.
    NestingTooDeep,
}

impl DiagnosticCode {
    /// Returns the numeric part of the code.
    #[must_use]
    pub const fn number(self) -> u16 {
        match self {
            Self::UnexpectedCharacter => 1,
            Self::UnterminatedString => 2,
            Self::UnterminatedLongString => 3,
            Self::UnterminatedComment => 4,
            Self::InvalidLongStringDelimiter => 5,
            Self::MalformedNumber => 6,
            Self::InvalidEscape => 7,
            Self::DecimalEscapeTooLarge => 8,
            Self::UnicodeEscapeTooLarge => 9,
            Self::InvalidUtf8 => 10,
            Self::UnexpectedToken => 1001,
            Self::MissingToken => 1002,
            Self::ExpectedExpression => 1003,
            Self::InvalidAssignmentTarget => 1004,
            Self::NotAStatement => 1005,
            Self::UnknownAttribute => 1006,
            Self::StatementAfterReturn => 1007,
            Self::FeatureNotAvailable => 1008,
            Self::NestingTooDeep => 1009,
        }
    }

    /// Returns `true` for codes reported by the lexer.
    #[must_use]
    pub const fn is_lexical(self) -> bool {
        self.number() < 1000
    }

    /// Returns the rendered code, e.g. `LUA0002`.
    #[must_use]
    pub fn as_code(self) -> EcoString {
        ecow::eco_format!("LUA{:04}", self.number())
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LUA{:04}", self.number())
    }
}

/// A diagnostic message (error, warning, or hint).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The severity of the diagnostic.
    pub severity: Severity,
    /// What went wrong.
    pub code: DiagnosticCode,
    /// The source location (absolute byte offsets).
    pub span: Span,
    /// The error message.
    pub message: EcoString,
    /// Optional hint for how to fix the issue.
    pub hint: Option<EcoString>,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub fn new(
        severity: Severity,
        code: DiagnosticCode,
        span: Span,
        message: impl Into<EcoString>,
    ) -> Self {
        Self {
            severity,
            code,
            span,
            message: message.into(),
            hint: None,
        }
    }

    /// Creates a new error diagnostic.
    #[must_use]
    pub fn error(code: DiagnosticCode, span: Span, message: impl Into<EcoString>) -> Self {
        Self::new(Severity::Error, code, span, message)
    }

    /// Creates a new warning diagnostic.
    #[must_use]
    pub fn warning(code: DiagnosticCode, span: Span, message: impl Into<EcoString>) -> Self {
        Self::new(Severity::Warning, code, span, message)
    }

    /// Attaches a hint for how to fix the issue.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<EcoString>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Returns `true` if this is an error.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }

    /// Builds a renderable report for this diagnostic against its source.
    #[must_use]
    pub fn to_report(&self, name: &str, source: &str) -> SourceDiagnostic {
        SourceDiagnostic {
            severity: self.severity,
            code: self.code,
            message: self.message.to_string(),
            hint: self.hint.as_ref().map(ToString::to_string),
            span: self.span,
            src: NamedSource::new(name, source.to_string()),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] at {}: {}",
            self.severity, self.code, self.span, self.message
        )
    }
}

/// An ordered collection of diagnostics.
///
/// Insertion never fails and never deduplicates. [`DiagnosticBag::iter`]
/// yields diagnostics in source order: by span start, ties kept in
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Appends a diagnostic built from its parts.
    pub fn add(
        &mut self,
        severity: Severity,
        code: DiagnosticCode,
        span: Span,
        message: impl Into<EcoString>,
    ) {
        self.push(Diagnostic::new(severity, code, span, message));
    }

    /// Appends an error.
    pub fn error(&mut self, code: DiagnosticCode, span: Span, message: impl Into<EcoString>) {
        self.add(Severity::Error, code, span, message);
    }

    /// Appends a warning.
    pub fn warning(&mut self, code: DiagnosticCode, span: Span, message: impl Into<EcoString>) {
        self.add(Severity::Warning, code, span, message);
    }

    /// Returns the number of diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Returns `true` if nothing has been reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Iterates in source order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        let mut sorted: Vec<&Diagnostic> = self.diagnostics.iter().collect();
        sorted.sort_by_key(|d| d.span.start());
        sorted.into_iter()
    }

    /// Consumes the bag, returning diagnostics in source order.
    #[must_use]
    pub fn into_sorted_vec(mut self) -> Vec<Diagnostic> {
        // `sort_by_key` is stable, so equal starts keep insertion order.
        self.diagnostics.sort_by_key(|d| d.span.start());
        self.diagnostics
    }
}

impl Extend<Diagnostic> for DiagnosticBag {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        self.diagnostics.extend(iter);
    }
}

impl FromIterator<Diagnostic> for DiagnosticBag {
    fn from_iter<T: IntoIterator<Item = Diagnostic>>(iter: T) -> Self {
        Self {
            diagnostics: iter.into_iter().collect(),
        }
    }
}

/// A diagnostic bound to its source text, ready for [`miette`] rendering.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct SourceDiagnostic {
    severity: Severity,
    code: DiagnosticCode,
    message: String,
    hint: Option<String>,
    span: Span,
    src: NamedSource<String>,
}

impl SourceDiagnostic {
    /// Returns the severity.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the diagnostic code.
    #[must_use]
    pub const fn code(&self) -> DiagnosticCode {
        self.code
    }

    /// Returns the labelled span.
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }
}

impl miette::Diagnostic for SourceDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(self.severity.into())
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.hint
            .as_ref()
            .map(|hint| Box::new(hint) as Box<dyn fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.src)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = match self.severity {
            Severity::Error => "error here",
            Severity::Warning => "warning here",
            Severity::Hint => "note",
        };
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(label.to_string()),
            self.span,
        ))))
    }
}

#[cfg(test)]
mod tests {
    use miette::Diagnostic as _;

    use super::*;

    #[test]
    fn codes_render_with_prefix() {
        assert_eq!(DiagnosticCode::UnexpectedCharacter.to_string(), "LUA0001");
        assert_eq!(DiagnosticCode::UnicodeEscapeTooLarge.to_string(), "LUA0009");
        assert_eq!(DiagnosticCode::InvalidUtf8.to_string(), "LUA0010");
        assert_eq!(DiagnosticCode::UnexpectedToken.to_string(), "LUA1001");
        assert_eq!(DiagnosticCode::NestingTooDeep.as_code(), "LUA1009");
    }

    #[test]
    fn lexical_codes_are_below_one_thousand() {
        assert!(DiagnosticCode::MalformedNumber.is_lexical());
        assert!(!DiagnosticCode::MissingToken.is_lexical());
    }

    #[test]
    fn bag_iterates_in_source_order() {
        let mut bag = DiagnosticBag::new();
        bag.error(DiagnosticCode::MissingToken, Span::new(10, 10), "second");
        bag.error(DiagnosticCode::UnexpectedToken, Span::new(2, 3), "first");
        bag.warning(DiagnosticCode::StatementAfterReturn, Span::new(10, 12), "third");

        let messages: Vec<_> = bag.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
        assert_eq!(bag.len(), 3);
        assert!(bag.has_errors());

        let sorted = bag.into_sorted_vec();
        assert_eq!(sorted[0].message, "first");
        assert_eq!(sorted[2].severity, Severity::Warning);
    }

    #[test]
    fn bag_does_not_deduplicate() {
        let mut bag = DiagnosticBag::new();
        let diagnostic = Diagnostic::error(DiagnosticCode::InvalidEscape, Span::new(0, 2), "x");
        bag.extend([diagnostic.clone(), diagnostic]);
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn empty_bag() {
        let bag = DiagnosticBag::default();
        assert!(bag.is_empty());
        assert!(!bag.has_errors());
        assert_eq!(bag.iter().count(), 0);
    }

    #[test]
    fn diagnostic_display() {
        let diagnostic = Diagnostic::error(
            DiagnosticCode::UnterminatedString,
            Span::new(0, 5),
            "unfinished string",
        );
        assert_eq!(
            diagnostic.to_string(),
            "error[LUA0002] at 0..5: unfinished string"
        );
    }

    #[test]
    fn report_carries_code_span_and_help() {
        let source = "x = = 1";
        let diagnostic = Diagnostic::error(
            DiagnosticCode::ExpectedExpression,
            Span::new(4, 5),
            "unexpected symbol near '='",
        )
        .with_hint("remove the extra '='");
        let report = diagnostic.to_report("test.lua", source);

        assert_eq!(report.to_string(), "unexpected symbol near '='");
        assert_eq!(report.code(), DiagnosticCode::ExpectedExpression);
        assert_eq!(
            miette::Diagnostic::code(&report).map(|c| c.to_string()),
            Some("LUA1003".to_string())
        );
        assert_eq!(report.help().map(|h| h.to_string()).as_deref(), Some("remove the extra '='"));
        assert_eq!(
            miette::Diagnostic::severity(&report),
            Some(miette::Severity::Error)
        );

        let labels: Vec<_> = report.labels().into_iter().flatten().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 4);
        assert_eq!(labels[0].len(), 1);
        assert_eq!(labels[0].label(), Some("error here"));
        assert!(report.source_code().is_some());
    }

    #[test]
    fn warning_report_label() {
        let diagnostic = Diagnostic::warning(
            DiagnosticCode::StatementAfterReturn,
            Span::new(0, 0),
            "unreachable",
        );
        let report = diagnostic.to_report("w.lua", "");
        assert_eq!(
            miette::Diagnostic::severity(&report),
            Some(miette::Severity::Warning)
        );
        let labels: Vec<_> = report.labels().into_iter().flatten().collect();
        assert_eq!(labels[0].label(), Some("warning here"));
        assert_eq!(labels[0].len(), 0);
    }
}
