// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Node kinds of the concrete syntax tree.
//!
//! One kind per grammar production. The kind fixes the shape of a node's
//! children:
//!
//! | Kind | Children |
//! |------|----------|
//! | `Chunk` | `Block`, end-of-file token |
//! | `Block` | statements |
//! | `LocalVariableDeclaration` | `local`, `LocalNameList`, (`=`, `ExpressionList`)? |
//! | `FunctionBody` | `(`, `ParameterList`, `)`, `Block`, `end` |
//! | `IfStatement` | `if`, expr, `then`, `Block`, `ElseIfClauseList`, `ElseClause`?, `end` |
//! | `NumericForStatement` | `for`, name, `=`, expr, `,`, expr, (`,` expr)?, `do`, `Block`, `end` |
//! | `BinaryExpression` | expr, operator, expr |
//! | `Error` | anything, possibly nothing |
//!
//! The typed views in [`ast`](super::ast) document the rest.

use std::fmt;

/// The kind of a syntax node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SyntaxKind {
    // === Structure ===
    /// The root: a `Block` followed by the end-of-file token.
    Chunk,
    /// A sequence of statements.
    Block,

    // === Statements ===
    /// `;`
    EmptyStatement,
    /// `local a, b <const> = 1, 2`
    LocalVariableDeclaration,
    /// The names of a local declaration.
    LocalNameList,
    /// One declared local with its optional attribute.
    LocalName,
    /// `<const>` or `<close>`
    Attribute,
    /// `local function f() end`
    LocalFunctionDeclaration,
    /// `function a.b:c() end`
    FunctionDeclaration,
    /// `a.b:c` in a function declaration.
    FunctionName,
    /// Parameters, body and `end` of any function.
    FunctionBody,
    /// `(a, b, ...)`
    ParameterList,
    /// `a, b.c = 1, 2`
    AssignmentStatement,
    /// Left-hand side of an assignment.
    AssignmentTargetList,
    /// A function or method call used as a statement.
    CallStatement,
    /// Any other expression in statement position.
    ExpressionStatement,
    /// `do ... end`
    DoStatement,
    /// `while cond do ... end`
    WhileStatement,
    /// `repeat ... until cond`
    RepeatStatement,
    /// `if cond then ... elseif ... else ... end`
    IfStatement,
    /// The `elseif` clauses of an `if`, possibly none.
    ElseIfClauseList,
    /// `elseif cond then ...`
    ElseIfClause,
    /// `else ...`
    ElseClause,
    /// `for i = 1, 10, 2 do ... end`
    NumericForStatement,
    /// `for k, v in pairs(t) do ... end`
    GenericForStatement,
    /// Names of a generic `for`.
    NameList,
    /// `return a, b`
    ReturnStatement,
    /// `break`
    BreakStatement,
    /// `goto name`
    GotoStatement,
    /// `::name::`
    LabelStatement,

    // === Expressions ===
    /// Comma-separated expressions, possibly none.
    ExpressionList,
    /// `nil`, `true`, `false`, a numeral or a string.
    LiteralExpression,
    /// `...`
    VarargExpression,
    /// A variable reference.
    NameExpression,
    /// `(expr)`
    ParenthesizedExpression,
    /// `a.b`
    MemberAccessExpression,
    /// `a[b]`
    IndexExpression,
    /// `f(args)`, `f"s"`, `f{...}`
    FunctionCallExpression,
    /// `obj:m(args)`
    MethodCallExpression,
    /// `(a, b)` as call arguments.
    ParenthesizedArguments,
    /// `"s"` or `[[s]]` as the sole call argument.
    StringArgument,
    /// `{...}` as the sole call argument.
    TableArgument,
    /// `function(a) ... end`
    AnonymousFunctionExpression,
    /// `{ ... }`
    TableConstructorExpression,
    /// The fields of a table constructor.
    FieldList,
    /// `name = expr`
    IdentifierKeyedField,
    /// `[expr] = expr`
    ExpressionKeyedField,
    /// `expr`
    UnkeyedField,
    /// `a + b`
    BinaryExpression,
    /// `-a`, `not a`, `#a`, `~a`
    UnaryExpression,

    // === Recovery ===
    /// Skipped tokens, or an empty placeholder for a missing expression.
    Error,
}

impl SyntaxKind {
    /// Returns `true` for statement kinds (including `Error`, which can stand
    /// in for a statement).
    #[must_use]
    pub const fn is_statement(self) -> bool {
        matches!(
            self,
            Self::EmptyStatement
                | Self::LocalVariableDeclaration
                | Self::LocalFunctionDeclaration
                | Self::FunctionDeclaration
                | Self::AssignmentStatement
                | Self::CallStatement
                | Self::ExpressionStatement
                | Self::DoStatement
                | Self::WhileStatement
                | Self::RepeatStatement
                | Self::IfStatement
                | Self::NumericForStatement
                | Self::GenericForStatement
                | Self::ReturnStatement
                | Self::BreakStatement
                | Self::GotoStatement
                | Self::LabelStatement
                | Self::Error
        )
    }

    /// Returns `true` for expression kinds (including `Error`, which can
    /// stand in for a missing expression).
    #[must_use]
    pub const fn is_expression(self) -> bool {
        matches!(
            self,
            Self::LiteralExpression
                | Self::VarargExpression
                | Self::NameExpression
                | Self::ParenthesizedExpression
                | Self::MemberAccessExpression
                | Self::IndexExpression
                | Self::FunctionCallExpression
                | Self::MethodCallExpression
                | Self::AnonymousFunctionExpression
                | Self::TableConstructorExpression
                | Self::BinaryExpression
                | Self::UnaryExpression
                | Self::Error
        )
    }

    /// Returns `true` for list kinds, whose children repeat.
    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(
            self,
            Self::Block
                | Self::LocalNameList
                | Self::ParameterList
                | Self::AssignmentTargetList
                | Self::ElseIfClauseList
                | Self::NameList
                | Self::ExpressionList
                | Self::FieldList
        )
    }

    /// Returns `true` for table-constructor field kinds.
    #[must_use]
    pub const fn is_field(self) -> bool {
        matches!(
            self,
            Self::IdentifierKeyedField | Self::ExpressionKeyedField | Self::UnkeyedField
        )
    }

    /// Returns `true` for the three call-argument forms.
    #[must_use]
    pub const fn is_call_arguments(self) -> bool {
        matches!(
            self,
            Self::ParenthesizedArguments | Self::StringArgument | Self::TableArgument
        )
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_is_both_statement_and_expression() {
        assert!(SyntaxKind::Error.is_statement());
        assert!(SyntaxKind::Error.is_expression());
    }

    #[test]
    fn categories_are_disjoint_otherwise() {
        assert!(SyntaxKind::WhileStatement.is_statement());
        assert!(!SyntaxKind::WhileStatement.is_expression());
        assert!(SyntaxKind::BinaryExpression.is_expression());
        assert!(!SyntaxKind::BinaryExpression.is_statement());
        assert!(SyntaxKind::UnkeyedField.is_field());
        assert!(SyntaxKind::StringArgument.is_call_arguments());
        assert!(SyntaxKind::ExpressionList.is_list());
        assert!(!SyntaxKind::Chunk.is_list());
    }

    #[test]
    fn display_is_the_variant_name() {
        assert_eq!(SyntaxKind::NumericForStatement.to_string(), "NumericForStatement");
    }
}
