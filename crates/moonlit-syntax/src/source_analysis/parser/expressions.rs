// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expression parsing for Lua.
//!
//! This module contains the expression methods of the `Parser`:
//!
//! - Binary and unary operators (Pratt parsing, see [`binary_binding_power`])
//! - Simple expressions (literals, `...`, table constructors, function literals)
//! - Suffixed expressions (names, parentheses, `.` / `[]` / `:` and calls)
//! - Call arguments, including the `f"s"` and `f{...}` sugar

use ecow::eco_format;

use crate::source_analysis::{DiagnosticCode, TokenKind};
use crate::syntax::{GreenElement, SyntaxKind};

use super::{Parser, UNARY_BINDING_POWER, binary_binding_power, node};

/// Returns `true` if a token of `kind` can begin an expression.
pub(super) const fn can_start_expression(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier
            | TokenKind::LeftParen
            | TokenKind::Number
            | TokenKind::String
            | TokenKind::Nil
            | TokenKind::True
            | TokenKind::False
            | TokenKind::DotDotDot
            | TokenKind::LeftBrace
            | TokenKind::Function
            | TokenKind::Not
            | TokenKind::Minus
            | TokenKind::Hash
            | TokenKind::Tilde
    )
}

const fn is_unary_operator(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Not | TokenKind::Minus | TokenKind::Hash | TokenKind::Tilde
    )
}

impl Parser<'_> {
    /// Parses a full expression.
    pub(super) fn parse_expression(&mut self) -> GreenElement {
        self.parse_subexpression(0)
    }

    /// Parses `expr {, expr}`.
    pub(super) fn parse_expression_list(&mut self) -> GreenElement {
        let mut children = vec![self.parse_expression()];
        while let Some(comma) = self.eat(TokenKind::Comma) {
            children.push(comma);
            children.push(self.parse_expression());
        }
        node(SyntaxKind::ExpressionList, children)
    }

    /// Parses operators binding at least as tightly as `min_power`.
    ///
    /// Uses `stacker::maybe_grow` to extend the stack on the heap if
    /// remaining stack space falls below 32 KiB.
    fn parse_subexpression(&mut self, min_power: u8) -> GreenElement {
        stacker::maybe_grow(32 * 1024, 256 * 1024, || {
            if self.check_cancelled() {
                return node(SyntaxKind::Error, Vec::new());
            }
            if let Err(error) = self.enter_nesting() {
                return error;
            }

            let mut lhs = if is_unary_operator(self.current_kind()) {
                self.parse_unary_expression()
            } else {
                self.parse_simple_expression()
            };

            while let Some(power) = binary_binding_power(self.current_kind()) {
                if power.left < min_power {
                    break;
                }
                self.check_operator_feature();
                let operator = self.bump();
                let rhs = self.parse_subexpression(power.right);
                lhs = node(SyntaxKind::BinaryExpression, vec![lhs, operator, rhs]);
            }

            self.leave_nesting();
            lhs
        })
    }

    fn parse_unary_expression(&mut self) -> GreenElement {
        self.check_operator_feature();
        let operator = self.bump();
        let operand = self.parse_subexpression(UNARY_BINDING_POWER);
        node(SyntaxKind::UnaryExpression, vec![operator, operand])
    }

    /// Reports operators switched off by the grammar options.
    fn check_operator_feature(&mut self) {
        match self.current_kind() {
            TokenKind::DoubleSlash => {
                self.require_feature(self.options.syntax.integer_division, "integer division");
            }
            TokenKind::Ampersand
            | TokenKind::Pipe
            | TokenKind::Tilde
            | TokenKind::LessLess
            | TokenKind::GreaterGreater => {
                self.require_feature(self.options.syntax.bitwise_operators, "bitwise operators");
            }
            _ => {}
        }
    }

    // ========================================================================
    // Simple and suffixed expressions
    // ========================================================================

    fn parse_simple_expression(&mut self) -> GreenElement {
        match self.current_kind() {
            TokenKind::Number
            | TokenKind::String
            | TokenKind::Nil
            | TokenKind::True
            | TokenKind::False => node(SyntaxKind::LiteralExpression, vec![self.bump()]),
            TokenKind::DotDotDot => node(SyntaxKind::VarargExpression, vec![self.bump()]),
            TokenKind::LeftBrace => self.parse_table_constructor(),
            TokenKind::Function => {
                let opener = self.position();
                let function = self.bump();
                let body = self.parse_function_body(opener);
                node(SyntaxKind::AnonymousFunctionExpression, vec![function, body])
            }
            _ => self.parse_suffixed_expression(),
        }
    }

    /// Parses a name or parenthesised expression followed by any number of
    /// member accesses, indexes and calls.
    fn parse_suffixed_expression(&mut self) -> GreenElement {
        let mut expression = match self.current_kind() {
            TokenKind::Identifier => node(SyntaxKind::NameExpression, vec![self.bump()]),
            TokenKind::LeftParen => {
                let opener = self.position();
                let open = self.bump();
                let inner = self.parse_expression();
                let close = self.expect_closing(TokenKind::RightParen, opener);
                node(SyntaxKind::ParenthesizedExpression, vec![open, inner, close])
            }
            // The lexer has reported it; keep the token in the tree.
            TokenKind::Error => return node(SyntaxKind::Error, vec![self.bump()]),
            _ => return self.missing_expression(),
        };

        loop {
            expression = match self.current_kind() {
                TokenKind::Dot => {
                    let dot = self.bump();
                    let name = self.expect_name();
                    node(
                        SyntaxKind::MemberAccessExpression,
                        vec![expression, dot, name],
                    )
                }
                TokenKind::LeftBracket => {
                    let opener = self.position();
                    let open = self.bump();
                    let index = self.parse_expression();
                    let close = self.expect_closing(TokenKind::RightBracket, opener);
                    node(
                        SyntaxKind::IndexExpression,
                        vec![expression, open, index, close],
                    )
                }
                TokenKind::Colon => {
                    let colon = self.bump();
                    let name = self.expect_name();
                    let arguments = self.parse_call_arguments();
                    node(
                        SyntaxKind::MethodCallExpression,
                        vec![expression, colon, name, arguments],
                    )
                }
                TokenKind::LeftParen | TokenKind::String | TokenKind::LeftBrace => {
                    let arguments = self.parse_call_arguments();
                    node(SyntaxKind::FunctionCallExpression, vec![expression, arguments])
                }
                _ => return expression,
            };
        }
    }

    /// Reports a missing expression and returns its empty placeholder.
    fn missing_expression(&mut self) -> GreenElement {
        let message = eco_format!("unexpected symbol near {}", self.near());
        self.error_here(DiagnosticCode::ExpectedExpression, message);
        node(SyntaxKind::Error, Vec::new())
    }

    /// Parses `(args)`, a string literal or a table constructor.
    fn parse_call_arguments(&mut self) -> GreenElement {
        match self.current_kind() {
            TokenKind::String => node(SyntaxKind::StringArgument, vec![self.bump()]),
            TokenKind::LeftBrace => {
                node(SyntaxKind::TableArgument, vec![self.parse_table_constructor()])
            }
            TokenKind::LeftParen => {
                let opener = self.position();
                let open = self.bump();
                let values = if self.check(TokenKind::RightParen) {
                    node(SyntaxKind::ExpressionList, Vec::new())
                } else {
                    self.parse_expression_list()
                };
                let close = self.expect_closing(TokenKind::RightParen, opener);
                node(SyntaxKind::ParenthesizedArguments, vec![open, values, close])
            }
            _ => {
                let message = eco_format!("function arguments expected near {}", self.near());
                self.error_here(DiagnosticCode::MissingToken, message);
                let open = self.missing(TokenKind::LeftParen);
                let close = self.missing(TokenKind::RightParen);
                node(
                    SyntaxKind::ParenthesizedArguments,
                    vec![open, node(SyntaxKind::ExpressionList, Vec::new()), close],
                )
            }
        }
    }

    // ========================================================================
    // Table constructors
    // ========================================================================

    /// Parses `{ field {sep field} [sep] }`.
    fn parse_table_constructor(&mut self) -> GreenElement {
        let opener = self.position();
        let open = self.expect(TokenKind::LeftBrace);
        let mut fields = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.at_eof() {
            fields.push(self.parse_field());
            match self.current_kind() {
                TokenKind::Comma | TokenKind::Semicolon => fields.push(self.bump()),
                _ => break,
            }
        }
        let close = self.expect_closing(TokenKind::RightBrace, opener);
        node(
            SyntaxKind::TableConstructorExpression,
            vec![open, node(SyntaxKind::FieldList, fields), close],
        )
    }

    fn parse_field(&mut self) -> GreenElement {
        match self.current_kind() {
            TokenKind::Identifier if self.peek_kind() == TokenKind::Equals => {
                let name = self.bump();
                let equals = self.bump();
                let value = self.parse_expression();
                node(SyntaxKind::IdentifierKeyedField, vec![name, equals, value])
            }
            TokenKind::LeftBracket => {
                let opener = self.position();
                let open = self.bump();
                let key = self.parse_expression();
                let close = self.expect_closing(TokenKind::RightBracket, opener);
                let equals = self.expect(TokenKind::Equals);
                let value = self.parse_expression();
                node(
                    SyntaxKind::ExpressionKeyedField,
                    vec![open, key, close, equals, value],
                )
            }
            _ => node(SyntaxKind::UnkeyedField, vec![self.parse_expression()]),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::source_analysis::{Diagnostic, DiagnosticCode, ParseOptions, parse, tokenize};
    use crate::syntax::{SyntaxKind, SyntaxNode};

    fn parse_source(source: &str) -> (SyntaxNode, Vec<Diagnostic>) {
        let options = ParseOptions::default();
        let (tokens, _) = tokenize(source, &options);
        let (root, diagnostics) = parse(tokens, &options);
        assert_eq!(root.to_string(), source);
        (root, diagnostics)
    }

    /// Returns the first returned expression of `return <source>`.
    fn returned(source: &str) -> SyntaxNode {
        let (root, diagnostics) = parse_source(&format!("return {source}"));
        assert!(diagnostics.is_empty(), "{source}: {diagnostics:?}");
        root.descendants()
            .find(|n| n.kind() == SyntaxKind::ExpressionList)
            .and_then(|list| list.children().next())
            .unwrap()
    }

    /// Renders operators as fully parenthesised prefix groups.
    fn grouped(node: &SyntaxNode) -> String {
        let operator = || node.child_tokens().next().unwrap().text().to_string();
        let operands: Vec<_> = node.children().collect();
        match node.kind() {
            SyntaxKind::BinaryExpression => format!(
                "({} {} {})",
                grouped(&operands[0]),
                operator(),
                grouped(&operands[1])
            ),
            SyntaxKind::UnaryExpression => format!("({} {})", operator(), grouped(&operands[0])),
            _ => node.text(),
        }
    }

    fn shape(source: &str) -> String {
        grouped(&returned(source))
    }

    #[test]
    fn arithmetic_precedence() {
        assert_eq!(shape("1 + 2 * 3"), "(1 + (2 * 3))");
        assert_eq!(shape("1 * 2 + 3"), "((1 * 2) + 3)");
        assert_eq!(shape("1 - 2 - 3"), "((1 - 2) - 3)");
        assert_eq!(shape("a // b % c"), "((a // b) % c)");
    }

    #[test]
    fn concat_is_right_associative_and_below_arithmetic() {
        assert_eq!(shape("a .. b .. c"), "(a .. (b .. c))");
        assert_eq!(shape("1 + 2 .. 3"), "((1 + 2) .. 3)");
        assert_eq!(shape("a .. b << c"), "((a .. b) << c)");
    }

    #[test]
    fn power_binds_tighter_than_unary() {
        assert_eq!(shape("2 ^ 3 ^ 2"), "(2 ^ (3 ^ 2))");
        assert_eq!(shape("-x ^ 2"), "(- (x ^ 2))");
        assert_eq!(shape("2 ^ -3"), "(2 ^ (- 3))");
        assert_eq!(shape("-x * y"), "((- x) * y)");
        assert_eq!(shape("- - x"), "(- (- x))");
        assert_eq!(shape("#t + 1"), "((# t) + 1)");
    }

    #[test]
    fn logical_and_comparison_levels() {
        assert_eq!(shape("a or b and c"), "(a or (b and c))");
        assert_eq!(shape("a and b or c"), "((a and b) or c)");
        assert_eq!(shape("not a == b"), "((not a) == b)");
        assert_eq!(shape("a < b | c"), "(a < (b | c))");
        assert_eq!(shape("a & b ~ c | d"), "(((a & b) ~ c) | d)");
        assert_eq!(shape("~a"), "(~ a)");
    }

    #[test]
    fn suffix_chain() {
        let expression = returned("a.b[c]:d(e)");
        assert_eq!(expression.kind(), SyntaxKind::MethodCallExpression);
        let kinds: Vec<_> = expression
            .descendants()
            .map(|n| n.kind())
            .filter(|k| k.is_expression())
            .collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::MethodCallExpression,
                SyntaxKind::IndexExpression,
                SyntaxKind::MemberAccessExpression,
                SyntaxKind::NameExpression,
                SyntaxKind::NameExpression,
                SyntaxKind::NameExpression,
            ]
        );
    }

    #[test]
    fn call_argument_sugar() {
        let call = returned("f{1}");
        assert_eq!(call.kind(), SyntaxKind::FunctionCallExpression);
        assert!(call.child_of_kind(SyntaxKind::TableArgument).is_some());

        let call = returned("f'x'");
        assert!(call.child_of_kind(SyntaxKind::StringArgument).is_some());

        let call = returned("f()");
        let arguments = call.child_of_kind(SyntaxKind::ParenthesizedArguments).unwrap();
        let list = arguments.child_of_kind(SyntaxKind::ExpressionList).unwrap();
        assert_eq!(list.children_with_tokens().count(), 0);
    }

    #[test]
    fn literals_are_not_callable() {
        let (_, diagnostics) = parse_source("return 'a'.x");
        assert!(!diagnostics.is_empty());
        assert!(returned("('a'):upper()").kind() == SyntaxKind::MethodCallExpression);
    }

    #[test]
    fn table_constructor_fields() {
        let table = returned("{[1] = 2, x = 3; 4,}");
        assert_eq!(table.kind(), SyntaxKind::TableConstructorExpression);
        let fields: Vec<_> = table
            .child_of_kind(SyntaxKind::FieldList)
            .unwrap()
            .children()
            .map(|n| n.kind())
            .collect();
        assert_eq!(
            fields,
            vec![
                SyntaxKind::ExpressionKeyedField,
                SyntaxKind::IdentifierKeyedField,
                SyntaxKind::UnkeyedField,
            ]
        );
    }

    #[test]
    fn function_literal() {
        let function = returned("function(a, ...) return a end");
        assert_eq!(function.kind(), SyntaxKind::AnonymousFunctionExpression);
        let parameters = function
            .descendants()
            .find(|n| n.kind() == SyntaxKind::ParameterList)
            .unwrap();
        assert_eq!(parameters.text(), "a, ...");
    }

    #[test]
    fn missing_operand_is_placeholder() {
        let (root, diagnostics) = parse_source("return 1 +");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::ExpectedExpression);
        assert_eq!(diagnostics[0].message, "unexpected symbol near <eof>");
        let binary = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::BinaryExpression)
            .unwrap();
        let rhs = binary.children().nth(1).unwrap();
        assert_eq!(rhs.kind(), SyntaxKind::Error);
        assert!(rhs.full_span().is_empty());
    }

    #[test]
    fn lexer_error_token_becomes_error_expression() {
        let options = ParseOptions::default();
        let (tokens, lexical) = tokenize("return @", &options);
        assert_eq!(lexical.len(), 1);
        let (root, diagnostics) = parse(tokens, &options);
        assert!(diagnostics.is_empty());
        let list = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::ExpressionList)
            .unwrap();
        let error = list.children().next().unwrap();
        assert_eq!(error.kind(), SyntaxKind::Error);
        assert_eq!(error.text(), "@");
    }

    #[test]
    fn method_call_without_arguments() {
        let (_, diagnostics) = parse_source("obj:m\nx = 1");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "function arguments expected near 'x'");
    }

    #[test]
    fn unclosed_table_is_reported_once() {
        let (_, diagnostics) = parse_source("t = { ] }");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::ExpectedExpression);
    }
}
