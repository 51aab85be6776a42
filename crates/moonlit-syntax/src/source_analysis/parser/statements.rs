// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Statement parsing for Lua.
//!
//! This module contains the block and statement methods of the `Parser`.
//! Statements are dispatched on their first token:
//!
//! - Control flow (`if`, `while`, `do`, `for`, `repeat`, `break`, `goto`, labels)
//! - Declarations (`local`, `local function`, `function`)
//! - `return`, which must end its block
//! - Assignments and calls, which start with an expression

use ecow::eco_format;

use crate::source_analysis::{Diagnostic, DiagnosticCode, SourceKind, TokenKind};
use crate::syntax::{GreenElement, SyntaxKind};

use super::expressions::can_start_expression;
use super::{Parser, element_kind, node};

impl Parser<'_> {
    // ========================================================================
    // Blocks
    // ========================================================================

    /// Parses statements up to a block closer (`end`, `else`, `elseif`,
    /// `until`) or the end of input.
    ///
    /// The top-level block only stops at the end of input; stray closers
    /// are skipped there.
    pub(super) fn parse_block(&mut self, top_level: bool) -> GreenElement {
        let mut statements = Vec::new();
        let mut returned = false;
        let mut reported_after_return = false;
        loop {
            if self.check_cancelled() || self.at_eof() {
                break;
            }
            let kind = self.current_kind();
            if kind.is_block_end() {
                if !top_level {
                    break;
                }
                let message = eco_format!("'<eof>' expected near {}", self.near());
                statements.push(self.recover(DiagnosticCode::UnexpectedToken, message));
                continue;
            }

            let allow_bare_expression = top_level
                && statements.is_empty()
                && self.options.kind == SourceKind::Interactive;
            let start = self.position();
            statements.push(self.parse_statement(allow_bare_expression));

            if returned && !reported_after_return {
                reported_after_return = true;
                self.report(
                    DiagnosticCode::StatementAfterReturn,
                    self.span_since(start),
                    "'return' must be the last statement in its block",
                );
            }
            returned |= kind == TokenKind::Return;
        }
        node(SyntaxKind::Block, statements)
    }

    // ========================================================================
    // Statement dispatch
    // ========================================================================

    /// Parses one statement.
    ///
    /// Uses `stacker::maybe_grow` to extend the stack on the heap if
    /// remaining stack space falls below 32 KiB.
    pub(super) fn parse_statement(&mut self, allow_bare_expression: bool) -> GreenElement {
        // 32 KiB red zone, 256 KiB new segment. The nesting guard caps
        // recursion, so only a few segments are ever needed.
        stacker::maybe_grow(32 * 1024, 256 * 1024, || {
            if let Err(error) = self.enter_nesting() {
                return error;
            }
            let statement = match self.current_kind() {
                TokenKind::Semicolon => node(SyntaxKind::EmptyStatement, vec![self.bump()]),
                TokenKind::If => self.parse_if_statement(),
                TokenKind::While => self.parse_while_statement(),
                TokenKind::Do => self.parse_do_statement(),
                TokenKind::For => self.parse_for_statement(),
                TokenKind::Repeat => self.parse_repeat_statement(),
                TokenKind::Function => self.parse_function_declaration(),
                TokenKind::Local => self.parse_local(),
                TokenKind::ColonColon => self.parse_label_statement(),
                TokenKind::Return => self.parse_return_statement(),
                TokenKind::Break => node(SyntaxKind::BreakStatement, vec![self.bump()]),
                TokenKind::Goto => self.parse_goto_statement(),
                kind if can_start_expression(kind) => {
                    self.parse_expression_statement(allow_bare_expression)
                }
                _ => {
                    let message = eco_format!("unexpected symbol near {}", self.near());
                    self.recover(DiagnosticCode::UnexpectedToken, message)
                }
            };
            self.leave_nesting();
            statement
        })
    }

    // ========================================================================
    // Assignments and calls
    // ========================================================================

    /// Parses a statement that starts with an expression: an assignment, a
    /// call, or (only as a whole interactive chunk) a bare expression.
    fn parse_expression_statement(&mut self, allow_bare_expression: bool) -> GreenElement {
        let start = self.position();
        let expression = self.parse_expression();

        if matches!(self.current_kind(), TokenKind::Equals | TokenKind::Comma) {
            return self.parse_assignment(expression, start);
        }

        if matches!(
            element_kind(&expression),
            Some(SyntaxKind::FunctionCallExpression | SyntaxKind::MethodCallExpression)
        ) {
            return node(SyntaxKind::CallStatement, vec![expression]);
        }

        if !(allow_bare_expression && self.at_eof()) {
            let diagnostic = Diagnostic::error(
                DiagnosticCode::NotAStatement,
                self.span_since(start),
                eco_format!("syntax error near {}", self.near()),
            )
            .with_hint("only function calls and assignments can be statements");
            self.push_diagnostic(diagnostic);
        }
        node(SyntaxKind::ExpressionStatement, vec![expression])
    }

    /// Parses the rest of `targets = values` after the first target.
    fn parse_assignment(&mut self, first: GreenElement, first_start: usize) -> GreenElement {
        self.check_assignment_target(&first, first_start);
        let mut targets = vec![first];
        while let Some(comma) = self.eat(TokenKind::Comma) {
            targets.push(comma);
            let start = self.position();
            let target = self.parse_expression();
            self.check_assignment_target(&target, start);
            targets.push(target);
        }
        let equals = self.expect(TokenKind::Equals);
        let values = self.parse_expression_list();
        node(
            SyntaxKind::AssignmentStatement,
            vec![node(SyntaxKind::AssignmentTargetList, targets), equals, values],
        )
    }

    /// Reports targets other than names, member accesses and index
    /// expressions. Placeholders were reported when they were made.
    fn check_assignment_target(&mut self, target: &GreenElement, start: usize) {
        if matches!(
            element_kind(target),
            Some(
                SyntaxKind::NameExpression
                    | SyntaxKind::MemberAccessExpression
                    | SyntaxKind::IndexExpression
                    | SyntaxKind::Error
            )
        ) {
            return;
        }
        let diagnostic = Diagnostic::error(
            DiagnosticCode::InvalidAssignmentTarget,
            self.span_since(start),
            "cannot assign to this expression",
        )
        .with_hint("only names, fields and indexed values can be assigned");
        self.push_diagnostic(diagnostic);
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    /// Parses `local function name body` or `local names [= values]`.
    fn parse_local(&mut self) -> GreenElement {
        let local = self.bump();
        if self.check(TokenKind::Function) {
            let opener = self.position();
            let function = self.bump();
            let name = self.expect_name();
            let body = self.parse_function_body(opener);
            return node(
                SyntaxKind::LocalFunctionDeclaration,
                vec![local, function, name, body],
            );
        }

        let mut names = vec![self.parse_local_name()];
        while let Some(comma) = self.eat(TokenKind::Comma) {
            names.push(comma);
            names.push(self.parse_local_name());
        }
        let mut children = vec![local, node(SyntaxKind::LocalNameList, names)];
        if let Some(equals) = self.eat(TokenKind::Equals) {
            children.push(equals);
            children.push(self.parse_expression_list());
        }
        node(SyntaxKind::LocalVariableDeclaration, children)
    }

    fn parse_local_name(&mut self) -> GreenElement {
        let mut children = vec![self.expect_name()];
        if self.check(TokenKind::Less) {
            children.push(self.parse_attribute());
        }
        node(SyntaxKind::LocalName, children)
    }

    /// Parses `<const>` or `<close>`.
    fn parse_attribute(&mut self) -> GreenElement {
        self.require_feature(self.options.syntax.local_attributes, "local attributes");
        let opener = self.position();
        let less = self.bump();
        let name_start = self.position();
        let name = self.expect_name();
        let unknown = match &name {
            GreenElement::Token(token) if !token.is_missing() => {
                (!matches!(token.text(), "const" | "close")).then(|| token.text().to_owned())
            }
            _ => None,
        };
        if let Some(unknown) = unknown {
            self.report(
                DiagnosticCode::UnknownAttribute,
                self.span_since(name_start),
                eco_format!("unknown attribute '{unknown}'"),
            );
        }
        let greater = self.expect_closing(TokenKind::Greater, opener);
        node(SyntaxKind::Attribute, vec![less, name, greater])
    }

    /// Parses `function a.b:c body`.
    fn parse_function_declaration(&mut self) -> GreenElement {
        let opener = self.position();
        let function = self.bump();
        let name = self.parse_function_name();
        let body = self.parse_function_body(opener);
        node(SyntaxKind::FunctionDeclaration, vec![function, name, body])
    }

    fn parse_function_name(&mut self) -> GreenElement {
        let mut children = vec![self.expect_name()];
        while let Some(dot) = self.eat(TokenKind::Dot) {
            children.push(dot);
            children.push(self.expect_name());
        }
        if let Some(colon) = self.eat(TokenKind::Colon) {
            children.push(colon);
            children.push(self.expect_name());
        }
        node(SyntaxKind::FunctionName, children)
    }

    /// Parses `(params) block end`; `opener` is the `function` keyword.
    pub(super) fn parse_function_body(&mut self, opener: usize) -> GreenElement {
        let paren = self.position();
        let open = self.expect(TokenKind::LeftParen);
        let parameters = self.parse_parameter_list();
        let close = self.expect_closing(TokenKind::RightParen, paren);
        let block = self.parse_block(false);
        let end = self.expect_closing(TokenKind::End, opener);
        node(
            SyntaxKind::FunctionBody,
            vec![open, parameters, close, block, end],
        )
    }

    fn parse_parameter_list(&mut self) -> GreenElement {
        let mut children = Vec::new();
        if self.check(TokenKind::RightParen) {
            return node(SyntaxKind::ParameterList, children);
        }
        loop {
            match self.current_kind() {
                TokenKind::Identifier => children.push(self.bump()),
                TokenKind::DotDotDot => {
                    children.push(self.bump());
                    break;
                }
                _ if self.at_sync_point() || self.check(TokenKind::RightParen) => {
                    children.push(self.expect_name());
                    break;
                }
                _ => {
                    let message = eco_format!("<name> expected near {}", self.near());
                    children.push(self.recover_until(
                        DiagnosticCode::UnexpectedToken,
                        message,
                        |kind| kind == TokenKind::RightParen,
                    ));
                    break;
                }
            }
            match self.eat(TokenKind::Comma) {
                Some(comma) => children.push(comma),
                None => break,
            }
        }
        node(SyntaxKind::ParameterList, children)
    }

    // ========================================================================
    // Control flow
    // ========================================================================

    fn parse_if_statement(&mut self) -> GreenElement {
        let opener = self.position();
        let if_keyword = self.bump();
        let condition = self.parse_expression();
        let then = self.expect(TokenKind::Then);
        let block = self.parse_block(false);

        let mut clauses = Vec::new();
        while self.check(TokenKind::ElseIf) {
            let keyword = self.bump();
            let condition = self.parse_expression();
            let then = self.expect(TokenKind::Then);
            let block = self.parse_block(false);
            clauses.push(node(
                SyntaxKind::ElseIfClause,
                vec![keyword, condition, then, block],
            ));
        }

        let mut children = vec![
            if_keyword,
            condition,
            then,
            block,
            node(SyntaxKind::ElseIfClauseList, clauses),
        ];
        if let Some(else_keyword) = self.eat(TokenKind::Else) {
            let block = self.parse_block(false);
            children.push(node(SyntaxKind::ElseClause, vec![else_keyword, block]));
        }
        children.push(self.expect_closing(TokenKind::End, opener));
        node(SyntaxKind::IfStatement, children)
    }

    fn parse_while_statement(&mut self) -> GreenElement {
        let opener = self.position();
        let mut children = vec![self.bump(), self.parse_expression()];
        children.extend(self.parse_loop_body(opener));
        node(SyntaxKind::WhileStatement, children)
    }

    fn parse_do_statement(&mut self) -> GreenElement {
        let opener = self.position();
        let do_keyword = self.bump();
        let block = self.parse_block(false);
        let end = self.expect_closing(TokenKind::End, opener);
        node(SyntaxKind::DoStatement, vec![do_keyword, block, end])
    }

    fn parse_repeat_statement(&mut self) -> GreenElement {
        let opener = self.position();
        let repeat = self.bump();
        let block = self.parse_block(false);
        let until = self.expect_closing(TokenKind::Until, opener);
        let condition = self.parse_expression();
        node(
            SyntaxKind::RepeatStatement,
            vec![repeat, block, until, condition],
        )
    }

    /// Parses a numeric `for` when the first name is followed by `=`, a
    /// generic one otherwise.
    fn parse_for_statement(&mut self) -> GreenElement {
        let opener = self.position();
        let for_keyword = self.bump();
        let name = self.expect_name();

        if let Some(equals) = self.eat(TokenKind::Equals) {
            let start = self.parse_expression();
            let comma = self.expect(TokenKind::Comma);
            let limit = self.parse_expression();
            let mut children = vec![for_keyword, name, equals, start, comma, limit];
            if let Some(comma) = self.eat(TokenKind::Comma) {
                children.push(comma);
                children.push(self.parse_expression());
            }
            children.extend(self.parse_loop_body(opener));
            return node(SyntaxKind::NumericForStatement, children);
        }

        let mut names = vec![name];
        while let Some(comma) = self.eat(TokenKind::Comma) {
            names.push(comma);
            names.push(self.expect_name());
        }
        let single_name = names.len() == 1;

        let (in_keyword, values) = if let Some(in_keyword) = self.eat(TokenKind::In) {
            (in_keyword, self.parse_expression_list())
        } else {
            let message = if single_name {
                eco_format!("'=' or 'in' expected near {}", self.near())
            } else {
                eco_format!("'in' expected near {}", self.near())
            };
            self.error_here(DiagnosticCode::MissingToken, message);
            let in_keyword = self.missing(TokenKind::In);
            let values = if can_start_expression(self.current_kind()) {
                self.parse_expression_list()
            } else {
                node(SyntaxKind::ExpressionList, Vec::new())
            };
            (in_keyword, values)
        };

        let mut children = vec![
            for_keyword,
            node(SyntaxKind::NameList, names),
            in_keyword,
            values,
        ];
        children.extend(self.parse_loop_body(opener));
        node(SyntaxKind::GenericForStatement, children)
    }

    /// Parses `do block end` closing the loop that starts at `opener`.
    fn parse_loop_body(&mut self, opener: usize) -> [GreenElement; 3] {
        let do_keyword = self.expect(TokenKind::Do);
        let block = self.parse_block(false);
        let end = self.expect_closing(TokenKind::End, opener);
        [do_keyword, block, end]
    }

    fn parse_return_statement(&mut self) -> GreenElement {
        let return_keyword = self.bump();
        let kind = self.current_kind();
        let values = if can_start_expression(kind) || kind.is_error() {
            self.parse_expression_list()
        } else {
            node(SyntaxKind::ExpressionList, Vec::new())
        };
        let mut children = vec![return_keyword, values];
        if let Some(semicolon) = self.eat(TokenKind::Semicolon) {
            children.push(semicolon);
        }
        node(SyntaxKind::ReturnStatement, children)
    }

    fn parse_goto_statement(&mut self) -> GreenElement {
        let goto = self.bump();
        let label = self.expect_name();
        node(SyntaxKind::GotoStatement, vec![goto, label])
    }

    /// Parses `::name::`.
    fn parse_label_statement(&mut self) -> GreenElement {
        self.require_feature(self.options.syntax.goto_statements, "labels");
        let opener = self.position();
        let open = self.bump();
        let name = self.expect_name();
        let close = self.expect_closing(TokenKind::ColonColon, opener);
        node(SyntaxKind::LabelStatement, vec![open, name, close])
    }
}
