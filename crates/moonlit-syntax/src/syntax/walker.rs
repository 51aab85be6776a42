// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Shared tree walkers for passes that consume the syntax tree.
//!
//! Provides the traversal contract a binder or verifier builds on:
//!
//! - [`preorder`] / [`preorder_with_tokens`]: enter/leave events for every
//!   node (and token), in source order.
//! - [`for_each_block`]: every statement sequence in the tree.
//! - [`walk_statements`] / [`walk_expressions`]: pre-order visitors over the
//!   typed views.
//!
//! All walkers are iterative, so deeply nested input cannot overflow the
//! stack here.

use super::ast::{AstNode, Block, Expression, Statement};
use super::{SyntaxElement, SyntaxKind, SyntaxNode};

/// Entering or leaving an element during a pre-order walk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WalkEvent<T> {
    /// About to visit the element's children.
    Enter(T),
    /// Done with the element's children.
    Leave(T),
}

impl<T> WalkEvent<T> {
    /// Maps the element of this event.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> WalkEvent<U> {
        match self {
            Self::Enter(it) => WalkEvent::Enter(f(it)),
            Self::Leave(it) => WalkEvent::Leave(f(it)),
        }
    }
}

/// Walks nodes and tokens below `root` (inclusive), yielding an `Enter`
/// before and a `Leave` after each element's children.
pub fn preorder_with_tokens(
    root: &SyntaxNode,
) -> impl Iterator<Item = WalkEvent<SyntaxElement>> + use<> {
    let mut stack = vec![WalkEvent::Enter(SyntaxElement::Node(root.clone()))];
    std::iter::from_fn(move || {
        let event = stack.pop()?;
        if let WalkEvent::Enter(element) = &event {
            stack.push(WalkEvent::Leave(element.clone()));
            if let SyntaxElement::Node(node) = element {
                let children: Vec<_> = node.children_with_tokens().collect();
                stack.extend(children.into_iter().rev().map(WalkEvent::Enter));
            }
        }
        Some(event)
    })
}

/// Walks the nodes below `root` (inclusive), skipping tokens.
pub fn preorder(root: &SyntaxNode) -> impl Iterator<Item = WalkEvent<SyntaxNode>> + use<> {
    preorder_with_tokens(root).filter_map(|event| match event {
        WalkEvent::Enter(SyntaxElement::Node(node)) => Some(WalkEvent::Enter(node)),
        WalkEvent::Leave(SyntaxElement::Node(node)) => Some(WalkEvent::Leave(node)),
        WalkEvent::Enter(SyntaxElement::Token(_)) | WalkEvent::Leave(SyntaxElement::Token(_)) => {
            None
        }
    })
}

/// Calls `f` once for each statement sequence below `root`: the chunk's
/// block and every nested body (functions, loops, branches, `do` blocks).
pub fn for_each_block<F>(root: &SyntaxNode, mut f: F)
where
    F: FnMut(&Block),
{
    for node in root.descendants() {
        if let Some(block) = Block::cast(node) {
            f(&block);
        }
    }
}

/// Calls `f` on every statement below `root`, outer statements first.
///
/// Error nodes that stand in for skipped statements are included as
/// [`Statement::Error`].
pub fn walk_statements<F>(root: &SyntaxNode, mut f: F)
where
    F: FnMut(&Statement),
{
    for_each_block(root, |block| {
        for statement in block.statements() {
            f(&statement);
        }
    });
}

/// Calls `f` on every expression below `root` in pre-order.
///
/// Empty placeholders for missing expressions are included as
/// [`Expression::Error`]; error nodes holding skipped statements are not.
pub fn walk_expressions<F>(root: &SyntaxNode, mut f: F)
where
    F: FnMut(&Expression),
{
    for node in root.descendants() {
        let in_block = node
            .parent()
            .is_some_and(|parent| parent.kind() == SyntaxKind::Block);
        if node.kind() == SyntaxKind::Error && in_block {
            continue;
        }
        if let Some(expression) = Expression::cast(node) {
            f(&expression);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::{ParseOptions, TokenKind};
    use crate::syntax::SyntaxTree;

    fn root(source: &str) -> SyntaxNode {
        SyntaxTree::parse(source, &ParseOptions::default()).root()
    }

    #[test]
    fn enter_and_leave_are_balanced() {
        let root = root("if a then b() else c = 1 end");
        let mut depth = 0i32;
        let mut max_depth = 0;
        for event in preorder(&root) {
            match event {
                WalkEvent::Enter(_) => depth += 1,
                WalkEvent::Leave(_) => depth -= 1,
            }
            assert!(depth >= 0);
            max_depth = max_depth.max(depth);
        }
        assert_eq!(depth, 0);
        assert!(max_depth > 3);
    }

    #[test]
    fn tokens_appear_in_source_order() {
        let root = root("local x = y + 1");
        let texts: Vec<_> = preorder_with_tokens(&root)
            .filter_map(|event| match event {
                WalkEvent::Enter(SyntaxElement::Token(token)) => Some(token.text().to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["local", "x", "=", "y", "+", "1", ""]);
    }

    #[test]
    fn every_block_is_visited() {
        let root = root("function f() while x do end end\ndo repeat until y end");
        let mut blocks = 0;
        for_each_block(&root, |_| blocks += 1);
        // chunk, function body, while body, do body, repeat body
        assert_eq!(blocks, 5);
    }

    #[test]
    fn statements_include_nested_ones() {
        let root = root("if x then y = 1 end");
        let mut kinds = Vec::new();
        walk_statements(&root, |statement| kinds.push(statement.syntax().kind()));
        assert_eq!(
            kinds,
            vec![SyntaxKind::IfStatement, SyntaxKind::AssignmentStatement]
        );
    }

    #[test]
    fn expressions_in_preorder() {
        let root = root("return a + b * c");
        let mut kinds = Vec::new();
        walk_expressions(&root, |expression| kinds.push(expression.syntax().kind()));
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::BinaryExpression,
                SyntaxKind::NameExpression,
                SyntaxKind::BinaryExpression,
                SyntaxKind::NameExpression,
                SyntaxKind::NameExpression,
            ]
        );
    }

    #[test]
    fn map_keeps_direction() {
        let event = WalkEvent::Leave(2).map(|n| n * 2);
        assert_eq!(event, WalkEvent::Leave(4));
        let token_kind = WalkEvent::Enter(TokenKind::End).map(|k| k.to_string());
        assert_eq!(token_kind, WalkEvent::Enter("'end'".to_string()));
    }
}
