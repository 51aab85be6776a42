// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The red tree: positioned views over green nodes.
//!
//! A [`SyntaxNode`] pairs a [`GreenNode`] with its absolute offset and its
//! parent. Red nodes are created on the fly while walking down from the
//! root, so they are cheap to make and never stored in the green tree.
//! Parents are kept alive by their children, never the other way around.
//!
//! # Example
//!
//! ```
//! use moonlit_syntax::source_analysis::ParseOptions;
//! use moonlit_syntax::syntax::{SyntaxKind, SyntaxTree};
//!
//! let tree = SyntaxTree::parse("local x = 1", &ParseOptions::default());
//! let root = tree.root();
//! assert_eq!(root.kind(), SyntaxKind::Chunk);
//!
//! let declaration = root
//!     .descendants()
//!     .find(|node| node.kind() == SyntaxKind::LocalVariableDeclaration)
//!     .unwrap();
//! assert_eq!(declaration.text(), "local x = 1");
//! assert_eq!(declaration.parent().unwrap().kind(), SyntaxKind::Block);
//! ```

use std::fmt::{self, Write as _};
use std::sync::Arc;

use ecow::EcoString;

use super::{GreenElement, GreenNode, SyntaxKind};
use crate::source_analysis::{Span, Token, TokenKind, TokenValue, Trivia};

/// A positioned syntax node.
#[derive(Clone)]
pub struct SyntaxNode(Arc<NodeData>);

struct NodeData {
    green: Arc<GreenNode>,
    /// Start of the node's full text, leading trivia included.
    offset: u32,
    parent: Option<SyntaxNode>,
    index: usize,
}

impl Drop for NodeData {
    fn drop(&mut self) {
        // Release a deep parent chain one link at a time.
        let mut parent = self.parent.take();
        while let Some(node) = parent {
            parent = Arc::into_inner(node.0).and_then(|mut data| data.parent.take());
        }
    }
}

/// A positioned token.
#[derive(Clone)]
pub struct SyntaxToken {
    green: Arc<Token>,
    /// Start of the token's full text, leading trivia included.
    offset: u32,
    parent: SyntaxNode,
    index: usize,
}

/// A child of a syntax node: either a node or a token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SyntaxElement {
    /// A nested node.
    Node(SyntaxNode),
    /// A token.
    Token(SyntaxToken),
}

impl SyntaxNode {
    /// Creates the root of a red tree.
    #[must_use]
    pub fn new_root(green: Arc<GreenNode>) -> Self {
        Self(Arc::new(NodeData {
            green,
            offset: 0,
            parent: None,
            index: 0,
        }))
    }

    fn new_child(green: Arc<GreenNode>, offset: u32, parent: Self, index: usize) -> Self {
        Self(Arc::new(NodeData {
            green,
            offset,
            parent: Some(parent),
            index,
        }))
    }

    /// Returns the kind of this node.
    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        self.0.green.kind()
    }

    /// Returns the underlying green node.
    #[must_use]
    pub fn green(&self) -> &Arc<GreenNode> {
        &self.0.green
    }

    /// Returns the parent node, or `None` at the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0.parent.clone()
    }

    /// Returns this node's position among its parent's children.
    #[must_use]
    pub fn index(&self) -> usize {
        self.0.index
    }

    /// Iterates over this node and its ancestors, innermost first.
    pub fn ancestors(&self) -> impl Iterator<Item = Self> + use<> {
        std::iter::successors(Some(self.clone()), Self::parent)
    }

    /// Iterates over child nodes and tokens in source order.
    pub fn children_with_tokens(&self) -> impl Iterator<Item = SyntaxElement> + use<> {
        let parent = self.clone();
        let mut offset = self.0.offset;
        let green = Arc::clone(&self.0.green);
        (0..green.children().len()).map(move |index| {
            let child = &green.children()[index];
            let start = offset;
            offset += child.width();
            match child {
                GreenElement::Node(node) => SyntaxElement::Node(Self::new_child(
                    Arc::clone(node),
                    start,
                    parent.clone(),
                    index,
                )),
                GreenElement::Token(token) => SyntaxElement::Token(SyntaxToken {
                    green: Arc::clone(token),
                    offset: start,
                    parent: parent.clone(),
                    index,
                }),
            }
        })
    }

    /// Iterates over child nodes in source order, skipping tokens.
    pub fn children(&self) -> impl Iterator<Item = Self> + use<> {
        self.children_with_tokens()
            .filter_map(SyntaxElement::into_node)
    }

    /// Iterates over this node's direct tokens, skipping nodes.
    pub fn child_tokens(&self) -> impl Iterator<Item = SyntaxToken> + use<> {
        self.children_with_tokens()
            .filter_map(SyntaxElement::into_token)
    }

    /// Iterates over this node and all nodes below it, in pre-order.
    pub fn descendants(&self) -> impl Iterator<Item = Self> + use<> {
        self.descendants_with_tokens()
            .filter_map(SyntaxElement::into_node)
    }

    /// Iterates over this node and all nodes and tokens below it, in pre-order.
    pub fn descendants_with_tokens(&self) -> impl Iterator<Item = SyntaxElement> + use<> {
        let mut stack = vec![SyntaxElement::Node(self.clone())];
        std::iter::from_fn(move || {
            let element = stack.pop()?;
            if let SyntaxElement::Node(node) = &element {
                let children: Vec<_> = node.children_with_tokens().collect();
                stack.extend(children.into_iter().rev());
            }
            Some(element)
        })
    }

    /// Iterates over every token below this node in source order.
    pub fn tokens(&self) -> impl Iterator<Item = SyntaxToken> + use<> {
        self.descendants_with_tokens()
            .filter_map(SyntaxElement::into_token)
    }

    /// Returns the first token below this node, if any.
    #[must_use]
    pub fn first_token(&self) -> Option<SyntaxToken> {
        self.tokens().next()
    }

    /// Returns the last token below this node, if any.
    #[must_use]
    pub fn last_token(&self) -> Option<SyntaxToken> {
        let mut stack = vec![SyntaxElement::Node(self.clone())];
        while let Some(element) = stack.pop() {
            match element {
                SyntaxElement::Token(token) => return Some(token),
                SyntaxElement::Node(node) => stack.extend(node.children_with_tokens()),
            }
        }
        None
    }

    /// Returns the span of the full text, trivia included.
    #[must_use]
    pub fn full_span(&self) -> Span {
        Span::with_len(self.0.offset, self.0.green.width())
    }

    /// Returns the span without the leading trivia of the first token and
    /// the trailing trivia of the last token.
    ///
    /// A node without tokens has an empty span at its offset.
    #[must_use]
    pub fn span(&self) -> Span {
        match (self.first_token(), self.last_token()) {
            (Some(first), Some(last)) => first.span().cover(last.span()),
            _ => Span::empty(self.0.offset),
        }
    }

    /// Returns the text without outer trivia.
    #[must_use]
    pub fn text(&self) -> String {
        let full = self.to_full_string();
        let full_span = self.full_span();
        let span = self.span();
        let start = (span.start() - full_span.start()) as usize;
        let end = (span.end() - full_span.start()) as usize;
        full.get(start..end).unwrap_or_default().to_string()
    }

    /// Returns the full text, trivia included.
    #[must_use]
    pub fn to_full_string(&self) -> String {
        self.0.green.to_full_string()
    }

    /// Returns the first direct child node of `kind`.
    #[must_use]
    pub fn child_of_kind(&self, kind: SyntaxKind) -> Option<Self> {
        self.children().find(|child| child.kind() == kind)
    }

    /// Returns the first direct token of `kind`.
    #[must_use]
    pub fn token_of_kind(&self, kind: TokenKind) -> Option<SyntaxToken> {
        self.child_tokens().find(|token| token.kind() == kind)
    }

    /// Renders an indented dump of the subtree, one element per line.
    ///
    /// ```
    /// use moonlit_syntax::source_analysis::ParseOptions;
    /// use moonlit_syntax::syntax::SyntaxTree;
    ///
    /// let tree = SyntaxTree::parse("x = 1", &ParseOptions::default());
    /// let dump = tree.root().debug_tree();
    /// assert!(dump.starts_with("Chunk@0..5\n  Block@0..5\n    AssignmentStatement@0..5\n"));
    /// assert!(dump.contains("Number@4..5 \"1\""));
    /// ```
    #[must_use]
    pub fn debug_tree(&self) -> String {
        let mut out = String::new();
        let mut depth = 0usize;
        for event in super::walker::preorder_with_tokens(self) {
            match event {
                super::WalkEvent::Enter(SyntaxElement::Node(node)) => {
                    let _ = writeln!(out, "{}{}@{}", "  ".repeat(depth), node.kind(), node.full_span());
                    depth += 1;
                }
                super::WalkEvent::Enter(SyntaxElement::Token(token)) => {
                    let _ = writeln!(out, "{}{token:?}", "  ".repeat(depth));
                }
                super::WalkEvent::Leave(SyntaxElement::Node(_)) => depth -= 1,
                super::WalkEvent::Leave(SyntaxElement::Token(_)) => {}
            }
        }
        out
    }
}

impl PartialEq for SyntaxNode {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0.green, &other.0.green) && self.0.offset == other.0.offset
    }
}

impl Eq for SyntaxNode {}

impl std::hash::Hash for SyntaxNode {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0.green).hash(state);
        self.0.offset.hash(state);
    }
}

impl fmt::Debug for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.kind(), self.full_span())
    }
}

impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_full_string())
    }
}

impl SyntaxToken {
    /// Returns the kind of this token.
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        self.green.kind()
    }

    /// Returns the underlying green token.
    #[must_use]
    pub fn green(&self) -> &Arc<Token> {
        &self.green
    }

    /// Returns the core text, without trivia.
    #[must_use]
    pub fn text(&self) -> &str {
        self.green.text()
    }

    /// Returns the core text as a cheaply clonable string.
    #[must_use]
    pub fn text_string(&self) -> EcoString {
        EcoString::from(self.green.text())
    }

    /// Returns the decoded literal value.
    #[must_use]
    pub fn value(&self) -> &TokenValue {
        self.green.value()
    }

    /// Returns the leading trivia.
    #[must_use]
    pub fn leading_trivia(&self) -> &[Trivia] {
        self.green.leading_trivia()
    }

    /// Returns the trailing trivia.
    #[must_use]
    pub fn trailing_trivia(&self) -> &[Trivia] {
        self.green.trailing_trivia()
    }

    /// Returns `true` if recovery synthesised this token.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.green.is_missing()
    }

    /// Returns the node that contains this token.
    #[must_use]
    pub fn parent(&self) -> SyntaxNode {
        self.parent.clone()
    }

    /// Returns this token's position among its parent's children.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the span of the core text.
    #[must_use]
    pub fn span(&self) -> Span {
        Span::with_len(self.offset + self.green.leading_width(), self.green.width())
    }

    /// Returns the span including trivia.
    #[must_use]
    pub fn full_span(&self) -> Span {
        Span::with_len(self.offset, self.green.full_width())
    }

    /// Returns the full text, trivia included.
    #[must_use]
    pub fn to_full_string(&self) -> String {
        self.green.to_full_string()
    }
}

impl PartialEq for SyntaxToken {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.green, &other.green) && self.offset == other.offset
    }
}

impl Eq for SyntaxToken {}

impl std::hash::Hash for SyntaxToken {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.green).hash(state);
        self.offset.hash(state);
    }
}

impl fmt::Debug for SyntaxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{} {:?}", self.kind(), self.span(), self.text())?;
        if self.is_missing() {
            write!(f, " (missing)")?;
        }
        Ok(())
    }
}

impl fmt::Display for SyntaxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl SyntaxElement {
    /// Returns the node, if this is one.
    #[must_use]
    pub fn into_node(self) -> Option<SyntaxNode> {
        match self {
            Self::Node(node) => Some(node),
            Self::Token(_) => None,
        }
    }

    /// Returns the token, if this is one.
    #[must_use]
    pub fn into_token(self) -> Option<SyntaxToken> {
        match self {
            Self::Node(_) => None,
            Self::Token(token) => Some(token),
        }
    }

    /// Returns the span including trivia.
    #[must_use]
    pub fn full_span(&self) -> Span {
        match self {
            Self::Node(node) => node.full_span(),
            Self::Token(token) => token.full_span(),
        }
    }
}
