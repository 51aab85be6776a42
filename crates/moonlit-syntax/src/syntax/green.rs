// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The green tree: immutable, position-independent syntax.
//!
//! A [`GreenNode`] knows its kind, its children and the total width of its
//! text, but not where it sits in a file. That makes green nodes freely
//! shareable (`Arc`) between trees and threads. Positions are computed by
//! the red layer ([`SyntaxNode`](super::SyntaxNode)) during traversal.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::SyntaxKind;
use crate::source_analysis::Token;

/// A child of a green node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GreenElement {
    /// A nested node.
    Node(Arc<GreenNode>),
    /// A token, with its trivia.
    Token(Arc<Token>),
}

impl GreenElement {
    /// Returns the full width (trivia included) in bytes.
    #[must_use]
    pub fn width(&self) -> u32 {
        match self {
            Self::Node(node) => node.width(),
            Self::Token(token) => token.full_width(),
        }
    }

    /// Appends the full text of this element to `out`.
    pub fn write_full_text(&self, out: &mut String) {
        let mut stack = vec![self];
        while let Some(element) = stack.pop() {
            match element {
                Self::Node(node) => stack.extend(node.children.iter().rev()),
                Self::Token(token) => token.write_full_text(out),
            }
        }
    }
}

impl From<Arc<GreenNode>> for GreenElement {
    fn from(node: Arc<GreenNode>) -> Self {
        Self::Node(node)
    }
}

impl From<Arc<Token>> for GreenElement {
    fn from(token: Arc<Token>) -> Self {
        Self::Token(token)
    }
}

/// An immutable syntax node without position information.
///
/// Left-associative operator chains and call chains nest one node per
/// link, so a green tree can be far deeper than the call stack allows.
/// Printing, comparing and dropping all work with an explicit stack.
#[derive(Clone)]
pub struct GreenNode {
    kind: SyntaxKind,
    width: u32,
    children: Vec<GreenElement>,
}

impl GreenNode {
    /// Creates a node; the width is the sum of the children's widths.
    #[must_use]
    pub fn new(kind: SyntaxKind, children: Vec<GreenElement>) -> Self {
        let width = children.iter().map(GreenElement::width).sum();
        Self {
            kind,
            width,
            children,
        }
    }

    /// Returns the kind of this node.
    #[must_use]
    pub const fn kind(&self) -> SyntaxKind {
        self.kind
    }

    /// Returns the full width (trivia included) in bytes.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Returns the children in source order.
    #[must_use]
    pub fn children(&self) -> &[GreenElement] {
        &self.children
    }

    /// Appends the full text of this node to `out`.
    pub fn write_full_text(&self, out: &mut String) {
        for child in &self.children {
            child.write_full_text(out);
        }
    }

    /// Returns the number of nodes on the longest path from this node down
    /// to a leaf, this node included.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            for child in &node.children {
                if let GreenElement::Node(child) = child {
                    stack.push((child.as_ref(), depth + 1));
                }
            }
        }
        deepest
    }

    /// Returns the full text of this node.
    #[must_use]
    pub fn to_full_string(&self) -> String {
        let mut out = String::with_capacity(self.width as usize);
        self.write_full_text(&mut out);
        out
    }
}

impl PartialEq for GreenNode {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((left, right)) = pending.pop() {
            if left.kind != right.kind
                || left.width != right.width
                || left.children.len() != right.children.len()
            {
                return false;
            }
            for pair in left.children.iter().zip(&right.children) {
                match pair {
                    (GreenElement::Node(a), GreenElement::Node(b)) => {
                        if !Arc::ptr_eq(a, b) {
                            pending.push((a.as_ref(), b.as_ref()));
                        }
                    }
                    (GreenElement::Token(a), GreenElement::Token(b)) => {
                        if a != b {
                            return false;
                        }
                    }
                    _ => return false,
                }
            }
        }
        true
    }
}

impl Eq for GreenNode {}

impl Hash for GreenNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.width.hash(state);
        self.children.len().hash(state);
    }
}

impl fmt::Debug for GreenNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GreenNode")
            .field("kind", &self.kind)
            .field("width", &self.width)
            .field("children", &self.children.len())
            .finish()
    }
}

impl Drop for GreenNode {
    fn drop(&mut self) {
        let mut orphans: Vec<Arc<Self>> = Vec::new();
        take_child_nodes(&mut self.children, &mut orphans);
        while let Some(node) = orphans.pop() {
            if let Some(mut node) = Arc::into_inner(node) {
                take_child_nodes(&mut node.children, &mut orphans);
            }
        }
    }
}

fn take_child_nodes(children: &mut Vec<GreenElement>, out: &mut Vec<Arc<GreenNode>>) {
    out.extend(
        std::mem::take(children)
            .into_iter()
            .filter_map(|child| match child {
                GreenElement::Node(node) => Some(node),
                GreenElement::Token(_) => None,
            }),
    );
}

/// Interns green tokens so that identical tokens share one allocation.
///
/// Keywords, punctuation and common names repeat constantly in Lua code;
/// parsing many files through one cache keeps a single copy of each. Tokens
/// that carry a decoded literal value are not interned. A cache is owned by
/// one caller and passed to [`SyntaxTree::parse_with`](super::SyntaxTree::parse_with)
/// by `&mut`.
#[derive(Debug, Default)]
pub struct NodeCache {
    tokens: HashSet<Arc<Token>>,
    hits: usize,
}

impl NodeCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a shared copy of `token`, reusing an identical one if cached.
    pub fn token(&mut self, token: Token) -> Arc<Token> {
        if !token.value().is_none() {
            return Arc::new(token);
        }
        if let Some(existing) = self.tokens.get(&token) {
            self.hits += 1;
            return Arc::clone(existing);
        }
        let token = Arc::new(token);
        self.tokens.insert(Arc::clone(&token));
        token
    }

    /// Returns the number of distinct cached tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` if nothing has been cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns how many tokens were served from the cache.
    #[must_use]
    pub const fn hits(&self) -> usize {
        self.hits
    }
}
