// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The concrete syntax tree.
//!
//! Two layers, as in other lossless front-ends:
//!
//! - The **green** layer ([`GreenNode`], [`GreenElement`]) holds kinds,
//!   widths and children. It is immutable, position independent and shared
//!   through `Arc`.
//! - The **red** layer ([`SyntaxNode`], [`SyntaxToken`]) adds absolute
//!   offsets and parent links, computed while walking down from the root.
//!
//! [`ast`] adds typed views over red nodes, [`walker`] the shared
//! traversals, and [`SyntaxTree`] ties a root to its diagnostics.

pub mod ast;
mod green;
mod kind;
mod node;
mod tree;
pub mod walker;

pub use green::{GreenElement, GreenNode, NodeCache};
pub use kind::SyntaxKind;
pub use node::{SyntaxElement, SyntaxNode, SyntaxToken};
pub use tree::SyntaxTree;
pub use walker::WalkEvent;
