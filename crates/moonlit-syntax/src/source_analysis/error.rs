// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! API-level parse failures.
//!
//! Problems in the Lua source, bytes that are not UTF-8 included, are never
//! errors here: they become [`Diagnostic`](super::Diagnostic)s on the tree.
//! [`ParseError`] covers the one way a *caller* can make a parse fail:
//! cancelling it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

/// A parse that could not produce a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error, miette::Diagnostic)]
pub enum ParseError {
    /// The parse was cancelled through its [`CancellationToken`].
    #[error("parse was cancelled")]
    #[diagnostic(code(moonlit::cancelled))]
    Cancelled,
}

/// A flag shared between a parse and whoever may want to stop it.
///
/// Clones share the same flag. The parser polls it at every statement and
/// expression, so cancellation takes effect promptly even on large inputs.
///
/// ```
/// use moonlit_syntax::source_analysis::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called on any clone.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_is_shared_between_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn cancelled_message() {
        assert_eq!(ParseError::Cancelled.to_string(), "parse was cancelled");
    }
}
