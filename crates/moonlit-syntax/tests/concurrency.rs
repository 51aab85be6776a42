// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Parsing from several threads, sharing trees, the token cache and
//! cooperative cancellation.

use std::sync::Arc;
use std::thread;

use moonlit_syntax::source_analysis::{CancellationToken, ParseError, ParseOptions};
use moonlit_syntax::syntax::{NodeCache, SyntaxKind, SyntaxTree};

fn program(n: usize) -> String {
    (0..n)
        .map(|i| format!("local v{i} = {{ {i}, \"s{i}\" }}\nprint(v{i}[1] + {i})\n"))
        .collect()
}

#[test]
fn independent_parses_on_many_threads() {
    let handles: Vec<_> = (1..=8)
        .map(|n| {
            thread::spawn(move || {
                let source = program(n * 10);
                let tree = SyntaxTree::parse(&source, &ParseOptions::default());
                assert_eq!(tree.to_full_string(), source);
                assert!(tree.diagnostics().is_empty());
                tree.chunk().block().unwrap().statements().count()
            })
        })
        .collect();
    let counts: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(counts, (1..=8).map(|n| n * 20).collect::<Vec<_>>());
}

#[test]
fn one_tree_read_from_many_threads() {
    let source = program(50);
    let tree = Arc::new(SyntaxTree::parse(&source, &ParseOptions::default()));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let tree = Arc::clone(&tree);
            thread::spawn(move || {
                tree.root()
                    .descendants()
                    .filter(|n| n.kind() == SyntaxKind::FunctionCallExpression)
                    .count()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 50);
    }
}

#[test]
fn cache_is_reused_across_parses() {
    let mut cache = NodeCache::new();
    let options = ParseOptions::default();
    let source = program(20);
    SyntaxTree::parse_with(&source, &options, &mut cache, None).unwrap();
    let after_first = cache.len();
    assert!(!cache.is_empty());
    SyntaxTree::parse_with(&source, &options, &mut cache, None).unwrap();
    assert_eq!(cache.len(), after_first);
    assert!(cache.hits() > 0);
}

#[test]
fn cancelled_token_fails_the_parse() {
    let token = CancellationToken::new();
    let handle = token.clone();
    thread::spawn(move || handle.cancel()).join().unwrap();

    let mut cache = NodeCache::new();
    let result = SyntaxTree::parse_with(
        &program(100),
        &ParseOptions::default(),
        &mut cache,
        Some(&token),
    );
    assert!(matches!(result, Err(ParseError::Cancelled)));
}

#[test]
fn uncancelled_token_is_harmless() {
    let token = CancellationToken::new();
    let mut cache = NodeCache::new();
    let source = program(10);
    let tree =
        SyntaxTree::parse_with(&source, &ParseOptions::default(), &mut cache, Some(&token))
            .unwrap();
    assert_eq!(tree.to_full_string(), source);
}
