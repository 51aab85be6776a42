// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the Lua parser.
//!
//! These tests verify the guarantees every caller relies on, for arbitrary
//! and near-valid input:
//!
//! 1. **Parser never panics** - any string produces a tree
//! 2. **Round trip** - the tree's full text (or bytes) is exactly the input
//! 3. **Diagnostic spans within input** - sorted, in bounds, on char boundaries
//! 4. **Error nodes imply diagnostics** - skipped input is always reported
//! 5. **Valid fragments parse cleanly** - no false positives

use proptest::prelude::*;

use crate::source_analysis::{Diagnostic, LuaVersion, ParseOptions, SyntaxOptions, tokenize};
use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxTree};

use super::parse;

// ============================================================================
// Generators
// ============================================================================

/// Valid Lua 5.4 fragments, each a complete chunk on its own.
const FRAGMENTS: &[&str] = &[
    "local x = 1",
    "x = y + 2 * z",
    "print('hello')",
    "print \"hello\"",
    "f{1, 2, [3] = 4; k = 5}",
    "local t <const> = {}",
    "function a.b.c:m(x, ...) return x end",
    "local function f(n) if n < 2 then return n end return f(n-1) + f(n-2) end",
    "for i = 1, 10, 2 do s = s .. i end",
    "for k, v in pairs(t) do print(k, v) end",
    "while x > 0 do x = x - 1 end",
    "repeat local y = x until y",
    "do local a, b = 1, 2 end",
    "if a then b() elseif c then d() else e() end",
    "goto done ::done::",
    "x = a // b & c | ~d << 1 >> 2",
    "x = -2 ^ -3",
    "x = [[long\nstring]] .. [==[x]==]",
    "-- comment\nx = 1 --[[ block ]] y = 2",
    "return function(...) return select('#', ...) end",
    "a.b[c]:d(e).f = nil",
    "x = 0x1p4 + 3.5e-2 + 0xFF",
];

fn valid_fragment() -> impl Strategy<Value = String> {
    prop::sample::select(FRAGMENTS).prop_map(std::string::ToString::to_string)
}

/// Cuts `s` at a char boundary at or below `cut`.
fn truncate_at(s: &str, mut cut: usize) -> String {
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    s[..cut].to_string()
}

/// Generates near-valid Lua with mutations.
fn near_valid_lua() -> impl Strategy<Value = String> {
    prop_oneof![
        // Valid fragments
        valid_fragment(),
        // Truncated
        valid_fragment().prop_flat_map(|s| {
            let len = s.len();
            (0..=len).prop_map(move |cut| truncate_at(&s, cut))
        }),
        // With a byte removed
        valid_fragment().prop_flat_map(|s| {
            let len = s.len();
            (0..len).prop_map(move |at| {
                let mut out = truncate_at(&s, at);
                out.push_str(&s[out.len()..].chars().skip(1).collect::<String>());
                out
            })
        }),
        // Multiple fragments concatenated
        (valid_fragment(), valid_fragment()).prop_map(|(a, b)| format!("{a}\n{b}")),
        // Fragments glued without a separator
        (valid_fragment(), valid_fragment()).prop_map(|(a, b)| format!("{a} {b}")),
    ]
}

fn any_version() -> impl Strategy<Value = LuaVersion> {
    prop_oneof![
        Just(LuaVersion::Lua51),
        Just(LuaVersion::Lua52),
        Just(LuaVersion::Lua53),
        Just(LuaVersion::Lua54),
    ]
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_with(source: &str, options: &ParseOptions) -> (SyntaxNode, Vec<Diagnostic>) {
    let tree = SyntaxTree::parse(source, options);
    (tree.root(), tree.diagnostics().to_vec())
}

fn check_diagnostics(source: &str, diagnostics: &[Diagnostic]) -> Result<(), TestCaseError> {
    let len = u32::try_from(source.len()).unwrap_or(u32::MAX);
    for diagnostic in diagnostics {
        let span = diagnostic.span;
        prop_assert!(span.start() <= span.end(), "inverted span {:?}", span);
        prop_assert!(span.end() <= len, "span {:?} past end {}", span, len);
        prop_assert!(source.is_char_boundary(span.start() as usize));
        prop_assert!(source.is_char_boundary(span.end() as usize));
    }
    for pair in diagnostics.windows(2) {
        prop_assert!(
            pair[0].span.start() <= pair[1].span.start(),
            "diagnostics out of order: {:?}",
            pair
        );
    }
    Ok(())
}

// ============================================================================
// Property tests
// ============================================================================

fn proptest_config() -> ProptestConfig {
    let default = ProptestConfig::default();
    ProptestConfig {
        cases: default.cases.max(512),
        ..default
    }
}

proptest! {
    #![proptest_config(proptest_config())]

    /// Property 1: the parser never panics on arbitrary string input.
    #[test]
    fn parser_never_panics(input in "\\PC{0,500}") {
        let options = ParseOptions::default();
        let (tokens, _) = tokenize(&input, &options);
        let _result = parse(tokens, &options);
    }

    /// Property 1b: the parser never panics on near-valid input, in any version.
    #[test]
    fn parser_never_panics_near_valid(input in near_valid_lua(), version in any_version()) {
        let options = ParseOptions {
            syntax: SyntaxOptions::for_version(version),
            ..ParseOptions::default()
        };
        let _result = parse_with(&input, &options);
    }

    /// Property 2: printing the tree gives back the input byte for byte.
    #[test]
    fn tree_round_trips(input in "\\PC{0,300}") {
        let (root, _) = parse_with(&input, &ParseOptions::default());
        prop_assert_eq!(root.to_full_string(), input);
    }

    /// Property 2b: round trip on near-valid input, including interactive mode.
    #[test]
    fn tree_round_trips_near_valid(input in near_valid_lua(), interactive in any::<bool>()) {
        let options = if interactive {
            ParseOptions::interactive()
        } else {
            ParseOptions::default()
        };
        let (root, _) = parse_with(&input, &options);
        prop_assert_eq!(root.to_full_string(), input);
    }

    /// Property 2c: arbitrary bytes, UTF-8 or not, come back unchanged.
    #[test]
    fn bytes_round_trip(input in prop::collection::vec(any::<u8>(), 0..300)) {
        let tree = SyntaxTree::parse_bytes(&input, &ParseOptions::default());
        prop_assert_eq!(tree.to_full_bytes(), input);
        check_diagnostics(&tree.to_full_string(), tree.diagnostics())?;
    }

    /// Property 3: diagnostics are sorted and point into the input.
    #[test]
    fn diagnostic_spans_within_input(input in "\\PC{0,300}") {
        let (_, diagnostics) = parse_with(&input, &ParseOptions::default());
        check_diagnostics(&input, &diagnostics)?;
    }

    /// Property 3b: same for near-valid input.
    #[test]
    fn diagnostic_spans_within_input_near_valid(input in near_valid_lua()) {
        let (_, diagnostics) = parse_with(&input, &ParseOptions::default());
        check_diagnostics(&input, &diagnostics)?;
    }

    /// Property 4: a tree with an error node always comes with a diagnostic.
    #[test]
    fn error_nodes_imply_diagnostics(input in near_valid_lua()) {
        let (root, diagnostics) = parse_with(&input, &ParseOptions::default());
        let has_error_node = root.descendants().any(|n| n.kind() == SyntaxKind::Error);
        if has_error_node {
            prop_assert!(!diagnostics.is_empty(), "error node without diagnostic in {:?}", input);
        }
    }

    /// Property 4b: every token of the input lands in the tree.
    #[test]
    fn every_token_is_in_the_tree(input in near_valid_lua()) {
        let options = ParseOptions::default();
        let (tokens, _) = tokenize(&input, &options);
        let (root, _) = parse_with(&input, &options);
        let present = root.tokens().filter(|t| !t.is_missing()).count();
        prop_assert_eq!(present, tokens.len());
    }

    /// Property 5: valid fragments produce no diagnostics.
    #[test]
    fn valid_fragments_parse_cleanly(input in valid_fragment()) {
        let (_, diagnostics) = parse_with(&input, &ParseOptions::default());
        prop_assert!(diagnostics.is_empty(), "{:?}: {:?}", input, diagnostics);
    }
}
