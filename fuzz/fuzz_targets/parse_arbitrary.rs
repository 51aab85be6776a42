// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for parser crash safety testing.
//!
//! This target feeds arbitrary byte sequences to the parser and asserts
//! that it never panics and never loses input:
//!
//! - Every input, UTF-8 or not, yields a tree that prints back to the input
//! - Every diagnostic span lies within the decoded text
//!
//! Both grammar variants are exercised: the first byte picks the Lua
//! version and the source kind, the rest is the source.

#![no_main]

use libfuzzer_sys::fuzz_target;
use moonlit_syntax::source_analysis::{LuaVersion, ParseOptions, SourceKind};
use moonlit_syntax::syntax::SyntaxTree;

fuzz_target!(|data: &[u8]| {
    let Some((&selector, source)) = data.split_first() else {
        return;
    };
    let version = match selector & 0b11 {
        0 => LuaVersion::Lua51,
        1 => LuaVersion::Lua52,
        2 => LuaVersion::Lua53,
        _ => LuaVersion::Lua54,
    };
    let kind = if selector & 0b100 == 0 {
        SourceKind::Script
    } else {
        SourceKind::Interactive
    };
    let options = ParseOptions::for_version(version).with_kind(kind);

    let tree = SyntaxTree::parse_bytes(source, &options);
    assert_eq!(tree.to_full_bytes(), source);
    if std::str::from_utf8(source).is_ok() {
        assert_eq!(tree.to_full_string().as_bytes(), source);
    }
    let len = u32::try_from(tree.to_full_string().len()).unwrap_or(u32::MAX);
    for diagnostic in tree.diagnostics() {
        assert!(diagnostic.span.end() <= len);
    }
});
