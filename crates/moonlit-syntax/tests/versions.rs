// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Grammar variants: Lua versions, interactive input and configuration.

use moonlit_syntax::source_analysis::{
    DiagnosticCode, LuaVersion, ParseOptions, SourceKind, SyntaxOptions, is_input_complete,
};
use moonlit_syntax::syntax::{SyntaxKind, SyntaxTree};

fn diagnostics_for(source: &str, options: &ParseOptions) -> Vec<(DiagnosticCode, String)> {
    let tree = SyntaxTree::parse(source, options);
    assert_eq!(tree.to_full_string(), source);
    tree.diagnostics()
        .iter()
        .map(|d| (d.code, d.message.to_string()))
        .collect()
}

fn in_version(source: &str, version: LuaVersion) -> Vec<(DiagnosticCode, String)> {
    diagnostics_for(source, &ParseOptions::for_version(version))
}

fn unavailable(feature: &str) -> (DiagnosticCode, String) {
    (
        DiagnosticCode::FeatureNotAvailable,
        format!("{feature} is not available in the selected Lua version"),
    )
}

#[test]
fn newer_operators_in_older_versions() {
    assert_eq!(
        in_version("x = a // b", LuaVersion::Lua52),
        [unavailable("integer division")]
    );
    assert_eq!(
        in_version("x = a | b", LuaVersion::Lua52),
        [unavailable("bitwise operators")]
    );
    assert_eq!(
        in_version("x = ~a", LuaVersion::Lua51),
        [unavailable("bitwise operators")]
    );
    assert!(in_version("x = a // b | ~c", LuaVersion::Lua53).is_empty());
}

#[test]
fn local_attributes_need_lua54() {
    assert_eq!(
        in_version("local x <const> = 1", LuaVersion::Lua53),
        [unavailable("local attributes")]
    );
    assert!(in_version("local x <close> = nil", LuaVersion::Lua54).is_empty());
}

#[test]
fn goto_is_a_name_in_lua51() {
    assert!(in_version("goto = 1\nprint(goto)", LuaVersion::Lua51).is_empty());
    assert!(!in_version("goto = 1", LuaVersion::Lua52).is_empty());
    assert_eq!(
        in_version("::top::", LuaVersion::Lua51),
        [unavailable("labels")]
    );
}

#[test]
fn escapes_follow_the_version() {
    assert_eq!(
        in_version(r#"s = "\x41""#, LuaVersion::Lua51),
        [unavailable("'\\x' escape")]
    );
    assert_eq!(
        in_version(r#"s = "\u{41}""#, LuaVersion::Lua52),
        [unavailable("'\\u' escape")]
    );
    assert!(in_version(r#"s = "\x41\u{41}""#, LuaVersion::Lua53).is_empty());
}

#[test]
fn feature_flags_can_be_mixed() {
    let options = ParseOptions {
        kind: SourceKind::Script,
        syntax: SyntaxOptions {
            integer_division: false,
            ..SyntaxOptions::for_version(LuaVersion::Lua54)
        },
    };
    assert_eq!(
        diagnostics_for("x = 7 // 2 & 1", &options),
        [unavailable("integer division")]
    );
}

#[test]
fn interactive_accepts_one_bare_expression() {
    let interactive = ParseOptions::interactive();
    assert!(diagnostics_for("1 + 2 * 3", &interactive).is_empty());
    assert!(diagnostics_for("f", &interactive).is_empty());

    let script = diagnostics_for("1 + 2 * 3", &ParseOptions::default());
    assert_eq!(script.len(), 1);
    assert_eq!(script[0].0, DiagnosticCode::NotAStatement);

    let two = diagnostics_for("x = 1\n1 + 2", &interactive);
    assert_eq!(two.len(), 1);
    assert_eq!(two[0].0, DiagnosticCode::NotAStatement);

    let tree = SyntaxTree::parse("1 + 2", &interactive);
    let statement = tree.root().descendants().find(|n| n.kind().is_statement()).unwrap();
    assert_eq!(statement.kind(), SyntaxKind::ExpressionStatement);
}

#[test]
fn shebang_only_in_scripts() {
    let source = "#!/usr/bin/env lua\nprint(1)";
    assert!(diagnostics_for(source, &ParseOptions::default()).is_empty());
    assert!(!diagnostics_for(source, &ParseOptions::interactive()).is_empty());
}

#[test]
fn input_completeness_for_prompts() {
    for complete in ["print(1)", "x = 1", "return", "", "-- comment", "x = = 1", "end"] {
        assert!(is_input_complete(complete), "{complete:?} should be complete");
    }
    for incomplete in [
        "function f()",
        "for i = 1, 3 do",
        "if x then print(x)",
        "t = {1, 2,",
        "x = [[multi",
        "--[[ open comment",
        "print(",
        "x = 1 +",
        "repeat x = x + 1",
    ] {
        assert!(!is_input_complete(incomplete), "{incomplete:?} should be incomplete");
    }
}

#[test]
fn options_from_json() {
    let options: ParseOptions = serde_json::from_str(
        r#"{ "kind": "script", "syntax": { "version": "lua53", "bitwise-operators": false } }"#,
    )
    .unwrap();
    assert_eq!(options.kind, SourceKind::Script);
    assert!(options.syntax.integer_division);
    assert!(!options.syntax.bitwise_operators);
    assert!(!options.syntax.local_attributes);

    let defaults: ParseOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(defaults, ParseOptions::default());
}
