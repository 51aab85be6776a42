// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Rendering diagnostics with `miette`.

use miette::{GraphicalReportHandler, GraphicalTheme};
use moonlit_syntax::source_analysis::{DiagnosticCode, ParseOptions, Position};
use moonlit_syntax::syntax::SyntaxTree;

fn render(report: &dyn miette::Diagnostic) -> String {
    let mut out = String::new();
    GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
        .render_report(&mut out, report)
        .unwrap();
    out
}

#[test]
fn report_shows_code_message_and_source() {
    let source = "local x = 1\nx = = 2\n";
    let tree = SyntaxTree::parse(source, &ParseOptions::default());
    let reports = tree.reports("main.lua");
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].code(), DiagnosticCode::ExpectedExpression);

    let text = render(&reports[0]);
    assert!(text.contains("LUA1003"), "{text}");
    assert!(text.contains("unexpected symbol near '='"), "{text}");
    assert!(text.contains("main.lua"), "{text}");
    assert!(text.contains("x = = 2"), "{text}");
}

#[test]
fn hints_are_rendered_as_help() {
    let tree = SyntaxTree::parse("f() = 1", &ParseOptions::default());
    let reports = tree.reports("main.lua");
    let text = render(&reports[0]);
    assert!(text.contains("cannot assign to this expression"), "{text}");
    assert!(
        text.contains("only names, fields and indexed values can be assigned"),
        "{text}"
    );
}

#[test]
fn spans_map_to_line_and_column() {
    let source = "x = 1\r\ny = 'open\n";
    let tree = SyntaxTree::parse(source, &ParseOptions::default());
    let diagnostic = &tree.diagnostics()[0];
    let (start, _) = tree.line_index().range(diagnostic.span).unwrap();
    assert_eq!(start, Position::new(1, 4));
}
