use esql::ast::*;
use esql::parser::{parse, ParseOptions};

/// Assert that parsing succeeds
pub fn assert_parses(source: &str) -> Query {
    parse(source, &ParseOptions::default())
        .unwrap_or_else(|d| panic!("Expected {source:?} to parse, got {d:#?}"))
}

/// Assert that parsing fails, returning the diagnostics
pub fn assert_parse_fails(source: &str) -> Vec<Diagnostic> {
    match parse(source, &ParseOptions::default()) {
        Ok(query) => panic!("Expected {source:?} to fail parsing, got {query:#?}"),
        Err(diagnostics) => {
            assert!(!diagnostics.is_empty(), "Failure without diagnostics");
            diagnostics
        }
    }
}

/// Assert the command keywords of a query, source command first
pub fn assert_pipeline(query: &Query, expected: &[&str]) {
    let names: Vec<_> = query.iter().map(|c| c.kind.name()).collect();
    assert_eq!(names, expected, "Unexpected pipeline");
}

/// Assert the first diagnostic's kind and line/column
pub fn assert_first_diagnostic(
    diagnostics: &[Diagnostic],
    kind: DiagnosticKind,
    line: usize,
    column: usize,
) -> &Diagnostic {
    let diagnostic = diagnostics.first().expect("Expected a diagnostic");
    assert_eq!(diagnostic.kind, kind, "{diagnostic}");
    assert_eq!(
        (diagnostic.range.start.line, diagnostic.range.start.column),
        (line, column),
        "{diagnostic}"
    );
    diagnostic
}
