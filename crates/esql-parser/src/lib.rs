//! ES|QL Parser - Recursive descent parser
//!
//! Parses a query text into a [`Query`] AST.
//! Key parsing challenges:
//! - Keywords depend on the command being parsed; the lexer's mode stack
//!   resolves them, so the parser only ever sees final token kinds
//! - `a NOT IN (...)` vs `NOT a`: decided with two tokens of lookahead
//! - `x = expr` fields vs bare expressions: decided by scanning the
//!   dotted name ahead for `=`
//! - Nesting (EXPLAIN sub-queries, parentheses, sign and NOT chains) is
//!   bounded by [`ParseOptions::max_depth`]

mod commands;
mod error;
mod expr;
mod literal;
mod options;
mod parser;

pub use error::*;
pub use options::*;
pub use parser::*;

use esql_ast::{Diagnostic, LineIndex, Query};
use serde::Serialize;

/// Result of a parse that keeps going after errors
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseOutput {
    /// Absent only when a fatal error stopped the parse; may contain
    /// [`esql_ast::CommandKind::Invalid`] placeholders in tolerant mode
    pub query: Option<Query>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutput {
    pub fn is_ok(&self) -> bool {
        self.query.is_some() && self.diagnostics.is_empty()
    }
}

/// Parse a query, returning every diagnostic produced
pub fn parse_with_diagnostics(source: &str, options: &ParseOptions) -> ParseOutput {
    let mut parser = Parser::new(source, options.clone());
    let result = parser.parse_single_statement();
    let mut errors = parser.take_errors();
    let query = match result {
        Ok(query) => Some(query),
        Err(err) => {
            errors.push(err);
            None
        }
    };

    let index = LineIndex::new(source);
    ParseOutput {
        query,
        diagnostics: errors.iter().map(|e| e.to_diagnostic(&index)).collect(),
    }
}

/// Parse a query; any diagnostic makes the parse fail
pub fn parse(source: &str, options: &ParseOptions) -> Result<Query, Vec<Diagnostic>> {
    let output = parse_with_diagnostics(source, options);
    match output.query {
        Some(query) if output.diagnostics.is_empty() => Ok(query),
        _ => Err(output.diagnostics),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esql_ast::{
        ArithmeticOp, BooleanExprKind, CommandKind, DiagnosticKind, FunctionArgs, Literal,
        LogicalOp, Number, NullsOrdering, OperatorExprKind, Ordering, PrimaryExprKind, RegexKind,
        ShowKind, Span, ValueExpr, ValueExprKind,
    };

    fn parse_ok(source: &str) -> Query {
        parse(source, &ParseOptions::default())
            .unwrap_or_else(|d| panic!("failed to parse {source:?}: {d:?}"))
    }

    fn parse_err(source: &str) -> Vec<Diagnostic> {
        match parse(source, &ParseOptions::default()) {
            Ok(query) => panic!("expected {source:?} to fail, got {query:?}"),
            Err(diagnostics) => diagnostics,
        }
    }

    fn names(query: &Query) -> Vec<&'static str> {
        query.iter().map(|c| c.kind.name()).collect()
    }

    fn row_literals(query: &Query) -> Vec<Literal> {
        let CommandKind::Row { fields } = &query.source.kind else {
            panic!("expected ROW, got {:?}", query.source.kind);
        };
        fields
            .iter()
            .map(|f| {
                let primary = f
                    .value
                    .as_value()
                    .and_then(ValueExpr::as_operator)
                    .and_then(|o| o.as_primary())
                    .expect("primary expression");
                match &primary.kind {
                    PrimaryExprKind::Constant(c) => c.kind.clone(),
                    other => panic!("expected constant, got {other:?}"),
                }
            })
            .collect()
    }

    #[test]
    fn test_pipeline_order() {
        let query = parse_ok("FROM a | EVAL x = 1 | WHERE x > 0 | LIMIT 5");
        assert_eq!(names(&query), ["FROM", "EVAL", "WHERE", "LIMIT"]);
        assert_eq!(query.span, Span::new(0, 43));
    }

    #[test]
    fn test_command_spans() {
        let query = parse_ok("FROM a | WHERE x > 1");
        assert_eq!(query.source.span, Span::new(0, 6));
        assert_eq!(query.commands[0].span, Span::new(9, 20));
    }

    #[test]
    fn test_multiplication_binds_tighter() {
        let query = parse_ok("ROW a = 1 + 2 * 3");
        let CommandKind::Row { fields } = &query.source.kind else {
            panic!("expected ROW");
        };
        assert_eq!(fields[0].name.as_ref().map(|n| n.name()).as_deref(), Some("a"));
        let op = fields[0]
            .value
            .as_value()
            .and_then(ValueExpr::as_operator)
            .expect("arithmetic");
        let OperatorExprKind::Binary {
            op: ArithmeticOp::Add,
            left,
            right,
        } = &op.kind
        else {
            panic!("expected addition at the root, got {:?}", op.kind);
        };
        assert!(matches!(left.kind, OperatorExprKind::Primary(_)));
        assert!(matches!(
            right.kind,
            OperatorExprKind::Binary {
                op: ArithmeticOp::Mul,
                ..
            }
        ));
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        let query = parse_ok("ROW a = 10 - 3 - 2");
        let CommandKind::Row { fields } = &query.source.kind else {
            panic!("expected ROW");
        };
        let op = fields[0]
            .value
            .as_value()
            .and_then(ValueExpr::as_operator)
            .expect("arithmetic");
        let OperatorExprKind::Binary { left, right, .. } = &op.kind else {
            panic!("expected binary");
        };
        assert!(matches!(
            left.kind,
            OperatorExprKind::Binary {
                op: ArithmeticOp::Sub,
                ..
            }
        ));
        assert!(matches!(right.kind, OperatorExprKind::Primary(_)));
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let query = parse_ok("FROM a | WHERE x > 1 AND y < 2 OR z == 3");
        let CommandKind::Where { predicate } = &query.commands[0].kind else {
            panic!("expected WHERE");
        };
        let BooleanExprKind::Logical {
            op: LogicalOp::Or,
            left,
            right,
        } = &predicate.kind
        else {
            panic!("expected OR at the root, got {:?}", predicate.kind);
        };
        assert!(matches!(
            left.kind,
            BooleanExprKind::Logical {
                op: LogicalOp::And,
                ..
            }
        ));
        let comparison = right.as_value().expect("comparison");
        assert!(matches!(
            comparison.kind,
            ValueExprKind::Comparison {
                op: esql_ast::ComparisonOp::Eq,
                ..
            }
        ));
    }

    #[test]
    fn test_not_binds_tighter_than_and() {
        let query = parse_ok("FROM a | WHERE NOT a AND b OR c");
        let CommandKind::Where { predicate } = &query.commands[0].kind else {
            panic!("expected WHERE");
        };
        let BooleanExprKind::Logical {
            op: LogicalOp::Or,
            left,
            ..
        } = &predicate.kind
        else {
            panic!("expected OR at the root, got {:?}", predicate.kind);
        };
        let BooleanExprKind::Logical {
            op: LogicalOp::And,
            left,
            ..
        } = &left.kind
        else {
            panic!("expected AND, got {:?}", left.kind);
        };
        assert!(matches!(left.kind, BooleanExprKind::Not(_)));
    }

    #[test]
    fn test_leading_minus_is_unary() {
        let query = parse_ok("ROW a = -1 + 2");
        let CommandKind::Row { fields } = &query.source.kind else {
            panic!("expected ROW");
        };
        let op = fields[0]
            .value
            .as_value()
            .and_then(ValueExpr::as_operator)
            .expect("arithmetic");
        let OperatorExprKind::Binary {
            op: ArithmeticOp::Add,
            left,
            ..
        } = &op.kind
        else {
            panic!("expected addition, got {:?}", op.kind);
        };
        assert!(matches!(
            left.kind,
            OperatorExprKind::Unary {
                op: esql_ast::UnaryOp::Minus,
                ..
            }
        ));
    }

    #[test]
    fn test_not_in_is_single_node() {
        let query = parse_ok("FROM a | WHERE a NOT IN (1, 2)");
        let CommandKind::Where { predicate } = &query.commands[0].kind else {
            panic!("expected WHERE");
        };
        match &predicate.kind {
            BooleanExprKind::In { negated, list, .. } => {
                assert!(*negated);
                assert_eq!(list.len(), 2);
            }
            other => panic!("expected IN, got {other:?}"),
        }

        let query = parse_ok("FROM a | WHERE NOT a IN (1)");
        let CommandKind::Where { predicate } = &query.commands[0].kind else {
            panic!("expected WHERE");
        };
        let BooleanExprKind::Not(inner) = &predicate.kind else {
            panic!("expected NOT, got {:?}", predicate.kind);
        };
        assert!(matches!(inner.kind, BooleanExprKind::In { negated: false, .. }));
    }

    #[test]
    fn test_regex_and_null_predicates() {
        let query =
            parse_ok(r#"FROM a | WHERE x NOT RLIKE "a.*" AND y LIKE "b?" AND z IS NOT NULL"#);
        let CommandKind::Where { predicate } = &query.commands[0].kind else {
            panic!("expected WHERE");
        };
        let BooleanExprKind::Logical { left, right, .. } = &predicate.kind else {
            panic!("expected AND");
        };
        assert!(matches!(
            right.kind,
            BooleanExprKind::IsNull { negated: true, .. }
        ));
        let BooleanExprKind::Logical { left, right, .. } = &left.kind else {
            panic!("expected AND");
        };
        match &left.kind {
            BooleanExprKind::Regex {
                kind,
                negated,
                pattern,
                ..
            } => {
                assert_eq!(*kind, RegexKind::Rlike);
                assert!(*negated);
                assert_eq!(pattern.value, "a.*");
            }
            other => panic!("expected RLIKE, got {other:?}"),
        }
        assert!(matches!(
            right.kind,
            BooleanExprKind::Regex {
                kind: RegexKind::Like,
                negated: false,
                ..
            }
        ));
    }

    #[test]
    fn test_comparisons_do_not_chain() {
        let diagnostics = parse_err("ROW a = 1 < 2 < 3");
        assert_eq!(diagnostics[0].kind, DiagnosticKind::Syntax);
        assert_eq!(diagnostics[0].found, "'<'");
    }

    #[test]
    fn test_from_metadata() {
        let query = parse_ok("FROM idx, logs-* METADATA _id, _version");
        let CommandKind::From { indices, metadata } = &query.source.kind else {
            panic!("expected FROM");
        };
        assert_eq!(indices[1].name, "logs-*");
        let metadata = metadata.as_ref().expect("metadata");
        assert_eq!(
            metadata.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
            ["_id", "_version"]
        );

        let query = parse_ok("FROM idx [METADATA _id]");
        assert!(matches!(
            &query.source.kind,
            CommandKind::From { metadata: Some(m), .. } if m.len() == 1
        ));
    }

    #[test]
    fn test_stats_group_by_only() {
        let query = parse_ok("FROM a | STATS BY b");
        let CommandKind::Stats { aggs, group_by } = &query.commands[0].kind else {
            panic!("expected STATS");
        };
        assert!(aggs.is_none());
        assert_eq!(group_by.as_ref().map(Vec::len), Some(1));

        let query = parse_ok("FROM a | STATS");
        assert!(matches!(
            query.commands[0].kind,
            CommandKind::Stats {
                aggs: None,
                group_by: None
            }
        ));
    }

    #[test]
    fn test_stats_by_requires_fields() {
        let diagnostics = parse_err("FROM a | STATS a BY");
        assert_eq!(diagnostics[0].kind, DiagnosticKind::Syntax);
        assert_eq!(diagnostics[0].found, "end of input");
    }

    #[test]
    fn test_function_arguments() {
        let query = parse_ok("FROM a | STATS count(*), c = count(), m = max(x, 1) BY host");
        let CommandKind::Stats {
            aggs: Some(aggs), ..
        } = &query.commands[0].kind
        else {
            panic!("expected STATS with aggregates");
        };
        let args: Vec<_> = aggs
            .iter()
            .map(|field| {
                let primary = field
                    .value
                    .as_value()
                    .and_then(ValueExpr::as_operator)
                    .and_then(|o| o.as_primary())
                    .expect("function call");
                match &primary.kind {
                    PrimaryExprKind::Function(call) => call.args.clone(),
                    other => panic!("expected function call, got {other:?}"),
                }
            })
            .collect();
        assert_eq!(args[0], FunctionArgs::Star);
        assert_eq!(args[1], FunctionArgs::List(Vec::new()));
        assert!(matches!(&args[2], FunctionArgs::List(list) if list.len() == 2));
        assert!(aggs[0].name.is_none());
    }

    #[test]
    fn test_as_is_a_field_name_outside_rename() {
        let query = parse_ok("FROM a | EVAL as = 1");
        let CommandKind::Eval { fields } = &query.commands[0].kind else {
            panic!("expected EVAL");
        };
        assert_eq!(fields[0].name.as_ref().map(|n| n.name()).as_deref(), Some("as"));
    }

    #[test]
    fn test_literals() {
        let query = parse_ok(
            r#"ROW a = 1 day, b = 1.5, c = [1, -2, 3.5], d = "x\ty", e = null, f = ?, g = true, h = 99999999999999999999"#,
        );
        assert_eq!(
            row_literals(&query),
            [
                Literal::QualifiedInteger {
                    value: 1,
                    unit: "day".to_string()
                },
                Literal::Decimal(1.5),
                Literal::NumericArray(vec![
                    Number::Integer(1),
                    Number::Integer(-2),
                    Number::Decimal(3.5)
                ]),
                Literal::String("x\ty".to_string()),
                Literal::Null,
                Literal::Param,
                Literal::Boolean(true),
                Literal::Decimal(1e20),
            ]
        );
    }

    #[test]
    fn test_array_elements_share_a_kind() {
        let query = parse_ok(r#"ROW a = ["x", "y"], b = [true, false]"#);
        assert_eq!(
            row_literals(&query),
            [
                Literal::StringArray(vec!["x".to_string(), "y".to_string()]),
                Literal::BooleanArray(vec![true, false]),
            ]
        );
        let diagnostics = parse_err(r#"ROW a = [1, "x"]"#);
        assert_eq!(diagnostics[0].found, r#"'"x"'"#);
    }

    #[test]
    fn test_limit_out_of_range() {
        let diagnostics = parse_err("FROM a | LIMIT 99999999999999999999");
        assert_eq!(diagnostics[0].kind, DiagnosticKind::Syntax);
        assert!(diagnostics[0].message.contains("limit out of range"));
    }

    #[test]
    fn test_project_is_keep() {
        let query = parse_ok("FROM a | PROJECT a, b.* | DROP c*");
        let CommandKind::Keep { patterns } = &query.commands[0].kind else {
            panic!("expected KEEP");
        };
        assert_eq!(patterns[1].pattern(), "b.*");
        assert!(patterns[1].has_wildcard());
        assert_eq!(names(&query), ["FROM", "KEEP", "DROP"]);
    }

    #[test]
    fn test_rename() {
        let query = parse_ok("FROM a | RENAME a AS b, c.d AS `e f`");
        let CommandKind::Rename { clauses } = &query.commands[0].kind else {
            panic!("expected RENAME");
        };
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[1].old_name.pattern(), "c.d");
        assert_eq!(clauses[1].new_name.pattern(), "e f");
    }

    #[test]
    fn test_sort() {
        let query = parse_ok("FROM a | SORT a DESC NULLS LAST, b");
        let CommandKind::Sort { order } = &query.commands[0].kind else {
            panic!("expected SORT");
        };
        assert_eq!(order[0].ordering, Some(Ordering::Desc));
        assert_eq!(order[0].nulls, Some(NullsOrdering::Last));
        assert_eq!(order[1].ordering, None);
    }

    #[test]
    fn test_dissect_and_grok() {
        let query = parse_ok(
            r#"FROM a | DISSECT message "%{a} %{b}" append_separator = "-" | GROK message "%{IP:ip}""#,
        );
        let CommandKind::Dissect {
            pattern, options, ..
        } = &query.commands[0].kind
        else {
            panic!("expected DISSECT");
        };
        assert_eq!(pattern.value, "%{a} %{b}");
        assert_eq!(options[0].name.name, "append_separator");
        assert_eq!(options[0].value.kind, Literal::String("-".to_string()));
        assert_eq!(names(&query), ["FROM", "DISSECT", "GROK"]);

        let query = parse_ok(r#"FROM a | DISSECT message "%{a}" [append_separator = "-"]"#);
        assert!(matches!(
            &query.commands[0].kind,
            CommandKind::Dissect { options, .. } if options.len() == 1
        ));
    }

    #[test]
    fn test_enrich() {
        let query = parse_ok("FROM a | ENRICH [ccq.mode:any] langs ON code WITH name = lang, other");
        let CommandKind::Enrich {
            settings,
            policy,
            match_field,
            with,
        } = &query.commands[0].kind
        else {
            panic!("expected ENRICH");
        };
        assert_eq!(settings[0].name, "ccq.mode");
        assert_eq!(settings[0].value, "any");
        assert_eq!(policy.name, "langs");
        assert_eq!(match_field.as_ref().map(|m| m.pattern()).as_deref(), Some("code"));
        let with = with.as_ref().expect("with clauses");
        assert_eq!(with[0].new_name.as_ref().map(|n| n.pattern()).as_deref(), Some("name"));
        assert_eq!(with[0].enrich_field.pattern(), "lang");
        assert!(with[1].new_name.is_none());
    }

    #[test]
    fn test_show_and_mv_expand() {
        let query = parse_ok("SHOW functions");
        assert_eq!(
            query.source.kind,
            CommandKind::Show {
                kind: ShowKind::Functions
            }
        );
        let query = parse_ok("ROW a = [1, 2] | MV_EXPAND a");
        assert!(matches!(
            &query.commands[0].kind,
            CommandKind::MvExpand { name } if name.name() == "a"
        ));
    }

    #[test]
    fn test_inline_stats() {
        let query = parse_ok("FROM a | INLINESTATS m = max(x) BY host");
        assert!(matches!(
            &query.commands[0].kind,
            CommandKind::InlineStats { aggs, group_by: Some(by) } if aggs.len() == 1 && by.len() == 1
        ));
    }

    #[test]
    fn test_explain_subquery() {
        let query = parse_ok("EXPLAIN [FROM a | WHERE b > 1] | LIMIT 1");
        let CommandKind::Explain { subquery } = &query.source.kind else {
            panic!("expected EXPLAIN");
        };
        assert_eq!(names(subquery), ["FROM", "WHERE"]);
        assert_eq!(names(&query), ["EXPLAIN", "LIMIT"]);
    }

    #[test]
    fn test_explain_nesting_limit() {
        let nested = |n: usize| {
            format!("{}ROW a = 1{}", "EXPLAIN [ ".repeat(n), " ]".repeat(n))
        };
        let options = ParseOptions::default().with_max_depth(3);
        assert!(parse(&nested(2), &options).is_ok());
        let diagnostics = parse(&nested(5), &options).expect_err("too deep");
        assert_eq!(diagnostics[0].kind, DiagnosticKind::RecursionLimit);
    }

    #[test]
    fn test_nested_explain_without_trailing_pipe() {
        let query = parse_ok("EXPLAIN [ EXPLAIN [ ROW a = 1 ] ]");
        let CommandKind::Explain { subquery } = &query.source.kind else {
            panic!("expected EXPLAIN");
        };
        let CommandKind::Explain { subquery: inner } = &subquery.source.kind else {
            panic!("expected inner EXPLAIN");
        };
        assert_eq!(names(inner), ["ROW"]);
        assert_eq!(query.span, Span::new(0, 33));
    }

    #[test]
    fn test_block_comments_are_ignored() {
        let query = parse_ok("FROM a /* c */ | WHERE b /* d **/ > 1 | LIMIT /**/ 1");
        assert_eq!(names(&query), ["FROM", "WHERE", "LIMIT"]);
    }

    #[test]
    fn test_empty_stage_is_a_syntax_error() {
        let diagnostics = parse_err("FROM a | | LIMIT 1");
        assert_eq!(diagnostics[0].kind, DiagnosticKind::Syntax);
        assert_eq!(diagnostics[0].found, "'|'");
        assert!(diagnostics[0].expected.contains(&"LIMIT".to_string()));
    }

    #[test]
    fn test_deep_parentheses_hit_the_limit() {
        let source = format!("ROW a = {}1{}", "(".repeat(500), ")".repeat(500));
        let diagnostics = parse_err(&source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::RecursionLimit);
    }

    #[test]
    fn test_source_command_required_first() {
        let diagnostics = parse_err("WHERE a > 1");
        assert_eq!(diagnostics[0].found, "'WHERE'");
        assert!(diagnostics[0].expected.contains(&"FROM".to_string()));

        let diagnostics = parse_err("FROM a | ROW b = 1");
        assert!(diagnostics[0].expected.contains(&"WHERE".to_string()));
    }

    #[test]
    fn test_error_lists_alternatives() {
        let diagnostics = parse_err("FROM a | WHERE x > y foo");
        let diagnostic = &diagnostics[0];
        assert_eq!(diagnostic.found, "'foo'");
        assert_eq!(diagnostic.span, Span::new(21, 24));
        assert!(diagnostic.expected.contains(&"'|'".to_string()));
        assert!(diagnostic.expected.contains(&"AND".to_string()));
        assert!(diagnostic.expected.contains(&"end of input".to_string()));
    }

    #[test]
    fn test_unrecognized_input_is_lexical() {
        let diagnostics = parse_err("ROW a = 1 # 2");
        assert_eq!(diagnostics[0].kind, DiagnosticKind::Lexical);
        assert_eq!(diagnostics[0].found, "'#'");
        assert_eq!(diagnostics[0].range.start.column, 11);
    }

    #[test]
    fn test_empty_input() {
        let diagnostics = parse_err("  // nothing here");
        assert_eq!(diagnostics[0].found, "end of input");
    }

    #[test]
    fn test_tolerant_mode_reports_every_broken_command() {
        let options = ParseOptions::default().tolerant(true);
        let output = parse_with_diagnostics("FROM a | WHERE | LIMIT 5 | EVAL = 1", &options);
        assert_eq!(output.diagnostics.len(), 2);
        let query = output.query.expect("partial query");
        assert_eq!(names(&query), ["FROM", "<invalid>", "LIMIT", "<invalid>"]);
        assert_eq!(
            query.commands[2].kind,
            CommandKind::Invalid {
                text: "EVAL = 1".to_string()
            }
        );
    }

    #[test]
    fn test_tolerant_mode_resumes_after_empty_stage() {
        let options = ParseOptions::default().tolerant(true);
        let output = parse_with_diagnostics("FROM a | | LIMIT 1", &options);
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].kind, DiagnosticKind::Syntax);
        let query = output.query.expect("partial query");
        assert_eq!(names(&query), ["FROM", "<invalid>", "LIMIT"]);
    }

    #[test]
    fn test_tolerant_mode_resumes_after_empty_subquery_stage() {
        let options = ParseOptions::default().tolerant(true);
        let output = parse_with_diagnostics("EXPLAIN [FROM a | ] | LIMIT 1", &options);
        assert_eq!(output.diagnostics.len(), 1);
        let query = output.query.expect("partial query");
        assert_eq!(names(&query), ["EXPLAIN", "LIMIT"]);
        let CommandKind::Explain { subquery } = &query.source.kind else {
            panic!("expected EXPLAIN");
        };
        assert_eq!(names(subquery), ["FROM", "<invalid>"]);
    }

    #[test]
    fn test_tolerant_mode_still_stops_on_recursion_limit() {
        let options = ParseOptions::default().tolerant(true).with_max_depth(4);
        let output = parse_with_diagnostics("ROW a = ((((((1))))))", &options);
        assert!(output.query.is_none());
        assert!(output.diagnostics[0].is_fatal());
    }
}
