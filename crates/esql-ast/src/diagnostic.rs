//! Parse diagnostics handed back to callers

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{SourceRange, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// Input not recognized by the lexer in its current mode
    Lexical,
    /// A token that is not valid at its grammar position
    Syntax,
    /// Sub-query or expression nesting exceeded the configured bound
    RecursionLimit,
}

/// One reported problem, located both as a byte span and as line/column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// The offending lexeme, quoted, or `end of input`
    pub found: String,
    /// Human-readable descriptions of the tokens that would have been accepted
    pub expected: Vec<String>,
    pub span: Span,
    pub range: SourceRange,
}

impl Diagnostic {
    pub fn is_fatal(&self) -> bool {
        self.kind == DiagnosticKind::RecursionLimit
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}:{}: {}",
            self.range.start.line, self.range.start.column, self.message
        )
    }
}
