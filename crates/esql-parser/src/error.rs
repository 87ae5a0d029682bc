//! Parser error types

use esql_ast::{Diagnostic, DiagnosticKind, LineIndex, Span};
use esql_lexer::{Token, TokenKind};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unrecognized input {found}{}", expecting(.expected))]
    Lexical {
        found: String,
        expected: Vec<String>,
        span: Span,
    },

    #[error("unexpected {found}{}", expecting(.expected))]
    UnexpectedToken {
        found: String,
        expected: Vec<String>,
        span: Span,
    },

    #[error("{message}: {found}")]
    InvalidLiteral {
        message: String,
        found: String,
        span: Span,
    },

    #[error("maximum nesting depth of {limit} exceeded at {found}")]
    RecursionLimit {
        limit: usize,
        found: String,
        span: Span,
    },
}

fn expecting(expected: &[String]) -> String {
    match expected {
        [] => String::new(),
        [one] => format!(", expected {one}"),
        many => format!(", expected one of {}", many.join(", ")),
    }
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::Lexical { span, .. } => *span,
            ParseError::UnexpectedToken { span, .. } => *span,
            ParseError::InvalidLiteral { span, .. } => *span,
            ParseError::RecursionLimit { span, .. } => *span,
        }
    }

    pub fn found(&self) -> &str {
        match self {
            ParseError::Lexical { found, .. }
            | ParseError::UnexpectedToken { found, .. }
            | ParseError::InvalidLiteral { found, .. }
            | ParseError::RecursionLimit { found, .. } => found,
        }
    }

    pub fn expected(&self) -> &[String] {
        match self {
            ParseError::Lexical { expected, .. } | ParseError::UnexpectedToken { expected, .. } => {
                expected
            }
            ParseError::InvalidLiteral { .. } | ParseError::RecursionLimit { .. } => &[],
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        match self {
            ParseError::Lexical { .. } => DiagnosticKind::Lexical,
            ParseError::UnexpectedToken { .. } | ParseError::InvalidLiteral { .. } => {
                DiagnosticKind::Syntax
            }
            ParseError::RecursionLimit { .. } => DiagnosticKind::RecursionLimit,
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, ParseError::RecursionLimit { .. })
    }

    /// Build the unexpected-token error for `token`; unknown input is lexical
    pub fn unexpected<'a>(
        token: &Token<'_>,
        expected: impl IntoIterator<Item = &'a TokenKind>,
    ) -> Self {
        let found = describe_found(token);
        let expected = expected.into_iter().map(|k| k.describe().to_string()).collect();
        let span = token.span;
        if token.kind == TokenKind::Unknown {
            ParseError::Lexical {
                found,
                expected,
                span,
            }
        } else {
            ParseError::UnexpectedToken {
                found,
                expected,
                span,
            }
        }
    }

    pub fn to_diagnostic(&self, index: &LineIndex<'_>) -> Diagnostic {
        Diagnostic {
            kind: self.kind(),
            message: self.to_string(),
            found: self.found().to_string(),
            expected: self.expected().to_vec(),
            span: self.span(),
            range: index.range(self.span()),
        }
    }
}

/// The token as shown in messages: its quoted text, or `end of input`
pub(crate) fn describe_found(token: &Token<'_>) -> String {
    match token.kind {
        TokenKind::Eof => TokenKind::Eof.describe().to_string(),
        _ => format!("'{}'", token.lexeme),
    }
}
