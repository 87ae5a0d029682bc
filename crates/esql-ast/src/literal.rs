//! Literal constants

use serde::{Deserialize, Serialize};

use crate::Span;

/// A literal constant with its source span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constant {
    pub kind: Literal,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// `null`
    Null,
    /// `42`; integers that overflow `i64` are kept as [`Literal::Decimal`]
    Integer(i64),
    /// `1.5`, `.5`, `1e3`
    Decimal(f64),
    /// An integer followed by a unit: `1 day`, `15 minutes`
    QualifiedInteger { value: i64, unit: String },
    /// `true` / `false`
    Boolean(bool),
    /// `?` placeholder, bound by the caller
    Param,
    /// `"text"` or `"""text"""`, already unescaped
    String(String),
    /// `[1, 2.5, -3]`
    NumericArray(Vec<Number>),
    /// `[true, false]`
    BooleanArray(Vec<bool>),
    /// `["a", "b"]`
    StringArray(Vec<String>),
}

/// An element of a numeric array literal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Number {
    Integer(i64),
    Decimal(f64),
}

impl Literal {
    /// Name of the literal kind, as used in messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Null => "null",
            Literal::Integer(_) => "integer",
            Literal::Decimal(_) => "decimal",
            Literal::QualifiedInteger { .. } => "time interval",
            Literal::Boolean(_) => "boolean",
            Literal::Param => "parameter",
            Literal::String(_) => "string",
            Literal::NumericArray(_) => "numeric array",
            Literal::BooleanArray(_) => "boolean array",
            Literal::StringArray(_) => "string array",
        }
    }
}

/// A string literal with its source span
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringLiteral {
    pub value: String,
    pub span: Span,
}
