//! Expression AST nodes
//!
//! One tagged union per grammar layer, loosest binding first:
//! [`BooleanExpr`] > [`ValueExpr`] > [`OperatorExpr`] > [`PrimaryExpr`].

use serde::{Deserialize, Serialize};

use crate::{Constant, Identifier, QualifiedName, Span, StringLiteral};

/// A boolean expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooleanExpr {
    pub kind: BooleanExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BooleanExprKind {
    /// `NOT expr`
    Not(Box<BooleanExpr>),

    /// A value expression used as a boolean
    Value(ValueExpr),

    /// `value [NOT] LIKE "pattern"`, `value [NOT] RLIKE "pattern"`
    Regex {
        value: ValueExpr,
        kind: RegexKind,
        negated: bool,
        pattern: StringLiteral,
    },

    /// `value [NOT] IN (a, b, c)`
    In {
        value: ValueExpr,
        negated: bool,
        list: Vec<ValueExpr>,
    },

    /// `value IS [NOT] NULL`
    IsNull { value: ValueExpr, negated: bool },

    /// `a AND b`, `a OR b`
    Logical {
        op: LogicalOp,
        left: Box<BooleanExpr>,
        right: Box<BooleanExpr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegexKind {
    Like,
    Rlike,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOp {
    And,
    Or,
}

/// An operator expression, optionally compared with another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueExpr {
    pub kind: ValueExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValueExprKind {
    Operator(OperatorExpr),
    /// `left op right`; comparisons do not chain
    Comparison {
        op: ComparisonOp,
        left: OperatorExpr,
        right: OperatorExpr,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOp {
    /// `==`
    Eq,
    /// `=~`, case-insensitive equality
    CaseInsensitiveEq,
    /// `!=`
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

/// Arithmetic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorExpr {
    pub kind: OperatorExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OperatorExprKind {
    Primary(PrimaryExpr),
    /// `-x`, `+x`
    Unary {
        op: UnaryOp,
        operand: Box<OperatorExpr>,
    },
    /// `a + b`, `a * b`, ...
    Binary {
        op: ArithmeticOp,
        left: Box<OperatorExpr>,
        right: Box<OperatorExpr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryExpr {
    pub kind: PrimaryExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PrimaryExprKind {
    /// Literal value: `42`, `"text"`, `[1, 2]`
    Constant(Constant),

    /// Field reference: `host.name`
    Dereference(QualifiedName),

    /// Function call: `count(*)`, `round(x, 2)`
    Function(FunctionCall),

    /// `(expr)`
    Parenthesized(Box<BooleanExpr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: Identifier,
    pub args: FunctionArgs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FunctionArgs {
    /// `f(*)`
    Star,
    /// `f()`, `f(a, b)`
    List(Vec<BooleanExpr>),
}

impl ComparisonOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "==",
            ComparisonOp::CaseInsensitiveEq => "=~",
            ComparisonOp::Neq => "!=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Lte => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Gte => ">=",
        }
    }
}

impl ArithmeticOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Sub => "-",
            ArithmeticOp::Mul => "*",
            ArithmeticOp::Div => "/",
            ArithmeticOp::Mod => "%",
        }
    }
}

impl BooleanExpr {
    /// The value expression this boolean expression directly wraps, if any
    pub fn as_value(&self) -> Option<&ValueExpr> {
        match &self.kind {
            BooleanExprKind::Value(value) => Some(value),
            _ => None,
        }
    }
}

impl ValueExpr {
    /// The operator expression this value directly wraps, if it is not a comparison
    pub fn as_operator(&self) -> Option<&OperatorExpr> {
        match &self.kind {
            ValueExprKind::Operator(op) => Some(op),
            ValueExprKind::Comparison { .. } => None,
        }
    }
}

impl OperatorExpr {
    pub fn as_primary(&self) -> Option<&PrimaryExpr> {
        match &self.kind {
            OperatorExprKind::Primary(primary) => Some(primary),
            _ => None,
        }
    }
}
