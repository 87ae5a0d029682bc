//! Pipeline commands

use serde::{Deserialize, Serialize};

use crate::{
    BooleanExpr, Constant, Identifier, PrimaryExpr, QualifiedName, QualifiedNamePattern, Query,
    Span, StringLiteral,
};

/// A source or processing command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub kind: CommandKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CommandKind {
    // === Source commands ===
    /// `FROM idx1, logs-* METADATA _id`
    From {
        indices: Vec<Identifier>,
        metadata: Option<Vec<Identifier>>,
    },
    /// `ROW a = 1, b = "x"`
    Row { fields: Vec<Field> },
    /// `SHOW INFO`, `SHOW FUNCTIONS`
    Show { kind: ShowKind },
    /// `EXPLAIN [FROM idx | LIMIT 1]`
    Explain { subquery: Box<Query> },

    // === Processing commands ===
    /// `EVAL x = a + 1`
    Eval { fields: Vec<Field> },
    /// `WHERE a > 1`
    Where { predicate: BooleanExpr },
    /// `LIMIT 10`
    Limit { count: u64 },
    /// `SORT a DESC NULLS LAST, b`
    Sort { order: Vec<OrderExpression> },
    /// `KEEP a, b.*` (also spelled `PROJECT`)
    Keep { patterns: Vec<QualifiedNamePattern> },
    /// `DROP a*`
    Drop { patterns: Vec<QualifiedNamePattern> },
    /// `RENAME a AS b`
    Rename { clauses: Vec<RenameClause> },
    /// `STATS count(*) BY host`
    Stats {
        aggs: Option<Vec<Field>>,
        group_by: Option<Vec<Field>>,
    },
    /// `INLINESTATS max(x) BY host`
    InlineStats {
        aggs: Vec<Field>,
        group_by: Option<Vec<Field>>,
    },
    /// `DISSECT message "%{a} %{b}" append_separator = "-"`
    Dissect {
        target: PrimaryExpr,
        pattern: StringLiteral,
        options: Vec<CommandOption>,
    },
    /// `GROK message "%{IP:ip}"`
    Grok {
        target: PrimaryExpr,
        pattern: StringLiteral,
    },
    /// `MV_EXPAND tags`
    MvExpand { name: QualifiedName },
    /// `ENRICH [ccq.mode:any] policy ON ip WITH name = host.name`
    Enrich {
        settings: Vec<Setting>,
        policy: PolicyName,
        match_field: Option<QualifiedNamePattern>,
        with: Option<Vec<EnrichWithClause>>,
    },

    /// Placeholder for a command that failed to parse in error-tolerant mode
    Invalid { text: String },
}

impl CommandKind {
    /// The command keyword, as written in canonical upper case
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::From { .. } => "FROM",
            CommandKind::Row { .. } => "ROW",
            CommandKind::Show { .. } => "SHOW",
            CommandKind::Explain { .. } => "EXPLAIN",
            CommandKind::Eval { .. } => "EVAL",
            CommandKind::Where { .. } => "WHERE",
            CommandKind::Limit { .. } => "LIMIT",
            CommandKind::Sort { .. } => "SORT",
            CommandKind::Keep { .. } => "KEEP",
            CommandKind::Drop { .. } => "DROP",
            CommandKind::Rename { .. } => "RENAME",
            CommandKind::Stats { .. } => "STATS",
            CommandKind::InlineStats { .. } => "INLINESTATS",
            CommandKind::Dissect { .. } => "DISSECT",
            CommandKind::Grok { .. } => "GROK",
            CommandKind::MvExpand { .. } => "MV_EXPAND",
            CommandKind::Enrich { .. } => "ENRICH",
            CommandKind::Invalid { .. } => "<invalid>",
        }
    }

    pub fn is_source(&self) -> bool {
        matches!(
            self,
            CommandKind::From { .. }
                | CommandKind::Row { .. }
                | CommandKind::Show { .. }
                | CommandKind::Explain { .. }
        )
    }
}

/// An expression, optionally assigned to a name: `x = a + 1` or `count(*)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: Option<QualifiedName>,
    pub value: BooleanExpr,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShowKind {
    Info,
    Functions,
}

/// One sort key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderExpression {
    pub expr: BooleanExpr,
    pub ordering: Option<Ordering>,
    pub nulls: Option<NullsOrdering>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ordering {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NullsOrdering {
    First,
    Last,
}

/// `old AS new`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenameClause {
    pub old_name: QualifiedNamePattern,
    pub new_name: QualifiedNamePattern,
    pub span: Span,
}

/// `name = constant`, a DISSECT option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOption {
    pub name: Identifier,
    pub value: Constant,
    pub span: Span,
}

/// `[name:value]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub name: String,
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyName {
    pub name: String,
    pub span: Span,
}

/// `enrich_field` or `new_name = enrich_field`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichWithClause {
    pub new_name: Option<QualifiedNamePattern>,
    pub enrich_field: QualifiedNamePattern,
    pub span: Span,
}
