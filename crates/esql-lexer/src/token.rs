//! Token kinds shared by every lexer mode

use serde::Serialize;

/// Terminal symbols seen by the parser
///
/// Each lexer mode recognizes a subset of these; the same kind may be
/// produced by several modes (`|` is a [`TokenKind::Pipe`] everywhere).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TokenKind {
    // === Command keywords ===
    Dissect,
    Drop,
    Enrich,
    Eval,
    Explain,
    From,
    Grok,
    InlineStats,
    Keep,
    Limit,
    MvExpand,
    Project,
    Rename,
    Row,
    Show,
    Sort,
    Stats,
    Where,
    /// Any other word in command position
    UnknownCommand,

    // === Delimiters ===
    Pipe,
    Comma,
    Dot,
    Assign,
    Colon,
    LeftParen,
    RightParen,
    OpeningBracket,
    ClosingBracket,

    // === Literals ===
    String,
    Integer,
    Decimal,
    Param,

    // === Expression keywords ===
    And,
    Asc,
    By,
    Desc,
    False,
    First,
    In,
    Is,
    Last,
    Like,
    Not,
    Null,
    Nulls,
    Or,
    Rlike,
    True,

    // === Operators ===
    Eq,
    CiEq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    Plus,
    Minus,
    Asterisk,
    Slash,
    Percent,

    // === Mode-specific keywords ===
    Metadata,
    As,
    On,
    With,
    Info,
    Functions,

    // === Identifiers ===
    Identifier,
    QuotedIdentifier,
    IdentifierPattern,
    SourceIdentifier,
    PolicyName,
    SettingText,

    // === Special ===
    /// Input the current mode does not recognize
    Unknown,
    Eof,
}

impl TokenKind {
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Dissect => "DISSECT",
            TokenKind::Drop => "DROP",
            TokenKind::Enrich => "ENRICH",
            TokenKind::Eval => "EVAL",
            TokenKind::Explain => "EXPLAIN",
            TokenKind::From => "FROM",
            TokenKind::Grok => "GROK",
            TokenKind::InlineStats => "INLINESTATS",
            TokenKind::Keep => "KEEP",
            TokenKind::Limit => "LIMIT",
            TokenKind::MvExpand => "MV_EXPAND",
            TokenKind::Project => "PROJECT",
            TokenKind::Rename => "RENAME",
            TokenKind::Row => "ROW",
            TokenKind::Show => "SHOW",
            TokenKind::Sort => "SORT",
            TokenKind::Stats => "STATS",
            TokenKind::Where => "WHERE",
            TokenKind::UnknownCommand => "unknown command",
            TokenKind::Pipe => "'|'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Assign => "'='",
            TokenKind::Colon => "':'",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::OpeningBracket => "'['",
            TokenKind::ClosingBracket => "']'",
            TokenKind::String => "string",
            TokenKind::Integer => "integer",
            TokenKind::Decimal => "decimal",
            TokenKind::Param => "'?'",
            TokenKind::And => "AND",
            TokenKind::Asc => "ASC",
            TokenKind::By => "BY",
            TokenKind::Desc => "DESC",
            TokenKind::False => "FALSE",
            TokenKind::First => "FIRST",
            TokenKind::In => "IN",
            TokenKind::Is => "IS",
            TokenKind::Last => "LAST",
            TokenKind::Like => "LIKE",
            TokenKind::Not => "NOT",
            TokenKind::Null => "NULL",
            TokenKind::Nulls => "NULLS",
            TokenKind::Or => "OR",
            TokenKind::Rlike => "RLIKE",
            TokenKind::True => "TRUE",
            TokenKind::Eq => "'=='",
            TokenKind::CiEq => "'=~'",
            TokenKind::Neq => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::Lte => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::Gte => "'>='",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Asterisk => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::Metadata => "METADATA",
            TokenKind::As => "AS",
            TokenKind::On => "ON",
            TokenKind::With => "WITH",
            TokenKind::Info => "INFO",
            TokenKind::Functions => "FUNCTIONS",
            TokenKind::Identifier => "identifier",
            TokenKind::QuotedIdentifier => "quoted identifier",
            TokenKind::IdentifierPattern => "identifier pattern",
            TokenKind::SourceIdentifier => "index name",
            TokenKind::PolicyName => "policy name",
            TokenKind::SettingText => "setting",
            TokenKind::Unknown => "unrecognized input",
            TokenKind::Eof => "end of input",
        }
    }
}
