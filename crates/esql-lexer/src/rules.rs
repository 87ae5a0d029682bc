//! Per-mode token rules
//!
//! Every mode is its own logos enum so keyword sets and identifier
//! character classes never leak between modes. Keywords match
//! ASCII-case-insensitively; whitespace and comments are skipped in every
//! mode.

use std::ops::Range;

use logos::Logos;

use crate::{Mode, TokenKind};

/// Lex the first token of `input` using the rules of `mode`
///
/// Returns `None` at end of input; unrecognized input becomes [`TokenKind::Unknown`].
pub(crate) fn next_token(mode: Mode, input: &str) -> Option<(TokenKind, Range<usize>)> {
    match mode {
        Mode::Default => lex_one::<CommandToken>(input),
        Mode::Explain => lex_one::<ExplainToken>(input),
        Mode::Expression => lex_one::<ExpressionToken>(input),
        Mode::From => lex_one::<FromToken>(input),
        Mode::Project => lex_one::<ProjectToken>(input),
        Mode::Rename => lex_one::<RenameToken>(input),
        Mode::Enrich => lex_one::<EnrichToken>(input),
        Mode::EnrichField => lex_one::<EnrichFieldToken>(input),
        Mode::MvExpand => lex_one::<MvExpandToken>(input),
        Mode::Show => lex_one::<ShowToken>(input),
        Mode::Setting => lex_one::<SettingToken>(input),
    }
}

fn lex_one<'s, T>(input: &'s str) -> Option<(TokenKind, Range<usize>)>
where
    T: Logos<'s, Source = str> + Into<TokenKind>,
    T::Extras: Default,
{
    let mut lexer = T::lexer(input);
    let kind = match lexer.next()? {
        Ok(token) => token.into(),
        Err(_) => TokenKind::Unknown,
    };
    Some((kind, lexer.span()))
}

/// Maps mode tokens onto the shared kind of the same name
macro_rules! into_kind {
    ($mode:ident { $($variant:ident),* $(,)? }) => {
        impl From<$mode> for TokenKind {
            fn from(token: $mode) -> Self {
                match token {
                    $($mode::$variant => TokenKind::$variant,)*
                }
            }
        }
    };
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\r\n]*")]
#[logos(skip r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
enum CommandToken {
    #[token("dissect", ignore(ascii_case))]
    Dissect,
    #[token("drop", ignore(ascii_case))]
    Drop,
    #[token("enrich", ignore(ascii_case))]
    Enrich,
    #[token("eval", ignore(ascii_case))]
    Eval,
    #[token("explain", ignore(ascii_case))]
    Explain,
    #[token("from", ignore(ascii_case))]
    From,
    #[token("grok", ignore(ascii_case))]
    Grok,
    #[token("inlinestats", ignore(ascii_case))]
    InlineStats,
    #[token("keep", ignore(ascii_case))]
    Keep,
    #[token("limit", ignore(ascii_case))]
    Limit,
    #[token("mv_expand", ignore(ascii_case))]
    MvExpand,
    #[token("project", ignore(ascii_case))]
    Project,
    #[token("rename", ignore(ascii_case))]
    Rename,
    #[token("row", ignore(ascii_case))]
    Row,
    #[token("show", ignore(ascii_case))]
    Show,
    #[token("sort", ignore(ascii_case))]
    Sort,
    #[token("stats", ignore(ascii_case))]
    Stats,
    #[token("where", ignore(ascii_case))]
    Where,
    #[token("|")]
    Pipe,
    #[token("]")]
    ClosingBracket,
    #[regex(r"[^ \t\r\n\f\[\]/|]+")]
    UnknownCommand,
}

into_kind!(CommandToken {
    Dissect, Drop, Enrich, Eval, Explain, From, Grok, InlineStats, Keep, Limit, MvExpand,
    Project, Rename, Row, Show, Sort, Stats, Where, Pipe, ClosingBracket, UnknownCommand,
});

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\r\n]*")]
#[logos(skip r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
enum ExplainToken {
    #[token("[")]
    OpeningBracket,
    #[token("]")]
    ClosingBracket,
    #[token("|")]
    Pipe,
}

into_kind!(ExplainToken { OpeningBracket, ClosingBracket, Pipe });

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\r\n]*")]
#[logos(skip r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
enum ExpressionToken {
    #[token("|")]
    Pipe,
    #[regex(r#""([^"\\\r\n]|\\.)*""#)]
    String,
    #[token("\"\"\"", block_string)]
    BlockString,
    #[regex(r"[0-9]+")]
    Integer,
    #[regex(r"[0-9]+\.[0-9]*|\.[0-9]+|[0-9]+(\.[0-9]*)?[eE][+-]?[0-9]+|\.[0-9]+[eE][+-]?[0-9]+")]
    Decimal,
    #[token("by", ignore(ascii_case))]
    By,
    #[token("and", ignore(ascii_case))]
    And,
    #[token("asc", ignore(ascii_case))]
    Asc,
    #[token("desc", ignore(ascii_case))]
    Desc,
    #[token("false", ignore(ascii_case))]
    False,
    #[token("first", ignore(ascii_case))]
    First,
    #[token("last", ignore(ascii_case))]
    Last,
    #[token("in", ignore(ascii_case))]
    In,
    #[token("is", ignore(ascii_case))]
    Is,
    #[token("like", ignore(ascii_case))]
    Like,
    #[token("not", ignore(ascii_case))]
    Not,
    #[token("null", ignore(ascii_case))]
    Null,
    #[token("nulls", ignore(ascii_case))]
    Nulls,
    #[token("or", ignore(ascii_case))]
    Or,
    #[token("rlike", ignore(ascii_case))]
    Rlike,
    #[token("true", ignore(ascii_case))]
    True,
    #[token("=")]
    Assign,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("[")]
    OpeningBracket,
    #[token("]")]
    ClosingBracket,
    #[token("?")]
    Param,
    #[token("==")]
    Eq,
    #[token("=~")]
    CiEq,
    #[token("!=")]
    Neq,
    #[token("<")]
    Lt,
    #[token("<=")]
    Lte,
    #[token(">")]
    Gt,
    #[token(">=")]
    Gte,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Asterisk,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[regex(r"[a-zA-Z][a-zA-Z0-9_]*|[_@][a-zA-Z0-9_@]+")]
    Identifier,
    #[regex(r"`([^`]|``)*`")]
    QuotedIdentifier,
}

/// `"""` opens a raw string that runs to the next `"""`
fn block_string(lex: &mut logos::Lexer<ExpressionToken>) -> bool {
    match lex.remainder().find("\"\"\"") {
        Some(end) => {
            lex.bump(end + 3);
            true
        }
        None => false,
    }
}

impl From<ExpressionToken> for TokenKind {
    fn from(token: ExpressionToken) -> Self {
        use ExpressionToken as E;
        match token {
            E::Pipe => TokenKind::Pipe,
            E::String | E::BlockString => TokenKind::String,
            E::Integer => TokenKind::Integer,
            E::Decimal => TokenKind::Decimal,
            E::By => TokenKind::By,
            E::And => TokenKind::And,
            E::Asc => TokenKind::Asc,
            E::Desc => TokenKind::Desc,
            E::False => TokenKind::False,
            E::First => TokenKind::First,
            E::Last => TokenKind::Last,
            E::In => TokenKind::In,
            E::Is => TokenKind::Is,
            E::Like => TokenKind::Like,
            E::Not => TokenKind::Not,
            E::Null => TokenKind::Null,
            E::Nulls => TokenKind::Nulls,
            E::Or => TokenKind::Or,
            E::Rlike => TokenKind::Rlike,
            E::True => TokenKind::True,
            E::Assign => TokenKind::Assign,
            E::Comma => TokenKind::Comma,
            E::Dot => TokenKind::Dot,
            E::LeftParen => TokenKind::LeftParen,
            E::RightParen => TokenKind::RightParen,
            E::OpeningBracket => TokenKind::OpeningBracket,
            E::ClosingBracket => TokenKind::ClosingBracket,
            E::Param => TokenKind::Param,
            E::Eq => TokenKind::Eq,
            E::CiEq => TokenKind::CiEq,
            E::Neq => TokenKind::Neq,
            E::Lt => TokenKind::Lt,
            E::Lte => TokenKind::Lte,
            E::Gt => TokenKind::Gt,
            E::Gte => TokenKind::Gte,
            E::Plus => TokenKind::Plus,
            E::Minus => TokenKind::Minus,
            E::Asterisk => TokenKind::Asterisk,
            E::Slash => TokenKind::Slash,
            E::Percent => TokenKind::Percent,
            E::Identifier => TokenKind::Identifier,
            E::QuotedIdentifier => TokenKind::QuotedIdentifier,
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\r\n]*")]
#[logos(skip r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
enum FromToken {
    #[token("|")]
    Pipe,
    #[token("[")]
    OpeningBracket,
    #[token("]")]
    ClosingBracket,
    #[token(",")]
    Comma,
    #[token("metadata", ignore(ascii_case))]
    Metadata,
    #[regex(r#"[^ \t\r\n\f`|,\[\]/="]+"#)]
    SourceIdentifier,
    #[regex(r"`([^`]|``)*`")]
    QuotedIdentifier,
}

into_kind!(FromToken {
    Pipe, OpeningBracket, ClosingBracket, Comma, Metadata, SourceIdentifier, QuotedIdentifier,
});

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\r\n]*")]
#[logos(skip r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
enum ProjectToken {
    #[token("|")]
    Pipe,
    #[token("]")]
    ClosingBracket,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[regex(r"[a-zA-Z*][a-zA-Z0-9_*]*|[_@][a-zA-Z0-9_@*]+")]
    IdentifierPattern,
    #[regex(r"`([^`]|``)*`")]
    QuotedIdentifier,
}

into_kind!(ProjectToken { Pipe, ClosingBracket, Comma, Dot, IdentifierPattern, QuotedIdentifier });

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\r\n]*")]
#[logos(skip r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
enum RenameToken {
    #[token("|")]
    Pipe,
    #[token("]")]
    ClosingBracket,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("as", ignore(ascii_case))]
    As,
    #[regex(r"[a-zA-Z*][a-zA-Z0-9_*]*|[_@][a-zA-Z0-9_@*]+")]
    IdentifierPattern,
    #[regex(r"`([^`]|``)*`")]
    QuotedIdentifier,
}

into_kind!(RenameToken {
    Pipe, ClosingBracket, Comma, Dot, As, IdentifierPattern, QuotedIdentifier,
});

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\r\n]*")]
#[logos(skip r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
enum EnrichToken {
    #[token("|")]
    Pipe,
    #[token("[")]
    OpeningBracket,
    #[token("]")]
    ClosingBracket,
    #[token("on", ignore(ascii_case))]
    On,
    #[token("with", ignore(ascii_case))]
    With,
    #[regex(r"[a-zA-Z0-9_.\-]+")]
    PolicyName,
}

into_kind!(EnrichToken { Pipe, OpeningBracket, ClosingBracket, On, With, PolicyName });

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\r\n]*")]
#[logos(skip r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
enum EnrichFieldToken {
    #[token("|")]
    Pipe,
    #[token("]")]
    ClosingBracket,
    #[token("=")]
    Assign,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("with", ignore(ascii_case))]
    With,
    #[regex(r"[a-zA-Z*][a-zA-Z0-9_*]*|[_@][a-zA-Z0-9_@*]+")]
    IdentifierPattern,
    #[regex(r"`([^`]|``)*`")]
    QuotedIdentifier,
}

into_kind!(EnrichFieldToken {
    Pipe, ClosingBracket, Assign, Comma, Dot, With, IdentifierPattern, QuotedIdentifier,
});

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\r\n]*")]
#[logos(skip r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
enum MvExpandToken {
    #[token("|")]
    Pipe,
    #[token("]")]
    ClosingBracket,
    #[token(".")]
    Dot,
    #[regex(r"[a-zA-Z][a-zA-Z0-9_]*|[_@][a-zA-Z0-9_@]+")]
    Identifier,
    #[regex(r"`([^`]|``)*`")]
    QuotedIdentifier,
}

into_kind!(MvExpandToken { Pipe, ClosingBracket, Dot, Identifier, QuotedIdentifier });

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\r\n]*")]
#[logos(skip r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
enum ShowToken {
    #[token("|")]
    Pipe,
    #[token("]")]
    ClosingBracket,
    #[token("info", ignore(ascii_case))]
    Info,
    #[token("functions", ignore(ascii_case))]
    Functions,
}

into_kind!(ShowToken { Pipe, ClosingBracket, Info, Functions });

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\r\n]*")]
#[logos(skip r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
enum SettingToken {
    #[token("]")]
    ClosingBracket,
    #[token(":")]
    Colon,
    #[regex(r"[a-zA-Z0-9_.@]+")]
    SettingText,
}

into_kind!(SettingToken { ClosingBracket, Colon, SettingText });
