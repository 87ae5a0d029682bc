//! ES|QL Lexer - Mode-switching tokenization using logos
//!
//! The language reserves many words only inside particular commands:
//! `AS` is a keyword after RENAME but an ordinary field name after EVAL,
//! `METADATA` only after FROM, `ON`/`WITH` only after ENRICH. The lexer
//! therefore runs a stack of modes (see [`ModeStack`]) driven by the
//! tokens it emits, and lexes each token with the rules of the top mode.

mod mode;
mod rules;
mod token;

pub use mode::*;
pub use token::*;

use esql_ast::Span;
use serde::Serialize;

/// A token with its text, span and the mode it was lexed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: &'a str,
    pub span: Span,
    pub mode: Mode,
}

/// Lazy token stream over one query text
///
/// Yields a single [`TokenKind::Eof`] token after the input is exhausted,
/// then stops.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    modes: ModeStack,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            modes: ModeStack::new(),
            finished: false,
        }
    }

    /// The mode the next token will be lexed in
    pub fn mode(&self) -> Mode {
        self.modes.current()
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.finished {
            return None;
        }

        let mode = self.modes.current();
        let rest = &self.source[self.pos..];
        let Some((kind, range)) = rules::next_token(mode, rest) else {
            self.finished = true;
            let end = self.source.len();
            return Some(Token {
                kind: TokenKind::Eof,
                lexeme: "",
                span: Span::point(end),
                mode,
            });
        };

        let start = self.pos + range.start;
        // Always make progress, and never split a UTF-8 sequence
        let mut end = (self.pos + range.end).max(start + 1);
        while !self.source.is_char_boundary(end) {
            end += 1;
        }
        self.pos = end;
        self.modes.apply(kind);

        Some(Token {
            kind,
            lexeme: &self.source[start..end],
            span: Span::new(start, end),
            mode,
        })
    }
}

/// Tokenize a query into a vector of tokens, ending with [`TokenKind::Eof`]
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    Lexer::new(source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_basic_tokens() {
        let tokens = tokenize("from idx | where x > 1");
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            [
                TokenKind::From,
                TokenKind::SourceIdentifier,
                TokenKind::Pipe,
                TokenKind::Where,
                TokenKind::Identifier,
                TokenKind::Gt,
                TokenKind::Integer,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[1].lexeme, "idx");
        assert_eq!(tokens[1].mode, Mode::From);
        assert_eq!(tokens[3].mode, Mode::Default);
    }

    #[test]
    fn test_as_is_keyword_only_in_rename() {
        assert_eq!(
            kinds("ROW a = 1 | RENAME a AS b"),
            [
                TokenKind::Row,
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::Integer,
                TokenKind::Pipe,
                TokenKind::Rename,
                TokenKind::IdentifierPattern,
                TokenKind::As,
                TokenKind::IdentifierPattern,
                TokenKind::Eof,
            ]
        );
        assert_eq!(kinds("ROW as = 1")[1], TokenKind::Identifier);
    }

    #[test]
    fn test_index_patterns_in_from() {
        let tokens = tokenize("FROM logs-*, remote:metrics-2024.01 METADATA _id");
        assert_eq!(tokens[1].kind, TokenKind::SourceIdentifier);
        assert_eq!(tokens[1].lexeme, "logs-*");
        assert_eq!(tokens[3].lexeme, "remote:metrics-2024.01");
        assert_eq!(tokens[4].kind, TokenKind::Metadata);
        assert_eq!(tokens[5].kind, TokenKind::SourceIdentifier);
    }

    #[test]
    fn test_wildcards_in_keep() {
        let tokens = tokenize("KEEP host.*, *_count");
        assert_eq!(tokens[1].kind, TokenKind::IdentifierPattern);
        assert_eq!(tokens[2].kind, TokenKind::Dot);
        assert_eq!(tokens[3].lexeme, "*");
        assert_eq!(tokens[5].lexeme, "*_count");
    }

    #[test]
    fn test_explain_pushes_fresh_command_mode() {
        let tokens = tokenize("EXPLAIN [ FROM a | WHERE b ] | LIMIT 1");
        let modes: Vec<_> = tokens.iter().map(|t| (t.kind, t.mode)).collect();
        assert_eq!(
            modes,
            [
                (TokenKind::Explain, Mode::Default),
                (TokenKind::OpeningBracket, Mode::Explain),
                (TokenKind::From, Mode::Default),
                (TokenKind::SourceIdentifier, Mode::From),
                (TokenKind::Pipe, Mode::From),
                (TokenKind::Where, Mode::Default),
                (TokenKind::Identifier, Mode::Expression),
                (TokenKind::ClosingBracket, Mode::Expression),
                (TokenKind::Pipe, Mode::Explain),
                (TokenKind::Limit, Mode::Default),
                (TokenKind::Integer, Mode::Expression),
                (TokenKind::Eof, Mode::Expression),
            ]
        );
    }

    #[test]
    fn test_nested_explain_closes_each_subquery() {
        let tokens = tokenize("EXPLAIN [ EXPLAIN [ ROW a = 1 ] ] | LIMIT 1");
        let modes: Vec<_> = tokens.iter().map(|t| (t.kind, t.mode)).collect();
        assert_eq!(
            modes,
            [
                (TokenKind::Explain, Mode::Default),
                (TokenKind::OpeningBracket, Mode::Explain),
                (TokenKind::Explain, Mode::Default),
                (TokenKind::OpeningBracket, Mode::Explain),
                (TokenKind::Row, Mode::Default),
                (TokenKind::Identifier, Mode::Expression),
                (TokenKind::Assign, Mode::Expression),
                (TokenKind::Integer, Mode::Expression),
                (TokenKind::ClosingBracket, Mode::Expression),
                (TokenKind::ClosingBracket, Mode::Explain),
                (TokenKind::Pipe, Mode::Explain),
                (TokenKind::Limit, Mode::Default),
                (TokenKind::Integer, Mode::Expression),
                (TokenKind::Eof, Mode::Expression),
            ]
        );
    }

    #[test]
    fn test_empty_stage_lexes_as_pipe() {
        assert_eq!(
            kinds("FROM a | | LIMIT 1"),
            [
                TokenKind::From,
                TokenKind::SourceIdentifier,
                TokenKind::Pipe,
                TokenKind::Pipe,
                TokenKind::Limit,
                TokenKind::Integer,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_block_comments_between_tokens() {
        assert_eq!(
            kinds("ROW a = 1 /* c */ | /* d **/ LIMIT /**/ 2"),
            [
                TokenKind::Row,
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::Integer,
                TokenKind::Pipe,
                TokenKind::Limit,
                TokenKind::Integer,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_enrich_modes() {
        assert_eq!(
            kinds("ENRICH [ccq.mode:any] langs ON code WITH name = lang"),
            [
                TokenKind::Enrich,
                TokenKind::OpeningBracket,
                TokenKind::SettingText,
                TokenKind::Colon,
                TokenKind::SettingText,
                TokenKind::ClosingBracket,
                TokenKind::PolicyName,
                TokenKind::On,
                TokenKind::IdentifierPattern,
                TokenKind::With,
                TokenKind::IdentifierPattern,
                TokenKind::Assign,
                TokenKind::IdentifierPattern,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_show_keywords() {
        assert_eq!(
            kinds("show functions"),
            [TokenKind::Show, TokenKind::Functions, TokenKind::Eof]
        );
        // `info` is an ordinary identifier in expressions
        assert_eq!(kinds("EVAL info = 1")[1], TokenKind::Identifier);
    }

    #[test]
    fn test_unknown_input_does_not_stop_lexing() {
        let tokens = tokenize("WHERE a # b");
        assert_eq!(tokens[2].kind, TokenKind::Unknown);
        assert_eq!(tokens[2].lexeme, "#");
        assert_eq!(tokens[3].kind, TokenKind::Identifier);
    }

    #[test]
    fn test_multibyte_unknown_character() {
        let tokens = tokenize("WHERE a € b");
        assert_eq!(tokens[2].kind, TokenKind::Unknown);
        assert_eq!(tokens[2].lexeme, "€");
        assert_eq!(tokens[3].lexeme, "b");
    }

    #[test]
    fn test_unknown_command_switches_to_expressions() {
        assert_eq!(
            kinds("FROM a | FOO b"),
            [
                TokenKind::From,
                TokenKind::SourceIdentifier,
                TokenKind::Pipe,
                TokenKind::UnknownCommand,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lexer_is_finite() {
        let mut lexer = Lexer::new("");
        assert_eq!(lexer.next().map(|t| t.kind), Some(TokenKind::Eof));
        assert_eq!(lexer.next(), None);
    }
}
