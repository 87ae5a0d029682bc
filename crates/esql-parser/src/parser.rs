//! Parser core: token cursor, nesting guard and the command pipeline
//!
//! Every grammar decision is made from a bounded number of lookahead
//! tokens; the parser never backtracks. The set of token kinds tested at
//! the current position is accumulated so that errors can list every
//! alternative that would have been accepted there.

use std::collections::{BTreeSet, VecDeque};

use esql_ast::{Command, CommandKind, Query, Span};
use esql_lexer::{Lexer, Token, TokenKind};
use tracing::{debug, warn};

use crate::error::{describe_found, ParseError};
use crate::ParseOptions;

const SOURCE_COMMANDS: [TokenKind; 4] = [
    TokenKind::Explain,
    TokenKind::From,
    TokenKind::Row,
    TokenKind::Show,
];

const PROCESSING_COMMANDS: [TokenKind; 14] = [
    TokenKind::Dissect,
    TokenKind::Drop,
    TokenKind::Enrich,
    TokenKind::Eval,
    TokenKind::Grok,
    TokenKind::InlineStats,
    TokenKind::Keep,
    TokenKind::Limit,
    TokenKind::MvExpand,
    TokenKind::Project,
    TokenKind::Rename,
    TokenKind::Sort,
    TokenKind::Stats,
    TokenKind::Where,
];

pub struct Parser<'a> {
    source: &'a str,
    lexer: Lexer<'a>,
    lookahead: VecDeque<Token<'a>>,
    /// End offset of the last consumed token
    prev_end: usize,
    /// Kinds tested since the last consumed token
    expected: BTreeSet<TokenKind>,
    depth: usize,
    subqueries: usize,
    options: ParseOptions,
    /// Errors recovered from in tolerant mode
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, options: ParseOptions) -> Self {
        Self {
            source,
            lexer: Lexer::new(source),
            lookahead: VecDeque::new(),
            prev_end: 0,
            expected: BTreeSet::new(),
            depth: 0,
            subqueries: 0,
            options,
            errors: Vec::new(),
        }
    }

    /// Errors skipped over by tolerant parsing, in source order
    pub fn take_errors(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.errors)
    }

    // === Token cursor ===

    fn fill(&mut self, n: usize) {
        while self.lookahead.len() <= n {
            let token = self.lexer.next().unwrap_or(Token {
                kind: TokenKind::Eof,
                lexeme: "",
                span: Span::point(self.source.len()),
                mode: self.lexer.mode(),
            });
            self.lookahead.push_back(token);
        }
    }

    pub(crate) fn current(&mut self) -> Token<'a> {
        self.fill(0);
        self.lookahead[0]
    }

    pub(crate) fn peek(&mut self) -> TokenKind {
        self.current().kind
    }

    /// Kind of the token `n` positions ahead; does not count as a test
    pub(crate) fn peek_nth(&mut self, n: usize) -> TokenKind {
        self.fill(n);
        self.lookahead[n].kind
    }

    /// Start offset of the current token
    pub(crate) fn start(&mut self) -> usize {
        self.current().span.start
    }

    /// Span from `start` to the end of the last consumed token
    pub(crate) fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.prev_end.max(start))
    }

    pub(crate) fn advance(&mut self) -> Token<'a> {
        let token = self.current();
        if token.kind != TokenKind::Eof {
            self.lookahead.pop_front();
            self.prev_end = token.span.end;
            self.expected.clear();
        }
        token
    }

    /// Test the current token, remembering `kind` as an alternative
    pub(crate) fn at(&mut self, kind: TokenKind) -> bool {
        if self.peek() == kind {
            true
        } else {
            self.expected.insert(kind);
            false
        }
    }

    pub(crate) fn at_any(&mut self, kinds: &[TokenKind]) -> bool {
        kinds.iter().any(|kind| self.at(*kind))
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token<'a>, ParseError> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected())
        }
    }

    pub(crate) fn expect_any(&mut self, kinds: &[TokenKind]) -> Result<Token<'a>, ParseError> {
        if self.at_any(kinds) {
            Ok(self.advance())
        } else {
            Err(self.unexpected())
        }
    }

    /// Error at the current token listing every kind tested here
    pub(crate) fn unexpected(&mut self) -> ParseError {
        let token = self.current();
        ParseError::unexpected(&token, &self.expected)
    }

    /// Error at the current token after testing `kinds` without consuming
    pub(crate) fn unexpected_among(&mut self, kinds: &[TokenKind]) -> ParseError {
        self.expected.extend(kinds.iter().copied());
        self.unexpected()
    }

    /// Run `f` one nesting level deeper, failing once the configured limit is hit
    pub(crate) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= self.options.max_depth {
            let token = self.current();
            return Err(ParseError::RecursionLimit {
                limit: self.options.max_depth,
                found: describe_found(&token),
                span: token.span,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// `item (',' item)*`
    pub(crate) fn comma_separated<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let mut items = vec![item(self)?];
        while self.eat(TokenKind::Comma) {
            items.push(item(self)?);
        }
        Ok(items)
    }

    // === Pipeline ===

    /// singleStatement: query EOF
    pub fn parse_single_statement(&mut self) -> Result<Query, ParseError> {
        debug!(
            len = self.source.len(),
            tolerant = self.options.tolerant,
            "parsing query"
        );
        let query = self.parse_query()?;
        self.expect(TokenKind::Eof)?;
        debug!(commands = query.len(), "parsed query");
        Ok(query)
    }

    /// query: sourceCommand ('|' processingCommand)*
    pub(crate) fn parse_query(&mut self) -> Result<Query, ParseError> {
        let start = self.start();
        let source = self.command(Self::parse_source_command)?;
        let mut commands = Vec::new();
        while self.eat(TokenKind::Pipe) {
            commands.push(self.command(Self::parse_processing_command)?);
        }
        Ok(Query {
            source,
            commands,
            span: self.span_from(start),
        })
    }

    /// `EXPLAIN [ query ]` body: a nested pipeline closed by `]`
    pub(crate) fn parse_subquery(&mut self) -> Result<Query, ParseError> {
        self.nested(|p| {
            p.subqueries += 1;
            let query = p.parse_query();
            p.subqueries -= 1;
            query
        })
    }

    fn command(
        &mut self,
        parse: fn(&mut Self) -> Result<CommandKind, ParseError>,
    ) -> Result<Command, ParseError> {
        let start = self.start();
        let result = parse(self).and_then(|kind| self.expect_command_end().map(|()| kind));
        match result {
            Ok(kind) => {
                debug!(command = kind.name(), start, end = self.prev_end, "parsed command");
                Ok(Command {
                    kind,
                    span: self.span_from(start),
                })
            }
            Err(err) if !self.options.tolerant || err.is_fatal() => Err(err),
            Err(err) => {
                warn!(%err, "skipping malformed command");
                self.errors.push(err);
                self.synchronize();
                let span = self.span_from(start);
                Ok(Command {
                    kind: CommandKind::Invalid {
                        text: self.source[span.start..span.end].to_string(),
                    },
                    span,
                })
            }
        }
    }

    /// A command ends at `|`, at end of input, or at the `]` closing a sub-query
    fn expect_command_end(&mut self) -> Result<(), ParseError> {
        if self.at_command_end() {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    pub(crate) fn at_command_end(&mut self) -> bool {
        let closing = if self.subqueries > 0 {
            TokenKind::ClosingBracket
        } else {
            TokenKind::Eof
        };
        self.at(TokenKind::Pipe) || self.at(closing)
    }

    /// Skip to the next command boundary after an error
    fn synchronize(&mut self) {
        self.expected.clear();
        let mut brackets = 0usize;
        loop {
            match self.peek() {
                TokenKind::Eof => return,
                TokenKind::Pipe if brackets == 0 => return,
                TokenKind::OpeningBracket => brackets += 1,
                TokenKind::ClosingBracket if brackets > 0 => brackets -= 1,
                TokenKind::ClosingBracket if self.subqueries > 0 => return,
                _ => {}
            }
            self.advance();
        }
    }

    fn parse_source_command(&mut self) -> Result<CommandKind, ParseError> {
        match self.peek() {
            TokenKind::Explain => self.parse_explain(),
            TokenKind::From => self.parse_from(),
            TokenKind::Row => self.parse_row(),
            TokenKind::Show => self.parse_show(),
            _ => Err(self.unexpected_among(&SOURCE_COMMANDS)),
        }
    }

    fn parse_processing_command(&mut self) -> Result<CommandKind, ParseError> {
        match self.peek() {
            TokenKind::Dissect => self.parse_dissect(),
            TokenKind::Drop => self.parse_drop(),
            TokenKind::Enrich => self.parse_enrich(),
            TokenKind::Eval => self.parse_eval(),
            TokenKind::Grok => self.parse_grok(),
            TokenKind::InlineStats => self.parse_inline_stats(),
            TokenKind::Keep | TokenKind::Project => self.parse_keep(),
            TokenKind::Limit => self.parse_limit(),
            TokenKind::MvExpand => self.parse_mv_expand(),
            TokenKind::Rename => self.parse_rename(),
            TokenKind::Sort => self.parse_sort(),
            TokenKind::Stats => self.parse_stats(),
            TokenKind::Where => self.parse_where(),
            _ => Err(self.unexpected_among(&PROCESSING_COMMANDS)),
        }
    }
}
