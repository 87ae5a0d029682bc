//! Lexer modes and the mode stack
//!
//! Which words are keywords, which characters form identifiers and which
//! comments are skipped all depend on the command being lexed. The mode
//! stack tracks that context from the tokens themselves, so the lexer
//! never needs feedback from the parser.

use serde::Serialize;
use tracing::trace;

use crate::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Mode {
    /// Command position: start of a query or after `|`
    Default,
    /// After EXPLAIN, waiting for the bracketed sub-query
    Explain,
    /// Commands whose arguments are expressions (WHERE, EVAL, STATS, ...)
    Expression,
    /// FROM index names and METADATA
    From,
    /// KEEP, PROJECT and DROP name patterns
    Project,
    /// RENAME patterns and AS
    Rename,
    /// ENRICH policy name, ON and WITH
    Enrich,
    /// Match field and WITH clauses of ENRICH
    EnrichField,
    /// The MV_EXPAND field name
    MvExpand,
    /// INFO / FUNCTIONS after SHOW
    Show,
    /// Inside an ENRICH `[name:value]` setting
    Setting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    /// The bottom frame
    Root,
    /// Entered by a command keyword, left by `|`
    Command,
    /// Entered by `[`, left by the matching `]`
    Bracket,
    /// Fresh command position inside `EXPLAIN [ ... ]`
    Subquery,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    mode: Mode,
    origin: Origin,
}

/// Stack of active modes; the top frame decides how the next token is lexed
#[derive(Debug, Clone)]
pub struct ModeStack {
    frames: Vec<Frame>,
}

impl Default for ModeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeStack {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame {
                mode: Mode::Default,
                origin: Origin::Root,
            }],
        }
    }

    pub fn current(&self) -> Mode {
        self.frames.last().map_or(Mode::Default, |f| f.mode)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Update the stack after a token of `kind` was emitted in the current mode
    pub fn apply(&mut self, kind: TokenKind) {
        let mode = self.current();
        match (mode, kind) {
            (_, TokenKind::ClosingBracket) => self.close_bracket(),
            (Mode::Default, kind) => {
                if let Some(next) = command_mode(kind) {
                    self.push(next, Origin::Command);
                }
            }
            (Mode::Explain, TokenKind::OpeningBracket) => self.push(Mode::Default, Origin::Subquery),
            (Mode::Expression | Mode::From, TokenKind::OpeningBracket) => {
                self.push(mode, Origin::Bracket)
            }
            (Mode::Enrich, TokenKind::OpeningBracket) => self.push(Mode::Setting, Origin::Bracket),
            (Mode::Enrich, TokenKind::On | TokenKind::With) => {
                self.push(Mode::EnrichField, Origin::Command)
            }
            (_, TokenKind::Pipe) => self.end_command(),
            _ => return,
        }
        if self.current() != mode {
            trace!(from = ?mode, to = ?self.current(), depth = self.depth(), "lexer mode change");
        }
    }

    fn push(&mut self, mode: Mode, origin: Origin) {
        self.frames.push(Frame { mode, origin });
    }

    /// Back to the command position of the enclosing pipeline
    fn end_command(&mut self) {
        while self.frames.len() > 1 && self.current() != Mode::Default {
            self.frames.pop();
        }
    }

    /// Close the innermost bracket; outside one, `]` ends the innermost sub-query
    fn close_bracket(&mut self) {
        match self.frames.last().map(|f| f.origin) {
            Some(Origin::Bracket) => {
                self.frames.pop();
            }
            _ => {
                if let Some(index) = self
                    .frames
                    .iter()
                    .rposition(|f| f.origin == Origin::Subquery)
                {
                    self.frames.truncate(index);
                }
            }
        }
    }
}

/// The mode a command keyword switches to
fn command_mode(kind: TokenKind) -> Option<Mode> {
    let mode = match kind {
        TokenKind::Dissect
        | TokenKind::Eval
        | TokenKind::Grok
        | TokenKind::InlineStats
        | TokenKind::Limit
        | TokenKind::Row
        | TokenKind::Sort
        | TokenKind::Stats
        | TokenKind::Where
        | TokenKind::UnknownCommand => Mode::Expression,
        TokenKind::Keep | TokenKind::Project | TokenKind::Drop => Mode::Project,
        TokenKind::Rename => Mode::Rename,
        TokenKind::Enrich => Mode::Enrich,
        TokenKind::Explain => Mode::Explain,
        TokenKind::From => Mode::From,
        TokenKind::MvExpand => Mode::MvExpand,
        TokenKind::Show => Mode::Show,
        _ => return None,
    };
    Some(mode)
}
