//! ES|QL AST - Core types for the abstract syntax tree
//!
//! This crate defines the query, command and expression nodes produced by
//! the parser, spans for source locations, and the diagnostics model.
//! Every node owns its children; trees are never shared or mutated after
//! construction.

mod span;
mod name;
mod literal;
mod expr;
mod command;
mod diagnostic;

pub use span::*;
pub use name::*;
pub use literal::*;
pub use expr::*;
pub use command::*;
pub use diagnostic::*;

use serde::{Deserialize, Serialize};

/// A complete query: one source command followed by piped processing commands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// FROM, ROW, SHOW or EXPLAIN
    pub source: Command,
    /// Processing commands in pipeline order
    pub commands: Vec<Command>,
    pub span: Span,
}

impl Query {
    /// All commands in pipeline order, source first
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        std::iter::once(&self.source).chain(self.commands.iter())
    }

    /// Number of commands, including the source command
    pub fn len(&self) -> usize {
        1 + self.commands.len()
    }

    /// Always false: a query holds at least its source command
    pub fn is_empty(&self) -> bool {
        false
    }
}
