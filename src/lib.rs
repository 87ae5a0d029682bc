//! ES|QL - Parser for the piped ES|QL query language
//!
//! This is the root workspace crate that provides integration tests.
//! The actual implementation is in the workspace member crates.

// Re-export main crates for convenience
pub use esql_ast as ast;
pub use esql_lexer as lexer;
pub use esql_parser as parser;

pub use esql_parser::{parse, parse_with_diagnostics, ParseOptions, ParseOutput};
