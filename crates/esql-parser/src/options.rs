//! Parser configuration

use serde::{Deserialize, Serialize};

/// Nesting allowed by default: EXPLAIN sub-queries plus parentheses,
/// NOT / sign chains and function arguments, counted together
pub const DEFAULT_MAX_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Exceeding this depth aborts the parse with a recursion-limit error
    pub max_depth: usize,
    /// Report every broken command instead of stopping at the first error
    pub tolerant: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            tolerant: false,
        }
    }
}

impl ParseOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn tolerant(mut self, tolerant: bool) -> Self {
        self.tolerant = tolerant;
        self
    }
}
