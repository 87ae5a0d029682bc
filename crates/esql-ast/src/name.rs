//! Identifiers, dotted field names and name patterns

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Span;

/// A single identifier segment
///
/// Back-quoted identifiers are stored unquoted, with doubled back-quotes
/// collapsed, and flagged with `quoted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub quoted: bool,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: impl Into<String>, quoted: bool, span: Span) -> Self {
        Self {
            name: name.into(),
            quoted,
            span,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A dotted field reference: `host.os.name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualifiedName {
    /// Never empty
    pub parts: Vec<Identifier>,
    pub span: Span,
}

impl QualifiedName {
    /// The segments joined with `.`
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_dotted(f, self.parts.iter().map(|p| p.name.as_str()))
    }
}

/// One segment of a name pattern, possibly containing `*` wildcards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierPattern {
    pub pattern: String,
    pub quoted: bool,
    pub span: Span,
}

impl IdentifierPattern {
    /// Quoted segments are always literal
    pub fn has_wildcard(&self) -> bool {
        !self.quoted && self.pattern.contains('*')
    }
}

/// A dotted name pattern used by KEEP, DROP, RENAME and ENRICH: `host.*`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualifiedNamePattern {
    /// Never empty
    pub parts: Vec<IdentifierPattern>,
    pub span: Span,
}

impl QualifiedNamePattern {
    pub fn pattern(&self) -> String {
        self.to_string()
    }

    pub fn has_wildcard(&self) -> bool {
        self.parts.iter().any(IdentifierPattern::has_wildcard)
    }
}

impl fmt::Display for QualifiedNamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_dotted(f, self.parts.iter().map(|p| p.pattern.as_str()))
    }
}

fn write_dotted<'a>(
    f: &mut fmt::Formatter<'_>,
    parts: impl Iterator<Item = &'a str>,
) -> fmt::Result {
    for (i, part) in parts.enumerate() {
        if i > 0 {
            f.write_str(".")?;
        }
        f.write_str(part)?;
    }
    Ok(())
}
