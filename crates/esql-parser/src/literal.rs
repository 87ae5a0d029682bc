//! Constants: numbers, strings, booleans, parameters and array literals

use esql_ast::{Constant, Literal, Number, StringLiteral};
use esql_lexer::{Token, TokenKind};

use crate::error::{describe_found, ParseError};
use crate::parser::Parser;

const CONSTANT_START: [TokenKind; 8] = [
    TokenKind::Null,
    TokenKind::Integer,
    TokenKind::Decimal,
    TokenKind::True,
    TokenKind::False,
    TokenKind::Param,
    TokenKind::String,
    TokenKind::OpeningBracket,
];

impl<'a> Parser<'a> {
    pub(crate) fn parse_constant(&mut self) -> Result<Constant, ParseError> {
        let start = self.start();
        let kind = match self.peek() {
            TokenKind::Null => {
                self.advance();
                Literal::Null
            }
            TokenKind::Param => {
                self.advance();
                Literal::Param
            }
            TokenKind::True | TokenKind::False => Literal::Boolean(self.parse_boolean_value()?),
            TokenKind::String => Literal::String(self.parse_string()?.value),
            // `1 day`: an integer directly followed by a unit
            TokenKind::Integer if self.peek_nth(1) == TokenKind::Identifier => {
                let token = self.advance();
                let value = token.lexeme.parse::<i64>().map_err(|_| ParseError::InvalidLiteral {
                    message: "qualified integer out of range".to_string(),
                    found: describe_found(&token),
                    span: token.span,
                })?;
                let unit = self.advance().lexeme.to_string();
                Literal::QualifiedInteger { value, unit }
            }
            TokenKind::Integer | TokenKind::Decimal => match self.parse_number(false)? {
                Number::Integer(value) => Literal::Integer(value),
                Number::Decimal(value) => Literal::Decimal(value),
            },
            TokenKind::OpeningBracket => self.parse_array_literal()?,
            _ => return Err(self.unexpected_among(&CONSTANT_START)),
        };
        Ok(Constant {
            kind,
            span: self.span_from(start),
        })
    }

    /// A constant where numbers may carry a leading sign
    pub(crate) fn parse_signed_constant(&mut self) -> Result<Constant, ParseError> {
        if self.at(TokenKind::Plus) || self.at(TokenKind::Minus) {
            let start = self.start();
            let kind = match self.parse_number(true)? {
                Number::Integer(value) => Literal::Integer(value),
                Number::Decimal(value) => Literal::Decimal(value),
            };
            Ok(Constant {
                kind,
                span: self.span_from(start),
            })
        } else {
            self.parse_constant()
        }
    }

    /// '[' element (',' element)* ']' where every element has the kind of the first
    fn parse_array_literal(&mut self) -> Result<Literal, ParseError> {
        self.expect(TokenKind::OpeningBracket)?;
        let literal = match self.peek() {
            TokenKind::True | TokenKind::False => {
                Literal::BooleanArray(self.comma_separated(Self::parse_boolean_value)?)
            }
            TokenKind::String => Literal::StringArray(
                self.comma_separated(|p| p.parse_string().map(|s| s.value))?,
            ),
            TokenKind::Integer | TokenKind::Decimal | TokenKind::Plus | TokenKind::Minus => {
                Literal::NumericArray(self.comma_separated(|p| p.parse_number(true))?)
            }
            _ => {
                return Err(self.unexpected_among(&[
                    TokenKind::True,
                    TokenKind::False,
                    TokenKind::String,
                    TokenKind::Integer,
                    TokenKind::Decimal,
                    TokenKind::Plus,
                    TokenKind::Minus,
                ]))
            }
        };
        self.expect(TokenKind::ClosingBracket)?;
        Ok(literal)
    }

    fn parse_boolean_value(&mut self) -> Result<bool, ParseError> {
        Ok(self.expect_any(&[TokenKind::True, TokenKind::False])?.kind == TokenKind::True)
    }

    /// ('+' | '-')? (INTEGER | DECIMAL) when `signed`
    fn parse_number(&mut self, signed: bool) -> Result<Number, ParseError> {
        let negative = if signed && self.eat(TokenKind::Minus) {
            true
        } else {
            if signed {
                self.eat(TokenKind::Plus);
            }
            false
        };
        let token = self.expect_any(&[TokenKind::Integer, TokenKind::Decimal])?;
        number_value(&token, negative)
    }

    pub(crate) fn parse_string(&mut self) -> Result<StringLiteral, ParseError> {
        let token = self.expect(TokenKind::String)?;
        Ok(StringLiteral {
            value: unquote_string(token.lexeme),
            span: token.span,
        })
    }
}

/// Integers that do not fit in `i64` fall back to a decimal value
fn number_value(token: &Token<'_>, negative: bool) -> Result<Number, ParseError> {
    let text = if negative {
        format!("-{}", token.lexeme)
    } else {
        token.lexeme.to_string()
    };
    if token.kind == TokenKind::Integer {
        if let Ok(value) = text.parse::<i64>() {
            return Ok(Number::Integer(value));
        }
    }
    text.parse::<f64>()
        .map(Number::Decimal)
        .map_err(|_| ParseError::InvalidLiteral {
            message: "malformed number".to_string(),
            found: describe_found(token),
            span: token.span,
        })
}

/// Strip the quotes of a string literal and resolve escapes
///
/// Triple-quoted strings are raw. In regular strings `\n`, `\t`, `\r`,
/// `\"` and `\\` are resolved and any other escape is kept verbatim.
pub(crate) fn unquote_string(lexeme: &str) -> String {
    if let Some(raw) = lexeme
        .strip_prefix("\"\"\"")
        .and_then(|s| s.strip_suffix("\"\"\""))
    {
        return raw.to_string();
    }
    let inner = lexeme
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(lexeme);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Strip the back-quotes of a quoted identifier; doubled back-quotes collapse
pub(crate) fn unquote_identifier(lexeme: &str) -> String {
    lexeme
        .strip_prefix('`')
        .and_then(|s| s.strip_suffix('`'))
        .unwrap_or(lexeme)
        .replace("``", "`")
}
