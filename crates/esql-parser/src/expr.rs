//! Expression parsing with precedence climbing
//!
//! Precedence, loosest first: OR, AND, NOT, predicates (IN, LIKE, RLIKE,
//! IS NULL), comparisons, `+ -`, `* / %`, unary sign, primaries. Binary
//! operators associate to the left; comparisons do not chain.

use esql_ast::{
    ArithmeticOp, BooleanExpr, BooleanExprKind, ComparisonOp, FunctionArgs, FunctionCall,
    LogicalOp, OperatorExpr, OperatorExprKind, PrimaryExpr, PrimaryExprKind, RegexKind, UnaryOp,
    ValueExpr, ValueExprKind,
};
use esql_lexer::TokenKind;

use crate::error::ParseError;
use crate::parser::Parser;

const COMPARISON_OPERATORS: [(TokenKind, ComparisonOp); 7] = [
    (TokenKind::Eq, ComparisonOp::Eq),
    (TokenKind::CiEq, ComparisonOp::CaseInsensitiveEq),
    (TokenKind::Neq, ComparisonOp::Neq),
    (TokenKind::Lt, ComparisonOp::Lt),
    (TokenKind::Lte, ComparisonOp::Lte),
    (TokenKind::Gt, ComparisonOp::Gt),
    (TokenKind::Gte, ComparisonOp::Gte),
];

const PRIMARY_START: [TokenKind; 11] = [
    TokenKind::Identifier,
    TokenKind::QuotedIdentifier,
    TokenKind::LeftParen,
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
    pub(crate) fn parse_boolean_expression(&mut self) -> Result<BooleanExpr, ParseError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<BooleanExpr, ParseError> {
        let start = self.start();
        let mut left = self.parse_and()?;
        while self.eat(TokenKind::Or) {
            let right = self.parse_and()?;
            left = self.logical(LogicalOp::Or, left, right, start);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<BooleanExpr, ParseError> {
        let start = self.start();
        let mut left = self.parse_not()?;
        while self.eat(TokenKind::And) {
            let right = self.parse_not()?;
            left = self.logical(LogicalOp::And, left, right, start);
        }
        Ok(left)
    }

    fn logical(
        &self,
        op: LogicalOp,
        left: BooleanExpr,
        right: BooleanExpr,
        start: usize,
    ) -> BooleanExpr {
        BooleanExpr {
            kind: BooleanExprKind::Logical {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span: self.span_from(start),
        }
    }

    fn parse_not(&mut self) -> Result<BooleanExpr, ParseError> {
        let start = self.start();
        if self.eat(TokenKind::Not) {
            let operand = self.nested(Self::parse_not)?;
            return Ok(BooleanExpr {
                kind: BooleanExprKind::Not(Box::new(operand)),
                span: self.span_from(start),
            });
        }
        self.parse_predicate()
    }

    /// valueExpression followed by an optional IN, LIKE, RLIKE or IS NULL test
    fn parse_predicate(&mut self) -> Result<BooleanExpr, ParseError> {
        let start = self.start();
        let value = self.parse_value_expression()?;

        // `NOT` here only ever negates the predicate that follows it
        let negated = if self.at(TokenKind::Not)
            && matches!(
                self.peek_nth(1),
                TokenKind::In | TokenKind::Like | TokenKind::Rlike
            ) {
            self.advance();
            true
        } else {
            false
        };

        let kind = if self.eat(TokenKind::In) {
            self.expect(TokenKind::LeftParen)?;
            let list = self.comma_separated(Self::parse_value_expression)?;
            self.expect(TokenKind::RightParen)?;
            BooleanExprKind::In {
                value,
                negated,
                list,
            }
        } else if self.at(TokenKind::Like) || self.at(TokenKind::Rlike) {
            let kind = match self.advance().kind {
                TokenKind::Like => RegexKind::Like,
                _ => RegexKind::Rlike,
            };
            let pattern = self.parse_string()?;
            BooleanExprKind::Regex {
                value,
                kind,
                negated,
                pattern,
            }
        } else if negated {
            return Err(self.unexpected());
        } else if self.eat(TokenKind::Is) {
            let negated = self.eat(TokenKind::Not);
            self.expect(TokenKind::Null)?;
            BooleanExprKind::IsNull { value, negated }
        } else {
            BooleanExprKind::Value(value)
        };

        Ok(BooleanExpr {
            kind,
            span: self.span_from(start),
        })
    }

    /// operatorExpression (comparisonOperator operatorExpression)?
    pub(crate) fn parse_value_expression(&mut self) -> Result<ValueExpr, ParseError> {
        let start = self.start();
        let left = self.parse_operator_expression()?;
        let Some(op) = self.comparison_operator() else {
            return Ok(ValueExpr {
                span: left.span,
                kind: ValueExprKind::Operator(left),
            });
        };
        let right = self.parse_operator_expression()?;
        Ok(ValueExpr {
            kind: ValueExprKind::Comparison { op, left, right },
            span: self.span_from(start),
        })
    }

    fn comparison_operator(&mut self) -> Option<ComparisonOp> {
        COMPARISON_OPERATORS
            .iter()
            .find_map(|&(kind, op)| self.eat(kind).then_some(op))
    }

    pub(crate) fn parse_operator_expression(&mut self) -> Result<OperatorExpr, ParseError> {
        self.parse_additive()
    }

    fn parse_additive(&mut self) -> Result<OperatorExpr, ParseError> {
        let start = self.start();
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = if self.eat(TokenKind::Plus) {
                ArithmeticOp::Add
            } else if self.eat(TokenKind::Minus) {
                ArithmeticOp::Sub
            } else {
                break;
            };
            let right = self.parse_multiplicative()?;
            left = self.binary(op, left, right, start);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<OperatorExpr, ParseError> {
        let start = self.start();
        let mut left = self.parse_unary()?;
        loop {
            let op = if self.eat(TokenKind::Asterisk) {
                ArithmeticOp::Mul
            } else if self.eat(TokenKind::Slash) {
                ArithmeticOp::Div
            } else if self.eat(TokenKind::Percent) {
                ArithmeticOp::Mod
            } else {
                break;
            };
            let right = self.parse_unary()?;
            left = self.binary(op, left, right, start);
        }
        Ok(left)
    }

    fn binary(
        &self,
        op: ArithmeticOp,
        left: OperatorExpr,
        right: OperatorExpr,
        start: usize,
    ) -> OperatorExpr {
        OperatorExpr {
            kind: OperatorExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span: self.span_from(start),
        }
    }

    fn parse_unary(&mut self) -> Result<OperatorExpr, ParseError> {
        let start = self.start();
        let op = if self.eat(TokenKind::Minus) {
            UnaryOp::Minus
        } else if self.eat(TokenKind::Plus) {
            UnaryOp::Plus
        } else {
            let primary = self.parse_primary_expression()?;
            return Ok(OperatorExpr {
                span: primary.span,
                kind: OperatorExprKind::Primary(primary),
            });
        };
        let operand = self.nested(Self::parse_unary)?;
        Ok(OperatorExpr {
            kind: OperatorExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span: self.span_from(start),
        })
    }

    pub(crate) fn parse_primary_expression(&mut self) -> Result<PrimaryExpr, ParseError> {
        let start = self.start();
        let kind = match self.peek() {
            TokenKind::Identifier | TokenKind::QuotedIdentifier
                if self.peek_nth(1) == TokenKind::LeftParen =>
            {
                PrimaryExprKind::Function(self.parse_function_call()?)
            }
            TokenKind::Identifier | TokenKind::QuotedIdentifier => {
                PrimaryExprKind::Dereference(self.parse_qualified_name()?)
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.nested(Self::parse_boolean_expression)?;
                self.expect(TokenKind::RightParen)?;
                PrimaryExprKind::Parenthesized(Box::new(inner))
            }
            TokenKind::Null
            | TokenKind::Integer
            | TokenKind::Decimal
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Param
            | TokenKind::String
            | TokenKind::OpeningBracket => PrimaryExprKind::Constant(self.parse_constant()?),
            _ => return Err(self.unexpected_among(&PRIMARY_START)),
        };
        Ok(PrimaryExpr {
            kind,
            span: self.span_from(start),
        })
    }

    /// identifier '(' ('*' | (booleanExpression (',' booleanExpression)*)?) ')'
    fn parse_function_call(&mut self) -> Result<FunctionCall, ParseError> {
        let name = self.parse_identifier()?;
        self.expect(TokenKind::LeftParen)?;
        let args = if self.eat(TokenKind::Asterisk) {
            FunctionArgs::Star
        } else if self.at(TokenKind::RightParen) {
            FunctionArgs::List(Vec::new())
        } else {
            FunctionArgs::List(
                self.nested(|p| p.comma_separated(Self::parse_boolean_expression))?,
            )
        };
        self.expect(TokenKind::RightParen)?;
        Ok(FunctionCall { name, args })
    }
}
