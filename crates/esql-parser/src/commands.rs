//! Source and processing command grammars, plus names and patterns

use esql_ast::{
    CommandKind, CommandOption, EnrichWithClause, Field, Identifier, IdentifierPattern,
    NullsOrdering, OrderExpression, Ordering, PolicyName, QualifiedName, QualifiedNamePattern,
    RenameClause, Setting, ShowKind, Span,
};
use esql_lexer::TokenKind;

use crate::error::{describe_found, ParseError};
use crate::literal::unquote_identifier;
use crate::parser::Parser;

const IDENTIFIER: [TokenKind; 2] = [TokenKind::Identifier, TokenKind::QuotedIdentifier];
const IDENTIFIER_PATTERN: [TokenKind; 2] =
    [TokenKind::IdentifierPattern, TokenKind::QuotedIdentifier];
const SOURCE_IDENTIFIER: [TokenKind; 2] =
    [TokenKind::SourceIdentifier, TokenKind::QuotedIdentifier];

impl<'a> Parser<'a> {
    // === Source commands ===

    /// FROM sourceIdentifier (',' sourceIdentifier)* metadata?
    pub(crate) fn parse_from(&mut self) -> Result<CommandKind, ParseError> {
        self.expect(TokenKind::From)?;
        let indices = self.comma_separated(Self::parse_source_identifier)?;
        let metadata = if self.eat(TokenKind::OpeningBracket) {
            self.expect(TokenKind::Metadata)?;
            let fields = self.comma_separated(Self::parse_source_identifier)?;
            self.expect(TokenKind::ClosingBracket)?;
            Some(fields)
        } else if self.eat(TokenKind::Metadata) {
            Some(self.comma_separated(Self::parse_source_identifier)?)
        } else {
            None
        };
        Ok(CommandKind::From { indices, metadata })
    }

    /// ROW fields
    pub(crate) fn parse_row(&mut self) -> Result<CommandKind, ParseError> {
        self.expect(TokenKind::Row)?;
        let fields = self.parse_fields()?;
        Ok(CommandKind::Row { fields })
    }

    /// SHOW (INFO | FUNCTIONS)
    pub(crate) fn parse_show(&mut self) -> Result<CommandKind, ParseError> {
        self.expect(TokenKind::Show)?;
        let kind = match self.expect_any(&[TokenKind::Info, TokenKind::Functions])?.kind {
            TokenKind::Info => ShowKind::Info,
            _ => ShowKind::Functions,
        };
        Ok(CommandKind::Show { kind })
    }

    /// EXPLAIN '[' query ']'
    pub(crate) fn parse_explain(&mut self) -> Result<CommandKind, ParseError> {
        self.expect(TokenKind::Explain)?;
        self.expect(TokenKind::OpeningBracket)?;
        let subquery = self.parse_subquery()?;
        self.expect(TokenKind::ClosingBracket)?;
        Ok(CommandKind::Explain {
            subquery: Box::new(subquery),
        })
    }

    // === Processing commands ===

    pub(crate) fn parse_eval(&mut self) -> Result<CommandKind, ParseError> {
        self.expect(TokenKind::Eval)?;
        let fields = self.parse_fields()?;
        Ok(CommandKind::Eval { fields })
    }

    pub(crate) fn parse_where(&mut self) -> Result<CommandKind, ParseError> {
        self.expect(TokenKind::Where)?;
        let predicate = self.parse_boolean_expression()?;
        Ok(CommandKind::Where { predicate })
    }

    /// LIMIT INTEGER_LITERAL
    pub(crate) fn parse_limit(&mut self) -> Result<CommandKind, ParseError> {
        self.expect(TokenKind::Limit)?;
        let token = self.expect(TokenKind::Integer)?;
        let count = token.lexeme.parse::<u64>().map_err(|_| ParseError::InvalidLiteral {
            message: "limit out of range".to_string(),
            found: describe_found(&token),
            span: token.span,
        })?;
        Ok(CommandKind::Limit { count })
    }

    /// SORT orderExpression (',' orderExpression)*
    pub(crate) fn parse_sort(&mut self) -> Result<CommandKind, ParseError> {
        self.expect(TokenKind::Sort)?;
        let order = self.comma_separated(Self::parse_order_expression)?;
        Ok(CommandKind::Sort { order })
    }

    fn parse_order_expression(&mut self) -> Result<OrderExpression, ParseError> {
        let start = self.start();
        let expr = self.parse_boolean_expression()?;
        let ordering = if self.eat(TokenKind::Asc) {
            Some(Ordering::Asc)
        } else if self.eat(TokenKind::Desc) {
            Some(Ordering::Desc)
        } else {
            None
        };
        let nulls = if self.eat(TokenKind::Nulls) {
            match self.expect_any(&[TokenKind::First, TokenKind::Last])?.kind {
                TokenKind::First => Some(NullsOrdering::First),
                _ => Some(NullsOrdering::Last),
            }
        } else {
            None
        };
        Ok(OrderExpression {
            expr,
            ordering,
            nulls,
            span: self.span_from(start),
        })
    }

    /// (KEEP | PROJECT) patterns; both spellings build the same node
    pub(crate) fn parse_keep(&mut self) -> Result<CommandKind, ParseError> {
        self.expect_any(&[TokenKind::Keep, TokenKind::Project])?;
        let patterns = self.comma_separated(Self::parse_qualified_name_pattern)?;
        Ok(CommandKind::Keep { patterns })
    }

    pub(crate) fn parse_drop(&mut self) -> Result<CommandKind, ParseError> {
        self.expect(TokenKind::Drop)?;
        let patterns = self.comma_separated(Self::parse_qualified_name_pattern)?;
        Ok(CommandKind::Drop { patterns })
    }

    /// RENAME old AS new (',' old AS new)*
    pub(crate) fn parse_rename(&mut self) -> Result<CommandKind, ParseError> {
        self.expect(TokenKind::Rename)?;
        let clauses = self.comma_separated(|p| {
            let start = p.start();
            let old_name = p.parse_qualified_name_pattern()?;
            p.expect(TokenKind::As)?;
            let new_name = p.parse_qualified_name_pattern()?;
            Ok(RenameClause {
                old_name,
                new_name,
                span: p.span_from(start),
            })
        })?;
        Ok(CommandKind::Rename { clauses })
    }

    /// STATS fields? (BY fields)?
    pub(crate) fn parse_stats(&mut self) -> Result<CommandKind, ParseError> {
        self.expect(TokenKind::Stats)?;
        let aggs = if self.at(TokenKind::By) || self.at_command_end() {
            None
        } else {
            Some(self.parse_fields()?)
        };
        let group_by = self.parse_group_by()?;
        Ok(CommandKind::Stats { aggs, group_by })
    }

    /// INLINESTATS fields (BY fields)?
    pub(crate) fn parse_inline_stats(&mut self) -> Result<CommandKind, ParseError> {
        self.expect(TokenKind::InlineStats)?;
        let aggs = self.parse_fields()?;
        let group_by = self.parse_group_by()?;
        Ok(CommandKind::InlineStats { aggs, group_by })
    }

    fn parse_group_by(&mut self) -> Result<Option<Vec<Field>>, ParseError> {
        if self.eat(TokenKind::By) {
            Ok(Some(self.parse_fields()?))
        } else {
            Ok(None)
        }
    }

    /// DISSECT primaryExpression string commandOptions?
    pub(crate) fn parse_dissect(&mut self) -> Result<CommandKind, ParseError> {
        self.expect(TokenKind::Dissect)?;
        let target = self.parse_primary_expression()?;
        let pattern = self.parse_string()?;
        let options = if self.eat(TokenKind::OpeningBracket) {
            let options = self.comma_separated(Self::parse_command_option)?;
            self.expect(TokenKind::ClosingBracket)?;
            options
        } else if self.at_any(&IDENTIFIER) {
            self.comma_separated(Self::parse_command_option)?
        } else {
            Vec::new()
        };
        Ok(CommandKind::Dissect {
            target,
            pattern,
            options,
        })
    }

    /// identifier '=' constant, where numbers may carry a sign
    fn parse_command_option(&mut self) -> Result<CommandOption, ParseError> {
        let start = self.start();
        let name = self.parse_identifier()?;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_signed_constant()?;
        Ok(CommandOption {
            name,
            value,
            span: self.span_from(start),
        })
    }

    /// GROK primaryExpression string
    pub(crate) fn parse_grok(&mut self) -> Result<CommandKind, ParseError> {
        self.expect(TokenKind::Grok)?;
        let target = self.parse_primary_expression()?;
        let pattern = self.parse_string()?;
        Ok(CommandKind::Grok { target, pattern })
    }

    pub(crate) fn parse_mv_expand(&mut self) -> Result<CommandKind, ParseError> {
        self.expect(TokenKind::MvExpand)?;
        let name = self.parse_qualified_name()?;
        Ok(CommandKind::MvExpand { name })
    }

    /// ENRICH setting* policyName (ON pattern)? (WITH withClause (',' withClause)*)?
    pub(crate) fn parse_enrich(&mut self) -> Result<CommandKind, ParseError> {
        self.expect(TokenKind::Enrich)?;
        let mut settings = Vec::new();
        while self.at(TokenKind::OpeningBracket) {
            settings.push(self.parse_setting()?);
        }
        let token = self.expect(TokenKind::PolicyName)?;
        let policy = PolicyName {
            name: token.lexeme.to_string(),
            span: token.span,
        };
        let match_field = if self.eat(TokenKind::On) {
            Some(self.parse_qualified_name_pattern()?)
        } else {
            None
        };
        let with = if self.eat(TokenKind::With) {
            Some(self.comma_separated(Self::parse_enrich_with_clause)?)
        } else {
            None
        };
        Ok(CommandKind::Enrich {
            settings,
            policy,
            match_field,
            with,
        })
    }

    /// '[' name ':' value ']'
    fn parse_setting(&mut self) -> Result<Setting, ParseError> {
        let start = self.start();
        self.expect(TokenKind::OpeningBracket)?;
        let name = self.expect(TokenKind::SettingText)?.lexeme.to_string();
        self.expect(TokenKind::Colon)?;
        let value = self.expect(TokenKind::SettingText)?.lexeme.to_string();
        self.expect(TokenKind::ClosingBracket)?;
        Ok(Setting {
            name,
            value,
            span: self.span_from(start),
        })
    }

    /// (newName '=')? enrichField
    fn parse_enrich_with_clause(&mut self) -> Result<EnrichWithClause, ParseError> {
        let start = self.start();
        let first = self.parse_qualified_name_pattern()?;
        let (new_name, enrich_field) = if self.eat(TokenKind::Assign) {
            (Some(first), self.parse_qualified_name_pattern()?)
        } else {
            (None, first)
        };
        Ok(EnrichWithClause {
            new_name,
            enrich_field,
            span: self.span_from(start),
        })
    }

    // === Fields ===

    pub(crate) fn parse_fields(&mut self) -> Result<Vec<Field>, ParseError> {
        self.comma_separated(Self::parse_field)
    }

    /// (qualifiedName '=')? booleanExpression
    fn parse_field(&mut self) -> Result<Field, ParseError> {
        let start = self.start();
        let name = if self.assignment_ahead() {
            let name = self.parse_qualified_name()?;
            self.expect(TokenKind::Assign)?;
            Some(name)
        } else {
            None
        };
        let value = self.parse_boolean_expression()?;
        Ok(Field {
            name,
            value,
            span: self.span_from(start),
        })
    }

    /// Scan `identifier ('.' identifier)* '='` without consuming anything
    fn assignment_ahead(&mut self) -> bool {
        let mut n = 0;
        loop {
            if !IDENTIFIER.contains(&self.peek_nth(n)) {
                return false;
            }
            match self.peek_nth(n + 1) {
                TokenKind::Dot => n += 2,
                TokenKind::Assign => return true,
                _ => return false,
            }
        }
    }

    // === Names ===

    pub(crate) fn parse_identifier(&mut self) -> Result<Identifier, ParseError> {
        let token = self.expect_any(&IDENTIFIER)?;
        Ok(to_identifier(token.kind, token.lexeme, token.span))
    }

    fn parse_source_identifier(&mut self) -> Result<Identifier, ParseError> {
        let token = self.expect_any(&SOURCE_IDENTIFIER)?;
        Ok(to_identifier(token.kind, token.lexeme, token.span))
    }

    /// identifier ('.' identifier)*
    pub(crate) fn parse_qualified_name(&mut self) -> Result<QualifiedName, ParseError> {
        let start = self.start();
        let mut parts = vec![self.parse_identifier()?];
        while self.eat(TokenKind::Dot) {
            parts.push(self.parse_identifier()?);
        }
        Ok(QualifiedName {
            parts,
            span: self.span_from(start),
        })
    }

    /// identifierPattern ('.' identifierPattern)*
    pub(crate) fn parse_qualified_name_pattern(
        &mut self,
    ) -> Result<QualifiedNamePattern, ParseError> {
        let start = self.start();
        let mut parts = vec![self.parse_identifier_pattern()?];
        while self.eat(TokenKind::Dot) {
            parts.push(self.parse_identifier_pattern()?);
        }
        Ok(QualifiedNamePattern {
            parts,
            span: self.span_from(start),
        })
    }

    fn parse_identifier_pattern(&mut self) -> Result<IdentifierPattern, ParseError> {
        let token = self.expect_any(&IDENTIFIER_PATTERN)?;
        let quoted = token.kind == TokenKind::QuotedIdentifier;
        let pattern = if quoted {
            unquote_identifier(token.lexeme)
        } else {
            token.lexeme.to_string()
        };
        Ok(IdentifierPattern {
            pattern,
            quoted,
            span: token.span,
        })
    }
}

fn to_identifier(kind: TokenKind, lexeme: &str, span: Span) -> Identifier {
    if kind == TokenKind::QuotedIdentifier {
        Identifier::new(unquote_identifier(lexeme), true, span)
    } else {
        Identifier::new(lexeme, false, span)
    }
}
