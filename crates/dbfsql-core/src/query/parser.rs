/// Parser for the supported SQL subset
///
/// Converts a stream of tokens into a [`SelectStatement`]. Constructs that
/// are valid SQL but outside the supported subset are detected and named
/// (`UnsupportedParsingFeature`) rather than mis-parsed; anything else that
/// does not fit the grammar is an `InvalidStatement`.
use super::ast::*;
use super::lexer::{Lexer, Token};
use crate::error::{Error, Result};
use crate::schema::Schema;
use tracing::debug;

/// Parser for SQL queries
pub struct Parser {
    sql: String,
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    /// Create a new parser from SQL text
    pub fn new(input: &str) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize().map_err(|e| Error::InvalidStatement {
            sql: input.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            sql: input.to_string(),
            tokens,
            position: 0,
        })
    }

    /// Parse the query into an AST, checking syntax only
    pub fn parse(&mut self) -> Result<SelectStatement> {
        self.reject_other_statements()?;
        self.expect_token(Token::Select)?;

        let columns = self.parse_select_list()?;
        self.expect_token(Token::From)?;
        let table = self.parse_table()?;
        let condition = self.parse_where()?;
        self.parse_end()?;

        Ok(SelectStatement {
            columns,
            table,
            condition,
        })
    }

    fn reject_other_statements(&self) -> Result<()> {
        match self.current_token() {
            Token::Insert | Token::Update | Token::Delete | Token::Create | Token::Drop
            | Token::Alter => Err(self.unsupported(format!("{} statement", self.current_token()))),
            _ => Ok(()),
        }
    }

    fn parse_select_list(&mut self) -> Result<SelectList> {
        if self.current_token() == &Token::Distinct {
            return Err(self.unsupported("DISTINCT"));
        }

        if self.current_token() == &Token::Asterisk {
            self.advance();
            return Ok(SelectList::Wildcard);
        }

        let mut columns = Vec::new();

        loop {
            match self.current_token().clone() {
                Token::Identifier(name) => {
                    self.advance();
                    if self.current_token() == &Token::LeftParen {
                        return Err(self.unsupported(format!("function call {}()", name)));
                    }
                    if is_qualified(&name) {
                        return Err(self.unsupported("qualified column reference"));
                    }
                    if self.current_token() == &Token::As {
                        return Err(self.unsupported("column alias"));
                    }
                    columns.push(name);
                }
                Token::Asterisk => {
                    return Err(self.invalid("'*' cannot be mixed with column names"));
                }
                token => return Err(self.unexpected("column name or *", &token)),
            }

            if self.current_token() == &Token::Comma {
                self.advance();
            } else {
                break;
            }
        }

        Ok(SelectList::Columns(columns))
    }

    fn parse_table(&mut self) -> Result<String> {
        match self.current_token().clone() {
            Token::Identifier(name) => {
                self.advance();
                if self.current_token() == &Token::Comma {
                    return Err(self.unsupported("multiple tables in FROM"));
                }
                Ok(name)
            }
            Token::LeftParen => Err(self.unsupported("sub-query")),
            token => Err(self.unexpected("table name", &token)),
        }
    }

    fn parse_where(&mut self) -> Result<Option<Condition>> {
        if self.current_token() != &Token::Where {
            return Ok(None);
        }

        self.advance();
        let comparison = self.parse_comparison()?;

        match self.current_token() {
            Token::And => Err(self.unsupported("multiple conditions joined by AND")),
            Token::Or => Err(self.unsupported("multiple conditions joined by OR")),
            _ => Ok(Some(Condition::Comparison(comparison))),
        }
    }

    fn parse_comparison(&mut self) -> Result<Comparison> {
        let column = match self.current_token().clone() {
            Token::Identifier(name) => {
                self.advance();
                if self.current_token() == &Token::LeftParen {
                    // EXISTS (SELECT ...) and friends
                    return Err(if self.peek_token() == &Token::Select {
                        self.unsupported("sub-query")
                    } else {
                        self.unsupported(format!("function call {}()", name))
                    });
                }
                if is_qualified(&name) {
                    return Err(self.unsupported("qualified column reference"));
                }
                name
            }
            Token::Not => return Err(self.unsupported("NOT")),
            Token::LeftParen if self.peek_token() == &Token::Select => {
                return Err(self.unsupported("sub-query"))
            }
            Token::LeftParen => return Err(self.unsupported("parenthesized condition")),
            token => return Err(self.unexpected("column name", &token)),
        };

        let operator = match self.current_token() {
            Token::Eq => ComparisonOperator::Eq,
            Token::Ne => ComparisonOperator::Ne,
            Token::Lt => ComparisonOperator::Lt,
            Token::Le => ComparisonOperator::Le,
            Token::Gt => ComparisonOperator::Gt,
            Token::Ge => ComparisonOperator::Ge,
            Token::Like | Token::In | Token::Between | Token::Is | Token::Not => {
                return Err(self.unsupported(self.current_token().to_string()))
            }
            token => {
                let token = token.clone();
                return Err(self.unexpected("comparison operator", &token));
            }
        };
        self.advance();

        let literal = self.parse_literal()?;

        Ok(Comparison {
            column,
            operator,
            literal,
        })
    }

    fn parse_literal(&mut self) -> Result<Literal> {
        let literal = match self.current_token().clone() {
            Token::Integer(i) => Literal::Integer(i),
            Token::Float(f) => Literal::Float(f),
            Token::String(s) => Literal::String(s),
            Token::Boolean(b) => Literal::Boolean(b),
            Token::Null => Literal::Null,
            Token::Identifier(_) => return Err(self.unsupported("column to column comparison")),
            Token::LeftParen => {
                return if self.peek_token() == &Token::Select {
                    Err(self.unsupported("sub-query"))
                } else {
                    Err(self.unsupported("expression"))
                };
            }
            token => return Err(self.unexpected("literal value", &token)),
        };
        self.advance();
        Ok(literal)
    }

    fn parse_end(&mut self) -> Result<()> {
        if self.current_token() == &Token::Semicolon {
            self.advance();
        }

        let token = self.current_token().clone();
        if token == Token::Eof {
            return Ok(());
        }

        match unsupported_clause(&token) {
            Some(feature) => Err(self.unsupported(feature)),
            None => Err(self.unexpected("end of statement", &token)),
        }
    }

    fn current_token(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn peek_token(&self) -> &Token {
        let next = (self.position + 1).min(self.tokens.len() - 1);
        &self.tokens[next]
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    fn expect_token(&mut self, expected: Token) -> Result<()> {
        if self.current_token() == &expected {
            self.advance();
            Ok(())
        } else {
            let found = self.current_token().clone();
            Err(self.unexpected(&expected.to_string(), &found))
        }
    }

    fn unexpected(&self, expected: &str, found: &Token) -> Error {
        self.invalid(format!("expected {}, found {}", expected, found))
    }

    fn invalid(&self, reason: impl Into<String>) -> Error {
        Error::InvalidStatement {
            sql: self.sql.clone(),
            reason: reason.into(),
        }
    }

    fn unsupported(&self, feature: impl Into<String>) -> Error {
        Error::UnsupportedParsingFeature {
            sql: self.sql.clone(),
            feature: feature.into(),
        }
    }
}

/// `TABLE.COLUMN` style names. The lexer keeps the dot inside identifiers.
fn is_qualified(name: &str) -> bool {
    name.contains('.')
}

/// Clause keywords that may follow FROM or WHERE in full SQL.
fn unsupported_clause(token: &Token) -> Option<&'static str> {
    match token {
        Token::Join | Token::Inner | Token::Left | Token::Right | Token::Full | Token::Outer
        | Token::Cross => Some("JOIN"),
        Token::Group => Some("GROUP BY"),
        Token::Having => Some("HAVING"),
        Token::OrderBy => Some("ORDER BY"),
        Token::Limit => Some("LIMIT"),
        Token::Offset => Some("OFFSET"),
        Token::Union => Some("UNION"),
        Token::And => Some("multiple conditions joined by AND"),
        Token::Or => Some("multiple conditions joined by OR"),
        _ => None,
    }
}

/// Parse `sql` and check every column it names against `schema`.
///
/// Column existence is validated here, at parse time, so a query naming an
/// unknown column fails before any row is read.
pub fn parse_query(sql: &str, schema: &Schema) -> Result<SelectStatement> {
    let statement = Parser::new(sql)?.parse()?;

    if let SelectList::Columns(ref columns) = statement.columns {
        for column in columns {
            schema.field(column)?;
        }
    }
    if let Some(ref condition) = statement.condition {
        schema.field(condition.column())?;
    }

    debug!(sql, condition = ?statement.condition, "parsed query");
    Ok(statement)
}

/// Parse `sql` and return its WHERE condition, if any.
pub fn parse_condition(sql: &str, schema: &Schema) -> Result<Option<Condition>> {
    parse_query(sql, schema).map(|statement| statement.condition)
}
