/// Abstract Syntax Tree (AST) node types for the supported queries
///
/// `SELECT <columns> FROM <table> [WHERE <column> <op> <literal>]`, and no
/// more: a query carries at most one condition.
use std::fmt;

/// A parsed SELECT statement
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub columns: SelectList,
    pub table: String,
    pub condition: Option<Condition>,
}

/// Columns named after SELECT
#[derive(Debug, Clone, PartialEq)]
pub enum SelectList {
    /// SELECT *
    Wildcard,
    /// SELECT a, b, c
    Columns(Vec<String>),
}

/// A WHERE condition.
///
/// Only a single comparison is representable. Conjunctions would be a new
/// variant here.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Comparison(Comparison),
}

/// `<column> <op> <literal>`
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub column: String,
    pub operator: ComparisonOperator,
    pub literal: Literal,
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Eq, // =
    Ne, // != or <>
    Lt, // <
    Le, // <=
    Gt, // >
    Ge, // >=
}

impl ComparisonOperator {
    /// Whether `ordering` (row value against literal) satisfies the operator.
    pub fn accepts(&self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            ComparisonOperator::Eq => ordering == Equal,
            ComparisonOperator::Ne => ordering != Equal,
            ComparisonOperator::Lt => ordering == Less,
            ComparisonOperator::Le => ordering != Greater,
            ComparisonOperator::Gt => ordering == Greater,
            ComparisonOperator::Ge => ordering != Less,
        }
    }

    /// Whether this is `=` or `!=`.
    pub fn is_equality(&self) -> bool {
        matches!(self, ComparisonOperator::Eq | ComparisonOperator::Ne)
    }
}

/// Literal values in queries
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Null,
}

impl Condition {
    /// The column the condition reads.
    pub fn column(&self) -> &str {
        match self {
            Condition::Comparison(comparison) => &comparison.column,
        }
    }
}

// Display implementations for debugging and error messages

impl fmt::Display for SelectStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT {} FROM {}", self.columns, self.table)?;
        if let Some(ref condition) = self.condition {
            write!(f, " WHERE {}", condition)?;
        }
        Ok(())
    }
}

impl fmt::Display for SelectList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectList::Wildcard => write!(f, "*"),
            SelectList::Columns(columns) => write!(f, "{}", columns.join(", ")),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Comparison(comparison) => write!(f, "{}", comparison),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.operator, self.literal)
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonOperator::Eq => write!(f, "="),
            ComparisonOperator::Ne => write!(f, "!="),
            ComparisonOperator::Lt => write!(f, "<"),
            ComparisonOperator::Le => write!(f, "<="),
            ComparisonOperator::Gt => write!(f, ">"),
            ComparisonOperator::Ge => write!(f, ">="),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(i) => write!(f, "{}", i),
            Literal::Float(fl) => write!(f, "{}", fl),
            Literal::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Null => write!(f, "NULL"),
        }
    }
}
