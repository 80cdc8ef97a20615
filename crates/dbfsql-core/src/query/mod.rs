/// Query module
///
/// Parsing of the supported SELECT statements and evaluation of their WHERE
/// condition against rows.
/// Abstract Syntax Tree types
#[allow(missing_docs)]
pub mod ast;
/// SQL lexer
#[allow(missing_docs)]
pub mod lexer;
/// SQL parser
#[allow(missing_docs)]
pub mod parser;
/// Condition evaluation
#[allow(missing_docs)]
pub mod resolver;

// Re-export main types
pub use ast::*;
pub use lexer::{Lexer, LexerError, Token};
pub use parser::{parse_condition, parse_query, Parser};
