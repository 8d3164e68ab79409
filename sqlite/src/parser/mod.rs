pub mod ast;
pub mod lexer;
pub mod sql_parser;

pub use ast::*;
pub use sql_parser::SqlParser;

use crate::error::{SqlError, SqlResult};

/// Parse SQL statement into AST
pub fn parse_sql(input: &str) -> SqlResult<Statement> {
    let parser = SqlParser::new();
    parser.parse(input)
}
