use crate::query::ast::expr::{Expr, Ident};

pub mod ast;
pub mod builder;
pub mod dialect;
pub mod error;
pub mod macros;
pub mod renderer;

/// A column reference qualified by a table alias, e.g. `T0.col1`.
pub fn qualified(table_alias: &str, column: &str) -> Expr {
    Expr::Identifier(Ident {
        qualifier: Some(table_alias.to_string()),
        name: column.to_string(),
    })
}
