#[macro_export]
macro_rules! value {
    ($val:expr) => {
        $crate::query::ast::expr::Expr::Value($val)
    };
}

#[macro_export]
macro_rules! table_ref {
    ($name:expr) => {
        $crate::query::ast::common::TableRef {
            schema: None,
            name: $name.to_string(),
        }
    };
    ($schema:expr, $name:expr) => {
        $crate::query::ast::common::TableRef {
            schema: Some($schema.to_string()),
            name: $name.to_string(),
        }
    };
}

#[macro_export]
macro_rules! ident {
    ($name:expr) => {
        $crate::query::ast::expr::Expr::Identifier($crate::query::ast::expr::Ident {
            qualifier: None,
            name: $name.to_string(),
        })
    };
    ($qualifier:expr, $name:expr) => {
        $crate::query::ast::expr::Expr::Identifier($crate::query::ast::expr::Ident {
            qualifier: Some($qualifier.to_string()),
            name: $name.to_string(),
        })
    };
}

/// Builds a binary expression, e.g. `binary!(ident!("a"), Eq, value!(v))`.
#[macro_export]
macro_rules! binary {
    ($left:expr, $op:ident, $right:expr) => {
        $crate::query::ast::expr::Expr::BinaryOp(Box::new($crate::query::ast::expr::BinaryOp {
            left: $left,
            op: $crate::query::ast::expr::BinaryOperator::$op,
            right: $right,
        }))
    };
}
