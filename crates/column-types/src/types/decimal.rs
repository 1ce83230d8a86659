use std::str::FromStr;

use bigdecimal::BigDecimal;
use model::core::value::Value;
use planner::query::{
    ast::{common::OrderDir, expr::Expr},
    builder::{
        filter::{Combine, WhereBuilder},
        query::QueryBuilder,
    },
    qualified,
};

use crate::{
    base,
    column_type::ColumnType,
    config::DecimalConfig,
    error::TypeError,
    filter::{Comparator, FilterValue},
};

/// Numbers stored as text. Ordering works on the numeric value.
#[derive(Debug, Clone, Default)]
pub struct Decimal {
    config: DecimalConfig,
}

impl Decimal {
    pub fn new(config: DecimalConfig) -> Self {
        Self { config }
    }

    fn numeric(table_alias: &str, col_name: &str) -> Expr {
        Expr::Cast {
            expr: Box::new(qualified(table_alias, col_name)),
            data_type: "DECIMAL".to_string(),
        }
    }
}

impl ColumnType for Decimal {
    fn name(&self) -> &'static str {
        "decimal"
    }

    fn display_value(&self, value: &Value) -> String {
        let Some(text) = value.as_string().filter(|t| !t.trim().is_empty()) else {
            return String::new();
        };

        let number = match (self.config.round_to, BigDecimal::from_str(text.trim())) {
            (Some(places), Ok(number)) => number.round(i64::from(places)).to_string(),
            _ => text,
        };

        format!("{}{}{}", self.config.prefix, number, self.config.postfix)
    }

    fn filter(
        &self,
        add: &mut WhereBuilder<'_>,
        table_alias: &str,
        col_name: &str,
        comp: Comparator,
        value: &FilterValue,
        op: Combine,
    ) -> Result<(), TypeError> {
        if comp.is_ordering() {
            base::filter_expr(add, Self::numeric(table_alias, col_name), comp, value, op);
        } else {
            base::filter(add, table_alias, col_name, comp, value, op);
        }
        Ok(())
    }

    fn sort(
        &self,
        qb: &mut QueryBuilder,
        table_alias: &str,
        col_name: &str,
        dir: OrderDir,
    ) -> Result<(), TypeError> {
        qb.add_order_by(Self::numeric(table_alias, col_name), dir);
        Ok(())
    }
}
