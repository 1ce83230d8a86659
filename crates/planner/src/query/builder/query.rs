//! The mutable query plan that column types extend one call at a time.

use model::core::value::Value;

use crate::query::{
    ast::{
        common::{OrderDir, TableRef},
        expr::Expr,
        select::{JoinClause, OrderByExpr, Select},
    },
    builder::{
        JoinPlan,
        filter::{WhereBuilder, WhereGroup},
        tables::TablePlan,
    },
    dialect::Dialect,
    error::QueryError,
    qualified,
    renderer::{Render, Renderer},
};
use crate::value;

/// Accumulates tables, select expressions, predicates and ordering until
/// [`QueryBuilder::build`] turns them into a [`Select`].
#[derive(Debug, Default, Clone)]
pub struct QueryBuilder {
    tables: TablePlan,
    select: Vec<Expr>,
    filters: WhereGroup,
    order_by: Vec<OrderByExpr>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_table(&mut self, table: TableRef, alias: Option<&str>) -> Result<(), QueryError> {
        self.tables.add_table(table, alias)
    }

    pub fn generate_table_alias(&mut self) -> String {
        self.tables.generate_table_alias()
    }

    pub fn add_left_join(
        &mut self,
        left_alias: &str,
        right_table: TableRef,
        right_alias: &str,
        on: Expr,
    ) -> Result<(), QueryError> {
        self.tables
            .add_left_join(left_alias, right_table, right_alias, on)
    }

    pub fn tables(&self) -> &TablePlan {
        &self.tables
    }

    pub fn tables_mut(&mut self) -> &mut TablePlan {
        &mut self.tables
    }

    /// Selects `table_alias.column AS result_alias`.
    pub fn add_select_column(&mut self, table_alias: &str, column: &str, result_alias: &str) {
        self.add_select_expr(qualified(table_alias, column), result_alias);
    }

    pub fn add_select_expr(&mut self, expr: Expr, result_alias: &str) {
        self.select.push(Expr::Alias {
            expr: Box::new(expr),
            alias: result_alias.to_string(),
        });
    }

    pub fn select_exprs(&self) -> &[Expr] {
        &self.select
    }

    pub fn add_order_by(&mut self, expr: Expr, direction: OrderDir) {
        self.order_by.push(OrderByExpr {
            expr,
            direction: Some(direction),
        });
    }

    pub fn order_by(&self) -> &[OrderByExpr] {
        &self.order_by
    }

    pub fn set_limit(&mut self, limit: u64) {
        self.limit = Some(limit);
    }

    pub fn set_offset(&mut self, offset: u64) {
        self.offset = Some(offset);
    }

    /// The root group of the WHERE clause.
    pub fn filters(&mut self) -> WhereBuilder<'_> {
        WhereBuilder::new(&mut self.tables, &mut self.filters)
    }

    pub fn where_clause(&self) -> Option<Expr> {
        self.filters.to_expr()
    }

    /// Assembles the planned query. Joins keep the order they were added in,
    /// so a column type planned later can rely on earlier aliases.
    pub fn build(&self) -> Result<Select, QueryError> {
        let from = self.tables.from_clause().ok_or(QueryError::MissingFrom)?;
        if self.select.is_empty() {
            return Err(QueryError::EmptySelect);
        }

        Ok(Select {
            columns: self.select.clone(),
            from: Some(from.clone()),
            joins: self.tables.joins().to_vec(),
            where_clause: self.filters.to_expr(),
            order_by: self.order_by.clone(),
            limit: self.limit.map(|limit| value!(Value::Uint(limit))),
            offset: self.offset.map(|offset| value!(Value::Uint(offset))),
        })
    }

    /// Builds and renders the query for `dialect`.
    pub fn to_sql(&self, dialect: &dyn Dialect) -> Result<(String, Vec<Value>), QueryError> {
        let select = self.build()?;
        let mut renderer = Renderer::new(dialect);
        select.render(&mut renderer);
        Ok(renderer.finish())
    }
}

impl JoinPlan for QueryBuilder {
    fn joins(&self) -> &[JoinClause] {
        self.tables.joins()
    }
}
