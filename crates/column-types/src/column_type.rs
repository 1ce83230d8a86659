use std::fmt;

use model::core::value::Value;
use planner::query::{
    ast::common::OrderDir,
    builder::{
        filter::{Combine, WhereBuilder},
        query::QueryBuilder,
    },
};

use crate::{
    base,
    error::TypeError,
    filter::{Comparator, FilterValue},
    render::{DocumentRenderer, RenderMode},
};

/// Behavior attached to a field: how its values are edited, shown and
/// compared, and how it takes part in a query.
///
/// The default methods are the generic behavior. They are also exposed as
/// free functions in [`base`] so an implementation can fall back to them
/// after overriding.
pub trait ColumnType: fmt::Debug + Send + Sync {
    /// Type name as used in schema definitions.
    fn name(&self) -> &'static str;

    /// Markup for editing `raw` in a form field called `name`.
    fn value_editor(&self, name: &str, raw: &Value, html_id: &str) -> String {
        base::value_editor(name, raw, html_id)
    }

    /// Renders a single value. Returns `false` when nothing was rendered.
    fn render_value(&self, value: &Value, out: &mut dyn DocumentRenderer, mode: RenderMode) -> bool {
        base::render_value(self, value, out, mode)
    }

    fn render_multi_value(
        &self,
        values: &[Value],
        out: &mut dyn DocumentRenderer,
        mode: RenderMode,
    ) -> bool {
        base::render_multi_value(self, values, out, mode)
    }

    /// The value as stored.
    fn raw_value(&self, value: &Value) -> Value {
        value.clone()
    }

    /// The value as shown to a reader.
    fn display_value(&self, value: &Value) -> String {
        value.as_string().unwrap_or_default()
    }

    /// The value used when this column's value is the argument of a filter
    /// on another column.
    fn compare_value(&self, value: &Value) -> String {
        self.raw_value(value).as_string().unwrap_or_default()
    }

    /// Adds this column, read from `table_alias.col_name`, to the select list
    /// under `alias`.
    fn select(
        &self,
        qb: &mut QueryBuilder,
        table_alias: &str,
        col_name: &str,
        alias: &str,
    ) -> Result<(), TypeError> {
        base::select(qb, table_alias, col_name, alias);
        Ok(())
    }

    /// Adds a predicate comparing `table_alias.col_name` against `value`,
    /// attached to the previous predicates with `op`.
    fn filter(
        &self,
        add: &mut WhereBuilder<'_>,
        table_alias: &str,
        col_name: &str,
        comp: Comparator,
        value: &FilterValue,
        op: Combine,
    ) -> Result<(), TypeError> {
        base::filter(add, table_alias, col_name, comp, value, op);
        Ok(())
    }

    fn sort(
        &self,
        qb: &mut QueryBuilder,
        table_alias: &str,
        col_name: &str,
        dir: OrderDir,
    ) -> Result<(), TypeError> {
        base::sort(qb, table_alias, col_name, dir);
        Ok(())
    }
}
