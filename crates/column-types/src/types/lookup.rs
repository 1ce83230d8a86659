use std::sync::Weak;

use model::core::value::Value;
use planner::query::{
    ast::{
        common::OrderDir,
        expr::{BinaryOp, BinaryOperator, Expr},
    },
    builder::{
        filter::{Combine, WhereBuilder},
        query::QueryBuilder,
        tables::TablePlan,
    },
    qualified,
};
use planner::table_ref;
use tracing::debug;

use crate::{
    base,
    column_type::ColumnType,
    config::LookupConfig,
    error::TypeError,
    filter::{Comparator, FilterValue},
    render::{DocumentRenderer, RenderMode},
    schema::{Column, ColumnRegistry, data_table_name},
};

/// The configured target of a lookup, resolved on demand.
///
/// Nothing is cached: the registry may change between calls.
#[derive(Clone)]
pub struct LookupTarget {
    config: LookupConfig,
    registry: Weak<dyn ColumnRegistry>,
}

impl LookupTarget {
    pub fn new(config: LookupConfig, registry: Weak<dyn ColumnRegistry>) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// The target column, or `None` when unconfigured, unknown to the
    /// registry, or the registry is gone.
    pub fn column(&self) -> Option<Column> {
        let (schema, field) = self.config.target()?;
        let registry = self.registry.upgrade()?;
        registry.lookup_column(schema, field)
    }

    pub fn render_value(&self, value: &Value, out: &mut dyn DocumentRenderer, mode: RenderMode) -> bool {
        match self.column() {
            Some(column) => column.column_type().render_value(value, out, mode),
            None => false,
        }
    }

    pub fn render_multi_value(
        &self,
        values: &[Value],
        out: &mut dyn DocumentRenderer,
        mode: RenderMode,
    ) -> bool {
        match self.column() {
            Some(column) => column.column_type().render_multi_value(values, out, mode),
            None => false,
        }
    }

    pub fn display_value(&self, value: &Value) -> String {
        self.column()
            .map(|column| column.column_type().display_value(value))
            .unwrap_or_default()
    }

    pub fn compare_value(&self, value: &Value) -> String {
        self.column()
            .and_then(|column| column.column_type().raw_value(value).as_string())
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for LookupTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupTarget")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A reference into another schema's row.
///
/// Selecting, filtering or sorting joins the referenced schema's data table
/// under a fresh alias and hands the work to the target column.
#[derive(Debug, Clone)]
pub struct Lookup {
    target: LookupTarget,
}

impl Lookup {
    pub fn new(config: LookupConfig, registry: Weak<dyn ColumnRegistry>) -> Self {
        Self {
            target: LookupTarget::new(config, registry),
        }
    }

    pub fn target(&self) -> &LookupTarget {
        &self.target
    }

    /// Joins the latest revision of `schema`'s row referenced by
    /// `table_alias.col_name`, returning the new alias.
    fn join_target(
        tables: &mut TablePlan,
        schema: &str,
        table_alias: &str,
        col_name: &str,
    ) -> Result<String, TypeError> {
        let right_alias = tables.generate_table_alias();
        let on = Expr::BinaryOp(Box::new(BinaryOp {
            left: Expr::BinaryOp(Box::new(BinaryOp {
                left: qualified(table_alias, col_name),
                op: BinaryOperator::Eq,
                right: qualified(&right_alias, "pid"),
            })),
            op: BinaryOperator::And,
            right: Expr::BinaryOp(Box::new(BinaryOp {
                left: qualified(&right_alias, "latest"),
                op: BinaryOperator::Eq,
                right: Expr::Value(Value::Int(1)),
            })),
        }));

        tables.add_left_join(table_alias, table_ref!(data_table_name(schema)), &right_alias, on)?;
        Ok(right_alias)
    }

    fn target_schema(&self) -> Option<&str> {
        self.target.config().target().map(|(schema, _)| schema)
    }
}

impl ColumnType for Lookup {
    fn name(&self) -> &'static str {
        "lookup"
    }

    fn render_value(&self, value: &Value, out: &mut dyn DocumentRenderer, mode: RenderMode) -> bool {
        self.target.render_value(value, out, mode)
    }

    fn render_multi_value(
        &self,
        values: &[Value],
        out: &mut dyn DocumentRenderer,
        mode: RenderMode,
    ) -> bool {
        self.target.render_multi_value(values, out, mode)
    }

    fn display_value(&self, value: &Value) -> String {
        self.target.display_value(value)
    }

    fn compare_value(&self, value: &Value) -> String {
        self.target.compare_value(value)
    }

    fn select(
        &self,
        qb: &mut QueryBuilder,
        table_alias: &str,
        col_name: &str,
        alias: &str,
    ) -> Result<(), TypeError> {
        let (Some(schema), Some(column)) = (self.target_schema(), self.target.column()) else {
            debug!("Lookup `{}` has no target, selecting it as stored", alias);
            base::select(qb, table_alias, col_name, alias);
            return Ok(());
        };

        let right_alias = Self::join_target(qb.tables_mut(), schema, table_alias, col_name)?;
        column
            .column_type()
            .select(qb, &right_alias, column.col_name(), alias)
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
        let (Some(schema), Some(column)) = (self.target_schema(), self.target.column()) else {
            base::filter(add, table_alias, col_name, comp, value, op);
            return Ok(());
        };

        let right_alias = Self::join_target(add.tables_mut(), schema, table_alias, col_name)?;
        column
            .column_type()
            .filter(add, &right_alias, column.col_name(), comp, value, op)
    }

    fn sort(
        &self,
        qb: &mut QueryBuilder,
        table_alias: &str,
        col_name: &str,
        dir: OrderDir,
    ) -> Result<(), TypeError> {
        let (Some(schema), Some(column)) = (self.target_schema(), self.target.column()) else {
            base::sort(qb, table_alias, col_name, dir);
            return Ok(());
        };

        let right_alias = Self::join_target(qb.tables_mut(), schema, table_alias, col_name)?;
        column
            .column_type()
            .sort(qb, &right_alias, column.col_name(), dir)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use model::core::value::Value;
    use planner::query::{
        ast::common::OrderDir,
        builder::{JoinPlan, query::QueryBuilder},
        dialect::Sqlite,
    };
    use planner::table_ref;

    use super::Lookup;
    use crate::{
        column_type::ColumnType,
        config::{LookupConfig, TextConfig},
        schema::{Schema, SchemaRegistry},
        types::text::Text,
    };

    fn registry() -> Arc<SchemaRegistry> {
        let registry = SchemaRegistry::new();
        registry.register(Schema::new("Countries").with_column(
            "name",
            Arc::new(Text::new(TextConfig {
                prefix: String::new(),
                postfix: " (country)".into(),
            })),
        ));
        registry
    }

    fn cities_query() -> QueryBuilder {
        let mut qb = QueryBuilder::new();
        qb.add_table(table_ref!("data_cities"), Some("T0")).unwrap();
        qb
    }

    #[test]
    fn test_each_call_joins_latest_target_row() {
        let registry = registry();
        let lookup = Lookup::new(LookupConfig::new("Countries", "name"), registry.handle());

        let mut qb = cities_query();
        lookup.select(&mut qb, "T0", "col2", "country").unwrap();
        lookup.sort(&mut qb, "T0", "col2", OrderDir::Asc).unwrap();

        let tables: Vec<_> = qb
            .joins()
            .iter()
            .map(|j| (j.table.name.as_str(), j.reference_name()))
            .collect();
        assert_eq!(tables, vec![("data_countries", "T1"), ("data_countries", "T2")]);

        let (sql, params) = qb.to_sql(&Sqlite).unwrap();
        assert_eq!(
            sql,
            r#"SELECT "T1"."col1" AS "country" FROM "data_cities" AS "T0" LEFT JOIN "data_countries" AS "T1" ON (("T0"."col2" = "T1"."pid") AND ("T1"."latest" = ?)) LEFT JOIN "data_countries" AS "T2" ON (("T0"."col2" = "T2"."pid") AND ("T2"."latest" = ?)) ORDER BY "T2"."col1" ASC"#
        );
        assert_eq!(params, vec![Value::Int(1), Value::Int(1)]);
    }

    #[test]
    fn test_unknown_target_selects_stored_value() {
        let registry = registry();
        let lookup = Lookup::new(LookupConfig::new("continents", "name"), registry.handle());

        let mut qb = cities_query();
        lookup.select(&mut qb, "T0", "col2", "continent").unwrap();

        assert!(qb.joins().is_empty());
        let (sql, _) = qb.to_sql(&Sqlite).unwrap();
        assert_eq!(
            sql,
            r#"SELECT "T0"."col2" AS "continent" FROM "data_cities" AS "T0""#
        );
    }

    #[test]
    fn test_display_uses_target_type() {
        let registry = registry();
        let lookup = Lookup::new(LookupConfig::new("countries", "name"), registry.handle());
        assert_eq!(lookup.display_value(&Value::from("France")), "France (country)");
        assert_eq!(lookup.compare_value(&Value::from("France")), "France");

        let unconfigured = Lookup::new(LookupConfig::default(), registry.handle());
        assert_eq!(unconfigured.display_value(&Value::from("France")), "");
    }
}
