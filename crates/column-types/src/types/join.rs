//! A lookup of a lookup: a virtual column showing a field of a schema that an
//! earlier lookup column already joined into the query.

use std::sync::Weak;

use model::core::value::Value;
use planner::query::{
    ast::common::OrderDir,
    builder::{
        JoinPlan,
        filter::{Combine, WhereBuilder},
        query::QueryBuilder,
    },
};
use tracing::{debug, warn};

use crate::{
    alias::resolve_alias,
    base::{self, escape_html},
    column_type::ColumnType,
    config::LookupConfig,
    error::TypeError,
    filter::{Comparator, FilterValue},
    plan::current_joins,
    render::{DocumentRenderer, RenderMode},
    schema::{Column, ColumnRegistry},
    types::lookup::LookupTarget,
};

/// Delegates every operation to the target column `(schema, field)`.
///
/// The join column stores nothing itself. Query operations read the target
/// field from the table alias under which `schema` is already joined, so a
/// lookup column on `schema` must be selected first.
#[derive(Debug, Clone)]
pub struct Join {
    target: LookupTarget,
}

/// The target column and the alias its table is joined under, valid for one
/// call only.
struct Resolved {
    alias: String,
    column: Column,
}

impl Join {
    pub fn new(config: LookupConfig, registry: Weak<dyn ColumnRegistry>) -> Self {
        Self {
            target: LookupTarget::new(config, registry),
        }
    }

    pub fn config(&self) -> &LookupConfig {
        self.target.config()
    }

    /// `Ok(None)` when no target is configured. A configured target that is
    /// missing from the registry or not joined into `plan` is an error.
    fn resolve<P: JoinPlan + ?Sized>(&self, plan: &P) -> Result<Option<Resolved>, TypeError> {
        let Some((schema, field)) = self.config().target() else {
            return Ok(None);
        };

        let column = self
            .target
            .column()
            .ok_or_else(|| TypeError::MissingTargetColumn {
                schema: schema.to_string(),
                field: field.to_string(),
            })?;

        let joins = current_joins(plan);
        let Some(alias) = resolve_alias(&joins, schema) else {
            warn!(
                "Join on `{}.{}` used without a lookup column joining `{}`",
                schema, field, schema
            );
            return Err(TypeError::UnresolvedJoin {
                schema: schema.to_string(),
                field: field.to_string(),
            });
        };

        Ok(Some(Resolved {
            alias: alias.to_string(),
            column,
        }))
    }
}

impl ColumnType for Join {
    fn name(&self) -> &'static str {
        "join"
    }

    /// Join values are derived, so the editor only names the source field.
    fn value_editor(&self, _name: &str, _raw: &Value, _html_id: &str) -> String {
        let config = self.config();
        format!(
            "<strong>{}.{}</strong>",
            escape_html(config.schema.as_deref().unwrap_or_default()),
            escape_html(config.field.as_deref().unwrap_or_default())
        )
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

    fn raw_value(&self, value: &Value) -> Value {
        value.clone()
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
        let Some(Resolved {
            alias: right_alias,
            column,
        }) = self.resolve(&*qb)?
        else {
            debug!("Join `{}` has no target, selecting it as stored", alias);
            base::select(qb, table_alias, col_name, alias);
            return Ok(());
        };

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
        let Some(Resolved {
            alias: right_alias,
            column,
        }) = self.resolve(&*add)?
        else {
            base::filter(add, table_alias, col_name, comp, value, op);
            return Ok(());
        };

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
        let Some(Resolved {
            alias: right_alias,
            column,
        }) = self.resolve(&*qb)?
        else {
            base::sort(qb, table_alias, col_name, dir);
            return Ok(());
        };

        column
            .column_type()
            .sort(qb, &right_alias, column.col_name(), dir)
    }
}
