//! The table portion of a query plan: the primary table and its joins.

use tracing::debug;

use crate::query::{
    ast::{
        common::{JoinKind, TableRef},
        expr::Expr,
        select::{FromClause, JoinClause},
    },
    builder::JoinPlan,
    error::QueryError,
};

#[derive(Debug, Default, Clone)]
pub struct TablePlan {
    from: Option<FromClause>,
    joins: Vec<JoinClause>,
    alias_seq: usize,
}

impl TablePlan {
    pub fn from_clause(&self) -> Option<&FromClause> {
        self.from.as_ref()
    }

    /// Sets the primary table. A query has exactly one.
    pub fn add_table(&mut self, table: TableRef, alias: Option<&str>) -> Result<(), QueryError> {
        if let Some(from) = &self.from {
            return Err(QueryError::TableAlreadySet(from.table.name.clone()));
        }

        self.from = Some(FromClause {
            table,
            alias: alias.map(String::from),
        });
        Ok(())
    }

    /// Whether `alias` names the primary table or any joined table.
    pub fn has_alias(&self, alias: &str) -> bool {
        let from_matches = self
            .from
            .as_ref()
            .is_some_and(|from| from.alias.as_deref().unwrap_or(&from.table.name) == alias);

        from_matches || self.joins.iter().any(|j| j.reference_name() == alias)
    }

    /// Hands out the next unused alias of the form `T<n>`.
    pub fn generate_table_alias(&mut self) -> String {
        loop {
            let alias = format!("T{}", self.alias_seq);
            self.alias_seq += 1;
            if !self.has_alias(&alias) {
                return alias;
            }
        }
    }

    /// Appends a `LEFT JOIN right_table AS right_alias ON on`.
    ///
    /// `left_alias` must already be part of the query and `right_alias`
    /// must not be.
    pub fn add_left_join(
        &mut self,
        left_alias: &str,
        right_table: TableRef,
        right_alias: &str,
        on: Expr,
    ) -> Result<(), QueryError> {
        if !self.has_alias(left_alias) {
            return Err(QueryError::UnknownAlias(left_alias.to_string()));
        }
        if self.has_alias(right_alias) {
            return Err(QueryError::DuplicateAlias(right_alias.to_string()));
        }

        debug!(
            "Joining `{}` as `{}` onto `{}`",
            right_table.name, right_alias, left_alias
        );

        self.joins.push(JoinClause {
            kind: JoinKind::Left,
            table: right_table,
            alias: Some(right_alias.to_string()),
            on,
        });
        Ok(())
    }
}

impl JoinPlan for TablePlan {
    fn joins(&self) -> &[JoinClause] {
        &self.joins
    }
}

#[cfg(test)]
mod tests {
    use super::TablePlan;
    use crate::query::{
        ast::common::JoinKind, builder::JoinPlan, error::QueryError,
    };
    use crate::{binary, ident, table_ref};

    fn plan() -> TablePlan {
        let mut plan = TablePlan::default();
        plan.add_table(table_ref!("data_cities"), Some("T0")).unwrap();
        plan
    }

    #[test]
    fn test_generate_alias_skips_used() {
        let mut plan = plan();
        assert_eq!(plan.generate_table_alias(), "T1");
        assert_eq!(plan.generate_table_alias(), "T2");
    }

    #[test]
    fn test_left_join_is_recorded_in_order() {
        let mut plan = plan();
        plan.add_left_join(
            "T0",
            table_ref!("data_countries"),
            "T1",
            binary!(ident!("T0", "col2"), Eq, ident!("T1", "pid")),
        )
        .unwrap();
        plan.add_left_join(
            "T1",
            table_ref!("data_continents"),
            "T2",
            binary!(ident!("T1", "col3"), Eq, ident!("T2", "pid")),
        )
        .unwrap();

        let joins = plan.joins();
        assert_eq!(joins.len(), 2);
        assert_eq!(joins[0].table.name, "data_countries");
        assert_eq!(joins[1].reference_name(), "T2");
        assert!(joins.iter().all(|j| j.kind == JoinKind::Left));
    }

    #[test]
    fn test_left_join_alias_errors() {
        let mut plan = plan();
        let on = binary!(ident!("x"), Eq, ident!("y"));

        assert_eq!(
            plan.add_left_join("T9", table_ref!("data_a"), "T1", on.clone()),
            Err(QueryError::UnknownAlias("T9".into()))
        );
        assert_eq!(
            plan.add_left_join("T0", table_ref!("data_a"), "T0", on),
            Err(QueryError::DuplicateAlias("T0".into()))
        );
    }

    #[test]
    fn test_single_primary_table() {
        let mut plan = plan();
        assert_eq!(
            plan.add_table(table_ref!("data_other"), None),
            Err(QueryError::TableAlreadySet("data_cities".into()))
        );
    }
}
