//! Finds the alias under which a schema's data table was joined.

use std::collections::HashMap;

use tracing::debug;

use crate::{plan::JoinDescriptor, schema::clean_table_name};

/// Maps each outer-joined schema, by cleaned name, to its alias. When a schema
/// was joined more than once the earliest join wins.
pub fn schema_aliases<'a>(joins: &[JoinDescriptor<'a>]) -> HashMap<String, &'a str> {
    let mut aliases = HashMap::new();
    for join in joins.iter().filter(|j| j.kind.is_outer()) {
        let Some(schema) = join.schema().map(clean_table_name) else {
            continue;
        };
        if !schema.is_empty() {
            aliases.entry(schema).or_insert(join.alias);
        }
    }
    aliases
}

/// The alias of `schema`'s data table among `joins`, or `None` when the
/// schema was never outer-joined.
pub fn resolve_alias<'a>(joins: &[JoinDescriptor<'a>], schema: &str) -> Option<&'a str> {
    let schema = clean_table_name(schema);
    let alias = schema_aliases(joins).get(schema.as_str()).copied();

    match alias {
        Some(alias) => debug!("Schema `{}` is joined as `{}`", schema, alias),
        None => debug!("Schema `{}` is not joined into the query", schema),
    }

    alias
}

#[cfg(test)]
mod tests {
    use planner::query::ast::common::JoinKind;
    use tracing_test::traced_test;

    use super::{resolve_alias, schema_aliases};
    use crate::plan::JoinDescriptor;

    fn join(kind: JoinKind, table: &'static str, alias: &'static str) -> JoinDescriptor<'static> {
        JoinDescriptor { kind, table, alias }
    }

    #[test]
    fn test_single_outer_join_resolves() {
        let joins = [join(JoinKind::Left, "data_countries", "t1")];
        assert_eq!(resolve_alias(&joins, "countries"), Some("t1"));
        assert_eq!(resolve_alias(&joins, "Countries"), Some("t1"));
    }

    #[test]
    fn test_joined_table_name_is_cleaned() {
        let joins = [join(JoinKind::Left, "data_Countries", "t1")];
        assert_eq!(resolve_alias(&joins, "Countries"), Some("t1"));
        assert_eq!(resolve_alias(&joins, "countries"), Some("t1"));
        assert_eq!(schema_aliases(&joins)["countries"], "t1");

        let joins = [join(JoinKind::Left, "data_My-Cities", "t2")];
        assert_eq!(resolve_alias(&joins, "my cities"), Some("t2"));
    }

    #[test]
    fn test_missing_schema_is_none() {
        let joins = [
            join(JoinKind::Left, "data_countries", "t1"),
            join(JoinKind::Left, "data_cities", "t2"),
        ];
        assert_eq!(resolve_alias(&joins, "continents"), None);
        assert_eq!(resolve_alias(&[], "countries"), None);
    }

    #[test]
    fn test_inner_and_foreign_tables_ignored() {
        let joins = [
            join(JoinKind::Inner, "data_countries", "t1"),
            join(JoinKind::Left, "countries", "t2"),
            join(JoinKind::Left, "data_", "t3"),
        ];
        assert_eq!(resolve_alias(&joins, "countries"), None);
        assert!(schema_aliases(&joins).is_empty());
    }

    #[test]
    fn test_repeated_schema_picks_first_join() {
        let joins = [
            join(JoinKind::Left, "data_countries", "t1"),
            join(JoinKind::Left, "data_cities", "t2"),
            join(JoinKind::Left, "data_countries", "t3"),
        ];
        assert_eq!(resolve_alias(&joins, "countries"), Some("t1"));

        let aliases = schema_aliases(&joins);
        assert_eq!(aliases.len(), 2);
        assert_eq!(aliases["cities"], "t2");
    }

    #[test]
    #[traced_test]
    fn test_resolution_is_logged() {
        let joins = [join(JoinKind::Left, "data_countries", "t1")];
        resolve_alias(&joins, "countries");
        resolve_alias(&joins, "cities");

        assert!(logs_contain("Schema `countries` is joined as `t1`"));
        assert!(logs_contain("Schema `cities` is not joined into the query"));
    }
}
