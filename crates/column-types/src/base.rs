//! Generic column behavior shared by every type.

use model::core::value::Value;
use planner::query::{
    ast::{
        common::OrderDir,
        expr::{BinaryOp, Expr},
    },
    builder::{
        filter::{Combine, WhereBuilder},
        query::QueryBuilder,
    },
    qualified,
};

use crate::{
    column_type::ColumnType,
    filter::{Comparator, FilterValue},
    render::{DocumentRenderer, RenderMode},
};

pub fn value_editor(name: &str, raw: &Value, html_id: &str) -> String {
    let raw = raw.as_string().unwrap_or_default();
    format!(
        r#"<input name="{}" id="{}" class="struct_value" value="{}" />"#,
        escape_html(name),
        escape_html(html_id),
        escape_html(&raw)
    )
}

pub fn render_value<T: ColumnType + ?Sized>(
    ty: &T,
    value: &Value,
    out: &mut dyn DocumentRenderer,
    _mode: RenderMode,
) -> bool {
    out.cdata(&ty.display_value(value));
    true
}

/// Renders each value with the type's own single-value renderer, separated
/// by `", "`.
pub fn render_multi_value<T: ColumnType + ?Sized>(
    ty: &T,
    values: &[Value],
    out: &mut dyn DocumentRenderer,
    mode: RenderMode,
) -> bool {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.cdata(", ");
        }
        ty.render_value(value, out, mode);
    }
    true
}

pub fn select(qb: &mut QueryBuilder, table_alias: &str, col_name: &str, alias: &str) {
    qb.add_select_column(table_alias, col_name, alias);
}

pub fn filter(
    add: &mut WhereBuilder<'_>,
    table_alias: &str,
    col_name: &str,
    comp: Comparator,
    value: &FilterValue,
    op: Combine,
) {
    filter_expr(add, qualified(table_alias, col_name), comp, value, op);
}

/// Compares an arbitrary column expression. Several values become an `OR`
/// group attached with `op`.
pub fn filter_expr(
    add: &mut WhereBuilder<'_>,
    column: Expr,
    comp: Comparator,
    value: &FilterValue,
    op: Combine,
) {
    match value {
        FilterValue::Single(value) => {
            add.push(op, predicate(column, comp, value));
        }
        FilterValue::Many(values) => {
            let mut group = add.sub_group(op);
            for value in values {
                group.or(predicate(column.clone(), comp, value));
            }
        }
    }
}

pub fn sort(qb: &mut QueryBuilder, table_alias: &str, col_name: &str, dir: OrderDir) {
    qb.add_order_by(qualified(table_alias, col_name), dir);
}

fn predicate(column: Expr, comp: Comparator, value: &Value) -> Expr {
    let value = match value {
        Value::String(s) if comp.is_pattern() => Value::String(s.replace('*', "%")),
        other => other.clone(),
    };

    Expr::BinaryOp(Box::new(BinaryOp {
        left: column,
        op: comp.operator(),
        right: Expr::Value(value),
    }))
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use model::core::value::Value;
    use planner::query::{
        ast::common::OrderDir, builder::filter::Combine, builder::query::QueryBuilder,
        dialect::Sqlite,
    };
    use planner::table_ref;

    use super::{filter, select, sort, value_editor};
    use crate::filter::{Comparator, FilterValue};

    fn query() -> QueryBuilder {
        let mut qb = QueryBuilder::new();
        qb.add_table(table_ref!("data_cities"), Some("T0")).unwrap();
        qb
    }

    #[test]
    fn test_select_filter_sort() {
        let mut qb = query();
        select(&mut qb, "T0", "col1", "name");
        filter(
            &mut qb.filters(),
            "T0",
            "col1",
            Comparator::Like,
            &FilterValue::from("Ber*"),
            Combine::And,
        );
        sort(&mut qb, "T0", "col1", OrderDir::Asc);

        let (sql, params) = qb.to_sql(&Sqlite).unwrap();
        assert_eq!(
            sql,
            r#"SELECT "T0"."col1" AS "name" FROM "data_cities" AS "T0" WHERE ("T0"."col1" LIKE ?) ORDER BY "T0"."col1" ASC"#
        );
        assert_eq!(params, vec![Value::from("Ber%")]);
    }

    #[test]
    fn test_multiple_values_form_or_group() {
        let mut qb = query();
        select(&mut qb, "T0", "pid", "pid");
        qb.filters().and(planner::binary!(
            planner::ident!("T0", "latest"),
            Eq,
            planner::value!(Value::Int(1))
        ));
        filter(
            &mut qb.filters(),
            "T0",
            "col2",
            Comparator::Eq,
            &FilterValue::from(vec![Value::from("de"), Value::from("fr")]),
            Combine::And,
        );

        let (sql, params) = qb.to_sql(&Sqlite).unwrap();
        assert!(sql.ends_with(
            r#"WHERE (("T0"."latest" = ?) AND (("T0"."col2" = ?) OR ("T0"."col2" = ?)))"#
        ));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_value_editor_escapes() {
        let html = value_editor("entry[name]", &Value::from(r#"<b>"x"</b>"#), "id_1");
        assert_eq!(
            html,
            r#"<input name="entry[name]" id="id_1" class="struct_value" value="&lt;b&gt;&quot;x&quot;&lt;/b&gt;" />"#
        );
    }
}
