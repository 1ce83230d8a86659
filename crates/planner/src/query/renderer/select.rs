use crate::query::{
    ast::{
        common::{JoinKind, OrderDir},
        select::{FromClause, JoinClause, OrderByExpr, Select},
    },
    renderer::{Render, Renderer},
};

impl Render for Select {
    fn render(&self, r: &mut Renderer) {
        // 1. SELECT clause
        r.sql.push_str("SELECT ");
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                r.sql.push_str(", ");
            }
            col.render(r);
        }

        // 2. FROM
        if let Some(from) = &self.from {
            r.sql.push(' ');
            from.render(r);
        }

        // 3. JOIN
        for join in &self.joins {
            r.sql.push(' ');
            join.render(r);
        }

        // 4. WHERE
        if let Some(where_clause) = &self.where_clause {
            r.sql.push_str(" WHERE ");
            where_clause.render(r);
        }

        // 5. ORDER BY
        if !self.order_by.is_empty() {
            r.sql.push_str(" ORDER BY ");
            for (i, order) in self.order_by.iter().enumerate() {
                if i > 0 {
                    r.sql.push_str(", ");
                }
                order.render(r);
            }
        }

        // 6. LIMIT
        if let Some(limit) = &self.limit {
            r.sql.push_str(" LIMIT ");
            limit.render(r);
        }

        // 7. OFFSET
        if let Some(offset) = &self.offset {
            r.sql.push_str(" OFFSET ");
            offset.render(r);
        }
    }
}

impl Render for FromClause {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str("FROM ");
        r.render_table_ref(&self.table);
        if let Some(alias) = &self.alias {
            r.sql.push_str(" AS ");
            r.sql.push_str(&r.dialect.quote_identifier(alias));
        }
    }
}

impl Render for JoinClause {
    fn render(&self, r: &mut Renderer) {
        let join_str = match self.kind {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL OUTER JOIN",
        };
        r.sql.push_str(&format!("{join_str} "));
        r.render_table_ref(&self.table);
        if let Some(alias) = &self.alias {
            r.sql.push_str(" AS ");
            r.sql.push_str(&r.dialect.quote_identifier(alias));
        }
        r.sql.push_str(" ON ");
        self.on.render(r);
    }
}

impl Render for OrderByExpr {
    fn render(&self, r: &mut Renderer) {
        self.expr.render(r);
        if let Some(dir) = &self.direction {
            let dir_str = match dir {
                OrderDir::Asc => "ASC",
                OrderDir::Desc => "DESC",
            };
            r.sql.push(' ');
            r.sql.push_str(dir_str);
        }
    }
}

#[cfg(test)]
mod tests {
    use model::core::value::Value;

    use crate::query::{
        ast::{
            common::{JoinKind, OrderDir, TableRef},
            expr::{Expr, FunctionCall},
            select::{FromClause, JoinClause, OrderByExpr, Select},
        },
        dialect::{MySql, Postgres},
        renderer::{Render, Renderer},
    };
    use crate::{binary, ident, table_ref, value};

    fn render(ast: &Select, dialect: &dyn crate::query::dialect::Dialect) -> (String, Vec<Value>) {
        let mut renderer = Renderer::new(dialect);
        ast.render(&mut renderer);
        renderer.finish()
    }

    #[test]
    fn test_schema_qualified_table_mysql() {
        let ast = Select {
            columns: vec![ident!("pid")],
            from: Some(FromClause {
                table: TableRef {
                    schema: Some("wiki".to_string()),
                    name: "data_countries".to_string(),
                },
                alias: None,
            }),
            where_clause: Some(binary!(ident!("latest"), Eq, value!(Value::Int(1)))),
            ..Default::default()
        };

        let (sql, params) = render(&ast, &MySql);
        assert_eq!(
            sql,
            "SELECT `pid` FROM `wiki`.`data_countries` WHERE (`latest` = ?)"
        );
        assert_eq!(params, vec![Value::Int(1)]);
    }

    #[test]
    fn test_lookup_select_postgres() {
        let ast = Select {
            columns: vec![
                Expr::Alias {
                    expr: Box::new(ident!("T1", "col1")),
                    alias: "country".to_string(),
                },
                Expr::Alias {
                    expr: Box::new(Expr::FunctionCall(FunctionCall {
                        name: "COUNT".to_string(),
                        args: vec![],
                        wildcard: true,
                    })),
                    alias: "cities".to_string(),
                },
            ],
            from: Some(FromClause {
                table: table_ref!("data_cities"),
                alias: Some("T0".to_string()),
            }),
            joins: vec![JoinClause {
                kind: JoinKind::Left,
                table: table_ref!("data_countries"),
                alias: Some("T1".to_string()),
                on: binary!(
                    binary!(ident!("T0", "col2"), Eq, ident!("T1", "pid")),
                    And,
                    binary!(ident!("T1", "latest"), Eq, value!(Value::Int(1)))
                ),
            }],
            where_clause: Some(binary!(
                ident!("T1", "col1"),
                NotEq,
                value!(Value::from("Atlantis"))
            )),
            order_by: vec![OrderByExpr {
                expr: ident!("T1", "col1"),
                direction: Some(OrderDir::Desc),
            }],
            limit: Some(value!(Value::Int(10))),
            offset: None,
        };

        let (sql, params) = render(&ast, &Postgres);
        let expected_sql = r#"SELECT "T1"."col1" AS "country", COUNT(*) AS "cities" FROM "data_cities" AS "T0" LEFT JOIN "data_countries" AS "T1" ON (("T0"."col2" = "T1"."pid") AND ("T1"."latest" = $1)) WHERE ("T1"."col1" <> $2) ORDER BY "T1"."col1" DESC LIMIT $3"#;
        assert_eq!(sql, expected_sql);
        assert_eq!(
            params,
            vec![Value::Int(1), Value::from("Atlantis"), Value::Int(10)]
        );
    }
}
