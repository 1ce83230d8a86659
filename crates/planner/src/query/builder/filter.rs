//! Incremental construction of a (possibly nested) WHERE clause.

use crate::query::{
    ast::{
        expr::{BinaryOp, BinaryOperator, Expr},
        select::JoinClause,
    },
    builder::{JoinPlan, tables::TablePlan},
};

/// How a predicate is attached to the ones before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combine {
    And,
    Or,
}

impl Combine {
    fn operator(self) -> BinaryOperator {
        match self {
            Combine::And => BinaryOperator::And,
            Combine::Or => BinaryOperator::Or,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum WhereNode {
    Predicate(Expr),
    /// Index into the owning group's `groups`.
    Group(usize),
}

/// A parenthesised list of predicates and sub groups.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WhereGroup {
    entries: Vec<(Combine, WhereNode)>,
    groups: Vec<WhereGroup>,
}

impl WhereGroup {
    fn push_group(&mut self, combine: Combine) -> &mut WhereGroup {
        let idx = self.groups.len();
        self.groups.push(WhereGroup::default());
        self.entries.push((combine, WhereNode::Group(idx)));
        &mut self.groups[idx]
    }

    /// Folds the group into a single expression. The combine operator of the
    /// first non-empty entry is ignored; empty sub groups vanish.
    pub fn to_expr(&self) -> Option<Expr> {
        let mut acc: Option<Expr> = None;

        for (combine, node) in &self.entries {
            let expr = match node {
                WhereNode::Predicate(expr) => Some(expr.clone()),
                WhereNode::Group(idx) => self.groups[*idx].to_expr(),
            };
            let Some(expr) = expr else { continue };

            acc = Some(match acc {
                None => expr,
                Some(left) => Expr::BinaryOp(Box::new(BinaryOp {
                    left,
                    op: combine.operator(),
                    right: expr,
                })),
            });
        }

        acc
    }

    pub fn is_empty(&self) -> bool {
        self.to_expr().is_none()
    }
}

/// Adds predicates to one group of a query's WHERE clause.
///
/// Keeps mutable access to the query's tables so column types can plan the
/// joins their predicates need.
pub struct WhereBuilder<'a> {
    tables: &'a mut TablePlan,
    group: &'a mut WhereGroup,
}

impl<'a> WhereBuilder<'a> {
    pub(crate) fn new(tables: &'a mut TablePlan, group: &'a mut WhereGroup) -> Self {
        Self { tables, group }
    }

    pub fn push(&mut self, combine: Combine, expr: Expr) -> &mut Self {
        self.group.entries.push((combine, WhereNode::Predicate(expr)));
        self
    }

    pub fn and(&mut self, expr: Expr) -> &mut Self {
        self.push(Combine::And, expr)
    }

    pub fn or(&mut self, expr: Expr) -> &mut Self {
        self.push(Combine::Or, expr)
    }

    /// Opens a nested group attached with `combine`.
    pub fn sub_group(&mut self, combine: Combine) -> WhereBuilder<'_> {
        WhereBuilder {
            tables: &mut *self.tables,
            group: self.group.push_group(combine),
        }
    }

    pub fn tables(&self) -> &TablePlan {
        &*self.tables
    }

    pub fn tables_mut(&mut self) -> &mut TablePlan {
        &mut *self.tables
    }
}

impl JoinPlan for WhereBuilder<'_> {
    fn joins(&self) -> &[JoinClause] {
        self.tables.joins()
    }
}

#[cfg(test)]
mod tests {
    use model::core::value::Value;

    use super::{Combine, WhereBuilder, WhereGroup};
    use crate::query::{
        builder::tables::TablePlan,
        dialect::Sqlite,
        renderer::{Render, Renderer},
    };
    use crate::{binary, ident, value};

    fn render(group: &WhereGroup) -> (String, Vec<Value>) {
        let mut renderer = Renderer::new(&Sqlite);
        group.to_expr().unwrap().render(&mut renderer);
        renderer.finish()
    }

    #[test]
    fn test_flat_predicates_fold_left() {
        let mut tables = TablePlan::default();
        let mut group = WhereGroup::default();
        let mut add = WhereBuilder::new(&mut tables, &mut group);

        add.and(binary!(ident!("a"), Eq, value!(Value::Int(1))))
            .or(binary!(ident!("b"), Gt, value!(Value::Int(2))));

        let (sql, params) = render(&group);
        assert_eq!(sql, r#"(("a" = ?) OR ("b" > ?))"#);
        assert_eq!(params, vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn test_sub_group_is_parenthesised() {
        let mut tables = TablePlan::default();
        let mut group = WhereGroup::default();
        let mut add = WhereBuilder::new(&mut tables, &mut group);

        add.and(binary!(ident!("latest"), Eq, value!(Value::Int(1))));
        {
            let mut sub = add.sub_group(Combine::And);
            sub.or(binary!(ident!("c"), Eq, value!(Value::from("x"))));
            sub.or(binary!(ident!("c"), Eq, value!(Value::from("y"))));
        }

        let (sql, _) = render(&group);
        assert_eq!(
            sql,
            r#"(("latest" = ?) AND (("c" = ?) OR ("c" = ?)))"#
        );
    }

    #[test]
    fn test_empty_groups_vanish() {
        let mut tables = TablePlan::default();
        let mut group = WhereGroup::default();
        let mut add = WhereBuilder::new(&mut tables, &mut group);

        add.sub_group(Combine::Or);
        assert!(group.is_empty());
    }
}
