//! Snapshot of the joins a query has planned so far.

use planner::query::{ast::common::JoinKind, builder::JoinPlan};

use crate::schema::DATA_TABLE_PREFIX;

/// One joined table, as seen by the alias resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinDescriptor<'a> {
    pub kind: JoinKind,
    pub table: &'a str,
    pub alias: &'a str,
}

impl<'a> JoinDescriptor<'a> {
    /// The schema stored in the joined table, if it is a data table.
    pub fn schema(&self) -> Option<&'a str> {
        self.table
            .strip_prefix(DATA_TABLE_PREFIX)
            .filter(|schema| !schema.is_empty())
    }
}

/// The joins of `plan`, in the order they were added.
pub fn current_joins<P: JoinPlan + ?Sized>(plan: &P) -> Vec<JoinDescriptor<'_>> {
    plan.joins()
        .iter()
        .map(|join| JoinDescriptor {
            kind: join.kind,
            table: &join.table.name,
            alias: join.reference_name(),
        })
        .collect()
}
