pub mod filter;
pub mod query;
pub mod tables;

use crate::query::ast::select::JoinClause;

/// Read-only view of the joins planned so far, in the order they were added.
pub trait JoinPlan {
    fn joins(&self) -> &[JoinClause];
}
