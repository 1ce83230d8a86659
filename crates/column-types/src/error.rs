use planner::query::error::QueryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypeError {
    /// A join column's target schema is not joined into the current query.
    #[error(
        "select the lookup column before using join: schema `{schema}` is not joined into the query (needed for field `{field}`)"
    )]
    UnresolvedJoin { schema: String, field: String },

    /// The configured lookup target does not exist in the registry.
    #[error("lookup target `{schema}.{field}` does not exist")]
    MissingTargetColumn { schema: String, field: String },

    /// Planning the query failed.
    #[error("query error: {0}")]
    Query(#[from] QueryError),

    #[error("invalid comparator: {0}")]
    InvalidComparator(String),

    #[error("invalid type configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
