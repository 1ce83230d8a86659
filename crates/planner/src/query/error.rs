use thiserror::Error;

/// Errors raised while planning or assembling a query.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// A join referenced a table alias that is not part of the query.
    #[error("table alias `{0}` does not exist in the query")]
    UnknownAlias(String),

    /// A table alias was registered twice.
    #[error("table alias `{0}` already exists in the query")]
    DuplicateAlias(String),

    /// The primary table was already set.
    #[error("primary table already set to `{0}`")]
    TableAlreadySet(String),

    /// The query has no primary table.
    #[error("query has no FROM table")]
    MissingFrom,

    /// The query selects nothing.
    #[error("query has no select expressions")]
    EmptySelect,

    /// An ORDER BY direction could not be parsed.
    #[error("invalid sort direction: {0}")]
    InvalidDirection(String),
}
