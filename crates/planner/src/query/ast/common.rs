//! Defines common, reusable AST nodes for building SQL queries.

use std::str::FromStr;

use crate::query::error::QueryError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub schema: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinKind {
    /// Whether rows of the preserved side survive without a match.
    pub fn is_outer(&self) -> bool {
        !matches!(self, JoinKind::Inner)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDir {
    Asc,
    Desc,
}

impl FromStr for OrderDir {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(OrderDir::Asc),
            "desc" | "descending" => Ok(OrderDir::Desc),
            other => Err(QueryError::InvalidDirection(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{JoinKind, OrderDir};

    #[test]
    fn test_parse_order_dir() {
        assert_eq!("DESC".parse::<OrderDir>().unwrap(), OrderDir::Desc);
        assert_eq!("descending".parse::<OrderDir>().unwrap(), OrderDir::Desc);
        assert_eq!(" asc ".parse::<OrderDir>().unwrap(), OrderDir::Asc);
        assert!("sideways".parse::<OrderDir>().is_err());
    }

    #[test]
    fn test_outer_joins() {
        assert!(JoinKind::Left.is_outer());
        assert!(JoinKind::Full.is_outer());
        assert!(!JoinKind::Inner.is_outer());
    }
}
