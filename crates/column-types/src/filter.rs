//! Filter comparators and arguments.

use std::{slice, str::FromStr};

use model::core::value::Value;
use planner::query::ast::expr::BinaryOperator;

use crate::error::TypeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    /// `~`, SQL `LIKE` with `*` as wildcard
    Like,
    /// `!~`
    NotLike,
}

impl Comparator {
    pub fn operator(self) -> BinaryOperator {
        match self {
            Comparator::Eq => BinaryOperator::Eq,
            Comparator::NotEq => BinaryOperator::NotEq,
            Comparator::Lt => BinaryOperator::Lt,
            Comparator::LtEq => BinaryOperator::LtEq,
            Comparator::Gt => BinaryOperator::Gt,
            Comparator::GtEq => BinaryOperator::GtEq,
            Comparator::Like => BinaryOperator::Like,
            Comparator::NotLike => BinaryOperator::NotLike,
        }
    }

    /// `<`, `<=`, `>` and `>=`.
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            Comparator::Lt | Comparator::LtEq | Comparator::Gt | Comparator::GtEq
        )
    }

    pub fn is_pattern(self) -> bool {
        matches!(self, Comparator::Like | Comparator::NotLike)
    }
}

impl FromStr for Comparator {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "=" => Ok(Comparator::Eq),
            "!=" | "<>" => Ok(Comparator::NotEq),
            "<" => Ok(Comparator::Lt),
            "<=" => Ok(Comparator::LtEq),
            ">" => Ok(Comparator::Gt),
            ">=" => Ok(Comparator::GtEq),
            "~" => Ok(Comparator::Like),
            "!~" => Ok(Comparator::NotLike),
            other => Err(TypeError::InvalidComparator(other.to_string())),
        }
    }
}

/// The argument of a filter: one value, or several alternatives.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Single(Value),
    Many(Vec<Value>),
}

impl FilterValue {
    pub fn values(&self) -> &[Value] {
        match self {
            FilterValue::Single(value) => slice::from_ref(value),
            FilterValue::Many(values) => values,
        }
    }
}

impl From<Value> for FilterValue {
    fn from(value: Value) -> Self {
        FilterValue::Single(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Single(Value::from(value))
    }
}

impl From<Vec<Value>> for FilterValue {
    fn from(values: Vec<Value>) -> Self {
        FilterValue::Many(values)
    }
}
