// src/query_builders/value.rs
//! Bound query arguments for sqlx

use serde::{Deserialize, Serialize};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};

/// Positional (`?`) argument of a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryArg {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

impl QueryArg {
    pub fn text(s: impl Into<String>) -> Self {
        QueryArg::Text(s.into())
    }

    pub fn integer(n: i64) -> Self {
        QueryArg::Integer(n)
    }
}

/// Binds `args` in order onto `query`
pub fn bind_args<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    args: &'q [QueryArg],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for arg in args {
        query = match arg {
            QueryArg::Text(s) => query.bind(s.as_str()),
            QueryArg::Integer(n) => query.bind(*n),
            QueryArg::Float(n) => query.bind(*n),
            QueryArg::Boolean(b) => query.bind(*b),
            QueryArg::Null => query.bind(Option::<String>::None),
        };
    }
    query
}

// ==================== FROM IMPLEMENTATIONS ====================

impl From<String> for QueryArg {
    fn from(s: String) -> Self {
        QueryArg::Text(s)
    }
}

impl From<&str> for QueryArg {
    fn from(s: &str) -> Self {
        QueryArg::Text(s.to_string())
    }
}

impl From<i64> for QueryArg {
    fn from(n: i64) -> Self {
        QueryArg::Integer(n)
    }
}

impl From<i32> for QueryArg {
    fn from(n: i32) -> Self {
        QueryArg::Integer(n as i64)
    }
}

impl From<f64> for QueryArg {
    fn from(n: f64) -> Self {
        QueryArg::Float(n)
    }
}

impl From<bool> for QueryArg {
    fn from(b: bool) -> Self {
        QueryArg::Boolean(b)
    }
}

impl<T: Into<QueryArg>> From<Option<T>> for QueryArg {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(QueryArg::Null)
    }
}

// ==================== TESTS ====================
