// src/query_builders/sort.rs
//! JSON-API sort expressions (`likes,-timestamp`) -> ORDER BY

use crate::error::QueryError;
use crate::query_builders::utils::{quote_identifier, split_list};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Parsed sort expression, in client order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    columns: Vec<(String, SortOrder)>,
}

impl SortSpec {
    /// Parses `expression` and checks every column against `valid_fields`.
    ///
    /// Empty tokens and a lone `-` are ignored.
    pub fn parse<S: AsRef<str>>(expression: &str, valid_fields: &[S]) -> Result<Self, QueryError> {
        let mut columns = Vec::new();

        for token in split_list(expression) {
            if token.is_empty() || token == "-" {
                continue;
            }

            let (column, order) = match token.strip_prefix('-') {
                Some(column) => (column, SortOrder::Desc),
                None => (token, SortOrder::Asc),
            };

            if !valid_fields.iter().any(|f| f.as_ref() == column) {
                return Err(QueryError::InvalidSortField(column.to_string()));
            }

            columns.push((column.to_string(), order));
        }

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[(String, SortOrder)] {
        &self.columns
    }

    /// `ORDER BY "a" ASC, "b" DESC`, or an empty string when nothing is sorted
    pub fn to_sql(&self) -> String {
        if self.columns().is_empty() {
            return String::new();
        }

        let parts: Vec<String> = self
            .columns()
            .iter()
            .map(|(column, order)| format!("{} {}", quote_identifier(column), order.to_sql()))
            .collect();

        format!("ORDER BY {}", parts.join(", "))
    }
}

/// Compiles `expression` straight to an ORDER BY fragment
pub fn order_by<S: AsRef<str>>(expression: &str, valid_fields: &[S]) -> Result<String, QueryError> {
    Ok(SortSpec::parse(expression, valid_fields)?.to_sql())
}

// ==================== TESTS ====================
