// src/query_builders/pagination.rs
//! Page-based pagination from `page[size]` / `page[number]`

use crate::error::QueryError;
use crate::query_builders::params::QueryParams;

/// Validated page request. Page numbers are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    pub number: i64,
    pub size: i64,
}

impl PageSpec {
    /// Validates raw parameter values. Absent values default to page 1 of `max_page_size`.
    pub fn resolve(
        raw_size: Option<&str>,
        raw_number: Option<&str>,
        max_page_size: i64,
    ) -> Result<Self, QueryError> {
        let size = match raw_size {
            None => max_page_size,
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(size) if (1..=max_page_size).contains(&size) => size,
                _ => return Err(QueryError::InvalidPageSize(raw.to_string())),
            },
        };

        let number = match raw_number {
            None => 1,
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(number) if number >= 1 => number,
                _ => return Err(QueryError::InvalidPageNumber(raw.to_string())),
            },
        };

        let spec = Self { number, size };
        match (spec.checked_offset(), raw_number) {
            (None, Some(raw)) => Err(QueryError::InvalidPageNumber(raw.to_string())),
            _ => Ok(spec),
        }
    }

    /// Reads and validates the page parameters of a request
    pub fn from_params(params: &QueryParams, max_page_size: i64) -> Result<Self, QueryError> {
        Self::resolve(params.page_size(), params.page_number(), max_page_size)
    }

    fn checked_offset(&self) -> Option<i64> {
        (self.number - 1).checked_mul(self.size)
    }

    pub fn offset(&self) -> i64 {
        self.checked_offset().unwrap_or(i64::MAX)
    }

    pub fn limit(&self) -> i64 {
        self.size
    }

    /// `LIMIT offset, count`
    pub fn to_sql(&self) -> String {
        format!("LIMIT {}, {}", self.offset(), self.limit())
    }
}

// ==================== TESTS ====================
