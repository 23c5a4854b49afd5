// src/query_builders/params.rs
//! JSON-API query string parameters

use std::collections::HashMap;

/// Raw query string of a request, keyed by the literal parameter name (`fields[map]`, `page[size]`, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    values: HashMap<String, String>,
}

impl QueryParams {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    #[cfg(test)]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            values: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Sparse fieldset for `resource_type`, `None` if absent or empty
    pub fn fields(&self, resource_type: &str) -> Option<Vec<&str>> {
        self.get(&format!("fields[{}]", resource_type))
            .filter(|v| !v.is_empty())
            .map(|v| v.split(',').collect())
    }

    pub fn sort(&self) -> Option<&str> {
        self.get("sort")
    }

    pub fn page_size(&self) -> Option<&str> {
        self.get("page[size]")
    }

    pub fn page_number(&self) -> Option<&str> {
        self.get("page[number]")
    }

    /// `filter[name]`, ignoring empty values
    pub fn filter(&self, name: &str) -> Option<&str> {
        self.get(&format!("filter[{}]", name)).filter(|v| !v.is_empty())
    }
}

impl From<HashMap<String, String>> for QueryParams {
    fn from(values: HashMap<String, String>) -> Self {
        Self::new(values)
    }
}

// ==================== TESTS ====================
