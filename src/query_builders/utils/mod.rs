// src/query_builders/utils/mod.rs
//! Identifier quoting and query-string helpers

// ==================== IDENTIFIERS ====================

/// Quotes an identifier for SQLite: `name` -> `"name"`, embedded quotes doubled
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Reverse of [`quote_identifier`]. Returns `None` if `quoted` is not a quoted identifier.
#[cfg(test)]
pub fn unquote_identifier(quoted: &str) -> Option<String> {
    let inner = quoted.strip_prefix('"')?.strip_suffix('"')?;

    // A lone quote inside must have been doubled
    if inner.replace("\"\"", "").contains('"') {
        return None;
    }
    Some(inner.replace("\"\"", "\""))
}

// ==================== LISTS ====================

/// Splits a comma separated parameter value, keeping empty tokens
#[inline]
pub fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',')
}

// ==================== TESTS ====================
