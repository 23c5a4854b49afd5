// src/query_builders/fields.rs
//! Field expression maps and select-list generation

use crate::query_builders::utils::quote_identifier;

// ==================== FIELD EXPRESSIONS ====================

/// Ordered mapping of API field name -> SQL select expression.
///
/// Expressions must not carry their own `AS` clause, the alias is
/// appended from the field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldExpressions {
    entries: Vec<(String, String)>,
}

impl FieldExpressions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from `(field, expression)` pairs, keeping their order
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut map = Self::new();
        for (field, expression) in pairs {
            map.insert(*field, *expression);
        }
        map
    }

    /// Inserts a field. An existing field keeps its position and gets the new expression.
    pub fn insert(&mut self, field: impl Into<String>, expression: impl Into<String>) {
        let field = field.into();
        let expression = expression.into();
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => entry.1 = expression,
            None => self.entries.push((field, expression)),
        }
    }

    /// Merges `other` into `self` with `other` winning on conflicts
    pub fn extend(&mut self, other: &FieldExpressions) {
        for (field, expression) in &other.entries {
            self.insert(field.as_str(), expression.as_str());
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, e)| e.as_str())
    }

    #[inline]
    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(f, _)| f.as_str())
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

// ==================== NESTED EXPRESSIONS ====================

/// Named group of fields. Requesting `name` in a sparse fieldset selects every field of the group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedExpressions {
    pub name: String,
    pub fields: FieldExpressions,
}

impl NestedExpressions {
    pub fn new(name: impl Into<String>, fields: FieldExpressions) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

// ==================== SELECT LIST ====================

/// Builds `expr AS "field", ...` for the requested fields found in `expressions`.
///
/// Unknown fields are skipped and duplicates are selected once. An empty
/// `fields` selects everything in map order.
pub fn select_expressions<S: AsRef<str>>(fields: &[S], expressions: &FieldExpressions) -> String {
    let mut selected: Vec<&str> = Vec::with_capacity(fields.len());

    if fields.is_empty() {
        selected.extend(expressions.fields());
    } else {
        for field in fields {
            let field = field.as_ref();
            if expressions.contains(field) && !selected.contains(&field) {
                selected.push(field);
            }
        }
    }

    selected
        .iter()
        .filter_map(|field| {
            expressions
                .get(field)
                .map(|expression| format!("{} AS {}", expression, quote_identifier(field)))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

// ==================== TESTS ====================
