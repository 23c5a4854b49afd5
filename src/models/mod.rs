// src/models/mod.rs
//! Vault resources: field maps, FROM expressions, schemas and enrichers

pub mod clan;
pub mod featured_mod;
pub mod map;
pub mod vault_mod;

use serde_json::Value;

use crate::jsonapi::Record;

// ==================== CONTENT URLS ====================

/// Percent-encodes every path segment, keeping `/`
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Rewrites `record[field]` as `{base}/{encoded value}`.
///
/// With `drop_empty` a null or empty value removes the field instead.
pub fn absolutize(record: &mut Record, field: &str, base: &str, drop_empty: bool, encode: bool) {
    let value = match record.get(field) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Null) | Some(Value::String(_)) if drop_empty => {
            record.remove(field);
            return;
        }
        _ => return,
    };

    let path = if encode { encode_path(&value) } else { value };
    record.insert(field.to_string(), Value::String(format!("{}/{}", base, path)));
}

// ==================== TESTS ====================
