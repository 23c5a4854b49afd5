// src/jsonapi.rs
//! JSON-API documents and the schemas that dump records into them

use serde::Serialize;
use serde_json::{Map, Number, Value};

/// Media type of every document this service answers with
pub const JSONAPI_CONTENT_TYPE: &str = "application/vnd.api+json";

/// A fetched row keyed by field name
pub type Record = Map<String, Value>;

// ==================== SCHEMA ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Float,
    Boolean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaField {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl SchemaField {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// Describes how records of one resource type are dumped.
///
/// Only declared fields end up in `attributes`, fields missing from a
/// record are left out. `id` is never an attribute here; it goes to the
/// resource's top-level `id` as a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSchema {
    pub resource_type: &'static str,
    pub fields: &'static [SchemaField],
}

impl ResourceSchema {
    pub const fn new(resource_type: &'static str, fields: &'static [SchemaField]) -> Self {
        Self { resource_type, fields }
    }

    pub fn dump(&self, record: &Record) -> Resource {
        let id = record.get("id").and_then(id_string);

        let mut attributes = Map::new();
        for field in self.fields {
            if field.name == "id" {
                continue;
            }
            if let Some(value) = record.get(field.name) {
                attributes.insert(field.name.to_string(), coerce(value, field.kind));
            }
        }

        Resource {
            resource_type: self.resource_type.to_string(),
            id,
            attributes,
        }
    }

    pub fn dump_one(&self, record: Option<&Record>) -> Document {
        Document {
            data: PrimaryData::Single(record.map(|r| self.dump(r))),
        }
    }

    pub fn dump_many(&self, records: &[Record]) -> Document {
        Document {
            data: PrimaryData::Many(records.iter().map(|r| self.dump(r)).collect()),
        }
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn coerce(value: &Value, kind: FieldKind) -> Value {
    if value.is_null() {
        return Value::Null;
    }

    match kind {
        FieldKind::String => match value {
            Value::String(_) => value.clone(),
            other => Value::String(other.to_string()),
        },
        FieldKind::Integer => match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => value.clone(),
            Value::Number(n) => n.as_f64().map(|f| Value::from(f as i64)).unwrap_or(Value::Null),
            Value::String(s) => s.trim().parse::<i64>().map(Value::from).unwrap_or(Value::Null),
            Value::Bool(b) => Value::from(*b as i64),
            _ => Value::Null,
        },
        FieldKind::Float => match value {
            Value::Number(n) => n
                .as_f64()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            _ => Value::Null,
        },
        FieldKind::Boolean => match value {
            Value::Bool(_) => value.clone(),
            Value::Number(n) => Value::Bool(n.as_f64().map(|f| f != 0.0).unwrap_or(false)),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Value::Bool(true),
                "false" | "0" => Value::Bool(false),
                _ => Value::Null,
            },
            _ => Value::Null,
        },
    }
}

// ==================== DOCUMENT ====================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PrimaryData {
    /// `null` when the lookup matched nothing
    Single(Option<Resource>),
    Many(Vec<Resource>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub data: PrimaryData,
}

impl Document {
    #[cfg(test)]
    pub fn resources(&self) -> Vec<&Resource> {
        match &self.data {
            PrimaryData::Single(resource) => resource.iter().collect(),
            PrimaryData::Many(resources) => resources.iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match &self.data {
            PrimaryData::Single(resource) => resource.is_none(),
            PrimaryData::Many(resources) => resources.is_empty(),
        }
    }

    /// Copies every resource's top-level `id` into its `attributes`
    pub fn copy_ids_into_attributes(&mut self) {
        let resources: Vec<&mut Resource> = match &mut self.data {
            PrimaryData::Single(resource) => resource.iter_mut().collect(),
            PrimaryData::Many(resources) => resources.iter_mut().collect(),
        };

        for resource in resources {
            if let Some(id) = &resource.id {
                resource.attributes.insert("id".to_string(), Value::String(id.clone()));
            }
        }
    }
}

// ==================== TESTS ====================
