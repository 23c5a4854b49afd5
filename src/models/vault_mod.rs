// src/models/vault_mod.rs
use lazy_static::lazy_static;

use crate::jsonapi::{FieldKind, Record, ResourceSchema, SchemaField};
use crate::models::absolutize;
use crate::query_builders::FieldExpressions;

pub const MAX_PAGE_SIZE: i64 = 1000;

pub const MOD_SCHEMA: ResourceSchema = ResourceSchema::new(
    "mod",
    &[
        SchemaField::new("id", FieldKind::String),
        SchemaField::new("display_name", FieldKind::String),
        SchemaField::new("description", FieldKind::String),
        SchemaField::new("version", FieldKind::Integer),
        SchemaField::new("author", FieldKind::String),
        SchemaField::new("type", FieldKind::String),
        SchemaField::new("create_time", FieldKind::String),
        SchemaField::new("downloads", FieldKind::Integer),
        SchemaField::new("likes", FieldKind::Integer),
        SchemaField::new("times_played", FieldKind::Integer),
        SchemaField::new("is_ranked", FieldKind::Boolean),
        SchemaField::new("download_url", FieldKind::String),
        SchemaField::new("thumbnail_url", FieldKind::String),
    ],
);

/// Newest version of every mod
pub const MOD_TABLE: &str = "\"mod\" m \
    JOIN mod_version v ON m.id = v.mod_id \
    LEFT JOIN mod_stats s ON m.id = s.mod_id \
    JOIN (SELECT mod_id, MAX(version) AS version FROM mod_version GROUP BY mod_id) newest_version \
        ON newest_version.mod_id = m.id AND newest_version.version = v.version";

lazy_static! {
    pub static ref MOD_FIELDS: FieldExpressions = FieldExpressions::from_pairs(&[
        ("id", "v.uid"),
        ("display_name", "m.display_name"),
        ("description", "v.description"),
        ("version", "v.version"),
        ("author", "m.author"),
        ("type", "v.type"),
        ("create_time", "v.create_time"),
        ("downloads", "COALESCE(s.downloads, 0)"),
        ("likes", "COALESCE(s.likes, 0)"),
        ("times_played", "COALESCE(s.times_played, 0)"),
        ("is_ranked", "v.ranked"),
        // Made absolute in enrich_mod
        ("download_url", "v.filename"),
        ("thumbnail_url", "v.icon"),
    ]);
}

pub fn enrich_mod(record: &mut Record, content_url: &str) {
    absolutize(
        record,
        "thumbnail_url",
        &format!("{}/faf/vault/mods_thumbs", content_url),
        true,
        false,
    );
    absolutize(record, "download_url", &format!("{}/faf/vault", content_url), false, true);
}
