// src/models/map.rs
use lazy_static::lazy_static;

use crate::jsonapi::{FieldKind, Record, ResourceSchema, SchemaField};
use crate::models::absolutize;
use crate::query_builders::FieldExpressions;

pub const MAX_PAGE_SIZE: i64 = 1000;

pub const MAP_SCHEMA: ResourceSchema = ResourceSchema::new(
    "map",
    &[
        SchemaField::new("id", FieldKind::String),
        SchemaField::new("display_name", FieldKind::String),
        SchemaField::new("description", FieldKind::String),
        SchemaField::new("max_players", FieldKind::Integer),
        SchemaField::new("map_type", FieldKind::String),
        SchemaField::new("battle_type", FieldKind::String),
        SchemaField::new("width", FieldKind::Integer),
        SchemaField::new("height", FieldKind::Integer),
        SchemaField::new("author", FieldKind::String),
        SchemaField::new("version", FieldKind::Integer),
        SchemaField::new("ranked", FieldKind::Boolean),
        SchemaField::new("download_url", FieldKind::String),
        SchemaField::new("thumbnail_url_small", FieldKind::String),
        SchemaField::new("thumbnail_url_large", FieldKind::String),
        SchemaField::new("folder_name", FieldKind::String),
        SchemaField::new("downloads", FieldKind::Integer),
        SchemaField::new("num_draws", FieldKind::Integer),
        SchemaField::new("rating", FieldKind::Float),
        SchemaField::new("times_played", FieldKind::Integer),
        SchemaField::new("create_time", FieldKind::String),
    ],
);

pub const MAP_TABLE: &str = "map \
    LEFT JOIN table_map_features features ON features.map_id = map.id \
    JOIN map_version version ON version.map_id = map.id \
    LEFT JOIN login l ON l.id = map.author";

pub const LADDER_MAP_TABLE: &str = "map \
    LEFT JOIN table_map_features features ON features.map_id = map.id \
    JOIN map_version version ON version.map_id = map.id \
    LEFT JOIN login l ON l.id = map.author \
    JOIN ladder_map ON map.id = ladder_map.idmap";

lazy_static! {
    pub static ref MAP_FIELDS: FieldExpressions = FieldExpressions::from_pairs(&[
        ("id", "version.id"),
        ("display_name", "map.display_name"),
        ("description", "version.description"),
        ("max_players", "version.max_players"),
        ("map_type", "map.map_type"),
        ("battle_type", "map.battle_type"),
        ("width", "version.width"),
        ("height", "version.height"),
        ("author", "l.login"),
        ("version", "version.version"),
        ("ranked", "CASE WHEN version.ranked > 0 THEN 1 ELSE 0 END"),
        // Made absolute in enrich_map
        ("download_url", "version.filename"),
        ("thumbnail_url_small", "REPLACE(REPLACE(version.filename, '.zip', '.png'), 'maps/', '')"),
        ("thumbnail_url_large", "REPLACE(REPLACE(version.filename, '.zip', '.png'), 'maps/', '')"),
        ("folder_name", "REPLACE(REPLACE(version.filename, 'maps/', ''), '.zip', '')"),
        ("downloads", "COALESCE(features.downloads, 0)"),
        ("num_draws", "COALESCE(features.num_draws, 0)"),
        ("rating", "features.rating"),
        ("times_played", "COALESCE(features.times_played, 0)"),
        ("create_time", "version.create_time"),
    ]);
}

/// File name stored for a map folder name
pub fn filename_for_folder(folder_name: &str) -> String {
    format!("maps/{}.zip", folder_name)
}

/// Turns stored file names into content URLs
pub fn enrich_map(record: &mut Record, content_url: &str) {
    absolutize(
        record,
        "thumbnail_url_small",
        &format!("{}/faf/vault/map_previews/small", content_url),
        true,
        true,
    );
    absolutize(
        record,
        "thumbnail_url_large",
        &format!("{}/faf/vault/map_previews/large", content_url),
        true,
        true,
    );
    absolutize(record, "download_url", &format!("{}/faf/vault", content_url), false, true);
}
