// src/models/featured_mod.rs
use lazy_static::lazy_static;

use crate::jsonapi::{FieldKind, Record, ResourceSchema, SchemaField};
use crate::models::absolutize;
use crate::query_builders::FieldExpressions;

pub const MAX_PAGE_SIZE: i64 = 1000;

pub const FEATURED_MOD_SCHEMA: ResourceSchema = ResourceSchema::new(
    "featured_mod",
    &[
        SchemaField::new("id", FieldKind::String),
        SchemaField::new("technical_name", FieldKind::String),
        SchemaField::new("display_name", FieldKind::String),
        SchemaField::new("description", FieldKind::String),
        SchemaField::new("visible", FieldKind::Boolean),
        SchemaField::new("display_order", FieldKind::Integer),
        SchemaField::new("git_url", FieldKind::String),
        SchemaField::new("git_branch", FieldKind::String),
    ],
);

pub const FEATURED_MOD_FILE_SCHEMA: ResourceSchema = ResourceSchema::new(
    "featured_mod_file",
    &[
        SchemaField::new("id", FieldKind::String),
        SchemaField::new("version", FieldKind::Integer),
        SchemaField::new("group", FieldKind::String),
        SchemaField::new("name", FieldKind::String),
        SchemaField::new("md5", FieldKind::String),
        SchemaField::new("url", FieldKind::String),
    ],
);

pub const FEATURED_MOD_TABLE: &str = "game_featuredMods";

lazy_static! {
    pub static ref FEATURED_MOD_FIELDS: FieldExpressions = FieldExpressions::from_pairs(&[
        ("id", "id"),
        ("technical_name", "gamemod"),
        ("display_name", "name"),
        ("description", "description"),
        ("visible", "publish"),
        ("display_order", "\"order\""),
        ("git_url", "git_url"),
        ("git_branch", "git_branch"),
    ]);

    pub static ref FILE_FIELDS: FieldExpressions = FieldExpressions::from_pairs(&[
        ("id", "u.id"),
        ("version", "u.version"),
        ("group", "b.path"),
        ("name", "b.filename"),
        ("md5", "u.md5"),
        // Made absolute in enrich_file
        ("url", "u.name"),
    ]);
}

/// Technical name whose update tables hold the files of `technical_name`
pub fn files_mod_name(technical_name: &str) -> &str {
    if technical_name == "ladder1v1" {
        "faf"
    } else {
        technical_name
    }
}

/// Folder (and table prefix) holding the files of a featured mod
pub fn files_folder(technical_name: &str) -> String {
    format!("updates_{}_files", files_mod_name(technical_name))
}

/// Latest version of every file. `technical_name` becomes part of table
/// names and must be a plain identifier, see [`is_plain_identifier`].
pub fn files_table(technical_name: &str) -> String {
    let name = files_mod_name(technical_name);
    format!(
        "updates_{0}_files u \
         LEFT JOIN updates_{0}_files u2 ON u.fileId = u2.fileId AND u.version < u2.version \
         LEFT JOIN updates_{0} b ON b.id = u.fileId \
         WHERE u2.version IS NULL",
        name
    )
}

pub fn is_plain_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn enrich_file(record: &mut Record, content_url: &str, files_folder: &str) {
    absolutize(
        record,
        "url",
        &format!("{}/faf/updaterNew/{}", content_url, files_folder),
        false,
        true,
    );
}
