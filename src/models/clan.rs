// src/models/clan.rs
use lazy_static::lazy_static;

use crate::jsonapi::{FieldKind, ResourceSchema, SchemaField};
use crate::query_builders::{FieldExpressions, NestedExpressions};

pub const MAX_PAGE_SIZE: i64 = 10000;

pub const CLAN_SCHEMA: ResourceSchema = ResourceSchema::new(
    "clan",
    &[
        SchemaField::new("id", FieldKind::String),
        SchemaField::new("clan_id", FieldKind::Integer),
        SchemaField::new("status", FieldKind::Integer),
        SchemaField::new("clan_name", FieldKind::String),
        SchemaField::new("clan_tag", FieldKind::String),
        SchemaField::new("clan_desc", FieldKind::String),
        SchemaField::new("create_date", FieldKind::String),
        SchemaField::new("member_count", FieldKind::Integer),
        SchemaField::new("clan_leader_id", FieldKind::Integer),
        SchemaField::new("leader_name", FieldKind::String),
        SchemaField::new("clan_founder_id", FieldKind::Integer),
        SchemaField::new("founder_name", FieldKind::String),
    ],
);

pub const CLAN_TABLE: &str = "clan_list \
    LEFT JOIN login leader ON leader.id = clan_list.clan_leader_id \
    LEFT JOIN login founder ON founder.id = clan_list.clan_founder_id";

lazy_static! {
    pub static ref CLAN_FIELDS: FieldExpressions = FieldExpressions::from_pairs(&[
        ("id", "clan_list.clan_id"),
        ("clan_id", "clan_list.clan_id"),
        ("status", "clan_list.status"),
        ("clan_name", "clan_list.clan_name"),
        ("clan_tag", "clan_list.clan_tag"),
        ("clan_desc", "clan_list.clan_desc"),
        ("create_date", "clan_list.create_date"),
        (
            "member_count",
            "(SELECT COUNT(*) FROM clan_members WHERE clan_members.clan_id = clan_list.clan_id)",
        ),
    ]);
}

/// `leader` and `founder` groups, selectable by group name in `fields[clan]`
pub fn clan_nested_fields() -> Vec<NestedExpressions> {
    vec![
        NestedExpressions::new(
            "leader",
            FieldExpressions::from_pairs(&[
                ("clan_leader_id", "clan_list.clan_leader_id"),
                ("leader_name", "leader.login"),
            ]),
        ),
        NestedExpressions::new(
            "founder",
            FieldExpressions::from_pairs(&[
                ("clan_founder_id", "clan_list.clan_founder_id"),
                ("founder_name", "founder.login"),
            ]),
        ),
    ]
}
