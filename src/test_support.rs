// src/test_support.rs
//! In-memory vault database and request helpers shared by handler tests

use actix_web::dev::ServiceResponse;
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::config::Config;
use crate::AppState;

const SCHEMA: &[&str] = &[
    "CREATE TABLE login (id INTEGER PRIMARY KEY, login TEXT NOT NULL)",
    "CREATE TABLE map (id INTEGER PRIMARY KEY, display_name TEXT, map_type TEXT, battle_type TEXT, author INTEGER)",
    "CREATE TABLE map_version (id INTEGER PRIMARY KEY, map_id INTEGER, description TEXT, max_players INTEGER, \
        width INTEGER, height INTEGER, version INTEGER, ranked INTEGER, filename TEXT, create_time TEXT)",
    "CREATE TABLE table_map_features (map_id INTEGER, downloads INTEGER, num_draws INTEGER, rating REAL, times_played INTEGER)",
    "CREATE TABLE ladder_map (idmap INTEGER)",
    "CREATE TABLE \"mod\" (id INTEGER PRIMARY KEY, display_name TEXT, author TEXT)",
    "CREATE TABLE mod_version (id INTEGER PRIMARY KEY, mod_id INTEGER, uid TEXT, description TEXT, version INTEGER, \
        type TEXT, create_time TEXT, ranked INTEGER, hidden INTEGER, filename TEXT, icon TEXT)",
    "CREATE TABLE mod_stats (mod_id INTEGER, downloads INTEGER, likes INTEGER, times_played INTEGER)",
    "CREATE TABLE game_featuredMods (id INTEGER PRIMARY KEY, gamemod TEXT, name TEXT, description TEXT, \
        publish INTEGER, \"order\" INTEGER, git_url TEXT, git_branch TEXT)",
    "CREATE TABLE updates_faf (id INTEGER PRIMARY KEY, filename TEXT, path TEXT)",
    "CREATE TABLE updates_faf_files (id INTEGER PRIMARY KEY, fileId INTEGER, version INTEGER, name TEXT, md5 TEXT)",
    "CREATE TABLE clan_list (clan_id INTEGER PRIMARY KEY, status INTEGER, clan_name TEXT, clan_tag TEXT, \
        clan_desc TEXT, clan_leader_id INTEGER, clan_founder_id INTEGER, create_date TEXT)",
    "CREATE TABLE clan_members (clan_id INTEGER, player_id INTEGER)",
];

const SEED: &[&str] = &[
    "INSERT INTO login (id, login) VALUES (1, 'Alice'), (2, 'Bob')",
    "INSERT INTO map (id, display_name, map_type, battle_type, author) VALUES \
        (1, 'SCMP_001', 'skirmish', 'FFA', 1), \
        (2, 'Setons Clutch', 'skirmish', 'FFA', 2)",
    "INSERT INTO map_version (id, map_id, description, max_players, width, height, version, ranked, filename, create_time) VALUES \
        (11, 1, 'Burial Mounds', 8, 1024, 1024, 1, 1, 'maps/scmp_001.v0001.zip', '2016-01-01 10:00:00'), \
        (12, 2, 'Water and land', 8, 1024, 1024, 2, 0, 'maps/setons clutch.v0002.zip', '2016-02-01 10:00:00')",
    "INSERT INTO table_map_features (map_id, downloads, num_draws, rating, times_played) VALUES (1, 10, 2, 4.5, 30)",
    "INSERT INTO ladder_map (idmap) VALUES (1)",
    "INSERT INTO \"mod\" (id, display_name, author) VALUES (1, 'Mod A', 'Alice'), (2, 'Secret', 'Bob')",
    "INSERT INTO mod_version (id, mod_id, uid, description, version, type, create_time, ranked, hidden, filename, icon) VALUES \
        (1, 1, 'uid-a1', 'First', 1, 'UI', '2016-01-01', 0, 0, 'mods/mod a.v0001.zip', ''), \
        (2, 1, 'uid-a2', 'Second', 2, 'UI', '2016-02-01', 1, 0, 'mods/mod a.v0002.zip', 'mod_a.png'), \
        (3, 2, 'uid-s1', 'Hidden', 1, 'SIM', '2016-03-01', 0, 1, 'mods/secret.v0001.zip', NULL)",
    "INSERT INTO mod_stats (mod_id, downloads, likes, times_played) VALUES (1, 5, 3, 7)",
    "INSERT INTO game_featuredMods (id, gamemod, name, description, publish, \"order\", git_url, git_branch) VALUES \
        (1, 'faf', 'FA Forever', '<html>Description</html>', 1, 1, 'https://github.com/FAForever/fa.git', 'master'), \
        (2, 'fafbeta', 'FA Forever Beta', '<html>Description</html>', 1, 2, 'https://github.com/FAForever/fa.git', 'fafbeta'), \
        (3, 'ladder1v1', 'Ladder', '', 0, 3, NULL, NULL)",
    "INSERT INTO updates_faf (id, filename, path) VALUES \
        (1, 'ForgedAlliance.exe', 'bin'), (11, 'effects.nx2', 'gamedata'), (12, 'env.nx2', 'gamedata')",
    "INSERT INTO updates_faf_files (id, fileId, version, name, md5) VALUES \
        (711, 1, 3658, 'ForgedAlliance.3658.exe', '2cd7784fb131ea4955e992cfee8ca9b8'), \
        (745, 1, 3659, 'ForgedAlliance.3659.exe', 'ee2df6c3cb80dc8258428e8fa092bce1'), \
        (710, 11, 3657, 'effects_0.3657.nxt', 'edd083b3dc54ec79c354be2b845f25ee'), \
        (723, 11, 3658, 'effects_0.3658.nxt', '3758baad77531dd5323c766433412e91'), \
        (734, 11, 3659, 'effects_0.3659.nxt', '3758baad77531dd5323c766433412e91'), \
        (680, 12, 3656, 'env_0.3656.nxt', '32a50729cb5155ec679771f38a151d29')",
    "INSERT INTO clan_list (clan_id, status, clan_name, clan_tag, clan_desc, clan_leader_id, clan_founder_id, create_date) VALUES \
        (1, 1, 'First Clan', 'FC', 'The first', 1, 2, '2016-01-01'), \
        (2, 1, 'Second Clan', 'SC', 'The second', 2, 2, '2016-02-01')",
    "INSERT INTO clan_members (clan_id, player_id) VALUES (1, 1), (1, 2), (2, 2)",
];

pub async fn seeded_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    for statement in SCHEMA.iter().chain(SEED) {
        sqlx::query(statement).execute(&pool).await.unwrap();
    }
    pool
}

pub async fn app_state() -> Arc<AppState> {
    Arc::new(AppState {
        db_pool: seeded_pool().await,
        config: Config::default(),
    })
}

/// Sends a GET through the full route table and returns status and JSON body
async fn get(uri: &str) -> ServiceResponse {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state().await))
            .configure(crate::configure_routes),
    )
    .await;

    test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await
}

pub async fn get_json(uri: &str) -> (StatusCode, Value) {
    let response = get(uri).await;
    let status = response.status();
    let body: Value = test::read_body_json(response).await;
    (status, body)
}

/// Status and `Content-Type` header of a GET
pub async fn get_content_type(uri: &str) -> (StatusCode, Option<String>) {
    let response = get(uri).await;
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    (response.status(), content_type)
}

/// `attributes[field]` of every resource in a many document
pub fn column(body: &Value, field: &str) -> Vec<Value> {
    body["data"]
        .as_array()
        .map(|resources| resources.iter().map(|r| r["attributes"][field].clone()).collect())
        .unwrap_or_default()
}
