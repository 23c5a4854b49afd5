// src/featured_mod_handlers.rs
//! Featured mods and their game files

use actix_web::{web, HttpResponse};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::fetch::FetchQuery;
use crate::jsonapi::JSONAPI_CONTENT_TYPE;
use crate::models::featured_mod::{
    enrich_file, files_folder, files_table, is_plain_identifier, FEATURED_MOD_FIELDS,
    FEATURED_MOD_FILE_SCHEMA, FEATURED_MOD_SCHEMA, FEATURED_MOD_TABLE, FILE_FIELDS,
    MAX_PAGE_SIZE,
};
use crate::query_builders::{QueryArg, QueryParams};
use crate::AppState;

const LATEST_VERSION: &str = "latest";
const DEFAULT_FILE_SORT: &str = "id";

// ==================== FEATURED MODS ====================

pub async fn get_featured_mods(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<HashMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let params = QueryParams::from(query.into_inner());

    let document = FetchQuery::new(
        &FEATURED_MOD_SCHEMA,
        FEATURED_MOD_TABLE,
        &FEATURED_MOD_FIELDS,
        MAX_PAGE_SIZE,
        &params,
    )
    .fetch_many(&app_state.db_pool)
    .await?;

    Ok(HttpResponse::Ok()
        .content_type(JSONAPI_CONTENT_TYPE)
        .json(document))
}

pub async fn get_featured_mod(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<HashMap<String, String>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let mod_id: i64 = path
        .into_inner()
        .parse()
        .map_err(|_| ApiError::not_found("featured mod"))?;
    let params = QueryParams::from(query.into_inner());

    let document = FetchQuery::new(
        &FEATURED_MOD_SCHEMA,
        FEATURED_MOD_TABLE,
        &FEATURED_MOD_FIELDS,
        MAX_PAGE_SIZE,
        &params,
    )
    .filter("id = ?", vec![QueryArg::integer(mod_id)])
    .fetch_one(&app_state.db_pool)
    .await?;

    if document.is_empty() {
        return Err(ApiError::not_found("featured mod"));
    }
    Ok(HttpResponse::Ok()
        .content_type(JSONAPI_CONTENT_TYPE)
        .json(document))
}

// ==================== FILES ====================

/// Technical name of the featured mod with `id`
async fn technical_name(app_state: &AppState, id: &str) -> ApiResult<String> {
    let unknown = || ApiError::UnknownFeaturedMod(id.to_string());
    let mod_id: i64 = id.parse().map_err(|_| unknown())?;

    let name: Option<(String,)> = sqlx::query_as("SELECT gamemod FROM game_featuredMods WHERE id = ?")
        .bind(mod_id)
        .fetch_optional(&app_state.db_pool)
        .await?;

    let (name,) = name.ok_or_else(unknown)?;
    if !is_plain_identifier(&name) {
        log::error!("Featured mod {} has an unusable technical name: {:?}", id, name);
        return Err(ApiError::InternalServerError(format!("Invalid technical name: {}", name)));
    }
    Ok(name)
}

async fn featured_mod_files(
    app_state: &AppState,
    params: &QueryParams,
    id: &str,
    version: &str,
) -> ApiResult<HttpResponse> {
    let name = technical_name(app_state, id).await?;
    let table = files_table(&name);
    let folder = files_folder(&name);
    let content_url = app_state.config.content_url();

    // The updater needs the complete manifest in a stable order
    let mut fetch = FetchQuery::new(
        &FEATURED_MOD_FILE_SCHEMA,
        &table,
        &FILE_FIELDS,
        MAX_PAGE_SIZE,
        params,
    )
    .sort(params.sort().unwrap_or(DEFAULT_FILE_SORT))
    .without_pagination()
    .enricher(|record| enrich_file(record, content_url, &folder));

    if version != LATEST_VERSION {
        let version: i64 = version
            .parse()
            .map_err(|_| ApiError::BadRequest(format!("Invalid version: {}", version)))?;
        fetch = fetch
            .where_extension("AND u.version <= ?")
            .args(vec![QueryArg::integer(version)]);
    }

    let document = fetch.fetch_many(&app_state.db_pool).await?;
    Ok(HttpResponse::Ok()
        .content_type(JSONAPI_CONTENT_TYPE)
        .json(document))
}

pub async fn get_featured_mod_files_latest(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<HashMap<String, String>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let params = QueryParams::from(query.into_inner());
    featured_mod_files(&app_state, &params, &path.into_inner(), LATEST_VERSION).await
}

pub async fn get_featured_mod_files(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<HashMap<String, String>>,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (id, version) = path.into_inner();
    let params = QueryParams::from(query.into_inner());
    featured_mod_files(&app_state, &params, &id, &version).await
}

// ==================== TESTS ====================
