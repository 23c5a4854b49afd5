// src/map_handlers.rs
//! Map vault endpoints

use actix_web::{web, HttpResponse};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::fetch::FetchQuery;
use crate::jsonapi::JSONAPI_CONTENT_TYPE;
use crate::models::map::{
    enrich_map, filename_for_folder, LADDER_MAP_TABLE, MAP_FIELDS, MAP_SCHEMA, MAP_TABLE,
    MAX_PAGE_SIZE,
};
use crate::query_builders::{QueryArg, QueryParams};
use crate::AppState;

// ==================== LIST MAPS ====================

pub async fn get_maps(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<HashMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let params = QueryParams::from(query.into_inner());
    let content_url = app_state.config.content_url();

    let mut fetch = FetchQuery::new(&MAP_SCHEMA, MAP_TABLE, &MAP_FIELDS, MAX_PAGE_SIZE, &params)
        .enricher(move |record| enrich_map(record, content_url));

    if let Some(folder_name) = params.filter("folder_name") {
        fetch = fetch.filter(
            "version.filename = ?",
            vec![QueryArg::text(filename_for_folder(folder_name))],
        );
    }

    let document = fetch.fetch_many(&app_state.db_pool).await?;
    Ok(HttpResponse::Ok()
        .content_type(JSONAPI_CONTENT_TYPE)
        .json(document))
}

// ==================== LADDER POOL ====================

pub async fn get_ladder_maps(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<HashMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let params = QueryParams::from(query.into_inner());
    let content_url = app_state.config.content_url();

    let document =
        FetchQuery::new(&MAP_SCHEMA, LADDER_MAP_TABLE, &MAP_FIELDS, MAX_PAGE_SIZE, &params)
            .enricher(move |record| enrich_map(record, content_url))
            .fetch_many(&app_state.db_pool)
            .await?;

    Ok(HttpResponse::Ok()
        .content_type(JSONAPI_CONTENT_TYPE)
        .json(document))
}

// ==================== GET MAP BY ID ====================

pub async fn get_map(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<HashMap<String, String>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let map_id: i64 = path
        .into_inner()
        .parse()
        .map_err(|_| ApiError::not_found("map"))?;

    let params = QueryParams::from(query.into_inner());
    let content_url = app_state.config.content_url();

    let document = FetchQuery::new(&MAP_SCHEMA, MAP_TABLE, &MAP_FIELDS, MAX_PAGE_SIZE, &params)
        .filter("version.id = ?", vec![QueryArg::integer(map_id)])
        .enricher(move |record| enrich_map(record, content_url))
        .fetch_one(&app_state.db_pool)
        .await?;

    if document.is_empty() {
        return Err(ApiError::not_found("map"));
    }
    Ok(HttpResponse::Ok()
        .content_type(JSONAPI_CONTENT_TYPE)
        .json(document))
}

// ==================== TESTS ====================
