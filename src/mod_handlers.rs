// src/mod_handlers.rs
//! Mod vault endpoints

use actix_web::{web, HttpResponse};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::fetch::FetchQuery;
use crate::jsonapi::JSONAPI_CONTENT_TYPE;
use crate::models::vault_mod::{enrich_mod, MAX_PAGE_SIZE, MOD_FIELDS, MOD_SCHEMA, MOD_TABLE};
use crate::query_builders::{QueryArg, QueryParams};
use crate::AppState;

/// Lists the newest version of every mod that is not hidden
pub async fn get_mods(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<HashMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let params = QueryParams::from(query.into_inner());
    let content_url = app_state.config.content_url();

    let document = FetchQuery::new(&MOD_SCHEMA, MOD_TABLE, &MOD_FIELDS, MAX_PAGE_SIZE, &params)
        .filter("v.hidden = 0", Vec::new())
        .enricher(move |record| enrich_mod(record, content_url))
        .fetch_many(&app_state.db_pool)
        .await?;

    Ok(HttpResponse::Ok()
        .content_type(JSONAPI_CONTENT_TYPE)
        .json(document))
}

pub async fn get_mod(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<HashMap<String, String>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let uid = path.into_inner();
    let params = QueryParams::from(query.into_inner());
    let content_url = app_state.config.content_url();

    let document = FetchQuery::new(&MOD_SCHEMA, MOD_TABLE, &MOD_FIELDS, MAX_PAGE_SIZE, &params)
        .filter("v.uid = ?", vec![QueryArg::text(uid)])
        .enricher(move |record| enrich_mod(record, content_url))
        .fetch_one(&app_state.db_pool)
        .await?;

    if document.is_empty() {
        return Err(ApiError::not_found("mod"));
    }
    Ok(HttpResponse::Ok()
        .content_type(JSONAPI_CONTENT_TYPE)
        .json(document))
}
