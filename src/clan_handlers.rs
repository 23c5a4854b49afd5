// src/clan_handlers.rs
use actix_web::{web, HttpResponse};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ApiResult;
use crate::fetch::FetchQuery;
use crate::jsonapi::JSONAPI_CONTENT_TYPE;
use crate::models::clan::{clan_nested_fields, CLAN_FIELDS, CLAN_SCHEMA, CLAN_TABLE, MAX_PAGE_SIZE};
use crate::query_builders::QueryParams;
use crate::AppState;

pub async fn get_clans(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<HashMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let params = QueryParams::from(query.into_inner());

    let fetch = clan_nested_fields().into_iter().fold(
        FetchQuery::new(&CLAN_SCHEMA, CLAN_TABLE, &CLAN_FIELDS, MAX_PAGE_SIZE, &params),
        |fetch, group| fetch.nested(group),
    );

    let document = fetch.fetch_many(&app_state.db_pool).await?;
    Ok(HttpResponse::Ok()
        .content_type(JSONAPI_CONTENT_TYPE)
        .json(document))
}
