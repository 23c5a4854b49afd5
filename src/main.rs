// src/main.rs
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpResponse, HttpServer};
use anyhow::Context;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod clan_handlers;
mod config;
mod db;
mod error;
mod featured_mod_handlers;
mod fetch;
mod jsonapi;
mod map_handlers;
mod mod_handlers;
mod models;
pub mod query_builders;

#[cfg(test)]
mod test_support;

use config::{load_config, Config};

pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Config,
}

/// Registers every vault route. `/maps/ladder1v1` must precede `/maps/{id}`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(|| async { HttpResponse::Ok().body("OK") }))
        .service(
            web::scope("/maps")
                .route("", web::get().to(map_handlers::get_maps))
                .route("/ladder1v1", web::get().to(map_handlers::get_ladder_maps))
                .route("/{id}", web::get().to(map_handlers::get_map)),
        )
        .service(
            web::scope("/mods")
                .route("", web::get().to(mod_handlers::get_mods))
                .route("/{uid}", web::get().to(mod_handlers::get_mod)),
        )
        .service(
            web::scope("/featured_mods")
                .route("", web::get().to(featured_mod_handlers::get_featured_mods))
                .route("/{id}", web::get().to(featured_mod_handlers::get_featured_mod))
                .route(
                    "/{id}/files",
                    web::get().to(featured_mod_handlers::get_featured_mod_files_latest),
                )
                .route(
                    "/{id}/files/{version}",
                    web::get().to(featured_mod_handlers::get_featured_mod_files),
                ),
        )
        .service(web::scope("/clans").route("", web::get().to(clan_handlers::get_clans)));
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    setup_logging(&config)?;
    config.print_startup_info();

    let pool = db::create_pool(&config.database)
        .await
        .context("Failed to create database pool")?;

    let app_state = Arc::new(AppState {
        db_pool: pool,
        config: config.clone(),
    });

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    log::info!("Starting server at http://{}", bind_address);

    let allowed_origins = config.security.allowed_origins.clone();
    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(setup_cors(&allowed_origins))
            .wrap(Logger::default())
            .app_data(web::Data::new(app_state.clone()))
            .configure(configure_routes)
    })
    .keep_alive(Duration::from_secs(config.server.keep_alive));

    if let Some(workers) = config.server.workers {
        server = server.workers(workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    Ok(())
}

/// Read-only API: GET from the configured origins, or from anywhere with `*`
fn setup_cors(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    if allowed_origins.iter().any(|origin| origin == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in allowed_origins.iter().filter(|origin| !origin.is_empty()) {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}

fn setup_logging(config: &Config) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.logging.level.as_str()));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}
