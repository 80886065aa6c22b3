mod config;
mod db;
mod distribution;
mod error;
mod services;
mod state;

use crate::config::ServerConfig;
use crate::db::SqliteStore;
use crate::state::AppState;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpResponse, HttpServer};
use common::responses::MessageResponse;
use env_logger::Env;
use log::info;
use std::io;

async fn route_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(MessageResponse::new("Route not found"))
}

/// Builds the application with every route mounted. Used by `main` and by
/// the HTTP tests, so both exercise the same wiring.
pub(crate) fn build_app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(Logger::default())
        .app_data(
            web::JsonConfig::default()
                .limit(1024 * 1024) // 1 MB
                .error_handler(error::json_error_handler),
        )
        .app_data(web::Data::new(state))
        .service(services::health::configure_routes())
        .service(services::agents::configure_routes())
        .service(services::list::configure_routes())
        .default_service(web::route().to(route_not_found))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config =
        ServerConfig::load().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let store = SqliteStore::open(&config.database_path).map_err(io::Error::other)?;
    let state = AppState::new(store, config.clone());

    info!(
        "Server running at http://{}:{} (environment: {}, database: {})",
        config.host, config.port, config.environment, config.database_path
    );

    HttpServer::new(move || build_app(state.clone()))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}
