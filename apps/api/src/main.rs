//! Quoterun API composition root.

#![forbid(unsafe_code)]

mod dto;
mod error;
mod handlers;
mod state;

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use quoterun_application::{PricingService, RunService, TemplateService};
use quoterun_core::AppError;
use quoterun_infrastructure::{
    PostgresCatalogRepository, PostgresRunRepository, PostgresTemplateRepository,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

    let database_url = required_env("DATABASE_URL")?;
    let frontend_url =
        env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());

    let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
    let api_port = env::var("API_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3001);

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let template_repository = Arc::new(PostgresTemplateRepository::new(pool.clone()));
    let catalog_repository = Arc::new(PostgresCatalogRepository::new(pool.clone()));
    let run_repository = Arc::new(PostgresRunRepository::new(pool.clone()));

    let app_state = AppState {
        template_service: TemplateService::new(template_repository.clone()),
        run_service: RunService::new(template_repository.clone(), run_repository.clone()),
        pricing_service: PricingService::new(
            template_repository,
            catalog_repository,
            run_repository,
        ),
    };

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(&frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    let app = Router::new()
        .route("/api/health", get(handlers::health::health_handler))
        .route(
            "/api/templates",
            get(handlers::templates::list_templates_handler),
        )
        .route(
            "/api/templates/{code}",
            get(handlers::templates::get_template_handler),
        )
        .route("/api/runs", post(handlers::runs::create_run_handler))
        .route(
            "/api/runs/{run_id}",
            get(handlers::runs::get_run_handler).patch(handlers::runs::patch_answers_handler),
        )
        .route(
            "/api/runs/{run_id}/price",
            post(handlers::runs::price_run_handler),
        )
        .route(
            "/api/runs/{run_id}/submit",
            post(handlers::runs::submit_run_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state);

    let host = IpAddr::from_str(&api_host)
        .map_err(|error| AppError::Internal(format!("invalid API_HOST '{api_host}': {error}")))?;
    let address = SocketAddr::from((host, api_port));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "quoterun-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}
