//! API server entry point.
//!
//! Startup failures use `anyhow`; request-level errors go through
//! `kernel::error::AppError`.

mod config;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use auth::{AuthGateState, PgUserRepository, TokenService, auth_router, require_bearer_token};
use axum::{Router, middleware::from_fn_with_state, routing::get};
use journal::{PgJournalRepository, journal_router};
use platform::rate_limit::RedisRateLimitStore;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,journal=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let limiter = Arc::new(RedisRateLimitStore::connect(&config.redis_url).await?);

    tracing::info!("Connected to rate limit store");

    let auth_config = Arc::new(config.auth);
    let tokens = Arc::new(TokenService::new(&auth_config));

    let api = auth_router(
        PgUserRepository::new(pool.clone()),
        auth_config,
        tokens.clone(),
        limiter,
    )
    .merge(journal_router(PgJournalRepository::new(pool)));

    // The gate covers every route, `/health` too; only login and register are exempt.
    let app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/api", api)
        .layer(from_fn_with_state(
            AuthGateState { tokens },
            require_bearer_token,
        ))
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
