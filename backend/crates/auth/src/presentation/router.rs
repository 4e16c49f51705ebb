//! Auth router.
//!
//! Paths are relative to the `/api` prefix the binary nests everything under.
//! Register and login carry their own rate-limit layer.

use std::sync::Arc;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use platform::rate_limit::{RateLimitState, RateLimitStore, enforce_rate_limit};

use crate::application::{AuthConfig, TokenService};
use crate::domain::repository::UserRepository;
use crate::infra::postgres::PgUserRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Auth router over PostgreSQL.
pub fn auth_router<S>(
    repo: PgUserRepository,
    config: Arc<AuthConfig>,
    tokens: Arc<TokenService>,
    limiter: Arc<S>,
) -> Router
where
    S: RateLimitStore + Sync + 'static,
{
    auth_router_generic(repo, config, tokens, limiter)
}

/// Auth router for any credential store.
pub fn auth_router_generic<R, S>(
    repo: R,
    config: Arc<AuthConfig>,
    tokens: Arc<TokenService>,
    limiter: Arc<S>,
) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
    S: RateLimitStore + Sync + 'static,
{
    let register_limit = RateLimitState::new(limiter.clone(), config.register_limit)
        .with_store_timeout(config.limiter_timeout);
    let login_limit = RateLimitState::new(limiter, config.login_limit)
        .with_store_timeout(config.limiter_timeout);

    let state = AuthAppState {
        repo: Arc::new(repo),
        config,
        tokens,
    };

    Router::new()
        .route(
            "/auth/register",
            post(handlers::register::<R>)
                .layer(from_fn_with_state(register_limit, enforce_rate_limit::<S>)),
        )
        .route(
            "/auth/login",
            post(handlers::login::<R>)
                .layer(from_fn_with_state(login_limit, enforce_rate_limit::<S>)),
        )
        .route(
            "/user/profile",
            get(handlers::get_profile::<R>).put(handlers::update_profile::<R>),
        )
        .with_state(state)
}
