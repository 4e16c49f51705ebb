//! axum middleware enforcing a [`TokenBucketPolicy`] per client and route.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json,
    body::Body,
    extract::{ConnectInfo, OriginalUri, State},
    http::{Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{RateLimitError, RateLimitStore, TokenBucketPolicy, bucket_key, unix_now};
use crate::client::client_key;

pub const RATE_LIMITED_MESSAGE: &str = "Too many requests. Please try again later.";

/// Default bound on a single store round trip.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_millis(500);

/// Per-route middleware state.
pub struct RateLimitState<S> {
    pub store: Arc<S>,
    pub policy: TokenBucketPolicy,
    pub store_timeout: Duration,
}

impl<S> RateLimitState<S> {
    pub fn new(store: Arc<S>, policy: TokenBucketPolicy) -> Self {
        Self {
            store,
            policy,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }
}

impl<S> Clone for RateLimitState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            policy: self.policy,
            store_timeout: self.store_timeout,
        }
    }
}

/// Deny with 429 once the caller's bucket for this route is empty.
///
/// The bucket key uses the full request path, also when the route is
/// mounted under a nested router. Store errors and timeouts allow the request.
pub async fn enforce_rate_limit<S>(
    State(state): State<RateLimitState<S>>,
    req: Request<Body>,
    next: Next,
) -> Response
where
    S: RateLimitStore + Sync + 'static,
{
    let route = req
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.path().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let direct_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let client = client_key(req.headers(), direct_ip);
    let key = bucket_key(&client, &route);

    let checked = tokio::time::timeout(
        state.store_timeout,
        state.store.is_limited(&key, &state.policy, unix_now()),
    )
    .await
    .unwrap_or(Err(RateLimitError::Timeout(state.store_timeout)));

    match checked {
        Ok(true) => {
            tracing::warn!(client = %client, route = %route, "Rate limit exceeded");
            return rate_limited_response();
        }
        Ok(false) => {}
        Err(e) => {
            tracing::warn!(error = %e, key = %key, "Rate limit check failed, allowing request");
        }
    }

    next.run(req).await
}

fn rate_limited_response() -> Response {
    (
        StatusCode::TOO_MANY_REQUESTS,
        [(header::RETRY_AFTER, "1")],
        Json(serde_json::json!({ "error": RATE_LIMITED_MESSAGE })),
    )
        .into_response()
}
