//! Auth gate.
//!
//! Wraps the whole router, `/health` included. Exempt paths pass through untouched;
//! everything else needs `Authorization: Bearer <token>` with a valid session
//! token, and gets a [`RequestContext`] carrying the verified identity.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{OriginalUri, State};
use axum::http::{HeaderValue, Request, header};
use axum::middleware::Next;
use axum::response::Response;
use kernel::context::RequestContext;

use crate::application::TokenService;
use crate::error::{AuthError, AuthResult};

/// Matched exactly against the full request path.
pub const EXEMPT_PATHS: &[&str] = &["/api/auth/login", "/api/auth/register"];

#[derive(Clone)]
pub struct AuthGateState {
    pub tokens: Arc<TokenService>,
}

pub async fn require_bearer_token(
    State(state): State<AuthGateState>,
    mut req: Request<Body>,
    next: Next,
) -> AuthResult<Response> {
    let path = req
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.path().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    if EXEMPT_PATHS.contains(&path.as_str()) {
        return Ok(next.run(req).await);
    }

    let claims = {
        let value = req
            .headers()
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?;
        let token = bearer_token(value)?;
        state.tokens.verify(token)?
    };

    req.extensions_mut()
        .insert(RequestContext::authenticated(claims.identity()));

    Ok(next.run(req).await)
}

/// Exactly two space-separated parts, the first being the literal `Bearer`.
pub fn bearer_token(value: &HeaderValue) -> AuthResult<&str> {
    let value = value
        .to_str()
        .map_err(|_| AuthError::MalformedAuthorization)?;

    if value.is_empty() {
        return Err(AuthError::MissingToken);
    }

    match value.split(' ').collect::<Vec<_>>().as_slice() {
        ["Bearer", token] => Ok(token),
        _ => Err(AuthError::MalformedAuthorization),
    }
}
