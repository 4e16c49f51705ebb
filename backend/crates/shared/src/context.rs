//! Request-scoped identity.
//!
//! The auth gate verifies the bearer token and inserts a [`RequestContext`]
//! into the request extensions. Handlers take an [`Identity`] argument;
//! extraction fails with 401 when the gate did not run or found no identity.

use crate::id::UserId;

/// The verified caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
}

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub identity: Option<Identity>,
}

impl RequestContext {
    pub fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

#[cfg(feature = "axum")]
mod extract {
    use axum::extract::FromRequestParts;
    use http::request::Parts;

    use super::{Identity, RequestContext};
    use crate::error::app_error::AppError;

    impl<S> FromRequestParts<S> for Identity
    where
        S: Send + Sync,
    {
        type Rejection = AppError;

        async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
            parts
                .extensions
                .get::<RequestContext>()
                .and_then(|ctx| ctx.identity.clone())
                .ok_or_else(|| AppError::unauthorized("Authentication required"))
        }
    }
}
