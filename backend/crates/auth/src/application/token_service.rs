//! Stateless session tokens.
//!
//! A token is a compact JWT signed with HS256 under the process-wide secret.
//! Claims: `userId`, `email`, `iat`, `exp` with `exp = iat + token_ttl`.
//! Nothing is stored server-side, so there is no revocation; rotating the
//! secret invalidates every outstanding token.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use kernel::context::Identity;
use kernel::id::UserId;
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub user_id: i64,
    pub email: String,
    /// Issued at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
}

impl SessionClaims {
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: UserId::new(self.user_id),
            email: self.email.clone(),
        }
    }
}

pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked in `verify_at` against an injectable clock.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(&config.token_secret),
            decoding: DecodingKey::from_secret(&config.token_secret),
            validation,
            ttl_secs: config.token_ttl_secs(),
        }
    }

    pub fn issue(&self, user_id: UserId, email: &str) -> AuthResult<String> {
        self.issue_at(user_id, email, Utc::now())
    }

    pub fn issue_at(&self, user_id: UserId, email: &str, now: DateTime<Utc>) -> AuthResult<String> {
        let iat = now.timestamp();
        let claims = SessionClaims {
            user_id: user_id.get(),
            email: email.to_string(),
            iat,
            exp: iat + self.ttl_secs,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("Failed to sign session token: {e}")))
    }

    pub fn verify(&self, token: &str) -> AuthResult<SessionClaims> {
        self.verify_at(token, Utc::now())
    }

    /// Structure, algorithm, signature, then expiry. Every failure is
    /// [`AuthError::InvalidToken`].
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<SessionClaims> {
        let data = decode::<SessionClaims>(token, &self.decoding, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Session token rejected");
            AuthError::InvalidToken
        })?;

        if data.claims.exp <= now.timestamp() {
            tracing::debug!(exp = data.claims.exp, "Session token expired");
            return Err(AuthError::InvalidToken);
        }

        Ok(data.claims)
    }
}
