//! Auth application configuration.
//!
//! Built once at startup and shared read-only through `Arc<AuthConfig>`.

use std::fmt;
use std::time::Duration;

use platform::rate_limit::{DEFAULT_STORE_TIMEOUT, TokenBucketPolicy};

/// Minimum accepted length of the token signing secret, in bytes.
pub const MIN_TOKEN_SECRET_LEN: usize = 32;

#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing secret for session tokens.
    pub token_secret: Vec<u8>,
    /// Session token lifetime (24 hours).
    pub token_ttl: Duration,
    /// Application-wide secret appended to passwords before hashing.
    pub password_pepper: Option<Vec<u8>>,
    pub login_limit: TokenBucketPolicy,
    pub register_limit: TokenBucketPolicy,
    /// Bound on one rate-limit store call before failing open.
    pub limiter_timeout: Duration,
}

impl AuthConfig {
    pub fn new(token_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            token_secret: token_secret.into(),
            token_ttl: Duration::from_secs(24 * 60 * 60),
            password_pepper: None,
            login_limit: TokenBucketPolicy::login(),
            register_limit: TokenBucketPolicy::register(),
            limiter_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    /// Random signing secret. Tokens do not survive a restart.
    pub fn development() -> Self {
        Self::new(platform::crypto::random_bytes(MIN_TOKEN_SECRET_LEN * 2))
    }

    pub fn with_pepper(mut self, pepper: impl Into<Vec<u8>>) -> Self {
        self.password_pepper = Some(pepper.into());
        self
    }

    pub fn with_limiter_timeout(mut self, timeout: Duration) -> Self {
        self.limiter_timeout = timeout;
        self
    }

    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    pub fn token_ttl_secs(&self) -> i64 {
        self.token_ttl.as_secs() as i64
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .field("login_limit", &self.login_limit)
            .field("register_limit", &self.register_limit)
            .field("limiter_timeout", &self.limiter_timeout)
            .finish()
    }
}
