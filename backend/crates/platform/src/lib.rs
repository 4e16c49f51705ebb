//! Platform crate: technical building blocks shared by the feature crates.
//!
//! - Password hashing (Argon2id)
//! - Client identification from request headers
//! - Token-bucket rate limiting (Redis and in-memory stores, axum middleware)
//! - Random secrets and base64 helpers

pub mod client;
pub mod crypto;
pub mod password;
pub mod rate_limit;
