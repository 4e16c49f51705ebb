//! Authentication for the journal backend.
//!
//! Layered like the other feature crates:
//! - `domain/` - user entity, value objects, repository trait
//! - `application/` - register/login/profile use cases, token service
//! - `infra/` - PostgreSQL credential store
//! - `presentation/` - handlers, DTOs, router, auth gate
//!
//! ## Security model
//! - Passwords hashed with Argon2id (see `platform::password`)
//! - Stateless HS256 session tokens, 24h lifetime, no server-side sessions
//! - Login and register are rate limited per client (token bucket, fails open)
//! - Every other `/api` route requires `Authorization: Bearer <token>`

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


pub use application::config::AuthConfig;
pub use application::token_service::{SessionClaims, TokenService};
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgUserRepository;
pub use presentation::middleware::{AuthGateState, require_bearer_token};
pub use presentation::router::{auth_router, auth_router_generic};
