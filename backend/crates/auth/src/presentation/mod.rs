//! Presentation layer: handlers, DTOs, router and the auth gate.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{AuthGateState, EXEMPT_PATHS, require_bearer_token};
pub use router::{auth_router, auth_router_generic};
