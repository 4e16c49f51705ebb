//! Presentation layer: handlers, DTOs and the router.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::JournalAppState;
pub use router::{journal_router, journal_router_generic};
