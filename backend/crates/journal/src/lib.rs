//! Journal entries, categories, tags, preferences and statistics.
//!
//! Same layering as `auth`:
//! - `domain/` - entities, pure rules (word count, tag normalisation), store trait
//! - `application/` - entry, category and preference services
//! - `infra/` - PostgreSQL store
//! - `presentation/` - handlers, DTOs, router
//!
//! All data is scoped to the authenticated user. Rows owned by another user
//! are reported as not found.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

pub use error::{JournalError, JournalResult};
pub use infra::postgres::PgJournalRepository;
pub use presentation::router::{journal_router, journal_router_generic};
