//! Shared kernel for the journal backend.
//!
//! Holds the vocabulary every other crate agrees on:
//! - the boundary error type ([`error::app_error::AppError`]) and its HTTP mapping
//! - typed integer identifiers ([`id::Id`])
//! - page/offset arithmetic for list endpoints
//! - the per-request identity context written by the auth gate

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod context;
pub mod id;
pub mod pagination;
