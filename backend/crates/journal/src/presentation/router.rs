//! Journal router. Paths are relative to `/api`; the binary applies the
//! auth gate around it.

use std::sync::Arc;

use axum::{Router, routing::get};

use crate::domain::repository::JournalRepository;
use crate::infra::postgres::PgJournalRepository;
use crate::presentation::handlers::{self, JournalAppState};

pub fn journal_router(repo: PgJournalRepository) -> Router {
    journal_router_generic(repo)
}

pub fn journal_router_generic<R>(repo: R) -> Router
where
    R: JournalRepository + Clone + Send + Sync + 'static,
{
    let state = JournalAppState {
        repo: Arc::new(repo),
    };

    Router::new()
        .route(
            "/entries",
            get(handlers::list_entries::<R>).post(handlers::create_entry::<R>),
        )
        .route("/entries/stats", get(handlers::entry_stats::<R>))
        .route(
            "/entries/{id}",
            get(handlers::get_entry::<R>)
                .put(handlers::update_entry::<R>)
                .delete(handlers::delete_entry::<R>),
        )
        .route(
            "/categories",
            get(handlers::list_categories::<R>).post(handlers::create_category::<R>),
        )
        .route(
            "/categories/{id}",
            get(handlers::get_category::<R>)
                .put(handlers::update_category::<R>)
                .delete(handlers::delete_category::<R>),
        )
        .route("/tags", get(handlers::list_tags::<R>))
        .route(
            "/user/preferences",
            get(handlers::get_preferences::<R>).put(handlers::update_preferences::<R>),
        )
        .route(
            "/user/preferences/debug",
            get(handlers::debug_preferences::<R>),
        )
        .with_state(state)
}
