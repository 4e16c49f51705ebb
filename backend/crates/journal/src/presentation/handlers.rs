//! HTTP handlers. Every route here sits behind the auth gate and takes the
//! caller's [`Identity`].

use std::str::FromStr;
use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::context::Identity;
use kernel::id::{CategoryId, EntryId};
use kernel::pagination::PageRequest;
use serde_json::json;

use crate::application::{CategoryService, EntryService, PreferencesService};
use crate::domain::entities::EntryStats;
use crate::domain::repository::JournalRepository;
use crate::error::{JournalError, JournalResult};
use crate::presentation::dto::{
    CategoryRequest, CategoryResponse, EntryListQuery, EntryListResponse, EntryRequest,
    EntryResponse, PreferencesDebugResponse, PreferencesRequest, PreferencesResponse,
    TagResponse,
};

#[derive(Clone)]
pub struct JournalAppState<R>
where
    R: JournalRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> JournalResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| JournalError::Validation(rejection.body_text()))
}

fn path_id<T: FromStr>(raw: &str, what: &str) -> JournalResult<T> {
    raw.parse()
        .map_err(|_| JournalError::Validation(format!("Invalid {what} ID")))
}

/// POST /api/entries
pub async fn create_entry<R>(
    State(state): State<JournalAppState<R>>,
    identity: Identity,
    payload: Result<Json<EntryRequest>, JsonRejection>,
) -> JournalResult<(StatusCode, Json<EntryResponse>)>
where
    R: JournalRepository + Clone + Send + Sync + 'static,
{
    let req = body(payload)?;
    let entry = EntryService::new(state.repo.clone())
        .create(identity.user_id, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(entry.into())))
}

/// GET /api/entries
pub async fn list_entries<R>(
    State(state): State<JournalAppState<R>>,
    identity: Identity,
    Query(query): Query<EntryListQuery>,
) -> JournalResult<Json<EntryListResponse>>
where
    R: JournalRepository + Clone + Send + Sync + 'static,
{
    let page = PageRequest::from_query(query.page.as_deref(), query.page_size.as_deref());
    let result = EntryService::new(state.repo.clone())
        .list(identity.user_id, query.filter(), page)
        .await?;
    Ok(Json(EntryListResponse {
        entries: result.entries.into_iter().map(EntryResponse::from).collect(),
        total: result.total,
    }))
}

/// GET /api/entries/stats
pub async fn entry_stats<R>(
    State(state): State<JournalAppState<R>>,
    identity: Identity,
) -> JournalResult<Json<EntryStats>>
where
    R: JournalRepository + Clone + Send + Sync + 'static,
{
    let stats = EntryService::new(state.repo.clone())
        .stats(identity.user_id)
        .await?;
    Ok(Json(stats))
}

/// GET /api/entries/{id}
pub async fn get_entry<R>(
    State(state): State<JournalAppState<R>>,
    identity: Identity,
    Path(id): Path<String>,
) -> JournalResult<Json<EntryResponse>>
where
    R: JournalRepository + Clone + Send + Sync + 'static,
{
    let id: EntryId = path_id(&id, "entry")?;
    let entry = EntryService::new(state.repo.clone())
        .get(identity.user_id, id)
        .await?;
    Ok(Json(entry.into()))
}

/// PUT /api/entries/{id}
pub async fn update_entry<R>(
    State(state): State<JournalAppState<R>>,
    identity: Identity,
    Path(id): Path<String>,
    payload: Result<Json<EntryRequest>, JsonRejection>,
) -> JournalResult<Json<EntryResponse>>
where
    R: JournalRepository + Clone + Send + Sync + 'static,
{
    let id: EntryId = path_id(&id, "entry")?;
    let req = body(payload)?;
    let entry = EntryService::new(state.repo.clone())
        .update(identity.user_id, id, req.into())
        .await?;
    Ok(Json(entry.into()))
}

/// DELETE /api/entries/{id}
pub async fn delete_entry<R>(
    State(state): State<JournalAppState<R>>,
    identity: Identity,
    Path(id): Path<String>,
) -> JournalResult<StatusCode>
where
    R: JournalRepository + Clone + Send + Sync + 'static,
{
    let id: EntryId = path_id(&id, "entry")?;
    EntryService::new(state.repo.clone())
        .delete(identity.user_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/categories
pub async fn list_categories<R>(
    State(state): State<JournalAppState<R>>,
    identity: Identity,
) -> JournalResult<Json<Vec<CategoryResponse>>>
where
    R: JournalRepository + Clone + Send + Sync + 'static,
{
    let categories = CategoryService::new(state.repo.clone())
        .list(identity.user_id)
        .await?;
    Ok(Json(
        categories.into_iter().map(CategoryResponse::from).collect(),
    ))
}

/// POST /api/categories
pub async fn create_category<R>(
    State(state): State<JournalAppState<R>>,
    identity: Identity,
    payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> JournalResult<(StatusCode, Json<CategoryResponse>)>
where
    R: JournalRepository + Clone + Send + Sync + 'static,
{
    let req = body(payload)?;
    let category = CategoryService::new(state.repo.clone())
        .create(identity.user_id, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(category.into())))
}

/// GET /api/categories/{id}
pub async fn get_category<R>(
    State(state): State<JournalAppState<R>>,
    identity: Identity,
    Path(id): Path<String>,
) -> JournalResult<Json<CategoryResponse>>
where
    R: JournalRepository + Clone + Send + Sync + 'static,
{
    let id: CategoryId = path_id(&id, "category")?;
    let category = CategoryService::new(state.repo.clone())
        .get(identity.user_id, id)
        .await?;
    Ok(Json(category.into()))
}

/// PUT /api/categories/{id}
pub async fn update_category<R>(
    State(state): State<JournalAppState<R>>,
    identity: Identity,
    Path(id): Path<String>,
    payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> JournalResult<Json<CategoryResponse>>
where
    R: JournalRepository + Clone + Send + Sync + 'static,
{
    let id: CategoryId = path_id(&id, "category")?;
    let req = body(payload)?;
    let category = CategoryService::new(state.repo.clone())
        .update(identity.user_id, id, req.into())
        .await?;
    Ok(Json(category.into()))
}

/// DELETE /api/categories/{id}
pub async fn delete_category<R>(
    State(state): State<JournalAppState<R>>,
    identity: Identity,
    Path(id): Path<String>,
) -> JournalResult<StatusCode>
where
    R: JournalRepository + Clone + Send + Sync + 'static,
{
    let id: CategoryId = path_id(&id, "category")?;
    CategoryService::new(state.repo.clone())
        .delete(identity.user_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/tags
pub async fn list_tags<R>(
    State(state): State<JournalAppState<R>>,
    identity: Identity,
) -> JournalResult<Json<Vec<TagResponse>>>
where
    R: JournalRepository + Clone + Send + Sync + 'static,
{
    let tags = CategoryService::new(state.repo.clone())
        .tags(identity.user_id)
        .await?;
    Ok(Json(tags.into_iter().map(TagResponse::from).collect()))
}

/// GET /api/user/preferences
pub async fn get_preferences<R>(
    State(state): State<JournalAppState<R>>,
    identity: Identity,
) -> JournalResult<Json<PreferencesResponse>>
where
    R: JournalRepository + Clone + Send + Sync + 'static,
{
    let prefs = PreferencesService::new(state.repo.clone())
        .get(identity.user_id)
        .await?;
    Ok(Json(prefs.into()))
}

/// PUT /api/user/preferences
pub async fn update_preferences<R>(
    State(state): State<JournalAppState<R>>,
    identity: Identity,
    payload: Result<Json<PreferencesRequest>, JsonRejection>,
) -> JournalResult<Json<PreferencesResponse>>
where
    R: JournalRepository + Clone + Send + Sync + 'static,
{
    let req = body(payload)?;
    let prefs = PreferencesService::new(state.repo.clone())
        .update(identity.user_id, req.into())
        .await?;
    Ok(Json(prefs.into()))
}

/// GET /api/user/preferences/debug
///
/// Operator diagnostic. Unlike every other handler, a failure here returns
/// the internal error text to the caller.
pub async fn debug_preferences<R>(
    State(state): State<JournalAppState<R>>,
    identity: Identity,
) -> Response
where
    R: JournalRepository + Clone + Send + Sync + 'static,
{
    match PreferencesService::new(state.repo.clone())
        .record(identity.user_id)
        .await
    {
        Ok(record) => Json(PreferencesDebugResponse::from(record)).into_response(),
        Err(e) => {
            tracing::error!(user_id = %identity.user_id, error = %e, "Preferences lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Error retrieving preferences",
                    "userId": identity.user_id,
                    "errorDetail": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}
