//! Request/response bodies.

use chrono::{DateTime, Utc};
use kernel::id::{CategoryId, EntryId, TagId, UserId};
use serde::{Deserialize, Serialize};

use crate::application::{CategoryInput, EntryInput};
use crate::domain::entities::{
    Category, Entry, EntryFilter, Preferences, PreferencesPatch, PreferencesRecord, Tag,
};

/// Body of `POST /entries` and `PUT /entries/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub mood: Option<String>,
    /// Absent keeps the entry's tags on update; present replaces them.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl From<EntryRequest> for EntryInput {
    fn from(req: EntryRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            category_id: req.category_id,
            mood: req.mood,
            tags: req.tags,
        }
    }
}

/// Raw list query. Values that do not parse are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryListQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub category_id: Option<String>,
    pub tag_id: Option<String>,
}

impl EntryListQuery {
    pub fn filter(&self) -> EntryFilter {
        EntryFilter {
            category_id: self
                .category_id
                .as_deref()
                .and_then(|v| v.trim().parse().ok()),
            tag_id: self.tag_id.as_deref().and_then(|v| v.trim().parse().ok()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryResponse {
    pub id: EntryId,
    pub title: String,
    pub content: String,
    pub category_id: Option<CategoryId>,
    pub mood: String,
    pub word_count: i32,
    pub tags: Vec<TagResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Entry> for EntryResponse {
    fn from(entry: Entry) -> Self {
        Self {
            id: entry.id,
            title: entry.title,
            content: entry.content,
            category_id: entry.category_id,
            mood: entry.mood,
            word_count: entry.word_count,
            tags: entry.tags.into_iter().map(TagResponse::from).collect(),
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryListResponse {
    pub entries: Vec<EntryResponse>,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagResponse {
    pub id: TagId,
    pub name: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl From<CategoryRequest> for CategoryInput {
    fn from(req: CategoryRequest) -> Self {
        Self {
            name: req.name,
            color: req.color,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    pub id: CategoryId,
    pub name: String,
    pub color: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            color: category.color,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesRequest {
    pub theme: Option<String>,
    pub default_view: Option<String>,
    pub date_format: Option<String>,
    pub email_notifications: Option<bool>,
}

impl From<PreferencesRequest> for PreferencesPatch {
    fn from(req: PreferencesRequest) -> Self {
        Self {
            theme: req.theme,
            default_view: req.default_view,
            date_format: req.date_format,
            email_notifications: req.email_notifications,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesResponse {
    pub theme: String,
    pub default_view: String,
    pub date_format: String,
    pub email_notifications: bool,
}

impl From<Preferences> for PreferencesResponse {
    fn from(prefs: Preferences) -> Self {
        Self {
            theme: prefs.theme,
            default_view: prefs.default_view,
            date_format: prefs.date_format,
            email_notifications: prefs.email_notifications,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesDebugResponse {
    pub id: i64,
    pub user_id: UserId,
    pub theme: String,
    pub default_view: String,
    pub date_format: String,
    pub email_notifications: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PreferencesRecord> for PreferencesDebugResponse {
    fn from(record: PreferencesRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            theme: record.preferences.theme,
            default_view: record.preferences.default_view,
            date_format: record.preferences.date_format,
            email_notifications: record.preferences.email_notifications,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
