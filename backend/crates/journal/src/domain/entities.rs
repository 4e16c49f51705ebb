//! Journal entities.

use chrono::{DateTime, Utc};
use kernel::id::{CategoryId, EntryId, TagId, UserId};
use serde::Serialize;

pub const DEFAULT_CATEGORY_COLOR: &str = "#0693E3";
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: EntryId,
    pub user_id: UserId,
    pub category_id: Option<CategoryId>,
    pub title: String,
    pub content: String,
    pub mood: String,
    pub word_count: i32,
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated entry fields for a create or update.
///
/// `tags`: `None` leaves existing associations alone (update) or creates
/// none (create); `Some` replaces them with exactly this set.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub title: String,
    pub content: String,
    pub category_id: Option<CategoryId>,
    pub mood: String,
    pub word_count: i32,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryFilter {
    pub category_id: Option<CategoryId>,
    pub tag_id: Option<TagId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub user_id: UserId,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub color: String,
}

/// Display preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub theme: String,
    pub default_view: String,
    pub date_format: String,
    pub email_notifications: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            default_view: "list".to_string(),
            date_format: "MM/DD/YYYY".to_string(),
            email_notifications: false,
        }
    }
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferencesPatch {
    pub theme: Option<String>,
    pub default_view: Option<String>,
    pub date_format: Option<String>,
    pub email_notifications: Option<bool>,
}

impl Preferences {
    pub fn merged(mut self, patch: PreferencesPatch) -> Self {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(default_view) = patch.default_view {
            self.default_view = default_view;
        }
        if let Some(date_format) = patch.date_format {
            self.date_format = date_format;
        }
        if let Some(email_notifications) = patch.email_notifications {
            self.email_notifications = email_notifications;
        }
        self
    }
}

/// The stored preference row, as returned by the diagnostic endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferencesRecord {
    pub id: i64,
    pub user_id: UserId,
    pub preferences: Preferences,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryStats {
    pub total_entries: i64,
    pub total_words: i64,
    pub avg_words_per_entry: f64,
    pub category_count: i64,
    pub tag_count: i64,
    pub mood_distribution: Vec<MoodCount>,
    pub category_distribution: Vec<CategoryCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoodCount {
    pub mood: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}
