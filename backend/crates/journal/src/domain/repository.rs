//! Journal store interface. Implemented in `infra`.
//!
//! Every method is scoped by the owning user; a row owned by someone else
//! behaves exactly like a missing row.

use kernel::id::{CategoryId, EntryId, UserId};
use kernel::pagination::PageRequest;

use crate::domain::entities::{
    Category, CategoryDraft, Entry, EntryDraft, EntryFilter, EntryStats, Preferences,
    PreferencesRecord, Tag,
};
use crate::error::JournalResult;

#[trait_variant::make(JournalRepository: Send)]
pub trait LocalJournalRepository {
    /// Insert the entry, upsert its tags and link them, atomically.
    async fn create_entry(&self, user_id: UserId, draft: &EntryDraft) -> JournalResult<Entry>;

    /// Newest first, plus the total matching the filter.
    async fn list_entries(
        &self,
        user_id: UserId,
        filter: EntryFilter,
        page: PageRequest,
    ) -> JournalResult<(Vec<Entry>, i64)>;

    async fn find_entry(&self, user_id: UserId, id: EntryId) -> JournalResult<Option<Entry>>;

    /// `None` when the entry is missing or not owned.
    async fn update_entry(
        &self,
        user_id: UserId,
        id: EntryId,
        draft: &EntryDraft,
    ) -> JournalResult<Option<Entry>>;

    /// `false` when nothing was deleted.
    async fn delete_entry(&self, user_id: UserId, id: EntryId) -> JournalResult<bool>;

    /// Raw aggregates; the average is derived by the caller.
    async fn entry_stats(&self, user_id: UserId) -> JournalResult<EntryStats>;

    async fn list_categories(&self, user_id: UserId) -> JournalResult<Vec<Category>>;

    async fn find_category(
        &self,
        user_id: UserId,
        id: CategoryId,
    ) -> JournalResult<Option<Category>>;

    async fn create_category(
        &self,
        user_id: UserId,
        draft: &CategoryDraft,
    ) -> JournalResult<Category>;

    async fn update_category(
        &self,
        user_id: UserId,
        id: CategoryId,
        draft: &CategoryDraft,
    ) -> JournalResult<Option<Category>>;

    /// Detach the category from the user's entries, then delete it.
    async fn delete_category(&self, user_id: UserId, id: CategoryId) -> JournalResult<bool>;

    async fn list_tags(&self, user_id: UserId) -> JournalResult<Vec<Tag>>;

    async fn find_preferences(&self, user_id: UserId) -> JournalResult<Option<Preferences>>;

    /// Insert or overwrite the user's preference row.
    async fn save_preferences(
        &self,
        user_id: UserId,
        preferences: &Preferences,
    ) -> JournalResult<Preferences>;

    async fn preferences_record(
        &self,
        user_id: UserId,
    ) -> JournalResult<Option<PreferencesRecord>>;
}
