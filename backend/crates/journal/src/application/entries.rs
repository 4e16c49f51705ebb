//! Entry use cases.

use std::sync::Arc;

use kernel::id::{CategoryId, EntryId, UserId};
use kernel::pagination::PageRequest;

use crate::domain::entities::{Entry, EntryDraft, EntryFilter, EntryStats};
use crate::domain::repository::JournalRepository;
use crate::domain::services::{
    MOOD_MAX_LENGTH, TITLE_MAX_LENGTH, count_words, normalize_tag_names, optional_text,
    required_text, with_average,
};
use crate::error::{JournalError, JournalResult};

/// Unvalidated entry fields from a create or update request.
#[derive(Debug, Clone, Default)]
pub struct EntryInput {
    pub title: String,
    pub content: String,
    pub category_id: Option<CategoryId>,
    pub mood: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct EntryPage {
    pub entries: Vec<Entry>,
    pub total: i64,
}

pub struct EntryService<R>
where
    R: JournalRepository,
{
    repo: Arc<R>,
}

impl<R> EntryService<R>
where
    R: JournalRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, user_id: UserId, input: EntryInput) -> JournalResult<Entry> {
        let draft = self.draft(user_id, input).await?;
        let entry = self.repo.create_entry(user_id, &draft).await?;
        tracing::info!(user_id = %user_id, entry_id = %entry.id, "Entry created");
        Ok(entry)
    }

    pub async fn list(
        &self,
        user_id: UserId,
        filter: EntryFilter,
        page: PageRequest,
    ) -> JournalResult<EntryPage> {
        let (entries, total) = self.repo.list_entries(user_id, filter, page).await?;
        Ok(EntryPage { entries, total })
    }

    pub async fn get(&self, user_id: UserId, id: EntryId) -> JournalResult<Entry> {
        self.repo
            .find_entry(user_id, id)
            .await?
            .ok_or(JournalError::NotFound("Entry"))
    }

    pub async fn update(
        &self,
        user_id: UserId,
        id: EntryId,
        input: EntryInput,
    ) -> JournalResult<Entry> {
        let draft = self.draft(user_id, input).await?;
        let entry = self
            .repo
            .update_entry(user_id, id, &draft)
            .await?
            .ok_or(JournalError::NotFound("Entry"))?;
        tracing::info!(user_id = %user_id, entry_id = %id, "Entry updated");
        Ok(entry)
    }

    pub async fn delete(&self, user_id: UserId, id: EntryId) -> JournalResult<()> {
        if !self.repo.delete_entry(user_id, id).await? {
            return Err(JournalError::NotFound("Entry"));
        }
        tracing::info!(user_id = %user_id, entry_id = %id, "Entry deleted");
        Ok(())
    }

    pub async fn stats(&self, user_id: UserId) -> JournalResult<EntryStats> {
        Ok(with_average(self.repo.entry_stats(user_id).await?))
    }

    async fn draft(&self, user_id: UserId, input: EntryInput) -> JournalResult<EntryDraft> {
        let title = required_text(&input.title, "Title", Some(TITLE_MAX_LENGTH))?;
        let content = required_text(&input.content, "Content", None)?;
        let mood = optional_text(input.mood.as_deref(), "Mood", MOOD_MAX_LENGTH)?;
        let tags = input.tags.map(normalize_tag_names).transpose()?;

        if let Some(category_id) = input.category_id {
            if self.repo.find_category(user_id, category_id).await?.is_none() {
                return Err(JournalError::Validation("Category not found".to_string()));
            }
        }

        Ok(EntryDraft {
            word_count: count_words(&content),
            title,
            content,
            category_id: input.category_id,
            mood,
            tags,
        })
    }
}
