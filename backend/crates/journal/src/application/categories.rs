//! Category use cases.

use std::sync::Arc;

use kernel::id::{CategoryId, UserId};

use crate::domain::entities::{Category, Tag};
use crate::domain::repository::JournalRepository;
use crate::domain::services::category_draft;
use crate::error::{JournalError, JournalResult};

#[derive(Debug, Clone, Default)]
pub struct CategoryInput {
    pub name: String,
    pub color: Option<String>,
}

pub struct CategoryService<R>
where
    R: JournalRepository,
{
    repo: Arc<R>,
}

impl<R> CategoryService<R>
where
    R: JournalRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, user_id: UserId) -> JournalResult<Vec<Category>> {
        self.repo.list_categories(user_id).await
    }

    pub async fn get(&self, user_id: UserId, id: CategoryId) -> JournalResult<Category> {
        self.repo
            .find_category(user_id, id)
            .await?
            .ok_or(JournalError::NotFound("Category"))
    }

    pub async fn create(&self, user_id: UserId, input: CategoryInput) -> JournalResult<Category> {
        let draft = category_draft(&input.name, input.color.as_deref())?;
        let category = self.repo.create_category(user_id, &draft).await?;
        tracing::info!(user_id = %user_id, category_id = %category.id, "Category created");
        Ok(category)
    }

    pub async fn update(
        &self,
        user_id: UserId,
        id: CategoryId,
        input: CategoryInput,
    ) -> JournalResult<Category> {
        let draft = category_draft(&input.name, input.color.as_deref())?;
        self.repo
            .update_category(user_id, id, &draft)
            .await?
            .ok_or(JournalError::NotFound("Category"))
    }

    /// Entries in the category survive, uncategorized.
    pub async fn delete(&self, user_id: UserId, id: CategoryId) -> JournalResult<()> {
        if !self.repo.delete_category(user_id, id).await? {
            return Err(JournalError::NotFound("Category"));
        }
        tracing::info!(user_id = %user_id, category_id = %id, "Category deleted");
        Ok(())
    }

    pub async fn tags(&self, user_id: UserId) -> JournalResult<Vec<Tag>> {
        self.repo.list_tags(user_id).await
    }
}
