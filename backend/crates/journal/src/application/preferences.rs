//! Display preferences.

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entities::{Preferences, PreferencesPatch, PreferencesRecord};
use crate::domain::repository::JournalRepository;
use crate::error::{JournalError, JournalResult};

pub struct PreferencesService<R>
where
    R: JournalRepository,
{
    repo: Arc<R>,
}

impl<R> PreferencesService<R>
where
    R: JournalRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Defaults when the user has no stored row.
    pub async fn get(&self, user_id: UserId) -> JournalResult<Preferences> {
        Ok(self
            .repo
            .find_preferences(user_id)
            .await?
            .unwrap_or_default())
    }

    pub async fn update(
        &self,
        user_id: UserId,
        patch: PreferencesPatch,
    ) -> JournalResult<Preferences> {
        let merged = self.get(user_id).await?.merged(patch);
        let saved = self.repo.save_preferences(user_id, &merged).await?;
        tracing::info!(user_id = %user_id, "Preferences updated");
        Ok(saved)
    }

    /// The stored row as-is. A missing row is an error here, not defaults.
    pub async fn record(&self, user_id: UserId) -> JournalResult<PreferencesRecord> {
        self.repo
            .preferences_record(user_id)
            .await?
            .ok_or_else(|| JournalError::Internal("no preferences row for user".to_string()))
    }
}
