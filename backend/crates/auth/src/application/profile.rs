//! Profile read/update for the authenticated user.

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::PersonName;
use crate::error::{AuthError, AuthResult};

pub struct UpdateProfileInput {
    pub first_name: String,
    pub last_name: String,
}

pub struct ProfileUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> ProfileUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, user_id: UserId) -> AuthResult<User> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    pub async fn update(&self, user_id: UserId, input: UpdateProfileInput) -> AuthResult<User> {
        let first_name = PersonName::new(&input.first_name, "First name")?;
        let last_name = PersonName::new(&input.last_name, "Last name")?;

        let user = self
            .repo
            .update_profile(user_id, &first_name, &last_name)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        tracing::info!(user_id = %user_id, "Profile updated");
        Ok(user)
    }
}
