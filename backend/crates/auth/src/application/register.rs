//! Register use case.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token_service::TokenService;
use crate::domain::entity::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, PersonName, RawPassword, UserPassword};
use crate::error::{AuthError, AuthResult};

pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug)]
pub struct RegisterOutput {
    pub token: String,
    pub user: User,
}

pub struct RegisterUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
    tokens: Arc<TokenService>,
}

impl<R> RegisterUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>, tokens: Arc<TokenService>) -> Self {
        Self {
            repo,
            config,
            tokens,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let email = Email::new(&input.email)?;
        let first_name = PersonName::new(&input.first_name, "First name")?;
        let last_name = PersonName::new(&input.last_name, "Last name")?;
        let raw_password = RawPassword::new(input.password)?;

        // The unique index still decides races; this only avoids hashing for nothing.
        if self.repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password = UserPassword::from_raw(&raw_password, self.config.pepper())?;

        let user = self
            .repo
            .create(&NewUser {
                email,
                password,
                first_name,
                last_name,
            })
            .await?;

        let token = self.tokens.issue(user.id, user.email.as_str())?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(RegisterOutput { token, user })
    }
}
