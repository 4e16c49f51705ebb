//! Login use case.
//!
//! Unknown email and wrong password produce the same error and cost the
//! same hashing work.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::AuthConfig;
use crate::application::token_service::TokenService;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, RawPassword};
use crate::error::{AuthError, AuthResult};

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub token: String,
    pub user_id: UserId,
}

pub struct LoginUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
    tokens: Arc<TokenService>,
}

impl<R> LoginUseCase<R>
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

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let password = RawPassword::for_login(input.password);
        let pepper = self.config.pepper();

        let user = match Email::new(&input.email) {
            Ok(email) => self.repo.find_by_email(&email).await?,
            Err(_) => None,
        };

        let Some(user) = user else {
            password.verify_against_dummy(pepper);
            return Err(AuthError::InvalidCredentials);
        };

        if !user.password.verify(&password, pepper) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id, user.email.as_str())?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginOutput {
            token,
            user_id: user.id,
        })
    }
}
