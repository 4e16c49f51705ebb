//! Credential store interface. Implemented in `infra`.

use kernel::id::UserId;

use crate::domain::entity::{NewUser, User};
use crate::domain::value_object::{Email, PersonName};
use crate::error::AuthResult;

#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert the user together with default preferences, atomically.
    /// A duplicate email yields [`AuthError::EmailTaken`](crate::error::AuthError::EmailTaken).
    async fn create(&self, user: &NewUser) -> AuthResult<User>;

    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>>;

    /// `email` is already normalised.
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Returns `None` when the user does not exist.
    async fn update_profile(
        &self,
        id: UserId,
        first_name: &PersonName,
        last_name: &PersonName,
    ) -> AuthResult<Option<User>>;
}
