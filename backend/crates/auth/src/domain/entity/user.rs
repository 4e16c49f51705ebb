//! User entity.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{Email, PersonName, UserPassword};

/// A registered account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub password: UserPassword,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated registration data, ready to persist.
#[derive(Debug)]
pub struct NewUser {
    pub email: Email,
    pub password: UserPassword,
    pub first_name: PersonName,
    pub last_name: PersonName,
}
