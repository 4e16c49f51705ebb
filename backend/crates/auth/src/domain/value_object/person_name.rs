//! First/last name value object.

use crate::error::{AuthError, AuthResult};

pub const PERSON_NAME_MAX_LENGTH: usize = 100;

/// A trimmed display name. May be empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PersonName(String);

impl PersonName {
    pub fn new(raw: impl AsRef<str>, field: &str) -> AuthResult<Self> {
        let name = raw.as_ref().trim();

        if name.chars().count() > PERSON_NAME_MAX_LENGTH {
            return Err(AuthError::Validation(format!(
                "{field} must be at most {PERSON_NAME_MAX_LENGTH} characters"
            )));
        }
        if name.chars().any(char::is_control) {
            return Err(AuthError::Validation(format!(
                "{field} contains invalid characters"
            )));
        }

        Ok(Self(name.to_string()))
    }

    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
