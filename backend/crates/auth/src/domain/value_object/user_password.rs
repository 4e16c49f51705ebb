//! Password value objects.
//!
//! Thin domain wrappers over `platform::password` that translate policy and
//! hashing failures into [`AuthError`].

use std::fmt;

use platform::password::{
    ClearTextPassword, HashedPassword, PasswordPolicyError, verify_against_dummy,
};

use crate::error::{AuthError, AuthResult};

/// Password as typed by the user. Zeroized on drop.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// For registration: applies the password policy.
    pub fn new(raw: String) -> AuthResult<Self> {
        ClearTextPassword::new(raw)
            .map(Self)
            .map_err(|e| AuthError::Validation(policy_message(&e)))
    }

    /// For login: no policy, only normalisation.
    pub fn for_login(raw: String) -> Self {
        Self(ClearTextPassword::for_verification(raw))
    }

    /// Burn one verification's worth of work against a throwaway hash.
    pub fn verify_against_dummy(&self, pepper: Option<&[u8]>) {
        verify_against_dummy(&self.0, pepper);
    }
}

fn policy_message(err: &PasswordPolicyError) -> String {
    match err {
        PasswordPolicyError::EmptyOrWhitespace => "Password is required".to_string(),
        other => other.to_string(),
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawPassword([REDACTED])")
    }
}

/// Stored Argon2id digest (PHC string).
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AuthResult<Self> {
        raw.0
            .hash(pepper)
            .map(Self)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// The digest as stored. Malformed values are kept and simply fail
    /// verification, so a corrupt row reads as a wrong password.
    pub fn from_stored(phc: impl Into<String>) -> Self {
        Self(HashedPassword::from_stored(phc))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(&raw.0, pepper)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UserPassword([HASH])")
    }
}
