//! Password hashing and verification.
//!
//! - Argon2id with the crate's default parameters and a fresh random salt per hash
//! - self-describing PHC strings, so parameters can change without a migration
//! - optional application-wide pepper appended to the password bytes
//! - clear text is zeroized on drop and never printed
//!
//! Registration goes through [`ClearTextPassword::new`], which enforces the
//! password policy. Login goes through [`ClearTextPassword::for_verification`],
//! which only normalises: a policy change must never lock out an existing
//! account, and a login attempt must never learn anything about the policy.

use std::fmt;
use std::sync::OnceLock;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Registration policy violations. Messages are safe to show to the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,

    #[error("Password is too common or follows a predictable pattern")]
    CommonPattern,
}

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

/// A clear text password. Not `Clone`; zeroized on drop; `Debug` is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Normalise (NFKC) and apply the registration policy.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let password = Self::for_verification(raw);
        password.check_policy()?;
        Ok(password)
    }

    /// Normalise only. Used for login.
    pub fn for_verification(raw: String) -> Self {
        let raw = Zeroizing::new(raw);
        Self(raw.nfkc().collect())
    }

    fn check_policy(&self) -> Result<(), PasswordPolicyError> {
        let value = self.0.as_str();

        if value.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        // Code points, not bytes.
        let count = value.chars().count();
        if count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: count,
            });
        }
        if count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: count,
            });
        }

        if value
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        if is_common_pattern(value) {
            return Err(PasswordPolicyError::CommonPattern);
        }

        Ok(())
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Zeroizing<Vec<u8>> {
        let mut bytes = Zeroizing::new(self.0.as_bytes().to_vec());
        if let Some(pepper) = pepper {
            bytes.extend_from_slice(pepper);
        }
        bytes
    }

    /// Hash with Argon2id under a fresh 128-bit salt.
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(&self.peppered(pepper), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            phc: hash.to_string(),
        })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClearTextPassword([REDACTED])")
    }
}

/// An Argon2id digest in PHC string form. Safe to persist.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    phc: String,
}

impl HashedPassword {
    /// Wrap a stored PHC string, rejecting anything that does not parse.
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let phc = s.into();
        PasswordHash::new(&phc).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { phc })
    }

    /// Wrap a digest read back from storage without checking it. A value that
    /// does not parse never verifies.
    pub fn from_stored(s: impl Into<String>) -> Self {
        Self { phc: s.into() }
    }

    pub fn as_phc_string(&self) -> &str {
        &self.phc
    }

    /// Recompute under the embedded salt and parameters and compare in
    /// constant time. A malformed digest verifies as `false`.
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.phc) else {
            return false;
        };

        Argon2::default()
            .verify_password(&password.peppered(pepper), &parsed)
            .is_ok()
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("phc", &"[HASH]")
            .finish()
    }
}

/// Spend the same work as a real verification when the account does not
/// exist, so response timing does not reveal which emails are registered.
pub fn verify_against_dummy(password: &ClearTextPassword, pepper: Option<&[u8]>) {
    static DUMMY: OnceLock<Option<HashedPassword>> = OnceLock::new();

    let dummy = DUMMY.get_or_init(|| {
        ClearTextPassword::for_verification("dummy-password-for-timing".to_string())
            .hash(None)
            .ok()
    });

    if let Some(dummy) = dummy {
        let _ = dummy.verify(password, pepper);
    }
}

fn is_common_pattern(password: &str) -> bool {
    let lower = password.to_lowercase();

    let mut chars = lower.chars();
    if let Some(first) = chars.next() {
        if chars.all(|c| c == first) {
            return true;
        }
    }

    if is_digit_run(&lower) {
        return true;
    }

    const KEYBOARD_WALKS: &[&str] = &["qwerty", "asdfgh", "zxcvbn", "qazwsx", "1qaz2wsx"];
    if KEYBOARD_WALKS.iter().any(|walk| lower.contains(walk)) {
        return true;
    }

    const COMMON: &[&str] = &[
        "password",
        "password1",
        "password123",
        "abcdefgh",
        "letmein123",
        "welcome1",
        "iloveyou",
        "sunshine",
        "princess",
        "football",
        "baseball",
        "trustno1",
        "journal123",
    ];
    COMMON.contains(&lower.as_str())
}

/// All-digit strings counting straight up or down, e.g. `12345678`, `98765432`.
fn is_digit_run(s: &str) -> bool {
    let digits: Vec<u32> = s.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() < 4 || digits.len() != s.chars().count() {
        return false;
    }

    let up = digits.windows(2).all(|w| w[1] == (w[0] + 1) % 10);
    let down = digits.windows(2).all(|w| w[0] == (w[1] + 1) % 10);
    up || down
}
