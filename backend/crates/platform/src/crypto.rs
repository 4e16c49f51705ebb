//! Cryptographic helpers.

use base64::{Engine, engine::general_purpose};
use rand::{RngCore, rngs::OsRng};

/// Cryptographically secure random bytes from the OS.
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Random secret suitable for HMAC keys, URL-safe base64 without padding.
pub fn random_secret(len: usize) -> String {
    to_base64_url(&random_bytes(len))
}

pub fn to_base64_url(bytes: &[u8]) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

pub fn from_base64_url(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::URL_SAFE_NO_PAD.decode(s)
}
