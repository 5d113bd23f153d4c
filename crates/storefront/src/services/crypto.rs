//! Password hashing and lightweight identifiers.
//!
//! Passwords are hashed as `SHA-256(password + salt)` with one static salt
//! for the whole store. Identical passwords therefore produce identical
//! hashes across users; stored data depends on this format, so it must not
//! change without a migration.

use chrono::Utc;
use rand::Rng;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

use crate::config::{DEFAULT_PASSWORD_SALT, StoreConfig};

/// Hashing helpers bound to the store's static salt.
#[derive(Clone)]
pub struct CryptoService {
    salt: SecretString,
}

impl std::fmt::Debug for CryptoService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoService")
            .field("salt", &"[REDACTED]")
            .finish()
    }
}

impl Default for CryptoService {
    fn default() -> Self {
        Self::new(SecretString::from(DEFAULT_PASSWORD_SALT))
    }
}

impl CryptoService {
    /// Create a hasher using `salt`.
    #[must_use]
    pub const fn new(salt: SecretString) -> Self {
        Self { salt }
    }

    /// Create a hasher using the configured salt.
    #[must_use]
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.password_salt.clone())
    }

    /// Hash a password: lowercase hex SHA-256 of `password + salt` (64 chars).
    #[must_use]
    pub fn hash_password(&self, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        hasher.update(self.salt.expose_secret().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Check `plain` against a hash produced by [`CryptoService::hash_password`].
    #[must_use]
    pub fn compare_passwords(&self, plain: &str, hashed: &str) -> bool {
        self.hash_password(plain) == hashed
    }

    /// Non-cryptographic string hash (`h = h * 31 + unit`, 32-bit wrapping,
    /// over UTF-16 code units), rendered as the absolute value in decimal.
    ///
    /// The empty string hashes to `"0"`.
    #[must_use]
    pub fn generate_simple_hash(input: &str) -> String {
        let hash = input.encode_utf16().fold(0_i32, |hash, unit| {
            hash.wrapping_shl(5)
                .wrapping_sub(hash)
                .wrapping_add(i32::from(unit))
        });
        hash.unsigned_abs().to_string()
    }

    /// Short practically-unique identifier: base-36 epoch milliseconds
    /// followed by base-36 random digits.
    #[must_use]
    pub fn generate_id() -> String {
        let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        let random: u64 = rand::rng().random();
        format!("{}{}", to_base36(millis), to_base36(random))
    }
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_owned();
    }
    let mut out = Vec::new();
    while value > 0 {
        #[allow(clippy::cast_possible_truncation)] // remainder is always < 36
        let digit = (value % 36) as usize;
        out.push(DIGITS.get(digit).copied().unwrap_or(b'0'));
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
