//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `SHOP_DATA_PATH` - JSON file backing the store (default: in-memory store)
//! - `SHOP_PASSWORD_SALT` - Static password salt override (min 16 chars, high entropy)
//! - `SHOP_SEED_CATEGORIES` - Seed demo categories into an empty store (default: true)

use std::collections::HashMap;
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Salt appended to every password before hashing when no override is set.
///
/// The salt is shared by all users; changing it invalidates every stored hash.
pub const DEFAULT_PASSWORD_SALT: &str = "local-shop::static-salt::v1";

const MIN_SALT_LENGTH: usize = 16;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront store configuration.
#[derive(Clone)]
pub struct StoreConfig {
    /// File backing the store; `None` selects the in-memory backend
    pub data_path: Option<PathBuf>,
    /// Static salt used for password hashing
    pub password_salt: SecretString,
    /// Whether an empty category table gets the demo categories
    pub seed_categories: bool,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("data_path", &self.data_path)
            .field("password_salt", &"[REDACTED]")
            .field("seed_categories", &self.seed_categories)
            .finish()
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            password_salt: SecretString::from(DEFAULT_PASSWORD_SALT),
            seed_categories: true,
        }
    }
}

impl StoreConfig {
    /// In-memory configuration with the default salt and seeding enabled.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is malformed or the salt override
    /// fails validation (length, placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`StoreConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_path = lookup("SHOP_DATA_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let password_salt = match lookup("SHOP_PASSWORD_SALT") {
            Some(value) => {
                validate_salt(&value, "SHOP_PASSWORD_SALT")?;
                SecretString::from(value)
            }
            None => SecretString::from(DEFAULT_PASSWORD_SALT),
        };

        let seed_categories = match lookup("SHOP_SEED_CATEGORIES") {
            Some(value) => parse_bool(&value).ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "SHOP_SEED_CATEGORIES".to_string(),
                    format!("expected true/false, got {value:?}"),
                )
            })?,
            None => true,
        };

        Ok(Self {
            data_path,
            password_salt,
            seed_categories,
        })
    }

    /// Returns the salt for hashing.
    #[must_use]
    pub fn salt(&self) -> &str {
        self.password_salt.expose_secret()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a salt override is long, not a placeholder, and has sufficient entropy.
fn validate_salt(salt: &str, var_name: &str) -> Result<(), ConfigError> {
    if salt.chars().count() < MIN_SALT_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("must be at least {MIN_SALT_LENGTH} characters"),
        ));
    }

    let lower = salt.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(salt);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= \
                 {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated salt."
            ),
        ));
    }

    Ok(())
}
