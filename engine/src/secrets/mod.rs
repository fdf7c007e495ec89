pub mod string;

pub use string::SecretString;

use keyring::Entry;
use regex::Regex;
use sdk::errors::EngineError;
use std::sync::OnceLock;

/// Keychain service name used for helpdesk secrets
pub const SERVICE_NAME: &str = "helpdesk";

/// Environment variable holding the Google API key
pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Keychain entry holding the Google API key
pub const GOOGLE_API_KEY_ENTRY: &str = "google_api_key";

/// SecretManager resolves API keys for the engine.
///
/// Lookup order:
/// 1. Process environment (a `.env` file in the working directory is loaded first)
/// 2. OS keychain entry under the manager's service name
///
/// A missing secret is an error; the engine cannot start without its API key.
pub struct SecretManager {
    service_name: String,
}

/// Regex patterns for detecting common secret formats.
/// Each pattern is paired with its replacement text.
static SECRET_PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();

/// Initializes and returns the secret detection patterns.
///
/// Patterns match:
/// - Google API keys: AIza[0-9A-Za-z-_]{35}
/// - `key=` query parameters (Gemini passes the API key in the URL)
/// - Bearer tokens: Bearer\s+[^\s]{20,}
fn get_secret_patterns() -> &'static Vec<(Regex, &'static str)> {
    SECRET_PATTERNS.get_or_init(|| {
        vec![
            (
                Regex::new(r"AIza[0-9A-Za-z\-_]{35}").expect("Invalid Google pattern"),
                "[REDACTED]",
            ),
            (
                Regex::new(r"([?&]key=)[^&\s)]+").expect("Invalid query key pattern"),
                "${1}[REDACTED]",
            ),
            (
                Regex::new(r"Bearer\s+[^\s]{20,}").expect("Invalid Bearer pattern"),
                "[REDACTED]",
            ),
        ]
    })
}

impl SecretManager {
    /// Creates a new SecretManager with the given keychain service name.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    /// Resolves a secret from `env_var`, falling back to the keychain entry `key`.
    ///
    /// # Errors
    /// Returns `EngineError::Secret` if neither source holds a non-empty value.
    pub fn get_secret(&self, key: &str, env_var: &str) -> Result<SecretString, EngineError> {
        dotenvy::dotenv().ok();

        if let Ok(value) = std::env::var(env_var) {
            if !value.trim().is_empty() {
                tracing::debug!("Resolved secret '{}' from environment", key);
                return Ok(SecretString::new(value.trim()));
            }
        }

        match self.keychain_lookup(key) {
            Some(value) => {
                tracing::debug!("Resolved secret '{}' from keychain", key);
                Ok(SecretString::new(value))
            }
            None => Err(EngineError::Secret(format!(
                "{} environment variable not set and no '{}' entry in the {} keychain",
                env_var, key, self.service_name
            ))),
        }
    }

    /// Checks whether a secret is available without returning it.
    pub fn has_secret(&self, key: &str, env_var: &str) -> bool {
        self.get_secret(key, env_var).is_ok()
    }

    /// Resolves the Google API key used for Gemini generation and embeddings.
    pub fn google_api_key(&self) -> Result<SecretString, EngineError> {
        self.get_secret(GOOGLE_API_KEY_ENTRY, GOOGLE_API_KEY_ENV)
    }

    /// Whether the Google API key resolves, without handing out its value.
    pub fn has_google_api_key(&self) -> bool {
        self.has_secret(GOOGLE_API_KEY_ENTRY, GOOGLE_API_KEY_ENV)
    }

    fn keychain_lookup(&self, key: &str) -> Option<String> {
        let entry = Entry::new(&self.service_name, key).ok()?;
        match entry.get_password() {
            Ok(secret) if !secret.is_empty() => Some(secret),
            Ok(_) => None,
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                tracing::debug!("Keychain lookup for '{}' failed: {}", key, e);
                None
            }
        }
    }
}

impl Default for SecretManager {
    fn default() -> Self {
        Self::new(SERVICE_NAME)
    }
}

/// Scrubs secrets from text by replacing them with [REDACTED].
///
/// Used on every upstream error detail before it is shown to a user or logged.
///
/// # Examples
/// ```
/// use helpdesk_engine::secrets::scrub_text;
///
/// let scrubbed = scrub_text("POST /v1beta/models/m:generateContent?key=abc123 failed");
/// assert_eq!(scrubbed, "POST /v1beta/models/m:generateContent?key=[REDACTED] failed");
/// ```
pub fn scrub_text(text: &str) -> String {
    let patterns = get_secret_patterns();
    let mut result = text.to_string();

    for (pattern, replacement) in patterns {
        result = pattern.replace_all(&result, *replacement).to_string();
    }

    result
}
