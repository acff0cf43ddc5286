//! API key resolution: a stored secret first, then whatever the user typed
//! into the sidebar, otherwise the session halts.

use std::env::{self, VarError};
use std::fmt;

use thiserror::Error;

/// Name of the secret store entry holding the Gemini key.
pub const API_KEY_NAME: &str = "GEMINI_API_KEY";

/// Header the page uses to send an interactively entered key.
pub const API_KEY_HEADER: &str = "x-gemini-api-key";

pub const KEY_REQUIRED_NOTICE: &str = "Please enter your Gemini API key to continue.";

/// A provider key. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns `None` for blank input.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SecretError {
    #[error("secret {0} is not set")]
    Missing(String),
    #[error("secret {0} is empty")]
    Empty(String),
    #[error("secret {0} is not valid unicode")]
    NotUnicode(String),
}

/// Read-only key/value source consulted once at startup.
pub trait SecretStore {
    fn lookup(&self, name: &str) -> Result<ApiKey, SecretError>;
}

/// The process environment, seeded from `.env` by `dotenvy`.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSecretStore;

impl SecretStore for EnvSecretStore {
    fn lookup(&self, name: &str) -> Result<ApiKey, SecretError> {
        match env::var(name) {
            Ok(value) => ApiKey::new(value).ok_or_else(|| SecretError::Empty(name.to_string())),
            Err(VarError::NotPresent) => Err(SecretError::Missing(name.to_string())),
            Err(VarError::NotUnicode(_)) => Err(SecretError::NotUnicode(name.to_string())),
        }
    }
}

/// Looks up the fixed key entry. Any failure means "ask the user"; anything
/// other than a plain missing entry is logged so it does not go unnoticed.
pub fn load_stored_key(store: &dyn SecretStore) -> Option<ApiKey> {
    match store.lookup(API_KEY_NAME) {
        Ok(key) => {
            tracing::info!("Using {} from the secret store", API_KEY_NAME);
            Some(key)
        }
        Err(SecretError::Missing(_)) => {
            tracing::info!("No stored {}, the page will ask for one", API_KEY_NAME);
            None
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Secret store lookup failed, falling back to interactive key entry"
            );
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Stored(ApiKey),
    Entered(ApiKey),
    Halted,
}

/// A stored key wins; an entered key is used only when nothing is stored.
pub fn resolve(stored: Option<&ApiKey>, entered: Option<&str>) -> Credential {
    if let Some(key) = stored {
        return Credential::Stored(key.clone());
    }
    match entered.and_then(ApiKey::new) {
        Some(key) => Credential::Entered(key),
        None => Credential::Halted,
    }
}
