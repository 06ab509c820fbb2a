//! Credential storage seams
//!
//! The credential store is owned by the host; this core only reads
//! [`Credential`] values from it and never persists or logs an API key.
//! Two implementations ship here: an in-memory read-write store and a
//! read-only environment-variable store.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::env;
use std::sync::RwLock;
use thiserror::Error;

use crate::types::Credential;

/// Errors from credential store operations
#[derive(Debug, Error)]
pub enum CredentialStoreError {
    #[error("Store is read-only")]
    ReadOnly,

    #[error("Store error: {0}")]
    Other(String),
}

pub type CredentialStoreResult<T> = Result<T, CredentialStoreError>;

/// Read seam for per-provider API keys
pub trait CredentialStore: Send + Sync {
    /// Human-readable name of this store
    fn name(&self) -> &str;

    /// Retrieve the credential for a provider id
    fn get(&self, provider_id: &str) -> Option<Credential>;

    /// Store a credential; `Err(ReadOnly)` when unsupported
    fn store(&self, credential: Credential) -> CredentialStoreResult<()>;

    /// Delete a credential; `Err(ReadOnly)` when unsupported
    fn delete(&self, provider_id: &str) -> CredentialStoreResult<()>;

    /// Whether a credential exists for the provider
    fn has(&self, provider_id: &str) -> bool {
        self.get(provider_id).is_some()
    }
}

/// In-memory credential store for testing and ephemeral use
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    keys: RwLock<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding a single key
    pub fn with_key(provider_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        let store = Self::new();
        let mut keys = store.keys.write().unwrap();
        keys.insert(provider_id.into(), api_key.into());
        drop(keys);
        store
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, provider_id: &str) -> Option<Credential> {
        let keys = self.keys.read().unwrap();
        keys.get(provider_id)
            .map(|key| Credential::new(provider_id, key))
    }

    fn store(&self, credential: Credential) -> CredentialStoreResult<()> {
        let mut keys = self.keys.write().unwrap();
        keys.insert(credential.provider_id, credential.api_key);
        Ok(())
    }

    fn delete(&self, provider_id: &str) -> CredentialStoreResult<()> {
        let mut keys = self.keys.write().unwrap();
        keys.remove(provider_id);
        Ok(())
    }
}

/// Mapping from built-in provider ids to their conventional env vars
static ENV_VAR_MAP: Lazy<HashMap<&'static str, Vec<&'static str>>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("openai", vec!["OPENAI_API_KEY"]);
    m.insert("anthropic", vec!["ANTHROPIC_API_KEY"]);
    m.insert("google", vec!["GEMINI_API_KEY", "GOOGLE_API_KEY"]);
    m
});

/// Read-only store backed by environment variables
///
/// Provider ids resolve through the conventional names first
/// (`OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, `GEMINI_API_KEY`/
/// `GOOGLE_API_KEY`), then fall back to `{ID}_API_KEY` uppercased, which
/// covers custom OpenAI-compatible providers.
#[derive(Debug, Default)]
pub struct EnvCredentialStore {
    _private: (),
}

impl EnvCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lookup(provider_id: &str) -> Option<String> {
        if let Some(names) = ENV_VAR_MAP.get(provider_id.to_lowercase().as_str()) {
            for name in names {
                if let Ok(value) = env::var(name) {
                    if !value.is_empty() {
                        return Some(value);
                    }
                }
            }
        }

        let fallback = format!("{}_API_KEY", provider_id.to_uppercase());
        match env::var(&fallback) {
            Ok(value) if !value.is_empty() => Some(value),
            _ => None,
        }
    }
}

impl CredentialStore for EnvCredentialStore {
    fn name(&self) -> &str {
        "env"
    }

    fn get(&self, provider_id: &str) -> Option<Credential> {
        Self::lookup(provider_id).map(|key| Credential::new(provider_id, key))
    }

    fn store(&self, _credential: Credential) -> CredentialStoreResult<()> {
        Err(CredentialStoreError::ReadOnly)
    }

    fn delete(&self, _provider_id: &str) -> CredentialStoreResult<()> {
        Err(CredentialStoreError::ReadOnly)
    }
}
