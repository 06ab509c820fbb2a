//! Provider registry
//!
//! The registry is owned by the host application; the core only reads it.
//! [`built_in_providers`] mirrors the fallback catalog the host ships
//! before any dynamic model list has been fetched for a saved key.

use once_cell::sync::Lazy;
use std::sync::RwLock;

use crate::types::{ModelDescriptor, ProtocolKind, ProviderDescriptor};

/// Read seam for provider configuration
pub trait ProviderRegistry: Send + Sync {
    /// All configured providers
    fn providers(&self) -> Vec<ProviderDescriptor>;

    /// The provider chat requests are routed to
    fn active_provider(&self) -> Option<ProviderDescriptor>;

    /// The model id selected on the active provider
    fn active_model_id(&self) -> Option<String>;
}

/// Built-in provider catalog with fallback model lists
pub fn built_in_providers() -> &'static [ProviderDescriptor] {
    static BUILT_IN: Lazy<Vec<ProviderDescriptor>> = Lazy::new(|| {
        vec![
            ProviderDescriptor::new("openai", "OpenAI", ProtocolKind::OpenAi, "https://api.openai.com")
                .with_models(vec![
                    ModelDescriptor::new("gpt-5.2", "GPT-5.2", 1_047_576),
                    ModelDescriptor::new("gpt-5.2-pro", "GPT-5.2 Pro", 1_047_576),
                    ModelDescriptor::new("gpt-4.1", "GPT-4.1", 1_047_576),
                    ModelDescriptor::new("gpt-4.1-mini", "GPT-4.1 Mini", 1_047_576),
                    ModelDescriptor::new("gpt-4.1-nano", "GPT-4.1 Nano", 1_047_576),
                    ModelDescriptor::new("gpt-4o", "GPT-4o", 128_000),
                    ModelDescriptor::new("gpt-4o-mini", "GPT-4o Mini", 128_000),
                    ModelDescriptor::new("o3", "o3", 200_000),
                    ModelDescriptor::new("o4-mini", "o4-mini", 200_000),
                ]),
            ProviderDescriptor::new(
                "anthropic",
                "Anthropic",
                ProtocolKind::Anthropic,
                "https://api.anthropic.com",
            )
            .with_models(vec![
                ModelDescriptor::new("claude-opus-4-6", "Claude Opus 4.6", 200_000),
                ModelDescriptor::new("claude-sonnet-4-6", "Claude Sonnet 4.6", 200_000),
                ModelDescriptor::new("claude-opus-4-5-20251101", "Claude Opus 4.5", 200_000),
                ModelDescriptor::new("claude-sonnet-4-5-20250929", "Claude Sonnet 4.5", 200_000),
                ModelDescriptor::new("claude-haiku-4-5-20251001", "Claude Haiku 4.5", 200_000),
            ]),
            ProviderDescriptor::new(
                "google",
                "Google AI",
                ProtocolKind::Google,
                "https://generativelanguage.googleapis.com",
            )
            .with_models(vec![
                ModelDescriptor::new("gemini-2.5-pro", "Gemini 2.5 Pro", 1_048_576),
                ModelDescriptor::new("gemini-2.5-flash", "Gemini 2.5 Flash", 1_048_576),
                ModelDescriptor::new("gemini-2.5-flash-lite", "Gemini 2.5 Flash Lite", 1_048_576),
            ]),
        ]
    });
    &BUILT_IN
}

#[derive(Debug, Default)]
struct RegistryState {
    providers: Vec<ProviderDescriptor>,
    active_provider_id: Option<String>,
    active_model_id: Option<String>,
}

/// In-memory read-write registry
///
/// Thread safe; hosts that keep provider configuration elsewhere implement
/// [`ProviderRegistry`] directly instead.
#[derive(Debug, Default)]
pub struct MemoryProviderRegistry {
    state: RwLock<RegistryState>,
}

impl MemoryProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with the built-in catalog
    pub fn with_built_ins() -> Self {
        let registry = Self::new();
        for provider in built_in_providers() {
            registry.add_provider(provider.clone());
        }
        registry
    }

    /// Add or replace a provider by id
    pub fn add_provider(&self, provider: ProviderDescriptor) {
        let mut state = self.state.write().unwrap();
        state.providers.retain(|p| p.id != provider.id);
        state.providers.push(provider);
    }

    /// Remove a provider; clears the active selection if it pointed there
    pub fn remove_provider(&self, id: &str) {
        let mut state = self.state.write().unwrap();
        state.providers.retain(|p| p.id != id);
        if state.active_provider_id.as_deref() == Some(id) {
            state.active_provider_id = None;
            state.active_model_id = None;
        }
    }

    /// Select the active provider; returns false for an unknown id
    pub fn set_active_provider(&self, id: &str) -> bool {
        let mut state = self.state.write().unwrap();
        if !state.providers.iter().any(|p| p.id == id) {
            return false;
        }
        state.active_provider_id = Some(id.to_string());
        true
    }

    /// Select the active model id (not validated against the provider)
    pub fn set_active_model(&self, id: &str) {
        self.state.write().unwrap().active_model_id = Some(id.to_string());
    }
}

impl ProviderRegistry for MemoryProviderRegistry {
    fn providers(&self) -> Vec<ProviderDescriptor> {
        self.state.read().unwrap().providers.clone()
    }

    fn active_provider(&self) -> Option<ProviderDescriptor> {
        let state = self.state.read().unwrap();
        let active_id = state.active_provider_id.as_deref()?;
        state.providers.iter().find(|p| p.id == active_id).cloned()
    }

    fn active_model_id(&self) -> Option<String> {
        self.state.read().unwrap().active_model_id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_catalog_covers_all_protocols() {
        let providers = built_in_providers();
        assert_eq!(providers.len(), 3);
        assert!(providers.iter().all(|p| !p.models.is_empty()));

        let kinds: Vec<ProtocolKind> = providers.iter().map(|p| p.protocol).collect();
        assert!(kinds.contains(&ProtocolKind::OpenAi));
        assert!(kinds.contains(&ProtocolKind::Anthropic));
        assert!(kinds.contains(&ProtocolKind::Google));
    }

    #[test]
    fn no_active_provider_until_selected() {
        let registry = MemoryProviderRegistry::with_built_ins();
        assert!(registry.active_provider().is_none());

        assert!(registry.set_active_provider("anthropic"));
        assert_eq!(registry.active_provider().unwrap().id, "anthropic");
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let registry = MemoryProviderRegistry::with_built_ins();
        assert!(!registry.set_active_provider("nope"));
        assert!(registry.active_provider().is_none());
    }

    #[test]
    fn removing_active_provider_clears_selection() {
        let registry = MemoryProviderRegistry::with_built_ins();
        registry.set_active_provider("openai");
        registry.set_active_model("gpt-4o");

        registry.remove_provider("openai");
        assert!(registry.active_provider().is_none());
        assert!(registry.active_model_id().is_none());
    }

    #[test]
    fn add_provider_replaces_by_id() {
        let registry = MemoryProviderRegistry::new();
        registry.add_provider(ProviderDescriptor::new("x", "X", ProtocolKind::OpenAi, "https://a"));
        registry.add_provider(ProviderDescriptor::new("x", "X2", ProtocolKind::OpenAi, "https://b"));

        let providers = registry.providers();
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].base_url, "https://b");
    }
}
