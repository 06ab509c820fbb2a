//! Provider and model descriptors

use serde::{Deserialize, Serialize};

/// Wire-format family a provider speaks
///
/// A closed set: every configured provider maps onto exactly one of these,
/// and each variant selects the request body shape, endpoint scheme, auth
/// headers, and streaming field paths used for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolKind {
    /// Chat Completions shape, also spoken by most OpenAI-compatible gateways
    OpenAi,
    /// Messages API shape with a top-level system field
    Anthropic,
    /// generateContent shape with contents/parts
    Google,
}

/// One model offered by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Model identifier as used by the provider's API
    pub id: String,
    /// Display name
    pub display_name: String,
    /// Maximum context length in tokens
    pub context_window: u32,
    /// Whether the model supports streamed responses
    #[serde(default)]
    pub supports_streaming: bool,
    /// Whether the model supports fill-in-middle completion (capability
    /// flag only; no fill-in-middle request path exists here)
    #[serde(default)]
    pub supports_fim: bool,
}

impl ModelDescriptor {
    /// Create a descriptor with streaming on and fill-in-middle off
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, context_window: u32) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            context_window,
            supports_streaming: true,
            supports_fim: false,
        }
    }
}

/// Immutable configuration for one backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    /// Provider identifier (e.g. "openai")
    pub id: String,
    /// Display name shown to the user
    pub display_name: String,
    /// Wire protocol this provider speaks
    pub protocol: ProtocolKind,
    /// API base URL without a trailing slash
    pub base_url: String,
    /// Models exposed by this provider
    #[serde(default)]
    pub models: Vec<ModelDescriptor>,
}

impl ProviderDescriptor {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        protocol: ProtocolKind,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            protocol,
            base_url: base_url.into(),
            models: vec![],
        }
    }

    /// Add models to the descriptor
    pub fn with_models(mut self, models: Vec<ModelDescriptor>) -> Self {
        self.models = models;
        self
    }

    /// Id of the first configured model, if any
    pub fn default_model_id(&self) -> Option<&str> {
        self.models.first().map(|m| m.id.as_str())
    }
}

/// API key for one provider, supplied by the caller per request
///
/// Never persisted or logged by this crate; the Debug form redacts the key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub provider_id: String,
    pub api_key: String,
}

impl Credential {
    pub fn new(provider_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            api_key: api_key.into(),
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("provider_id", &self.provider_id)
            .field("api_key", &"***")
            .finish()
    }
}
