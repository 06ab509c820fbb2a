//! Host-tunable client settings

use serde::{Deserialize, Serialize};

/// Knobs the host application exposes in its assistant settings
///
/// The client reads these for defaults it cannot derive from a single
/// request: the fallback system prompt and the inline-completion tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// System prompt injected when a conversation has none
    #[serde(default)]
    pub system_prompt: String,
    /// Sampling temperature for conversational chat
    pub chat_temperature: f64,
    /// Sampling temperature for code-oriented requests
    pub code_temperature: f64,
    /// Token budget for attached context
    pub max_context_tokens: u32,
    /// Response cap for inline ghost-text completions
    pub inline_max_tokens: u32,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            system_prompt: String::new(),
            chat_temperature: 0.7,
            code_temperature: 0.3,
            max_context_tokens: 8000,
            inline_max_tokens: 256,
        }
    }
}
