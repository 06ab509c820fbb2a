//! Per-request completion options

/// Sampling temperature used when none is set
pub(crate) const DEFAULT_TEMPERATURE: f64 = 0.7;
/// Response token cap used when none is set
pub(crate) const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Options for a single chat completion request
///
/// Unset fields fall back to the wire defaults: temperature 0.7, max_tokens
/// 4096, streaming on.
#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    /// Sampling randomness, 0.0 - 2.0
    pub temperature: Option<f64>,
    /// Response length cap in tokens
    pub max_tokens: Option<u32>,
    /// Whether to stream the response
    pub stream: Option<bool>,
    /// System prompt prepended when the conversation has no system message
    pub system_prompt: Option<String>,
}

impl CompletionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = Some(stream);
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Streaming is on unless explicitly disabled
    pub fn is_streaming(&self) -> bool {
        self.stream != Some(false)
    }

    pub(crate) fn temperature_or_default(&self) -> f64 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    pub(crate) fn max_tokens_or_default(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }
}
