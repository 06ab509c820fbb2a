//! Request lifecycle
//!
//! One [`ChatClient`] drives at most one in-flight completion at a time.
//! Starting a new request cancels and replaces the previous one
//! (last-writer-wins, no queue); explicit cancellation resolves the
//! in-flight call with an empty full text rather than an error.

mod error;

pub use error::{ClientError, ClientResult};

use std::sync::Arc;

use futures::StreamExt;
use parking_lot::Mutex;
use serde::Deserialize;

use crate::credentials::CredentialStore;
use crate::logging::{Logger, NoOpLogger};
use crate::protocol::{self, PreparedRequest};
use crate::registry::ProviderRegistry;
use crate::sse::SseDecoder;
use crate::transport::{Transport, TransportResponse};
use crate::types::{
    CancellationToken, ChatMessage, ClientSettings, CompletionOptions, Credential, ProtocolKind,
    ProviderDescriptor,
};

/// Result of a connection probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTest {
    pub success: bool,
    pub error: Option<String>,
}

impl ConnectionTest {
    fn ok() -> Self {
        Self { success: true, error: None }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self { success: false, error: Some(error.into()) }
    }
}

/// Multi-provider chat completion client
///
/// Owns the cancellation token of the request currently in flight; that
/// slot is the only mutable state shared across requests and is swapped
/// under one lock so two requests can never both believe they are active.
pub struct ChatClient {
    registry: Arc<dyn ProviderRegistry>,
    credentials: Arc<dyn CredentialStore>,
    transport: Arc<dyn Transport>,
    logger: Arc<dyn Logger>,
    settings: ClientSettings,
    active: Mutex<Option<CancellationToken>>,
}

impl ChatClient {
    pub fn new(
        registry: Arc<dyn ProviderRegistry>,
        credentials: Arc<dyn CredentialStore>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            registry,
            credentials,
            transport,
            logger: Arc::new(NoOpLogger),
            settings: ClientSettings::default(),
            active: Mutex::new(None),
        }
    }

    /// Route lifecycle logging to a host sink
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Override the default settings
    pub fn with_settings(mut self, settings: ClientSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Send one chat completion request
    ///
    /// `on_delta` receives each text fragment in wire order; the returned
    /// full text equals their concatenation. Starting a new request while
    /// one is in flight cancels the old one, and a cancelled request
    /// resolves `Ok("")`. The `Result` is the single terminal outcome of
    /// the call.
    pub async fn send_chat_completion<F>(
        &self,
        messages: Vec<ChatMessage>,
        options: CompletionOptions,
        mut on_delta: F,
    ) -> ClientResult<String>
    where
        F: FnMut(&str) + Send,
    {
        let provider = self
            .registry
            .active_provider()
            .ok_or(ClientError::NoActiveProvider)?;
        let credential =
            self.credentials
                .get(&provider.id)
                .ok_or_else(|| ClientError::MissingCredential {
                    provider: provider.display_name.clone(),
                })?;

        let model_id = self
            .registry
            .active_model_id()
            .or_else(|| provider.default_model_id().map(str::to_string))
            .unwrap_or_default();

        let streaming = options.is_streaming();
        let messages = self.with_system_prompt(messages, &options);
        let request = protocol::build_request(&messages, &model_id, &options, &provider, &credential)?;

        let token = self.begin_request();

        self.logger.info(&format!(
            "[ChatClient] sending {} request: provider={}, model={}",
            if streaming { "streaming" } else { "non-streaming" },
            provider.id,
            model_id,
        ));

        let outcome = self
            .execute(request, provider.protocol, streaming, &token, &mut on_delta)
            .await;
        self.end_request(&token);

        if let Err(err) = &outcome {
            self.logger.error(&format!("[ChatClient] request failed: {err}"));
        }
        outcome
    }

    /// Cancel the in-flight request, if any
    ///
    /// Idempotent; a no-op when nothing is in flight. The cancelled call
    /// resolves `Ok("")`.
    pub fn cancel_active_request(&self) {
        if let Some(token) = self.active.lock().take() {
            self.logger.info("[ChatClient] cancelling active request");
            token.cancel();
        }
    }

    /// Probe a provider with a minimal non-streaming request
    ///
    /// Validates the credential without committing to a conversation turn.
    /// Runs outside the active-request slot, so it never cancels or is
    /// cancelled by a chat completion.
    pub async fn test_provider_connection(
        &self,
        provider: &ProviderDescriptor,
        credential: &Credential,
    ) -> ConnectionTest {
        let model_id = provider.default_model_id().unwrap_or_default();
        let messages = vec![ChatMessage::user("Say \"ok\".")];
        let options = CompletionOptions::new().with_max_tokens(10).with_stream(false);

        let request = match protocol::build_request(&messages, model_id, &options, provider, credential)
        {
            Ok(request) => request,
            Err(err) => return ConnectionTest::failed(err.to_string()),
        };

        let response = match self
            .transport
            .post(&request.url, &request.headers, request.body)
            .await
        {
            Ok(response) => response,
            Err(err) => return ConnectionTest::failed(err.to_string()),
        };

        if response.is_success() {
            return ConnectionTest::ok();
        }

        let status = response.status;
        let body = response.collect_body().await.unwrap_or_default();
        ConnectionTest::failed(parse_error_message(&body, &format!("HTTP {status}")))
    }

    /// Ghost-text completion at a cursor position
    ///
    /// A non-streaming chat call with a fixed completion-oriented system
    /// prompt, tuned by the code temperature and inline token cap.
    pub async fn send_inline_completion(
        &self,
        prefix: &str,
        suffix: &str,
        language: &str,
    ) -> ClientResult<String> {
        let system_prompt = format!(
            "You are an intelligent code completion assistant. Complete the code at the cursor position. \
             Only output the completion text, no explanations, no markdown, no code fences. \
             The code is in {language}."
        );
        let user_prompt = format!(
            "Complete the code at [CURSOR]:\n\n{prefix}[CURSOR]{suffix}\n\n\
             Output ONLY the completion text that goes at [CURSOR]. No explanations."
        );

        let options = CompletionOptions::new()
            .with_temperature(self.settings.code_temperature)
            .with_max_tokens(self.settings.inline_max_tokens)
            .with_stream(false);

        self.send_chat_completion(
            vec![ChatMessage::system(system_prompt), ChatMessage::user(user_prompt)],
            options,
            |_| {},
        )
        .await
    }

    /// Install a fresh token as the active request, cancelling the old one
    fn begin_request(&self) -> CancellationToken {
        let token = CancellationToken::new();
        let mut active = self.active.lock();
        if let Some(previous) = active.replace(token.clone()) {
            previous.cancel();
        }
        token
    }

    /// Clear the slot if this request is still the active one
    fn end_request(&self, token: &CancellationToken) {
        let mut active = self.active.lock();
        if active.as_ref().is_some_and(|current| current.same_as(token)) {
            *active = None;
        }
    }

    /// Prepend a system prompt when the conversation has none
    ///
    /// The per-request option wins over the settings default; both run
    /// before protocol translation so all adapters see the same list.
    fn with_system_prompt(
        &self,
        mut messages: Vec<ChatMessage>,
        options: &CompletionOptions,
    ) -> Vec<ChatMessage> {
        if messages.iter().any(ChatMessage::is_system) {
            return messages;
        }

        let prompt = options
            .system_prompt
            .as_deref()
            .filter(|p| !p.is_empty())
            .or_else(|| {
                let default = self.settings.system_prompt.as_str();
                (!default.is_empty()).then_some(default)
            });

        if let Some(prompt) = prompt {
            messages.insert(0, ChatMessage::system(prompt));
        }
        messages
    }

    async fn execute<F>(
        &self,
        request: PreparedRequest,
        protocol_kind: ProtocolKind,
        streaming: bool,
        token: &CancellationToken,
        on_delta: &mut F,
    ) -> ClientResult<String>
    where
        F: FnMut(&str) + Send,
    {
        let PreparedRequest { url, headers, body } = request;

        // Dropping the post future aborts the underlying call.
        let response = tokio::select! {
            response = self.transport.post(&url, &headers, body) => response?,
            _ = token.cancelled() => {
                self.logger.info("[ChatClient] request cancelled before response");
                return Ok(String::new());
            }
        };

        if !response.is_success() {
            let status = response.status;
            let body = response.collect_body().await.unwrap_or_default();
            let message = parse_error_message(&body, &format!("API error {status}"));
            return Err(ClientError::Api { status, message });
        }

        if streaming {
            self.consume_stream(response, protocol_kind, token, on_delta).await
        } else {
            let body = tokio::select! {
                body = response.collect_body() => body?,
                _ = token.cancelled() => return Ok(String::new()),
            };
            Ok(protocol::final_text(protocol_kind, &body))
        }
    }

    async fn consume_stream<F>(
        &self,
        response: TransportResponse,
        protocol_kind: ProtocolKind,
        token: &CancellationToken,
        on_delta: &mut F,
    ) -> ClientResult<String>
    where
        F: FnMut(&str) + Send,
    {
        let mut decoder = SseDecoder::new(protocol_kind);
        let mut body = response.body;
        let mut full_text = String::new();

        loop {
            let next = tokio::select! {
                chunk = body.next() => chunk,
                _ = token.cancelled() => {
                    self.logger.info("[ChatClient] stream cancelled");
                    return Ok(String::new());
                }
            };

            let Some(chunk) = next else { break };
            for delta in decoder.feed(&chunk?) {
                full_text.push_str(&delta);
                on_delta(&delta);
            }
        }

        for delta in decoder.finish() {
            full_text.push_str(&delta);
            on_delta(&delta);
        }

        self.logger.debug(&format!(
            "[ChatClient] stream complete: {} chars",
            full_text.len()
        ));
        Ok(full_text)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// Pull a human-readable message out of a provider error body
///
/// Tries `error.message`, then a top-level `message`, then the fallback.
fn parse_error_message(body: &[u8], fallback: &str) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error.and_then(|e| e.message).or(parsed.message))
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
