//! Per-vendor protocol adapters
//!
//! Each supported wire protocol gets a submodule owning the typed request
//! body it puts on the wire and the field paths it reads back, both for
//! streamed event frames and for one-shot responses. Everything here is
//! transport independent: [`build_request`] returns a fully formed URL,
//! header list, and body and never performs I/O.
//!
//! The request shapes are an external contract and are reproduced exactly;
//! see the individual submodules for the per-vendor layout.

pub mod anthropic;
pub mod google;
pub mod openai;

use crate::types::{
    ChatMessage, CompletionOptions, Credential, ProtocolKind, ProviderDescriptor,
};

/// A fully formed HTTP request, ready for any transport
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Build the complete outgoing request for one completion call
///
/// `messages` must already carry any injected system prompt so all three
/// adapters see the same conversation. The model id is passed through
/// unvalidated; an id the provider does not recognize is the server's to
/// reject.
pub fn build_request(
    messages: &[ChatMessage],
    model_id: &str,
    options: &CompletionOptions,
    provider: &ProviderDescriptor,
    credential: &Credential,
) -> serde_json::Result<PreparedRequest> {
    let streaming = options.is_streaming();
    let body = match provider.protocol {
        ProtocolKind::OpenAi => openai::request_body(messages, model_id, options)?,
        ProtocolKind::Anthropic => anthropic::request_body(messages, model_id, options)?,
        ProtocolKind::Google => google::request_body(messages, options)?,
    };

    Ok(PreparedRequest {
        url: endpoint_url(provider, model_id, streaming),
        headers: auth_headers(provider.protocol, &credential.api_key),
        body,
    })
}

/// Resolve the endpoint URL for a provider and model
pub fn endpoint_url(provider: &ProviderDescriptor, model_id: &str, streaming: bool) -> String {
    match provider.protocol {
        ProtocolKind::Anthropic => format!("{}/v1/messages", provider.base_url),
        ProtocolKind::Google => {
            let action = if streaming { "streamGenerateContent" } else { "generateContent" };
            let suffix = if streaming { "?alt=sse" } else { "" };
            format!(
                "{}/v1beta/models/{}:{}{}",
                provider.base_url, model_id, action, suffix
            )
        }
        ProtocolKind::OpenAi => format!("{}/v1/chat/completions", provider.base_url),
    }
}

/// Build the authentication headers for a protocol
pub fn auth_headers(protocol: ProtocolKind, api_key: &str) -> Vec<(String, String)> {
    let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];

    match protocol {
        ProtocolKind::Anthropic => {
            headers.push(("x-api-key".to_string(), api_key.to_string()));
            headers.push(("anthropic-version".to_string(), "2023-06-01".to_string()));
            headers.push((
                "anthropic-dangerous-direct-browser-access".to_string(),
                "true".to_string(),
            ));
        }
        ProtocolKind::Google => {
            headers.push(("x-goog-api-key".to_string(), api_key.to_string()));
        }
        ProtocolKind::OpenAi => {
            headers.push(("Authorization".to_string(), format!("Bearer {api_key}")));
        }
    }

    headers
}

/// Extract the text delta from one decoded SSE payload, if the frame
/// carries one for the given protocol
pub fn stream_delta(protocol: ProtocolKind, payload: &str) -> Option<String> {
    match protocol {
        ProtocolKind::OpenAi => openai::stream_delta(payload),
        ProtocolKind::Anthropic => anthropic::stream_delta(payload),
        ProtocolKind::Google => google::stream_delta(payload),
    }
}

/// Extract the full assistant text from a one-shot response body
///
/// A well-formed body missing the expected fields degrades to an empty
/// string rather than an error.
pub fn final_text(protocol: ProtocolKind, body: &[u8]) -> String {
    match protocol {
        ProtocolKind::OpenAi => openai::final_text(body),
        ProtocolKind::Anthropic => anthropic::final_text(body),
        ProtocolKind::Google => google::final_text(body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProtocolKind;

    fn provider(protocol: ProtocolKind, base_url: &str) -> ProviderDescriptor {
        ProviderDescriptor::new("p", "P", protocol, base_url)
    }

    #[test]
    fn openai_endpoint_ignores_streaming_flag() {
        let p = provider(ProtocolKind::OpenAi, "https://api.openai.com");
        assert_eq!(endpoint_url(&p, "gpt-4o", true), "https://api.openai.com/v1/chat/completions");
        assert_eq!(endpoint_url(&p, "gpt-4o", false), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn anthropic_endpoint() {
        let p = provider(ProtocolKind::Anthropic, "https://api.anthropic.com");
        assert_eq!(endpoint_url(&p, "claude", true), "https://api.anthropic.com/v1/messages");
    }

    #[test]
    fn google_endpoint_switches_on_streaming() {
        let p = provider(ProtocolKind::Google, "https://generativelanguage.googleapis.com");
        assert_eq!(
            endpoint_url(&p, "gemini-2.5-pro", true),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-pro:streamGenerateContent?alt=sse"
        );
        assert_eq!(
            endpoint_url(&p, "gemini-2.5-pro", false),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-pro:generateContent"
        );
    }

    #[test]
    fn openai_auth_header() {
        let headers = auth_headers(ProtocolKind::OpenAi, "sk-test");
        assert!(headers.contains(&("Authorization".to_string(), "Bearer sk-test".to_string())));
    }

    #[test]
    fn anthropic_auth_headers() {
        let headers = auth_headers(ProtocolKind::Anthropic, "sk-ant");
        assert!(headers.contains(&("x-api-key".to_string(), "sk-ant".to_string())));
        assert!(headers.contains(&("anthropic-version".to_string(), "2023-06-01".to_string())));
        assert!(headers.contains(&(
            "anthropic-dangerous-direct-browser-access".to_string(),
            "true".to_string()
        )));
    }

    #[test]
    fn google_auth_header() {
        let headers = auth_headers(ProtocolKind::Google, "key");
        assert!(headers.contains(&("x-goog-api-key".to_string(), "key".to_string())));
    }

    #[test]
    fn all_protocols_send_json_content_type() {
        for protocol in [ProtocolKind::OpenAi, ProtocolKind::Anthropic, ProtocolKind::Google] {
            let headers = auth_headers(protocol, "k");
            assert_eq!(headers[0], ("Content-Type".to_string(), "application/json".to_string()));
        }
    }
}
