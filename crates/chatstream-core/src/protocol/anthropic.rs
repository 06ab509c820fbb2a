//! Anthropic-style Messages protocol
//!
//! System messages do not travel in the `messages` array: they are pulled
//! out and joined with newlines into the single top-level `system` field,
//! which is omitted entirely when the conversation has none. The remaining
//! turns map 1:1 onto `{role, content}` in their original order.
//!
//! Streamed text arrives only in frames tagged `content_block_delta`, at
//! `delta.text`; other frame kinds (`message_start`, `ping`, ...) carry no
//! text. A one-shot response carries it at `content[0].text`.

use serde::{Deserialize, Serialize};

use crate::types::{ChatMessage, CompletionOptions, MessageRole};

#[derive(Debug, Serialize)]
struct RequestBody<'a> {
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: MessageRole,
    content: &'a str,
}

/// Serialize the outgoing request body
pub fn request_body(
    messages: &[ChatMessage],
    model_id: &str,
    options: &CompletionOptions,
) -> serde_json::Result<Vec<u8>> {
    let mut system_parts: Vec<&str> = Vec::new();
    let mut wire_messages: Vec<WireMessage<'_>> = Vec::new();

    for message in messages {
        if message.is_system() {
            system_parts.push(&message.content);
        } else {
            wire_messages.push(WireMessage {
                role: message.role,
                content: &message.content,
            });
        }
    }

    serde_json::to_vec(&RequestBody {
        model: model_id,
        system: (!system_parts.is_empty()).then(|| system_parts.join("\n")),
        messages: wire_messages,
        max_tokens: options.max_tokens_or_default(),
        temperature: options.temperature_or_default(),
        stream: options.is_streaming(),
    })
}

#[derive(Debug, Deserialize)]
struct StreamFrame {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Debug, Default, Deserialize)]
struct StreamDelta {
    text: Option<String>,
}

/// Extract the text delta from one streamed frame payload
pub fn stream_delta(payload: &str) -> Option<String> {
    let frame: StreamFrame = serde_json::from_str(payload).ok()?;
    if frame.kind != "content_block_delta" {
        return None;
    }
    frame.delta.text
}

#[derive(Debug, Default, Deserialize)]
struct ResponseBody {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Default, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

/// Extract the assistant text from a one-shot response body
pub fn final_text(body: &[u8]) -> String {
    serde_json::from_slice::<ResponseBody>(body)
        .ok()
        .and_then(|r| r.content.into_iter().next())
        .and_then(|block| block.text)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_is_lifted_out_and_turns_keep_order() {
        let messages = vec![
            ChatMessage::system("You are helpful"),
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello"),
        ];
        let body = request_body(&messages, "claude-sonnet-4-6", &CompletionOptions::new()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(value["system"], "You are helpful");
        let wire = value["messages"].as_array().unwrap();
        assert_eq!(wire.len(), 2);
        assert_eq!(wire[0]["role"], "user");
        assert_eq!(wire[0]["content"], "hi");
        assert_eq!(wire[1]["role"], "assistant");
        assert_eq!(wire[1]["content"], "hello");
    }

    #[test]
    fn multiple_system_messages_join_with_newline() {
        let messages = vec![
            ChatMessage::system("one"),
            ChatMessage::user("hi"),
            ChatMessage::system("two"),
        ];
        let body = request_body(&messages, "m", &CompletionOptions::new()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(value["system"], "one\ntwo");
        assert_eq!(value["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn system_field_omitted_when_absent() {
        let messages = vec![ChatMessage::user("hi")];
        let body = request_body(&messages, "m", &CompletionOptions::new()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert!(value.get("system").is_none());
        assert_eq!(value["max_tokens"], 4096);
        assert_eq!(value["temperature"], 0.7);
        assert_eq!(value["stream"], true);
    }

    #[test]
    fn delta_only_from_content_block_delta_frames() {
        assert_eq!(
            stream_delta(r#"{"type":"content_block_delta","delta":{"text":"Hi"}}"#),
            Some("Hi".to_string())
        );
        assert_eq!(stream_delta(r#"{"type":"message_start","message":{}}"#), None);
        assert_eq!(stream_delta(r#"{"type":"ping"}"#), None);
        assert_eq!(stream_delta("not-json"), None);
    }

    #[test]
    fn final_text_extraction() {
        assert_eq!(final_text(br#"{"content":[{"type":"text","text":"ok"}]}"#), "ok");
        assert_eq!(final_text(br#"{"content":[]}"#), "");
    }
}
