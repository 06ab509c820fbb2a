//! Google-style generateContent protocol
//!
//! Non-system turns map to `{role, parts: [{text}]}` where the assistant
//! role is spelled `"model"` and everything else `"user"`. The first system
//! message (if any) becomes the separate `systemInstruction` field and is
//! not part of `contents`. The body carries no model id and no stream flag:
//! both are encoded in the endpoint URL.
//!
//! Streamed frames and one-shot responses share the same field path,
//! `candidates[0].content.parts[0].text`.

use serde::{Deserialize, Serialize};

use crate::types::{ChatMessage, CompletionOptions, MessageRole};

#[derive(Debug, Serialize)]
struct RequestBody<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Instruction<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Instruction<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

/// Serialize the outgoing request body
pub fn request_body(
    messages: &[ChatMessage],
    options: &CompletionOptions,
) -> serde_json::Result<Vec<u8>> {
    let contents = messages
        .iter()
        .filter(|m| !m.is_system())
        .map(|m| Content {
            role: if m.role == MessageRole::Assistant { "model" } else { "user" },
            parts: vec![Part { text: &m.content }],
        })
        .collect();

    let system_instruction = messages.iter().find(|m| m.is_system()).map(|m| Instruction {
        parts: vec![Part { text: &m.content }],
    });

    serde_json::to_vec(&RequestBody {
        contents,
        system_instruction,
        generation_config: GenerationConfig {
            temperature: options.temperature_or_default(),
            max_output_tokens: options.max_tokens_or_default(),
        },
    })
}

#[derive(Debug, Default, Deserialize)]
struct ResponseBody {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

fn first_candidate_text(body: ResponseBody) -> Option<String> {
    body.candidates
        .into_iter()
        .next()?
        .content
        .parts
        .into_iter()
        .next()?
        .text
}

/// Extract the text delta from one streamed frame payload
pub fn stream_delta(payload: &str) -> Option<String> {
    let frame: ResponseBody = serde_json::from_str(payload).ok()?;
    first_candidate_text(frame)
}

/// Extract the assistant text from a one-shot response body
pub fn final_text(body: &[u8]) -> String {
    serde_json::from_slice::<ResponseBody>(body)
        .ok()
        .and_then(first_candidate_text)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assistant_maps_to_model_role() {
        let messages = vec![
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello"),
            ChatMessage::user("again"),
        ];
        let body = request_body(&messages, &CompletionOptions::new()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

        let contents = value["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["role"], "user");
        assert_eq!(contents[1]["parts"][0]["text"], "hello");
    }

    #[test]
    fn first_system_message_becomes_system_instruction() {
        let messages = vec![
            ChatMessage::system("be brief"),
            ChatMessage::user("hi"),
            ChatMessage::system("ignored"),
        ];
        let body = request_body(&messages, &CompletionOptions::new()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "be brief");
        // System turns never appear in contents.
        assert_eq!(value["contents"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn system_instruction_omitted_when_absent() {
        let body = request_body(&[ChatMessage::user("hi")], &CompletionOptions::new()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert!(value.get("systemInstruction").is_none());
        assert_eq!(value["generationConfig"]["temperature"], 0.7);
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 4096);
        assert!(value.get("model").is_none());
        assert!(value.get("stream").is_none());
    }

    #[test]
    fn delta_and_final_share_the_field_path() {
        let payload = r#"{"candidates":[{"content":{"parts":[{"text":"Hi"}]}}]}"#;
        assert_eq!(stream_delta(payload), Some("Hi".to_string()));
        assert_eq!(final_text(payload.as_bytes()), "Hi");
    }

    #[test]
    fn tolerates_sparse_frames() {
        assert_eq!(stream_delta(r#"{"candidates":[]}"#), None);
        assert_eq!(stream_delta(r#"{"candidates":[{"content":{"parts":[]}}]}"#), None);
        assert_eq!(stream_delta("not-json"), None);
        assert_eq!(final_text(b"{}"), "");
    }
}
