//! OpenAI-style Chat Completions protocol
//!
//! Wire shape:
//!
//! ```json
//! { "model": ..., "messages": [{"role", "content"}], "temperature",
//!   "max_tokens", "stream" }
//! ```
//!
//! Streamed frames carry deltas at `choices[0].delta.content` and the
//! stream ends with the literal `[DONE]` sentinel payload; a one-shot
//! response carries the text at `choices[0].message.content`.

use serde::{Deserialize, Serialize};

use crate::types::{ChatMessage, CompletionOptions};

#[derive(Debug, Serialize)]
struct RequestBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    max_tokens: u32,
    stream: bool,
}

/// Serialize the outgoing request body
pub fn request_body(
    messages: &[ChatMessage],
    model_id: &str,
    options: &CompletionOptions,
) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(&RequestBody {
        model: model_id,
        messages,
        temperature: options.temperature_or_default(),
        max_tokens: options.max_tokens_or_default(),
        stream: options.is_streaming(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct StreamFrame {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Default, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Debug, Default, Deserialize)]
struct Delta {
    content: Option<String>,
}

/// Extract the text delta from one streamed frame payload
pub fn stream_delta(payload: &str) -> Option<String> {
    let frame: StreamFrame = serde_json::from_str(payload).ok()?;
    frame.choices.into_iter().next()?.delta.content
}

#[derive(Debug, Default, Deserialize)]
struct ResponseBody {
    #[serde(default)]
    choices: Vec<ResponseChoice>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseChoice {
    #[serde(default)]
    message: ResponseMessage,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Extract the assistant text from a one-shot response body
pub fn final_text(body: &[u8]) -> String {
    serde_json::from_slice::<ResponseBody>(body)
        .ok()
        .and_then(|r| r.choices.into_iter().next())
        .and_then(|c| c.message.content)
        .unwrap_or_default()
}
