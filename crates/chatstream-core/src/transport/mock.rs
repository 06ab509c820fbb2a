//! Scripted transport for tests
//!
//! Deterministic, network-free stand-in for [`HttpTransport`]: responds
//! with a fixed body, streams chunks with optional delays, fails the POST,
//! or stalls forever (useful for exercising cancellation). Every request
//! is recorded so tests can assert on the exact URL, headers, and body
//! that would have gone on the wire.

use async_trait::async_trait;
use bytes::Bytes;
use futures::{stream, StreamExt};
use parking_lot::Mutex;
use std::time::Duration;

use super::{Transport, TransportError, TransportResponse, TransportResult};

/// Behavior of the mock transport
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Respond with a status and a complete body
    Body { status: u16, body: String },
    /// Respond 200 and stream the given chunks, pausing between them
    Chunks { chunks: Vec<String>, delay_ms: u64 },
    /// Fail the POST itself
    Fail(String),
    /// Never respond; the caller is expected to cancel
    Stall,
}

/// A request the mock received, as it would have gone on the wire
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Parse the recorded body as JSON
    pub fn body_json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or(serde_json::Value::Null)
    }

    /// Look up a recorded header by name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Mock transport with a scripted response
pub struct MockTransport {
    mode: MockMode,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn with_mode(mode: MockMode) -> Self {
        Self {
            mode,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Respond with a status and complete body
    pub fn with_body(status: u16, body: impl Into<String>) -> Self {
        Self::with_mode(MockMode::Body {
            status,
            body: body.into(),
        })
    }

    /// Respond 200 and stream chunks with a delay between them
    pub fn with_chunks(chunks: Vec<String>, delay_ms: u64) -> Self {
        Self::with_mode(MockMode::Chunks { chunks, delay_ms })
    }

    /// Fail the POST with a transport error
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_mode(MockMode::Fail(message.into()))
    }

    /// Never respond until the caller gives up
    pub fn stalled() -> Self {
        Self::with_mode(MockMode::Stall)
    }

    /// All requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// The most recent request, if any
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: Vec<u8>,
    ) -> TransportResult<TransportResponse> {
        self.requests.lock().push(RecordedRequest {
            url: url.to_string(),
            headers: headers.to_vec(),
            body,
        });

        match &self.mode {
            MockMode::Body { status, body } => {
                let chunk = Bytes::from(body.clone());
                Ok(TransportResponse {
                    status: *status,
                    body: Box::pin(stream::once(async move { Ok(chunk) })),
                })
            }
            MockMode::Chunks { chunks, delay_ms } => {
                let delay_ms = *delay_ms;
                let body = stream::iter(chunks.clone().into_iter().enumerate()).then(
                    move |(index, chunk)| async move {
                        if index > 0 && delay_ms > 0 {
                            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                        }
                        Ok(Bytes::from(chunk))
                    },
                );
                Ok(TransportResponse {
                    status: 200,
                    body: Box::pin(body),
                })
            }
            MockMode::Fail(message) => Err(TransportError::Other(message.clone())),
            MockMode::Stall => futures::future::pending().await,
        }
    }
}
