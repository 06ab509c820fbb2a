//! Transport boundary
//!
//! The request lifecycle needs exactly one thing from HTTP: POST a body,
//! get back a status and a byte stream. Keeping that behind a trait keeps
//! the lifecycle testable without a network and lets hosts swap in their
//! own client.

mod http;
mod mock;

pub use http::HttpTransport;
pub use mock::{MockMode, MockTransport, RecordedRequest};

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;

/// Errors raised below the protocol layer
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network/HTTP failure (DNS, connect, TLS, mid-stream read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Transport-specific failure that is not an HTTP error
    #[error("transport error: {0}")]
    Other(String),
}

pub type TransportResult<T> = Result<T, TransportError>;

/// Ordered byte chunks of a response body
pub type ByteStream = Pin<Box<dyn Stream<Item = TransportResult<Bytes>> + Send>>;

/// Response to a transport POST: status plus the raw body stream
pub struct TransportResponse {
    pub status: u16,
    pub body: ByteStream,
}

impl TransportResponse {
    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Collect the entire body into memory (non-streaming path)
    pub async fn collect_body(self) -> TransportResult<Vec<u8>> {
        use futures::StreamExt;

        let mut body = self.body;
        let mut collected = Vec::new();
        while let Some(chunk) = body.next().await {
            collected.extend_from_slice(&chunk?);
        }
        Ok(collected)
    }
}

impl std::fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .finish()
    }
}

/// Minimal HTTP seam required by the request lifecycle
///
/// Cancellation is not part of the seam: callers race the returned future
/// and body stream against their cancellation signal, and dropping either
/// aborts the underlying call.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a POST and return the status plus the body byte stream
    async fn post(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: Vec<u8>,
    ) -> TransportResult<TransportResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range() {
        let ok = TransportResponse {
            status: 204,
            body: Box::pin(futures::stream::empty()),
        };
        assert!(ok.is_success());

        let err = TransportResponse {
            status: 404,
            body: Box::pin(futures::stream::empty()),
        };
        assert!(!err.is_success());
    }

    #[tokio::test]
    async fn collect_body_concatenates_chunks() {
        let response = TransportResponse {
            status: 200,
            body: Box::pin(futures::stream::iter(vec![
                Ok(Bytes::from_static(b"hel")),
                Ok(Bytes::from_static(b"lo")),
            ])),
        };
        assert_eq!(response.collect_body().await.unwrap(), b"hello");
    }
}
