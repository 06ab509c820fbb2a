//! reqwest-backed transport

use async_trait::async_trait;
use futures::StreamExt;

use super::{Transport, TransportResponse, TransportResult};

/// Production transport over a shared `reqwest::Client`
///
/// Dropping the returned body stream (or the pending `post` future) aborts
/// the underlying connection, which is how request cancellation reaches
/// the wire.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a pre-configured client (proxies, timeouts, TLS settings)
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: Vec<u8>,
    ) -> TransportResult<TransportResponse> {
        let mut request = self.client.post(url).body(body);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes_stream().map(|chunk| chunk.map_err(Into::into));

        Ok(TransportResponse {
            status,
            body: Box::pin(body),
        })
    }
}
