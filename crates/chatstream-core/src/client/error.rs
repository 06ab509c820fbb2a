//! Client error taxonomy

use thiserror::Error;

use crate::transport::TransportError;

/// Errors surfaced by the request lifecycle
///
/// Cancellation is deliberately absent: a cancelled request resolves with
/// an empty full text, not an error. Hosts display these messages
/// verbatim, so they carry no internal detail beyond what the provider
/// reported.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No provider is marked active in the registry
    #[error("No active AI provider configured")]
    NoActiveProvider,

    /// The active provider has no stored credential
    #[error("No API key configured for {provider}")]
    MissingCredential { provider: String },

    /// Non-2xx response; message extracted from the provider's error body
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Network failure distinct from cancellation
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Request body serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;
