//! ChatStream Core
//!
//! Runtime-agnostic multi-provider chat completion client. One
//! [`ChatClient`] sends a conversation to an OpenAI-, Anthropic-, or
//! Google-style backend, decodes the server-sent event stream into ordered
//! text deltas, and supports cooperative cancellation of the in-flight
//! request (at most one per client; a new request replaces the old one).
//!
//! The provider registry, credential store, and HTTP transport are trait
//! seams the host supplies; in-memory and reqwest-backed implementations
//! ship here.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use chatstream_core::{
//!     ChatClient, ChatMessage, CompletionOptions, EnvCredentialStore,
//!     HttpTransport, MemoryProviderRegistry,
//! };
//!
//! let registry = Arc::new(MemoryProviderRegistry::with_built_ins());
//! registry.set_active_provider("anthropic");
//!
//! let client = ChatClient::new(
//!     registry,
//!     Arc::new(EnvCredentialStore::new()),
//!     Arc::new(HttpTransport::new()),
//! );
//!
//! let full_text = client
//!     .send_chat_completion(
//!         vec![ChatMessage::user("hello")],
//!         CompletionOptions::new(),
//!         |delta| print!("{delta}"),
//!     )
//!     .await?;
//! ```

pub mod client;
pub mod context;
pub mod credentials;
pub mod logging;
pub mod markdown;
pub mod protocol;
pub mod registry;
pub mod sse;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use types::{
    CancellationToken, ChatMessage, ClientSettings, CompletionOptions, Credential,
    MessageRole, ModelDescriptor, ProtocolKind, ProviderDescriptor,
};

pub use client::{ChatClient, ClientError, ClientResult, ConnectionTest};

pub use protocol::{build_request, PreparedRequest};

pub use sse::SseDecoder;

pub use transport::{
    ByteStream, HttpTransport, MockTransport, Transport, TransportError, TransportResponse,
    TransportResult,
};

pub use registry::{built_in_providers, MemoryProviderRegistry, ProviderRegistry};

pub use credentials::{
    CredentialStore, CredentialStoreError, CredentialStoreResult, EnvCredentialStore,
    MemoryCredentialStore,
};

pub use context::{
    build_context_string, estimate_token_count, truncate_to_token_budget, ContextItem,
    TRUNCATION_MARKER,
};

pub use markdown::{extract_code_blocks, CodeBlock};

pub use logging::{ConsoleLogger, Logger, NoOpLogger, SharedLogger};
