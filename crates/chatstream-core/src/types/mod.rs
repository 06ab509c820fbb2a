//! Core types shared across the crate

mod cancellation;
mod message;
mod options;
mod provider;
mod settings;

pub use cancellation::CancellationToken;
pub use message::{ChatMessage, MessageRole};
pub use options::CompletionOptions;
pub use provider::{Credential, ModelDescriptor, ProtocolKind, ProviderDescriptor};
pub use settings::ClientSettings;
