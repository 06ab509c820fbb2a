//! Logger seam

use std::sync::Arc;

/// Host-pluggable logger
///
/// Request lifecycle events flow through this trait so hosts can route
/// them to their own sink (an output channel, a file, stderr). API keys
/// never pass through here.
pub trait Logger: Send + Sync {
    fn debug(&self, message: &str);

    fn info(&self, message: &str);

    fn warn(&self, message: &str);

    fn error(&self, message: &str);
}

/// Shared logger handle
pub type SharedLogger = Arc<dyn Logger>;
