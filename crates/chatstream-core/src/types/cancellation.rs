//! Cooperative request cancellation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Cancellation signal shared between a request and its owner
///
/// Clones share state: cancelling any clone cancels them all. Cancellation
/// is sticky and idempotent. Tasks observe it either by polling
/// [`is_cancelled`](Self::is_cancelled) or by awaiting
/// [`cancelled`](Self::cancelled) inside a `select!`.
#[derive(Clone, Default)]
pub struct CancellationToken {
    shared: Arc<Shared>,
}

#[derive(Default)]
struct Shared {
    flag: AtomicBool,
    notify: Notify,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.shared.flag.load(Ordering::SeqCst)
    }

    /// Request cancellation and wake all waiters
    pub fn cancel(&self) {
        if !self.shared.flag.swap(true, Ordering::SeqCst) {
            self.shared.notify.notify_waiters();
        }
    }

    /// Resolve once cancellation has been requested
    ///
    /// Returns immediately if the token is already cancelled.
    pub async fn cancelled(&self) {
        let notified = self.shared.notify.notified();
        tokio::pin!(notified);
        // Register interest before the flag check so a cancel() landing
        // in between still wakes us.
        notified.as_mut().enable();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }

    /// Whether two tokens are the same underlying signal
    pub(crate) fn same_as(&self, other: &CancellationToken) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("is_cancelled", &self.is_cancelled())
            .finish()
    }
}
