// src/mail/batch.rs

use std::mem;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use super::PendingNotification;

/// Shared queue of notifications between the classifier and the dispatcher.
///
/// Cloning yields another handle to the same queue. `push` and `take` hold
/// the same lock, so a drain is an atomic swap: an entry pushed concurrently
/// lands either in the drained batch or in the next one, never both and
/// never neither.
#[derive(Debug, Clone, Default)]
pub struct NotificationBatch {
    inner: Arc<Mutex<Vec<PendingNotification>>>,
}

impl NotificationBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, notification: PendingNotification) {
        let mut pending = self.lock();
        pending.push(notification);
        debug!(pending = pending.len(), "notification queued");
    }

    /// Swap the current contents out for an empty queue.
    pub fn take(&self) -> Vec<PendingNotification> {
        mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // Poisoning is ignored: the Vec is never left half-updated.
    fn lock(&self) -> MutexGuard<'_, Vec<PendingNotification>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
