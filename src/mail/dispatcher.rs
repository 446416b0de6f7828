// src/mail/dispatcher.rs

//! Drains the notification batch and hands each entry to the transport.
//!
//! A single background task owns all sending. The event loop only calls
//! [`DispatcherHandle::trigger`], which never blocks: wake-ups that arrive
//! while a cycle is in flight coalesce into one follow-up cycle, so the
//! number of concurrent sends stays at one no matter how fast events come.

use std::sync::Arc;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{MailMessage, MailTransport, NotificationBatch};

/// Outcome of one flush cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub attempted: usize,
    pub sent: usize,
    pub failures: Vec<DeliveryFailure>,
}

impl FlushReport {
    pub fn is_empty(&self) -> bool {
        self.attempted == 0
    }
}

/// A notification that could not be delivered. It is dropped, not retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    pub recipient: String,
    pub subject: String,
    pub error: String,
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    batch: NotificationBatch,
    transport: Arc<dyn MailTransport>,
    from: String,
}

impl Dispatcher {
    pub fn new(
        batch: NotificationBatch,
        transport: Arc<dyn MailTransport>,
        from: impl Into<String>,
    ) -> Self {
        Self {
            batch,
            transport,
            from: from.into(),
        }
    }

    /// Run one flush cycle: swap the batch out, then attempt every entry.
    ///
    /// A failed send is recorded in the report and the cycle moves on to the
    /// next entry. Entries pushed after the swap wait for the next cycle.
    pub async fn flush(&self) -> FlushReport {
        let drained = self.batch.take();
        let mut report = FlushReport {
            attempted: drained.len(),
            ..FlushReport::default()
        };

        if drained.is_empty() {
            return report;
        }
        debug!(count = drained.len(), "flushing notification batch");

        for pending in drained {
            let message = MailMessage::from_pending(&self.from, pending);
            let transport = Arc::clone(&self.transport);
            let recipient = message.to.clone();
            let subject = message.subject.clone();

            let outcome = tokio::task::spawn_blocking(move || transport.send(&message)).await;

            let error = match outcome {
                Ok(Ok(())) => {
                    report.sent += 1;
                    info!(to = %recipient, subject = %subject, "notification sent");
                    continue;
                }
                Ok(Err(err)) => err.to_string(),
                Err(join_err) => format!("send task failed: {join_err}"),
            };

            warn!(to = %recipient, subject = %subject, error = %error, "notification dropped");
            report.failures.push(DeliveryFailure {
                recipient,
                subject,
                error,
            });
        }

        report
    }

    /// Move the dispatcher onto its own task and return a handle for waking it.
    pub fn spawn(self) -> DispatcherHandle {
        let wake = Arc::new(Notify::new());
        let task_wake = Arc::clone(&wake);

        let task = tokio::spawn(async move {
            loop {
                task_wake.notified().await;
                let report = self.flush().await;
                if !report.is_empty() {
                    debug!(
                        attempted = report.attempted,
                        sent = report.sent,
                        failed = report.failures.len(),
                        "flush cycle finished"
                    );
                }
            }
        });

        DispatcherHandle { wake, task }
    }
}

/// Handle to the background dispatch task.
///
/// Dropping the handle does not stop the task; pending sends are simply
/// abandoned when the runtime shuts down.
#[derive(Debug)]
pub struct DispatcherHandle {
    wake: Arc<Notify>,
    task: JoinHandle<()>,
}

impl DispatcherHandle {
    /// Request a flush cycle. Returns immediately.
    pub fn trigger(&self) {
        self.wake.notify_one();
    }

    /// Stop the dispatch task, abandoning any in-flight cycle.
    pub fn abort(&self) {
        self.task.abort();
    }
}
