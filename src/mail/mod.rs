// src/mail/mod.rs

//! Notification batching and delivery.
//!
//! - [`batch`] holds the shared [`NotificationBatch`] the classifier appends
//!   to and the dispatcher drains.
//! - [`dispatcher`] owns the single dispatch task that sends drained entries.
//! - [`smtp`] provides the production [`MailTransport`] on top of `lettre`.
//!
//! The transport is a blocking `send(message) -> Result` seam so tests can
//! swap in a recording fake.

use std::fmt::Debug;
use std::path::Path;

use chrono::{DateTime, Utc};
use thiserror::Error;

pub mod batch;
pub mod dispatcher;
pub mod smtp;

pub use batch::NotificationBatch;
pub use dispatcher::{DeliveryFailure, Dispatcher, DispatcherHandle, FlushReport};
pub use smtp::SmtpMailer;

/// A notification waiting in the batch for the next flush cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNotification {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl PendingNotification {
    /// Build the "file matching" notification for a confirmed rule hit.
    pub fn for_match(
        recipient: &str,
        rule: &str,
        pattern: &str,
        hostname: &str,
        path: &Path,
    ) -> Self {
        Self {
            recipient: recipient.to_string(),
            subject: format!("File Matching '{rule}'"),
            body: format!(
                "The following file matching pattern '{pattern}' was saved on host {hostname}\n\n{}",
                path.display()
            ),
            created_at: Utc::now(),
        }
    }
}

/// Fully addressed message handed to a [`MailTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl MailMessage {
    pub fn from_pending(from: &str, pending: PendingNotification) -> Self {
        Self {
            from: from.to_string(),
            to: pending.recipient,
            subject: pending.subject,
            body: pending.body,
        }
    }
}

#[derive(Error, Debug)]
pub enum MailError {
    #[error("invalid address '{address}': {reason}")]
    Address { address: String, reason: String },

    #[error("could not build message: {0}")]
    Message(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Blocking mail send primitive.
///
/// Called from `spawn_blocking`, never from the event loop directly.
pub trait MailTransport: Send + Sync + Debug {
    fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}
