use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use fscanary::mail::{MailError, MailMessage, MailTransport};

/// A fake mail transport that:
/// - records every message it was asked to send (including failed ones)
/// - fails for recipients registered with `fail_for`.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    attempts: Arc<Mutex<Vec<MailMessage>>>,
    failing: Arc<Mutex<HashSet<String>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, recipient: &str) {
        self.failing.lock().unwrap().insert(recipient.to_string());
    }

    /// Every send attempt, in order.
    pub fn attempts(&self) -> Vec<MailMessage> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }

    /// Wait (polling) until at least `n` attempts were recorded.
    pub async fn wait_for_attempts(&self, n: usize) {
        while self.attempt_count() < n {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }
}

impl MailTransport for RecordingTransport {
    fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        self.attempts.lock().unwrap().push(message.clone());
        if self.failing.lock().unwrap().contains(&message.to) {
            return Err(MailError::Transport(format!(
                "550 mailbox unavailable: {}",
                message.to
            )));
        }
        Ok(())
    }
}
