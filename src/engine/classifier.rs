// src/engine/classifier.rs

//! Event classification.
//!
//! The classifier turns one [`FsEvent`] into the list of actions the event
//! loop should carry out. It performs no I/O beyond the directory probe, so
//! it can be unit tested with an in-memory probe and no Tokio runtime.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, trace};

use crate::fs::DirectoryProbe;
use crate::mail::PendingNotification;
use crate::types::RuleTitle;
use crate::watch::{FsEvent, WatchRegistry, WatchRule};

/// Something the IO shell must do for a confirmed rule hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleAction {
    /// Append this notification to the batch.
    Notify(PendingNotification),
    /// Move `source` under `dest_root`.
    Quarantine { source: PathBuf, dest_root: PathBuf },
}

/// A rule that confirmed a hit, with the include pattern that matched and
/// the actions to run, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleHit {
    pub rule: RuleTitle,
    pub pattern: String,
    pub actions: Vec<RuleAction>,
}

/// Result of classifying one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The path is a directory; no rule was evaluated.
    Directory,
    /// Zero or more rules hit, in registry order.
    Hits(Vec<RuleHit>),
}

impl Classification {
    pub fn hits(&self) -> &[RuleHit] {
        match self {
            Classification::Directory => &[],
            Classification::Hits(hits) => hits,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Classification::Directory)
    }
}

#[derive(Debug, Clone)]
pub struct EventClassifier {
    registry: Arc<WatchRegistry>,
    probe: Arc<dyn DirectoryProbe>,
    operator_email: String,
    hostname: String,
}

impl EventClassifier {
    pub fn new(
        registry: Arc<WatchRegistry>,
        probe: Arc<dyn DirectoryProbe>,
        operator_email: impl Into<String>,
        hostname: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            probe,
            operator_email: operator_email.into(),
            hostname: hostname.into(),
        }
    }

    pub fn registry(&self) -> &WatchRegistry {
        &self.registry
    }

    /// Decide which actions `event` triggers.
    ///
    /// Probe errors count as "not a directory": a file that vanished before
    /// it could be stat'ed is still reported, and its quarantine fails later
    /// with a logged error.
    pub fn classify(&self, event: &FsEvent) -> Classification {
        match self.probe.is_dir(&event.path) {
            Ok(true) => {
                info!(path = ?event.path, kind = %event.kind, "ignoring directory");
                return Classification::Directory;
            }
            Ok(false) => {}
            Err(err) => {
                debug!(
                    path = ?event.path,
                    error = %err,
                    "directory probe failed; treating as a file"
                );
            }
        }

        let Some(basename) = event.basename() else {
            trace!(path = ?event.path, "event path has no file name");
            return Classification::Hits(Vec::new());
        };

        let hits = self
            .registry
            .rules()
            .iter()
            .filter_map(|rule| self.evaluate_rule(rule, &basename, event))
            .collect();

        Classification::Hits(hits)
    }

    fn evaluate_rule(&self, rule: &WatchRule, basename: &str, event: &FsEvent) -> Option<RuleHit> {
        let pattern = rule.first_hit(basename)?;
        debug!(
            rule = %rule.title(),
            %pattern,
            path = ?event.path,
            kind = %event.kind,
            "match found"
        );

        let mut actions = Vec::with_capacity(2);
        if rule.notify_enabled() {
            actions.push(RuleAction::Notify(PendingNotification::for_match(
                &self.operator_email,
                rule.title(),
                pattern,
                &self.hostname,
                &event.path,
            )));
        }
        if let Some(dest_root) = rule.quarantine_dest() {
            actions.push(RuleAction::Quarantine {
                source: event.path.clone(),
                dest_root: dest_root.to_path_buf(),
            });
        }

        Some(RuleHit {
            rule: rule.title().to_string(),
            pattern: pattern.to_string(),
            actions,
        })
    }
}
