// src/engine/runtime.rs

use std::fmt;
use std::path::PathBuf;

use anyhow::Context;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, trace};

use crate::errors::Result;
use crate::mail::{DispatcherHandle, NotificationBatch};
use crate::quarantine::quarantine_file;
use crate::watch::FsEvent;

use super::classifier::{Classification, EventClassifier, RuleAction, RuleHit};

/// Counters kept by the event loop, returned when it exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub events: usize,
    pub directories_ignored: usize,
    pub rule_hits: usize,
    pub notifications_queued: usize,
    pub quarantined: usize,
    pub quarantine_failures: usize,
}

/// The single consumer of the filesystem event channel.
///
/// Each iteration classifies one event, carries out its actions (queue the
/// notification, run the quarantine move to completion), then wakes the
/// dispatcher without waiting for it.
pub struct Runtime {
    classifier: EventClassifier,
    batch: NotificationBatch,
    dispatcher: DispatcherHandle,
    event_rx: mpsc::Receiver<FsEvent>,
    shutdown_rx: oneshot::Receiver<()>,
    stats: LoopStats,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("classifier", &self.classifier)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl Runtime {
    pub fn new(
        classifier: EventClassifier,
        batch: NotificationBatch,
        dispatcher: DispatcherHandle,
        event_rx: mpsc::Receiver<FsEvent>,
        shutdown_rx: oneshot::Receiver<()>,
    ) -> Self {
        Self {
            classifier,
            batch,
            dispatcher,
            event_rx,
            shutdown_rx,
            stats: LoopStats::default(),
        }
    }

    /// Main event loop.
    ///
    /// Exits when the shutdown signal fires or the event channel closes.
    /// In-flight dispatch work is not drained.
    pub async fn run(mut self) -> Result<LoopStats> {
        info!(rules = self.classifier.registry().len(), "fscanary event loop started");

        // A dropped shutdown sender only means nobody can ask us to stop.
        let mut shutdown_open = true;

        loop {
            tokio::select! {
                biased;

                signal = &mut self.shutdown_rx, if shutdown_open => {
                    match signal {
                        Ok(()) => {
                            info!("shutdown requested; leaving event loop");
                            break;
                        }
                        Err(_) => {
                            shutdown_open = false;
                            continue;
                        }
                    }
                }

                next = self.event_rx.recv() => {
                    let Some(event) = next else {
                        info!("event channel closed; exiting");
                        break;
                    };
                    self.handle_event(event).await;
                }
            }

            self.dispatcher.trigger();
        }

        info!(stats = ?self.stats, "event loop exiting");
        Ok(self.stats)
    }

    async fn handle_event(&mut self, event: FsEvent) {
        trace!(path = ?event.path, kind = %event.kind, "got event");
        self.stats.events += 1;

        match self.classifier.classify(&event) {
            Classification::Directory => self.stats.directories_ignored += 1,
            Classification::Hits(hits) => {
                for hit in hits {
                    self.apply_hit(hit).await;
                }
            }
        }
    }

    /// Run a hit's actions in order. A failed quarantine stops this rule only.
    async fn apply_hit(&mut self, hit: RuleHit) {
        self.stats.rule_hits += 1;

        for action in hit.actions {
            match action {
                RuleAction::Notify(notification) => {
                    info!(
                        rule = %hit.rule,
                        to = %notification.recipient,
                        "queueing notification"
                    );
                    self.batch.push(notification);
                    self.stats.notifications_queued += 1;
                }
                RuleAction::Quarantine { source, dest_root } => {
                    info!(rule = %hit.rule, path = ?source, dest = ?dest_root, "quarantining");
                    match run_quarantine(source.clone(), dest_root).await {
                        Ok(dest) => {
                            debug!(rule = %hit.rule, from = ?source, to = ?dest, "quarantine complete");
                            self.stats.quarantined += 1;
                        }
                        Err(err) => {
                            error!(rule = %hit.rule, path = ?source, error = %format!("{err:#}"), "quarantine failed");
                            self.stats.quarantine_failures += 1;
                            break;
                        }
                    }
                }
            }
        }
    }
}

/// Run the blocking move on the blocking pool and wait for it.
async fn run_quarantine(source: PathBuf, dest_root: PathBuf) -> anyhow::Result<PathBuf> {
    let dest = tokio::task::spawn_blocking(move || quarantine_file(&source, &dest_root))
        .await
        .context("quarantine task panicked")??;
    Ok(dest)
}
