// src/watch/watcher.rs

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{info, trace, warn};

use crate::errors::Result;
use crate::watch::event::{FsEvent, FsEventKind};
use crate::watch::registry::WatchRegistry;

/// Capacity of the bounded channel between the watcher and the event loop.
///
/// When the loop falls behind, new events are dropped rather than queued.
pub const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive for
/// as long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Install a recursive watch on every distinct path in the registry and
/// forward relevant changes into `events_tx`.
///
/// Failing to watch any path is fatal: the caller exits before the event
/// loop starts.
pub fn spawn_watcher(
    registry: &WatchRegistry,
    events_tx: mpsc::Sender<FsEvent>,
) -> Result<WatcherHandle> {
    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => forward_event(&events_tx, event),
            Err(err) => warn!(error = %err, "file watch error"),
        },
        Config::default(),
    )?;

    for rule in registry.rules() {
        info!(rule = %rule.title(), "adding watch");
    }

    for path in registry.watched_paths() {
        watcher.watch(&path, RecursiveMode::Recursive)?;
        info!(path = ?path, "watching path");
    }

    Ok(WatcherHandle { _inner: watcher })
}

/// Translate one notify event into zero or more `FsEvent`s.
///
/// Uses `try_send`: a full channel drops the event (logged), it never blocks
/// notify's callback thread.
pub fn forward_event(events_tx: &mpsc::Sender<FsEvent>, event: Event) {
    let Some(kind) = FsEventKind::from_notify(&event.kind) else {
        trace!(kind = ?event.kind, paths = ?event.paths, "ignoring notify event kind");
        return;
    };

    for path in event.paths {
        match events_tx.try_send(FsEvent::new(kind, path)) {
            Ok(()) => {}
            Err(TrySendError::Full(dropped)) => {
                warn!(
                    path = ?dropped.path,
                    %kind,
                    "event channel full; dropping filesystem event"
                );
            }
            Err(TrySendError::Closed(_)) => {
                trace!("event channel closed; watcher has nowhere to send");
                return;
            }
        }
    }
}
