// src/watch/mod.rs

//! File watching and rule matching.
//!
//! This module is responsible for:
//! - Compiling `pattern` / `exclude` globs per watch rule.
//! - Holding the ordered, immutable [`WatchRegistry`].
//! - Wiring up a cross-platform filesystem watcher (`notify`) that feeds
//!   [`FsEvent`]s into the bounded event channel.
//!
//! It does **not** decide what happens on a match; that is the classifier's
//! job in [`crate::engine`].

pub mod event;
pub mod patterns;
pub mod registry;
pub mod watcher;

pub use event::{FsEvent, FsEventKind};
pub use patterns::WatchRule;
pub use registry::WatchRegistry;
pub use watcher::{forward_event, spawn_watcher, WatcherHandle, EVENT_CHANNEL_CAPACITY};
