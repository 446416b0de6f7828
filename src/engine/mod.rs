// src/engine/mod.rs

//! Classification and the event loop.
//!
//! The pure classification step lives in [`classifier`]; the async/IO shell
//! that owns the event channel, the quarantine moves and the dispatcher
//! wake-ups is implemented in [`runtime`].

pub mod classifier;
pub mod runtime;

pub use classifier::{Classification, EventClassifier, RuleAction, RuleHit};
pub use runtime::{LoopStats, Runtime};
