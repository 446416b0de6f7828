// src/watch/registry.rs

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::debug;

use crate::config::ConfigFile;
use crate::errors::Result;
use crate::watch::patterns::WatchRule;

/// Ordered, immutable set of compiled watch rules.
///
/// Built once at startup from a validated [`ConfigFile`] and shared
/// read-only (behind an `Arc`) with the classifier and the watcher.
#[derive(Debug, Clone, Default)]
pub struct WatchRegistry {
    rules: Vec<WatchRule>,
}

impl WatchRegistry {
    pub fn new(rules: Vec<WatchRule>) -> Self {
        Self { rules }
    }

    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        let rules = cfg
            .watches()
            .iter()
            .map(WatchRule::compile)
            .collect::<Result<Vec<_>>>()?;
        debug!(rules = rules.len(), "watch registry built");
        Ok(Self::new(rules))
    }

    /// Rules in configured order.
    pub fn rules(&self) -> &[WatchRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Every distinct path any rule watches, sorted.
    pub fn watched_paths(&self) -> Vec<PathBuf> {
        self.rules
            .iter()
            .flat_map(|rule| rule.paths().iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
