// src/config/validate.rs

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use globset::Glob;

use crate::config::model::{ConfigFile, GlobalSettings, RawConfigFile, WatchConfig};
use crate::errors::{FscanaryError, Result};
use crate::types::local_hostname;

/// Highest accepted `logging` verbosity.
pub const MAX_LOGGING: u8 = 9;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::FscanaryError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let watches: Vec<WatchConfig> = raw.watch.iter().filter(|w| w.enabled).cloned().collect();

        ensure_has_watches(&watches)?;
        validate_global_config(&raw, &watches)?;
        for watch in &watches {
            validate_watch(watch)?;
        }
        validate_unique_titles(&watches)?;
        validate_quarantine_outside_watches(&watches)?;

        let smtp_from = match raw.smtp_from {
            Some(from) if !from.trim().is_empty() => from,
            _ => format!("fscanary@{}", local_hostname()),
        };

        let global = GlobalSettings {
            email: raw.email,
            smtp_from,
            smtp_server: raw.smtp_server,
            smtp_port: raw.smtp_port,
            logging: raw.logging,
        };

        Ok(ConfigFile::new_unchecked(global, watches))
    }
}

fn ensure_has_watches(watches: &[WatchConfig]) -> Result<()> {
    if watches.is_empty() {
        return Err(FscanaryError::ConfigError(
            "config must contain at least one enabled [[watch]] table".to_string(),
        ));
    }
    Ok(())
}

fn validate_global_config(raw: &RawConfigFile, watches: &[WatchConfig]) -> Result<()> {
    if raw.logging > MAX_LOGGING {
        return Err(FscanaryError::ConfigError(format!(
            "logging must be between 0 and {MAX_LOGGING} (got {})",
            raw.logging
        )));
    }

    if raw.smtp_port == 0 {
        return Err(FscanaryError::ConfigError(
            "smtp_port must be >= 1 (got 0)".to_string(),
        ));
    }

    // Mail settings only matter when something will actually be sent.
    if let Some(watch) = watches.iter().find(|w| w.notify) {
        if raw.email.trim().is_empty() {
            return Err(FscanaryError::ConfigError(format!(
                "watch '{}' has notify enabled but no operator `email` is configured",
                watch.title
            )));
        }
        if raw.smtp_server.trim().is_empty() {
            return Err(FscanaryError::ConfigError(format!(
                "watch '{}' has notify enabled but no `smtp_server` is configured",
                watch.title
            )));
        }
    }

    Ok(())
}

fn validate_watch(watch: &WatchConfig) -> Result<()> {
    if watch.title.trim().is_empty() {
        return Err(FscanaryError::ConfigError(
            "every [[watch]] table needs a non-empty `title`".to_string(),
        ));
    }

    if watch.path.is_empty() || watch.path.iter().any(|p| p.trim().is_empty()) {
        return Err(FscanaryError::ConfigError(format!(
            "watch '{}' must list at least one non-empty `path`",
            watch.title
        )));
    }

    if watch.pattern.is_empty() {
        return Err(FscanaryError::ConfigError(format!(
            "watch '{}' must list at least one `pattern`",
            watch.title
        )));
    }

    for pattern in watch.pattern.iter().chain(watch.exclude.iter()) {
        Glob::new(pattern).map_err(|source| FscanaryError::InvalidPattern {
            watch: watch.title.clone(),
            pattern: pattern.clone(),
            source,
        })?;
    }

    if watch.quarantine {
        validate_quarantine_dest(watch)?;
    }

    Ok(())
}

fn validate_quarantine_dest(watch: &WatchConfig) -> Result<()> {
    if watch.dest.trim().is_empty() {
        return Err(FscanaryError::QuarantineDest(format!(
            "'{}' has quarantine enabled but no destination directory configured",
            watch.title
        )));
    }
    if !Path::new(&watch.dest).is_dir() {
        return Err(FscanaryError::QuarantineDest(format!(
            "'{}' quarantine destination '{}' does not exist",
            watch.title, watch.dest
        )));
    }
    // Under the filesystem root every file would map onto itself.
    let has_normal_component = resolved(&watch.dest)
        .components()
        .any(|c| matches!(c, Component::Normal(_)));
    if !has_normal_component {
        return Err(FscanaryError::QuarantineDest(format!(
            "'{}' quarantine destination '{}' is the filesystem root",
            watch.title, watch.dest
        )));
    }
    Ok(())
}

/// Every event is checked against every rule, so a destination inside any
/// watched tree would see its own copies as new matches.
fn validate_quarantine_outside_watches(watches: &[WatchConfig]) -> Result<()> {
    let watched: Vec<PathBuf> = watches
        .iter()
        .flat_map(|w| w.path.iter())
        .map(|p| resolved(p))
        .collect();

    for watch in watches.iter().filter(|w| w.quarantine) {
        let dest = resolved(&watch.dest);
        if let Some(root) = watched.iter().find(|root| dest.starts_with(root)) {
            return Err(FscanaryError::QuarantineDest(format!(
                "'{}' quarantine destination '{}' is inside watched path '{}'",
                watch.title,
                watch.dest,
                root.display()
            )));
        }
    }
    Ok(())
}

/// Canonical form when the path exists, the path as written otherwise.
fn resolved(path: &str) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| PathBuf::from(path))
}

fn validate_unique_titles(watches: &[WatchConfig]) -> Result<()> {
    let mut seen = HashSet::new();
    for watch in watches {
        if !seen.insert(watch.title.as_str()) {
            return Err(FscanaryError::ConfigError(format!(
                "duplicate watch title '{}'",
                watch.title
            )));
        }
    }
    Ok(())
}
