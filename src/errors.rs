// src/errors.rs

//! Crate-wide error type and `Result` alias.
//!
//! Step-specific failures that never abort the process (quarantine moves,
//! mail sends) have their own error enums next to the code that produces
//! them; see [`crate::quarantine::QuarantineError`] and
//! [`crate::mail::MailError`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FscanaryError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Quarantine destination error: {0}")]
    QuarantineDest(String),

    #[error("Invalid glob pattern '{pattern}' in watch '{watch}': {source}")]
    InvalidPattern {
        watch: String,
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("File watch error: {0}")]
    WatchError(#[from] notify::Error),
}

pub type Result<T> = std::result::Result<T, FscanaryError>;
