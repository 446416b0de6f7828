// src/config/mod.rs

//! Configuration loading and validation for fscanary.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate startup invariants like quarantine destinations (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, DEFAULT_CONFIG_FILE};
pub use model::{ConfigFile, GlobalSettings, RawConfigFile, WatchConfig};
