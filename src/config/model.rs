// src/config/model.rs

use serde::{Deserialize, Deserializer};

use crate::types::RuleTitle;

/// Top-level configuration as read from a TOML file, before validation.
///
/// ```toml
/// email = "security@example.com"
/// smtp_server = "mail.example.com"
/// smtp_port = 25
/// logging = 1
///
/// [[watch]]
/// title = "images"
/// path = ["/data"]
/// pattern = ["*.jpg"]
/// exclude = ["tmp_*.jpg"]
/// quarantine = true
/// dest = "/quarantine"
/// ```
///
/// `[[watch]]` is an array of tables so the configured order survives
/// deserialization; rules are evaluated in that order.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// Operator address every notification is sent to.
    #[serde(default)]
    pub email: String,

    /// Envelope sender; defaults to `fscanary@<hostname>` when absent.
    #[serde(default)]
    pub smtp_from: Option<String>,

    #[serde(default)]
    pub smtp_server: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// Log verbosity, 0-9. Messages above this threshold are suppressed.
    #[serde(default = "default_logging")]
    pub logging: u8,

    #[serde(default)]
    pub watch: Vec<WatchConfig>,
}

/// One `[[watch]]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
    pub title: RuleTitle,

    /// Directory tree(s) to watch recursively. A single string is accepted.
    #[serde(deserialize_with = "one_or_many")]
    pub path: Vec<String>,

    /// Include globs, matched against the file name only.
    #[serde(deserialize_with = "one_or_many")]
    pub pattern: Vec<String>,

    /// Exclude globs; an include hit that also matches one of these is
    /// ignored for that include pattern.
    #[serde(default, deserialize_with = "one_or_many")]
    pub exclude: Vec<String>,

    #[serde(default = "default_true")]
    pub notify: bool,

    #[serde(default)]
    pub quarantine: bool,

    /// Quarantine destination root; required when `quarantine = true`.
    #[serde(default)]
    pub dest: String,

    /// Disabled watches are dropped at load time.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl WatchConfig {
    /// Minimal notify-only watch, mostly useful for builders.
    pub fn new(title: impl Into<RuleTitle>) -> Self {
        Self {
            title: title.into(),
            path: Vec::new(),
            pattern: Vec::new(),
            exclude: Vec::new(),
            notify: true,
            quarantine: false,
            dest: String::new(),
            enabled: true,
        }
    }
}

/// Global settings after defaults have been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalSettings {
    pub email: String,
    pub smtp_from: String,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub logging: u8,
}

/// Validated configuration.
///
/// Only constructible through `TryFrom<RawConfigFile>` (see `validate.rs`)
/// or [`ConfigFile::new_unchecked`]. Holds enabled watches only.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    global: GlobalSettings,
    watches: Vec<WatchConfig>,
}

impl ConfigFile {
    pub fn new_unchecked(global: GlobalSettings, watches: Vec<WatchConfig>) -> Self {
        Self { global, watches }
    }

    pub fn global(&self) -> &GlobalSettings {
        &self.global
    }

    /// Enabled watches in configured order.
    pub fn watches(&self) -> &[WatchConfig] {
        &self.watches
    }
}

pub(crate) fn default_smtp_port() -> u16 {
    25
}

pub(crate) fn default_logging() -> u8 {
    1
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}
