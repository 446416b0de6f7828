#![allow(dead_code)]

use fscanary::config::{ConfigFile, RawConfigFile, WatchConfig};
use fscanary::errors::Result;

pub const OPERATOR_EMAIL: &str = "security@example.com";

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                email: OPERATOR_EMAIL.to_string(),
                smtp_from: Some("fscanary@test-host".to_string()),
                smtp_server: "localhost".to_string(),
                smtp_port: 25,
                logging: 1,
                watch: Vec::new(),
            },
        }
    }

    pub fn with_watch(mut self, watch: WatchConfig) -> Self {
        self.config.watch.push(watch);
        self
    }

    pub fn email(mut self, email: &str) -> Self {
        self.config.email = email.to_string();
        self
    }

    pub fn smtp_server(mut self, server: &str) -> Self {
        self.config.smtp_server = server.to_string();
        self
    }

    pub fn smtp_from(mut self, from: Option<&str>) -> Self {
        self.config.smtp_from = from.map(str::to_string);
        self
    }

    pub fn logging(mut self, level: u8) -> Self {
        self.config.logging = level;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn try_build(self) -> Result<ConfigFile> {
        ConfigFile::try_from(self.config)
    }

    pub fn build(self) -> ConfigFile {
        self.try_build()
            .expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a single `[[watch]]` table.
pub struct WatchConfigBuilder {
    watch: WatchConfig,
}

impl WatchConfigBuilder {
    pub fn new(title: &str) -> Self {
        Self {
            watch: WatchConfig::new(title),
        }
    }

    pub fn path(mut self, path: &str) -> Self {
        self.watch.path.push(path.to_string());
        self
    }

    pub fn pattern(mut self, pattern: &str) -> Self {
        self.watch.pattern.push(pattern.to_string());
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.watch.exclude.push(pattern.to_string());
        self
    }

    pub fn notify(mut self, val: bool) -> Self {
        self.watch.notify = val;
        self
    }

    pub fn quarantine_to(mut self, dest: &str) -> Self {
        self.watch.quarantine = true;
        self.watch.dest = dest.to_string();
        self
    }

    pub fn enabled(mut self, val: bool) -> Self {
        self.watch.enabled = val;
        self
    }

    pub fn build(self) -> WatchConfig {
        self.watch
    }
}
