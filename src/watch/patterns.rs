// src/watch/patterns.rs

use std::fmt;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher, GlobSet, GlobSetBuilder};

use crate::config::WatchConfig;
use crate::errors::{FscanaryError, Result};
use crate::types::RuleTitle;

/// A single compiled include glob, kept next to its source text so a hit
/// can report which pattern matched.
#[derive(Clone)]
struct IncludePattern {
    pattern: String,
    matcher: GlobMatcher,
}

/// Compiled watch rule.
///
/// Patterns are matched against a file's basename (e.g. `"photo.jpg"`),
/// never the full path.
#[derive(Clone)]
pub struct WatchRule {
    title: RuleTitle,
    paths: Vec<PathBuf>,
    includes: Vec<IncludePattern>,
    excludes: Vec<String>,
    exclude_set: Option<GlobSet>,
    notify: bool,
    quarantine_dest: Option<PathBuf>,
}

impl fmt::Debug for WatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchRule")
            .field("title", &self.title)
            .field("paths", &self.paths)
            .field("include", &self.include_patterns().collect::<Vec<_>>())
            .field("exclude", &self.excludes)
            .field("notify", &self.notify)
            .field("quarantine_dest", &self.quarantine_dest)
            .finish()
    }
}

impl WatchRule {
    /// Compile a validated `[[watch]]` table.
    ///
    /// `dest` is only kept when `quarantine = true`.
    pub fn compile(watch: &WatchConfig) -> Result<Self> {
        let includes = watch
            .pattern
            .iter()
            .map(|pat| {
                let matcher = compile_glob(&watch.title, pat)?.compile_matcher();
                Ok(IncludePattern {
                    pattern: pat.clone(),
                    matcher,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let exclude_set = if watch.exclude.is_empty() {
            None
        } else {
            Some(build_globset(&watch.title, &watch.exclude)?)
        };

        let quarantine_dest = watch
            .quarantine
            .then(|| PathBuf::from(&watch.dest));

        Ok(Self {
            title: watch.title.clone(),
            paths: watch.path.iter().map(PathBuf::from).collect(),
            includes,
            excludes: watch.exclude.clone(),
            exclude_set,
            notify: watch.notify,
            quarantine_dest,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Directory trees this rule asked to watch.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn include_patterns(&self) -> impl Iterator<Item = &str> {
        self.includes.iter().map(|inc| inc.pattern.as_str())
    }

    pub fn exclude_patterns(&self) -> &[String] {
        &self.excludes
    }

    pub fn notify_enabled(&self) -> bool {
        self.notify
    }

    pub fn quarantine_enabled(&self) -> bool {
        self.quarantine_dest.is_some()
    }

    /// Quarantine destination root, if quarantine is enabled.
    pub fn quarantine_dest(&self) -> Option<&Path> {
        self.quarantine_dest.as_deref()
    }

    /// Returns true if any exclude pattern of this rule matches `basename`.
    pub fn is_excluded(&self, basename: &str) -> bool {
        self.exclude_set
            .as_ref()
            .is_some_and(|set| set.is_match(basename))
    }

    /// First include pattern, in configured order, that confirms a hit for
    /// `basename`.
    ///
    /// An include pattern defeated by an exclude counts as a non-match and
    /// evaluation moves on to the next include pattern.
    pub fn first_hit(&self, basename: &str) -> Option<&str> {
        self.includes
            .iter()
            .find(|inc| self.include_hit(inc, basename))
            .map(|inc| inc.pattern.as_str())
    }

    pub fn matches(&self, basename: &str) -> bool {
        self.first_hit(basename).is_some()
    }

    fn include_hit(&self, include: &IncludePattern, basename: &str) -> bool {
        include.matcher.is_match(basename) && !self.is_excluded(basename)
    }
}

fn compile_glob(watch: &str, pattern: &str) -> Result<Glob> {
    Glob::new(pattern).map_err(|source| FscanaryError::InvalidPattern {
        watch: watch.to_string(),
        pattern: pattern.to_string(),
        source,
    })
}

/// Build a GlobSet from simple string patterns.
fn build_globset(watch: &str, patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(compile_glob(watch, pat)?);
    }
    builder
        .build()
        .map_err(|source| FscanaryError::InvalidPattern {
            watch: watch.to_string(),
            pattern: patterns.join(", "),
            source,
        })
}
