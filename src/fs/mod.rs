// src/fs/mod.rs

//! Directory probe abstraction.
//!
//! The classifier asks a [`DirectoryProbe`] whether an event path is a
//! directory before evaluating any rule. Production uses [`RealFileSystem`];
//! tests use [`mock::MockFileSystem`].

use std::fmt::Debug;
use std::fs;
use std::io;
use std::path::Path;

pub mod mock;

/// Answers "is this path a directory?".
///
/// Errors (e.g. the path vanished between the event and the stat) are
/// returned as-is; the caller decides the policy.
pub trait DirectoryProbe: Send + Sync + Debug {
    fn is_dir(&self, path: &Path) -> io::Result<bool>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl DirectoryProbe for RealFileSystem {
    fn is_dir(&self, path: &Path) -> io::Result<bool> {
        Ok(fs::metadata(path)?.is_dir())
    }
}
