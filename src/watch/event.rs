// src/watch/event.rs

//! Raw filesystem events as seen by the event loop.

use std::fmt;
use std::path::PathBuf;

use notify::event::{EventKind, ModifyKind, RenameMode};

/// What happened to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsEventKind {
    Created,
    Modified,
    Renamed,
    Unknown,
}

impl FsEventKind {
    /// Map a `notify` event kind onto the kinds the classifier cares about.
    ///
    /// Returns `None` for kinds that are never forwarded: removals, access
    /// events, metadata-only changes, and the old name of a rename (that path
    /// no longer exists). `Name(Both)` carries `[old, new]` and follows a
    /// `Name(To)` for the same new name, so it is dropped too.
    pub fn from_notify(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(Self::Created),
            EventKind::Modify(ModifyKind::Name(RenameMode::From | RenameMode::Both)) => None,
            EventKind::Modify(ModifyKind::Name(_)) => Some(Self::Renamed),
            EventKind::Modify(ModifyKind::Metadata(_)) => None,
            EventKind::Modify(_) => Some(Self::Modified),
            EventKind::Remove(_) | EventKind::Access(_) => None,
            _ => Some(Self::Unknown),
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Modified => "Modified",
            Self::Renamed => "Renamed",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for FsEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// A single filesystem change, consumed exactly once by the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEvent {
    pub path: PathBuf,
    pub kind: FsEventKind,
}

impl FsEvent {
    pub fn new(kind: FsEventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn created(path: impl Into<PathBuf>) -> Self {
        Self::new(FsEventKind::Created, path)
    }

    pub fn modified(path: impl Into<PathBuf>) -> Self {
        Self::new(FsEventKind::Modified, path)
    }

    /// Final path segment, the only part patterns are matched against.
    pub fn basename(&self) -> Option<String> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }
}
