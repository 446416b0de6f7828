// src/quarantine.rs

//! Metadata-preserving copy-then-delete relocation of matched files.
//!
//! Destinations may live on a different volume than the watched tree, so a
//! plain `rename` is not an option. The move is done in strict steps and the
//! source is only removed once the copy, its permission bits and its
//! modification time are in place. A crash between the copy and the removal
//! leaves both files on disk; the event that triggered the move is already
//! consumed, so nothing retries it.

use std::fs::{self, File, Permissions};
use std::io;
use std::path::{Component, Path, PathBuf};

use filetime::FileTime;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum QuarantineError {
    #[error("source {path:?} is not available: {source}")]
    SourceMissing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("source {path:?} is not a regular file")]
    NotAFile { path: PathBuf },

    #[error("destination for {path:?} under {dest_root:?} is the source itself")]
    SameFile { path: PathBuf, dest_root: PathBuf },

    #[error("could not create destination directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not copy {from:?} to {to:?}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not apply metadata to {path:?}: {source}")]
    ApplyMetadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("copy at {path:?} does not match the source ({detail})")]
    Verify { path: PathBuf, detail: String },

    #[error("copied to {dest:?} but could not remove source {path:?}: {source}")]
    RemoveSource {
        path: PathBuf,
        dest: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where `source` lands under `dest_root`.
///
/// The full source path is re-rooted under the destination, so
/// `/data/photo.jpg` into `/quarantine` becomes `/quarantine/data/photo.jpg`.
/// Only normal components are kept: a prefix, the root and any `.`/`..`
/// never escape `dest_root`.
pub fn destination_for(source: &Path, dest_root: &Path) -> PathBuf {
    let mut dest = dest_root.to_path_buf();
    for component in source.components() {
        if let Component::Normal(part) = component {
            dest.push(part);
        }
    }
    dest
}

/// Relocate `source` under `dest_root`, preserving content, permission mode
/// and modification time. Returns the destination path.
///
/// Any failure before the final step leaves the source untouched.
pub fn quarantine_file(source: &Path, dest_root: &Path) -> Result<PathBuf, QuarantineError> {
    let dest = destination_for(source, dest_root);

    // 1. source exists; capture mode + mtime
    let meta = fs::metadata(source).map_err(|e| QuarantineError::SourceMissing {
        path: source.to_path_buf(),
        source: e,
    })?;
    if !meta.is_file() {
        return Err(QuarantineError::NotAFile {
            path: source.to_path_buf(),
        });
    }
    let permissions = meta.permissions();
    let mtime = FileTime::from_last_modification_time(&meta);
    if is_same_file(source, &dest) {
        return Err(QuarantineError::SameFile {
            path: source.to_path_buf(),
            dest_root: dest_root.to_path_buf(),
        });
    }

    // 2. destination directories
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| QuarantineError::CreateDir {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    // 3. bytes
    let copied = copy_contents(source, &dest).map_err(|e| QuarantineError::Copy {
        from: source.to_path_buf(),
        to: dest.clone(),
        source: e,
    })?;
    debug!(from = ?source, to = ?dest, bytes = copied, "quarantine copy written");

    // 4. mode + mtime; times first so a read-only mode cannot get in the way
    apply_metadata(&dest, permissions.clone(), mtime).map_err(|e| {
        QuarantineError::ApplyMetadata {
            path: dest.clone(),
            source: e,
        }
    })?;
    verify_copy(&dest, meta.len(), &permissions, mtime)?;

    // 5. only now remove the source
    fs::remove_file(source).map_err(|e| QuarantineError::RemoveSource {
        path: source.to_path_buf(),
        dest: dest.clone(),
        source: e,
    })?;

    info!(from = ?source, to = ?dest, "file quarantined");
    Ok(dest)
}

// A missing destination can't be the source; an existing one is compared
// after resolving symlinks and `..`.
fn is_same_file(source: &Path, dest: &Path) -> bool {
    match (fs::canonicalize(source), fs::canonicalize(dest)) {
        (Ok(source), Ok(dest)) => source == dest,
        _ => false,
    }
}

fn copy_contents(source: &Path, dest: &Path) -> io::Result<u64> {
    let mut reader = File::open(source)?;
    // An earlier copy may be read-only; replace it rather than open it.
    match fs::symlink_metadata(dest) {
        Ok(existing) if !existing.is_dir() => fs::remove_file(dest)?,
        _ => {}
    }
    let mut writer = File::create(dest)?;
    let copied = io::copy(&mut reader, &mut writer)?;
    writer.sync_all()?;
    Ok(copied)
}

fn apply_metadata(dest: &Path, permissions: Permissions, mtime: FileTime) -> io::Result<()> {
    filetime::set_file_times(dest, mtime, mtime)?;
    fs::set_permissions(dest, permissions)
}

fn verify_copy(
    dest: &Path,
    expected_len: u64,
    permissions: &Permissions,
    mtime: FileTime,
) -> Result<(), QuarantineError> {
    let meta = fs::metadata(dest).map_err(|e| QuarantineError::ApplyMetadata {
        path: dest.to_path_buf(),
        source: e,
    })?;

    let mismatch = if meta.len() != expected_len {
        Some(format!("size {} != {}", meta.len(), expected_len))
    } else if meta.permissions() != *permissions {
        Some("permission mode differs".to_string())
    } else if FileTime::from_last_modification_time(&meta).unix_seconds() != mtime.unix_seconds() {
        // whole seconds: the destination volume may store coarser timestamps
        Some("modification time differs".to_string())
    } else {
        None
    };

    match mismatch {
        Some(detail) => Err(QuarantineError::Verify {
            path: dest.to_path_buf(),
            detail,
        }),
        None => Ok(()),
    }
}
