// src/fs/mock.rs

use super::DirectoryProbe;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockEntry {
    File,
    Dir,
}

/// In-memory directory probe.
///
/// Unknown paths report `NotFound`, like a file that disappeared before it
/// could be stat'ed. `probe_count` lets tests assert the probe was consulted.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
    probes: Arc<Mutex<usize>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut entries = self.entries.lock().unwrap();
        if let Some(parent) = path.parent() {
            Self::ensure_dirs(&mut entries, parent);
        }
        entries.insert(path, MockEntry::File);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut entries = self.entries.lock().unwrap();
        Self::ensure_dirs(&mut entries, path.as_ref());
    }

    pub fn probe_count(&self) -> usize {
        *self.probes.lock().unwrap()
    }

    fn ensure_dirs(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            entries
                .entry(ancestor.to_path_buf())
                .or_insert(MockEntry::Dir);
        }
    }
}

impl DirectoryProbe for MockFileSystem {
    fn is_dir(&self, path: &Path) -> io::Result<bool> {
        *self.probes.lock().unwrap() += 1;
        match self.entries.lock().unwrap().get(path) {
            Some(MockEntry::Dir) => Ok(true),
            Some(MockEntry::File) => Ok(false),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such entry: {}", path.display()),
            )),
        }
    }
}
