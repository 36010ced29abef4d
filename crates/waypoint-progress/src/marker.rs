//! Local save markers: existence-only persistence.
//!
//! A marker is a key that either exists or doesn't. There is no value to
//! read back, which keeps markers from ever being mistaken for real
//! progress data: they only answer "has this player started a game on
//! this machine?".

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::MarkerError;

/// Key-existence storage for local save markers.
pub trait MarkerStore: Send + Sync + 'static {
    fn has_marker(&self, key: &str) -> bool;

    /// Creates the marker. Creating an existing marker is not an error.
    fn set_marker(&self, key: &str) -> Result<(), MarkerError>;

    /// Removes the marker. Removing a missing marker is not an error.
    fn delete_marker(&self, key: &str) -> Result<(), MarkerError>;
}

// ---------------------------------------------------------------------------
// MemoryMarkerStore
// ---------------------------------------------------------------------------

/// Markers kept in memory for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryMarkerStore {
    keys: Mutex<HashSet<String>>,
}

impl MemoryMarkerStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `keys`.
    pub fn with_markers<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            keys: Mutex::new(keys.into_iter().map(Into::into).collect()),
        }
    }

    fn keys(&self) -> MutexGuard<'_, HashSet<String>> {
        self.keys.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MarkerStore for MemoryMarkerStore {
    fn has_marker(&self, key: &str) -> bool {
        self.keys().contains(key)
    }

    fn set_marker(&self, key: &str) -> Result<(), MarkerError> {
        self.keys().insert(key.to_string());
        Ok(())
    }

    fn delete_marker(&self, key: &str) -> Result<(), MarkerError> {
        self.keys().remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileMarkerStore
// ---------------------------------------------------------------------------

/// Markers persisted as empty files in one directory.
///
/// Survives restarts. Keys are escaped into safe file names, so a
/// username containing `/` or `..` can't escape the directory.
#[derive(Debug, Clone)]
pub struct FileMarkerStore {
    dir: PathBuf,
}

impl FileMarkerStore {
    /// Opens (creating if needed) a marker directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, MarkerError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| MarkerError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// The directory marker files live in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.marker", escape_key(key)))
    }
}

impl MarkerStore for FileMarkerStore {
    fn has_marker(&self, key: &str) -> bool {
        self.path_for(key).is_file()
    }

    fn set_marker(&self, key: &str) -> Result<(), MarkerError> {
        fs::write(self.path_for(key), b"").map_err(|source| MarkerError::Io {
            key: key.to_string(),
            source,
        })
    }

    fn delete_marker(&self, key: &str) -> Result<(), MarkerError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(MarkerError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// ASCII alphanumerics, `-` and `_` pass through; every other byte
/// becomes `%XX`.
fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}
