//! Persisted language preference.
//!
//! In a browser this is a single string under a well-known localStorage key.
//! Here the store is a seam: a file-backed implementation for the
//! headless runtime and an in-memory one for tests and embedders that manage
//! persistence themselves.

use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;

/// Well-known key under which the preferred language is persisted.
pub const PREFERENCE_KEY: &str = "preferredLanguage";

/// Storage for the single persisted language preference.
pub trait PreferenceStore: Send + Sync {
    /// The persisted value, if any. Absence and read failure look the same to
    /// callers; the resolver treats both as "no preference".
    fn load(&self) -> Option<String>;

    /// Persist the value, replacing any previous one.
    fn save(&self, value: &str) -> io::Result<()>;
}

/// File-backed store: one small file named after [`PREFERENCE_KEY`].
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(PREFERENCE_KEY),
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let value = raw.trim().to_string();
                if value.is_empty() {
                    None
                } else {
                    Some(value)
                }
            }
            Err(e) => {
                debug!("No persisted preference at {:?}: {}", self.path, e);
                None
            }
        }
    }

    fn save(&self, value: &str) -> io::Result<()> {
        std::fs::write(&self.path, value)
    }
}

/// In-memory store, used by tests and short-lived embedders.
#[derive(Default)]
pub struct MemoryPreferenceStore {
    value: Mutex<Option<String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the stored value.
    pub fn with_value(value: &str) -> Self {
        Self {
            value: Mutex::new(Some(value.to_string())),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Option<String> {
        self.value.lock().ok()?.clone()
    }

    fn save(&self, value: &str) -> io::Result<()> {
        if let Ok(mut guard) = self.value.lock() {
            *guard = Some(value.to_string());
        }
        Ok(())
    }
}
