//! Private-state store implementations.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::application::record::write_atomic;
use crate::error::Result;
use crate::port::{PrivateStateEntry, PrivateStateStore};

/// JSON file holding a map of private-state id to entry.
///
/// Every write replaces the file atomically; the mutex serializes
/// read-modify-write cycles within the process.
pub struct FilePrivateStateStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FilePrivateStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, PrivateStateEntry>> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl PrivateStateStore for FilePrivateStateStore {
    fn get(&self, state_id: &str) -> Result<Option<PrivateStateEntry>> {
        let _guard = self.lock.lock();
        Ok(self.read_all()?.remove(state_id))
    }

    fn set(&self, state_id: &str, entry: PrivateStateEntry) -> Result<()> {
        let _guard = self.lock.lock();
        let mut entries = self.read_all()?;
        entries.insert(state_id.to_string(), entry);
        let json = serde_json::to_vec_pretty(&entries)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }
}

/// In-memory store for tests and dry runs.
#[derive(Default)]
pub struct MemoryPrivateStateStore {
    entries: Mutex<HashMap<String, PrivateStateEntry>>,
}

impl MemoryPrivateStateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrivateStateStore for MemoryPrivateStateStore {
    fn get(&self, state_id: &str) -> Result<Option<PrivateStateEntry>> {
        Ok(self.entries.lock().get(state_id).cloned())
    }

    fn set(&self, state_id: &str, entry: PrivateStateEntry) -> Result<()> {
        self.entries.lock().insert(state_id.to_string(), entry);
        Ok(())
    }
}
