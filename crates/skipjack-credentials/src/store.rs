//! Credential store collaborator — trait, in-memory double, JSON file store.
//!
//! The core logic only requires `get`/`put` with read-after-write
//! consistency per identity; persistence mechanics (encryption at rest,
//! platform keystores) belong to the host. [`JsonFileStore`] is the plain
//! on-disk implementation used by the app shell; [`MemoryStore`] backs tests
//! and previews.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use crate::record::IdentityRecord;

/// Credential store failure. Retryable from the caller's perspective.
#[derive(Debug, Error)]
#[error("credential store error: {0}")]
pub struct StoreError(pub String);

/// Key-value persistence for identity records.
///
/// `put` must be atomic per record: a failed write leaves the previous
/// record intact, never a partial one.
pub trait CredentialStore: Send + Sync {
    /// Fetch the record for `identity`, if one exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store cannot be read.
    fn get(&self, identity: &str) -> Result<Option<IdentityRecord>, StoreError>;

    /// Persist `record` under `identity`, replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails; the previous record must
    /// remain intact in that case.
    fn put(&self, identity: &str, record: &IdentityRecord) -> Result<(), StoreError>;
}

impl<T: CredentialStore + ?Sized> CredentialStore for std::sync::Arc<T> {
    fn get(&self, identity: &str) -> Result<Option<IdentityRecord>, StoreError> {
        (**self).get(identity)
    }

    fn put(&self, identity: &str, record: &IdentityRecord) -> Result<(), StoreError> {
        (**self).put(identity, record)
    }
}

// ── In-memory store ────────────────────────────────────────────────

/// `HashMap`-backed store for tests and previews.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, IdentityRecord>>,
}

impl MemoryStore {
    /// Empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, identity: &str) -> Result<Option<IdentityRecord>, StoreError> {
        let records = self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(records.get(identity).cloned())
    }

    fn put(&self, identity: &str, record: &IdentityRecord) -> Result<(), StoreError> {
        let mut records = self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        records.insert(identity.to_owned(), record.clone());
        Ok(())
    }
}

// ── JSON file store ────────────────────────────────────────────────

const CREDENTIALS_FILE: &str = "credentials.json";

/// Plain-JSON file store under the app data directory.
///
/// All records live in one `credentials.json` map. Writes go through a
/// temp-file-and-rename sequence so a crash mid-write never corrupts the
/// previous state, and the file is restricted to owner-only permissions on
/// Unix.
#[derive(Debug)]
pub struct JsonFileStore {
    data_dir: PathBuf,
    io_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Store rooted at `data_dir`. The directory must already exist.
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            io_lock: Mutex::new(()),
        }
    }

    fn file_path(&self) -> PathBuf {
        self.data_dir.join(CREDENTIALS_FILE)
    }

    /// Load the full record map. A missing file is an empty map; a corrupt
    /// file is an error (credential records must not be silently dropped).
    fn load_map(&self) -> Result<HashMap<String, IdentityRecord>, StoreError> {
        let path = self.file_path();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(StoreError(format!("read {}: {e}", path.display()))),
        };
        serde_json::from_str(&contents)
            .map_err(|e| StoreError(format!("parse {}: {e}", path.display())))
    }

    fn save_map(&self, records: &HashMap<String, IdentityRecord>) -> Result<(), StoreError> {
        let path = self.file_path();
        let tmp = self.data_dir.join(".credentials.json.tmp");

        let json = serde_json::to_string_pretty(records)
            .map_err(|e| StoreError(format!("serialize records: {e}")))?;

        fs::write(&tmp, &json).map_err(|e| StoreError(format!("write {}: {e}", tmp.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))
                .map_err(|e| StoreError(format!("chmod {}: {e}", tmp.display())))?;
        }

        fs::rename(&tmp, &path)
            .map_err(|e| StoreError(format!("rename into {}: {e}", path.display())))
    }
}

impl CredentialStore for JsonFileStore {
    fn get(&self, identity: &str) -> Result<Option<IdentityRecord>, StoreError> {
        let _guard = self.io_lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.load_map()?.remove(identity))
    }

    fn put(&self, identity: &str, record: &IdentityRecord) -> Result<(), StoreError> {
        let _guard = self.io_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut records = self.load_map()?;
        records.insert(identity.to_owned(), record.clone());
        self.save_map(&records)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
