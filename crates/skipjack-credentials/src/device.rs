//! Device identity collaborator.
//!
//! Every derivation binds codes to the device that provisioned the identity,
//! so the device id must be stable for the lifetime of the install.
//! [`PersistentDeviceIdentity`] generates a random UUID on first use and
//! persists it to the app data directory; [`FixedDeviceIdentity`] serves
//! tests and hosts that supply their own identifier.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use uuid::Uuid;

use crate::store::StoreError;

/// Supplies the stable identifier of the current device.
pub trait DeviceIdentity: Send + Sync {
    /// The device id. Stable across calls on one device.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the id cannot be read or persisted.
    fn device_id(&self) -> Result<String, StoreError>;
}

impl<T: DeviceIdentity + ?Sized> DeviceIdentity for std::sync::Arc<T> {
    fn device_id(&self) -> Result<String, StoreError> {
        (**self).device_id()
    }
}

/// Host-supplied or test-fixed device id.
#[derive(Debug, Clone)]
pub struct FixedDeviceIdentity {
    id: String,
}

impl FixedDeviceIdentity {
    /// Identity provider that always returns `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl DeviceIdentity for FixedDeviceIdentity {
    fn device_id(&self) -> Result<String, StoreError> {
        Ok(self.id.clone())
    }
}

// ── Persistent provider ────────────────────────────────────────────

const DEVICE_ID_FILE: &str = "device_id";

/// File-backed device identity.
///
/// On first call, generates a UUIDv4, writes it atomically to
/// `{data_dir}/device_id` (owner-only on Unix), and returns the same value
/// forever after. The randomness of this id is what makes the derived master
/// seeds unguessable to anyone without read access to the device.
#[derive(Debug)]
pub struct PersistentDeviceIdentity {
    data_dir: PathBuf,
    cached: Mutex<Option<String>>,
}

impl PersistentDeviceIdentity {
    /// Provider rooted at `data_dir`. The directory must already exist.
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            cached: Mutex::new(None),
        }
    }

    fn load_or_create(&self) -> Result<String, StoreError> {
        let path = self.data_dir.join(DEVICE_ID_FILE);
        match fs::read_to_string(&path) {
            Ok(contents) => {
                let id = contents.trim().to_owned();
                if id.is_empty() {
                    return Err(StoreError(format!("{} is empty", path.display())));
                }
                return Ok(id);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError(format!("read {}: {e}", path.display()))),
        }

        let id = Uuid::new_v4().to_string();
        let tmp = self.data_dir.join(".device_id.tmp");
        fs::write(&tmp, &id).map_err(|e| StoreError(format!("write {}: {e}", tmp.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))
                .map_err(|e| StoreError(format!("chmod {}: {e}", tmp.display())))?;
        }

        fs::rename(&tmp, &path)
            .map_err(|e| StoreError(format!("rename into {}: {e}", path.display())))?;
        Ok(id)
    }
}

impl DeviceIdentity for PersistentDeviceIdentity {
    fn device_id(&self) -> Result<String, StoreError> {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(id) = cached.as_ref() {
            return Ok(id.clone());
        }
        let id = self.load_or_create()?;
        *cached = Some(id.clone());
        Ok(id)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
