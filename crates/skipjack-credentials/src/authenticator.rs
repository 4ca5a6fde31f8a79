//! Offline authenticator — provisioning and primary code generation.
//!
//! All collaborators are constructor-injected (store, device identity,
//! clock) so every path is deterministic under test; there is no process-wide
//! instance. Verification lives in [`crate::verify`], the emergency channel
//! in [`crate::emergency`].

use std::sync::{Mutex, PoisonError};

use skipjack_otp_core::{
    derive_master_seed, derive_window_code, window_end, window_index, CodeLength,
};

use crate::clock::Clock;
use crate::device::DeviceIdentity;
use crate::error::CredentialError;
use crate::record::IdentityRecord;
use crate::store::CredentialStore;

/// Proof that provisioning ran, without exposing the seed.
///
/// The fingerprint is the short non-secret digest prefix from
/// [`skipjack_otp_core::MasterSeed::fingerprint`]; it lets support compare
/// two installs without ever shipping seed bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReceipt {
    /// The provisioned identity key.
    pub identity: String,
    /// Device the identity is bound to.
    pub device_id: String,
    /// `true` when this call created the record, `false` when it already
    /// existed (idempotent re-provision).
    pub created: bool,
    /// Non-secret seed fingerprint.
    pub seed_fingerprint: String,
}

/// A displayable code and the unix second its window ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCode {
    /// The numeric code (6 digits primary, 8 digits emergency).
    pub code: String,
    /// Unix second at which the code stops being current.
    pub valid_until: u64,
}

/// Offline credential engine for one device.
///
/// Short-lived synchronous calls driven by the UI event loop. The internal
/// mutex serializes every read-modify-write against the store so a racing
/// background refresh cannot drop a replay-ledger append.
pub struct OfflineAuthenticator<S, D, C> {
    store: S,
    device: D,
    clock: C,
    write_lock: Mutex<()>,
}

impl<S, D, C> OfflineAuthenticator<S, D, C>
where
    S: CredentialStore,
    D: DeviceIdentity,
    C: Clock,
{
    /// Authenticator over the given collaborators.
    pub const fn new(store: S, device: D, clock: C) -> Self {
        Self {
            store,
            device,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    /// Provision `identity` on this device.
    ///
    /// First call derives a master seed, binds the current device id, and
    /// persists a fresh record in a single store write. Every later call is
    /// idempotent: the existing record is returned untouched. Re-provisioning
    /// must never rotate the seed — rotation would silently invalidate codes
    /// generated moments earlier.
    ///
    /// # Errors
    ///
    /// - [`CredentialError::DeviceMismatch`] if the identity is already
    ///   bound to a different device.
    /// - [`CredentialError::Storage`] if the store read or write fails; no
    ///   partial record is left behind.
    pub fn provision(&self, identity: &str) -> Result<ProvisionReceipt, CredentialError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let device_id = self.device.device_id()?;

        if let Some(existing) = self.store.get(identity)? {
            if existing.device_id != device_id {
                return Err(CredentialError::DeviceMismatch);
            }
            return Ok(ProvisionReceipt {
                identity: existing.identity,
                device_id: existing.device_id,
                created: false,
                seed_fingerprint: existing.master_seed.fingerprint(),
            });
        }

        let seed = derive_master_seed(identity, &device_id, self.clock.now())?;
        let fingerprint = seed.fingerprint();
        let record = IdentityRecord::new(identity.to_owned(), device_id.clone(), seed);
        self.store.put(identity, &record)?;

        tracing::debug!(identity, "provisioned offline credential");
        Ok(ProvisionReceipt {
            identity: identity.to_owned(),
            device_id,
            created: true,
            seed_fingerprint: fingerprint,
        })
    }

    /// Generate the current 6-digit code for `identity`.
    ///
    /// Pure derivation over the stored seed and the current 5-minute window;
    /// the replay ledger is untouched. The advisory `last_code_time` stamp is
    /// written best-effort — a failed store write logs a warning and does not
    /// fail the call.
    ///
    /// # Errors
    ///
    /// - [`CredentialError::NotProvisioned`] if no record exists.
    /// - [`CredentialError::DeviceMismatch`] if the record is bound to a
    ///   different device.
    /// - [`CredentialError::Storage`] if the store read fails.
    pub fn generate(&self, identity: &str) -> Result<GeneratedCode, CredentialError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut record = self
            .store
            .get(identity)?
            .ok_or_else(|| CredentialError::NotProvisioned(identity.to_owned()))?;

        let device_id = self.device.device_id()?;
        if record.device_id != device_id {
            return Err(CredentialError::DeviceMismatch);
        }

        let now = self.clock.now();
        let index = window_index(now);
        let code = derive_window_code(
            identity,
            &record.device_id,
            index,
            &record.master_seed,
            CodeLength::Six,
        )?;

        record.last_code_time = Some(now);
        if let Err(e) = self.store.put(identity, &record) {
            tracing::warn!(identity, error = %e, "advisory last-code timestamp not persisted");
        }

        Ok(GeneratedCode {
            code,
            valid_until: window_end(index),
        })
    }

    pub(crate) fn load_record(
        &self,
        identity: &str,
    ) -> Result<Option<IdentityRecord>, CredentialError> {
        Ok(self.store.get(identity)?)
    }

    pub(crate) fn current_device_id(&self) -> Result<String, CredentialError> {
        Ok(self.device.device_id()?)
    }

    pub(crate) fn persist(
        &self,
        identity: &str,
        record: &IdentityRecord,
    ) -> Result<(), CredentialError> {
        Ok(self.store.put(identity, record)?)
    }

    pub(crate) const fn clock(&self) -> &C {
        &self.clock
    }

    pub(crate) const fn ledger_lock(&self) -> &Mutex<()> {
        &self.write_lock
    }
}
