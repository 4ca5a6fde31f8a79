//! Emergency code channel — day-granularity break-glass fallback.
//!
//! Emergency codes rotate at local midnight instead of every five minutes
//! and carry no replay protection; the weaker guarantee is the accepted
//! price of a channel that must work when the primary path is exhausted.

use chrono::NaiveDate;
use skipjack_otp_core::{constant_time_eq, derive_emergency_code};

use crate::authenticator::{GeneratedCode, OfflineAuthenticator};
use crate::clock::Clock;
use crate::device::DeviceIdentity;
use crate::error::CredentialError;
use crate::store::CredentialStore;

impl<S, D, C> OfflineAuthenticator<S, D, C>
where
    S: CredentialStore,
    D: DeviceIdentity,
    C: Clock,
{
    /// Today's 8-digit emergency code, valid until the next local midnight.
    ///
    /// No side effects — repeated calls within one day return the same code.
    ///
    /// # Errors
    ///
    /// - [`CredentialError::NotProvisioned`] if no record exists.
    /// - [`CredentialError::DeviceMismatch`] if the record is bound to a
    ///   different device.
    /// - [`CredentialError::Storage`] if the store read fails.
    pub fn generate_emergency(&self, identity: &str) -> Result<GeneratedCode, CredentialError> {
        let code = self.emergency_code_for_date(identity, self.clock().today())?;
        Ok(GeneratedCode {
            code,
            valid_until: self.clock().next_midnight(),
        })
    }

    /// Emergency code for an arbitrary calendar day — lets a skipper print
    /// codes for the days of a trip before leaving coverage.
    ///
    /// # Errors
    ///
    /// Same as [`generate_emergency`](Self::generate_emergency).
    pub fn emergency_code_for_date(
        &self,
        identity: &str,
        date: NaiveDate,
    ) -> Result<String, CredentialError> {
        let record = self
            .load_record(identity)?
            .ok_or_else(|| CredentialError::NotProvisioned(identity.to_owned()))?;

        if self.current_device_id()? != record.device_id {
            return Err(CredentialError::DeviceMismatch);
        }

        let date_iso = date.format("%Y-%m-%d").to_string();
        Ok(derive_emergency_code(
            identity,
            &record.device_id,
            &date_iso,
            &record.master_seed,
        )?)
    }

    /// Check a candidate against today's emergency code only — no multi-day
    /// grace, no ledger mutation.
    ///
    /// # Errors
    ///
    /// - [`CredentialError::NotProvisioned`] if no record exists.
    /// - [`CredentialError::DeviceMismatch`] if the record is bound to a
    ///   different device.
    /// - [`CredentialError::Storage`] if the store read fails.
    pub fn verify_emergency(
        &self,
        identity: &str,
        candidate: &str,
    ) -> Result<bool, CredentialError> {
        let expected = self.emergency_code_for_date(identity, self.clock().today())?;
        Ok(constant_time_eq(expected.as_bytes(), candidate.as_bytes()))
    }
}
