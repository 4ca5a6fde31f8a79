//! Code verification state machine.
//!
//! Check order is part of the contract:
//! 1. missing record → `NotProvisioned`
//! 2. replay ledger → `Replayed` (before any recomputation, so no window
//!    match can ever resurrect a burned code)
//! 3. device binding → `DeviceMismatch` (surfaced proactively rather than
//!    letting a foreign device fall through to `Invalid`)
//! 4. current window, then the immediately preceding window (clock-skew
//!    grace), constant-time compared; a match burns the code
//! 5. today's emergency code (no ledger mutation)
//! 6. `Invalid`

use std::sync::PoisonError;

use skipjack_otp_core::{
    constant_time_eq, derive_emergency_code, derive_window_code, remaining_in_window,
    window_index, CodeLength,
};

use crate::authenticator::OfflineAuthenticator;
use crate::clock::Clock;
use crate::device::DeviceIdentity;
use crate::error::CredentialError;
use crate::store::CredentialStore;

/// Result of checking one candidate code.
///
/// `Replayed` and `Invalid` are distinct so the UI can say "code already
/// used" instead of "wrong code".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// The code matched. `remaining` is the number of seconds left in the
    /// matched validity span — zero when a grace-window code matched after
    /// its own window already ended.
    Valid {
        /// Seconds of validity remaining.
        remaining: u64,
    },
    /// The code matched no acceptable window and no emergency code.
    Invalid,
    /// The code was accepted before and is burned.
    Replayed,
    /// The record is bound to a different device.
    DeviceMismatch,
    /// No record exists for the identity.
    NotProvisioned,
}

impl<S, D, C> OfflineAuthenticator<S, D, C>
where
    S: CredentialStore,
    D: DeviceIdentity,
    C: Clock,
{
    /// Verify a user-submitted candidate code for `identity`.
    ///
    /// A primary-window match appends the code to the replay ledger
    /// (evicting the oldest entry past capacity) and persists the record
    /// before returning. An emergency match deliberately leaves the ledger
    /// untouched — the break-glass channel trades replay protection for
    /// day-long validity.
    ///
    /// # Errors
    ///
    /// - [`CredentialError::Storage`] if the store read fails, or if the
    ///   ledger append cannot be persisted (the code is then not burned and
    ///   the caller may retry).
    pub fn verify(
        &self,
        identity: &str,
        candidate: &str,
    ) -> Result<VerificationOutcome, CredentialError> {
        let _guard = self
            .ledger_lock()
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let Some(mut record) = self.load_record(identity)? else {
            return Ok(VerificationOutcome::NotProvisioned);
        };

        if record.is_used(candidate) {
            tracing::debug!(identity, "rejected replayed code");
            return Ok(VerificationOutcome::Replayed);
        }

        if self.current_device_id()? != record.device_id {
            tracing::warn!(identity, "verification attempted from a foreign device");
            return Ok(VerificationOutcome::DeviceMismatch);
        }

        let now = self.clock().now();
        let current = window_index(now);

        // Current window, then the preceding one (none exists at index 0).
        for index in [Some(current), current.checked_sub(1)].into_iter().flatten() {
            let expected = derive_window_code(
                identity,
                &record.device_id,
                index,
                &record.master_seed,
                CodeLength::Six,
            )?;
            if constant_time_eq(expected.as_bytes(), candidate.as_bytes()) {
                record.record_use(candidate.to_owned());
                self.persist(identity, &record)?;
                return Ok(VerificationOutcome::Valid {
                    remaining: remaining_in_window(index, now),
                });
            }
        }

        let date = self.clock().today().format("%Y-%m-%d").to_string();
        let expected =
            derive_emergency_code(identity, &record.device_id, &date, &record.master_seed)?;
        if constant_time_eq(expected.as_bytes(), candidate.as_bytes()) {
            tracing::debug!(identity, "accepted emergency code");
            return Ok(VerificationOutcome::Valid {
                remaining: self.clock().next_midnight().saturating_sub(now),
            });
        }

        Ok(VerificationOutcome::Invalid)
    }
}
