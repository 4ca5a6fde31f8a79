//! Credential error types for `skipjack-credentials`.

use thiserror::Error;

use skipjack_otp_core::OtpCoreError;

use crate::store::StoreError;

/// Errors produced by credential operations.
///
/// User-facing verification outcomes (`Replayed`, `Invalid`, …) are not
/// errors — they live in
/// [`VerificationOutcome`](crate::verify::VerificationOutcome) so the UI can
/// branch on them directly. `Err` here means the operation itself could not
/// run.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Derivation failed (delegated from the core crate).
    #[error(transparent)]
    Core(#[from] OtpCoreError),

    /// Credential store read or write failed. Retryable from the UI's
    /// perspective.
    #[error(transparent)]
    Storage(#[from] StoreError),

    /// No record exists for the identity — it was never provisioned on this
    /// device.
    #[error("identity not provisioned: {0}")]
    NotProvisioned(String),

    /// The record is bound to a different device than the one asking.
    #[error("credential is bound to a different device")]
    DeviceMismatch,
}
