//! Error types for `skipjack-otp-core`.

use thiserror::Error;

/// Errors produced by offline code derivation.
///
/// Messages never contain seed bytes, digests, or derived codes.
#[derive(Debug, Error)]
pub enum OtpCoreError {
    /// Seed material has the wrong length or failed to decode.
    #[error("invalid seed material: {0}")]
    InvalidSeedMaterial(String),

    /// Derivation was given an input it cannot process (empty field,
    /// empty digest).
    #[error("derivation error: {0}")]
    Derivation(String),
}
