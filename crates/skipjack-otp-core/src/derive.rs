//! SHA-256 code and seed derivation for the offline credential scheme.
//!
//! Derivation input is a pipe-separated concatenation of the textual fields
//! followed by the raw seed bytes. The exact layouts:
//!
//! - window code:    `identity | device_id | window_index | seed`
//! - emergency code: `EMERGENCY | identity | device_id | YYYY-MM-DD | seed`
//! - master seed:    `identity | device_id | provisioned_at | <domain tag>`
//!
//! The window index and timestamp are rendered in decimal. These layouts are
//! part of the verification contract and pinned by known-answer tests.

use ring::digest;
use zeroize::Zeroize;

use crate::digits::{extract_digits, CodeLength};
use crate::error::OtpCoreError;
use crate::seed::MasterSeed;

/// Domain-separation tag mixed into master-seed derivation.
const SEED_DOMAIN_TAG: &[u8] = b"SKIPJACK-OFFLINE-SEED-V1";

/// Domain tag prefixed to emergency-code derivation input.
const EMERGENCY_DOMAIN_TAG: &[u8] = b"EMERGENCY";

/// Field separator within derivation input.
const SEP: u8 = b'|';

/// Constant-time byte comparison for candidate codes.
///
/// Returns `true` iff both slices have equal length and identical contents,
/// accumulating differences with bitwise OR to avoid short-circuit timing
/// leaks. The early return on length mismatch is fine here: the expected
/// digit count (6 or 8) is public, only the code value is protected.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut acc = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        acc |= x ^ y;
    }
    acc == 0
}

fn require_field(name: &str, value: &str) -> Result<(), OtpCoreError> {
    if value.is_empty() {
        return Err(OtpCoreError::Derivation(format!("{name} must not be empty")));
    }
    Ok(())
}

/// SHA-256 over the given parts joined by [`SEP`].
///
/// The assembled material is zeroized before returning because it contains
/// seed bytes.
fn hash_joined(parts: &[&[u8]]) -> [u8; 32] {
    let mut material: Vec<u8> = Vec::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            material.push(SEP);
        }
        material.extend_from_slice(part);
    }
    let hash = digest::digest(&digest::SHA256, &material);
    material.zeroize();
    let mut out = [0u8; 32];
    out.copy_from_slice(hash.as_ref());
    out
}

/// Derive the numeric code for one identity and time window.
///
/// Deterministic: the verifier recomputes this for the current and the
/// preceding window and compares with [`constant_time_eq`].
///
/// # Errors
///
/// Returns [`OtpCoreError::Derivation`] if `identity` or `device_id` is
/// empty.
#[must_use = "derived code should be used or stored"]
pub fn derive_window_code(
    identity: &str,
    device_id: &str,
    window_index: u64,
    seed: &MasterSeed,
    length: CodeLength,
) -> Result<String, OtpCoreError> {
    require_field("identity", identity)?;
    require_field("device id", device_id)?;

    let index_text = window_index.to_string();
    let hash = hash_joined(&[
        identity.as_bytes(),
        device_id.as_bytes(),
        index_text.as_bytes(),
        seed.expose(),
    ]);
    extract_digits(&hash, length)
}

/// Derive the 8-digit emergency code for one identity and calendar day.
///
/// `date_iso` is the device-local calendar date as `YYYY-MM-DD`. Emergency
/// codes rotate at local midnight and carry no replay protection.
///
/// # Errors
///
/// Returns [`OtpCoreError::Derivation`] if any textual field is empty.
#[must_use = "derived code should be used or stored"]
pub fn derive_emergency_code(
    identity: &str,
    device_id: &str,
    date_iso: &str,
    seed: &MasterSeed,
) -> Result<String, OtpCoreError> {
    require_field("identity", identity)?;
    require_field("device id", device_id)?;
    require_field("date", date_iso)?;

    let hash = hash_joined(&[
        EMERGENCY_DOMAIN_TAG,
        identity.as_bytes(),
        device_id.as_bytes(),
        date_iso.as_bytes(),
        seed.expose(),
    ]);
    extract_digits(&hash, CodeLength::Eight)
}

/// Derive a fresh master seed at provisioning time.
///
/// `provisioned_at` is the unix second of first provisioning. The entropy of
/// the result comes from `device_id`, which the host generates as a random
/// UUID; identity and timestamp only separate records from each other.
///
/// # Errors
///
/// Returns [`OtpCoreError::Derivation`] if `identity` or `device_id` is
/// empty.
pub fn derive_master_seed(
    identity: &str,
    device_id: &str,
    provisioned_at: u64,
) -> Result<MasterSeed, OtpCoreError> {
    require_field("identity", identity)?;
    require_field("device id", device_id)?;

    let stamp = provisioned_at.to_string();
    let mut hash = hash_joined(&[
        identity.as_bytes(),
        device_id.as_bytes(),
        stamp.as_bytes(),
        SEED_DOMAIN_TAG,
    ]);
    let seed = MasterSeed::from_slice(&hash);
    hash.zeroize();
    seed
}

// ── Tests ───────────────────────────────────────────────────────────
