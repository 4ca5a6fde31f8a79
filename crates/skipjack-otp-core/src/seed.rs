//! Master-seed secret wrapper.
//!
//! The per-identity master seed is the root of every code derivation. It is
//! held behind [`secrecy::SecretBox`] so it zeroizes on drop, never prints
//! through `Debug`, and only leaves this crate through the derivation
//! functions in [`crate::derive`] — callers hold a [`MasterSeed`], never raw
//! bytes.

use data_encoding::HEXLOWER;
use ring::digest;
use secrecy::{ExposeSecret, SecretBox};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::Zeroize;

use crate::error::OtpCoreError;

/// Master seed length in bytes (SHA-256 output).
pub const SEED_LEN: usize = 32;

/// Hex characters of the seed digest kept as the public fingerprint.
const FINGERPRINT_LEN: usize = 8;

/// Fixed-length master seed for one provisioned identity.
///
/// Generated exactly once per identity and never rotated — rotation would
/// silently invalidate every code derived moments earlier under the old
/// seed. Persisted through the serde implementation below as lowercase hex.
pub struct MasterSeed {
    inner: SecretBox<[u8; SEED_LEN]>,
}

impl MasterSeed {
    /// Wrap a 32-byte seed. The caller should zeroize its own copy after
    /// calling this.
    #[must_use]
    pub fn new(bytes: [u8; SEED_LEN]) -> Self {
        Self {
            inner: SecretBox::new(Box::new(bytes)),
        }
    }

    /// Wrap a seed from a byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`OtpCoreError::InvalidSeedMaterial`] if the slice is not
    /// exactly [`SEED_LEN`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, OtpCoreError> {
        if bytes.len() != SEED_LEN {
            return Err(OtpCoreError::InvalidSeedMaterial(format!(
                "expected {SEED_LEN}-byte seed, got {} bytes",
                bytes.len()
            )));
        }
        let mut arr = [0u8; SEED_LEN];
        arr.copy_from_slice(bytes);
        let seed = Self::new(arr);
        arr.zeroize();
        Ok(seed)
    }

    /// Borrow the raw seed bytes for derivation.
    ///
    /// Crate-private: the seed must not leave the derivation boundary.
    pub(crate) fn expose(&self) -> &[u8; SEED_LEN] {
        self.inner.expose_secret()
    }

    /// Short non-secret fingerprint of the seed (first 8 hex characters of
    /// its SHA-256 digest). Safe to display and log.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let hash = digest::digest(&digest::SHA256, self.expose());
        let mut hex = HEXLOWER.encode(hash.as_ref());
        hex.truncate(FINGERPRINT_LEN);
        hex
    }
}

impl Clone for MasterSeed {
    fn clone(&self) -> Self {
        Self::new(*self.expose())
    }
}

impl fmt::Debug for MasterSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterSeed(***)")
    }
}

impl Serialize for MasterSeed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut hex = HEXLOWER.encode(self.expose());
        let out = serializer.serialize_str(&hex);
        hex.zeroize();
        out
    }
}

impl<'de> Deserialize<'de> for MasterSeed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut hex = String::deserialize(deserializer)?;
        let decoded = HEXLOWER.decode(hex.as_bytes());
        hex.zeroize();
        let mut bytes =
            decoded.map_err(|e| D::Error::custom(format!("seed is not valid hex: {e}")))?;
        let seed = Self::from_slice(&bytes).map_err(D::Error::custom);
        bytes.zeroize();
        seed
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slice_rejects_wrong_length() {
        let result = MasterSeed::from_slice(&[0u8; 16]);
        assert!(
            matches!(result, Err(OtpCoreError::InvalidSeedMaterial(_))),
            "16-byte slice should be rejected, got: {result:?}"
        );
    }

    #[test]
    fn debug_output_is_masked() {
        let seed = MasterSeed::new([0x42; SEED_LEN]);
        assert_eq!(format!("{seed:?}"), "MasterSeed(***)");
    }

    #[test]
    fn fingerprint_is_stable_and_short() {
        let seed = MasterSeed::new([7u8; SEED_LEN]);
        let fp = seed.fingerprint();
        assert_eq!(fp.len(), FINGERPRINT_LEN);
        assert_eq!(fp, seed.fingerprint(), "fingerprint must be deterministic");
    }

    #[test]
    fn clone_preserves_fingerprint() {
        let seed = MasterSeed::new([9u8; SEED_LEN]);
        assert_eq!(seed.fingerprint(), seed.clone().fingerprint());
    }

    #[test]
    fn serde_roundtrip_preserves_seed() {
        let seed = MasterSeed::new([0xAB; SEED_LEN]);
        let json = serde_json::to_string(&seed).unwrap();
        let back: MasterSeed = serde_json::from_str(&json).unwrap();
        assert_eq!(seed.fingerprint(), back.fingerprint());
    }

    #[test]
    fn serde_form_is_lowercase_hex() {
        let seed = MasterSeed::new([0xAB; SEED_LEN]);
        let json = serde_json::to_string(&seed).unwrap();
        assert_eq!(json, format!("\"{}\"", "ab".repeat(SEED_LEN)));
    }

    #[test]
    fn deserialize_rejects_bad_hex() {
        let result: Result<MasterSeed, _> = serde_json::from_str("\"not-hex\"");
        assert!(result.is_err(), "non-hex seed string should be rejected");
    }

    #[test]
    fn deserialize_rejects_short_seed() {
        let result: Result<MasterSeed, _> = serde_json::from_str("\"abab\"");
        assert!(result.is_err(), "2-byte seed should be rejected");
    }
}
