//! Deterministic digit extraction from hash output.
//!
//! The extraction rule is part of the verification contract: the generator
//! and the verifier must reproduce it byte-for-byte, so it is implemented
//! exactly once, here, and pinned by known-answer tests. Resist the urge to
//! replace the fallback with something cleaner — both sides must agree on
//! this exact rule.

use data_encoding::HEXLOWER;

use crate::error::OtpCoreError;

/// Number of digits in an offline code (6 for primary, 8 for emergency).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodeLength {
    /// 6-digit primary code.
    Six,
    /// 8-digit emergency code.
    Eight,
}

impl CodeLength {
    /// Return the digit count.
    #[must_use]
    pub const fn count(self) -> usize {
        match self {
            Self::Six => 6,
            Self::Eight => 8,
        }
    }
}

/// Extract a fixed-length numeric code from a hash digest.
///
/// The rule:
/// 1. Encode the digest as lowercase hex and collect its ASCII digit
///    characters in order, up to the requested count.
/// 2. If the hex form runs out of digits, pad each remaining position with
///    `digest[i % digest.len()] % 10`, reading `i` from 0 upward.
///
/// A 32-byte digest essentially always yields enough hex digits on its own;
/// the fallback exists so the rule is total over any digest length.
///
/// # Errors
///
/// Returns [`OtpCoreError::Derivation`] when `digest` is empty.
#[must_use = "extracted code should be used or stored"]
pub fn extract_digits(digest: &[u8], length: CodeLength) -> Result<String, OtpCoreError> {
    if digest.is_empty() {
        return Err(OtpCoreError::Derivation("digest must not be empty".to_owned()));
    }

    let want = length.count();
    let hex = HEXLOWER.encode(digest);
    let mut code: String = hex.chars().filter(char::is_ascii_digit).take(want).collect();

    // Fallback padding for digit-poor digests.
    let mut i = 0usize;
    while code.len() < want {
        // digest is non-empty (checked above); both moduli are non-zero.
        #[allow(clippy::arithmetic_side_effects)]
        let digit = digest[i % digest.len()] % 10;
        code.push(char::from(b'0'.wrapping_add(digit)));
        i = i.wrapping_add(1);
    }

    Ok(code)
}

// ── Tests ───────────────────────────────────────────────────────────
