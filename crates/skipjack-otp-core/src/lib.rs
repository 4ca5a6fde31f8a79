//! `skipjack-otp-core` — Pure offline code derivation primitives for SKIPJACK.
//!
//! This crate is the audit target for the offline credential scheme: zero I/O,
//! zero logging, zero async. It holds exactly the pieces the code generator
//! and the verifier must agree on bit-for-bit — window arithmetic, the digit
//! extraction rule, the SHA-256 derivations, and the master-seed wrapper.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod seed;

pub mod window;

pub mod digits;

pub mod derive;

pub use derive::{
    constant_time_eq, derive_emergency_code, derive_master_seed, derive_window_code,
};
pub use digits::{extract_digits, CodeLength};
pub use error::OtpCoreError;
pub use seed::{MasterSeed, SEED_LEN};
pub use window::{remaining_in_window, window_end, window_index, WINDOW_SECS};
