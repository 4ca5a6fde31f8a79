//! Master-seed derivation Known Answer Tests.
//!
//! Expected fingerprint computed independently from
//! `SHA-256(identity | device_id | provisioned_at | SKIPJACK-OFFLINE-SEED-V1)`.

use skipjack_otp_core::{derive_master_seed, derive_window_code, CodeLength};

const IDENTITY: &str = "+911234567890";
const DEVICE_ID: &str = "dev-abc";
const PROVISIONED_AT: u64 = 1_754_380_800;

#[test]
fn derived_seed_fingerprint() {
    let seed = derive_master_seed(IDENTITY, DEVICE_ID, PROVISIONED_AT).unwrap();
    assert_eq!(seed.fingerprint(), "b5da6db0");
}

#[test]
fn window_code_under_derived_seed() {
    let seed = derive_master_seed(IDENTITY, DEVICE_ID, PROVISIONED_AT).unwrap();
    let code = derive_window_code(IDENTITY, DEVICE_ID, 100_001, &seed, CodeLength::Six).unwrap();
    assert_eq!(code, "004689", "leading zeros must be preserved end to end");
}
