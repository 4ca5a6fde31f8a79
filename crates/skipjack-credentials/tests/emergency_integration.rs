#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

//! Integration tests for the emergency channel: day-granularity rotation,
//! break-glass acceptance through the main verifier, and the deliberate
//! absence of replay protection.

use std::sync::Arc;

use chrono::NaiveDate;
use skipjack_credentials::{
    Clock, CredentialError, FixedClock, FixedDeviceIdentity, MemoryStore, OfflineAuthenticator,
    VerificationOutcome,
};

const IDENTITY: &str = "+4790000001";
const T0: u64 = 1_754_380_800;

type TestAuthenticator =
    OfflineAuthenticator<Arc<MemoryStore>, FixedDeviceIdentity, Arc<FixedClock>>;

fn provisioned() -> (TestAuthenticator, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(T0));
    clock.set_today(
        NaiveDate::from_ymd_opt(2026, 8, 5).unwrap(),
        T0 + 50_000,
    );
    let auth = OfflineAuthenticator::new(
        Arc::new(MemoryStore::new()),
        FixedDeviceIdentity::new("dev-1"),
        Arc::clone(&clock),
    );
    auth.provision(IDENTITY).unwrap();
    (auth, clock)
}

#[test]
fn emergency_code_is_stable_within_a_day() {
    let (auth, clock) = provisioned();

    let first = auth.generate_emergency(IDENTITY).unwrap();
    clock.advance(6 * 3600); // same calendar day, many windows later
    let second = auth.generate_emergency(IDENTITY).unwrap();

    assert_eq!(first.code, second.code);
    assert_eq!(first.code.len(), 8);
}

#[test]
fn emergency_code_rotates_at_the_next_day() {
    let (auth, clock) = provisioned();

    let today = auth.generate_emergency(IDENTITY).unwrap();
    clock.set_today(
        NaiveDate::from_ymd_opt(2026, 8, 6).unwrap(),
        T0 + 140_000,
    );
    let tomorrow = auth.generate_emergency(IDENTITY).unwrap();

    assert_ne!(today.code, tomorrow.code);
}

#[test]
fn emergency_expiry_is_the_next_local_midnight() {
    let (auth, clock) = provisioned();
    let generated = auth.generate_emergency(IDENTITY).unwrap();
    assert_eq!(generated.valid_until, clock.next_midnight());
}

#[test]
fn verify_emergency_accepts_todays_code_only() {
    let (auth, _) = provisioned();

    let today = auth.generate_emergency(IDENTITY).unwrap();
    let tomorrow = auth
        .emergency_code_for_date(IDENTITY, NaiveDate::from_ymd_opt(2026, 8, 6).unwrap())
        .unwrap();

    assert!(auth.verify_emergency(IDENTITY, &today.code).unwrap());
    assert!(
        !auth.verify_emergency(IDENTITY, &tomorrow).unwrap(),
        "no multi-day grace for emergency codes"
    );
    assert!(!auth.verify_emergency(IDENTITY, "00000000").unwrap());
}

#[test]
fn emergency_codes_are_not_replay_protected() {
    let (auth, _) = provisioned();
    let code = auth.generate_emergency(IDENTITY).unwrap().code;

    assert!(auth.verify_emergency(IDENTITY, &code).unwrap());
    assert!(
        auth.verify_emergency(IDENTITY, &code).unwrap(),
        "break-glass codes stay valid for the whole day"
    );
}

#[test]
fn main_verifier_falls_back_to_the_emergency_code() {
    let (auth, clock) = provisioned();
    let code = auth.generate_emergency(IDENTITY).unwrap().code;

    let outcome = auth.verify(IDENTITY, &code).unwrap();
    assert_eq!(
        outcome,
        VerificationOutcome::Valid {
            remaining: clock.next_midnight() - clock.now()
        }
    );

    // The ledger was not touched: the same emergency code passes again.
    assert!(matches!(
        auth.verify(IDENTITY, &code).unwrap(),
        VerificationOutcome::Valid { .. }
    ));
}

#[test]
fn pre_trip_codes_cover_future_dates() {
    let (auth, _) = provisioned();

    let day1 = auth
        .emergency_code_for_date(IDENTITY, NaiveDate::from_ymd_opt(2026, 8, 6).unwrap())
        .unwrap();
    let day2 = auth
        .emergency_code_for_date(IDENTITY, NaiveDate::from_ymd_opt(2026, 8, 7).unwrap())
        .unwrap();

    assert_eq!(day1.len(), 8);
    assert_ne!(day1, day2, "each trip day gets its own code");
}

#[test]
fn unknown_identity_errors() {
    let (auth, _) = provisioned();
    assert!(matches!(
        auth.generate_emergency("+4799999999"),
        Err(CredentialError::NotProvisioned(_))
    ));
    assert!(matches!(
        auth.verify_emergency("+4799999999", "12345678"),
        Err(CredentialError::NotProvisioned(_))
    ));
}
