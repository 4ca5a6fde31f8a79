//! `skipjack-credentials` — Offline credential provisioning and verification
//! for SKIPJACK.
//!
//! Lets a provisioned device prove possession of a device/phone-number
//! pairing and mint short-lived numeric codes with no network call: seed
//! provisioning, 5-minute window codes, replay-protected verification, and a
//! day-granularity emergency fallback. The store, device identity, and clock
//! are injected collaborators so the whole engine runs deterministically
//! under test.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod record;

pub mod store;

pub mod device;

pub mod clock;

pub mod authenticator;
pub mod verify;

pub mod emergency;

pub use authenticator::{GeneratedCode, OfflineAuthenticator, ProvisionReceipt};
pub use clock::{Clock, FixedClock, SystemClock};
pub use device::{DeviceIdentity, FixedDeviceIdentity, PersistentDeviceIdentity};
pub use error::CredentialError;
pub use record::{IdentityRecord, REPLAY_LEDGER_CAPACITY};
pub use store::{CredentialStore, JsonFileStore, MemoryStore, StoreError};
pub use verify::VerificationOutcome;
