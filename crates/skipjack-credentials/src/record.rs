//! Per-identity credential record and its bounded replay ledger.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use skipjack_otp_core::MasterSeed;

/// Maximum number of accepted codes remembered per identity. Oldest entries
/// are evicted first once the ledger is full.
pub const REPLAY_LEDGER_CAPACITY: usize = 50;

/// One provisioned phone-number-equivalent identity.
///
/// Created once by provisioning and mutated only by the generator (advisory
/// timestamp) and the verifier (ledger append + eviction). Never deleted
/// automatically — purging is an explicit external operation through the
/// store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRecord {
    /// Opaque identity key (phone-number equivalent).
    pub identity: String,

    /// Device the record was provisioned on; immutable thereafter.
    pub device_id: String,

    /// Per-identity master seed. Set exactly once, never rotated.
    pub master_seed: MasterSeed,

    /// Replay ledger: previously accepted codes, oldest first.
    #[serde(default)]
    pub used_codes: VecDeque<String>,

    /// Unix second of the last successful generation. Diagnostic only.
    #[serde(default)]
    pub last_code_time: Option<u64>,
}

impl IdentityRecord {
    /// Fresh record with an empty ledger.
    #[must_use]
    pub const fn new(identity: String, device_id: String, master_seed: MasterSeed) -> Self {
        Self {
            identity,
            device_id,
            master_seed,
            used_codes: VecDeque::new(),
            last_code_time: None,
        }
    }

    /// Whether `code` has already been accepted for this identity.
    #[must_use]
    pub fn is_used(&self, code: &str) -> bool {
        self.used_codes.iter().any(|used| used == code)
    }

    /// Append an accepted code to the ledger, evicting the oldest entries
    /// past [`REPLAY_LEDGER_CAPACITY`].
    pub fn record_use(&mut self, code: String) {
        self.used_codes.push_back(code);
        while self.used_codes.len() > REPLAY_LEDGER_CAPACITY {
            self.used_codes.pop_front();
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────
