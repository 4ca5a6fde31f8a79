//! Five-minute window arithmetic shared by the generator and the verifier.

/// Length of a primary code window in seconds.
pub const WINDOW_SECS: u64 = 300;

/// Index of the window containing `now` (seconds since the Unix epoch).
#[must_use]
#[allow(clippy::arithmetic_side_effects)] // WINDOW_SECS is a non-zero constant
pub const fn window_index(now: u64) -> u64 {
    now / WINDOW_SECS
}

/// Unix second at which the window with this index ends.
///
/// Saturates at `u64::MAX` rather than wrapping for indices near the top of
/// the range.
#[must_use]
pub const fn window_end(index: u64) -> u64 {
    index.saturating_add(1).saturating_mul(WINDOW_SECS)
}

/// Seconds left in the given window at time `now` (zero once it has ended).
#[must_use]
pub const fn remaining_in_window(index: u64, now: u64) -> u64 {
    window_end(index).saturating_sub(now)
}

// ── Tests ───────────────────────────────────────────────────────────
