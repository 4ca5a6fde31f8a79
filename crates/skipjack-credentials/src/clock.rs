//! Clock collaborator — injected so every time-dependent path is testable.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Time source for window and emergency-code derivation.
pub trait Clock: Send + Sync {
    /// Seconds since the Unix epoch.
    fn now(&self) -> u64;

    /// Calendar date in the device's local timezone. Emergency codes rotate
    /// when this changes.
    fn today(&self) -> NaiveDate;

    /// Unix second at which [`today`](Self::today) rolls over to the next
    /// date.
    fn next_midnight(&self) -> u64;
}

impl<T: Clock + ?Sized> Clock for std::sync::Arc<T> {
    fn now(&self) -> u64 {
        (**self).now()
    }

    fn today(&self) -> NaiveDate {
        (**self).today()
    }

    fn next_midnight(&self) -> u64 {
        (**self).next_midnight()
    }
}

// ── System clock ───────────────────────────────────────────────────

/// Wall-clock time in the device's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        u64::try_from(Utc::now().timestamp()).unwrap_or(0)
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn next_midnight(&self) -> u64 {
        let Some(tomorrow) = self.today().succ_opt() else {
            return u64::MAX;
        };
        let Some(start) = tomorrow.and_hms_opt(0, 0, 0) else {
            return u64::MAX;
        };
        // A DST gap exactly at midnight leaves no local reading; fall back
        // to the UTC interpretation.
        let ts = start
            .and_local_timezone(Local)
            .earliest()
            .map_or_else(|| start.and_utc().timestamp(), |dt| dt.timestamp());
        u64::try_from(ts).unwrap_or(0)
    }
}

// ── Fixed clock (test double) ──────────────────────────────────────

const SECS_PER_DAY: u64 = 86_400;

/// Settable clock for tests.
///
/// `new` derives the calendar fields from the timestamp's UTC reading;
/// `advance` moves only `now` — tests that cross a day boundary call
/// [`set_today`](Self::set_today) explicitly.
#[derive(Debug)]
pub struct FixedClock {
    now: AtomicU64,
    today: Mutex<NaiveDate>,
    next_midnight: AtomicU64,
}

impl FixedClock {
    /// Clock frozen at `now`, with `today` and `next_midnight` taken from
    /// the UTC calendar.
    #[must_use]
    pub fn new(now: u64) -> Self {
        let today = DateTime::from_timestamp(i64::try_from(now).unwrap_or(0), 0)
            .map_or(NaiveDate::MIN, |dt| dt.date_naive());
        let next_midnight = now
            .checked_div(SECS_PER_DAY)
            .unwrap_or(0)
            .saturating_add(1)
            .saturating_mul(SECS_PER_DAY);
        Self {
            now: AtomicU64::new(now),
            today: Mutex::new(today),
            next_midnight: AtomicU64::new(next_midnight),
        }
    }

    /// Move `now` forward by `secs`. Calendar fields are left alone.
    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }

    /// Pin `now` to an absolute timestamp.
    pub fn set_now(&self, now: u64) {
        self.now.store(now, Ordering::SeqCst);
    }

    /// Set the local calendar date and its rollover timestamp.
    pub fn set_today(&self, today: NaiveDate, next_midnight: u64) {
        *self
            .today
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = today;
        self.next_midnight.store(next_midnight, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }

    fn today(&self) -> NaiveDate {
        *self.today.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_midnight(&self) -> u64 {
        self.next_midnight.load(Ordering::SeqCst)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
