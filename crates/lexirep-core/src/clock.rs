//! Clock boundary - injectable time source and local-day arithmetic
//!
//! The scheduler core never reads the wall clock on its own: every
//! operation takes `now` explicitly. The [`Clock`] trait exists for the
//! callers around the core (review submission, due-queue queries, tests)
//! so a fixed or stepped clock can be injected wherever real code would
//! use [`SystemClock`].

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};

/// Source of the current instant and the learner's timezone offset.
///
/// The offset defines day boundaries for "due today" semantics; see
/// [`CardSchedulingState::is_due_on_day`](crate::CardSchedulingState::is_due_on_day).
pub trait Clock {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;

    /// Learner-local UTC offset used for day boundaries (default UTC)
    fn local_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }
}

/// Wall-clock implementation for production callers
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    /// Learner-local offset; `None` means UTC
    pub offset: Option<FixedOffset>,
}

impl SystemClock {
    /// Wall clock with day boundaries at the given offset
    pub fn with_offset(offset: FixedOffset) -> Self {
        Self {
            offset: Some(offset),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_offset(&self) -> FixedOffset {
        self.offset.unwrap_or_else(|| FixedOffset::east_opt(0).unwrap())
    }
}

/// Settable, steppable clock for tests and replay tooling
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: DateTime<Utc>,
    offset: FixedOffset,
}

impl FixedClock {
    /// Create a clock frozen at the given instant (UTC day boundaries)
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now,
            offset: FixedOffset::east_opt(0).unwrap(),
        }
    }

    /// Create a clock frozen at the given instant with a local offset
    pub fn at_with_offset(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, offset }
    }

    /// Advance the clock by a duration
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    /// Jump the clock to a specific instant
    pub fn set(&mut self, now: DateTime<Utc>) {
        self.now = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn local_offset(&self) -> FixedOffset {
        self.offset
    }
}

/// Learner-local midnight containing the given instant, expressed in UTC.
pub fn local_day_start(ts: DateTime<Utc>, offset: FixedOffset) -> DateTime<Utc> {
    let local = ts.with_timezone(&offset);
    let midnight = local
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always a valid time");
    offset
        .from_local_datetime(&midnight)
        .single()
        .expect("fixed offsets have no DST gaps")
        .with_timezone(&Utc)
}

// ============================================================================
// TESTS
// ============================================================================
