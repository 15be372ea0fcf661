//! Interval policy - from updated memory state to a concrete due instant
//!
//! Learning/Relearning reviews get short fixed step durations (minutes)
//! to force rapid re-exposure; Review-phase reviews get the stability
//! interval at the configured desired retention, rounded to whole days,
//! clamped to the configured bounds, and fuzzed.
//!
//! Fuzz exists to spread a cohort of cards created together across due
//! dates. It is skipped below a threshold so it cannot defeat short
//! intervals, and it is deterministic: the jitter is drawn from a ChaCha
//! stream seeded by card identity and review counters, keeping the whole
//! scheduling path a pure function of its inputs.

use std::hash::{Hash, Hasher};

use chrono::Duration;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::algorithm::next_interval_days;

// ============================================================================
// STEP INTERVALS
// ============================================================================

/// Duration of a learning/relearning step.
///
/// Out-of-range indices land on the last step, so a shrunk configuration
/// cannot panic on a card persisted with a larger index.
pub fn step_interval(steps_minutes: &[i64], step: usize) -> Duration {
    let idx = step.min(steps_minutes.len().saturating_sub(1));
    Duration::minutes(steps_minutes[idx])
}

// ============================================================================
// REVIEW INTERVALS
// ============================================================================

/// Review-phase interval in whole days: the exact forgetting-curve
/// inversion, rounded and clamped to the configured bounds.
pub fn review_interval_days(
    stability: f64,
    desired_retention: f64,
    min_days: i64,
    max_days: i64,
    w: &[f64; 21],
) -> i64 {
    let exact = next_interval_days(stability, desired_retention, w);
    (exact.round() as i64).clamp(min_days, max_days)
}

/// Deterministic fuzz seed for a review: same card, same counters, same
/// jitter.
pub fn fuzz_seed(card_id: &str, reps: u32, lapses: u32) -> u64 {
    let mut hasher = std::hash::DefaultHasher::new();
    card_id.hash(&mut hasher);
    reps.hash(&mut hasher);
    lapses.hash(&mut hasher);
    hasher.finish()
}

/// Apply bounded jitter to a review interval.
///
/// Intervals below `threshold_days` pass through untouched. Otherwise the
/// result is drawn uniformly from the rounded `±fuzz_factor` band around
/// `days`, re-clamped to the configured bounds.
pub fn fuzz_interval_days(
    days: i64,
    fuzz_factor: f64,
    threshold_days: f64,
    min_days: i64,
    max_days: i64,
    seed: u64,
) -> i64 {
    if fuzz_factor <= 0.0 || (days as f64) < threshold_days {
        return days;
    }
    let lower = (((days as f64) * (1.0 - fuzz_factor)).round() as i64).clamp(min_days, max_days);
    let upper = (((days as f64) * (1.0 + fuzz_factor)).round() as i64).clamp(min_days, max_days);
    if lower >= upper {
        return days;
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.gen_range(lower..=upper)
}

// ============================================================================
// TESTS
// ============================================================================
