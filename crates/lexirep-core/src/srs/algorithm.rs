//! FSRS-6 memory model - pure functions over (stability, difficulty)
//!
//! Implements the 21-parameter FSRS-6 formulation:
//!
//! - Retrievability: `R(t, S) = (1 + F * t / S)^d` where `d = -w20` and
//!   `F = 0.9^(1/d) - 1`, so that `R(S, S) = 0.9` by construction
//! - Interval inversion: `t(S, r) = S / F * (r^(1/d) - 1)`, the exact
//!   inverse of the forgetting curve
//! - Per-rating initial stability/difficulty tables for first reviews
//! - Multiplicative stability growth on recall, a separate lapse formula
//!   on failure, and the short-term `S^(-w19)` term for same-day reviews
//!
//! Every function here is deterministic, total over valid inputs
//! (`stability > 0`, rating in the closed enum), and f64 throughout, so
//! results reproduce bit-for-bit for identical inputs and weights.
//!
//! Reference: https://github.com/open-spaced-repetition/fsrs4anki

use crate::card::Rating;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Default FSRS-6 weight vector (w0..w20).
///
/// These are the published FSRS-6 population defaults; per-learner fitted
/// vectors can be supplied through
/// [`SchedulerConfig::weights`](crate::SchedulerConfig).
pub const DEFAULT_WEIGHTS: [f64; 21] = [
    0.212, 1.2931, 2.3065, 8.2956, 6.4133, 0.8334, 3.0194, 0.001, 1.8722, 0.1666, 0.796, 1.4835,
    0.0614, 0.2629, 1.6483, 0.6014, 1.8729, 0.5425, 0.0912, 0.0658, 0.1542,
];

/// Number of weights in the FSRS-6 parameter vector
pub const WEIGHT_COUNT: usize = 21;

/// Floor for stability; keeps the forgetting curve well-defined
pub const MIN_STABILITY: f64 = 0.001;

/// Ceiling for stability (100 years, matching the interval cap)
pub const MAX_STABILITY: f64 = 36_500.0;

/// Lower difficulty bound (easiest)
pub const MIN_DIFFICULTY: f64 = 1.0;

/// Upper difficulty bound (hardest)
pub const MAX_DIFFICULTY: f64 = 10.0;

/// Retrievability at `t = stability`; anchors the forgetting curve
pub const REFERENCE_RETENTION: f64 = 0.9;

// ============================================================================
// FORGETTING CURVE
// ============================================================================

/// Forgetting-curve decay exponent `d = -w20`
#[inline]
pub fn decay(w: &[f64; 21]) -> f64 {
    -w[20]
}

/// Forgetting-curve factor `F = 0.9^(1/d) - 1`
#[inline]
pub fn factor(w: &[f64; 21]) -> f64 {
    REFERENCE_RETENTION.powf(1.0 / decay(w)) - 1.0
}

/// Predicted probability of recall after `elapsed_days` at the given
/// stability.
///
/// `R(t, S) = (1 + F * t / S)^d`; equals [`REFERENCE_RETENTION`] when
/// `elapsed_days == stability`.
pub fn retrievability(elapsed_days: f64, stability: f64, w: &[f64; 21]) -> f64 {
    (1.0 + factor(w) * elapsed_days / stability).powf(decay(w))
}

/// Elapsed time (days, fractional) at which retrievability drops to
/// `desired_retention`. Exact inverse of [`retrievability`]:
/// `retrievability(next_interval_days(s, r, w), s, w) == r`.
pub fn next_interval_days(stability: f64, desired_retention: f64, w: &[f64; 21]) -> f64 {
    stability / factor(w) * (desired_retention.powf(1.0 / decay(w)) - 1.0)
}

// ============================================================================
// INITIAL STATE (first review of a New card)
// ============================================================================

/// Initial stability after the first review: `S0(G) = w[G-1]`
pub fn initial_stability(rating: Rating, w: &[f64; 21]) -> f64 {
    w[rating.value() as usize - 1].max(MIN_STABILITY)
}

/// Initial difficulty after the first review:
/// `D0(G) = w4 - e^(w5 * (G - 1)) + 1`, clamped to `[1, 10]`
pub fn initial_difficulty(rating: Rating, w: &[f64; 21]) -> f64 {
    let g = rating.value() as f64;
    (w[4] - ((g - 1.0) * w[5]).exp() + 1.0).clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

// ============================================================================
// DIFFICULTY UPDATE
// ============================================================================

/// Next difficulty after a review.
///
/// Linear damping pulls difficulty toward the rating's direction with a
/// step that shrinks as difficulty approaches 10, then mean reversion
/// (rate `w7`) pulls it toward the Easy-card initial difficulty. Again
/// increases difficulty, Easy decreases it.
pub fn next_difficulty(difficulty: f64, rating: Rating, w: &[f64; 21]) -> f64 {
    let g = rating.value() as f64;
    let delta = -w[6] * (g - 3.0);
    let damped = difficulty + delta * (MAX_DIFFICULTY - difficulty) / 9.0;
    let reverted = w[7] * initial_difficulty(Rating::Easy, w) + (1.0 - w[7]) * damped;
    reverted.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

// ============================================================================
// STABILITY UPDATE
// ============================================================================

/// Next stability after successful recall (Hard/Good/Easy).
///
/// Growth is multiplicative and larger when the review happened at low
/// retrievability (reviewed late, genuinely at risk of forgetting).
/// Hard applies the `w15` penalty (< 1), Easy the `w16` bonus (> 1).
pub fn next_recall_stability(
    stability: f64,
    difficulty: f64,
    retrievability: f64,
    rating: Rating,
    w: &[f64; 21],
) -> f64 {
    let hard_penalty = if rating == Rating::Hard { w[15] } else { 1.0 };
    let easy_bonus = if rating == Rating::Easy { w[16] } else { 1.0 };
    let growth = w[8].exp()
        * (11.0 - difficulty)
        * stability.powf(-w[9])
        * ((w[10] * (1.0 - retrievability)).exp() - 1.0)
        * hard_penalty
        * easy_bonus;
    (stability * (1.0 + growth)).clamp(MIN_STABILITY, MAX_STABILITY)
}

/// Next stability after a lapse (Again).
///
/// Recomputed from scratch rather than grown, and capped at the
/// pre-review stability: forgetting never makes a memory more stable.
pub fn next_forget_stability(
    stability: f64,
    difficulty: f64,
    retrievability: f64,
    w: &[f64; 21],
) -> f64 {
    let forgotten = w[11]
        * difficulty.powf(-w[12])
        * ((stability + 1.0).powf(w[13]) - 1.0)
        * (w[14] * (1.0 - retrievability)).exp();
    forgotten.min(stability).clamp(MIN_STABILITY, MAX_STABILITY)
}

/// Next stability for a same-day review (elapsed < 1 day), where the
/// long-term curve degenerates (`R = 1`). FSRS-6 short-term term:
/// `S' = S * e^(w17 * (G - 3 + w18)) * S^(-w19)`.
pub fn same_day_stability(stability: f64, rating: Rating, w: &[f64; 21]) -> f64 {
    let g = rating.value() as f64;
    let next = stability * (w[17] * (g - 3.0 + w[18])).exp() * stability.powf(-w[19]);
    next.clamp(MIN_STABILITY, MAX_STABILITY)
}

/// One full memory-model step: `(stability', difficulty')` after reviewing
/// with `rating` at `elapsed_days` since the previous review.
///
/// Dispatches between the same-day, recall, and lapse formulas. Callers
/// handle the first review of a New card separately via the initial
/// tables ([`initial_stability`] / [`initial_difficulty`]).
pub fn update_memory(
    stability: f64,
    difficulty: f64,
    elapsed_days: f64,
    rating: Rating,
    w: &[f64; 21],
) -> (f64, f64) {
    let next_s = if elapsed_days < 1.0 {
        same_day_stability(stability, rating, w)
    } else {
        let r = retrievability(elapsed_days, stability, w);
        match rating {
            Rating::Again => next_forget_stability(stability, difficulty, r, w),
            _ => next_recall_stability(stability, difficulty, r, rating, w),
        }
    };
    (next_s, next_difficulty(difficulty, rating, w))
}

// ============================================================================
// TESTS
// ============================================================================
