//! Scheduler facade - configuration plus the single review entry point
//!
//! [`Scheduler::review`] is the only supported way to transition a
//! [`CardSchedulingState`]: it validates the request, consults the
//! transition table, runs the memory model, applies the interval policy,
//! appends the ledger entry, and returns the new immutable state for the
//! external card store to persist. Nothing here performs I/O or reads the
//! wall clock.
//!
//! Configuration is an explicit object validated once at construction
//! (never at review time), so multiple parameter sets - e.g. per-learner
//! fitted weight vectors - can coexist as independent `Scheduler`
//! instances in one process.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::algorithm::{
    self, DEFAULT_WEIGHTS, MAX_STABILITY, MIN_STABILITY, WEIGHT_COUNT,
};
use super::intervals::{fuzz_interval_days, fuzz_seed, review_interval_days, step_interval};
use super::states::{bumps_lapses, bumps_reps, next_learning_step, next_phase};
use crate::card::{CardPhase, CardSchedulingState, Rating, ALL_RATINGS};
use crate::ledger::{ReviewLedger, ReviewLogEntry};
use crate::{Result, SchedulerError};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Scheduler configuration: retention target, interval bounds, step
/// tables, fuzz settings, and the FSRS weight vector.
///
/// Construct with [`Default`] and override fields, then hand to
/// [`Scheduler::new`], which rejects invalid combinations up front so a
/// constructed scheduler is always safe to call repeatedly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerConfig {
    /// Target recall probability at the scheduled review instant
    pub desired_retention: f64,
    /// Lower bound for Review-phase intervals (days)
    pub min_interval_days: i64,
    /// Upper bound for Review-phase intervals (days)
    pub max_interval_days: i64,
    /// Step durations for the Learning phase, in minutes
    pub learning_steps_minutes: Vec<i64>,
    /// Step durations for the Relearning phase, in minutes
    pub relearning_steps_minutes: Vec<i64>,
    /// Good on a New card graduates straight to Review, skipping Learning
    pub single_step_learning: bool,
    /// Minimum interval (days) when Easy graduates a card out of steps
    pub easy_graduation_days: f64,
    /// Fuzz band as a fraction of the interval (0.05 = plus/minus 5%)
    pub fuzz_factor: f64,
    /// Intervals shorter than this many days are never fuzzed
    pub fuzz_threshold_days: f64,
    /// FSRS-6 weight vector; replace with per-learner fitted weights
    pub weights: [f64; WEIGHT_COUNT],
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            desired_retention: 0.9,
            min_interval_days: 1,
            max_interval_days: 36_500,
            learning_steps_minutes: vec![1, 10],
            relearning_steps_minutes: vec![10],
            single_step_learning: false,
            easy_graduation_days: 4.0,
            fuzz_factor: 0.05,
            fuzz_threshold_days: 2.5,
            weights: DEFAULT_WEIGHTS,
        }
    }
}

impl SchedulerConfig {
    /// Check every configured value; returns the first violation found.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(SchedulerError::InvalidConfiguration(msg));

        if !(self.desired_retention > 0.0 && self.desired_retention < 1.0) {
            return fail(format!(
                "desired_retention must be in (0, 1), got {}",
                self.desired_retention
            ));
        }
        if self.min_interval_days < 1 {
            return fail(format!(
                "min_interval_days must be >= 1, got {}",
                self.min_interval_days
            ));
        }
        if self.min_interval_days > self.max_interval_days {
            return fail(format!(
                "min_interval_days {} exceeds max_interval_days {}",
                self.min_interval_days, self.max_interval_days
            ));
        }
        for (name, steps) in [
            ("learning_steps_minutes", &self.learning_steps_minutes),
            ("relearning_steps_minutes", &self.relearning_steps_minutes),
        ] {
            if steps.is_empty() {
                return fail(format!("{name} must not be empty"));
            }
            if steps.iter().any(|&m| m <= 0) {
                return fail(format!("{name} must contain positive durations"));
            }
        }
        if !(0.0..1.0).contains(&self.fuzz_factor) {
            return fail(format!(
                "fuzz_factor must be in [0, 1), got {}",
                self.fuzz_factor
            ));
        }
        if self.fuzz_threshold_days < 0.0 {
            return fail(format!(
                "fuzz_threshold_days must be >= 0, got {}",
                self.fuzz_threshold_days
            ));
        }
        if self.easy_graduation_days < 0.0 {
            return fail(format!(
                "easy_graduation_days must be >= 0, got {}",
                self.easy_graduation_days
            ));
        }
        if self.weights.iter().any(|w| !w.is_finite()) {
            return fail("weights must all be finite".to_string());
        }
        if self.weights[..4].iter().any(|&w| w <= 0.0) {
            return fail("initial stability weights w0..w3 must be positive".to_string());
        }
        if self.weights[20] <= 0.0 {
            return fail(format!(
                "decay weight w20 must be positive, got {}",
                self.weights[20]
            ));
        }
        Ok(())
    }
}

// ============================================================================
// PREVIEW
// ============================================================================

/// What one rating would do to a card, computed without recording
/// anything. Review clients show these on the four answer buttons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPreview {
    /// The rating this preview corresponds to
    pub rating: Rating,
    /// Phase the card would move to
    pub phase_after: CardPhase,
    /// Stability after the update (days)
    pub stability: f64,
    /// Difficulty after the update
    pub difficulty: f64,
    /// When the card would next be due
    pub due: DateTime<Utc>,
}

// ============================================================================
// SCHEDULER
// ============================================================================

/// The scheduling facade.
///
/// Owns the configuration and the review ledger. `review` takes `&mut
/// self` only for the ledger append; the caller serializes reviews per
/// card at the card-store boundary, and distinct scheduler instances are
/// fully independent, so cross-card work parallelizes by sharding cards
/// over instances.
#[derive(Debug, Clone)]
pub struct Scheduler {
    config: SchedulerConfig,
    ledger: ReviewLedger,
}

impl Scheduler {
    /// Build a scheduler, rejecting invalid configuration immediately.
    pub fn new(config: SchedulerConfig) -> Result<Self> {
        config.validate()?;
        tracing::debug!(
            desired_retention = config.desired_retention,
            single_step_learning = config.single_step_learning,
            "scheduler configured"
        );
        Ok(Self {
            config,
            ledger: ReviewLedger::new(),
        })
    }

    /// Scheduler with the default FSRS-6 configuration
    pub fn with_defaults() -> Self {
        Self::new(SchedulerConfig::default()).expect("default configuration is valid")
    }

    /// The active configuration
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Read-only access to the review audit trail
    pub fn ledger(&self) -> &ReviewLedger {
        &self.ledger
    }

    /// Apply one review to a card.
    ///
    /// Returns the new immutable scheduling state plus the ledger entry
    /// that was appended for it. `current` is only borrowed: on error
    /// ([`SchedulerError::InvalidReviewOrder`]) nothing has been mutated
    /// and the caller's state is untouched. Persistence of the returned
    /// state is the card store's responsibility.
    pub fn review(
        &mut self,
        card_id: &str,
        current: &CardSchedulingState,
        rating: Rating,
        now: DateTime<Utc>,
    ) -> Result<(CardSchedulingState, ReviewLogEntry)> {
        let (next, elapsed_days) = self.compute(card_id, current, rating, now)?;

        let entry = ReviewLogEntry {
            id: ReviewLogEntry::fresh_id(),
            card_id: card_id.to_string(),
            reviewed_at: now,
            rating,
            phase_before: current.phase,
            phase_after: next.phase,
            stability_before: current.stability,
            stability_after: next.stability,
            difficulty_before: current.difficulty,
            difficulty_after: next.difficulty,
            elapsed_days,
            scheduled_interval_days: previously_scheduled_days(current),
        };
        self.ledger.record(entry.clone());

        tracing::debug!(
            card_id,
            rating = %rating,
            phase_before = %current.phase,
            phase_after = %next.phase,
            stability = next.stability,
            due = %next.due,
            "card reviewed"
        );

        Ok((next, entry))
    }

    /// Compute what each of the four ratings would do, without touching
    /// the ledger. Same validation as [`Scheduler::review`].
    pub fn preview(
        &self,
        card_id: &str,
        current: &CardSchedulingState,
        now: DateTime<Utc>,
    ) -> Result<[ReviewPreview; 4]> {
        // Validation is rating-independent; surface ordering errors once
        self.compute(card_id, current, Rating::Again, now)?;
        Ok(ALL_RATINGS.map(|rating| {
            let (next, _) = self
                .compute(card_id, current, rating, now)
                .expect("validation already passed");
            ReviewPreview {
                rating,
                phase_after: next.phase,
                stability: next.stability,
                difficulty: next.difficulty,
                due: next.due,
            }
        }))
    }

    /// Core transition: validate, pick the phase, update memory, schedule
    /// the due instant, bump counters. Pure with respect to `self`.
    fn compute(
        &self,
        card_id: &str,
        current: &CardSchedulingState,
        rating: Rating,
        now: DateTime<Utc>,
    ) -> Result<(CardSchedulingState, f64)> {
        let cfg = &self.config;
        let w = &cfg.weights;

        // Reviews must be chronological per card
        if current.phase != CardPhase::New {
            match current.last_review {
                Some(last) if now >= last => {}
                last_review => {
                    return Err(SchedulerError::InvalidReviewOrder { last_review, now });
                }
            }
        }

        let elapsed_days = current.elapsed_days(now);
        let phase_after = next_phase(current.phase, rating, cfg.single_step_learning);

        let (stability, difficulty) = if current.phase == CardPhase::New {
            (
                algorithm::initial_stability(rating, w),
                algorithm::initial_difficulty(rating, w),
            )
        } else {
            algorithm::update_memory(current.stability, current.difficulty, elapsed_days, rating, w)
        };
        debug_assert!(stability >= MIN_STABILITY && stability <= MAX_STABILITY);

        let reps = current.reps + u32::from(bumps_reps(current.phase, rating));
        let lapses = current.lapses + u32::from(bumps_lapses(current.phase, rating));

        let steps = match phase_after {
            CardPhase::Relearning => &cfg.relearning_steps_minutes,
            _ => &cfg.learning_steps_minutes,
        };
        let learning_step = next_learning_step(
            current.phase,
            phase_after,
            rating,
            current.learning_step,
            steps.len(),
        );

        let due = if phase_after.in_steps() {
            now + step_interval(steps, learning_step)
        } else {
            let mut days = review_interval_days(
                stability,
                cfg.desired_retention,
                cfg.min_interval_days,
                cfg.max_interval_days,
                w,
            );
            // Easy graduation out of steps gets a floor so a fresh card
            // is not recalled the very next day
            if rating == Rating::Easy && current.phase != CardPhase::Review {
                days = days
                    .max(cfg.easy_graduation_days.round() as i64)
                    .min(cfg.max_interval_days);
            }
            let seed = fuzz_seed(card_id, reps, lapses);
            let fuzzed = fuzz_interval_days(
                days,
                cfg.fuzz_factor,
                cfg.fuzz_threshold_days,
                cfg.min_interval_days,
                cfg.max_interval_days,
                seed,
            );
            now + Duration::days(fuzzed)
        };

        let next = CardSchedulingState {
            phase: phase_after,
            stability,
            difficulty,
            due,
            last_review: Some(now),
            learning_step,
            reps,
            lapses,
        };
        Ok((next, elapsed_days))
    }
}

/// Interval that was on the books before this review, in days (0 for a
/// first review)
fn previously_scheduled_days(current: &CardSchedulingState) -> f64 {
    match current.last_review {
        Some(last) => ((current.due - last).num_seconds() as f64 / 86_400.0).max(0.0),
        None => 0.0,
    }
}

// ============================================================================
// TESTS
// ============================================================================
