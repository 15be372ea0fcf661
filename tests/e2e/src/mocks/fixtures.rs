//! Test Data Factory
//!
//! Generates card states and review scenarios for end-to-end tests:
//! - Cards at arbitrary points of their lifecycle
//! - Cohorts of cards created together (the fuzz-clustering scenario)

use chrono::{DateTime, Duration, Utc};
use lexirep_core::{CardPhase, CardSchedulingState};

use crate::harness::InMemoryCardStore;

/// Factory for creating test card states
pub struct CardFactory;

impl CardFactory {
    /// A card in the Review phase with the given memory state, last
    /// reviewed at `last` and due after roughly its stability
    pub fn review_card(
        stability: f64,
        difficulty: f64,
        last: DateTime<Utc>,
    ) -> CardSchedulingState {
        CardSchedulingState {
            phase: CardPhase::Review,
            stability,
            difficulty,
            due: last + Duration::days(stability.round().max(1.0) as i64),
            last_review: Some(last),
            learning_step: 0,
            reps: 5,
            lapses: 0,
        }
    }

    /// A card sitting in Learning at the given step
    pub fn learning_card(step: usize, last: DateTime<Utc>) -> CardSchedulingState {
        CardSchedulingState {
            phase: CardPhase::Learning,
            stability: 0.5,
            difficulty: 6.0,
            due: last + Duration::minutes(10),
            last_review: Some(last),
            learning_step: step,
            reps: 0,
            lapses: 0,
        }
    }

    /// Seed `count` identical mature cards into a store, as when a deck
    /// of generated flashcards lands in one import
    pub fn seed_cohort(
        store: &mut InMemoryCardStore,
        count: usize,
        stability: f64,
        last: DateTime<Utc>,
    ) -> Vec<String> {
        (0..count)
            .map(|i| {
                let id = format!("cohort-{i:04}");
                store.insert(&id, Self::review_card(stability, 5.0, last));
                id
            })
            .collect()
    }
}
