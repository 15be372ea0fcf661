//! Review ledger - append-only audit trail of review events
//!
//! One immutable [`ReviewLogEntry`] per `review()` call, recorded after
//! the new state is computed and before it is returned. Entries are never
//! edited or removed here; archival is external tooling's business.
//!
//! Reads expose a card's entries in `reviewed_at` ascending order (the
//! facade enforces chronological reviews per card, so insertion order is
//! already sorted) plus aggregate counts for analytics. No scheduling
//! decision ever consults these aggregates; the hot path only reads the
//! card's own current state, keeping scheduling O(1) in history length.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::card::{CardPhase, Rating};

// ============================================================================
// LOG ENTRY
// ============================================================================

/// Immutable record of a single review event.
///
/// Captures the memory state on both sides of the transition plus the
/// interval that *was* scheduled before this review, which retention
/// analytics compare against the actual elapsed time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewLogEntry {
    /// Unique entry identifier (UUID v4)
    pub id: String,
    /// Card this review belongs to
    pub card_id: String,
    /// When the review happened
    pub reviewed_at: DateTime<Utc>,
    /// The learner's rating
    pub rating: Rating,
    /// Phase before the transition
    pub phase_before: CardPhase,
    /// Phase after the transition
    pub phase_after: CardPhase,
    /// Stability going into the review (days)
    pub stability_before: f64,
    /// Stability after the memory-model update (days)
    pub stability_after: f64,
    /// Difficulty going into the review
    pub difficulty_before: f64,
    /// Difficulty after the update
    pub difficulty_after: f64,
    /// Days since the previous review (0 for a first review)
    pub elapsed_days: f64,
    /// Interval that had been scheduled prior to this review (days)
    pub scheduled_interval_days: f64,
}

impl ReviewLogEntry {
    /// Assign a fresh UUID to an entry under construction
    pub(crate) fn fresh_id() -> String {
        Uuid::new_v4().to_string()
    }
}

// ============================================================================
// AGGREGATES
// ============================================================================

/// Per-rating event counts across the ledger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingCounts {
    pub again: u64,
    pub hard: u64,
    pub good: u64,
    pub easy: u64,
}

impl RatingCounts {
    /// Total events counted
    pub fn total(&self) -> u64 {
        self.again + self.hard + self.good + self.easy
    }

    /// Fraction of successful recalls (Hard/Good/Easy), if any events exist
    pub fn success_rate(&self) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| (total - self.again) as f64 / total as f64)
    }
}

// ============================================================================
// LEDGER
// ============================================================================

/// Append-only log of review events, indexed per card.
///
/// Deliberately not serializable as a whole: the entries are the durable
/// records (each one serializes for the ledger sink), the per-card index
/// is derived state.
#[derive(Debug, Default, Clone)]
pub struct ReviewLedger {
    entries: Vec<ReviewLogEntry>,
    by_card: HashMap<String, Vec<usize>>,
}

impl ReviewLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry. Crate-private: the scheduler facade is the only
    /// writer, exactly once per successful review.
    pub(crate) fn record(&mut self, entry: ReviewLogEntry) {
        self.by_card
            .entry(entry.card_id.clone())
            .or_default()
            .push(self.entries.len());
        self.entries.push(entry);
    }

    /// All entries for a card, ordered by `reviewed_at` ascending
    pub fn entries_for(&self, card_id: &str) -> Vec<&ReviewLogEntry> {
        self.by_card
            .get(card_id)
            .map(|indices| indices.iter().map(|&i| &self.entries[i]).collect())
            .unwrap_or_default()
    }

    /// All entries in append order
    pub fn entries(&self) -> &[ReviewLogEntry] {
        &self.entries
    }

    /// Total number of recorded reviews
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether any review has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct cards with at least one review
    pub fn card_count(&self) -> usize {
        self.by_card.len()
    }

    /// Aggregate rating counts across all cards
    pub fn rating_counts(&self) -> RatingCounts {
        let mut counts = RatingCounts::default();
        for entry in &self.entries {
            match entry.rating {
                Rating::Again => counts.again += 1,
                Rating::Hard => counts.hard += 1,
                Rating::Good => counts.good += 1,
                Rating::Easy => counts.easy += 1,
            }
        }
        counts
    }
}

// ============================================================================
// TESTS
// ============================================================================
