//! Card domain types - The per-card scheduling record
//!
//! Defines the immutable scheduling snapshot the external card store
//! persists for every learner x card pair:
//! - Review rating (learner's self-reported recall outcome)
//! - Card phase (New / Learning / Review / Relearning)
//! - FSRS memory state (stability, difficulty) and scheduling bookkeeping
//!
//! A [`CardSchedulingState`] is only ever transitioned through
//! [`Scheduler::review`](crate::Scheduler::review); everything here is a
//! plain value type with no scheduling logic of its own.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::local_day_start;
use crate::{Result, SchedulerError};

// ============================================================================
// RATING
// ============================================================================

/// Learner's self-reported recall outcome for a single review.
///
/// The numeric values (1-4) match the grade integers submitted by review
/// clients; use [`Rating::try_from`] at that boundary so an out-of-range
/// grade is rejected before any state is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    /// Recall failed - the card lapses
    Again = 1,
    /// Recalled with serious effort
    Hard = 2,
    /// Recalled correctly
    Good = 3,
    /// Recalled effortlessly
    Easy = 4,
}

/// All ratings in ascending order (Again < Hard < Good < Easy)
pub const ALL_RATINGS: [Rating; 4] = [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy];

impl Rating {
    /// Numeric grade value (1 = Again .. 4 = Easy)
    pub fn value(&self) -> u8 {
        *self as u8
    }

    /// Whether the recall attempt succeeded (everything but Again)
    pub fn is_success(&self) -> bool {
        !matches!(self, Rating::Again)
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Again => "again",
            Rating::Hard => "hard",
            Rating::Good => "good",
            Rating::Easy => "easy",
        }
    }
}

impl TryFrom<u8> for Rating {
    type Error = SchedulerError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Rating::Again),
            2 => Ok(Rating::Hard),
            3 => Ok(Rating::Good),
            4 => Ok(Rating::Easy),
            other => Err(SchedulerError::InvalidRating(other)),
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Rating {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "again" => Ok(Rating::Again),
            "hard" => Ok(Rating::Hard),
            "good" => Ok(Rating::Good),
            "easy" => Ok(Rating::Easy),
            _ => Err(format!("Unknown rating: {}", s)),
        }
    }
}

// ============================================================================
// CARD PHASE
// ============================================================================

/// Scheduling phase of a card.
///
/// New is the birth phase only: no transition ever targets it. All phase
/// changes are decided by the transition table in
/// [`srs::states`](crate::srs::states).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CardPhase {
    /// Never reviewed; `last_review` is unset
    #[default]
    New,
    /// In short learning steps after entering the system
    Learning,
    /// Graduated; intervals come from the memory model
    Review,
    /// Lapsed from Review, back in short steps
    Relearning,
}

impl CardPhase {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            CardPhase::New => "new",
            CardPhase::Learning => "learning",
            CardPhase::Review => "review",
            CardPhase::Relearning => "relearning",
        }
    }

    /// Whether this phase schedules fixed step intervals rather than
    /// stability-derived ones
    pub fn in_steps(&self) -> bool {
        matches!(self, CardPhase::Learning | CardPhase::Relearning)
    }
}

impl std::fmt::Display for CardPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CardPhase {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "new" => Ok(CardPhase::New),
            "learning" => Ok(CardPhase::Learning),
            "review" => Ok(CardPhase::Review),
            "relearning" => Ok(CardPhase::Relearning),
            _ => Err(format!("Unknown card phase: {}", s)),
        }
    }
}

// ============================================================================
// CARD SCHEDULING STATE
// ============================================================================

/// Per-card scheduling snapshot.
///
/// Immutable from the scheduler's point of view: [`Scheduler::review`]
/// borrows the current snapshot and returns a fresh one; the external card
/// store owns write-back. Invariants maintained across every transition:
///
/// - `stability > 0`
/// - `difficulty` in `[1.0, 10.0]`
/// - `due >= last_review` whenever `last_review` is set
/// - `phase == New` iff `last_review` is `None`
/// - `reps` and `lapses` never decrease
///
/// [`Scheduler::review`]: crate::Scheduler::review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSchedulingState {
    /// Current scheduling phase
    pub phase: CardPhase,
    /// Memory stability in days (time for retrievability to decay to 0.9)
    pub stability: f64,
    /// Inherent difficulty (1.0 = easy, 10.0 = hard)
    pub difficulty: f64,
    /// Next scheduled review instant
    pub due: DateTime<Utc>,
    /// When the card was last reviewed; `None` only in the New phase
    pub last_review: Option<DateTime<Utc>>,
    /// Index into the learning/relearning step table; 0 outside steps
    pub learning_step: usize,
    /// Lifetime count of Good/Easy reviews completed in the Review phase
    pub reps: u32,
    /// Lifetime count of Again ratings in the Review phase
    pub lapses: u32,
}

impl CardSchedulingState {
    /// Create the state for a card entering the system.
    ///
    /// Stability and difficulty hold placeholder values until the first
    /// review replaces them with the rating-specific initial constants.
    /// The card is due immediately.
    pub fn new_card(now: DateTime<Utc>) -> Self {
        Self {
            phase: CardPhase::New,
            stability: 2.5,
            difficulty: 5.0,
            due: now,
            last_review: None,
            learning_step: 0,
            reps: 0,
            lapses: 0,
        }
    }

    /// Days elapsed since the last review (0.0 for a New card)
    pub fn elapsed_days(&self, now: DateTime<Utc>) -> f64 {
        match self.last_review {
            Some(last) => ((now - last).num_seconds() as f64 / 86_400.0).max(0.0),
            None => 0.0,
        }
    }

    /// Check if the card is due at the given instant
    pub fn is_due_at(&self, now: DateTime<Utc>) -> bool {
        self.due <= now
    }

    /// Check if the card counts as "due today" in the learner's timezone.
    ///
    /// Anything scheduled before the next learner-local midnight is due,
    /// which keeps the day's queue stable as the clock advances within
    /// the day.
    pub fn is_due_on_day(&self, now: DateTime<Utc>, offset: FixedOffset) -> bool {
        let next_midnight = local_day_start(now, offset) + chrono::Duration::days(1);
        self.due < next_midnight
    }
}

// ============================================================================
// TESTS
// ============================================================================
