//! # Lexirep Core
//!
//! Standalone spaced-repetition scheduler for flashcard systems:
//!
//! - **FSRS-6 memory model**: 21-parameter forgetting curve tracking
//!   per-card stability and difficulty
//! - **Four-phase state machine**: New / Learning / Review / Relearning
//!   driven by an explicit, exhaustively-checked transition table
//! - **Interval policy**: retention-targeted intervals with bounds and
//!   deterministic anti-clustering fuzz
//! - **Review ledger**: append-only audit trail of every review event
//!
//! The crate is deliberately free of I/O: card state comes in from an
//! external card store, one review is applied, and the new immutable
//! state goes back out for the store to persist. Time is always passed
//! in, never read from the environment (see [`clock`]).
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::Utc;
//! use lexirep_core::{CardSchedulingState, Rating, Scheduler};
//!
//! let mut scheduler = Scheduler::with_defaults();
//!
//! // A card enters the system
//! let now = Utc::now();
//! let card = CardSchedulingState::new_card(now);
//!
//! // The learner reviews it
//! let (card, log_entry) = scheduler.review("card-42", &card, Rating::Good, now)?;
//! assert!(card.due > now);
//! assert_eq!(log_entry.rating, Rating::Good);
//! # Ok::<(), lexirep_core::SchedulerError>(())
//! ```
//!
//! ## Concurrency contract
//!
//! Reviews for the *same* card must be serialized by the caller (a
//! per-card lock or single-writer queue at the card-store boundary);
//! `review` is a pure function of its inputs plus one ledger append, so
//! concurrent calls on a stale snapshot would silently lose an update.
//! Across different cards there is no shared mutable state and work
//! parallelizes freely over independent `Scheduler` instances.

#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod card;
pub mod clock;
pub mod ledger;
pub mod srs;

// ============================================================================
// ERRORS
// ============================================================================

use chrono::{DateTime, Utc};

/// Scheduler error type.
///
/// Every variant is deterministic for the same inputs, and no variant is
/// ever produced mid-review after state has been touched:
/// `InvalidConfiguration` can only come from [`Scheduler::new`], and the
/// review-time errors are rejected before any mutation.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchedulerError {
    /// A grade value outside 1..=4 reached the rating boundary
    #[error("Invalid rating grade: {0} (expected 1-4)")]
    InvalidRating(u8),
    /// Reviews for a card must be chronological
    #[error("Out-of-order review: now={now}, last_review={last_review:?}")]
    InvalidReviewOrder {
        /// The card's recorded last review, if any
        last_review: Option<DateTime<Utc>>,
        /// The rejected review instant
        now: DateTime<Utc>,
    },
    /// Rejected at scheduler construction, never at review time
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Scheduler result type
pub type Result<T> = std::result::Result<T, SchedulerError>;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Card domain types
pub use card::{CardPhase, CardSchedulingState, Rating, ALL_RATINGS};

// Scheduling subsystem
pub use srs::{
    initial_difficulty,
    initial_stability,
    next_interval_days,
    // Core model functions for advanced usage
    retrievability,
    update_memory,
    ReviewPreview,
    Scheduler,
    SchedulerConfig,
    DEFAULT_WEIGHTS,
};

// Review ledger
pub use ledger::{RatingCounts, ReviewLedger, ReviewLogEntry};

// Clock boundary
pub use clock::{local_day_start, Clock, FixedClock, SystemClock};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// FSRS algorithm generation implemented by the memory model (6 = 21
/// parameters)
pub const FSRS_VERSION: u8 = 6;

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        CardPhase, CardSchedulingState, Clock, FixedClock, Rating, Result, ReviewLedger,
        ReviewLogEntry, ReviewPreview, Scheduler, SchedulerConfig, SchedulerError, SystemClock,
    };
}
