//! Scheduler state machine - the four-phase transition table
//!
//! Single source of truth for phase transitions; the interval policy never
//! infers a phase, it only consumes the one decided here.
//!
//! # Transition table
//!
//! | phase      | Again      | Hard       | Good              | Easy   |
//! |------------|------------|------------|-------------------|--------|
//! | New        | Learning   | Learning   | Learning/Review * | Review |
//! | Learning   | Learning   | Learning   | Review            | Review |
//! | Review     | Relearning | Review     | Review            | Review |
//! | Relearning | Relearning | Relearning | Review            | Review |
//!
//! \* Good from New graduates straight to Review when the single-step
//! learning policy is configured; otherwise the card enters Learning.
//!
//! New is never a transition target: it exists only as the birth phase of
//! a card. Counters follow the table, not the memory model: Good/Easy in
//! Review bump `reps`, Again in Review bumps `lapses`, and neither counter
//! is ever reset.

use crate::card::{CardPhase, Rating};

/// Next phase for a `(phase, rating)` pair.
///
/// `single_step_learning` controls only the New+Good cell (see the module
/// table); every other cell is fixed.
pub fn next_phase(phase: CardPhase, rating: Rating, single_step_learning: bool) -> CardPhase {
    match (phase, rating) {
        (CardPhase::New, Rating::Again | Rating::Hard) => CardPhase::Learning,
        (CardPhase::New, Rating::Good) => {
            if single_step_learning {
                CardPhase::Review
            } else {
                CardPhase::Learning
            }
        }
        (CardPhase::New, Rating::Easy) => CardPhase::Review,

        (CardPhase::Learning, Rating::Again | Rating::Hard) => CardPhase::Learning,
        (CardPhase::Learning, Rating::Good | Rating::Easy) => CardPhase::Review,

        (CardPhase::Review, Rating::Again) => CardPhase::Relearning,
        (CardPhase::Review, _) => CardPhase::Review,

        (CardPhase::Relearning, Rating::Again | Rating::Hard) => CardPhase::Relearning,
        (CardPhase::Relearning, Rating::Good | Rating::Easy) => CardPhase::Review,
    }
}

/// Next learning-step index after a transition.
///
/// Steps only progress while a card stays inside Learning/Relearning:
/// Again restarts at the first step, Hard advances one step (capped at the
/// last configured step), and graduation resets the index. `step_count` is
/// the length of whichever step table applies to `phase_after`.
pub fn next_learning_step(
    phase_before: CardPhase,
    phase_after: CardPhase,
    rating: Rating,
    current_step: usize,
    step_count: usize,
) -> usize {
    if !phase_after.in_steps() {
        return 0;
    }
    let last = step_count.saturating_sub(1);
    match rating {
        Rating::Again => 0,
        // Entering steps from outside starts at the first step
        Rating::Hard if phase_before != phase_after => 0,
        Rating::Hard => (current_step + 1).min(last),
        // Good/Easy inside steps graduate, handled above; New+Good lands
        // on the first step
        _ => 0,
    }
}

/// Whether this transition completes a successful Review-phase recall
/// (bumps `reps`)
pub fn bumps_reps(phase_before: CardPhase, rating: Rating) -> bool {
    phase_before == CardPhase::Review && matches!(rating, Rating::Good | Rating::Easy)
}

/// Whether this transition is a lapse (bumps `lapses`)
pub fn bumps_lapses(phase_before: CardPhase, rating: Rating) -> bool {
    phase_before == CardPhase::Review && rating == Rating::Again
}

// ============================================================================
// TESTS
// ============================================================================
