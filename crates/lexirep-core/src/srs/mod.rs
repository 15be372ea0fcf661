//! Spaced-repetition scheduling subsystem
//!
//! Layered as: memory model ([`algorithm`]) below the phase transition
//! table ([`states`]) below the interval policy ([`intervals`]) below the
//! facade ([`scheduler`]). Only the facade mutates anything (the ledger);
//! everything underneath is pure functions.

pub mod algorithm;
pub mod intervals;
pub mod scheduler;
pub mod states;

pub use algorithm::{
    initial_difficulty,
    initial_stability,
    next_difficulty,
    next_forget_stability,
    next_interval_days,
    next_recall_stability,
    // Core functions
    retrievability,
    same_day_stability,
    update_memory,
    // Constants
    DEFAULT_WEIGHTS,
    MAX_DIFFICULTY,
    MAX_STABILITY,
    MIN_DIFFICULTY,
    MIN_STABILITY,
    REFERENCE_RETENTION,
    WEIGHT_COUNT,
};

pub use intervals::{fuzz_interval_days, fuzz_seed, review_interval_days, step_interval};
pub use scheduler::{ReviewPreview, Scheduler, SchedulerConfig};
pub use states::{bumps_lapses, bumps_reps, next_learning_step, next_phase};
