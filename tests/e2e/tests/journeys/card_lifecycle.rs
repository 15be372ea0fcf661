//! Full card lifecycle journey
//!
//! Drives one card through the complete scheduling arc against the
//! in-memory card store: New -> Learning -> Review -> lapse ->
//! Relearning -> Review, with a stepped test clock standing in for
//! real days passing.

use chrono::{Duration, FixedOffset, TimeZone, Utc};
use lexirep_core::prelude::*;
use lexirep_e2e_tests::harness::InMemoryCardStore;

fn start() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 1, 7, 30, 0).unwrap()
}

#[test]
fn card_walks_the_full_lifecycle() {
    let mut store = InMemoryCardStore::with_defaults();
    let mut clock = FixedClock::at(start());
    let id = "lemma:haus";

    // First exposure: Good sends the card into the learning steps
    store.review(id, Rating::Good, clock.now()).unwrap();
    let card = store.get(id).unwrap().clone();
    assert_eq!(card.phase, CardPhase::Learning);
    assert_eq!(card.due, clock.now() + Duration::minutes(1));
    assert_eq!((card.reps, card.lapses), (0, 0));

    // One minute later: Good graduates to Review
    clock.advance(Duration::minutes(1));
    store.review(id, Rating::Good, clock.now()).unwrap();
    let card = store.get(id).unwrap().clone();
    assert_eq!(card.phase, CardPhase::Review);
    assert!(card.due >= clock.now() + Duration::days(1));
    assert_eq!(card.learning_step, 0);

    // A stretch of successful weekly-ish reviews grows stability
    let mut stability = card.stability;
    for _ in 0..4 {
        clock.set(store.get(id).unwrap().due);
        store.review(id, Rating::Good, clock.now()).unwrap();
        let card = store.get(id).unwrap();
        assert_eq!(card.phase, CardPhase::Review);
        assert!(card.stability > stability, "stability should keep growing");
        stability = card.stability;
    }
    let before_lapse = store.get(id).unwrap().clone();
    assert_eq!(before_lapse.reps, 4);

    // The learner forgets: Again lapses the card into Relearning
    clock.set(before_lapse.due);
    store.review(id, Rating::Again, clock.now()).unwrap();
    let card = store.get(id).unwrap().clone();
    assert_eq!(card.phase, CardPhase::Relearning);
    assert_eq!(card.lapses, 1);
    assert_eq!(card.reps, 4, "a lapse never resets reps");
    assert!(card.stability < before_lapse.stability);
    assert_eq!(card.due, clock.now() + Duration::minutes(10));

    // Ten minutes later the card is recalled and returns to Review
    clock.advance(Duration::minutes(10));
    store.review(id, Rating::Good, clock.now()).unwrap();
    let card = store.get(id).unwrap();
    assert_eq!(card.phase, CardPhase::Review);
    assert!(card.due >= clock.now() + Duration::days(1));

    // The ledger saw every event, in chronological order
    let entries = store.scheduler().ledger().entries_for(id);
    assert_eq!(entries.len(), 8);
    assert!(entries
        .windows(2)
        .all(|w| w[0].reviewed_at <= w[1].reviewed_at));
    assert_eq!(entries[0].phase_before, CardPhase::New);
    assert_eq!(entries[6].rating, Rating::Again);
    // Audit invariant: each entry's after-state feeds the next entry
    assert!(entries
        .windows(2)
        .all(|w| w[0].stability_after == w[1].stability_before));
}

#[test]
fn hard_cycles_through_learning_steps() {
    let mut store = InMemoryCardStore::with_defaults();
    let mut clock = FixedClock::at(start());
    let id = "lemma:strasse";

    // Again on first sight: Learning at the first step (1 minute)
    store.review(id, Rating::Again, clock.now()).unwrap();
    assert_eq!(
        store.get(id).unwrap().due,
        clock.now() + Duration::minutes(1)
    );

    // Hard advances to the second step (10 minutes) and stays there
    clock.advance(Duration::minutes(1));
    store.review(id, Rating::Hard, clock.now()).unwrap();
    let card = store.get(id).unwrap().clone();
    assert_eq!(card.phase, CardPhase::Learning);
    assert_eq!(card.learning_step, 1);
    assert_eq!(card.due, clock.now() + Duration::minutes(10));

    clock.advance(Duration::minutes(10));
    store.review(id, Rating::Hard, clock.now()).unwrap();
    assert_eq!(store.get(id).unwrap().learning_step, 1);

    // Again resets to the first step
    clock.advance(Duration::minutes(10));
    store.review(id, Rating::Again, clock.now()).unwrap();
    let card = store.get(id).unwrap();
    assert_eq!(card.learning_step, 0);
    assert_eq!(card.due, clock.now() + Duration::minutes(1));
}

#[test]
fn out_of_order_review_leaves_store_unchanged() {
    let mut store = InMemoryCardStore::with_defaults();
    let clock = FixedClock::at(start());
    let id = "lemma:zeit";

    store.review(id, Rating::Good, clock.now()).unwrap();
    let snapshot = store.get(id).unwrap().clone();

    let err = store
        .review(id, Rating::Good, clock.now() - Duration::hours(1))
        .unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidReviewOrder { .. }));
    assert_eq!(store.get(id).unwrap(), &snapshot);
    assert_eq!(store.scheduler().ledger().len(), 1);
}

#[test]
fn due_queue_follows_learner_local_day() {
    let mut store = InMemoryCardStore::with_defaults();
    let clock = FixedClock::at_with_offset(start(), FixedOffset::east_opt(2 * 3600).unwrap());

    // One card freshly created (due immediately), one due tomorrow night
    store.get_or_create("due-now", clock.now());
    let mut later = CardSchedulingState::new_card(clock.now());
    later.due = clock.now() + Duration::days(2);
    store.insert("due-later", later);

    let queue = store.due_card_ids(clock.now(), clock.local_offset());
    assert_eq!(queue, vec!["due-now".to_string()]);
}

#[test]
fn persisted_state_roundtrips_through_json() {
    // The store's persistence format is the serde representation; a
    // state that travels through JSON must schedule identically
    let mut store = InMemoryCardStore::with_defaults();
    let clock = FixedClock::at(start());
    let id = "lemma:blume";
    store.review(id, Rating::Good, clock.now()).unwrap();

    let state = store.get(id).unwrap().clone();
    let json = serde_json::to_string(&state).unwrap();
    let restored: CardSchedulingState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, state);

    let now = clock.now() + Duration::minutes(5);
    let mut a = Scheduler::with_defaults();
    let mut b = Scheduler::with_defaults();
    let (next_a, _) = a.review(id, &state, Rating::Good, now).unwrap();
    let (next_b, _) = b.review(id, &restored, Rating::Good, now).unwrap();
    assert_eq!(next_a, next_b);
}
