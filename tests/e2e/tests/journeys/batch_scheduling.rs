//! Batch scheduling journeys
//!
//! A deck import lands many identical cards at once; these tests verify
//! that fuzz spreads the resulting due dates instead of letting the
//! whole cohort come back on the same day, and that cards never bleed
//! scheduling state into each other.

use std::collections::HashSet;

use chrono::{Duration, TimeZone, Utc};
use lexirep_core::prelude::*;
use lexirep_e2e_tests::harness::InMemoryCardStore;
use lexirep_e2e_tests::mocks::CardFactory;

fn start() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 10, 18, 0, 0).unwrap()
}

#[test]
fn cohort_due_dates_spread_across_days() {
    let mut store = InMemoryCardStore::with_defaults();
    let last = start();
    let ids = CardFactory::seed_cohort(&mut store, 40, 30.0, last);

    // Everyone reviews at the same sitting with the same answer
    let now = last + Duration::days(30);
    for id in &ids {
        store.review(id, Rating::Good, now).unwrap();
    }

    let due_days: HashSet<i64> = ids
        .iter()
        .map(|id| (store.get(id).unwrap().due - now).num_days())
        .collect();
    assert!(
        due_days.len() > 1,
        "identical cards must not all land on the same day, got {due_days:?}"
    );

    // Fuzz stays inside the plus/minus 5% band around a shared base
    let min = *due_days.iter().min().unwrap();
    let max = *due_days.iter().max().unwrap();
    assert!(min >= 1);
    assert!(
        (max - min) as f64 <= 0.12 * (max as f64),
        "spread [{min}, {max}] wider than the fuzz band allows"
    );
}

#[test]
fn fuzz_is_stable_per_card() {
    // Replaying the identical review must land on the identical day:
    // fuzz is a function of the card, not of a hidden RNG stream
    let last = start();
    let now = last + Duration::days(30);
    let card = CardFactory::review_card(30.0, 5.0, last);

    let mut first = InMemoryCardStore::with_defaults();
    let mut second = InMemoryCardStore::with_defaults();
    first.insert("cohort-0007", card.clone());
    second.insert("cohort-0007", card);
    first.review("cohort-0007", Rating::Good, now).unwrap();
    second.review("cohort-0007", Rating::Good, now).unwrap();

    assert_eq!(
        first.get("cohort-0007").unwrap().due,
        second.get("cohort-0007").unwrap().due
    );
}

#[test]
fn cards_do_not_influence_each_other() {
    let mut store = InMemoryCardStore::with_defaults();
    let last = start();
    let now = last + Duration::days(30);

    // A lone card reviewed in an otherwise empty store...
    let mut lone = InMemoryCardStore::with_defaults();
    lone.insert("cohort-0000", CardFactory::review_card(30.0, 5.0, last));
    lone.review("cohort-0000", Rating::Good, now).unwrap();
    let lone_state = lone.get("cohort-0000").unwrap().clone();

    // ...schedules exactly like the same card amid a large cohort with
    // mixed answers
    let ids = CardFactory::seed_cohort(&mut store, 20, 30.0, last);
    for (i, id) in ids.iter().enumerate() {
        let rating = if i % 3 == 1 { Rating::Again } else { Rating::Good };
        store.review(id, rating, now).unwrap();
    }
    assert_eq!(store.get("cohort-0000").unwrap(), &lone_state);
}

#[test]
fn ledger_keeps_per_card_streams_separate() {
    let mut store = InMemoryCardStore::with_defaults();
    let last = start();
    let now = last + Duration::days(30);
    let ids = CardFactory::seed_cohort(&mut store, 5, 30.0, last);

    for id in &ids {
        store.review(id, Rating::Good, now).unwrap();
    }
    store.review(&ids[2], Rating::Again, now + Duration::days(35)).unwrap();

    let ledger = store.scheduler().ledger();
    assert_eq!(ledger.len(), 6);
    assert_eq!(ledger.card_count(), 5);
    assert_eq!(ledger.entries_for(&ids[2]).len(), 2);
    assert_eq!(ledger.entries_for(&ids[0]).len(), 1);
    assert!(ledger.entries_for("cohort-9999").is_empty());

    let counts = ledger.rating_counts();
    assert_eq!(counts.good, 5);
    assert_eq!(counts.again, 1);
    assert_eq!(counts.total(), 6);
}

#[test]
fn learning_steps_are_never_fuzzed() {
    // Sub-day step intervals stay exact even across a large batch
    let mut store = InMemoryCardStore::with_defaults();
    let now = start();
    for i in 0..25 {
        let id = format!("fresh-{i:02}");
        store.insert(&id, CardFactory::learning_card(0, now - Duration::minutes(1)));
        store.review(&id, Rating::Hard, now).unwrap();
        assert_eq!(
            store.get(&id).unwrap().due,
            now + Duration::minutes(10),
            "step intervals are fixed durations"
        );
    }
}
