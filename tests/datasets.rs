// Catalog invariants for games and prizes.
// These tests are native-friendly and avoid wasm/browser APIs.

use std::collections::HashSet;

use kids_arcade::{GameId, PRIZES};

#[test]
fn every_game_has_goals_and_copy() {
    for g in GameId::ALL {
        let entry = g.entry();
        assert!(!entry.title.is_empty(), "game '{}' has no title", g);
        assert!(!entry.tutorial.is_empty(), "game '{}' has no tutorial text", g);
        let goals = &entry.goals;
        let count = goals.montessori.len() + goals.waldorf.len() + goals.intelligences.len();
        assert!(count > 0, "game '{}' has no goal tags", g);
        for tag in goals.intelligences.iter().chain(goals.montessori).chain(goals.waldorf) {
            assert!(!tag.trim().is_empty(), "blank goal tag in '{}'", g);
            assert_ne!(*tag, "concentration", "goal tag collides with a metric name in '{}'", g);
        }
    }
}

#[test]
fn prizes_are_unique_and_priced() {
    let mut ids = HashSet::new();
    let mut labels = HashSet::new();
    for p in PRIZES {
        assert!(ids.insert(p.id), "duplicate prize id '{}'", p.id);
        assert!(labels.insert(p.label), "duplicate prize label '{}'", p.label);
        assert!(p.cost > 0, "prize '{}' is free", p.id);
    }
}

#[test]
fn prizes_sorted_by_cost() {
    let costs: Vec<u64> = PRIZES.iter().map(|p| p.cost).collect();
    let mut sorted = costs.clone();
    sorted.sort();
    assert_eq!(costs, sorted, "shop lists prizes cheapest first");
}
