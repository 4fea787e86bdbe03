//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::SeedableRng;
use sports_bracket::{
    finish_match, AppConfig, BracketStore, DetailUpdate, Entrant, MatchDetail,
    MatchState, Matchup, MemoryStore, PhaseDirectory, PhaseId, ScoringPolicy, Sport,
};

pub const EVENT: u64 = 2;

pub fn config() -> AppConfig {
    AppConfig::default()
}

pub fn store() -> MemoryStore {
    MemoryStore::new(config().phases())
}

pub fn scoring() -> ScoringPolicy {
    ScoringPolicy::from_config(&config().engine)
}

pub fn futsal() -> Sport {
    config().sport(1).unwrap()
}

pub fn chess() -> Sport {
    config().sport(4).unwrap()
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Register `n` entrants with ids 1..=n for `sport` and return them.
pub fn entrants(store: &MemoryStore, sport: &Sport, n: u64) -> Vec<Entrant> {
    (1..=n)
        .map(|i| {
            let e = Entrant::new(i, sport.kind, format!("Entrant {i}"), sport.id).with_cycle("III");
            store.register_entrant(e.clone()).unwrap();
            e
        })
        .collect()
}

pub fn phase_at(store: &MemoryStore, order: u32) -> PhaseId {
    store.find_phase(EVENT, order).unwrap().unwrap().id
}

/// Matchups of `sport` in `phase_id`, ascending by match number.
pub fn rows_in_phase(store: &MemoryStore, sport: &Sport, phase_id: PhaseId) -> Vec<(Matchup, MatchDetail)> {
    let mut rows: Vec<_> = store
        .matchups_for_event(sport.kind, sport.id, EVENT)
        .unwrap()
        .into_iter()
        .filter(|(_, d)| d.phase_id == phase_id)
        .collect();
    rows.sort_by_key(|(m, _)| m.match_number);
    rows
}

pub fn finish_update(phase_id: PhaseId, winner: u64, loser: u64) -> DetailUpdate {
    DetailUpdate {
        state: "finished".into(),
        phase_id: Some(phase_id),
        score_1: Some(3),
        score_2: Some(1),
        winner_id: Some(winner),
        loser_id: Some(loser),
    }
}

/// Finish every open match of the phase with entrant 1 winning.
pub fn finish_phase(store: &MemoryStore, sport: &Sport, phase_id: PhaseId) {
    for (m, d) in rows_in_phase(store, sport, phase_id) {
        if d.state == MatchState::Finished {
            continue;
        }
        let loser = m.entrant_2.unwrap();
        finish_match(store, &scoring(), sport.kind, d.id, &finish_update(phase_id, m.entrant_1, loser)).unwrap();
    }
}

/// Insert one matchup + detail directly, for setting up phases by hand.
pub fn insert_row(
    store: &MemoryStore,
    sport: &Sport,
    phase_id: PhaseId,
    number: u32,
    entrant_1: u64,
    entrant_2: Option<u64>,
    winner: Option<u64>,
) -> (Matchup, MatchDetail) {
    let m = Matchup::new(sport.kind, sport.id, EVENT, number, entrant_1, entrant_2);
    let mut d = MatchDetail::pending(&m, phase_id);
    if let Some(w) = winner {
        d.state = MatchState::Finished;
        d.winner = Some(w);
    }
    let (mm, dd) = (m.clone(), d.clone());
    store
        .transaction(|tx| {
            tx.insert_matchup(mm)?;
            tx.insert_detail(sport.kind, dd)
        })
        .unwrap();
    (m, d)
}
