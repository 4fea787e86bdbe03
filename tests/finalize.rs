//! Integration tests for match start, finish (history + points) and amendment.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use sports_bracket::{
    update_match, BracketStore, DetailUpdate, EngineError, Entrant, Finalized, MatchState,
    Outcome, RegistrationCategory,
};

fn start(phase_id: Option<u64>) -> DetailUpdate {
    DetailUpdate {
        state: "in_progress".into(),
        phase_id,
        ..DetailUpdate::default()
    }
}

#[test]
fn start_requires_a_phase_and_stamps_the_start() {
    let store = store();
    let sport = futsal();
    let phase = phase_at(&store, 3);
    let (_, d) = insert_row(&store, &sport, phase, 1, 1, Some(2), None);

    let err = update_match(&store, &scoring(), sport.kind, d.id, &start(None)).unwrap_err();
    assert_eq!(err, EngineError::MissingPhase);

    match update_match(&store, &scoring(), sport.kind, d.id, &start(Some(phase))).unwrap() {
        Finalized::Started { detail } => {
            assert_eq!(detail.state, MatchState::InProgress);
            assert_eq!(detail.phase_id, phase);
            assert!(detail.started_at.is_some());
            assert_eq!(detail.winner, None);
        }
        other => panic!("expected start, got {other:?}"),
    }
}

#[test]
fn finishing_the_final_awards_fifty_and_thirty() {
    let store = store();
    let sport = futsal();
    entrants(&store, &sport, 2);
    let final_phase = phase_at(&store, 4);
    assert_eq!(final_phase, config().engine.final_phase_id);
    let (m, d) = insert_row(&store, &sport, final_phase, 1, 1, Some(2), None);

    let update = DetailUpdate {
        score_1: Some(1),
        score_2: Some(4),
        ..finish_update(final_phase, 2, 1)
    };
    let (detail, history) = match update_match(&store, &scoring(), sport.kind, d.id, &update).unwrap() {
        Finalized::Finished { detail, history } => (detail, history),
        other => panic!("expected finish, got {other:?}"),
    };
    assert_eq!(detail.state, MatchState::Finished);
    assert_eq!((detail.score_1, detail.score_2), (Some(1), Some(4)));
    assert_eq!((detail.winner, detail.loser), (Some(2), Some(1)));
    assert!(detail.finished_at.is_some());

    let summary: Vec<(u64, Outcome, i32)> = history.iter().map(|h| (h.entrant_id, h.outcome, h.points)).collect();
    assert_eq!(summary, vec![(2, Outcome::Won, 50), (1, Outcome::Lost, 30)]);
    assert!(history.iter().all(|h| h.matchup_id == m.id));
    assert_eq!(store.history(sport.kind, sport.id).unwrap().len(), 2);
}

#[test]
fn earlier_phases_award_nothing() {
    let store = store();
    let sport = futsal();
    let phase = phase_at(&store, 3);
    let (_, d) = insert_row(&store, &sport, phase, 1, 1, Some(2), None);
    update_match(&store, &scoring(), sport.kind, d.id, &finish_update(phase, 1, 2)).unwrap();
    let points: Vec<i32> = store.history(sport.kind, sport.id).unwrap().iter().map(|h| h.points).collect();
    assert_eq!(points, vec![0, 0]);
}

#[test]
fn additional_registrations_score_zero_in_the_final() {
    let store = store();
    let sport = futsal();
    store
        .register_entrant(Entrant::new(1, sport.kind, "Extra", sport.id).with_category(RegistrationCategory::Additional))
        .unwrap();
    store.register_entrant(Entrant::new(2, sport.kind, "Regular", sport.id)).unwrap();
    let final_phase = phase_at(&store, 4);
    let (_, d) = insert_row(&store, &sport, final_phase, 1, 1, Some(2), None);

    update_match(&store, &scoring(), sport.kind, d.id, &finish_update(final_phase, 1, 2)).unwrap();
    let mut rows: Vec<(u64, i32)> = store
        .history(sport.kind, sport.id)
        .unwrap()
        .iter()
        .map(|h| (h.entrant_id, h.points))
        .collect();
    rows.sort_unstable();
    assert_eq!(rows, vec![(1, 0), (2, 30)]);
}

#[test]
fn missing_loser_changes_nothing() {
    let store = store();
    let sport = futsal();
    let phase = phase_at(&store, 3);
    let (_, d) = insert_row(&store, &sport, phase, 1, 1, Some(2), None);
    let update = DetailUpdate {
        loser_id: None,
        ..finish_update(phase, 1, 2)
    };
    let err = update_match(&store, &scoring(), sport.kind, d.id, &update).unwrap_err();
    assert_eq!(err, EngineError::MissingWinnerLoser);
    assert_eq!(rows_in_phase(&store, &sport, phase)[0].1.state, MatchState::Pending);
    assert!(store.history(sport.kind, sport.id).unwrap().is_empty());
}

#[test]
fn missing_scores_are_rejected() {
    let store = store();
    let sport = futsal();
    let phase = phase_at(&store, 3);
    let (_, d) = insert_row(&store, &sport, phase, 1, 1, Some(2), None);
    let update = DetailUpdate {
        score_2: None,
        ..finish_update(phase, 1, 2)
    };
    assert_eq!(
        update_match(&store, &scoring(), sport.kind, d.id, &update).unwrap_err(),
        EngineError::MissingScores
    );
}

#[test]
fn unknown_target_state_is_invalid() {
    let store = store();
    let sport = futsal();
    let phase = phase_at(&store, 3);
    let (_, d) = insert_row(&store, &sport, phase, 1, 1, Some(2), None);
    let update = DetailUpdate {
        state: "paused".into(),
        ..DetailUpdate::default()
    };
    assert_eq!(
        update_match(&store, &scoring(), sport.kind, d.id, &update).unwrap_err(),
        EngineError::InvalidState("paused".into())
    );
}

#[test]
fn finishing_twice_is_rejected_and_history_is_written_once() {
    let store = store();
    let sport = futsal();
    let phase = phase_at(&store, 3);
    let (_, d) = insert_row(&store, &sport, phase, 1, 1, Some(2), None);
    update_match(&store, &scoring(), sport.kind, d.id, &finish_update(phase, 1, 2)).unwrap();

    let err = update_match(&store, &scoring(), sport.kind, d.id, &finish_update(phase, 1, 2)).unwrap_err();
    assert_eq!(err, EngineError::AlreadyFinished(d.id));
    assert_eq!(store.history(sport.kind, sport.id).unwrap().len(), 2);

    let err = update_match(&store, &scoring(), sport.kind, d.id, &start(Some(phase))).unwrap_err();
    assert_eq!(err, EngineError::AlreadyFinished(d.id));
}

#[test]
fn byes_cannot_be_finished() {
    let store = store();
    let sport = futsal();
    let phase = phase_at(&store, 3);
    let (_, d) = insert_row(&store, &sport, phase, 1, 1, None, Some(1));
    let err = update_match(&store, &scoring(), sport.kind, d.id, &finish_update(phase, 1, 2)).unwrap_err();
    assert_eq!(err, EngineError::AlreadyFinished(d.id));
}

#[test]
fn result_must_name_the_two_entrants_of_the_match() {
    let store = store();
    let sport = futsal();
    let phase = phase_at(&store, 3);
    let (_, d) = insert_row(&store, &sport, phase, 1, 1, Some(2), None);
    let err = update_match(&store, &scoring(), sport.kind, d.id, &finish_update(phase, 1, 9)).unwrap_err();
    assert_eq!(err, EngineError::EntrantNotInMatch(9));
    let err = update_match(&store, &scoring(), sport.kind, d.id, &finish_update(phase, 2, 2)).unwrap_err();
    assert_eq!(err, EngineError::EntrantNotInMatch(2));
}

#[test]
fn unknown_detail_is_not_found() {
    let store = store();
    let sport = futsal();
    let phase = phase_at(&store, 3);
    let missing = uuid::Uuid::new_v4();
    let err = update_match(&store, &scoring(), sport.kind, missing, &finish_update(phase, 1, 2)).unwrap_err();
    assert_eq!(err, EngineError::DetailNotFound(missing));
}

#[test]
fn amend_rewrites_result_but_not_state_timestamps_or_history() {
    let store = store();
    let sport = futsal();
    let phase = phase_at(&store, 4);
    let (_, d) = insert_row(&store, &sport, phase, 1, 1, Some(2), None);
    let finished = match update_match(&store, &scoring(), sport.kind, d.id, &finish_update(phase, 1, 2)).unwrap() {
        Finalized::Finished { detail, .. } => detail,
        other => panic!("expected finish, got {other:?}"),
    };
    let before = store.history(sport.kind, sport.id).unwrap();

    let amend = DetailUpdate {
        state: "amend".into(),
        score_1: Some(2),
        score_2: Some(5),
        winner_id: Some(2),
        ..DetailUpdate::default()
    };
    let amended = match update_match(&store, &scoring(), sport.kind, d.id, &amend).unwrap() {
        Finalized::Amended { detail } => detail,
        other => panic!("expected amend, got {other:?}"),
    };
    assert_eq!((amended.score_1, amended.score_2), (Some(2), Some(5)));
    assert_eq!((amended.winner, amended.loser), (Some(2), Some(1)));
    assert_eq!(amended.state, MatchState::Finished);
    assert_eq!(amended.finished_at, finished.finished_at);
    assert_eq!(store.history(sport.kind, sport.id).unwrap(), before);
}

#[test]
fn amend_needs_a_finished_match() {
    let store = store();
    let sport = futsal();
    let phase = phase_at(&store, 3);
    let (_, d) = insert_row(&store, &sport, phase, 1, 1, Some(2), None);
    let amend = DetailUpdate {
        state: "amend".into(),
        score_1: Some(2),
        score_2: Some(5),
        winner_id: Some(2),
        ..DetailUpdate::default()
    };
    assert_eq!(
        update_match(&store, &scoring(), sport.kind, d.id, &amend).unwrap_err(),
        EngineError::NotFinished(d.id)
    );
}

#[test]
fn byes_cannot_be_amended() {
    let store = store();
    let sport = futsal();
    let phase = phase_at(&store, 3);
    let (_, d) = insert_row(&store, &sport, phase, 1, 1, None, Some(1));
    let amend = DetailUpdate {
        state: "amend".into(),
        score_1: Some(3),
        score_2: Some(0),
        winner_id: Some(1),
        ..DetailUpdate::default()
    };
    assert_eq!(
        update_match(&store, &scoring(), sport.kind, d.id, &amend).unwrap_err(),
        EngineError::ByeResult(d.id)
    );
    let (_, row) = &rows_in_phase(&store, &sport, phase)[0];
    assert_eq!((row.score_1, row.score_2, row.winner), (None, None, Some(1)));
}
