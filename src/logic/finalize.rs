//! Match detail lifecycle: start, finish (with history), and result amendment.

use crate::logic::scoring::ScoringPolicy;
use crate::models::{
    DetailId, EngineError, EntrantId, EntrantKind, HistoryRecord, MatchDetail, MatchState,
    Matchup, Outcome, PhaseId, RegistrationCategory,
};
use crate::store::{BracketStore, BracketTx, EntrantDirectory, PhaseDirectory};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Transition requested by the caller.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetState {
    /// Pending -> InProgress.
    Start,
    /// Any -> Finished, writing history.
    Finish,
    /// Correct scores/winner of a finished match; state, timestamps and history untouched.
    Amend,
}

impl FromStr for TargetState {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "in_progress" | "start" => Ok(TargetState::Start),
            "finished" | "finish" => Ok(TargetState::Finish),
            "amend" | "modify" => Ok(TargetState::Amend),
            other => Err(EngineError::InvalidState(other.to_string())),
        }
    }
}

/// Caller payload for a detail update. Which fields are required depends on `state`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct DetailUpdate {
    pub state: String,
    #[serde(default)]
    pub phase_id: Option<PhaseId>,
    #[serde(default)]
    pub score_1: Option<i32>,
    #[serde(default)]
    pub score_2: Option<i32>,
    #[serde(default)]
    pub winner_id: Option<EntrantId>,
    #[serde(default)]
    pub loser_id: Option<EntrantId>,
}

/// What an update did.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Finalized {
    Started { detail: MatchDetail },
    Finished { detail: MatchDetail, history: Vec<HistoryRecord> },
    Amended { detail: MatchDetail },
}

/// Parse `update.state` and apply the matching transition to `detail_id`.
pub fn update_match<S>(
    store: &S,
    scoring: &ScoringPolicy,
    kind: EntrantKind,
    detail_id: DetailId,
    update: &DetailUpdate,
) -> Result<Finalized, EngineError>
where
    S: BracketStore + PhaseDirectory + EntrantDirectory,
{
    match update.state.parse::<TargetState>()? {
        TargetState::Start => {
            start_match(store, kind, detail_id, update.phase_id).map(|detail| Finalized::Started { detail })
        }
        TargetState::Finish => finish_match(store, scoring, kind, detail_id, update)
            .map(|(detail, history)| Finalized::Finished { detail, history }),
        TargetState::Amend => {
            amend_result(store, kind, detail_id, update).map(|detail| Finalized::Amended { detail })
        }
    }
}

fn require_phase<S: PhaseDirectory>(store: &S, phase_id: Option<PhaseId>) -> Result<PhaseId, EngineError> {
    let phase_id = phase_id.ok_or(EngineError::MissingPhase)?;
    store
        .phase(phase_id)?
        .map(|p| p.id)
        .ok_or(EngineError::UnknownPhase(phase_id))
}

fn require_scores(update: &DetailUpdate) -> Result<(i32, i32), EngineError> {
    match (update.score_1, update.score_2) {
        (Some(s1), Some(s2)) => Ok((s1, s2)),
        _ => Err(EngineError::MissingScores),
    }
}

fn load(tx: &dyn BracketTx, kind: EntrantKind, detail_id: DetailId) -> Result<(MatchDetail, Matchup), EngineError> {
    let detail = tx
        .detail(kind, detail_id)?
        .ok_or(EngineError::DetailNotFound(detail_id))?;
    let matchup = tx
        .matchup(kind, detail.matchup_id)?
        .ok_or_else(|| EngineError::Store(format!("detail {} has no matchup", detail.id)))?;
    Ok((detail, matchup))
}

/// Mark a match as being played in `phase_id` and stamp its start time.
pub fn start_match<S>(
    store: &S,
    kind: EntrantKind,
    detail_id: DetailId,
    phase_id: Option<PhaseId>,
) -> Result<MatchDetail, EngineError>
where
    S: BracketStore + PhaseDirectory,
{
    let phase_id = require_phase(store, phase_id)?;
    store.transaction(|tx| {
        let (mut detail, _) = load(tx, kind, detail_id)?;
        if detail.is_finished() {
            return Err(EngineError::AlreadyFinished(detail_id));
        }
        detail.state = MatchState::InProgress;
        detail.phase_id = phase_id;
        detail.started_at = Some(Utc::now());
        tx.update_detail(kind, detail.clone())?;
        Ok(detail)
    })
}

/// Finish a match: record scores, winner and loser, then one history row per entrant.
///
/// Points come from `scoring`. Finishing an already-finished detail is rejected, so history
/// is written at most once per match.
pub fn finish_match<S>(
    store: &S,
    scoring: &ScoringPolicy,
    kind: EntrantKind,
    detail_id: DetailId,
    update: &DetailUpdate,
) -> Result<(MatchDetail, Vec<HistoryRecord>), EngineError>
where
    S: BracketStore + PhaseDirectory + EntrantDirectory,
{
    let phase_id = require_phase(store, update.phase_id)?;
    let (score_1, score_2) = require_scores(update)?;
    let (winner, loser) = match (update.winner_id, update.loser_id) {
        (Some(w), Some(l)) => (w, l),
        _ => return Err(EngineError::MissingWinnerLoser),
    };

    let category = |id: EntrantId| -> Result<RegistrationCategory, EngineError> {
        Ok(store
            .entrant(kind, id)?
            .map(|e| e.category)
            .unwrap_or_default())
    };
    let winner_points = scoring.points(category(winner)?, phase_id, Outcome::Won);
    let loser_points = scoring.points(category(loser)?, phase_id, Outcome::Lost);

    let (detail, history) = store.transaction(|tx| {
        let (mut detail, matchup) = load(tx, kind, detail_id)?;
        if detail.is_finished() {
            return Err(EngineError::AlreadyFinished(detail_id));
        }
        if matchup.opponent_of(winner) != Some(loser) {
            let stranger = if matchup.involves(winner) { loser } else { winner };
            return Err(EngineError::EntrantNotInMatch(stranger));
        }

        let now = Utc::now();
        detail.state = MatchState::Finished;
        detail.phase_id = phase_id;
        detail.finished_at = Some(now);
        detail.score_1 = Some(score_1);
        detail.score_2 = Some(score_2);
        detail.winner = Some(winner);
        detail.loser = Some(loser);
        tx.update_detail(kind, detail.clone())?;

        let history = vec![
            HistoryRecord::new(&matchup, winner, Outcome::Won, winner_points, now),
            HistoryRecord::new(&matchup, loser, Outcome::Lost, loser_points, now),
        ];
        for record in &history {
            tx.insert_history(record.clone())?;
        }
        Ok((detail, history))
    })?;

    log::info!(
        "match {} finished {}-{}: {} beat {} ({} / {} pts)",
        detail.id,
        score_1,
        score_2,
        winner,
        loser,
        winner_points,
        loser_points
    );
    Ok((detail, history))
}

/// Correct the scores and winner of a finished match. The loser follows the new winner.
/// Byes carry no result and cannot be amended.
pub fn amend_result<S>(
    store: &S,
    kind: EntrantKind,
    detail_id: DetailId,
    update: &DetailUpdate,
) -> Result<MatchDetail, EngineError>
where
    S: BracketStore,
{
    let (score_1, score_2) = require_scores(update)?;
    let winner = update.winner_id.ok_or(EngineError::MissingWinnerLoser)?;

    store.transaction(|tx| {
        let (mut detail, matchup) = load(tx, kind, detail_id)?;
        if !detail.is_finished() {
            return Err(EngineError::NotFinished(detail_id));
        }
        if matchup.is_bye() {
            return Err(EngineError::ByeResult(detail_id));
        }
        if !matchup.involves(winner) {
            return Err(EngineError::EntrantNotInMatch(winner));
        }
        detail.score_1 = Some(score_1);
        detail.score_2 = Some(score_2);
        detail.winner = Some(winner);
        detail.loser = matchup.opponent_of(winner);
        tx.update_detail(kind, detail.clone())?;
        log::info!("match {} amended {}-{}, winner {}", detail.id, score_1, score_2, winner);
        Ok(detail)
    })
}
