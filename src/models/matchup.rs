//! Matchup (bracket slot), its MatchDetail, and the per-entrant HistoryRecord.

use crate::models::entrant::{EntrantId, EntrantKind, SportId};
use crate::models::phase::{EventId, PhaseId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a matchup.
pub type MatchupId = Uuid;

/// Unique identifier for a match detail.
pub type DetailId = Uuid;

/// Lifecycle of a match detail.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchState {
    #[default]
    Pending,
    InProgress,
    Finished,
}

/// One bracket slot. `entrant_2 == None` makes it a bye.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub id: MatchupId,
    pub kind: EntrantKind,
    pub sport_id: SportId,
    pub event_id: EventId,
    /// 1-based, contiguous among the matchups created together for one phase.
    pub match_number: u32,
    pub entrant_1: EntrantId,
    pub entrant_2: Option<EntrantId>,
}

impl Matchup {
    pub fn new(
        kind: EntrantKind,
        sport_id: SportId,
        event_id: EventId,
        match_number: u32,
        entrant_1: EntrantId,
        entrant_2: Option<EntrantId>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            sport_id,
            event_id,
            match_number,
            entrant_1,
            entrant_2,
        }
    }

    pub fn is_bye(&self) -> bool {
        self.entrant_2.is_none()
    }

    /// True if `id` plays in this matchup.
    pub fn involves(&self, id: EntrantId) -> bool {
        self.entrant_1 == id || self.entrant_2 == Some(id)
    }

    /// The entrant facing `id`, if `id` plays here and the slot is not a bye.
    pub fn opponent_of(&self, id: EntrantId) -> Option<EntrantId> {
        match self.entrant_2 {
            Some(other) if self.entrant_1 == id => Some(other),
            Some(other) if other == id => Some(self.entrant_1),
            _ => None,
        }
    }
}

/// Mutable half of a match. `winner` is set if and only if `state == Finished`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchDetail {
    pub id: DetailId,
    pub matchup_id: MatchupId,
    pub event_id: EventId,
    pub phase_id: PhaseId,
    pub state: MatchState,
    pub score_1: Option<i32>,
    pub score_2: Option<i32>,
    pub winner: Option<EntrantId>,
    pub loser: Option<EntrantId>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl MatchDetail {
    /// Detail for an ordinary matchup: pending, no scores, no winner.
    pub fn pending(matchup: &Matchup, phase_id: PhaseId) -> Self {
        Self {
            id: Uuid::new_v4(),
            matchup_id: matchup.id,
            event_id: matchup.event_id,
            phase_id,
            state: MatchState::Pending,
            score_1: None,
            score_2: None,
            winner: None,
            loser: None,
            started_at: None,
            finished_at: None,
        }
    }

    /// Detail for a bye: already finished with `entrant_1` as winner and no scores.
    pub fn bye(matchup: &Matchup, phase_id: PhaseId) -> Self {
        Self {
            state: MatchState::Finished,
            winner: Some(matchup.entrant_1),
            ..Self::pending(matchup, phase_id)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state == MatchState::Finished
    }
}

/// Result recorded for one entrant of a finished match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Won,
    Lost,
}

/// One row per entrant per finished non-bye matchup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub kind: EntrantKind,
    pub sport_id: SportId,
    pub entrant_id: EntrantId,
    pub matchup_id: MatchupId,
    pub outcome: Outcome,
    pub points: i32,
    pub recorded_at: DateTime<Utc>,
}

impl HistoryRecord {
    pub fn new(
        matchup: &Matchup,
        entrant_id: EntrantId,
        outcome: Outcome,
        points: i32,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: matchup.kind,
            sport_id: matchup.sport_id,
            entrant_id,
            matchup_id: matchup.id,
            outcome,
            points,
            recorded_at,
        }
    }
}
