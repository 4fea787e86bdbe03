//! Errors returned by bracket operations.

use crate::models::entrant::{EntrantId, SportId};
use crate::models::matchup::DetailId;
use crate::models::phase::{EventId, PhaseId};
use thiserror::Error;

/// Errors that can occur during bracket operations. Every failure leaves stored state unchanged.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum EngineError {
    /// Fewer entrants than the sport's minimum.
    #[error("Need at least {required} entrants to generate a bracket (received {received})")]
    InsufficientEntrants { required: usize, received: usize },

    /// The bracket needs more rounds than the phase ladder provides.
    #[error("{entrants} entrants need a starting phase order of {starting_order}, below the provisioned ladder")]
    BracketTooDeep { entrants: usize, starting_order: i64 },

    /// No phase is provisioned at the computed starting order.
    #[error("No phase with order {order} for event {event_id}")]
    PhaseNotFound { event_id: EventId, order: u32 },

    /// No phase follows the one being advanced.
    #[error("No phase configured after phase {phase_id} (order {order})")]
    NoNextPhase { phase_id: PhaseId, order: u32 },

    /// Advancement attempted while matches of the phase are still open.
    #[error("{pending} match(es) still pending in the current phase")]
    MatchesPending { pending: usize },

    /// A completed phase produced no winners or byes.
    #[error("No winners or byes to advance from phase {phase_id}")]
    NoAdvancers { phase_id: PhaseId },

    #[error("Phase id is required")]
    MissingPhase,

    #[error("Both score values are required")]
    MissingScores,

    #[error("Winner and loser ids are required")]
    MissingWinnerLoser,

    /// Unknown target state requested for a match detail.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Phase {0} not found")]
    UnknownPhase(PhaseId),

    #[error("Sport {0} not found")]
    UnknownSport(SportId),

    #[error("Entrant {0} not found")]
    UnknownEntrant(EntrantId),

    #[error("Match detail {0} not found")]
    DetailNotFound(DetailId),

    /// Starting or finishing a detail that is already finished.
    #[error("Match detail {0} is already finished")]
    AlreadyFinished(DetailId),

    /// Amending a result that was never finished.
    #[error("Match detail {0} is not finished")]
    NotFinished(DetailId),

    #[error("Entrant {0} does not play in this match")]
    EntrantNotInMatch(EntrantId),

    /// Byes are created finished and never carry scores.
    #[error("Match detail {0} is a bye and has no result to amend")]
    ByeResult(DetailId),

    /// The sport already has matchups in the event.
    #[error("Sport {sport_id} already has a bracket in event {event_id}")]
    BracketExists { sport_id: SportId, event_id: EventId },

    /// The entrant already sits in a bracket of the event.
    #[error("Entrant {0} is already placed in a bracket")]
    EntrantAlreadyPlaced(EntrantId),

    /// An entrant id is already registered under another sport.
    #[error("Entrant {id} is registered for sport {registered}, not sport {requested}")]
    EntrantSportMismatch {
        id: EntrantId,
        registered: SportId,
        requested: SportId,
    },

    #[error("Store error: {0}")]
    Store(String),
}

impl EngineError {
    /// Errors the caller can fix by correcting or retrying the request.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            EngineError::BracketTooDeep { .. }
                | EngineError::PhaseNotFound { .. }
                | EngineError::NoNextPhase { .. }
                | EngineError::NoAdvancers { .. }
                | EngineError::Store(_)
        )
    }
}
