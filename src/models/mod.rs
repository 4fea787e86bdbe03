//! Data structures for the bracket: phases, entrants, matchups, details, history.

mod entrant;
mod error;
mod matchup;
mod phase;

pub use entrant::{Entrant, EntrantId, EntrantKind, RegistrationCategory, Sport, SportId};
pub use error::EngineError;
pub use matchup::{
    DetailId, HistoryRecord, MatchDetail, MatchState, Matchup, MatchupId, Outcome,
};
pub use phase::{EventId, Phase, PhaseId};
