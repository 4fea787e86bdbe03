//! Collaborators the engine reads from and writes to.
//!
//! The phase ladder and the entrant roster are owned by other parts of the portal;
//! the bracket tables are written only through a [`BracketTx`] inside
//! [`BracketStore::transaction`], so every engine operation commits whole or not at all.

mod memory;

pub use memory::MemoryStore;

use crate::models::{
    DetailId, EngineError, Entrant, EntrantId, EntrantKind, EventId, HistoryRecord, MatchDetail,
    Matchup, MatchupId, Phase, PhaseId, SportId,
};

/// Read access to the provisioned phase ladder.
pub trait PhaseDirectory {
    /// All phases of the event, ascending by `order`.
    fn list_phases(&self, event_id: EventId) -> Result<Vec<Phase>, EngineError>;

    fn find_phase(&self, event_id: EventId, order: u32) -> Result<Option<Phase>, EngineError>;

    /// The phase with the smallest order strictly greater than `after_order`.
    fn next_phase(&self, event_id: EventId, after_order: u32) -> Result<Option<Phase>, EngineError>;

    fn phase(&self, phase_id: PhaseId) -> Result<Option<Phase>, EngineError>;
}

/// Read access to registered entrants.
pub trait EntrantDirectory {
    fn entrant(&self, kind: EntrantKind, id: EntrantId) -> Result<Option<Entrant>, EngineError>;

    /// Registered entrants of a sport, ordered by id.
    fn entrants_for_sport(&self, kind: EntrantKind, sport_id: SportId) -> Result<Vec<Entrant>, EngineError>;

    /// Name of the single player representing a team, for individual sports registered as teams.
    fn representative_name(&self, id: EntrantId) -> Result<Option<String>, EngineError>;
}

/// Writes and reads available inside one transaction. Tables are kept per entrant kind.
pub trait BracketTx {
    fn insert_matchup(&mut self, matchup: Matchup) -> Result<(), EngineError>;

    fn insert_detail(&mut self, kind: EntrantKind, detail: MatchDetail) -> Result<(), EngineError>;

    /// Replace an existing detail row (matched by id).
    fn update_detail(&mut self, kind: EntrantKind, detail: MatchDetail) -> Result<(), EngineError>;

    fn detail(&self, kind: EntrantKind, id: DetailId) -> Result<Option<MatchDetail>, EngineError>;

    fn matchup(&self, kind: EntrantKind, id: MatchupId) -> Result<Option<Matchup>, EngineError>;

    /// Every matchup of the sport whose detail sits in `phase_id`, in no particular order.
    fn matchups_in_phase(
        &self,
        kind: EntrantKind,
        sport_id: SportId,
        phase_id: PhaseId,
    ) -> Result<Vec<(Matchup, MatchDetail)>, EngineError>;

    /// Every matchup of the event for this entrant kind, across all sports.
    fn matchups_in_event(&self, kind: EntrantKind, event_id: EventId) -> Result<Vec<(Matchup, MatchDetail)>, EngineError>;

    fn insert_history(&mut self, record: HistoryRecord) -> Result<(), EngineError>;
}

/// Persistent bracket tables with an all-or-nothing transaction scope.
pub trait BracketStore {
    /// Run `f` against a transaction. `Ok` commits every write made through the tx;
    /// `Err` discards all of them and is returned unchanged.
    fn transaction<T, F>(&self, f: F) -> Result<T, EngineError>
    where
        F: FnOnce(&mut dyn BracketTx) -> Result<T, EngineError>;

    /// Every matchup of the sport in the event, in no particular order.
    fn matchups_for_event(
        &self,
        kind: EntrantKind,
        sport_id: SportId,
        event_id: EventId,
    ) -> Result<Vec<(Matchup, MatchDetail)>, EngineError>;

    /// History rows for the sport.
    fn history(&self, kind: EntrantKind, sport_id: SportId) -> Result<Vec<HistoryRecord>, EngineError>;
}
