//! In-process store: provisioned phases, registered entrants and kind-specific bracket tables.

use crate::models::{
    DetailId, EngineError, Entrant, EntrantId, EntrantKind, EventId, HistoryRecord, MatchDetail,
    Matchup, MatchupId, Phase, PhaseId, SportId,
};
use crate::store::{BracketStore, BracketTx, EntrantDirectory, PhaseDirectory};
use std::collections::HashMap;
use std::sync::RwLock;

/// Bracket rows for one entrant kind.
#[derive(Clone, Debug, Default)]
struct Tables {
    matchups: HashMap<MatchupId, Matchup>,
    details: HashMap<DetailId, MatchDetail>,
    history: Vec<HistoryRecord>,
}

impl Tables {
    fn joined<P>(&self, mut keep: P) -> Vec<(Matchup, MatchDetail)>
    where
        P: FnMut(&Matchup, &MatchDetail) -> bool,
    {
        self.details
            .values()
            .filter_map(|d| self.matchups.get(&d.matchup_id).map(|m| (m, d)))
            .filter(|(m, d)| keep(m, d))
            .map(|(m, d)| (m.clone(), d.clone()))
            .collect()
    }
}

#[derive(Clone, Debug, Default)]
struct Ledger {
    teams: Tables,
    players: Tables,
}

impl Ledger {
    fn tables(&self, kind: EntrantKind) -> &Tables {
        match kind {
            EntrantKind::Team => &self.teams,
            EntrantKind::Player => &self.players,
        }
    }

    fn tables_mut(&mut self, kind: EntrantKind) -> &mut Tables {
        match kind {
            EntrantKind::Team => &mut self.teams,
            EntrantKind::Player => &mut self.players,
        }
    }
}

/// Transaction handle: writes go to a working copy that is swapped in on commit.
struct MemoryTx<'a> {
    ledger: &'a mut Ledger,
}

impl BracketTx for MemoryTx<'_> {
    fn insert_matchup(&mut self, matchup: Matchup) -> Result<(), EngineError> {
        let tables = self.ledger.tables_mut(matchup.kind);
        if tables.matchups.contains_key(&matchup.id) {
            return Err(EngineError::Store(format!("duplicate matchup {}", matchup.id)));
        }
        tables.matchups.insert(matchup.id, matchup);
        Ok(())
    }

    fn insert_detail(&mut self, kind: EntrantKind, detail: MatchDetail) -> Result<(), EngineError> {
        let tables = self.ledger.tables_mut(kind);
        if !tables.matchups.contains_key(&detail.matchup_id) {
            return Err(EngineError::Store(format!(
                "detail {} references unknown matchup {}",
                detail.id, detail.matchup_id
            )));
        }
        if tables.details.contains_key(&detail.id) {
            return Err(EngineError::Store(format!("duplicate detail {}", detail.id)));
        }
        tables.details.insert(detail.id, detail);
        Ok(())
    }

    fn update_detail(&mut self, kind: EntrantKind, detail: MatchDetail) -> Result<(), EngineError> {
        match self.ledger.tables_mut(kind).details.get_mut(&detail.id) {
            Some(row) => {
                *row = detail;
                Ok(())
            }
            None => Err(EngineError::DetailNotFound(detail.id)),
        }
    }

    fn detail(&self, kind: EntrantKind, id: DetailId) -> Result<Option<MatchDetail>, EngineError> {
        Ok(self.ledger.tables(kind).details.get(&id).cloned())
    }

    fn matchup(&self, kind: EntrantKind, id: MatchupId) -> Result<Option<Matchup>, EngineError> {
        Ok(self.ledger.tables(kind).matchups.get(&id).cloned())
    }

    fn matchups_in_phase(
        &self,
        kind: EntrantKind,
        sport_id: SportId,
        phase_id: PhaseId,
    ) -> Result<Vec<(Matchup, MatchDetail)>, EngineError> {
        Ok(self
            .ledger
            .tables(kind)
            .joined(|m, d| m.sport_id == sport_id && d.phase_id == phase_id))
    }

    fn matchups_in_event(&self, kind: EntrantKind, event_id: EventId) -> Result<Vec<(Matchup, MatchDetail)>, EngineError> {
        Ok(self.ledger.tables(kind).joined(|_, d| d.event_id == event_id))
    }

    fn insert_history(&mut self, record: HistoryRecord) -> Result<(), EngineError> {
        self.ledger.tables_mut(record.kind).history.push(record);
        Ok(())
    }
}

fn poisoned(what: &str) -> EngineError {
    EngineError::Store(format!("{what} lock poisoned"))
}

/// Store backed by process memory. Phases are fixed at construction; entrants can be registered later.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Sorted by (event_id, order).
    phases: Vec<Phase>,
    entrants: RwLock<HashMap<(EntrantKind, EntrantId), Entrant>>,
    representatives: RwLock<HashMap<EntrantId, String>>,
    ledger: RwLock<Ledger>,
}

impl MemoryStore {
    pub fn new(mut phases: Vec<Phase>) -> Self {
        phases.sort_by_key(|p| (p.event_id, p.order));
        Self {
            phases,
            ..Self::default()
        }
    }

    /// Add an entrant to the directory, or replace it within the same sport.
    ///
    /// An id already registered under another sport of the same kind is rejected.
    pub fn register_entrant(&self, entrant: Entrant) -> Result<(), EngineError> {
        let mut g = self.entrants.write().map_err(|_| poisoned("entrants"))?;
        if let Some(existing) = g.get(&(entrant.kind, entrant.id)) {
            if existing.sport_id != entrant.sport_id {
                return Err(EngineError::EntrantSportMismatch {
                    id: entrant.id,
                    registered: existing.sport_id,
                    requested: entrant.sport_id,
                });
            }
        }
        g.insert((entrant.kind, entrant.id), entrant);
        Ok(())
    }

    /// Record the player who represents a single-player team.
    pub fn set_representative(&self, team_id: EntrantId, name: impl Into<String>) -> Result<(), EngineError> {
        let mut g = self.representatives.write().map_err(|_| poisoned("representatives"))?;
        g.insert(team_id, name.into());
        Ok(())
    }
}

impl PhaseDirectory for MemoryStore {
    fn list_phases(&self, event_id: EventId) -> Result<Vec<Phase>, EngineError> {
        Ok(self
            .phases
            .iter()
            .filter(|p| p.event_id == event_id)
            .cloned()
            .collect())
    }

    fn find_phase(&self, event_id: EventId, order: u32) -> Result<Option<Phase>, EngineError> {
        Ok(self
            .phases
            .iter()
            .find(|p| p.event_id == event_id && p.order == order)
            .cloned())
    }

    fn next_phase(&self, event_id: EventId, after_order: u32) -> Result<Option<Phase>, EngineError> {
        Ok(self
            .phases
            .iter()
            .find(|p| p.event_id == event_id && p.order > after_order)
            .cloned())
    }

    fn phase(&self, phase_id: PhaseId) -> Result<Option<Phase>, EngineError> {
        Ok(self.phases.iter().find(|p| p.id == phase_id).cloned())
    }
}

impl EntrantDirectory for MemoryStore {
    fn entrant(&self, kind: EntrantKind, id: EntrantId) -> Result<Option<Entrant>, EngineError> {
        let g = self.entrants.read().map_err(|_| poisoned("entrants"))?;
        Ok(g.get(&(kind, id)).cloned())
    }

    fn entrants_for_sport(&self, kind: EntrantKind, sport_id: SportId) -> Result<Vec<Entrant>, EngineError> {
        let g = self.entrants.read().map_err(|_| poisoned("entrants"))?;
        let mut out: Vec<Entrant> = g
            .values()
            .filter(|e| e.kind == kind && e.sport_id == sport_id)
            .cloned()
            .collect();
        out.sort_by_key(|e| e.id);
        Ok(out)
    }

    fn representative_name(&self, id: EntrantId) -> Result<Option<String>, EngineError> {
        let g = self.representatives.read().map_err(|_| poisoned("representatives"))?;
        Ok(g.get(&id).cloned())
    }
}

impl BracketStore for MemoryStore {
    fn transaction<T, F>(&self, f: F) -> Result<T, EngineError>
    where
        F: FnOnce(&mut dyn BracketTx) -> Result<T, EngineError>,
    {
        // Held for the whole closure, so concurrent writers run one after another.
        let mut guard = self.ledger.write().map_err(|_| poisoned("ledger"))?;
        let mut working = guard.clone();
        let out = f(&mut MemoryTx { ledger: &mut working })?;
        *guard = working;
        Ok(out)
    }

    fn matchups_for_event(
        &self,
        kind: EntrantKind,
        sport_id: SportId,
        event_id: EventId,
    ) -> Result<Vec<(Matchup, MatchDetail)>, EngineError> {
        let g = self.ledger.read().map_err(|_| poisoned("ledger"))?;
        Ok(g.tables(kind)
            .joined(|m, d| m.sport_id == sport_id && d.event_id == event_id))
    }

    fn history(&self, kind: EntrantKind, sport_id: SportId) -> Result<Vec<HistoryRecord>, EngineError> {
        let g = self.ledger.read().map_err(|_| poisoned("ledger"))?;
        Ok(g.tables(kind)
            .history
            .iter()
            .filter(|h| h.sport_id == sport_id)
            .cloned()
            .collect())
    }
}
