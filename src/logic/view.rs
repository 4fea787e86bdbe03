//! Presentation of matchups: entrant display data grouped into rounds.

use crate::models::{
    EngineError, Entrant, EntrantId, EntrantKind, EventId, MatchDetail, MatchState, Matchup,
    Phase, PhaseId, Sport,
};
use crate::store::{BracketStore, EntrantDirectory, PhaseDirectory};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Display data for one entrant.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EntrantView {
    pub id: EntrantId,
    pub name: String,
    pub cycle: Option<String>,
}

impl EntrantView {
    pub fn from_entrant(e: &Entrant) -> Self {
        Self {
            id: e.id,
            name: e.name.clone(),
            cycle: e.cycle.clone(),
        }
    }
}

/// One matchup with its detail, ready for rendering.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchupView {
    pub matchup_id: Uuid,
    pub detail_id: Uuid,
    pub match_number: u32,
    pub entrant_1: EntrantView,
    pub entrant_2: Option<EntrantView>,
    pub is_bye: bool,
    pub state: MatchState,
    pub score_1: Option<i32>,
    pub score_2: Option<i32>,
    pub winner: Option<EntrantId>,
}

/// One phase of the bracket and its matchups, ascending by match number.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundView {
    pub phase_id: PhaseId,
    pub name: String,
    pub order: u32,
    pub matches: Vec<MatchupView>,
}

impl RoundView {
    pub fn empty(phase: &Phase) -> Self {
        Self {
            phase_id: phase.id,
            name: phase.name.clone(),
            order: phase.order,
            matches: Vec::new(),
        }
    }
}

/// Whether a registered entrant has been drawn into the bracket yet.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawStatus {
    Available,
    Assigned,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EntrantDraw {
    pub entrant: EntrantView,
    pub status: DrawStatus,
}

/// Whole bracket of a sport within an event.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BracketView {
    pub sport: Sport,
    pub event_id: EventId,
    pub rounds: Vec<RoundView>,
    pub total_matches: usize,
    /// Registered entrants of the sport, ascending by id.
    pub entrants: Vec<EntrantDraw>,
    pub available: usize,
    pub assigned: usize,
}

/// Resolves entrant display data, substituting representative names where the sport asks for it.
pub struct NameResolver<'a, D: ?Sized> {
    directory: &'a D,
    sport: &'a Sport,
    cache: HashMap<EntrantId, EntrantView>,
}

impl<'a, D: EntrantDirectory + ?Sized> NameResolver<'a, D> {
    pub fn new(directory: &'a D, sport: &'a Sport) -> Self {
        Self {
            directory,
            sport,
            cache: HashMap::new(),
        }
    }

    /// Pre-load entrants already in hand so they are not looked up again.
    pub fn prime(&mut self, entrants: &[Entrant]) -> Result<(), EngineError> {
        for e in entrants {
            let view = self.present(EntrantView::from_entrant(e))?;
            self.cache.insert(e.id, view);
        }
        Ok(())
    }

    pub fn resolve(&mut self, id: EntrantId) -> Result<EntrantView, EngineError> {
        if let Some(v) = self.cache.get(&id) {
            return Ok(v.clone());
        }
        let base = match self.directory.entrant(self.sport.kind, id)? {
            Some(e) => EntrantView::from_entrant(&e),
            None => {
                log::warn!("entrant {} of sport {} missing from directory", id, self.sport.id);
                EntrantView {
                    id,
                    name: format!("#{id}"),
                    cycle: None,
                }
            }
        };
        let view = self.present(base)?;
        self.cache.insert(id, view.clone());
        Ok(view)
    }

    fn present(&self, mut view: EntrantView) -> Result<EntrantView, EngineError> {
        if self.sport.kind == EntrantKind::Team && self.sport.representative_names {
            if let Some(name) = self.directory.representative_name(view.id)? {
                view.name = name;
            }
        }
        Ok(view)
    }

    pub fn matchup(&mut self, matchup: &Matchup, detail: &MatchDetail) -> Result<MatchupView, EngineError> {
        let entrant_2 = match matchup.entrant_2 {
            Some(id) => Some(self.resolve(id)?),
            None => None,
        };
        Ok(MatchupView {
            matchup_id: matchup.id,
            detail_id: detail.id,
            match_number: matchup.match_number,
            entrant_1: self.resolve(matchup.entrant_1)?,
            entrant_2,
            is_bye: matchup.is_bye(),
            state: detail.state,
            score_1: detail.score_1,
            score_2: detail.score_2,
            winner: detail.winner,
        })
    }

    /// Views for `rows`, ascending by match number.
    pub fn matchups(&mut self, rows: &[(Matchup, MatchDetail)]) -> Result<Vec<MatchupView>, EngineError> {
        let mut views = rows
            .iter()
            .map(|(m, d)| self.matchup(m, d))
            .collect::<Result<Vec<_>, _>>()?;
        views.sort_by_key(|v| v.match_number);
        Ok(views)
    }
}

/// Every matchup of `sport` in `event_id`, grouped by phase.
///
/// Rounds run from the earliest phase holding a matchup through the last provisioned phase,
/// so later rounds appear empty until they are seeded. No matchups means no rounds.
/// Every registered entrant of the sport is listed as assigned once it sits in a matchup.
pub fn bracket_view<S>(store: &S, sport: &Sport, event_id: EventId) -> Result<BracketView, EngineError>
where
    S: BracketStore + PhaseDirectory + EntrantDirectory,
{
    let phases = store.list_phases(event_id)?;
    let rows = store.matchups_for_event(sport.kind, sport.id, event_id)?;
    let placed: HashSet<EntrantId> = rows
        .iter()
        .flat_map(|(m, _)| std::iter::once(m.entrant_1).chain(m.entrant_2))
        .collect();

    let mut by_phase: HashMap<PhaseId, Vec<(Matchup, MatchDetail)>> = HashMap::new();
    for (m, d) in rows {
        if phases.iter().any(|p| p.id == d.phase_id) {
            by_phase.entry(d.phase_id).or_default().push((m, d));
        } else {
            log::warn!("matchup {} sits in unprovisioned phase {}", m.id, d.phase_id);
        }
    }

    let first_order = phases
        .iter()
        .filter(|p| by_phase.contains_key(&p.id))
        .map(|p| p.order)
        .min();

    let mut resolver = NameResolver::new(store, sport);
    let mut rounds = Vec::new();
    let mut total_matches = 0;
    if let Some(first) = first_order {
        for phase in phases.iter().filter(|p| p.order >= first) {
            let mut round = RoundView::empty(phase);
            if let Some(rows) = by_phase.get(&phase.id) {
                round.matches = resolver.matchups(rows)?;
            }
            total_matches += round.matches.len();
            rounds.push(round);
        }
    }

    let roster = store.entrants_for_sport(sport.kind, sport.id)?;
    resolver.prime(&roster)?;
    let mut entrants = Vec::with_capacity(roster.len());
    for e in &roster {
        let status = if placed.contains(&e.id) {
            DrawStatus::Assigned
        } else {
            DrawStatus::Available
        };
        entrants.push(EntrantDraw {
            entrant: resolver.resolve(e.id)?,
            status,
        });
    }
    let assigned = entrants.iter().filter(|d| d.status == DrawStatus::Assigned).count();

    Ok(BracketView {
        sport: sport.clone(),
        event_id,
        rounds,
        total_matches,
        available: entrants.len() - assigned,
        assigned,
        entrants,
    })
}
