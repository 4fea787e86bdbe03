//! Advancing a completed phase: seed the next phase from its winners, or crown the champion.

use crate::logic::seeding::{pair_in_order, seed_phase};
use crate::logic::view::{EntrantView, MatchupView, NameResolver};
use crate::models::{EngineError, EntrantId, MatchDetail, MatchState, Matchup, Phase, PhaseId, Sport};
use crate::store::{BracketStore, EntrantDirectory, PhaseDirectory};
use serde::Serialize;

/// Outcome of advancing a phase.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Advancement {
    /// Exactly one entrant survived `phase`; nothing was created.
    Champion { champion: EntrantView, phase: Phase },
    /// `next` was seeded with the survivors of `previous`.
    NextPhase {
        previous: Phase,
        next: Phase,
        matches: Vec<MatchupView>,
        /// Entrants carried into `next`.
        carried_entrants: usize,
    },
}

enum Step {
    Champion(EntrantId),
    Seeded {
        next: Phase,
        created: Vec<(Matchup, MatchDetail)>,
        carried: usize,
    },
}

/// Winners of a phase's finished matchups (byes included), ascending by match number.
///
/// This order keeps the tree shape: the winners of matches 1 and 2 meet next, and so on.
pub fn advancing_entrants(rows: &[(Matchup, MatchDetail)]) -> Vec<EntrantId> {
    let mut finished: Vec<(u32, EntrantId)> = rows
        .iter()
        .filter(|(_, d)| d.state == MatchState::Finished)
        .filter_map(|(m, d)| d.winner.map(|w| (m.match_number, w)))
        .collect();
    finished.sort_by_key(|&(number, _)| number);
    finished.into_iter().map(|(_, w)| w).collect()
}

/// Advance `phase_id` for `sport`.
///
/// Fails with `MatchesPending` while any matchup of the phase is unfinished and with
/// `NoAdvancers` if the finished phase yields nobody. One survivor is the champion; otherwise
/// the survivors are paired in order into the next provisioned phase (odd one out gets a bye).
/// All reads and writes happen in one transaction.
pub fn advance_round<S>(store: &S, sport: &Sport, phase_id: PhaseId) -> Result<Advancement, EngineError>
where
    S: BracketStore + PhaseDirectory + EntrantDirectory,
{
    let phase = store
        .phase(phase_id)?
        .ok_or(EngineError::UnknownPhase(phase_id))?;

    let step = store.transaction(|tx| {
        let rows = tx.matchups_in_phase(sport.kind, sport.id, phase.id)?;

        let pending = rows.iter().filter(|(_, d)| !d.is_finished()).count();
        if pending > 0 {
            return Err(EngineError::MatchesPending { pending });
        }

        let advancing = advancing_entrants(&rows);
        match advancing.as_slice() {
            [] => {
                log::warn!(
                    "sport {}: phase {} is complete but has no winners",
                    sport.id,
                    phase.id
                );
                Err(EngineError::NoAdvancers { phase_id: phase.id })
            }
            [champion] => Ok(Step::Champion(*champion)),
            _ => {
                let next = store
                    .next_phase(phase.event_id, phase.order)?
                    .ok_or(EngineError::NoNextPhase {
                        phase_id: phase.id,
                        order: phase.order,
                    })?;
                let slots = pair_in_order(&advancing);
                let created = seed_phase(tx, sport, phase.event_id, next.id, &slots)?;
                Ok(Step::Seeded {
                    next,
                    created,
                    carried: advancing.len(),
                })
            }
        }
    })?;

    let mut resolver = NameResolver::new(store, sport);
    match step {
        Step::Champion(id) => {
            let champion = resolver.resolve(id)?;
            log::info!(
                "sport {}: {} wins after phase {}",
                sport.id,
                champion.name,
                phase.name
            );
            Ok(Advancement::Champion { champion, phase })
        }
        Step::Seeded {
            next,
            created,
            carried,
        } => {
            log::info!(
                "sport {}: advanced {} entrant(s) from {} to {}",
                sport.id,
                carried,
                phase.name,
                next.name
            );
            let matches = resolver.matchups(&created)?;
            Ok(Advancement::NextPhase {
                previous: phase,
                next,
                matches,
                carried_entrants: carried,
            })
        }
    }
}
