//! Round 1 of a bracket: structure, random draw, byes, and the first phase's matchups.

use crate::config::EngineConfig;
use crate::logic::seeding::{pair_in_order, seed_phase};
use crate::logic::shuffle::shuffle_entrants;
use crate::logic::structure::{calculate_structure, BracketStructure};
use crate::logic::view::{NameResolver, RoundView};
use crate::models::{EngineError, Entrant, EntrantId, EventId, Matchup, Phase, Sport};
use crate::store::{BracketStore, EntrantDirectory, PhaseDirectory};
use rand::Rng;
use serde::Serialize;

/// Result of generating a bracket: its shape, where it starts, and the populated first round.
#[derive(Clone, Debug, Serialize)]
pub struct GeneratedBracket {
    pub sport: Sport,
    pub event_id: EventId,
    pub structure: BracketStructure,
    pub starting_phase: Phase,
    /// Matchups created for round 1, in match-number order.
    pub matchups: Vec<Matchup>,
    /// Phases from the starting order onward; only the first holds matches.
    pub rounds: Vec<RoundView>,
}

/// Generate round 1 for `sport` in `event_id`.
///
/// 1. Reject fewer than the sport's minimum entrants.
/// 2. Compute the structure and look up the starting phase.
/// 3. Shuffle; the first `bye_count` entrants get byes, the rest play in consecutive pairs.
/// 4. Create ordinary matchups (numbered 1..) then one bye matchup each, in one transaction.
///    A sport that already has a bracket in the event, or an entrant already placed, is rejected.
pub fn generate_bracket<S, R>(
    store: &S,
    config: &EngineConfig,
    sport: &Sport,
    event_id: EventId,
    entrants: &[Entrant],
    rng: &mut R,
) -> Result<GeneratedBracket, EngineError>
where
    S: BracketStore + PhaseDirectory + EntrantDirectory,
    R: Rng + ?Sized,
{
    let required = sport.min_entrants.max(config.min_entrants);
    if entrants.len() < required {
        return Err(EngineError::InsufficientEntrants {
            required,
            received: entrants.len(),
        });
    }

    let structure = calculate_structure(entrants.len(), config.max_phase_order);
    let starting_order = match u32::try_from(structure.starting_phase_order) {
        Ok(order) => order,
        Err(_) => {
            log::warn!(
                "sport {}: {} entrants need {} rounds, more than the phase ladder holds",
                sport.id,
                entrants.len(),
                structure.total_rounds
            );
            return Err(EngineError::BracketTooDeep {
                entrants: entrants.len(),
                starting_order: structure.starting_phase_order,
            });
        }
    };
    let starting_phase = store
        .find_phase(event_id, starting_order)?
        .ok_or(EngineError::PhaseNotFound {
            event_id,
            order: starting_order,
        })?;

    let drawn = shuffle_entrants(entrants, rng);
    let (byes, players) = drawn.split_at(structure.bye_count);
    let player_ids: Vec<EntrantId> = players.iter().map(|e| e.id).collect();

    let mut slots = pair_in_order(&player_ids);
    slots.extend(byes.iter().map(|e| (e.id, None)));

    let created = store.transaction(|tx| {
        let placed = tx.matchups_in_event(sport.kind, event_id)?;
        if placed.iter().any(|(m, _)| m.sport_id == sport.id) {
            return Err(EngineError::BracketExists {
                sport_id: sport.id,
                event_id,
            });
        }
        if let Some(id) = entrants
            .iter()
            .map(|e| e.id)
            .find(|&id| placed.iter().any(|(m, _)| m.involves(id)))
        {
            return Err(EngineError::EntrantAlreadyPlaced(id));
        }
        seed_phase(tx, sport, event_id, starting_phase.id, &slots)
    })?;

    log::info!(
        "sport {}: bracket of {} generated at phase {} ({} matches, {} byes)",
        sport.id,
        entrants.len(),
        starting_phase.name,
        structure.round1_match_count,
        structure.bye_count
    );

    let mut resolver = NameResolver::new(store, sport);
    resolver.prime(entrants)?;
    let first_round = resolver.matchups(&created)?;

    let rounds = store
        .list_phases(event_id)?
        .iter()
        .filter(|p| p.order >= starting_order)
        .map(|p| {
            let mut round = RoundView::empty(p);
            if p.id == starting_phase.id {
                round.matches = first_round.clone();
            }
            round
        })
        .collect();

    Ok(GeneratedBracket {
        sport: sport.clone(),
        event_id,
        structure,
        starting_phase,
        matchups: created.into_iter().map(|(m, _)| m).collect(),
        rounds,
    })
}
