//! Round creation shared by bracket generation and advancement.

use crate::models::{
    EngineError, EntrantId, EventId, MatchDetail, Matchup, PhaseId, Sport,
};
use crate::store::BracketTx;

/// One slot of a round: two entrants, or a lone entrant that receives a bye.
pub(crate) type Slot = (EntrantId, Option<EntrantId>);

/// Pair entrants in order (0&1, 2&3, ...). An odd entrant out gets a bye.
pub(crate) fn pair_in_order(entrants: &[EntrantId]) -> Vec<Slot> {
    entrants
        .chunks(2)
        .map(|pair| (pair[0], pair.get(1).copied()))
        .collect()
}

/// Create one matchup and detail per slot, numbered 1.. in slot order.
/// Ordinary slots start `Pending`; byes are created `Finished` with entrant 1 as winner.
pub(crate) fn seed_phase(
    tx: &mut dyn BracketTx,
    sport: &Sport,
    event_id: EventId,
    phase_id: PhaseId,
    slots: &[Slot],
) -> Result<Vec<(Matchup, MatchDetail)>, EngineError> {
    let mut created = Vec::with_capacity(slots.len());
    for (number, &(entrant_1, entrant_2)) in (1u32..).zip(slots) {
        let matchup = Matchup::new(sport.kind, sport.id, event_id, number, entrant_1, entrant_2);
        let detail = if matchup.is_bye() {
            MatchDetail::bye(&matchup, phase_id)
        } else {
            MatchDetail::pending(&matchup, phase_id)
        };
        log::debug!(
            "phase {}: match {} {} vs {:?}",
            phase_id,
            number,
            entrant_1,
            entrant_2
        );
        tx.insert_matchup(matchup.clone())?;
        tx.insert_detail(sport.kind, detail.clone())?;
        created.push((matchup, detail));
    }
    Ok(created)
}
