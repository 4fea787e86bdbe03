//! Bracket shape from an entrant count.

use serde::{Deserialize, Serialize};

/// Size, depth and first-round layout of a single-elimination bracket.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketStructure {
    pub entrant_count: usize,
    /// Smallest power of two holding every entrant.
    pub bracket_size: usize,
    pub total_rounds: u32,
    pub bye_count: usize,
    /// Entrants that actually play in round 1 (even for two or more entrants).
    pub round1_entrant_count: usize,
    pub round1_match_count: usize,
    /// Phase order where round 1 is played. Negative when the ladder is too short.
    pub starting_phase_order: i64,
}

/// Compute the bracket shape for `entrant_count` entrants (at least 1) against a ladder
/// whose final sits at `max_phase_order`.
pub fn calculate_structure(entrant_count: usize, max_phase_order: u32) -> BracketStructure {
    let bracket_size = entrant_count.max(1).next_power_of_two();
    let total_rounds = bracket_size.trailing_zeros();
    let bye_count = bracket_size - entrant_count;
    let round1_entrant_count = entrant_count.saturating_sub(bye_count);
    BracketStructure {
        entrant_count,
        bracket_size,
        total_rounds,
        bye_count,
        round1_entrant_count,
        round1_match_count: round1_entrant_count / 2,
        starting_phase_order: i64::from(max_phase_order) - (i64::from(total_rounds) - 1),
    }
}
