//! Bracket engine: structure, seeding, advancement, match finalization, presentation.

mod advance;
mod finalize;
mod generate;
mod scoring;
mod seeding;
mod shuffle;
mod standings;
mod structure;
mod view;

pub use advance::{advance_round, advancing_entrants, Advancement};
pub use finalize::{
    amend_result, finish_match, start_match, update_match, DetailUpdate, Finalized, TargetState,
};
pub use generate::{generate_bracket, GeneratedBracket};
pub use scoring::ScoringPolicy;
pub use shuffle::shuffle_entrants;
pub use standings::{standings, write_standings_csv, StandingRow};
pub use structure::{calculate_structure, BracketStructure};
pub use view::{
    bracket_view, BracketView, DrawStatus, EntrantDraw, EntrantView, MatchupView, NameResolver,
    RoundView,
};
