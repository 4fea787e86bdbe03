//! Multi-sport bracket engine: library with models, store, and business logic.

pub mod config;
pub mod logic;
pub mod models;
pub mod ratelimit;
pub mod store;

pub use config::{AppConfig, ConfigError, EngineConfig};
pub use logic::{
    advance_round, advancing_entrants, amend_result, bracket_view, calculate_structure,
    finish_match, generate_bracket, shuffle_entrants, standings, start_match, update_match,
    write_standings_csv, Advancement, BracketStructure, BracketView, DetailUpdate, DrawStatus,
    EntrantDraw, EntrantView, Finalized, GeneratedBracket, MatchupView, NameResolver, RoundView,
    ScoringPolicy, StandingRow, TargetState,
};
pub use models::{
    DetailId, EngineError, Entrant, EntrantId, EntrantKind, EventId, HistoryRecord, MatchDetail,
    MatchState, Matchup, MatchupId, Outcome, Phase, PhaseId, RegistrationCategory, Sport, SportId,
};
pub use ratelimit::WindowLimiter;
pub use store::{BracketStore, BracketTx, EntrantDirectory, MemoryStore, PhaseDirectory};
