//! Standings points awarded when a match finishes.

use crate::config::EngineConfig;
use crate::models::{Outcome, PhaseId, RegistrationCategory};

/// Points policy: only the final phase awards points, and never to additional registrations.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScoringPolicy {
    pub final_phase_id: PhaseId,
    pub winner_bonus: i32,
    pub loser_bonus: i32,
}

impl ScoringPolicy {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            final_phase_id: config.final_phase_id,
            winner_bonus: config.winner_bonus,
            loser_bonus: config.loser_bonus,
        }
    }

    pub fn points(&self, category: RegistrationCategory, phase_id: PhaseId, outcome: Outcome) -> i32 {
        if category == RegistrationCategory::Additional || phase_id != self.final_phase_id {
            return 0;
        }
        match outcome {
            Outcome::Won => self.winner_bonus,
            Outcome::Lost => self.loser_bonus,
        }
    }
}
