//! Configuration: engine constants, the provisioned phase ladder, sports, and server settings.
//!
//! Loaded from a TOML file; every field has a default so an empty or missing file works.

use crate::models::{EntrantKind, EventId, Phase, PhaseId, Sport, SportId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Bracket engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Order of the final phase; round 1 starts `total_rounds - 1` orders below it.
    #[serde(default = "default_max_phase_order")]
    pub max_phase_order: u32,

    /// Only matches finished in this phase award standings points.
    #[serde(default = "default_final_phase_id")]
    pub final_phase_id: PhaseId,

    #[serde(default = "default_min_entrants")]
    pub min_entrants: usize,

    #[serde(default = "default_winner_bonus")]
    pub winner_bonus: i32,

    #[serde(default = "default_loser_bonus")]
    pub loser_bonus: i32,
}

fn default_max_phase_order() -> u32 {
    4
}

fn default_final_phase_id() -> PhaseId {
    5
}

fn default_min_entrants() -> usize {
    4
}

fn default_winner_bonus() -> i32 {
    50
}

fn default_loser_bonus() -> i32 {
    30
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_phase_order: default_max_phase_order(),
            final_phase_id: default_final_phase_id(),
            min_entrants: default_min_entrants(),
            winner_bonus: default_winner_bonus(),
            loser_bonus: default_loser_bonus(),
        }
    }
}

/// One provisioned phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseConfig {
    pub id: PhaseId,
    pub name: String,
    pub order: u32,
}

/// The event and its phase ladder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    #[serde(default = "default_event_id")]
    pub id: EventId,

    #[serde(default = "default_phases")]
    pub phases: Vec<PhaseConfig>,
}

fn default_event_id() -> EventId {
    2
}

fn default_phases() -> Vec<PhaseConfig> {
    ["Round of 32", "Round of 16", "Quarterfinals", "Semifinals", "Final"]
        .iter()
        .zip(0u32..)
        .map(|(name, order)| PhaseConfig {
            id: PhaseId::from(order) + 1,
            name: name.to_string(),
            order,
        })
        .collect()
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            id: default_event_id(),
            phases: default_phases(),
        }
    }
}

/// A sport and how its bracket is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SportConfig {
    pub id: SportId,
    pub name: String,
    #[serde(default)]
    pub kind: EntrantKind,
    /// Overrides `engine.min_entrants` when larger.
    #[serde(default)]
    pub min_entrants: Option<usize>,
    #[serde(default)]
    pub representative_names: bool,
}

fn default_sports() -> Vec<SportConfig> {
    let sport = |id, name: &str, kind| SportConfig {
        id,
        name: name.to_string(),
        kind,
        min_entrants: None,
        representative_names: false,
    };
    vec![
        sport(1, "Futsal", EntrantKind::Team),
        sport(2, "Basketball", EntrantKind::Team),
        sport(3, "Volleyball", EntrantKind::Team),
        sport(4, "Chess", EntrantKind::Player),
    ]
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Requests allowed on the public standings endpoint per window.
    #[serde(default = "default_standings_rate_limit")]
    pub standings_rate_limit: u32,

    #[serde(default = "default_standings_rate_window_secs")]
    pub standings_rate_window_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_standings_rate_limit() -> u32 {
    100
}

fn default_standings_rate_window_secs() -> u64 {
    5 * 60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            standings_rate_limit: default_standings_rate_limit(),
            standings_rate_window_secs: default_standings_rate_window_secs(),
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub event: EventConfig,

    #[serde(default = "default_sports")]
    pub sports: Vec<SportConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            engine: EngineConfig::default(),
            event: EventConfig::default(),
            sports: default_sports(),
        }
    }
}

impl AppConfig {
    /// Load and validate from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("{} not found, using default configuration", path.display());
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// `HOST` and `PORT` take precedence over the file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("HOST") {
            self.server.host = host;
        }
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut orders = HashSet::new();
        let mut ids = HashSet::new();
        for p in &self.event.phases {
            if !orders.insert(p.order) {
                return Err(ConfigError::Invalid(format!("duplicate phase order {}", p.order)));
            }
            if !ids.insert(p.id) {
                return Err(ConfigError::Invalid(format!("duplicate phase id {}", p.id)));
            }
        }
        if !orders.contains(&self.engine.max_phase_order) {
            return Err(ConfigError::Invalid(format!(
                "no phase at max_phase_order {}",
                self.engine.max_phase_order
            )));
        }
        if !ids.contains(&self.engine.final_phase_id) {
            return Err(ConfigError::Invalid(format!(
                "final_phase_id {} is not a provisioned phase",
                self.engine.final_phase_id
            )));
        }
        let mut sport_ids = HashSet::new();
        for s in &self.sports {
            if !sport_ids.insert(s.id) {
                return Err(ConfigError::Invalid(format!("duplicate sport id {}", s.id)));
            }
        }
        Ok(())
    }

    /// The phase ladder as engine phases.
    pub fn phases(&self) -> Vec<Phase> {
        self.event
            .phases
            .iter()
            .map(|p| Phase::new(p.id, self.event.id, p.name.clone(), p.order))
            .collect()
    }

    pub fn sport(&self, id: SportId) -> Option<Sport> {
        self.sports.iter().find(|s| s.id == id).map(|s| Sport {
            id: s.id,
            name: s.name.clone(),
            kind: s.kind,
            min_entrants: s.min_entrants.unwrap_or(self.engine.min_entrants),
            representative_names: s.representative_names,
        })
    }

    pub fn sports(&self) -> Vec<Sport> {
        self.sports.iter().filter_map(|s| self.sport(s.id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(config.phases().len(), 5);
        assert_eq!(config.phases()[4].id, config.engine.final_phase_id);
        assert_eq!(config.sport(4).map(|s| s.kind), Some(EntrantKind::Player));
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.engine.max_phase_order, 4);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.sports.len(), 4);
    }

    #[test]
    fn deeper_ladder_from_toml() {
        let config = AppConfig::from_toml(
            r#"
            [engine]
            max_phase_order = 5
            final_phase_id = 60

            [event]
            id = 7
            phases = [
                { id = 10, name = "R64", order = 0 },
                { id = 20, name = "R32", order = 1 },
                { id = 30, name = "R16", order = 2 },
                { id = 40, name = "QF", order = 3 },
                { id = 50, name = "SF", order = 4 },
                { id = 60, name = "F", order = 5 },
            ]

            [[sports]]
            id = 9
            name = "Chess (teams)"
            kind = "team"
            min_entrants = 6
            representative_names = true
            "#,
        )
        .unwrap();
        let sport = config.sport(9).unwrap();
        assert_eq!(sport.min_entrants, 6);
        assert!(sport.representative_names);
        assert!(config.phases().iter().all(|p| p.event_id == 7));
    }

    #[test]
    fn final_phase_must_be_provisioned() {
        let err = AppConfig::from_toml("[engine]\nfinal_phase_id = 99\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn duplicate_orders_are_rejected() {
        let err = AppConfig::from_toml(
            r#"
            [event]
            phases = [
                { id = 1, name = "A", order = 4 },
                { id = 5, name = "B", order = 4 },
            ]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
