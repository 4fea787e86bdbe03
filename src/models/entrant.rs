//! Entrant (team or player), Sport and registration category.

use serde::{Deserialize, Serialize};

/// Identifier of an entrant (team or player), unique within its kind.
pub type EntrantId = u64;

/// Identifier of a sport.
pub type SportId = u64;

/// Whether a sport's bracket is made of teams or of individual players.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrantKind {
    #[default]
    Team,
    Player,
}

/// How the entrant registered. Additional registrations never earn standings points.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationCategory {
    #[default]
    Regular,
    Additional,
}

/// A sport as seen by the engine: which entrant kind it brackets and its validation thresholds.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Sport {
    pub id: SportId,
    pub name: String,
    pub kind: EntrantKind,
    /// Fewer entrants than this cannot be bracketed.
    pub min_entrants: usize,
    /// Team-kind sports whose teams are a single player show the player's name instead of the team's.
    pub representative_names: bool,
}

/// A validated competitor, supplied by the registration side of the portal.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Entrant {
    pub id: EntrantId,
    pub kind: EntrantKind,
    pub name: String,
    pub sport_id: SportId,
    /// Academic cycle / division label shown next to the name.
    #[serde(default)]
    pub cycle: Option<String>,
    #[serde(default)]
    pub category: RegistrationCategory,
}

impl Entrant {
    /// Create a regular entrant with no cycle label.
    pub fn new(id: EntrantId, kind: EntrantKind, name: impl Into<String>, sport_id: SportId) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            sport_id,
            cycle: None,
            category: RegistrationCategory::Regular,
        }
    }

    pub fn with_cycle(mut self, cycle: impl Into<String>) -> Self {
        self.cycle = Some(cycle.into());
        self
    }

    pub fn with_category(mut self, category: RegistrationCategory) -> Self {
        self.category = category;
        self
    }
}
