//! Player records as supplied by the roster provider.

use serde::{Deserialize, Serialize};

/// Identifier of a player in the league store.
pub type PlayerId = i64;

/// Rating given to players that have no ELO yet.
pub const DEFAULT_RATING: f64 = 1000.0;

fn default_rating() -> f64 {
    DEFAULT_RATING
}

/// A confirmed player for one match: read-only snapshot of the live rating.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Display name, unique within the league.
    pub name: String,
    #[serde(default = "default_rating")]
    pub rating: f64,
    /// Players sharing a tag must end up on the same team.
    #[serde(default)]
    pub group: Option<String>,
}

impl Player {
    /// Create an ungrouped player.
    pub fn new(id: PlayerId, name: impl Into<String>, rating: f64) -> Self {
        Self {
            id,
            name: name.into(),
            rating,
            group: None,
        }
    }

    /// Same player, tagged into a group. An empty tag means ungrouped.
    pub fn with_group(mut self, tag: impl Into<String>) -> Self {
        self.set_group(Some(tag.into()));
        self
    }

    pub fn set_group(&mut self, tag: Option<String>) {
        self.group = tag.filter(|t| !t.trim().is_empty());
    }

    /// Group tag, if the player is grouped (blank tags count as none).
    pub fn group_tag(&self) -> Option<&str> {
        self.group.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}
