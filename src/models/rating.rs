//! Match reports and the rating history they produce.

use crate::models::player::PlayerId;
use crate::models::team::Team;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Official matches move ratings; friendlies only record the result.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    #[default]
    Official,
    Friendly,
}

/// Result entered after the match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    /// None for a draw.
    pub winner: Option<Team>,
    #[serde(default)]
    pub goal_difference: u32,
    #[serde(default)]
    pub kind: MatchKind,
}

/// One row of a player's rating history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RatingChange {
    pub player_id: PlayerId,
    pub name: String,
    pub team: Team,
    pub rating_before: f64,
    pub rating_after: f64,
    pub recorded_at: DateTime<Utc>,
}

impl RatingChange {
    pub fn delta(&self) -> f64 {
        self.rating_after - self.rating_before
    }
}

/// A result entered for a session's confirmed teams. Kept so it can be undone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedResult {
    pub report: MatchReport,
    /// Empty for friendlies.
    pub changes: Vec<RatingChange>,
}
