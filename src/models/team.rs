//! Team sides, jerseys and the confirmed line-up of a match.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Players per side in five-a-side.
pub const TEAM_SIZE: usize = 5;

/// Which side of the match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    #[default]
    One,
    Two,
}

impl Team {
    /// Positions of this team inside a ten-slot partition.
    pub fn slot_range(self) -> Range<usize> {
        match self {
            Team::One => 0..TEAM_SIZE,
            Team::Two => TEAM_SIZE..2 * TEAM_SIZE,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Team::One => Team::Two,
            Team::Two => Team::One,
        }
    }

    /// 1-based number used by the league store.
    pub fn number(self) -> u8 {
        match self {
            Team::One => 1,
            Team::Two => 2,
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Team {}", self.number())
    }
}

/// Kit colour worn by a team.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Jersey {
    Light,
    Dark,
}

impl Jersey {
    /// Team 1 plays in light, Team 2 in dark unless changed.
    pub fn default_for(team: Team) -> Self {
        match team {
            Team::One => Jersey::Light,
            Team::Two => Jersey::Dark,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Jersey::Light => Jersey::Dark,
            Jersey::Dark => Jersey::Light,
        }
    }
}

/// Exchange the kits of the two teams.
///
/// When neither team has a kit, or both wear the same one, the defaults are restored.
/// A team without a kit takes the complement of what the other team wore.
pub fn swap_jerseys(current_1: Option<Jersey>, current_2: Option<Jersey>) -> (Jersey, Jersey) {
    match (current_1, current_2) {
        (None, None) => (Jersey::default_for(Team::One), Jersey::default_for(Team::Two)),
        (Some(a), Some(b)) if a == b => {
            (Jersey::default_for(Team::One), Jersey::default_for(Team::Two))
        }
        (Some(a), Some(b)) => (b, a),
        (Some(a), None) => (a.other(), a),
        (None, Some(b)) => (b, b.other()),
    }
}

/// Line-up accepted by the operator, ready to be written back to the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfirmedTeams {
    pub team_1: Vec<String>,
    pub team_2: Vec<String>,
    pub rating_1: f64,
    pub rating_2: f64,
    pub jersey_1: Option<Jersey>,
    pub jersey_2: Option<Jersey>,
}

impl ConfirmedTeams {
    pub fn names(&self, team: Team) -> &[String] {
        match team {
            Team::One => &self.team_1,
            Team::Two => &self.team_2,
        }
    }

    pub fn team_of(&self, name: &str) -> Option<Team> {
        if self.team_1.iter().any(|n| n == name) {
            Some(Team::One)
        } else if self.team_2.iter().any(|n| n == name) {
            Some(Team::Two)
        } else {
            None
        }
    }

    /// Set or clear one team's kit.
    pub fn set_jersey(&mut self, team: Team, jersey: Option<Jersey>) {
        match team {
            Team::One => self.jersey_1 = jersey,
            Team::Two => self.jersey_2 = jersey,
        }
    }

    pub fn swap_jerseys(&mut self) {
        let (j1, j2) = swap_jerseys(self.jersey_1, self.jersey_2);
        self.jersey_1 = Some(j1);
        self.jersey_2 = Some(j2);
    }
}
