//! Movement units: players that must be placed on the same team.

use crate::models::player::Player;
use serde::{Deserialize, Serialize};

/// A pair, trio or singleton that moves between teams as one block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovementUnit {
    pub members: Vec<Player>,
}

impl MovementUnit {
    pub fn new(members: Vec<Player>) -> Self {
        Self { members }
    }

    pub fn single(player: Player) -> Self {
        Self {
            members: vec![player],
        }
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Sum of the members' ratings.
    pub fn total_rating(&self) -> f64 {
        self.members.iter().map(|p| p.rating).sum()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|p| p.name == name)
    }
}
