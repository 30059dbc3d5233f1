//! Ten-slot team assignments and their signatures.

use crate::models::session::TeamsError;
use crate::models::team::{Team, TEAM_SIZE};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Total slots in a partition: Team 1 first, then Team 2.
pub const PARTITION_SLOTS: usize = 2 * TEAM_SIZE;

/// Rating of each player by name, used to score partitions.
pub type RatingIndex<'a> = HashMap<&'a str, f64>;

/// Split of the match players into two teams.
///
/// Slots 0..5 are Team 1 and 5..10 are Team 2. An empty slot means the team
/// came out short; such partitions must not be confirmed.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    slots: [Option<String>; PARTITION_SLOTS],
}

/// Membership of both teams, ignoring slot order.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Signature {
    pub team_1: BTreeSet<String>,
    pub team_2: BTreeSet<String>,
}

/// A partition with its rating gap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredPartition {
    pub partition: Partition,
    /// Gap of the greedy pass that produced the partition, counting every player it
    /// placed. When a side overflowed, the partition keeps only five of them and
    /// `Partition::score` can differ; such partitions fail `validate`.
    pub score: f64,
}

impl Partition {
    /// Build from two name lists. Names beyond five per side are dropped.
    pub fn from_teams<I1, I2, S1, S2>(team_1: I1, team_2: I2) -> Self
    where
        I1: IntoIterator<Item = S1>,
        I2: IntoIterator<Item = S2>,
        S1: Into<String>,
        S2: Into<String>,
    {
        let mut partition = Self::default();
        for (slot, name) in partition.slots[Team::One.slot_range()].iter_mut().zip(team_1) {
            *slot = Some(name.into());
        }
        for (slot, name) in partition.slots[Team::Two.slot_range()].iter_mut().zip(team_2) {
            *slot = Some(name.into());
        }
        partition
    }

    pub fn slots(&self) -> &[Option<String>] {
        &self.slots
    }

    /// Names on one team, in slot order, skipping empty slots.
    pub fn team(&self, team: Team) -> impl Iterator<Item = &str> + '_ {
        self.slots[team.slot_range()]
            .iter()
            .filter_map(|s| s.as_deref())
            .filter(|n| !n.is_empty())
    }

    pub fn team_len(&self, team: Team) -> usize {
        self.team(team).count()
    }

    pub fn team_of(&self, name: &str) -> Option<Team> {
        let idx = self.position(name)?;
        if Team::One.slot_range().contains(&idx) {
            Some(Team::One)
        } else {
            Some(Team::Two)
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.as_deref() == Some(name))
    }

    pub fn signature(&self) -> Signature {
        Signature {
            team_1: self.team(Team::One).map(str::to_owned).collect(),
            team_2: self.team(Team::Two).map(str::to_owned).collect(),
        }
    }

    /// Exchange `from_team_1` (on Team 1) with `from_team_2` (on Team 2).
    ///
    /// Each player lands in the other's slot; every other slot is untouched.
    pub fn swap_players(&self, from_team_1: &str, from_team_2: &str) -> Result<Self, TeamsError> {
        let i1 = self
            .position(from_team_1)
            .filter(|i| Team::One.slot_range().contains(i))
            .ok_or_else(|| TeamsError::PlayerNotOnTeam {
                name: from_team_1.to_string(),
                team: Team::One,
            })?;
        let i2 = self
            .position(from_team_2)
            .filter(|i| Team::Two.slot_range().contains(i))
            .ok_or_else(|| TeamsError::PlayerNotOnTeam {
                name: from_team_2.to_string(),
                team: Team::Two,
            })?;
        let mut swapped = self.clone();
        swapped.slots.swap(i1, i2);
        Ok(swapped)
    }

    /// Exactly five named players per side and no name twice.
    pub fn validate(&self) -> Result<(), TeamsError> {
        if self.team_len(Team::One) != TEAM_SIZE || self.team_len(Team::Two) != TEAM_SIZE {
            return Err(TeamsError::IncompleteTeams);
        }
        let mut seen = HashSet::new();
        for name in self.team(Team::One).chain(self.team(Team::Two)) {
            if !seen.insert(name) {
                return Err(TeamsError::DuplicatePlayer(name.to_string()));
            }
        }
        Ok(())
    }

    /// Summed ratings of both teams. Unknown names count as zero.
    pub fn rating_sums(&self, ratings: &RatingIndex<'_>) -> (f64, f64) {
        let sum = |team: Team| -> f64 {
            self.team(team)
                .map(|n| ratings.get(n).copied().unwrap_or(0.0))
                .sum()
        };
        (sum(Team::One), sum(Team::Two))
    }

    /// Absolute rating gap between the teams.
    pub fn score(&self, ratings: &RatingIndex<'_>) -> f64 {
        let (s1, s2) = self.rating_sums(ratings);
        (s1 - s2).abs()
    }
}

/// Team rosters already handed out; a new partition must reuse neither of them.
#[derive(Debug, Default)]
pub struct SeenTeams(HashSet<BTreeSet<String>>);

impl SeenTeams {
    /// Record the partition's teams if both are new. Returns whether it was accepted.
    pub fn insert(&mut self, partition: &Partition) -> bool {
        let Signature { team_1, team_2 } = partition.signature();
        if self.0.contains(&team_1) || self.0.contains(&team_2) {
            return false;
        }
        self.0.insert(team_1);
        self.0.insert(team_2);
        true
    }
}
