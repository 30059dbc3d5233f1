//! GenerationSession and TeamsError.

use crate::logic::build_units;
use crate::models::partition::{Partition, RatingIndex, ScoredPartition};
use crate::models::player::Player;
use crate::models::rating::RecordedResult;
use crate::models::team::{ConfirmedTeams, Jersey, Team, TEAM_SIZE};
use crate::models::unit::MovementUnit;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors from team generation, adjustment and rating updates.
#[derive(Clone, Debug, PartialEq)]
pub enum TeamsError {
    /// Asked for zero options.
    InvalidOptionCount,
    /// Team generation needs exactly ten players.
    WrongPlayerCount { expected: usize, found: usize },
    /// Name not present in the roster.
    UnknownPlayer(String),
    /// A player with this name already exists (case-insensitive).
    DuplicatePlayerName(String),
    /// Player is not on the side the swap expects.
    PlayerNotOnTeam { name: String, team: Team },
    /// A side does not have exactly five players.
    IncompleteTeams,
    /// Same player appears twice in a line-up.
    DuplicatePlayer(String),
    /// Groups must be pairs or trios.
    InvalidGroupSize { size: usize },
    /// Player listed in more than one group.
    DuplicateGroupMember(String),
    /// More groups of this size than the teams can absorb.
    TooManyGroups { size: usize },
    /// No generated option with this index.
    OptionNotFound(usize),
    /// No partition selected for adjustment.
    NothingSelected,
    /// Teams were confirmed; clear them before regenerating.
    AlreadyConfirmed,
    /// Action needs confirmed teams.
    NotConfirmed,
    /// Both teams need a kit before the result is entered.
    JerseysMissing,
    /// The match already has a result.
    ResultAlreadyRecorded,
    /// No result to undo.
    NoResult,
    /// Units changed while options were being generated for them.
    UnitsChanged,
    /// K factor outside the accepted range.
    InvalidKFactor(u32),
    /// Roster file could not be read.
    Roster(String),
}

impl std::fmt::Display for TeamsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamsError::InvalidOptionCount => write!(f, "At least one option must be requested"),
            TeamsError::WrongPlayerCount { expected, found } => {
                write!(f, "Exactly {} players are required (currently {})", expected, found)
            }
            TeamsError::UnknownPlayer(name) => write!(f, "Player '{}' is not in this match", name),
            TeamsError::DuplicatePlayerName(name) => {
                write!(f, "A player named '{}' already exists", name)
            }
            TeamsError::PlayerNotOnTeam { name, team } => {
                write!(f, "Player '{}' is not on {}", name, team)
            }
            TeamsError::IncompleteTeams => write!(f, "Each team must have exactly 5 players"),
            TeamsError::DuplicatePlayer(name) => {
                write!(f, "Player '{}' appears more than once", name)
            }
            TeamsError::InvalidGroupSize { size } => {
                write!(f, "Groups must have 2 or 3 players (got {})", size)
            }
            TeamsError::DuplicateGroupMember(name) => {
                write!(f, "Player '{}' is in more than one group", name)
            }
            TeamsError::TooManyGroups { size } => {
                write!(f, "Too many groups of {} players", size)
            }
            TeamsError::OptionNotFound(idx) => write!(f, "Option {} does not exist", idx + 1),
            TeamsError::NothingSelected => write!(f, "No option selected"),
            TeamsError::AlreadyConfirmed => {
                write!(f, "Teams are already confirmed; clear them first")
            }
            TeamsError::NotConfirmed => write!(f, "Teams have not been confirmed"),
            TeamsError::JerseysMissing => write!(f, "Both teams need a jersey"),
            TeamsError::ResultAlreadyRecorded => {
                write!(f, "A result was already recorded for this match")
            }
            TeamsError::NoResult => write!(f, "No result has been recorded"),
            TeamsError::UnitsChanged => {
                write!(f, "Groups or ratings changed during generation; generate again")
            }
            TeamsError::InvalidKFactor(k) => write!(f, "K factor {} is out of range", k),
            TeamsError::Roster(msg) => write!(f, "Invalid roster: {}", msg),
        }
    }
}

impl std::error::Error for TeamsError {}

/// Players required for one match.
pub const MATCH_PLAYERS: usize = 2 * TEAM_SIZE;

/// Unique identifier for a generation session.
pub type SessionId = Uuid;

/// Everything the operator works on while picking teams for one match.
///
/// The caller keeps this value between interactions; every operation takes it explicitly.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationSession {
    pub id: SessionId,
    pub players: Vec<Player>,
    /// Blocks built from the players' group tags.
    pub units: Vec<MovementUnit>,
    /// Last generated options, best first.
    pub options: Vec<ScoredPartition>,
    /// Option being adjusted before confirmation.
    pub selected: Option<Partition>,
    pub confirmed: Option<ConfirmedTeams>,
    /// Result of the confirmed match; while set the match is closed.
    #[serde(default)]
    pub result: Option<RecordedResult>,
}

impl GenerationSession {
    /// Start a session for exactly ten players with unique names.
    pub fn new(players: Vec<Player>) -> Result<Self, TeamsError> {
        if players.len() != MATCH_PLAYERS {
            return Err(TeamsError::WrongPlayerCount {
                expected: MATCH_PLAYERS,
                found: players.len(),
            });
        }
        for (i, p) in players.iter().enumerate() {
            if players[..i].iter().any(|q| q.name.eq_ignore_ascii_case(&p.name)) {
                return Err(TeamsError::DuplicatePlayerName(p.name.clone()));
            }
        }
        let units = build_units(&players);
        Ok(Self {
            id: Uuid::new_v4(),
            players,
            units,
            options: Vec::new(),
            selected: None,
            confirmed: None,
            result: None,
        })
    }

    pub fn ratings(&self) -> RatingIndex<'_> {
        self.players
            .iter()
            .map(|p| (p.name.as_str(), p.rating))
            .collect()
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    /// Load option `index` for manual adjustment.
    pub fn select(&mut self, index: usize) -> Result<&Partition, TeamsError> {
        let option = self
            .options
            .get(index)
            .ok_or(TeamsError::OptionNotFound(index))?;
        Ok(&*self.selected.insert(option.partition.clone()))
    }

    /// Swap a Team 1 player with a Team 2 player in the selected partition.
    pub fn swap(&mut self, from_team_1: &str, from_team_2: &str) -> Result<&Partition, TeamsError> {
        let current = self.selected.as_ref().ok_or(TeamsError::NothingSelected)?;
        let swapped = current.swap_players(from_team_1, from_team_2)?;
        Ok(&*self.selected.insert(swapped))
    }

    /// Summed ratings of the selected partition (Team 1, Team 2).
    pub fn team_ratings(&self) -> Option<(f64, f64)> {
        self.selected
            .as_ref()
            .map(|p| p.rating_sums(&self.ratings()))
    }

    /// Accept the selected partition. Default kits are handed out and the options dropped.
    pub fn confirm(&mut self) -> Result<&ConfirmedTeams, TeamsError> {
        if self.confirmed.is_some() {
            return Err(TeamsError::AlreadyConfirmed);
        }
        let selected = self.selected.as_ref().ok_or(TeamsError::NothingSelected)?;
        selected.validate()?;
        if let Some(unknown) = selected
            .team(Team::One)
            .chain(selected.team(Team::Two))
            .find(|n| self.player(n).is_none())
        {
            return Err(TeamsError::UnknownPlayer(unknown.to_string()));
        }
        let (rating_1, rating_2) = selected.rating_sums(&self.ratings());
        let teams = ConfirmedTeams {
            team_1: selected.team(Team::One).map(str::to_owned).collect(),
            team_2: selected.team(Team::Two).map(str::to_owned).collect(),
            rating_1,
            rating_2,
            jersey_1: Some(Jersey::default_for(Team::One)),
            jersey_2: Some(Jersey::default_for(Team::Two)),
        };
        self.options.clear();
        self.selected = None;
        Ok(&*self.confirmed.insert(teams))
    }

    /// Drop confirmed teams so new options can be generated.
    ///
    /// A recorded result goes with them; ratings it changed stay as they are.
    pub fn clear_confirmed(&mut self) {
        self.confirmed = None;
        self.result = None;
    }

    /// Players of one confirmed team, in line-up order.
    pub fn confirmed_players(&self, team: Team) -> Result<Vec<Player>, TeamsError> {
        let confirmed = self.confirmed.as_ref().ok_or(TeamsError::NotConfirmed)?;
        confirmed
            .names(team)
            .iter()
            .map(|n| {
                self.player(n)
                    .cloned()
                    .ok_or_else(|| TeamsError::UnknownPlayer(n.clone()))
            })
            .collect()
    }
}
