//! Data structures for team generation: players, units, partitions, sessions.

mod partition;
mod player;
mod rating;
mod session;
mod team;
mod unit;

pub use partition::{Partition, RatingIndex, ScoredPartition, SeenTeams, Signature, PARTITION_SLOTS};
pub use player::{Player, PlayerId, DEFAULT_RATING};
pub use rating::{MatchKind, MatchReport, RatingChange, RecordedResult};
pub use session::{GenerationSession, SessionId, TeamsError, MATCH_PLAYERS};
pub use team::{swap_jerseys, ConfirmedTeams, Jersey, Team, TEAM_SIZE};
pub use unit::MovementUnit;
