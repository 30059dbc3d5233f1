//! Club league team builder: library with models and team generation logic.

pub mod logic;
pub mod models;

pub use logic::{
    apply_rating_changes, assign_groups, attempt_partition, build_units, expected_score,
    generate_options, generate_session_options, k_factor, rate_match, rating_index, read_roster,
    record_session_result, regroup_session, revert_rating_changes, search_best, store_session_options,
    swap_units, undo_session_result, update_pair, Attempt, SearchConfig, DEFAULT_K, GOOD_ENOUGH_GAP, K_RANGE,
};
pub use models::{
    swap_jerseys, ConfirmedTeams, GenerationSession, Jersey, MatchKind, MatchReport, MovementUnit,
    Partition, Player, PlayerId, RatingChange, RatingIndex, RecordedResult, ScoredPartition, SeenTeams,
    SessionId, Signature, Team, TeamsError, DEFAULT_RATING, MATCH_PLAYERS, PARTITION_SLOTS, TEAM_SIZE,
};
