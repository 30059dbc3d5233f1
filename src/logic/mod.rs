//! Team generation logic: units, search, options, ratings.

mod blocks;
mod options;
mod rating;
mod roster;
mod search;
mod session;

pub use blocks::{assign_groups, build_units};
pub use options::{generate_options, rating_index, swap_units};
pub use rating::{
    apply_rating_changes, expected_score, k_factor, rate_match, revert_rating_changes, update_pair,
    DEFAULT_K, K_RANGE,
};
pub use roster::read_roster;
pub use search::{attempt_partition, search_best, Attempt, SearchConfig, GOOD_ENOUGH_GAP};
pub use session::{
    generate_session_options, record_session_result, regroup_session, store_session_options,
    undo_session_result,
};
