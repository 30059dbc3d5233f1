//! Randomised greedy search for balanced teams.

use crate::models::{MovementUnit, Partition, Player, ScoredPartition, TEAM_SIZE};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Rating gap at which a search stops looking for something better.
pub const GOOD_ENOUGH_GAP: f64 = 20.0;

/// Budgets for option generation. All loops in the engine are capped by these.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Shuffles tried by each `search_best` call.
    pub attempts_per_search: usize,
    /// `search_best` calls before falling back to swaps.
    pub max_searches: usize,
    /// Seed of search `i` is `base_seed + i * seed_stride`.
    pub base_seed: u64,
    pub seed_stride: u64,
    /// Single-swap tries on already found options.
    pub max_swap_attempts: usize,
    /// Rounds of chained swaps from the newest option.
    pub max_chained_rounds: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            attempts_per_search: 3000,
            max_searches: 180,
            base_seed: 11,
            seed_stride: 13,
            max_swap_attempts: 50,
            max_chained_rounds: 50,
        }
    }
}

/// Outcome of one greedy pass.
#[derive(Clone, Debug)]
pub struct Attempt<'a> {
    pub team_1: Vec<&'a Player>,
    pub team_2: Vec<&'a Player>,
    pub sum_1: f64,
    pub sum_2: f64,
}

impl Attempt<'_> {
    /// Absolute rating gap.
    pub fn score(&self) -> f64 {
        (self.sum_1 - self.sum_2).abs()
    }

    /// Ten-slot view; players past the fifth on a side are left out.
    pub fn to_partition(&self) -> Partition {
        Partition::from_teams(
            self.team_1.iter().map(|p| p.name.as_str()),
            self.team_2.iter().map(|p| p.name.as_str()),
        )
    }
}

/// Assign units greedily in the given order.
///
/// A unit goes to Team 1 when it fits there and Team 1 is not ahead on rating (or Team 2
/// has no room for it); otherwise to Team 2. Nothing is rejected: with oversized units or
/// a roster other than ten, Team 2 may overflow or a side may come out short.
/// Indices outside `units` are skipped.
pub fn attempt_partition<'a>(units: &'a [MovementUnit], order: &[usize]) -> Attempt<'a> {
    let mut attempt = Attempt {
        team_1: Vec::with_capacity(TEAM_SIZE),
        team_2: Vec::with_capacity(TEAM_SIZE),
        sum_1: 0.0,
        sum_2: 0.0,
    };
    for unit in order.iter().filter_map(|&i| units.get(i)) {
        let size = unit.size();
        let fits_1 = attempt.team_1.len() + size <= TEAM_SIZE;
        let fits_2 = attempt.team_2.len() + size <= TEAM_SIZE;
        if fits_1 && (attempt.sum_1 <= attempt.sum_2 || !fits_2) {
            attempt.team_1.extend(unit.members.iter());
            attempt.sum_1 += unit.total_rating();
        } else {
            attempt.team_2.extend(unit.members.iter());
            attempt.sum_2 += unit.total_rating();
        }
    }
    attempt
}

/// Best partition over `attempts` random unit orders.
///
/// The generator is seeded from `seed` alone, so equal arguments give equal results.
/// Stops early at a gap of [`GOOD_ENOUGH_GAP`] or less. `None` when there is nothing to
/// search (no units or no attempts).
pub fn search_best(units: &[MovementUnit], attempts: usize, seed: u64) -> Option<ScoredPartition> {
    if units.is_empty() {
        return None;
    }
    let mut rng = StdRng::seed_from_u64(seed.wrapping_mul(97).wrapping_add(3));
    let mut order: Vec<usize> = (0..units.len()).collect();
    let mut best: Option<ScoredPartition> = None;

    for _ in 0..attempts {
        order.shuffle(&mut rng);
        let attempt = attempt_partition(units, &order);
        let score = attempt.score();
        if best.as_ref().map_or(true, |b| score < b.score) {
            best = Some(ScoredPartition {
                partition: attempt.to_partition(),
                score,
            });
            if score <= GOOD_ENOUGH_GAP {
                break;
            }
        }
    }
    if let Some(b) = &best {
        log::debug!("search seed {} settled on gap {}", seed, b.score);
    }
    best
}
