//! Assembling several distinct balanced options for the operator to choose from.

use crate::logic::search::{search_best, SearchConfig};
use crate::models::{MovementUnit, Partition, RatingIndex, ScoredPartition, SeenTeams, Team, TeamsError};
use rand::seq::SliceRandom;
use rand::Rng;

/// Tries per round when chaining swaps from the newest option.
const CHAINED_SWAP_TRIES: usize = 3;

/// Generate up to `n_options` partitions whose team rosters are pairwise distinct.
///
/// 1. Run [`search_best`] with a different seed each time until enough distinct
///    partitions turn up or `config.max_searches` is spent.
/// 2. Swap a random unit between the teams of options already found (round robin).
/// 3. Chain further swaps from the newest option.
///
/// Swapped partitions are re-scored from the unit ratings. Fewer than `n_options` are
/// returned only when the budgets run out. `rng` drives the swap stages only.
pub fn generate_options<R: Rng + ?Sized>(
    units: &[MovementUnit],
    n_options: usize,
    config: &SearchConfig,
    rng: &mut R,
) -> Result<Vec<ScoredPartition>, TeamsError> {
    if n_options == 0 {
        return Err(TeamsError::InvalidOptionCount);
    }
    let ratings = rating_index(units);
    let mut seen = SeenTeams::default();
    let mut options: Vec<ScoredPartition> = Vec::with_capacity(n_options);

    let mut searches = 0;
    while options.len() < n_options && searches < config.max_searches {
        searches += 1;
        let seed = config
            .base_seed
            .wrapping_add((searches as u64).wrapping_mul(config.seed_stride));
        let Some(candidate) = search_best(units, config.attempts_per_search, seed) else {
            break;
        };
        if seen.insert(&candidate.partition) {
            options.push(candidate);
        }
    }
    log::debug!("{} option(s) from {} search(es)", options.len(), searches);

    let mut swap_attempts = 0;
    while options.len() < n_options && swap_attempts < config.max_swap_attempts && !options.is_empty() {
        let base = swap_attempts % options.len();
        swap_attempts += 1;
        let Some(candidate) = swap_units(&options[base].partition, units, rng) else {
            continue;
        };
        if seen.insert(&candidate) {
            let score = candidate.score(&ratings);
            options.push(ScoredPartition {
                partition: candidate,
                score,
            });
        }
    }

    let mut rounds = 0;
    while options.len() < n_options && rounds < config.max_chained_rounds {
        let Some(newest) = options.last() else {
            break;
        };
        rounds += 1;
        let base = newest.partition.clone();
        for _ in 0..CHAINED_SWAP_TRIES {
            let Some(candidate) = swap_units(&base, units, rng) else {
                continue;
            };
            if seen.insert(&candidate) {
                let score = candidate.score(&ratings);
                options.push(ScoredPartition {
                    partition: candidate,
                    score,
                });
                break;
            }
        }
    }

    if options.len() < n_options {
        log::warn!(
            "only {} of {} distinct option(s) could be built",
            options.len(),
            n_options
        );
    }
    Ok(options)
}

/// Rating of every unit member by name.
pub fn rating_index(units: &[MovementUnit]) -> RatingIndex<'_> {
    units
        .iter()
        .flat_map(|u| u.members.iter())
        .map(|p| (p.name.as_str(), p.rating))
        .collect()
}

/// Swap one random unit on Team 1 with a random unit of the same size on Team 2.
///
/// For singletons this is a plain player swap; groups stay together and both sides keep
/// their size. `None` when no such pair of units exists.
pub fn swap_units<R: Rng + ?Sized>(
    partition: &Partition,
    units: &[MovementUnit],
    rng: &mut R,
) -> Option<Partition> {
    let team_1 = units_on(partition, units, Team::One);
    let team_2 = units_on(partition, units, Team::Two);

    let pairs: Vec<(&MovementUnit, &MovementUnit)> = team_1
        .iter()
        .flat_map(|a| {
            team_2
                .iter()
                .filter(move |b| b.size() == a.size())
                .map(move |b| (*a, *b))
        })
        .collect();
    let (a, b) = pairs.choose(rng)?;

    let mut swapped = partition.clone();
    for (x, y) in a.members.iter().zip(&b.members) {
        swapped = swapped.swap_players(&x.name, &y.name).ok()?;
    }
    Some(swapped)
}

fn units_on<'a>(partition: &Partition, units: &'a [MovementUnit], team: Team) -> Vec<&'a MovementUnit> {
    units
        .iter()
        .filter(|u| unit_side(partition, u) == Some(team))
        .collect()
}

/// Team holding every member of `unit`, if they are all on one side.
fn unit_side(partition: &Partition, unit: &MovementUnit) -> Option<Team> {
    let mut sides = unit.members.iter().map(|p| partition.team_of(&p.name));
    let first = sides.next()??;
    sides.all(|s| s == Some(first)).then_some(first)
}
