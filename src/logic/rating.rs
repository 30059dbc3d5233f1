//! ELO updates after a result is entered.

use crate::models::{MatchKind, MatchReport, Player, RatingChange, Team, TeamsError};
use chrono::{DateTime, Utc};
use std::ops::RangeInclusive;

/// Base K used when the operator does not pick one.
pub const DEFAULT_K: u32 = 80;

/// K values the operator may choose from.
pub const K_RANGE: RangeInclusive<u32> = 10..=200;

/// K scaled by the goal difference: x1.8 from 6 goals, x1.3 from 3, else unchanged.
pub fn k_factor(base_k: u32, goal_difference: u32) -> u32 {
    let factor = if goal_difference >= 6 {
        1.8
    } else if goal_difference >= 3 {
        1.3
    } else {
        1.0
    };
    (f64::from(base_k) * factor) as u32
}

/// Probability-like expectation of `rating` scoring against `opponent`.
pub fn expected_score(rating: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) / 400.0))
}

/// New ratings of two sides after a game; `score_a` is 1, 0.5 or 0. Rounded to whole points.
pub fn update_pair(rating_a: f64, rating_b: f64, score_a: f64, k: u32) -> (f64, f64) {
    let k = f64::from(k);
    let expected_a = expected_score(rating_a, rating_b);
    let new_a = rating_a + k * (score_a - expected_a);
    let new_b = rating_b + k * ((1.0 - score_a) - (1.0 - expected_a));
    (new_a.round(), new_b.round())
}

/// Rating changes for every player of a confirmed match.
///
/// Each team is rated as the average of its members; every player then moves by their
/// team's delta. Friendlies produce no changes.
pub fn rate_match(
    team_1: &[Player],
    team_2: &[Player],
    report: &MatchReport,
    base_k: u32,
    recorded_at: DateTime<Utc>,
) -> Result<Vec<RatingChange>, TeamsError> {
    if !K_RANGE.contains(&base_k) {
        return Err(TeamsError::InvalidKFactor(base_k));
    }
    if team_1.is_empty() || team_2.is_empty() {
        return Err(TeamsError::IncompleteTeams);
    }
    if report.kind == MatchKind::Friendly {
        return Ok(Vec::new());
    }

    let average = |team: &[Player]| team.iter().map(|p| p.rating).sum::<f64>() / team.len() as f64;
    let (avg_1, avg_2) = (average(team_1), average(team_2));
    let score_1 = match report.winner {
        Some(Team::One) => 1.0,
        Some(Team::Two) => 0.0,
        None => 0.5,
    };
    let k = k_factor(base_k, report.goal_difference);
    let (new_1, new_2) = update_pair(avg_1, avg_2, score_1, k);
    let (delta_1, delta_2) = (new_1 - avg_1, new_2 - avg_2);
    log::info!(
        "rating update with K={}: team 1 {:+.1}, team 2 {:+.1}",
        k,
        delta_1,
        delta_2
    );

    let change = |p: &Player, team: Team, delta: f64| RatingChange {
        player_id: p.id,
        name: p.name.clone(),
        team,
        rating_before: p.rating,
        rating_after: p.rating + delta,
        recorded_at,
    };
    Ok(team_1
        .iter()
        .map(|p| change(p, Team::One, delta_1))
        .chain(team_2.iter().map(|p| change(p, Team::Two, delta_2)))
        .collect())
}

/// Write `rating_after` of each change into the matching player.
pub fn apply_rating_changes(players: &mut [Player], changes: &[RatingChange]) {
    for c in changes {
        if let Some(p) = players.iter_mut().find(|p| p.id == c.player_id) {
            p.rating = c.rating_after;
        }
    }
}

/// Undo a recorded match: restore `rating_before` of each change.
pub fn revert_rating_changes(players: &mut [Player], changes: &[RatingChange]) {
    for c in changes {
        if let Some(p) = players.iter_mut().find(|p| p.id == c.player_id) {
            p.rating = c.rating_before;
        }
    }
}
