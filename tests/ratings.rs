//! Integration tests for ELO updates after a result.

use chrono::{TimeZone, Utc};
use club_league::{
    apply_rating_changes, expected_score, k_factor, rate_match, revert_rating_changes, update_pair,
    MatchKind, MatchReport, Player, Team, TeamsError,
};

fn team(first_id: i64, ratings: &[f64]) -> Vec<Player> {
    ratings
        .iter()
        .enumerate()
        .map(|(i, &r)| Player::new(first_id + i as i64, format!("P{}", first_id + i as i64), r))
        .collect()
}

fn report(winner: Option<Team>, goal_difference: u32) -> MatchReport {
    MatchReport {
        winner,
        goal_difference,
        kind: MatchKind::Official,
    }
}

#[test]
fn k_grows_with_goal_difference() {
    assert_eq!(k_factor(80, 0), 80);
    assert_eq!(k_factor(80, 2), 80);
    assert_eq!(k_factor(80, 3), 104);
    assert_eq!(k_factor(80, 5), 104);
    assert_eq!(k_factor(80, 6), 144);
    assert_eq!(k_factor(50, 9), 90);
}

#[test]
fn expectation_is_symmetric() {
    assert_eq!(expected_score(1000.0, 1000.0), 0.5);
    let e = expected_score(1200.0, 1000.0);
    assert!(e > 0.5);
    assert!((e + expected_score(1000.0, 1200.0) - 1.0).abs() < 1e-12);
}

#[test]
fn update_pair_rounds_to_whole_points() {
    assert_eq!(update_pair(1000.0, 1000.0, 1.0, 80), (1040.0, 960.0));
    assert_eq!(update_pair(1000.0, 1000.0, 0.5, 80), (1000.0, 1000.0));
    let (a, b) = update_pair(1200.0, 1000.0, 0.0, 80);
    assert!(a < 1200.0 && b > 1000.0);
    assert_eq!(a.fract(), 0.0);
}

#[test]
fn every_player_moves_by_team_delta() {
    let t1 = team(1, &[1100.0, 1000.0, 1000.0, 950.0, 950.0]);
    let t2 = team(6, &[1050.0, 1050.0, 1000.0, 950.0, 950.0]);
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap();

    let changes = rate_match(&t1, &t2, &report(Some(Team::One), 0), 80, at).unwrap();
    assert_eq!(changes.len(), 10);
    for c in &changes {
        assert_eq!(c.recorded_at, at);
        match c.team {
            Team::One => assert_eq!(c.delta(), 40.0),
            Team::Two => assert_eq!(c.delta(), -40.0),
        }
    }
    let p1 = changes.iter().find(|c| c.player_id == 1).unwrap();
    assert_eq!((p1.rating_before, p1.rating_after), (1100.0, 1140.0));
}

#[test]
fn big_win_uses_larger_k() {
    let t1 = team(1, &[1000.0; 5]);
    let t2 = team(6, &[1000.0; 5]);
    let changes = rate_match(&t1, &t2, &report(Some(Team::Two), 6), 80, Utc::now()).unwrap();
    let winner = changes.iter().find(|c| c.team == Team::Two).unwrap();
    assert_eq!(winner.delta(), 72.0);
}

#[test]
fn draw_between_equal_teams_changes_nothing() {
    let t1 = team(1, &[1000.0; 5]);
    let t2 = team(6, &[1000.0; 5]);
    let changes = rate_match(&t1, &t2, &report(None, 0), 80, Utc::now()).unwrap();
    assert!(changes.iter().all(|c| c.delta() == 0.0));
}

#[test]
fn friendlies_do_not_rate() {
    let t1 = team(1, &[1000.0; 5]);
    let t2 = team(6, &[1000.0; 5]);
    let friendly = MatchReport {
        kind: MatchKind::Friendly,
        ..report(Some(Team::One), 3)
    };
    assert!(rate_match(&t1, &t2, &friendly, 80, Utc::now()).unwrap().is_empty());
}

#[test]
fn k_out_of_range_and_empty_teams_are_rejected() {
    let t1 = team(1, &[1000.0; 5]);
    let t2 = team(6, &[1000.0; 5]);
    assert_eq!(
        rate_match(&t1, &t2, &report(None, 0), 5, Utc::now()).unwrap_err(),
        TeamsError::InvalidKFactor(5)
    );
    assert_eq!(
        rate_match(&t1, &[], &report(None, 0), 80, Utc::now()).unwrap_err(),
        TeamsError::IncompleteTeams
    );
}

#[test]
fn apply_then_revert_restores_ratings() {
    let t1 = team(1, &[1000.0, 1020.0, 980.0, 1000.0, 1000.0]);
    let t2 = team(6, &[1100.0, 900.0, 1000.0, 1000.0, 1000.0]);
    let mut everyone: Vec<Player> = t1.iter().chain(t2.iter()).cloned().collect();
    let original = everyone.clone();

    let changes = rate_match(&t1, &t2, &report(Some(Team::One), 4), 80, Utc::now()).unwrap();
    apply_rating_changes(&mut everyone, &changes);
    assert_ne!(everyone, original);
    assert_eq!(everyone[0].rating, changes[0].rating_after);

    revert_rating_changes(&mut everyone, &changes);
    assert_eq!(everyone, original);
}
