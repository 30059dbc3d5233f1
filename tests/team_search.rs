//! Integration tests for the greedy search and option assembly.

use club_league::{
    attempt_partition, build_units, generate_options, rating_index, search_best, MovementUnit,
    Partition, Player, SearchConfig, Team, TeamsError, TEAM_SIZE,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const RATINGS: [f64; 10] = [1200.0, 1150.0, 1100.0, 1050.0, 1000.0, 1000.0, 950.0, 900.0, 850.0, 800.0];

fn players(ratings: &[f64]) -> Vec<Player> {
    ratings
        .iter()
        .enumerate()
        .map(|(i, &r)| Player::new(i as i64 + 1, format!("P{}", i + 1), r))
        .collect()
}

/// Rating gap of a snake draft (A B B A A B B A A B) over ratings sorted descending.
fn snake_draft_gap(ratings: &[f64]) -> f64 {
    let mut sorted = ratings.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));
    let (mut a, mut b) = (0.0_f64, 0.0_f64);
    for (i, r) in sorted.iter().enumerate() {
        if matches!(i % 4, 0 | 3) {
            a += *r;
        } else {
            b += *r;
        }
    }
    f64::abs(a - b)
}

fn assert_pairwise_distinct(options: &[Partition]) {
    for (i, a) in options.iter().enumerate() {
        for b in &options[i + 1..] {
            let (sa, sb) = (a.signature(), b.signature());
            assert_ne!(sa.team_1, sb.team_1);
            assert_ne!(sa.team_1, sb.team_2);
            assert_ne!(sa.team_2, sb.team_1);
            assert_ne!(sa.team_2, sb.team_2);
        }
    }
}

#[test]
fn attempt_never_overfills_with_ten_singletons() {
    let units = build_units(&players(&RATINGS));
    let orders: Vec<Vec<usize>> = vec![
        (0..10).collect(),
        (0..10).rev().collect(),
        vec![9, 0, 8, 1, 7, 2, 6, 3, 5, 4],
    ];
    for order in orders {
        let attempt = attempt_partition(&units, &order);
        assert_eq!(attempt.team_1.len(), TEAM_SIZE);
        assert_eq!(attempt.team_2.len(), TEAM_SIZE);
        let sum_1: f64 = attempt.team_1.iter().map(|p| p.rating).sum();
        assert_eq!(sum_1, attempt.sum_1);
        assert_eq!(attempt.score(), (attempt.sum_1 - attempt.sum_2).abs());
    }
}

#[test]
fn attempt_follows_greedy_rule() {
    let units = build_units(&players(&[1000.0, 900.0, 800.0]));
    // 1000 -> team 1 (tie), 900 -> team 2 (team 1 ahead), 800 -> team 2 (team 1 still ahead)
    let attempt = attempt_partition(&units, &[0, 1, 2]);
    assert_eq!(attempt.sum_1, 1000.0);
    assert_eq!(attempt.sum_2, 1700.0);
    assert_eq!(attempt.score(), 700.0);
}

#[test]
fn oversized_units_give_incomplete_partition() {
    let trio = |tag: &str, base: i64| -> MovementUnit {
        MovementUnit::new(
            (0..3)
                .map(|i| Player::new(base + i, format!("{tag}{i}"), 1000.0))
                .collect(),
        )
    };
    let units = vec![trio("a", 0), trio("b", 10), trio("c", 20), MovementUnit::single(Player::new(30, "s", 1000.0))];
    let attempt = attempt_partition(&units, &[0, 1, 2, 3]);
    assert!(attempt.team_1.len() <= TEAM_SIZE);
    assert_eq!(attempt.team_2.len(), 6);

    let partition = attempt.to_partition();
    assert_eq!(partition.team_len(Team::Two), TEAM_SIZE);
    assert_eq!(partition.validate(), Err(TeamsError::IncompleteTeams));
}

#[test]
fn overflowing_search_keeps_full_pass_gap() {
    let trio = |tag: &str, base: i64, rating: f64| -> MovementUnit {
        MovementUnit::new(
            (0..3)
                .map(|i| Player::new(base + i, format!("{tag}{i}"), rating))
                .collect(),
        )
    };
    let units = vec![
        trio("a", 0, 1000.0),
        trio("b", 10, 1100.0),
        trio("c", 20, 1200.0),
        MovementUnit::single(Player::new(30, "s", 900.0)),
    ];
    // Every order overflows Team 2; the smallest full gap is 4500 vs 6300.
    let best = search_best(&units, 500, 3).unwrap();
    assert_eq!(best.score, 1800.0);

    assert_eq!(best.partition.validate(), Err(TeamsError::IncompleteTeams));
    let truncated = best.partition.score(&rating_index(&units));
    assert!(truncated == 700.0 || truncated == 800.0, "truncated gap {}", truncated);
}

#[test]
fn search_best_is_reproducible() {
    let units = build_units(&players(&[1310.0, 1170.0, 1090.0, 1040.0, 1015.0, 990.0, 930.0, 905.0, 860.0, 790.0]));
    let first = search_best(&units, 500, 7).unwrap();
    let second = search_best(&units, 500, 7).unwrap();
    assert_eq!(first, second);
}

#[test]
fn search_best_needs_units() {
    assert!(search_best(&[], 100, 1).is_none());
    let units = build_units(&players(&RATINGS));
    assert!(search_best(&units, 0, 1).is_none());
}

#[test]
fn search_best_beats_snake_draft() {
    let units = build_units(&players(&RATINGS));
    let best = search_best(&units, 3000, 1).unwrap();
    assert!(best.score <= snake_draft_gap(&RATINGS));
    assert!(best.partition.validate().is_ok());
}

#[test]
fn three_distinct_balanced_options() {
    let units = build_units(&players(&RATINGS));
    let mut rng = StdRng::seed_from_u64(42);
    let options = generate_options(&units, 3, &SearchConfig::default(), &mut rng).unwrap();
    assert_eq!(options.len(), 3);

    let ratings = rating_index(&units);
    let snake = snake_draft_gap(&RATINGS);
    for option in &options {
        assert!(option.partition.validate().is_ok());
        assert_eq!(option.partition.team_len(Team::One), TEAM_SIZE);
        assert_eq!(option.partition.team_len(Team::Two), TEAM_SIZE);
        assert_eq!(option.partition.score(&ratings), option.score);
        assert!(option.score <= snake);
    }
    let partitions: Vec<Partition> = options.into_iter().map(|o| o.partition).collect();
    assert_pairwise_distinct(&partitions);
}

#[test]
fn grouped_pair_stays_together() {
    let mut roster = players(&[1100.0, 900.0, 1250.0, 1150.0, 1050.0, 1000.0, 1000.0, 950.0, 850.0, 750.0]);
    roster[0].set_group(Some("pair".into()));
    roster[1].set_group(Some("pair".into()));
    let units = build_units(&roster);

    let mut rng = StdRng::seed_from_u64(3);
    let options = generate_options(&units, 3, &SearchConfig::default(), &mut rng).unwrap();
    assert!(!options.is_empty() && options.len() <= 3);
    for option in &options {
        let side = option.partition.team_of("P1");
        assert!(side.is_some());
        assert_eq!(side, option.partition.team_of("P2"));
    }
}

#[test]
fn swap_fallback_fills_missing_options_with_exact_scores() {
    let units = build_units(&players(&RATINGS));
    let config = SearchConfig {
        max_searches: 1,
        ..SearchConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(9);
    let options = generate_options(&units, 3, &config, &mut rng).unwrap();
    assert_eq!(options.len(), 3);

    let ratings = rating_index(&units);
    for option in &options {
        assert!(option.partition.validate().is_ok());
        assert_eq!(option.score, option.partition.score(&ratings));
    }
    let partitions: Vec<Partition> = options.into_iter().map(|o| o.partition).collect();
    assert_pairwise_distinct(&partitions);
}

#[test]
fn swap_fallback_keeps_groups_together() {
    let mut roster = players(&RATINGS);
    for i in [0, 9] {
        roster[i].set_group(Some("pair".into()));
    }
    for i in [1, 2, 3] {
        roster[i].set_group(Some("trio".into()));
    }
    let units = build_units(&roster);
    let config = SearchConfig {
        max_searches: 1,
        ..SearchConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(5);
    let options = generate_options(&units, 4, &config, &mut rng).unwrap();
    assert!(options.len() <= 4);
    for option in &options {
        let p = &option.partition;
        assert_eq!(p.team_of("P1"), p.team_of("P10"));
        assert_eq!(p.team_of("P2"), p.team_of("P3"));
        assert_eq!(p.team_of("P2"), p.team_of("P4"));
    }
}

#[test]
fn tiny_roster_returns_fewer_options() {
    let units = build_units(&players(&[1000.0, 1000.0]));
    let mut rng = StdRng::seed_from_u64(1);
    let options = generate_options(&units, 3, &SearchConfig::default(), &mut rng).unwrap();
    assert_eq!(options.len(), 1);
}

#[test]
fn no_units_no_options() {
    let mut rng = StdRng::seed_from_u64(1);
    let options = generate_options(&[], 3, &SearchConfig::default(), &mut rng).unwrap();
    assert!(options.is_empty());
}

#[test]
fn zero_options_is_rejected() {
    let units = build_units(&players(&RATINGS));
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(
        generate_options(&units, 0, &SearchConfig::default(), &mut rng),
        Err(TeamsError::InvalidOptionCount)
    );
}

#[test]
fn swap_players_exchanges_slots_only() {
    let partition = Partition::from_teams(["A", "B", "C", "D", "E"], ["F", "G", "H", "I", "J"]);
    let swapped = partition.swap_players("B", "H").unwrap();

    assert_eq!(swapped.team_of("B"), Some(Team::Two));
    assert_eq!(swapped.team_of("H"), Some(Team::One));
    assert_eq!(swapped.slots()[1].as_deref(), Some("H"));
    assert_eq!(swapped.slots()[7].as_deref(), Some("B"));
    for i in [0, 2, 3, 4, 5, 6, 8, 9] {
        assert_eq!(swapped.slots()[i], partition.slots()[i]);
    }
}

#[test]
fn swap_players_checks_sides() {
    let partition = Partition::from_teams(["A", "B", "C", "D", "E"], ["F", "G", "H", "I", "J"]);
    assert!(matches!(
        partition.swap_players("F", "G"),
        Err(TeamsError::PlayerNotOnTeam { team: Team::One, .. })
    ));
    assert!(matches!(
        partition.swap_players("A", "B"),
        Err(TeamsError::PlayerNotOnTeam { team: Team::Two, .. })
    ));
}

#[test]
fn validate_catches_duplicates() {
    let partition = Partition::from_teams(["A", "B", "C", "D", "E"], ["F", "G", "H", "I", "A"]);
    assert_eq!(partition.validate(), Err(TeamsError::DuplicatePlayer("A".to_string())));
}
