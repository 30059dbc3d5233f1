//! Grouping players into movement units, and defining the groups themselves.

use crate::models::{MovementUnit, Player, TeamsError, TEAM_SIZE};
use std::collections::HashSet;

/// Smallest and largest group the operator may define (pairs and trios).
const GROUP_SIZES: std::ops::RangeInclusive<usize> = 2..=3;

/// Groups of one size a match can hold: two pairs and two trios still split 5/5.
const MAX_GROUPS_PER_SIZE: usize = 2;

/// Build movement units from the players' group tags.
///
/// Players sharing a tag form one unit (in input order); untagged players are singletons.
/// Result is ordered by size, then combined rating, both descending. Ties keep input order.
pub fn build_units(players: &[Player]) -> Vec<MovementUnit> {
    let mut groups: Vec<(&str, Vec<Player>)> = Vec::new();
    let mut singles = Vec::new();

    for p in players {
        match p.group_tag() {
            Some(tag) => match groups.iter_mut().find(|(t, _)| *t == tag) {
                Some((_, members)) => members.push(p.clone()),
                None => groups.push((tag, vec![p.clone()])),
            },
            None => singles.push(MovementUnit::single(p.clone())),
        }
    }

    let mut units: Vec<MovementUnit> = groups
        .into_iter()
        .map(|(_, members)| MovementUnit::new(members))
        .chain(singles)
        .collect();
    units.sort_by(|a, b| {
        b.size()
            .cmp(&a.size())
            .then_with(|| b.total_rating().total_cmp(&a.total_rating()))
    });
    units
}

/// Replace the players' group tags with `groups` (pairs or trios of names).
///
/// Empty groups are ignored. Nothing changes unless every group is valid: sizes 2 or 3,
/// at most two of each size, no player in two groups, every name on the roster.
pub fn assign_groups(players: &mut [Player], groups: &[Vec<String>]) -> Result<(), TeamsError> {
    let mut taken = HashSet::new();
    for group in groups.iter().filter(|g| !g.is_empty()) {
        let size = group.len();
        if !GROUP_SIZES.contains(&size) || size > TEAM_SIZE {
            return Err(TeamsError::InvalidGroupSize { size });
        }
        if groups.iter().filter(|g| g.len() == size).count() > MAX_GROUPS_PER_SIZE {
            return Err(TeamsError::TooManyGroups { size });
        }
        for name in group {
            if !players.iter().any(|p| p.name == *name) {
                return Err(TeamsError::UnknownPlayer(name.clone()));
            }
            if !taken.insert(name.as_str()) {
                return Err(TeamsError::DuplicateGroupMember(name.clone()));
            }
        }
    }

    for p in players.iter_mut() {
        p.set_group(None);
    }
    for (idx, group) in groups.iter().filter(|g| !g.is_empty()).enumerate() {
        let tag = (idx + 1).to_string();
        for p in players.iter_mut().filter(|p| group.contains(&p.name)) {
            p.set_group(Some(tag.clone()));
        }
    }
    log::debug!(
        "assigned {} group(s) covering {} player(s)",
        groups.iter().filter(|g| !g.is_empty()).count(),
        taken.len()
    );
    Ok(())
}
