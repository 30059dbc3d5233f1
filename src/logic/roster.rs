//! Roster import from CSV (`id,name,rating,group`).

use crate::models::{Player, PlayerId, TeamsError, DEFAULT_RATING};
use serde::Deserialize;
use std::io::Read;

#[derive(Deserialize)]
struct RosterRow {
    id: PlayerId,
    name: String,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    group: Option<String>,
}

/// Read players from CSV with a header row.
///
/// A missing or empty rating means [`DEFAULT_RATING`]; an empty group means ungrouped.
/// Names must be non-empty and unique (case-insensitive).
pub fn read_roster<R: Read>(reader: R) -> Result<Vec<Player>, TeamsError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut players: Vec<Player> = Vec::new();

    for record in csv_reader.deserialize::<RosterRow>() {
        let row = record.map_err(|e| TeamsError::Roster(e.to_string()))?;
        if row.name.is_empty() {
            return Err(TeamsError::Roster(format!("player {} has no name", row.id)));
        }
        if players.iter().any(|p| p.name.eq_ignore_ascii_case(&row.name)) {
            return Err(TeamsError::DuplicatePlayerName(row.name));
        }
        let mut player = Player::new(row.id, row.name, row.rating.unwrap_or(DEFAULT_RATING));
        player.set_group(row.group);
        players.push(player);
    }
    log::debug!("read {} player(s) from roster", players.len());
    Ok(players)
}
