//! Operations that move a GenerationSession forward.

use crate::logic::blocks::{assign_groups, build_units};
use crate::logic::options::generate_options;
use crate::logic::rating::{apply_rating_changes, rate_match, revert_rating_changes};
use crate::logic::search::SearchConfig;
use crate::models::{
    GenerationSession, MatchReport, MovementUnit, RatingChange, RecordedResult, ScoredPartition, Team,
    TeamsError,
};
use chrono::{DateTime, Utc};
use rand::Rng;

/// Redefine the session's pairs and trios and rebuild its units.
///
/// Previously generated options and the selection are discarded.
pub fn regroup_session(session: &mut GenerationSession, groups: &[Vec<String>]) -> Result<(), TeamsError> {
    if session.confirmed.is_some() {
        return Err(TeamsError::AlreadyConfirmed);
    }
    assign_groups(&mut session.players, groups)?;
    session.units = build_units(&session.players);
    session.options.clear();
    session.selected = None;
    Ok(())
}

/// Generate fresh options for the session, replacing earlier ones and the selection.
pub fn generate_session_options<'s, R: Rng + ?Sized>(
    session: &'s mut GenerationSession,
    n_options: usize,
    config: &SearchConfig,
    rng: &mut R,
) -> Result<&'s [ScoredPartition], TeamsError> {
    if session.confirmed.is_some() {
        return Err(TeamsError::AlreadyConfirmed);
    }
    let options = generate_options(&session.units, n_options, config, rng)?;
    let units = session.units.clone();
    store_session_options(session, &units, options)
}

/// Store options generated elsewhere from a copy of the session's units.
///
/// Refused when teams were confirmed meanwhile, or when `units` no longer match the
/// session's (groups or ratings changed), since the options would be stale.
pub fn store_session_options<'s>(
    session: &'s mut GenerationSession,
    units: &[MovementUnit],
    options: Vec<ScoredPartition>,
) -> Result<&'s [ScoredPartition], TeamsError> {
    if session.confirmed.is_some() {
        return Err(TeamsError::AlreadyConfirmed);
    }
    if session.units != units {
        return Err(TeamsError::UnitsChanged);
    }
    session.options = options;
    session.selected = None;
    log::info!(
        "session {}: {} option(s), best gap {:?}",
        session.id,
        session.options.len(),
        session.options.iter().map(|o| o.score).reduce(f64::min)
    );
    Ok(&session.options)
}

/// Rate the confirmed match and update the session's player ratings.
///
/// Needs both kits set and no earlier result. The result is kept on the session, which
/// closes the match until [`undo_session_result`]. Returns the history rows for the
/// caller to persist. Units are rebuilt so a later generation sees the new ratings.
pub fn record_session_result(
    session: &mut GenerationSession,
    report: &MatchReport,
    base_k: u32,
    recorded_at: DateTime<Utc>,
) -> Result<Vec<RatingChange>, TeamsError> {
    let confirmed = session.confirmed.as_ref().ok_or(TeamsError::NotConfirmed)?;
    if confirmed.jersey_1.is_none() || confirmed.jersey_2.is_none() {
        return Err(TeamsError::JerseysMissing);
    }
    if session.result.is_some() {
        return Err(TeamsError::ResultAlreadyRecorded);
    }
    let team_1 = session.confirmed_players(Team::One)?;
    let team_2 = session.confirmed_players(Team::Two)?;
    let changes = rate_match(&team_1, &team_2, report, base_k, recorded_at)?;
    apply_rating_changes(&mut session.players, &changes);
    session.units = build_units(&session.players);
    session.result = Some(RecordedResult {
        report: *report,
        changes: changes.clone(),
    });
    Ok(changes)
}

/// Take back the recorded result: ratings return to their values before the match,
/// which is open for a new result again. Returns the reverted rows.
pub fn undo_session_result(session: &mut GenerationSession) -> Result<Vec<RatingChange>, TeamsError> {
    let recorded = session.result.take().ok_or(TeamsError::NoResult)?;
    revert_rating_changes(&mut session.players, &recorded.changes);
    session.units = build_units(&session.players);
    log::info!(
        "session {}: result undone, {} rating(s) restored",
        session.id,
        recorded.changes.len()
    );
    Ok(recorded.changes)
}
