//! Runnerup queue: cumulative stats and backfilling under-populated matches.

use crate::models::{by_runnerup, MatchId, Player, Tournament, TournamentError};

/// Rebuild every roster record from the players seated in ended matches.
pub fn update_players(tournament: &mut Tournament) {
    for p in &mut tournament.players {
        p.reset();
    }

    let played: Vec<Player> = tournament
        .matches()
        .filter(|m| m.is_ended())
        .flat_map(|m| m.players.iter())
        .filter(|p| !p.is_prefill())
        .cloned()
        .collect();

    let id = tournament.id.clone();
    for record in &played {
        match tournament.get_player_mut(&record.name) {
            Some(p) => p.update(record),
            None => log::warn!("{}: no player named {} found", id, record.name),
        }
    }
}

/// Fresh cumulative records of the queued runnerups, best candidate first.
pub fn get_runnerups(tournament: &mut Tournament) -> Vec<Player> {
    update_players(tournament);
    let mut runnerups: Vec<Player> = tournament
        .runnerups
        .iter()
        .map(|name| tournament.player_or_default(name))
        .collect();
    runnerups.sort_by(by_runnerup);
    runnerups
}

/// Re-rank the queue in place.
pub fn rerank_runnerups(tournament: &mut Tournament) {
    let ranked = get_runnerups(tournament);
    tournament.runnerups = ranked.into_iter().map(|p| p.name).collect();
    log::debug!("{}: runnerups {:?}", tournament.id, tournament.runnerups);
}

/// Fill the empty slots of a match with the best-ranked runnerups.
///
/// Runnerups already seated in a match still being played are passed over. If the
/// queue runs dry the match keeps its placeholders.
pub fn populate_runnerups(tournament: &mut Tournament, id: MatchId) -> Result<(), TournamentError> {
    let candidates = get_runnerups(tournament);
    let busy: Vec<String> = tournament
        .matches()
        .filter(|m| !m.is_ended())
        .flat_map(|m| m.players.iter())
        .filter(|p| !p.is_prefill())
        .map(|p| p.name.clone())
        .collect();

    let m = tournament.get_match_mut(id)?;
    for candidate in candidates {
        if m.is_full() {
            break;
        }
        if busy.contains(&candidate.name) {
            continue;
        }
        log::info!("{}: runnerup {} fills a slot", id, candidate.name);
        m.add_player(candidate)?;
    }
    if !m.is_full() {
        log::warn!(
            "{}: not enough runnerups, {} of 4 slots filled",
            id,
            m.actual_players()
        );
    }
    Ok(())
}
