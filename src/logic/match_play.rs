//! Playing a match: start, live round commits, judge corrections and end.

use crate::logic::advancement::{award_medals, move_players};
use crate::logic::runnerups::populate_runnerups;
use crate::models::{
    Direction, MatchId, MatchKind, RoundScore, StatKind, Tournament, TournamentError,
};
use rand::Rng;

/// Start a match, backfilling empty slots from the runnerups first.
pub fn start_match<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    id: MatchId,
    rng: &mut R,
) -> Result<(), TournamentError> {
    let m = tournament.get_match(id)?;
    if m.is_started() {
        return Err(TournamentError::InvalidTransition("match already started"));
    }
    if !m.is_full() {
        populate_runnerups(tournament, id)?;
    }
    tournament.get_match_mut(id)?.begin(rng)?;
    log::info!("{}: {} started", tournament.id, id);
    Ok(())
}

/// End a match and move its players on (or award medals for the final).
pub fn end_match(tournament: &mut Tournament, id: MatchId) -> Result<(), TournamentError> {
    tournament.get_match_mut(id)?.finish()?;
    log::info!("{}: {} ended", tournament.id, id);
    if id.kind == MatchKind::Final {
        award_medals(tournament, id)
    } else {
        move_players(tournament, id)
    }
}

/// Fold one round of live results into a match being played.
pub fn commit_round(
    tournament: &mut Tournament,
    id: MatchId,
    scores: &[RoundScore],
    shots: &[bool],
) -> Result<(), TournamentError> {
    tournament.get_match_mut(id)?.commit(scores, shots)
}

/// Judge correction on the player in `slot`.
pub fn player_action(
    tournament: &mut Tournament,
    id: MatchId,
    slot: usize,
    stat: StatKind,
    direction: Direction,
) -> Result<(), TournamentError> {
    let m = tournament.get_match_mut(id)?;
    if !m.is_open() {
        return Err(TournamentError::InvalidTransition("match is not being played"));
    }
    let player = m
        .players
        .get_mut(slot)
        .filter(|p| !p.is_prefill())
        .ok_or(TournamentError::SlotNotFound(slot))?;
    player.apply(stat, direction);
    Ok(())
}
