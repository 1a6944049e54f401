//! Setup phase: registration, seeding into tryouts, and starting the tournament.

use crate::models::{
    Color, Tournament, TournamentError, MATCH_SLOTS, MAX_PLAYERS, MIN_PLAYERS_TO_START,
};
use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;

/// Register a player and reseed the tryouts.
pub fn register_player<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    name: impl Into<String>,
    color: Color,
    rng: &mut R,
) -> Result<(), TournamentError> {
    tournament.add_player(name, color)?;
    shuffle_players(tournament, rng)
}

/// Deal the whole roster, in random order, into the tryouts in blocks of four.
///
/// Every tryout ends up with exactly four slots, placeholders filling the gaps.
pub fn shuffle_players<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    rng: &mut R,
) -> Result<(), TournamentError> {
    for m in &mut tournament.tryouts {
        m.players.clear();
    }

    let mut order = tournament.players.clone();
    order.shuffle(rng);

    for (i, player) in order.into_iter().enumerate() {
        let slot = i / MATCH_SLOTS;
        let m = tournament
            .tryouts
            .get_mut(slot)
            .ok_or(TournamentError::TournamentFull)?;
        m.add_player(player)?;
    }

    for m in &mut tournament.tryouts {
        m.prefill();
    }
    log::debug!(
        "{}: seeded {} players into {} tryouts",
        tournament.id,
        tournament.players.len(),
        tournament.tryouts.len()
    );
    Ok(())
}

/// Start the tournament: requires between 8 and 32 registered players.
pub fn start_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.started.is_some() {
        return Err(TournamentError::InvalidTransition("tournament already started"));
    }
    let actual = tournament.players.len();
    if !(MIN_PLAYERS_TO_START..=MAX_PLAYERS).contains(&actual) {
        return Err(TournamentError::PlayerCountOutOfRange {
            min: MIN_PLAYERS_TO_START,
            max: MAX_PLAYERS,
            actual,
        });
    }
    tournament.started = Some(Utc::now());
    log::info!("{}: tournament started with {} players", tournament.id, actual);
    Ok(())
}
