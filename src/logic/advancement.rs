//! Moving players through the bracket once a match ends, and the medals.

use crate::logic::runnerups::rerank_runnerups;
use crate::models::{
    by_kills, GameMatch, MatchId, MatchKind, Player, Tournament, TournamentError, INITIAL_TRYOUTS,
};
use chrono::Utc;

/// Real players of a match, most kills first.
fn ranked_by_kills(m: &GameMatch) -> Vec<Player> {
    let mut ps: Vec<Player> = m.players.iter().filter(|p| !p.is_prefill()).cloned().collect();
    ps.sort_by(by_kills);
    ps
}

/// Send the winners of an ended tryout or semi onward; losers of a tryout join the runnerups.
///
/// On a four-tryout bracket the top two of each tryout advance, on a larger one only the
/// winner. Tryout winners are spread over the semis so they do not meet straight away.
///
/// A destination that has no free slot (a semi started early off the runnerups) does not
/// fail the move: the tryout winner is queued as a runnerup instead, and a semi finisher
/// who cannot be seated in the final is logged and left out.
pub fn move_players(tournament: &mut Tournament, id: MatchId) -> Result<(), TournamentError> {
    let m = tournament.get_match(id)?;
    let ranked = ranked_by_kills(m);

    match id.kind {
        MatchKind::Tryout => {
            let advancing = if tournament.tryouts.len() == INITIAL_TRYOUTS { 2 } else { 1 };
            for (rank, p) in ranked.into_iter().enumerate() {
                if rank < advancing {
                    let semi = (rank + id.index) % 2;
                    let name = p.name.clone();
                    match tournament.semis[semi].add_player(p) {
                        Ok(()) => {
                            tournament.runnerups.retain(|r| *r != name);
                            log::info!("{}: {} advances to semi {}", id, name, semi);
                        }
                        Err(e) => {
                            log::warn!("{}: {} cannot advance: {}", id, name, e);
                            queue_runnerup(tournament, name);
                        }
                    }
                } else {
                    queue_runnerup(tournament, p.name);
                }
            }
        }
        MatchKind::Semi => {
            for p in ranked.into_iter().take(2) {
                let name = p.name.clone();
                match tournament.final_match.add_player(p) {
                    Ok(()) => log::info!("{}: {} advances to the final", id, name),
                    Err(e) => log::warn!("{}: {} cannot advance: {}", id, name, e),
                }
            }
        }
        MatchKind::Final => {
            return Err(TournamentError::InvalidTransition(
                "the final has no next round",
            ))
        }
    }

    rerank_runnerups(tournament);
    Ok(())
}

fn queue_runnerup(tournament: &mut Tournament, name: String) {
    if !tournament.runnerups.contains(&name) {
        tournament.runnerups.push(name);
    }
}

/// Put the top three of the final in the winners list and end the tournament.
pub fn award_medals(tournament: &mut Tournament, id: MatchId) -> Result<(), TournamentError> {
    if id.kind != MatchKind::Final {
        return Err(TournamentError::InvalidTransition(
            "awarding medals outside of the final",
        ));
    }
    let ranked = ranked_by_kills(tournament.get_match(id)?);
    tournament.winners = ranked.into_iter().take(3).collect();
    tournament.ended = Some(Utc::now());
    log::info!(
        "{}: tournament ended, winners {:?}",
        tournament.id,
        tournament.winners.iter().map(|p| p.name.as_str()).collect::<Vec<_>>()
    );
    Ok(())
}
