//! Data structures for the bracket: players, matches, tournament.

mod game;
mod player;
mod tournament;

pub use game::{GameMatch, MatchId, MatchKind, RoundScore, MATCH_SLOTS, MAX_ROUND_UPS};
pub use player::{
    by_kills, by_runnerup, by_score, Color, Direction, Player, PlayerName, ScoreData, StatKind,
};
pub use tournament::{
    Tournament, TournamentError, TournamentId, INITIAL_TRYOUTS, MAX_PLAYERS,
    MIN_PLAYERS_STARTABLE, MIN_PLAYERS_TO_START,
};
