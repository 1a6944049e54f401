//! Four-player single-elimination tournament bracket: library with models and business logic.

pub mod config;
pub mod logic;
pub mod models;
pub mod notify;
pub mod service;
pub mod store;

pub use logic::{
    award_medals, commit_round, end_match, get_runnerups, move_players, player_action,
    populate_runnerups, register_player, rerank_runnerups, shuffle_players, start_match,
    start_tournament, update_players,
};
pub use models::{
    by_kills, by_runnerup, by_score, Color, Direction, GameMatch, MatchId, MatchKind, Player,
    PlayerName, RoundScore, ScoreData, StatKind, Tournament, TournamentError, TournamentId,
    MATCH_SLOTS, MAX_PLAYERS, MAX_ROUND_UPS,
};
pub use notify::{Notifier, TournamentChanged};
pub use service::{ServiceError, TournamentService};
pub use store::{FileStore, MemoryStore, StoreError, TournamentStore};
