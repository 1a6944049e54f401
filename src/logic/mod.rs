//! Bracket business logic: setup, match play, advancement, runnerups.

mod advancement;
mod match_play;
mod runnerups;
mod setup;

pub use advancement::{award_medals, move_players};
pub use match_play::{commit_round, end_match, player_action, start_match};
pub use runnerups::{get_runnerups, populate_runnerups, rerank_runnerups, update_players};
pub use setup::{register_player, shuffle_players, start_tournament};
