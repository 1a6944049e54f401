//! Tournament, its bracket skeleton and TournamentError.

use crate::models::game::{GameMatch, MatchId, MatchKind, MAX_ROUND_UPS};
use crate::models::player::{Color, Player};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hard ceiling on registered players.
pub const MAX_PLAYERS: usize = 32;
/// Fewest players `start_tournament` accepts.
pub const MIN_PLAYERS_TO_START: usize = 8;
/// Fewest players for a tournament to be advertised as startable.
pub const MIN_PLAYERS_STARTABLE: usize = 16;
/// Tryout matches in a fresh bracket; doubled once more than 16 players register.
pub const INITIAL_TRYOUTS: usize = 4;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// A match or tournament step was taken out of order.
    InvalidTransition(&'static str),
    /// The match already seats four real players.
    MatchFull(MatchId),
    /// The roster already holds the maximum number of players.
    TournamentFull,
    /// A player with this name already exists.
    DuplicatePlayerName(String),
    /// Empty names are reserved for placeholders.
    InvalidPlayerName,
    /// Player count outside the accepted range for this action.
    PlayerCountOutOfRange { min: usize, max: usize, actual: usize },
    /// Player not found in the roster or match.
    PlayerNotFound(String),
    /// No such match in the bracket.
    MatchNotFound(MatchId),
    /// No such slot in the match.
    SlotNotFound(usize),
    /// Every match of the bracket has ended.
    AllMatchesPlayed,
    /// A round result claims more kills than a round allows.
    InvalidRoundScore { slot: usize, ups: u32 },
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InvalidTransition(what) => write!(f, "Invalid transition: {}", what),
            TournamentError::MatchFull(id) => write!(f, "Cannot add a fifth player to {}", id),
            TournamentError::TournamentFull => {
                write!(f, "Tournament can only host {} players", MAX_PLAYERS)
            }
            TournamentError::DuplicatePlayerName(name) => {
                write!(f, "A player named {} already exists", name)
            }
            TournamentError::InvalidPlayerName => write!(f, "Player name cannot be empty"),
            TournamentError::PlayerCountOutOfRange { min, max, actual } => write!(
                f,
                "Tournament needs between {} and {} players, got {}",
                min, max, actual
            ),
            TournamentError::PlayerNotFound(name) => write!(f, "No player named {}", name),
            TournamentError::MatchNotFound(id) => write!(f, "No match {}", id),
            TournamentError::SlotNotFound(slot) => write!(f, "No player in slot {}", slot),
            TournamentError::AllMatchesPlayed => write!(f, "All matches have been played"),
            TournamentError::InvalidRoundScore { slot, ups } => write!(
                f,
                "Slot {} cannot score {} kills in one round (at most {})",
                slot, ups, MAX_ROUND_UPS
            ),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament (also its storage key).
pub type TournamentId = String;

/// Full tournament state: roster, bracket, runnerups and timestamps.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    /// Every registered player; cumulative stats are rebuilt from match history.
    pub players: Vec<Player>,
    /// Top three of the final, filled once it ends.
    pub winners: Vec<Player>,
    /// Names of players waiting for a second chance, best candidate first.
    pub runnerups: Vec<String>,
    pub tryouts: Vec<GameMatch>,
    pub semis: Vec<GameMatch>,
    #[serde(rename = "final")]
    pub final_match: GameMatch,
    pub opened: Option<DateTime<Utc>>,
    pub started: Option<DateTime<Utc>>,
    pub ended: Option<DateTime<Utc>>,
}

impl Tournament {
    /// Create an open tournament with an empty bracket: four tryouts, two semis, one final.
    pub fn new(id: impl Into<TournamentId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            players: Vec::new(),
            winners: Vec::new(),
            runnerups: Vec::new(),
            tryouts: (0..INITIAL_TRYOUTS)
                .map(|i| GameMatch::new(MatchKind::Tryout, i))
                .collect(),
            semis: (0..2).map(|i| GameMatch::new(MatchKind::Semi, i)).collect(),
            final_match: GameMatch::new(MatchKind::Final, 0),
            opened: Some(Utc::now()),
            started: None,
            ended: None,
        }
    }

    /// Serialize for the storage collaborator.
    pub fn to_snapshot(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Rebuild from a stored snapshot. Matches are addressed by id, so nothing needs relinking.
    pub fn from_snapshot(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    pub fn get_match(&self, id: MatchId) -> Result<&GameMatch, TournamentError> {
        let found = match id.kind {
            MatchKind::Tryout => self.tryouts.get(id.index),
            MatchKind::Semi => self.semis.get(id.index),
            MatchKind::Final if id.index == 0 => Some(&self.final_match),
            MatchKind::Final => None,
        };
        found.ok_or(TournamentError::MatchNotFound(id))
    }

    pub fn get_match_mut(&mut self, id: MatchId) -> Result<&mut GameMatch, TournamentError> {
        let found = match id.kind {
            MatchKind::Tryout => self.tryouts.get_mut(id.index),
            MatchKind::Semi => self.semis.get_mut(id.index),
            MatchKind::Final if id.index == 0 => Some(&mut self.final_match),
            MatchKind::Final => None,
        };
        found.ok_or(TournamentError::MatchNotFound(id))
    }

    /// All matches in play order: tryouts, semis, final.
    pub fn matches(&self) -> impl Iterator<Item = &GameMatch> {
        self.tryouts
            .iter()
            .chain(self.semis.iter())
            .chain(std::iter::once(&self.final_match))
    }

    /// Roster record by name.
    pub fn get_player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn get_player_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.name == name)
    }

    /// Roster record by name, or a zeroed record when the name is unknown.
    pub fn player_or_default(&self, name: &str) -> Player {
        match self.get_player(name) {
            Some(p) => p.clone(),
            None => {
                log::warn!("{}: no player named {} found", self.id, name);
                Player::new(name, None)
            }
        }
    }

    /// Whether `name` may register: roster not full and name unused.
    pub fn can_join(&self, name: &str) -> bool {
        self.players.len() < MAX_PLAYERS && self.get_player(name).is_none()
    }

    /// Register a player. Crossing 16 players on a four-tryout bracket adds four more tryouts.
    ///
    /// Seating is left to [`crate::logic::shuffle_players`].
    pub fn add_player(
        &mut self,
        name: impl Into<String>,
        color: Color,
    ) -> Result<(), TournamentError> {
        let name = name.into();
        if name.is_empty() {
            return Err(TournamentError::InvalidPlayerName);
        }
        if self.started.is_some() {
            return Err(TournamentError::InvalidTransition("tournament already started"));
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(TournamentError::TournamentFull);
        }
        if self.get_player(&name).is_some() {
            return Err(TournamentError::DuplicatePlayerName(name));
        }
        self.players.push(Player::new(name, Some(color)));

        if self.tryouts.len() == INITIAL_TRYOUTS && self.players.len() > 16 {
            log::info!("{}: more than 16 players, adding four tryouts", self.id);
            for i in INITIAL_TRYOUTS..INITIAL_TRYOUTS * 2 {
                self.tryouts.push(GameMatch::new(MatchKind::Tryout, i));
            }
        }
        Ok(())
    }

    /// First match that has not ended: tryouts, then semis, then the final.
    pub fn next_match(&self) -> Result<MatchId, TournamentError> {
        self.matches()
            .find(|m| !m.is_ended())
            .map(GameMatch::id)
            .ok_or(TournamentError::AllMatchesPlayed)
    }

    /// Open for registration.
    pub fn is_open(&self) -> bool {
        self.opened.is_some()
    }

    pub fn is_joinable(&self) -> bool {
        self.is_open() && self.started.is_none() && self.players.len() < MAX_PLAYERS
    }

    /// Ready to be advertised as startable. Stricter than what `start_tournament` accepts.
    pub fn is_startable(&self) -> bool {
        let n = self.players.len();
        self.is_open()
            && self.started.is_none()
            && (MIN_PLAYERS_STARTABLE..=MAX_PLAYERS).contains(&n)
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some() && self.ended.is_none()
    }
}
