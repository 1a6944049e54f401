//! Player record, stat mutations and ranking comparators.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Players are identified by their name within a tournament.
pub type PlayerName = String;

/// The fixed archer colour palette.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Green,
    Blue,
    Pink,
    Orange,
    White,
    Yellow,
    Cyan,
    Purple,
    Red,
}

impl Color {
    pub const ALL: [Color; 9] = [
        Color::Green,
        Color::Blue,
        Color::Pink,
        Color::Orange,
        Color::White,
        Color::Yellow,
        Color::Cyan,
        Color::Purple,
        Color::Red,
    ];
}

/// Which counter a judge action targets.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Kills,
    Shots,
    Sweeps,
    #[serde(rename = "self")]
    SelfKills,
    Explosions,
}

/// Add (`up`) or remove (`down`) one unit of a stat.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

/// One row of a score table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ScoreData {
    pub key: &'static str,
    pub value: u32,
}

/// A player seated in a match, or the cumulative roster record.
///
/// An empty name marks a placeholder ("prefill") occupying an unfilled slot.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: PlayerName,
    pub preferred_color: Option<Color>,
    pub shots: u32,
    pub sweeps: u32,
    pub kills: u32,
    #[serde(rename = "self")]
    pub self_kills: u32,
    pub explosions: u32,
    /// Matches folded into this record by [`Player::update`].
    pub matches: u32,
    #[serde(rename = "score")]
    pub total_score: u32,
}

impl Player {
    /// Create a new player with the given name and colour. Counters start at zero.
    pub fn new(name: impl Into<PlayerName>, preferred_color: Option<Color>) -> Self {
        Self {
            name: name.into(),
            preferred_color,
            ..Self::default()
        }
    }

    /// An empty slot filler.
    pub fn prefill() -> Self {
        Self::default()
    }

    pub fn is_prefill(&self) -> bool {
        self.name.is_empty()
    }

    /// Entertainment score used for ranking; a sweep is effectively worth 14.
    ///
    /// Saturates at `u32::MAX` instead of wrapping.
    pub fn score(&self) -> u32 {
        self.sweeps
            .saturating_mul(5)
            .saturating_add(self.shots.saturating_mul(3))
            .saturating_add(self.kills.saturating_mul(2))
            .saturating_add(self.self_kills)
            .saturating_add(self.explosions)
    }

    pub fn score_data(&self) -> Vec<ScoreData> {
        vec![
            ScoreData { key: "kills", value: self.kills },
            ScoreData { key: "shots", value: self.shots },
            ScoreData { key: "sweeps", value: self.sweeps },
            ScoreData { key: "self", value: self.self_kills },
            ScoreData { key: "explosions", value: self.explosions },
        ]
    }

    pub fn add_shot(&mut self) {
        self.shots = self.shots.saturating_add(1);
    }

    /// Fails silently if shots are zero.
    pub fn remove_shot(&mut self) {
        self.shots = self.shots.saturating_sub(1);
    }

    /// A sweep also counts as a shot and three kills.
    pub fn add_sweep(&mut self) {
        self.sweeps = self.sweeps.saturating_add(1);
        self.add_shot();
        self.add_kills(3);
    }

    /// Fails silently if sweeps are zero.
    pub fn remove_sweep(&mut self) {
        if self.sweeps == 0 {
            return;
        }
        self.sweeps -= 1;
        self.remove_shot();
        for _ in 0..3 {
            self.remove_kill();
        }
    }

    pub fn add_kill(&mut self) {
        self.add_kills(1);
    }

    pub fn add_kills(&mut self, kills: u32) {
        self.kills = self.kills.saturating_add(kills);
    }

    /// Fails silently if kills are zero.
    pub fn remove_kill(&mut self) {
        self.kills = self.kills.saturating_sub(1);
    }

    /// Killing yourself costs a kill and gives the opponents a shot.
    pub fn add_self(&mut self) {
        self.self_kills = self.self_kills.saturating_add(1);
        self.remove_kill();
        self.add_shot();
    }

    /// Fails silently if selfs are zero.
    pub fn remove_self(&mut self) {
        if self.self_kills == 0 {
            return;
        }
        self.self_kills -= 1;
        self.add_kill();
        self.remove_shot();
    }

    pub fn add_explosion(&mut self) {
        self.explosions = self.explosions.saturating_add(1);
        self.add_shot();
        self.add_kill();
    }

    /// Fails silently if explosions are zero.
    pub fn remove_explosion(&mut self) {
        if self.explosions == 0 {
            return;
        }
        self.explosions -= 1;
        self.remove_shot();
        self.remove_kill();
    }

    /// Apply a single judge correction.
    pub fn apply(&mut self, stat: StatKind, direction: Direction) {
        match (stat, direction) {
            (StatKind::Kills, Direction::Up) => self.add_kill(),
            (StatKind::Kills, Direction::Down) => self.remove_kill(),
            (StatKind::Shots, Direction::Up) => self.add_shot(),
            (StatKind::Shots, Direction::Down) => self.remove_shot(),
            (StatKind::Sweeps, Direction::Up) => self.add_sweep(),
            (StatKind::Sweeps, Direction::Down) => self.remove_sweep(),
            (StatKind::SelfKills, Direction::Up) => self.add_self(),
            (StatKind::SelfKills, Direction::Down) => self.remove_self(),
            (StatKind::Explosions, Direction::Up) => self.add_explosion(),
            (StatKind::Explosions, Direction::Down) => self.remove_explosion(),
        }
    }

    /// Zero the stat counters and matches played. Run whenever a match (re)starts.
    ///
    /// `total_score` is left alone; it is only a cached value that `update` recomputes.
    pub fn reset(&mut self) {
        self.shots = 0;
        self.sweeps = 0;
        self.kills = 0;
        self.self_kills = 0;
        self.explosions = 0;
        self.matches = 0;
    }

    /// Fold the stats of one match into this cumulative record.
    pub fn update(&mut self, other: &Player) {
        self.shots = self.shots.saturating_add(other.shots);
        self.sweeps = self.sweeps.saturating_add(other.sweeps);
        self.kills = self.kills.saturating_add(other.kills);
        self.self_kills = self.self_kills.saturating_add(other.self_kills);
        self.explosions = self.explosions.saturating_add(other.explosions);
        self.total_score = self.score();
        // Every call counts as one match played.
        self.matches = self.matches.saturating_add(1);
    }
}

/// Highest score first.
pub fn by_score(a: &Player, b: &Player) -> Ordering {
    b.score().cmp(&a.score())
}

/// Most kills first.
pub fn by_kills(a: &Player, b: &Player) -> Ordering {
    b.kills.cmp(&a.kills)
}

/// Fewest matches played first, then highest score.
///
/// Favors players who have had fewer chances when refilling a bracket.
pub fn by_runnerup(a: &Player, b: &Player) -> Ordering {
    a.matches
        .cmp(&b.matches)
        .then_with(|| b.score().cmp(&a.score()))
}
