//! Match (game): four player slots, lifecycle timestamps and round commits.

use crate::models::player::{by_score, Color, Player};
use crate::models::tournament::TournamentError;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of slots in every match.
pub const MATCH_SLOTS: usize = 4;

/// Round of the bracket a match belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Tryout,
    Semi,
    Final,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Tryout => "tryout",
            MatchKind::Semi => "semi",
            MatchKind::Final => "final",
        }
    }
}

impl std::str::FromStr for MatchKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tryout" => Ok(MatchKind::Tryout),
            "semi" => Ok(MatchKind::Semi),
            "final" => Ok(MatchKind::Final),
            other => Err(format!("unknown match kind: {other}")),
        }
    }
}

/// Address of a match inside its tournament.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct MatchId {
    pub kind: MatchKind,
    pub index: usize,
}

impl MatchId {
    pub fn new(kind: MatchKind, index: usize) -> Self {
        Self { kind, index }
    }

    pub fn tryout(index: usize) -> Self {
        Self::new(MatchKind::Tryout, index)
    }

    pub fn semi(index: usize) -> Self {
        Self::new(MatchKind::Semi, index)
    }

    pub fn final_match() -> Self {
        Self::new(MatchKind::Final, 0)
    }

    /// External address, e.g. `/spring-cup/tryout/2/`.
    pub fn path(&self, tournament_id: &str) -> String {
        format!("/{}/{}/{}/", tournament_id, self.kind.as_str(), self.index)
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.as_str(), self.index)
    }
}

/// Kills one player can make in a single round; reaching it is a sweep.
pub const MAX_ROUND_UPS: u32 = 3;

/// Per-slot result of one round: kills (`ups`) and self-eliminations (`downs`).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundScore {
    pub ups: u32,
    pub downs: u32,
}

/// A single four-player match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub kind: MatchKind,
    pub index: usize,
    /// Always four entries once constructed; unfilled slots hold placeholders.
    pub players: Vec<Player>,
    pub started: Option<DateTime<Utc>>,
    pub ended: Option<DateTime<Utc>>,
}

impl GameMatch {
    /// Create an empty, prefilled match.
    pub fn new(kind: MatchKind, index: usize) -> Self {
        let mut m = Self {
            kind,
            index,
            players: Vec::with_capacity(MATCH_SLOTS),
            started: None,
            ended: None,
        };
        m.prefill();
        m
    }

    pub fn id(&self) -> MatchId {
        MatchId::new(self.kind, self.index)
    }

    /// Human-readable title: "Tryout 2/4", "Semi 1/2" or "Final".
    pub fn title(&self, tryout_count: usize) -> String {
        match self.kind {
            MatchKind::Final => "Final".to_string(),
            MatchKind::Tryout => format!("Tryout {}/{}", self.index + 1, tryout_count),
            MatchKind::Semi => format!("Semi {}/2", self.index + 1),
        }
    }

    /// Number of kills needed before the match may be ended.
    pub fn length(&self) -> u32 {
        match self.kind {
            MatchKind::Final => 20,
            _ => 10,
        }
    }

    /// Number of non-placeholder players seated.
    pub fn actual_players(&self) -> usize {
        self.players.iter().filter(|p| !p.is_prefill()).count()
    }

    pub fn is_full(&self) -> bool {
        self.actual_players() == MATCH_SLOTS
    }

    /// Slot index of a seated player.
    pub fn slot_of(&self, name: &str) -> Option<usize> {
        if name.is_empty() {
            return None;
        }
        self.players.iter().position(|p| p.name == name)
    }

    /// Seat a player: replaces the first placeholder if all slots exist, otherwise appends.
    pub fn add_player(&mut self, mut player: Player) -> Result<(), TournamentError> {
        if self.actual_players() >= MATCH_SLOTS {
            return Err(TournamentError::MatchFull(self.id()));
        }
        player.reset();
        if self.players.len() >= MATCH_SLOTS {
            if let Some(slot) = self.players.iter_mut().find(|p| p.is_prefill()) {
                *slot = player;
            }
        } else {
            self.players.push(player);
        }
        Ok(())
    }

    /// Fill remaining slots with placeholders.
    pub fn prefill(&mut self) {
        while self.players.len() < MATCH_SLOTS {
            self.players.push(Player::prefill());
        }
    }

    /// Drop every seated player, leaving four placeholders.
    pub fn clear(&mut self) {
        self.players.clear();
        self.prefill();
    }

    pub fn is_started(&self) -> bool {
        self.started.is_some()
    }

    pub fn is_ended(&self) -> bool {
        self.ended.is_some()
    }

    pub fn can_start(&self) -> bool {
        !self.is_started() && !self.is_ended()
    }

    /// Started but not yet ended.
    pub fn is_open(&self) -> bool {
        self.is_started() && !self.is_ended()
    }

    /// Open, and at least one player has reached the kill target.
    pub fn can_end(&self) -> bool {
        self.is_open() && self.players.iter().any(|p| p.kills >= self.length())
    }

    /// Reassign colours so no two real players share one.
    ///
    /// Of a conflicting pair, the higher (or equal) score keeps its colour and the
    /// other gets a random colour not used by any slot.
    pub fn correct_color_conflicts<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for i in 0..self.players.len() {
            for j in (i + 1)..self.players.len() {
                let (a, b) = (&self.players[i], &self.players[j]);
                if a.is_prefill() || b.is_prefill() || a.preferred_color.is_none() {
                    continue;
                }
                if a.preferred_color != b.preferred_color {
                    continue;
                }
                let loser = if a.score() >= b.score() { j } else { i };
                let color = self.unused_color(rng);
                log::debug!(
                    "{}: colour conflict, {} now plays {:?}",
                    self.id(),
                    self.players[loser].name,
                    color
                );
                self.players[loser].preferred_color = color;
            }
        }
    }

    fn unused_color<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Color> {
        let free: Vec<Color> = Color::ALL
            .iter()
            .copied()
            .filter(|c| !self.players.iter().any(|p| p.preferred_color == Some(*c)))
            .collect();
        free.choose(rng).copied()
    }

    /// Mark the match as started and zero the in-match stats.
    pub fn begin<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), TournamentError> {
        if self.is_started() {
            return Err(TournamentError::InvalidTransition("match already started"));
        }
        self.correct_color_conflicts(rng);
        for p in &mut self.players {
            p.reset();
        }
        self.started = Some(Utc::now());
        Ok(())
    }

    /// Give the leader one last shot and mark the match as ended.
    pub fn finish(&mut self) -> Result<(), TournamentError> {
        if !self.is_started() {
            return Err(TournamentError::InvalidTransition("match not started"));
        }
        if self.is_ended() {
            return Err(TournamentError::InvalidTransition("match already ended"));
        }
        let leader = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_prefill())
            .min_by(|(_, a), (_, b)| by_score(a, b))
            .map(|(i, _)| i);
        if let Some(i) = leader {
            self.players[i].add_shot();
        }
        self.ended = Some(Utc::now());
        Ok(())
    }

    /// Apply one round of results, in slot order.
    ///
    /// `ups == 3` is a sweep. No player gets more than one shot per round, so a sweep
    /// combined with a self-elimination drops the sweep's shot before the self adds its own.
    /// The whole round is rejected, and nothing applied, if any slot claims more than a sweep.
    pub fn commit(&mut self, scores: &[RoundScore], shots: &[bool]) -> Result<(), TournamentError> {
        if !self.is_open() {
            return Err(TournamentError::InvalidTransition("match is not being played"));
        }
        let invalid = scores.iter().enumerate().find(|(_, s)| s.ups > MAX_ROUND_UPS);
        if let Some((slot, score)) = invalid {
            return Err(TournamentError::InvalidRoundScore { slot, ups: score.ups });
        }
        for (player, score) in self.players.iter_mut().zip(scores) {
            if score.ups == MAX_ROUND_UPS {
                player.add_sweep();
                if score.downs != 0 {
                    player.remove_shot();
                }
            } else if score.ups > 0 {
                player.add_kills(score.ups);
            }
            if score.downs != 0 {
                player.add_self();
            }
        }
        for (player, &shot) in self.players.iter_mut().zip(shots) {
            if shot {
                player.add_shot();
            }
        }
        Ok(())
    }
}
