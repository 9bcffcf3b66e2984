//! Session state machine
//!
//! Tracks one player's run: phase, score, lives, streak, and per-mode
//! high scores. All transitions are synchronous and infallible once
//! validated; invalid transitions are rejected with an error the caller
//! can ignore (the double-click and stale-timer guard).

use std::collections::BTreeMap;
use std::mem;

use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::info;

use crate::catalog::Catalog;
use crate::core::rng::DeterministicRng;

use super::evaluate::{evaluate, Guess};
use super::events::SessionEvent;
use super::round::{generate_round, GameMode, Round, RoundConfig, RoundError};

/// Lives at the start of every run.
pub const STARTING_LIVES: u32 = 3;

/// Where the session currently is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No round in flight; mode selection.
    #[default]
    Menu,
    /// A round is active and awaiting a guess.
    RoundActive,
    /// The last guess was judged; awaiting the next round.
    RoundResolved,
    /// Lives reached zero; only restart is allowed.
    GameOver,
}

/// Rejected session transitions.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Round generation failed.
    #[error(transparent)]
    Round(#[from] RoundError),

    /// The operation is not allowed in the current phase. Submitting
    /// twice for one round or ticking a stale timer lands here.
    #[error("operation not allowed in phase {0:?}")]
    InvalidPhase(SessionPhase),
}

/// One player's quiz run.
#[derive(Debug)]
pub struct Session {
    phase: SessionPhase,
    round: Option<Round>,
    score: u32,
    lives: u32,
    streak: u32,
    best_streak: u32,
    high_scores: BTreeMap<GameMode, u32>,
    config: RoundConfig,
    pending_events: Vec<SessionEvent>,
}

impl Session {
    /// Fresh session with default round configuration.
    pub fn new() -> Self {
        Self::with_config(RoundConfig::default())
    }

    /// Fresh session with custom round configuration.
    pub fn with_config(config: RoundConfig) -> Self {
        Self {
            phase: SessionPhase::Menu,
            round: None,
            score: 0,
            lives: STARTING_LIVES,
            streak: 0,
            best_streak: 0,
            high_scores: BTreeMap::new(),
            config,
            pending_events: Vec::new(),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The active (or just-resolved) round, if any.
    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// Current score.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Lives remaining.
    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Current streak.
    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Best streak this run.
    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    /// Stored high score for a mode (0 when unset).
    pub fn high_score(&self, mode: GameMode) -> u32 {
        self.high_scores.get(&mode).copied().unwrap_or(0)
    }

    /// All stored high scores.
    pub fn high_scores(&self) -> &BTreeMap<GameMode, u32> {
        &self.high_scores
    }

    /// Merge an externally stored high score. Only ever raises the
    /// in-session value; returns the authoritative result.
    pub fn merge_high_score(&mut self, mode: GameMode, value: u32) -> u32 {
        let entry = self.high_scores.entry(mode).or_insert(0);
        *entry = (*entry).max(value);
        *entry
    }

    /// Start a round for `mode`. Allowed from the menu or after a
    /// resolved round; a game-over session must restart first.
    pub fn start_round(
        &mut self,
        catalog: &Catalog,
        mode: GameMode,
        date: &str,
        rng: &mut DeterministicRng,
    ) -> Result<&Round, SessionError> {
        match self.phase {
            SessionPhase::Menu | SessionPhase::RoundResolved => {}
            phase => return Err(SessionError::InvalidPhase(phase)),
        }

        let round = generate_round(catalog, mode, date, rng, &self.config)?;
        self.pending_events.push(SessionEvent::RoundStarted { mode });
        self.phase = SessionPhase::RoundActive;
        Ok(self.round.insert(round))
    }

    /// Judge a guess against the active round and apply score, streak,
    /// lives, and high-score updates. Returns whether the guess was
    /// correct. Exactly one submission is judged per round; later calls
    /// fail with [`SessionError::InvalidPhase`].
    pub fn submit(&mut self, guess: &Guess) -> Result<bool, SessionError> {
        if self.phase != SessionPhase::RoundActive {
            return Err(SessionError::InvalidPhase(self.phase));
        }
        let round = self
            .round
            .as_ref()
            .ok_or(SessionError::InvalidPhase(self.phase))?;

        let correct = evaluate(round, guess);
        let mode = round.mode;

        if correct {
            self.score += 1;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);

            let record = self.high_scores.entry(mode).or_insert(0);
            if self.score > *record {
                *record = self.score;
                self.pending_events.push(SessionEvent::NewHighScore {
                    mode,
                    value: self.score,
                });
            }
        } else {
            self.lives = self.lives.saturating_sub(1);
            self.streak = 0;
        }

        self.pending_events.push(SessionEvent::AnswerJudged {
            mode,
            correct,
            score: self.score,
            lives: self.lives,
            streak: self.streak,
        });

        if self.lives == 0 {
            info!(final_score = self.score, best_streak = self.best_streak, "run over");
            self.pending_events.push(SessionEvent::GameOver {
                final_score: self.score,
                best_streak: self.best_streak,
            });
            self.phase = SessionPhase::GameOver;
        } else {
            self.phase = SessionPhase::RoundResolved;
        }

        Ok(correct)
    }

    /// Judge a timer expiry. Same path as a wrong guess; a stale expiry
    /// (the round was already resolved) is rejected and harmless.
    pub fn timeout(&mut self) -> Result<bool, SessionError> {
        self.submit(&Guess::None)
    }

    /// Leave a resolved round and return to the menu.
    pub fn to_menu(&mut self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::RoundResolved | SessionPhase::Menu => {
                self.phase = SessionPhase::Menu;
                self.round = None;
                Ok(())
            }
            phase => Err(SessionError::InvalidPhase(phase)),
        }
    }

    /// Reset a finished run. Score, lives, and streak return to their
    /// starting values; high scores survive.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        if self.phase != SessionPhase::GameOver {
            return Err(SessionError::InvalidPhase(self.phase));
        }
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.streak = 0;
        self.best_streak = 0;
        self.round = None;
        self.phase = SessionPhase::Menu;
        Ok(())
    }

    /// Drain queued events.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        mem::take(&mut self.pending_events)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================
