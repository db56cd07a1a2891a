//! Guess session lifecycle and state machine.
use crate::compare::{CompareOptions, GuessFeedback, compare};
use crate::constants::{AGE_CLOSE_TOLERANCE_YEARS, DAILY_MAX_ATTEMPTS, STANDARD_MAX_ATTEMPTS};
use crate::player::PlayerRecord;
use crate::roster::Roster;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Game modes. Each mode owns a disjoint persistence namespace and its own
/// session configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Practice,
    Daily,
    Record,
}

impl GameMode {
    pub const ALL: [Self; 3] = [Self::Practice, Self::Daily, Self::Record];

    /// Stable key used in persistence namespaces.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Practice => "practice",
            Self::Daily => "daily",
            Self::Record => "record",
        }
    }
}

/// Per-mode session knobs. These are configuration, not separate code paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub max_attempts: u32,
    pub allow_repeat_guesses: bool,
    pub include_age: bool,
    pub age_tolerance_years: u32,
}

impl SessionConfig {
    #[must_use]
    pub const fn for_mode(mode: GameMode) -> Self {
        match mode {
            GameMode::Daily => Self {
                max_attempts: DAILY_MAX_ATTEMPTS,
                allow_repeat_guesses: false,
                include_age: true,
                age_tolerance_years: AGE_CLOSE_TOLERANCE_YEARS,
            },
            GameMode::Practice | GameMode::Record => Self {
                max_attempts: STANDARD_MAX_ATTEMPTS,
                allow_repeat_guesses: false,
                include_age: false,
                age_tolerance_years: AGE_CLOSE_TOLERANCE_YEARS,
            },
        }
    }
}

/// Session lifecycle state. `Won` and `Lost` are terminal; only starting a
/// new session leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

/// One scored attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessRecord {
    pub primary_name: String,
    pub feedback: GuessFeedback,
    pub is_winning_guess: bool,
}

/// Errors raised when submitting a guess. All are recoverable: the session
/// state is untouched when any of them is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuessError {
    #[error("unknown player: {0}")]
    UnknownPlayer(String),
    #[error("the game is already over")]
    GameAlreadyOver,
    #[error("{0} was already guessed this session")]
    DuplicateGuess(String),
}

/// Serialized session state for persistence (guess history plus the date a
/// daily game was played).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub target: String,
    pub status: GameStatus,
    pub guesses: Vec<GuessRecord>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// One instance of play, from target selection to win or loss.
///
/// Owned exclusively by the mode that created it; never shared across modes.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    mode: GameMode,
    config: SessionConfig,
    target: PlayerRecord,
    guesses: Vec<GuessRecord>,
    status: GameStatus,
}

impl GameSession {
    #[must_use]
    pub fn new(mode: GameMode, config: SessionConfig, target: PlayerRecord) -> Self {
        Self {
            mode,
            config,
            target,
            guesses: Vec::new(),
            status: GameStatus::Playing,
        }
    }

    /// Rebuild a session from a persisted snapshot. The caller is expected
    /// to have verified that the snapshot's target matches `target`.
    #[must_use]
    pub fn restore(
        mode: GameMode,
        config: SessionConfig,
        target: PlayerRecord,
        snapshot: SessionSnapshot,
    ) -> Self {
        Self {
            mode,
            config,
            target,
            guesses: snapshot.guesses,
            status: snapshot.status,
        }
    }

    /// Score a guess against the target and advance the state machine.
    ///
    /// # Errors
    ///
    /// - [`GuessError::GameAlreadyOver`] when the session is terminal.
    /// - [`GuessError::UnknownPlayer`] when the name resolves to no roster
    ///   entry, canonical or alias.
    /// - [`GuessError::DuplicateGuess`] when the resolved player was already
    ///   guessed and the mode rejects repeats.
    pub fn submit_guess(
        &mut self,
        roster: &Roster,
        name: &str,
        today: NaiveDate,
    ) -> Result<&GuessRecord, GuessError> {
        if self.status.is_terminal() {
            return Err(GuessError::GameAlreadyOver);
        }
        let guessed = roster
            .resolve(name)
            .ok_or_else(|| GuessError::UnknownPlayer(name.to_string()))?;
        if !self.config.allow_repeat_guesses
            && self
                .guesses
                .iter()
                .any(|g| g.primary_name == guessed.primary_name)
        {
            return Err(GuessError::DuplicateGuess(guessed.primary_name.clone()));
        }

        let options = CompareOptions {
            include_age: self.config.include_age,
            age_tolerance_years: self.config.age_tolerance_years,
            today,
        };
        let is_winning_guess = guessed
            .primary_name
            .eq_ignore_ascii_case(&self.target.primary_name);
        self.guesses.push(GuessRecord {
            primary_name: guessed.primary_name.clone(),
            feedback: compare(guessed, &self.target, &options),
            is_winning_guess,
        });

        if is_winning_guess {
            self.status = GameStatus::Won;
        } else if self.guesses.len() as u32 >= self.config.max_attempts {
            self.status = GameStatus::Lost;
        }
        Ok(&self.guesses[self.guesses.len() - 1])
    }

    #[must_use]
    pub const fn mode(&self) -> GameMode {
        self.mode
    }

    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// The answer. Exposed for reveal-on-loss and debug surfaces.
    #[must_use]
    pub const fn target(&self) -> &PlayerRecord {
        &self.target
    }

    #[must_use]
    pub fn guesses(&self) -> &[GuessRecord] {
        &self.guesses
    }

    #[must_use]
    pub fn attempts_used(&self) -> u32 {
        self.guesses.len() as u32
    }

    #[must_use]
    pub fn remaining_attempts(&self) -> u32 {
        self.config.max_attempts.saturating_sub(self.attempts_used())
    }

    /// Snapshot the session for persistence.
    #[must_use]
    pub fn snapshot(&self, date: Option<NaiveDate>) -> SessionSnapshot {
        SessionSnapshot {
            target: self.target.primary_name.clone(),
            status: self.status,
            guesses: self.guesses.clone(),
            date,
        }
    }
}
