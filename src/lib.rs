//! Prodle Game Engine
//!
//! Platform-agnostic core logic for Prodle, a guessing game where the player
//! identifies a professional esports competitor from per-attribute feedback.
//! This crate provides target selection, feedback scoring, and session state
//! without UI or platform-specific dependencies.

pub mod compare;
pub mod constants;
pub mod daily;
pub mod player;
pub mod roster;
pub mod sampler;
pub mod session;
pub mod stats;
pub mod store;

// Re-export commonly used types
pub use compare::{AppearanceHint, CompareOptions, GuessFeedback, Verdict, compare};
pub use daily::{DailyTargetCache, daily_seed, daily_target};
pub use player::{AppearanceTier, PlayerRecord, Position, RawPlayer, RosterData};
pub use roster::Roster;
pub use sampler::{SelectError, SelectionWeights, select_target};
pub use session::{
    GameMode, GameSession, GameStatus, GuessError, GuessRecord, SessionConfig, SessionSnapshot,
};
pub use stats::ModeStats;
pub use store::{KeyValueStore, MemoryStore, ModeRepository};

use chrono::NaiveDate;
use rand::Rng;
use std::cell::OnceCell;
use std::rc::Rc;
use thiserror::Error;

/// Trait for abstracting roster loading operations.
/// Platform-specific implementations should provide this.
pub trait RosterLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the bulk roster data from the platform-specific source.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster data cannot be loaded.
    fn load_roster(&self) -> Result<RosterData, Self::Error>;
}

/// Errors surfaced by the engine facade.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The roster source could not be read or parsed. Fatal for the
    /// session; the caller should prompt a retry.
    #[error("roster data unavailable")]
    DataUnavailable(#[source] anyhow::Error),
    #[error(transparent)]
    Select(#[from] SelectError),
}

/// Main engine tying the roster source and persistence together.
///
/// The roster is loaded once and cached for the engine's lifetime; the
/// engine is an explicitly constructed service meant to be injected into
/// the presentation layer, not ambient global state.
pub struct GameEngine<L, S>
where
    L: RosterLoader,
    S: KeyValueStore,
{
    loader: L,
    repo: ModeRepository<S>,
    roster: OnceCell<Rc<Roster>>,
}

impl<L, S> GameEngine<L, S>
where
    L: RosterLoader,
    S: KeyValueStore,
{
    /// Create a new engine with the provided roster loader and store.
    #[must_use]
    pub const fn new(loader: L, store: S) -> Self {
        Self {
            loader,
            repo: ModeRepository::new(store),
            roster: OnceCell::new(),
        }
    }

    /// Typed access to persisted settings, stats, and snapshots.
    #[must_use]
    pub const fn repository(&self) -> &ModeRepository<S> {
        &self.repo
    }

    /// The normalized roster, loaded from the source on first access and
    /// cached afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DataUnavailable`] if the source fails.
    pub fn roster(&self) -> Result<Rc<Roster>, EngineError> {
        if let Some(roster) = self.roster.get() {
            return Ok(Rc::clone(roster));
        }
        let data = self
            .loader
            .load_roster()
            .map_err(|err| EngineError::DataUnavailable(err.into()))?;
        let roster = Rc::new(Roster::from_data(data));
        Ok(Rc::clone(self.roster.get_or_init(|| roster)))
    }

    /// Start a session with a freshly drawn random target, using the mode's
    /// persisted weights and retired probability.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster cannot be loaded or is empty.
    pub fn start_session<R: Rng>(
        &self,
        mode: GameMode,
        rng: &mut R,
    ) -> Result<GameSession, EngineError> {
        let roster = self.roster()?;
        let weights = self.repo.weights(mode);
        let probability = self.repo.retired_probability(mode);
        let target = select_target(&roster, &weights, probability, rng)?.clone();
        Ok(GameSession::new(mode, SessionConfig::for_mode(mode), target))
    }

    /// Start (or resume) the daily session for `today`.
    ///
    /// The target is the cached one when the cache is from the same date,
    /// otherwise the deterministic draw for the date; a same-day persisted
    /// snapshot for the same target restores the in-progress game.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster cannot be loaded or is empty.
    pub fn start_daily(&self, today: NaiveDate) -> Result<GameSession, EngineError> {
        let roster = self.roster()?;

        let cached = self
            .repo
            .daily_target_cache()
            .filter(|cache| cache.date == today)
            .and_then(|cache| roster.get(&cache.primary_name).cloned());
        let target = match cached {
            Some(target) => target,
            None => {
                let weights = self.repo.weights(GameMode::Daily);
                let probability = self.repo.retired_probability(GameMode::Daily);
                let target = daily_target(&roster, &weights, probability, today)?.clone();
                let cache = DailyTargetCache {
                    date: today,
                    primary_name: target.primary_name.clone(),
                };
                if let Err(err) = self.repo.set_daily_target_cache(&cache) {
                    log::warn!("failed to cache daily target: {err}");
                }
                target
            }
        };

        let config = SessionConfig::for_mode(GameMode::Daily);
        if let Some(snapshot) = self.repo.session_snapshot(GameMode::Daily)
            && snapshot.date == Some(today)
            && snapshot.target == target.primary_name
        {
            return Ok(GameSession::restore(GameMode::Daily, config, target, snapshot));
        }
        Ok(GameSession::new(GameMode::Daily, config, target))
    }

    /// Persist the session snapshot for its mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    pub fn save_session(
        &self,
        session: &GameSession,
        date: Option<NaiveDate>,
    ) -> Result<(), S::Error> {
        self.repo
            .set_session_snapshot(session.mode(), &session.snapshot(date))
    }

    /// Fold a finished session into the mode's aggregate stats. Sessions
    /// still in play are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    pub fn record_outcome(&self, session: &GameSession) -> Result<(), S::Error> {
        let mut stats = self.repo.stats(session.mode());
        match session.status() {
            GameStatus::Won => stats.record_win(session.attempts_used()),
            GameStatus::Lost => stats.record_loss(),
            GameStatus::Playing => return Ok(()),
        }
        self.repo.set_stats(session.mode(), &stats)
    }

    /// Clear every persisted game key across all modes. Called on logout so
    /// no stats or session state leaks into a new identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    pub fn clear_profile(&self) -> Result<(), S::Error> {
        self.repo.clear_all()
    }
}
