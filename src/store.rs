//! Typed persistence repository over a string-keyed store.
//!
//! Each mode uses a disjoint key namespace (`prodle.<mode>.<field>`), and
//! the logout invariant (clear every game key as one logical operation) is
//! enforced here instead of by enumerated key lists at call sites. Corrupt
//! stored values fall back to defaults rather than propagate.
use crate::constants::{DEFAULT_RETIRED_PROBABILITY, RETIRED_PROBABILITY_MAX, STORAGE_PREFIX};
use crate::daily::DailyTargetCache;
use crate::sampler::SelectionWeights;
use crate::session::{GameMode, SessionSnapshot};
use crate::stats::ModeStats;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;

/// String-keyed storage collaborator (browser local storage, a file, an
/// in-memory map). Implementations are provided by the embedding platform.
pub trait KeyValueStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Write a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Delete a value. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

/// Fields persisted per mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum StoreField {
    Weights,
    RetiredProbability,
    Stats,
    Session,
    DailyTarget,
}

impl StoreField {
    const ALL: [Self; 5] = [
        Self::Weights,
        Self::RetiredProbability,
        Self::Stats,
        Self::Session,
        Self::DailyTarget,
    ];

    const fn key(self) -> &'static str {
        match self {
            Self::Weights => "weights",
            Self::RetiredProbability => "retired-probability",
            Self::Stats => "stats",
            Self::Session => "session",
            Self::DailyTarget => "daily-target",
        }
    }
}

/// Typed accessors over the raw store.
#[derive(Debug, Clone)]
pub struct ModeRepository<S> {
    store: S,
}

impl<S: KeyValueStore> ModeRepository<S> {
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    fn key(mode: GameMode, field: StoreField) -> String {
        format!("{STORAGE_PREFIX}.{}.{}", mode.key(), field.key())
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(value) => value?,
            Err(err) => {
                log::warn!("failed to read {key}: {err}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("discarding corrupt value at {key}: {err}");
                None
            }
        }
    }

    /// Record fields are stored as JSON objects. Any other shape is discarded
    /// as corrupt; a JSON array would otherwise decode into struct fields
    /// positionally and smuggle in inconsistent values.
    fn read_record<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value: serde_json::Value = self.read_json(key)?;
        if !value.is_object() {
            log::warn!("discarding corrupt value at {key}: expected a JSON object");
            return None;
        }
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                log::warn!("discarding corrupt value at {key}: {err}");
                None
            }
        }
    }

    fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), S::Error> {
        let encoded = serde_json::to_string(value).expect("plain data types always encode");
        self.store.set(key, &encoded)
    }

    /// Selection weights for a mode, or defaults when unset or corrupt.
    /// Hand-edited values outside the percentage range are clamped.
    #[must_use]
    pub fn weights(&self, mode: GameMode) -> SelectionWeights {
        self.read_record(&Self::key(mode, StoreField::Weights))
            .map(SelectionWeights::clamped)
            .unwrap_or_default()
    }

    /// Persist weights in their UI-facing form, re-normalized to sum 100.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    pub fn set_weights(&self, mode: GameMode, weights: SelectionWeights) -> Result<(), S::Error> {
        self.write_json(&Self::key(mode, StoreField::Weights), &weights.normalized())
    }

    /// Retired-draw probability (percent), or the default when unset.
    #[must_use]
    pub fn retired_probability(&self, mode: GameMode) -> u32 {
        self.read_json::<u32>(&Self::key(mode, StoreField::RetiredProbability))
            .map_or(DEFAULT_RETIRED_PROBABILITY, |p| {
                p.min(RETIRED_PROBABILITY_MAX)
            })
    }

    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    pub fn set_retired_probability(&self, mode: GameMode, percent: u32) -> Result<(), S::Error> {
        self.write_json(
            &Self::key(mode, StoreField::RetiredProbability),
            &percent.min(RETIRED_PROBABILITY_MAX),
        )
    }

    #[must_use]
    pub fn stats(&self, mode: GameMode) -> ModeStats {
        self.read_record(&Self::key(mode, StoreField::Stats))
            .unwrap_or_default()
    }

    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    pub fn set_stats(&self, mode: GameMode, stats: &ModeStats) -> Result<(), S::Error> {
        self.write_json(&Self::key(mode, StoreField::Stats), stats)
    }

    #[must_use]
    pub fn session_snapshot(&self, mode: GameMode) -> Option<SessionSnapshot> {
        self.read_record(&Self::key(mode, StoreField::Session))
    }

    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    pub fn set_session_snapshot(
        &self,
        mode: GameMode,
        snapshot: &SessionSnapshot,
    ) -> Result<(), S::Error> {
        self.write_json(&Self::key(mode, StoreField::Session), snapshot)
    }

    #[must_use]
    pub fn daily_target_cache(&self) -> Option<DailyTargetCache> {
        self.read_record(&Self::key(GameMode::Daily, StoreField::DailyTarget))
    }

    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    pub fn set_daily_target_cache(&self, cache: &DailyTargetCache) -> Result<(), S::Error> {
        self.write_json(&Self::key(GameMode::Daily, StoreField::DailyTarget), cache)
    }

    /// Remove every persisted field for one mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    pub fn clear_mode(&self, mode: GameMode) -> Result<(), S::Error> {
        for field in StoreField::ALL {
            self.store.remove(&Self::key(mode, field))?;
        }
        Ok(())
    }

    /// Remove every persisted game key across all modes, as one logical
    /// operation. Used on logout to prevent stats and session leakage into
    /// a new identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    pub fn clear_all(&self) -> Result<(), S::Error> {
        for mode in GameMode::ALL {
            self.clear_mode(mode)?;
        }
        Ok(())
    }
}

/// In-memory store for tests and headless use.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Snapshot of all keys, for asserting namespace invariants in tests.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }
}

impl KeyValueStore for MemoryStore {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
