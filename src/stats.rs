//! Aggregate play statistics per mode.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Games played, win streaks, and the distribution of winning attempt
/// counts for a single mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ModeStats {
    #[serde(default)]
    pub played: u32,
    #[serde(default)]
    pub won: u32,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub max_streak: u32,
    /// Attempt count of each win; only wins count toward the average.
    #[serde(default)]
    pub total_winning_guesses: u32,
    /// Winning attempt count -> number of wins at that count.
    #[serde(default)]
    pub guess_distribution: BTreeMap<u32, u32>,
}

impl ModeStats {
    pub fn record_win(&mut self, attempts: u32) {
        self.played += 1;
        self.won += 1;
        self.current_streak += 1;
        self.max_streak = self.max_streak.max(self.current_streak);
        self.total_winning_guesses += attempts;
        *self.guess_distribution.entry(attempts).or_insert(0) += 1;
    }

    pub fn record_loss(&mut self) {
        self.played += 1;
        self.current_streak = 0;
    }

    #[must_use]
    pub fn win_percentage(&self) -> f64 {
        if self.played == 0 {
            return 0.0;
        }
        f64::from(self.won) * 100.0 / f64::from(self.played)
    }

    /// Average attempts per win (the record mode's score).
    #[must_use]
    pub fn average_attempts(&self) -> Option<f64> {
        if self.won == 0 {
            return None;
        }
        Some(f64::from(self.total_winning_guesses) / f64::from(self.won))
    }
}
