//! Weighted target selection logic.
use crate::constants::{
    DEFAULT_WEIGHT_HIGH, DEFAULT_WEIGHT_LOW, DEFAULT_WEIGHT_MEDIUM, WEIGHT_NORMALIZED_TOTAL,
};
use crate::player::{AppearanceTier, PlayerRecord};
use crate::roster::Roster;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-tier draw weights, expressed as percentages.
///
/// The weights need not sum to 100 at draw time; the draw normalizes
/// proportionally. The persisted, UI-facing form is re-normalized to sum
/// exactly 100 on save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionWeights {
    #[serde(default)]
    pub low: u32,
    #[serde(default)]
    pub medium: u32,
    #[serde(default)]
    pub high: u32,
}

impl Default for SelectionWeights {
    fn default() -> Self {
        Self {
            low: DEFAULT_WEIGHT_LOW,
            medium: DEFAULT_WEIGHT_MEDIUM,
            high: DEFAULT_WEIGHT_HIGH,
        }
    }
}

impl SelectionWeights {
    /// Sum of the components, saturating on out-of-range inputs.
    #[must_use]
    pub const fn total(self) -> u32 {
        self.low.saturating_add(self.medium).saturating_add(self.high)
    }

    /// Weight for a given tier.
    #[must_use]
    pub const fn for_tier(self, tier: AppearanceTier) -> u32 {
        match tier {
            AppearanceTier::Low => self.low,
            AppearanceTier::Medium => self.medium,
            AppearanceTier::High => self.high,
        }
    }

    /// Clamp each component into the percentage range. Applied when reading
    /// weights back from a store, where hand-edited values may exceed it.
    #[must_use]
    pub const fn clamped(self) -> Self {
        Self {
            low: if self.low > WEIGHT_NORMALIZED_TOTAL {
                WEIGHT_NORMALIZED_TOTAL
            } else {
                self.low
            },
            medium: if self.medium > WEIGHT_NORMALIZED_TOTAL {
                WEIGHT_NORMALIZED_TOTAL
            } else {
                self.medium
            },
            high: if self.high > WEIGHT_NORMALIZED_TOTAL {
                WEIGHT_NORMALIZED_TOTAL
            } else {
                self.high
            },
        }
    }

    /// Re-scale so the components sum to exactly 100.
    ///
    /// All-zero weights normalize to the defaults rather than an unusable
    /// zero configuration.
    #[must_use]
    pub fn normalized(self) -> Self {
        let total = u64::from(self.low) + u64::from(self.medium) + u64::from(self.high);
        if total == 0 {
            return Self::default();
        }
        // Each ratio is at most WEIGHT_NORMALIZED_TOTAL, so the cast is exact.
        let scale =
            |part: u32| (u64::from(part) * u64::from(WEIGHT_NORMALIZED_TOTAL) / total) as u32;
        let low = scale(self.low);
        let medium = scale(self.medium);
        Self {
            low,
            medium,
            high: WEIGHT_NORMALIZED_TOTAL - low - medium,
        }
    }
}

/// Errors raised while drawing a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("cannot select a target from an empty roster")]
    EmptyRoster,
}

/// Draw a target from the roster.
///
/// Two-stage draw: a tier is chosen by weighted random choice, a provisional
/// pick is drawn uniformly within it, then `retired_probability` (percent)
/// decides whether the pick should be a retired/inactive player. When the
/// provisional pick disagrees with that outcome, one uniform re-draw is made
/// from the matching subset of the pool; if the subset is empty the
/// provisional pick stands. No retry loops, so the draw always terminates.
///
/// Deterministic given a seeded `rng`.
///
/// # Errors
///
/// Returns [`SelectError::EmptyRoster`] when the roster has no players.
pub fn select_target<'r, R: Rng>(
    roster: &'r Roster,
    weights: &SelectionWeights,
    retired_probability: u32,
    rng: &mut R,
) -> Result<&'r PlayerRecord, SelectError> {
    if roster.is_empty() {
        return Err(SelectError::EmptyRoster);
    }

    let mut tiers: [Vec<&PlayerRecord>; 3] = [Vec::new(), Vec::new(), Vec::new()];
    for player in roster.players() {
        let slot = match player.tier() {
            AppearanceTier::Low => 0,
            AppearanceTier::Medium => 1,
            AppearanceTier::High => 2,
        };
        tiers[slot].push(player);
    }
    log::debug!(
        "tier sizes: low={} medium={} high={}",
        tiers[0].len(),
        tiers[1].len(),
        tiers[2].len()
    );

    let tier_weights: Vec<(usize, u32)> = AppearanceTier::ALL
        .iter()
        .enumerate()
        .map(|(idx, tier)| (idx, weights.for_tier(*tier)))
        .collect();

    let pool: Vec<&PlayerRecord> = match choose_weighted(&tier_weights, rng) {
        Some(idx) if !tiers[idx].is_empty() => tiers[idx].clone(),
        _ => {
            // Zero total weight or an empty chosen tier: uniform over everyone.
            log::debug!("falling back to the full roster pool");
            tiers.into_iter().flatten().collect()
        }
    };

    let provisional = pool[rng.gen_range(0..pool.len())];
    Ok(correct_for_retired_status(&pool, provisional, retired_probability, rng))
}

/// Enforce the retired-vs-active probability on a provisional pick.
fn correct_for_retired_status<'r, R: Rng>(
    pool: &[&'r PlayerRecord],
    provisional: &'r PlayerRecord,
    retired_probability: u32,
    rng: &mut R,
) -> &'r PlayerRecord {
    let roll = rng.gen_range(0.0..100.0);
    let want_retired = roll < f64::from(retired_probability);
    if provisional.is_retired_or_inactive() == want_retired {
        return provisional;
    }

    let matching: Vec<&PlayerRecord> = pool
        .iter()
        .copied()
        .filter(|player| player.is_retired_or_inactive() == want_retired)
        .collect();
    if matching.is_empty() {
        log::debug!(
            "no {} candidates in pool; keeping provisional pick",
            if want_retired { "retired" } else { "active" }
        );
        return provisional;
    }
    matching[rng.gen_range(0..matching.len())]
}

fn choose_weighted<R: Rng>(weights: &[(usize, u32)], rng: &mut R) -> Option<usize> {
    // Accumulated in u64 so arbitrary u32 weights cannot overflow the sum.
    let total_weight: u64 = weights.iter().map(|(_, weight)| u64::from(*weight)).sum();
    if total_weight == 0 {
        return None;
    }

    let roll = rng.gen_range(0..total_weight);
    let mut current = 0u64;
    for (idx, weight) in weights {
        current += u64::from(*weight);
        if roll < current {
            return Some(*idx);
        }
    }

    weights.first().map(|(idx, _)| *idx)
}
