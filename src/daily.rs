//! Deterministic daily target derivation.
//!
//! The daily target must be derivable repeatedly without server
//! coordination: the calendar date is mapped through a domain-separated
//! HMAC to a seed, and the draw runs on a ChaCha stream so every client
//! computes the same target for the same date.
use crate::constants::DAILY_SEED_DOMAIN;
use crate::player::PlayerRecord;
use crate::roster::Roster;
use crate::sampler::{SelectError, SelectionWeights, select_target};
use chrono::NaiveDate;
use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

/// Derive the RNG seed for a calendar date.
#[must_use]
pub fn daily_seed(date: NaiveDate) -> u64 {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(DAILY_SEED_DOMAIN).expect("fixed domain tag is a valid key");
    mac.update(date.format("%Y-%m-%d").to_string().as_bytes());
    let digest = mac.finalize().into_bytes();
    let seed_bytes: [u8; 8] = digest[..8].try_into().expect("digest slice length");
    u64::from_le_bytes(seed_bytes)
}

/// Draw the target for a calendar date. Same date, same target.
///
/// # Errors
///
/// Returns [`SelectError::EmptyRoster`] when the roster has no players.
pub fn daily_target<'r>(
    roster: &'r Roster,
    weights: &SelectionWeights,
    retired_probability: u32,
    date: NaiveDate,
) -> Result<&'r PlayerRecord, SelectError> {
    let mut rng = ChaCha8Rng::seed_from_u64(daily_seed(date));
    select_target(roster, weights, retired_probability, &mut rng)
}

/// Persisted record of the target already drawn for a date, so a reload
/// mid-day does not re-draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTargetCache {
    pub date: NaiveDate,
    pub primary_name: String,
}
