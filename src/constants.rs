//! Centralized balance and tuning constants for Prodle game logic.
//!
//! These values define the deterministic math for target selection and
//! feedback scoring. Keeping them together ensures that gameplay can only
//! be adjusted via code changes reviewed in version control.

// Persistence keys ----------------------------------------------------------
pub(crate) const STORAGE_PREFIX: &str = "prodle";

// Daily target derivation ---------------------------------------------------
pub(crate) const DAILY_SEED_DOMAIN: &[u8] = b"prodle-daily-target";

// Appearance tiers ----------------------------------------------------------
pub(crate) const TIER_LOW_MAX_APPEARANCES: u32 = 2;
pub(crate) const TIER_MEDIUM_MAX_APPEARANCES: u32 = 5;

// Target selection defaults -------------------------------------------------
pub const DEFAULT_WEIGHT_LOW: u32 = 15;
pub const DEFAULT_WEIGHT_MEDIUM: u32 = 25;
pub const DEFAULT_WEIGHT_HIGH: u32 = 60;
pub const DEFAULT_RETIRED_PROBABILITY: u32 = 50;
pub(crate) const WEIGHT_NORMALIZED_TOTAL: u32 = 100;
pub(crate) const RETIRED_PROBABILITY_MAX: u32 = 100;

// Feedback closeness windows ------------------------------------------------
pub(crate) const APPEARANCE_CLOSE_WINDOW: u32 = 2;
pub const AGE_CLOSE_TOLERANCE_YEARS: u32 = 1;

// Attempt budgets per mode --------------------------------------------------
pub const DAILY_MAX_ATTEMPTS: u32 = 6;
pub const STANDARD_MAX_ATTEMPTS: u32 = 10;
