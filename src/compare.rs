//! Multi-attribute feedback scoring for a guess against the target.
//!
//! Every function here is a pure, total function of its inputs: missing or
//! unknown attribute values resolve to [`Verdict::Incorrect`] or
//! [`Verdict::Unknown`], never to an error.
use crate::constants::APPEARANCE_CLOSE_WINDOW;
use crate::player::PlayerRecord;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Per-attribute feedback verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Correct,
    /// Weaker than exact match but informative: same region or residency,
    /// or within a numeric tolerance window.
    Close,
    Incorrect,
    /// The attribute could not be compared (e.g. an unparseable birth date).
    Unknown,
}

/// Direction hint for the appearance-count attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppearanceHint {
    Equal,
    GuessHigher,
    GuessLower,
}

/// Verdicts for every tracked attribute of one guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessFeedback {
    pub team: Verdict,
    pub position: Verdict,
    pub nationality: Verdict,
    pub appearances: Verdict,
    pub appearance_hint: AppearanceHint,
    /// Present only in modes that track the age attribute.
    #[serde(default)]
    pub age: Option<Verdict>,
}

/// Knobs for the comparison, fixed per mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareOptions {
    pub include_age: bool,
    pub age_tolerance_years: u32,
    /// Reference date for age computation.
    pub today: NaiveDate,
}

/// Score a guessed record against the target record.
#[must_use]
pub fn compare(guess: &PlayerRecord, target: &PlayerRecord, opts: &CompareOptions) -> GuessFeedback {
    let (appearances, appearance_hint) =
        compare_appearances(guess.world_appearances, target.world_appearances);
    GuessFeedback {
        team: compare_team(guess, target),
        position: if guess.position == target.position {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        },
        nationality: compare_nationality(guess, target),
        appearances,
        appearance_hint,
        age: opts
            .include_age
            .then(|| compare_age(guess, target, opts.age_tolerance_years, opts.today)),
    }
}

fn eq_ci(left: Option<&str>, right: Option<&str>) -> bool {
    match (left, right) {
        (Some(a), Some(b)) => a.to_lowercase() == b.to_lowercase(),
        _ => false,
    }
}

/// Team verdict: both retired is a match in itself; otherwise identical
/// teams are correct and a shared region between two active players is
/// close. A missing team on either side is incorrect unless both players
/// are retired.
fn compare_team(guess: &PlayerRecord, target: &PlayerRecord) -> Verdict {
    let guess_retired = guess.is_retired_or_inactive();
    let target_retired = target.is_retired_or_inactive();

    if guess_retired && target_retired {
        return Verdict::Correct;
    }
    if eq_ci(guess.current_team.as_deref(), target.current_team.as_deref()) {
        return Verdict::Correct;
    }
    if guess_retired != target_retired {
        return Verdict::Incorrect;
    }
    if eq_ci(
        guess.current_team_region.as_deref(),
        target.current_team_region.as_deref(),
    ) {
        return Verdict::Close;
    }
    Verdict::Incorrect
}

/// Nationality verdict: exact match is correct; a shared residency with a
/// differing nationality is close.
fn compare_nationality(guess: &PlayerRecord, target: &PlayerRecord) -> Verdict {
    if eq_ci(guess.nationality.as_deref(), target.nationality.as_deref()) {
        return Verdict::Correct;
    }
    if eq_ci(guess.residency.as_deref(), target.residency.as_deref()) {
        return Verdict::Close;
    }
    Verdict::Incorrect
}

fn compare_appearances(guess: u32, target: u32) -> (Verdict, AppearanceHint) {
    let hint = match guess.cmp(&target) {
        std::cmp::Ordering::Equal => AppearanceHint::Equal,
        std::cmp::Ordering::Greater => AppearanceHint::GuessHigher,
        std::cmp::Ordering::Less => AppearanceHint::GuessLower,
    };
    let verdict = if guess == target {
        Verdict::Correct
    } else if guess.abs_diff(target) <= APPEARANCE_CLOSE_WINDOW {
        Verdict::Close
    } else {
        Verdict::Incorrect
    };
    (verdict, hint)
}

fn compare_age(
    guess: &PlayerRecord,
    target: &PlayerRecord,
    tolerance_years: u32,
    today: NaiveDate,
) -> Verdict {
    let (Some(guess_birth), Some(target_birth)) = (guess.birth_date, target.birth_date) else {
        return Verdict::Unknown;
    };
    let guess_age = age_on(guess_birth, today);
    let target_age = age_on(target_birth, today);
    if guess_age == target_age {
        Verdict::Correct
    } else if guess_age.abs_diff(target_age) <= tolerance_years {
        Verdict::Close
    } else {
        Verdict::Incorrect
    }
}

/// Whole years between `birth` and `today`, decremented by one when the
/// birthday has not yet occurred this year.
#[must_use]
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    years.max(0).unsigned_abs()
}
