//! Player records and the raw roster data they are loaded from.
use crate::constants::{TIER_LOW_MAX_APPEARANCES, TIER_MEDIUM_MAX_APPEARANCES};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Competitive position held during the tournament appearances being modeled.
///
/// This may differ from a player's current live role; retirement status is
/// derived from the live role, not from this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Top,
    Jungle,
    Mid,
    Bottom,
    Support,
    #[default]
    Unknown,
}

impl Position {
    /// Parse a role label case-insensitively. The source data uses `bot`,
    /// `adc`, and `bottom` interchangeably for the bottom lane.
    #[must_use]
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "top" => Self::Top,
            "jungle" => Self::Jungle,
            "mid" => Self::Mid,
            "bot" | "adc" | "bottom" => Self::Bottom,
            "support" => Self::Support,
            _ => Self::Unknown,
        }
    }

    /// Whether this is one of the six active lane positions.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// Bucket of players by world-tournament appearance count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppearanceTier {
    Low,
    Medium,
    High,
}

impl AppearanceTier {
    /// Classify an appearance count. Every count maps to exactly one tier.
    #[must_use]
    pub const fn from_count(appearances: u32) -> Self {
        if appearances <= TIER_LOW_MAX_APPEARANCES {
            Self::Low
        } else if appearances <= TIER_MEDIUM_MAX_APPEARANCES {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];
}

/// Canonical entity for one real-world competitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Unique, immutable key.
    pub primary_name: String,
    /// Aliases that resolve back to `primary_name` during guess lookup.
    #[serde(default)]
    pub alternate_names: Vec<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    /// Distinct from nationality; used for "close" nationality matches.
    #[serde(default)]
    pub residency: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    /// Role held during modeled tournament appearances.
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub current_team: Option<String>,
    #[serde(default)]
    pub current_team_region: Option<String>,
    /// Current live role label, which may be a non-player role (coach,
    /// streamer, etc.) that does not parse to an active position.
    #[serde(default)]
    pub current_role: Option<String>,
    #[serde(default)]
    pub formally_retired: bool,
    #[serde(default)]
    pub world_appearances: u32,
}

impl PlayerRecord {
    /// Derived retirement status: formally retired, teamless, or holding a
    /// live role outside the active lane positions.
    #[must_use]
    pub fn is_retired_or_inactive(&self) -> bool {
        if self.formally_retired || self.current_team.is_none() {
            return true;
        }
        !self
            .current_role
            .as_deref()
            .is_some_and(|role| Position::parse(role).is_active())
    }

    /// Appearance tier, a pure function of `world_appearances`.
    #[must_use]
    pub const fn tier(&self) -> AppearanceTier {
        AppearanceTier::from_count(self.world_appearances)
    }
}

/// One raw entry from the bulk roster source, keyed by display name.
///
/// Field names mirror the upstream data file. The retirement flag arrives as
/// `"1"`/`"0"` strings in older exports and as booleans in newer ones, so it
/// is deserialized leniently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RawPlayer {
    #[serde(default, rename = "mainName")]
    pub main_name: String,
    #[serde(default, rename = "allNames")]
    pub all_names: Vec<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default, alias = "Residency")]
    pub residency: Option<String>,
    #[serde(default)]
    pub birthdate: Option<String>,
    #[serde(default)]
    pub tournament_role: Option<String>,
    #[serde(default)]
    pub appearance: Option<u32>,
    #[serde(default)]
    pub current_role: Option<String>,
    #[serde(default, rename = "isRetired", deserialize_with = "lenient_flag")]
    pub is_retired: bool,
    #[serde(default)]
    pub current_team: Option<String>,
    #[serde(default)]
    pub current_team_region: Option<String>,
}

/// Empty and whitespace-only strings in the source mean "no value".
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(value)) => value,
        Some(Flag::Int(value)) => value != 0,
        Some(Flag::Text(value)) => matches!(value.trim(), "1" | "true" | "True"),
        None => false,
    })
}

/// Container for the bulk-loadable roster source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct RosterData {
    pub players: BTreeMap<String, RawPlayer>,
}

impl RosterData {
    /// Create empty roster data (useful for tests).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            players: BTreeMap::new(),
        }
    }

    /// Load roster data from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid roster data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Normalize raw entries into canonical player records.
    ///
    /// Entries without a `mainName` fall back to their map key; birth dates
    /// that fail to parse as `YYYY-MM-DD` become unknown rather than errors.
    #[must_use]
    pub fn into_records(self) -> Vec<PlayerRecord> {
        self.players
            .into_iter()
            .map(|(key, raw)| {
                let primary_name = if raw.main_name.is_empty() {
                    key
                } else {
                    raw.main_name
                };
                PlayerRecord {
                    primary_name,
                    alternate_names: raw.all_names,
                    nationality: non_blank(raw.nationality),
                    residency: non_blank(raw.residency),
                    birth_date: raw
                        .birthdate
                        .as_deref()
                        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()),
                    position: raw
                        .tournament_role
                        .as_deref()
                        .map_or(Position::Unknown, Position::parse),
                    current_team: non_blank(raw.current_team),
                    current_team_region: non_blank(raw.current_team_region),
                    current_role: non_blank(raw.current_role),
                    formally_retired: raw.is_retired,
                    world_appearances: raw.appearance.unwrap_or(0),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_player() -> PlayerRecord {
        PlayerRecord {
            primary_name: "Faker".to_string(),
            alternate_names: vec!["GoJeonPa".to_string()],
            nationality: Some("South Korea".to_string()),
            residency: Some("Korea".to_string()),
            birth_date: NaiveDate::from_ymd_opt(1996, 5, 7),
            position: Position::Mid,
            current_team: Some("T1".to_string()),
            current_team_region: Some("LCK".to_string()),
            current_role: Some("Mid".to_string()),
            formally_retired: false,
            world_appearances: 7,
        }
    }

    #[test]
    fn tier_is_total_over_counts() {
        for count in 0..20 {
            let tier = AppearanceTier::from_count(count);
            assert!(AppearanceTier::ALL.contains(&tier));
        }
        assert_eq!(AppearanceTier::from_count(0), AppearanceTier::Low);
        assert_eq!(AppearanceTier::from_count(2), AppearanceTier::Low);
        assert_eq!(AppearanceTier::from_count(3), AppearanceTier::Medium);
        assert_eq!(AppearanceTier::from_count(5), AppearanceTier::Medium);
        assert_eq!(AppearanceTier::from_count(6), AppearanceTier::High);
    }

    #[test]
    fn position_parsing_accepts_bottom_spellings() {
        assert_eq!(Position::parse("Bot"), Position::Bottom);
        assert_eq!(Position::parse("ADC"), Position::Bottom);
        assert_eq!(Position::parse("bottom"), Position::Bottom);
        assert_eq!(Position::parse("JUNGLE"), Position::Jungle);
        assert_eq!(Position::parse("analyst"), Position::Unknown);
    }

    #[test]
    fn retirement_is_derived_from_team_and_live_role() {
        let active = active_player();
        assert!(!active.is_retired_or_inactive());

        let mut formally = active_player();
        formally.formally_retired = true;
        assert!(formally.is_retired_or_inactive());

        let mut teamless = active_player();
        teamless.current_team = None;
        assert!(teamless.is_retired_or_inactive());

        let mut coaching = active_player();
        coaching.current_role = Some("Coach".to_string());
        assert!(coaching.is_retired_or_inactive());

        let mut no_role = active_player();
        no_role.current_role = None;
        assert!(no_role.is_retired_or_inactive());
    }

    #[test]
    fn raw_roster_parses_lenient_retired_flags() {
        let json = r#"{
            "Faker": {
                "mainName": "Faker",
                "allNames": ["Faker", "GoJeonPa"],
                "nationality": "South Korea",
                "Residency": "Korea",
                "birthdate": "1996-05-07",
                "tournament_role": "Mid",
                "appearance": 7,
                "current_role": "Mid",
                "isRetired": "0",
                "current_team": "T1",
                "current_team_region": "LCK"
            },
            "Uzi": {
                "mainName": "Uzi",
                "allNames": ["Uzi"],
                "tournament_role": "ADC",
                "appearance": 4,
                "isRetired": true
            }
        }"#;

        let records = RosterData::from_json(json).unwrap().into_records();
        assert_eq!(records.len(), 2);
        let faker = records.iter().find(|r| r.primary_name == "Faker").unwrap();
        assert!(!faker.formally_retired);
        assert_eq!(faker.position, Position::Mid);
        assert_eq!(faker.birth_date, NaiveDate::from_ymd_opt(1996, 5, 7));
        let uzi = records.iter().find(|r| r.primary_name == "Uzi").unwrap();
        assert!(uzi.formally_retired);
        assert_eq!(uzi.position, Position::Bottom);
        assert!(uzi.birth_date.is_none());
    }

    #[test]
    fn blank_string_fields_count_as_missing() {
        let json = r#"{
            "Bang": {
                "mainName": "Bang",
                "appearance": 4,
                "nationality": "",
                "current_team": "",
                "current_team_region": "  ",
                "current_role": "Bot",
                "isRetired": "0"
            }
        }"#;
        let records = RosterData::from_json(json).unwrap().into_records();
        let bang = &records[0];
        assert_eq!(bang.nationality, None);
        assert_eq!(bang.current_team, None);
        assert_eq!(bang.current_team_region, None);
        assert!(bang.is_retired_or_inactive(), "an empty team string is teamless");
    }

    #[test]
    fn missing_main_name_falls_back_to_map_key() {
        let json = r#"{ "Deft": { "appearance": 6 } }"#;
        let records = RosterData::from_json(json).unwrap().into_records();
        assert_eq!(records[0].primary_name, "Deft");
        assert_eq!(records[0].tier(), AppearanceTier::High);
    }
}
