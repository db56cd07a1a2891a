//! Roster lookup with alias resolution.
use crate::player::{PlayerRecord, RosterData};
use std::collections::{BTreeMap, HashMap};

/// Normalized roster: canonical records keyed by primary name plus a
/// flattened, case-insensitive alias index.
///
/// Iteration order over players is the lexicographic primary-name order,
/// which keeps seeded target draws reproducible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    players: BTreeMap<String, PlayerRecord>,
    alias_index: HashMap<String, String>,
}

impl Roster {
    /// Build a roster from normalized records.
    ///
    /// The alias index always contains the identity mapping for each primary
    /// name; an alias that collides with an existing entry never displaces it.
    #[must_use]
    pub fn from_records(records: Vec<PlayerRecord>) -> Self {
        let mut players = BTreeMap::new();
        let mut alias_index = HashMap::new();

        for record in records {
            alias_index.insert(record.primary_name.to_lowercase(), record.primary_name.clone());
            players.insert(record.primary_name.clone(), record);
        }
        for record in players.values() {
            for alias in &record.alternate_names {
                alias_index
                    .entry(alias.to_lowercase())
                    .or_insert_with(|| record.primary_name.clone());
            }
        }

        Self {
            players,
            alias_index,
        }
    }

    /// Build a roster straight from the raw data source.
    #[must_use]
    pub fn from_data(data: RosterData) -> Self {
        Self::from_records(data.into_records())
    }

    /// Resolve a guessed name (canonical or alias, any casing) to the
    /// primary name it belongs to.
    #[must_use]
    pub fn resolve_name(&self, name: &str) -> Option<&str> {
        self.alias_index
            .get(&name.trim().to_lowercase())
            .map(String::as_str)
    }

    /// Resolve a guessed name to its full record.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&PlayerRecord> {
        self.resolve_name(name).and_then(|primary| self.players.get(primary))
    }

    /// Look up a record by exact primary name.
    #[must_use]
    pub fn get(&self, primary_name: &str) -> Option<&PlayerRecord> {
        self.players.get(primary_name)
    }

    /// Iterate records in stable (lexicographic) order.
    pub fn players(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.players.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
