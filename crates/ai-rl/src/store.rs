//! Cross-lifetime weight persistence.
//!
//! One table per archetype. An agent checks a copy out when it spawns and
//! writes it back when it dies. Saves overwrite unconditionally: if two agents
//! of the same archetype die in one tick, the second save wins.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::archetype::Archetype;
use crate::weights::WeightTable;

/// Session-scoped context object; construct one per game session and pass it
/// to spawns and retirements.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WeightStore {
    tables: BTreeMap<Archetype, WeightTable>,
    session: u64,
}

impl WeightStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_weights(&self, archetype: Archetype) -> bool {
        self.tables.contains_key(&archetype)
    }

    /// A copy of the saved table, or an empty table if none was saved.
    pub fn load_weights(&self, archetype: Archetype) -> WeightTable {
        match self.tables.get(&archetype) {
            Some(table) => {
                tracing::info!(%archetype, session = self.session, "loaded persisted weights");
                table.clone()
            }
            None => {
                tracing::debug!(%archetype, "no persisted weights (first spawn)");
                WeightTable::empty()
            }
        }
    }

    pub fn save_weights(&mut self, archetype: Archetype, table: WeightTable) {
        let replaced = self.tables.insert(archetype, table).is_some();
        tracing::info!(%archetype, replaced, session = self.session, "saved weights");
    }

    pub fn reset_all(&mut self) {
        tracing::info!(tables = self.tables.len(), "weight store reset");
        self.tables.clear();
    }

    /// Start a new game session: forget everything learned so far.
    pub fn new_session(&mut self) {
        self.tables.clear();
        self.session += 1;
        tracing::info!(session = self.session, "new weight store session");
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn tables(&self) -> impl Iterator<Item = (Archetype, &WeightTable)> {
        self.tables.iter().map(|(a, t)| (*a, t))
    }
}
