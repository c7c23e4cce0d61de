//! Card definition lookup.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::definition::CardData;

/// All card definitions available to a game.
///
/// The registry is fixed for the lifetime of a session: every card id a
/// script or deck refers to must be registered before the game starts.
/// Random pickers draw from `all_ids()`, which is sorted so pool order
/// never depends on hash iteration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CardRegistry {
    cards: FxHashMap<String, CardData>,
}

impl CardRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition.
    ///
    /// Ids must be unique.
    pub fn register(&mut self, data: CardData) {
        let id = data.id.clone();
        let prior = self.cards.insert(id.clone(), data);
        assert!(prior.is_none(), "duplicate card id {id:?}");
    }

    /// Look up a definition.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CardData> {
        self.cards.get(id)
    }

    /// Look up a definition that scripts guarantee exists.
    ///
    /// Panics on a missing id; use `get` when the id comes from
    /// outside (deck lists, driver input).
    #[must_use]
    pub fn must_get(&self, id: &str) -> &CardData {
        match self.cards.get(id) {
            Some(data) => data,
            None => panic!("unknown card id {id:?}"),
        }
    }

    /// Whether an id is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.cards.contains_key(id)
    }

    /// All registered ids in sorted order.
    #[must_use]
    pub fn all_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.cards.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
