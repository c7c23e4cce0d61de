//! Random card generation.
//!
//! Effects like "add a random spell to your hand" or discover offers
//! pick card *definitions*, not live entities. `RandomCardPicker`
//! stores a pool description plus filters and draws distinct card ids
//! from the game RNG when evaluated. Materializing the ids into
//! entities is the caller's job.

use serde::{Deserialize, Serialize};

use crate::core::{CardType, EntityId};
use crate::game::Game;

/// Draws random card ids from a described pool.
///
/// ```
/// use brazier::dsl::{CardFilter, RandomCardPicker};
/// use brazier::core::CardType;
///
/// // Three distinct collectible minions costing at most 3.
/// let picker = RandomCardPicker::from_registry()
///     .with_filter(CardFilter::Collectible)
///     .with_filter(CardFilter::OfType(CardType::Minion))
///     .with_filter(CardFilter::CostAtMost(3))
///     .times(3);
/// # let _ = picker;
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomCardPicker {
    source: CardSource,
    count: u32,
    filters: Vec<CardFilter>,
}

/// Where a picker draws its candidate pool from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardSource {
    /// Every definition in the card registry.
    Registry,
    /// An explicit list of card ids.
    Ids(Vec<String>),
    /// The evaluating card's entourage list.
    Entourage,
}

/// Filters narrowing a picker's candidate pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardFilter {
    OfType(CardType),
    Collectible,
    CostExactly(i32),
    CostAtMost(i32),
}

impl RandomCardPicker {
    /// Pick from the whole registry.
    #[must_use]
    pub fn from_registry() -> Self {
        Self {
            source: CardSource::Registry,
            count: 1,
            filters: Vec::new(),
        }
    }

    /// Pick from an explicit id list.
    #[must_use]
    pub fn among(ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            source: CardSource::Ids(ids.into_iter().map(Into::into).collect()),
            count: 1,
            filters: Vec::new(),
        }
    }

    /// Pick from the source card's entourage.
    #[must_use]
    pub fn from_entourage() -> Self {
        Self {
            source: CardSource::Entourage,
            count: 1,
            filters: Vec::new(),
        }
    }

    /// Add a pool filter.
    #[must_use]
    pub fn with_filter(mut self, filter: CardFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Draw `count` distinct ids per evaluation instead of one.
    #[must_use]
    pub fn times(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// How many ids one evaluation yields (pool permitting).
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Draw up to `count` distinct card ids from the pool.
    ///
    /// Returns fewer ids if the filtered pool is smaller than `count`,
    /// and an empty vec for an empty pool. The pool is ordered before
    /// drawing so identical RNG state yields identical picks.
    pub fn evaluate(&self, game: &mut Game, source: EntityId) -> Vec<String> {
        let mut pool: Vec<String> = match &self.source {
            CardSource::Registry => game.registry.all_ids(),
            CardSource::Ids(ids) => ids.clone(),
            CardSource::Entourage => game
                .get_card(source)
                .map(|card| game.registry.must_get(&card.card_id).entourage.clone())
                .unwrap_or_default(),
        };

        pool.retain(|id| {
            let Some(data) = game.registry.get(id) else {
                return false;
            };
            self.filters.iter().all(|f| f.matches_data(data))
        });

        game.rng.shuffle(&mut pool);
        pool.truncate(self.count as usize);
        pool
    }
}

impl CardFilter {
    fn matches_data(&self, data: &crate::cards::CardData) -> bool {
        match self {
            CardFilter::OfType(card_type) => data.card_type == *card_type,
            CardFilter::Collectible => data.collectible,
            CardFilter::CostExactly(cost) => data.cost == *cost,
            CardFilter::CostAtMost(cost) => data.cost <= *cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardData, CardRegistry};
    use crate::core::{GameConfig, PlayerId};
    use crate::game::Game;

    fn test_game() -> Game {
        let mut registry = CardRegistry::new();
        registry.register(CardData::hero("hero", "Test Hero", 30));
        registry.register(CardData::minion("wisp", "Wisp", 0, 1, 1).collectible());
        registry.register(CardData::minion("yeti", "Yeti", 4, 4, 5).collectible());
        registry.register(CardData::spell("bolt", "Bolt", 1).collectible());
        registry.register(
            CardData::minion("dream_wisp", "Dream Wisp", 0, 1, 1)
                .with_entourage(["wisp", "yeti"]),
        );

        let mut game = Game::new(GameConfig::default(), registry, 42);
        for player in game.player_ids().collect::<Vec<_>>() {
            game.assign_hero(player, "hero");
        }
        game
    }

    #[test]
    fn test_registry_pool_respects_filters() {
        let mut game = test_game();
        let source = crate::core::EntityId::player_id(0);

        let picker = RandomCardPicker::from_registry()
            .with_filter(CardFilter::Collectible)
            .with_filter(CardFilter::OfType(CardType::Minion));

        for _ in 0..10 {
            let picked = picker.evaluate(&mut game, source);
            assert_eq!(picked.len(), 1);
            assert!(picked[0] == "wisp" || picked[0] == "yeti");
        }
    }

    #[test]
    fn test_distinct_picks() {
        let mut game = test_game();
        let source = crate::core::EntityId::player_id(0);

        let picker = RandomCardPicker::among(["wisp", "yeti", "bolt"]).times(3);
        let mut picked = picker.evaluate(&mut game, source);
        picked.sort();

        assert_eq!(picked, vec!["bolt", "wisp", "yeti"]);
    }

    #[test]
    fn test_pool_smaller_than_count() {
        let mut game = test_game();
        let source = crate::core::EntityId::player_id(0);

        let picker = RandomCardPicker::among(["wisp"]).times(3);
        assert_eq!(picker.evaluate(&mut game, source), vec!["wisp"]);
    }

    #[test]
    fn test_entourage_pool() {
        let mut game = test_game();
        let p0 = PlayerId::new(0);
        let wisp_caller = game.put_in_play("dream_wisp", p0);

        let picker = RandomCardPicker::from_entourage();
        let picked = picker.evaluate(&mut game, wisp_caller);

        assert_eq!(picked.len(), 1);
        assert!(picked[0] == "wisp" || picked[0] == "yeti");
    }

    #[test]
    fn test_cost_filters() {
        let mut game = test_game();
        let source = crate::core::EntityId::player_id(0);

        let cheap = RandomCardPicker::from_registry()
            .with_filter(CardFilter::Collectible)
            .with_filter(CardFilter::CostAtMost(1))
            .times(10);
        let mut picked = cheap.evaluate(&mut game, source);
        picked.sort();
        assert_eq!(picked, vec!["bolt", "wisp"]);

        let exact = RandomCardPicker::from_registry()
            .with_filter(CardFilter::CostExactly(4))
            .times(10);
        assert_eq!(exact.evaluate(&mut game, source), vec!["yeti"]);
    }

    #[test]
    fn test_empty_pool() {
        let mut game = test_game();
        let source = crate::core::EntityId::player_id(0);

        let picker = RandomCardPicker::from_registry().with_filter(CardFilter::CostExactly(99));
        assert!(picker.evaluate(&mut game, source).is_empty());
    }

    #[test]
    fn test_deterministic_across_same_seed() {
        let picker = RandomCardPicker::from_registry()
            .with_filter(CardFilter::Collectible)
            .times(2);

        let mut game1 = test_game();
        let mut game2 = test_game();
        let source = crate::core::EntityId::player_id(0);

        assert_eq!(
            picker.evaluate(&mut game1, source),
            picker.evaluate(&mut game2, source)
        );
    }
}
