//! Entity selectors.
//!
//! A `Selector` is a small declarative query over the live entities of a
//! game: "all enemy minions", "a random damaged friendly character",
//! "the card's chosen target". Card scripts embed selectors in action
//! arguments; the engine evaluates them lazily at resolution time.
//!
//! Selectors are used two ways:
//!
//! - **`eval`**: produce the matching entities, relative to a source.
//!   This is the targeting path, and it may consume randomness.
//! - **`test`**: check whether one candidate entity would match,
//!   relative to an owner. This is the event-pattern path, used when a
//!   listener decides whether a broadcast concerns it. Random wrappers
//!   are ignored here: a listener on "a random enemy minion dies" fires
//!   for any enemy minion.
//!
//! "Friendly" is always relative to the source/owner entity's
//! controller, not to whoever is broadcasting.

use serde::{Deserialize, Serialize};

use crate::core::{CardType, EntityId, GameTag};
use crate::game::Game;

/// A declarative query over game entities.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    /// The source entity itself.
    It,
    /// The source's controller (player entity).
    Controller,
    /// The controller's opponent (player entity).
    Opponent,
    /// All player entities, in seat order.
    AllPlayers,
    /// The source card's chosen target, if any.
    Target,

    FriendlyHero,
    EnemyHero,
    AllHeroes,
    FriendlyHeroPower,

    FriendlyMinions,
    EnemyMinions,
    AllMinions,

    /// Heroes and minions of one side (hero first, then board order).
    FriendlyCharacters,
    EnemyCharacters,
    AllCharacters,

    FriendlyHand,
    EnemyHand,
    FriendlyDeck,
    EnemyDeck,
    FriendlySecrets,
    FriendlyGraveyard,
    EnemyGraveyard,

    /// Narrow a base selector with a predicate.
    Filtered {
        base: Box<Selector>,
        filter: Filter,
    },

    /// One uniformly random member of the base set.
    Random(Box<Selector>),

    /// Up to `1` random distinct members of the base set.
    RandomN(Box<Selector>, u32),
}

/// Predicate for [`Selector::Filtered`].
///
/// Stat filters applied to a player entity read the player's hero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter {
    Damaged,
    Undamaged,
    WithTag(GameTag),
    WithoutTag(GameTag),
    OfType(CardType),
    CostAtMost(i32),
    CostAtLeast(i32),
    AttackAtMost(i32),
    AttackAtLeast(i32),
    /// Everyone but the source entity ("all *other* minions").
    NotSelf,
}

impl Selector {
    /// Wrap this selector with a filter.
    #[must_use]
    pub fn filtered(self, filter: Filter) -> Self {
        Selector::Filtered {
            base: Box::new(self),
            filter,
        }
    }

    /// Pick one random member of this selector's result.
    #[must_use]
    pub fn random(self) -> Self {
        Selector::Random(Box::new(self))
    }

    /// Pick up to `count` random distinct members.
    #[must_use]
    pub fn random_n(self, count: u32) -> Self {
        Selector::RandomN(Box::new(self), count)
    }

    /// Evaluate this selector relative to `source`.
    ///
    /// Deterministic selectors return entities in a stable order: seat
    /// order across players, container order within a side. Random
    /// selectors consume the game RNG.
    pub fn eval(&self, game: &mut Game, source: EntityId) -> Vec<EntityId> {
        match self {
            Selector::Random(inner) => {
                let pool = inner.eval(game, source);
                match game.rng.choose(&pool) {
                    Some(&picked) => vec![picked],
                    None => Vec::new(),
                }
            }
            Selector::RandomN(inner, count) => {
                let mut pool = inner.eval(game, source);
                game.rng.shuffle(&mut pool);
                pool.truncate(*count as usize);
                pool
            }
            _ => self.members(game, source),
        }
    }

    /// Check whether `candidate` would be selected relative to `owner`.
    ///
    /// Random wrappers are transparent: the underlying set decides.
    pub fn test(&self, game: &Game, owner: EntityId, candidate: EntityId) -> bool {
        match self {
            Selector::Random(inner) | Selector::RandomN(inner, _) => {
                inner.test(game, owner, candidate)
            }
            _ => self.members(game, owner).contains(&candidate),
        }
    }

    /// The full member set, ignoring random wrappers.
    fn members(&self, game: &Game, source: EntityId) -> Vec<EntityId> {
        let controller = game.controller_of(source);
        let opponent = game.next_player(controller);

        match self {
            Selector::It => vec![source],
            Selector::Controller => vec![EntityId::player(controller)],
            Selector::Opponent => vec![EntityId::player(opponent)],
            Selector::AllPlayers => game
                .player_ids()
                .map(EntityId::player)
                .collect(),
            Selector::Target => game
                .get_card(source)
                .and_then(|c| c.target)
                .map_or_else(Vec::new, |t| vec![t]),

            Selector::FriendlyHero => game.players[controller].hero.into_iter().collect(),
            Selector::EnemyHero => game.players[opponent].hero.into_iter().collect(),
            Selector::AllHeroes => game
                .player_ids()
                .filter_map(|p| game.players[p].hero)
                .collect(),
            Selector::FriendlyHeroPower => {
                game.players[controller].hero_power.into_iter().collect()
            }

            Selector::FriendlyMinions => game.players[controller].board.clone(),
            Selector::EnemyMinions => game.players[opponent].board.clone(),
            Selector::AllMinions => game
                .player_ids()
                .flat_map(|p| game.players[p].board.iter().copied())
                .collect(),

            Selector::FriendlyCharacters => game.characters_of(controller),
            Selector::EnemyCharacters => game.characters_of(opponent),
            Selector::AllCharacters => game
                .player_ids()
                .flat_map(|p| game.characters_of(p))
                .collect(),

            Selector::FriendlyHand => game.players[controller].hand.clone(),
            Selector::EnemyHand => game.players[opponent].hand.clone(),
            Selector::FriendlyDeck => game.players[controller].deck.clone(),
            Selector::EnemyDeck => game.players[opponent].deck.clone(),
            Selector::FriendlySecrets => game.players[controller].secrets.clone(),
            Selector::FriendlyGraveyard => game.players[controller].graveyard.clone(),
            Selector::EnemyGraveyard => game.players[opponent].graveyard.clone(),

            Selector::Filtered { base, filter } => base
                .members(game, source)
                .into_iter()
                .filter(|&id| filter.matches(game, source, id))
                .collect(),

            Selector::Random(inner) | Selector::RandomN(inner, _) => {
                inner.members(game, source)
            }
        }
    }
}

impl Filter {
    /// Evaluate this filter against one candidate.
    pub fn matches(&self, game: &Game, source: EntityId, candidate: EntityId) -> bool {
        if let Filter::NotSelf = self {
            return candidate != source;
        }

        // Stat filters on a player entity look at the player's hero.
        let Some(card) = game.get_card(game.character_of(candidate)) else {
            return false;
        };

        match self {
            Filter::Damaged => card.damage > 0,
            Filter::Undamaged => card.damage == 0,
            Filter::WithTag(tag) => card.has_tag(*tag),
            Filter::WithoutTag(tag) => !card.has_tag(*tag),
            Filter::OfType(card_type) => card.card_type == *card_type,
            Filter::CostAtMost(cost) => card.cost <= *cost,
            Filter::CostAtLeast(cost) => card.cost >= *cost,
            Filter::AttackAtMost(atk) => card.atk() <= *atk,
            Filter::AttackAtLeast(atk) => card.atk() >= *atk,
            Filter::NotSelf => unreachable!("handled above"),
        }
    }
}
