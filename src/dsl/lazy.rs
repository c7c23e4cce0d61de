//! Lazily evaluated numeric arguments.
//!
//! Card text like "deal damage equal to the number of minions you
//! control" cannot be a constant: the count must be read at resolution
//! time, after earlier effects in the same action chain have run.
//! `LazyNum` captures that deferral.

use serde::{Deserialize, Serialize};

use crate::core::EntityId;
use crate::game::Game;

use super::selector::Selector;

/// A number resolved against live game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LazyNum {
    /// A plain constant.
    Fixed(i32),
    /// How many entities a selector matches right now.
    Count(Box<Selector>),
    /// A stat read off the first entity a selector matches (0 if none).
    Attr(Box<Selector>, CardAttr),
}

/// Stats readable through [`LazyNum::Attr`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardAttr {
    Atk,
    Health,
    Cost,
    Damage,
}

impl LazyNum {
    /// Count the members of a selector.
    #[must_use]
    pub fn count(selector: Selector) -> Self {
        LazyNum::Count(Box::new(selector))
    }

    /// Read a stat from the first member of a selector.
    #[must_use]
    pub fn attr(selector: Selector, attr: CardAttr) -> Self {
        LazyNum::Attr(Box::new(selector), attr)
    }

    /// Resolve to a concrete number relative to `source`.
    pub fn evaluate(&self, game: &mut Game, source: EntityId) -> i32 {
        match self {
            LazyNum::Fixed(n) => *n,
            LazyNum::Count(selector) => selector.eval(game, source).len() as i32,
            LazyNum::Attr(selector, attr) => {
                let found = selector.eval(game, source);
                let Some(&entity) = found.first() else {
                    return 0;
                };
                let Some(card) = game.get_card(game.character_of(entity)) else {
                    return 0;
                };
                match attr {
                    CardAttr::Atk => card.atk(),
                    CardAttr::Health => card.health(),
                    CardAttr::Cost => card.cost,
                    CardAttr::Damage => card.damage,
                }
            }
        }
    }
}

impl From<i32> for LazyNum {
    fn from(n: i32) -> Self {
        LazyNum::Fixed(n)
    }
}
