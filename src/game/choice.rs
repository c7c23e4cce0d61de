//! Pending player choices.
//!
//! Some actions pause the game until a player answers: discovery
//! offers, opening hand swaps. The pending question is stored on the
//! player as a [`Choice`]; every other surface action is refused until
//! it is answered through [`crate::game::Game::choose`].

use serde::{Deserialize, Serialize};

use crate::core::EntityId;

/// What kind of answer a choice expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChoiceKind {
    /// Pick exactly one option; the rest are discarded.
    Generic,
    /// Pick any subset of the offered cards to shuffle back.
    Mulligan,
}

/// A question waiting on one player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub kind: ChoiceKind,
    /// The entity that asked.
    pub source: EntityId,
    /// The offered options, in presentation order.
    pub options: Vec<EntityId>,
}
