//! Event listeners.
//!
//! A listener is a stored action used as a *pattern* plus the response
//! actions to queue when a broadcast matches it. There is no separate
//! event vocabulary: the thing that happened and the thing listened
//! for are the same data type, compared structurally.
//!
//! ## Phases
//!
//! Every broadcast carries a [`Phase`]. `On` fires while the action is
//! still in flight (targets fixed, state not yet committed), which is
//! where interference lives: countering a play, redirecting an attack.
//! `After` fires once the action has fully resolved.
//!
//! ## Matching
//!
//! A listener matches a broadcast when the op is identical and every
//! pattern argument accepts the corresponding broadcast value:
//!
//! - a missing pattern argument accepts anything
//! - an entity argument matches by identity
//! - a selector argument acts as a predicate, evaluated relative to
//!   the entity that owns the listener
//! - a fixed amount matches by value

use serde::{Deserialize, Serialize};

use crate::actions::{Action, EventArgs, Op};
use crate::core::EntityId;
use crate::game::Game;

/// When a listener observes its action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// While the action is in flight; reactions may still interfere.
    On,
    /// Once the action has fully resolved.
    After,
}

/// A trigger pattern with its responses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventListener {
    /// The action shape to match against broadcasts.
    pub pattern: Action,
    pub phase: Phase,
    /// Queued with the broadcast record as event context, the owning
    /// entity as source.
    pub responses: Vec<Action>,
    /// Unregistered just before its responses run.
    pub once: bool,
}

impl EventListener {
    /// Build a listener. Usually written as `pattern.on(...)` or
    /// `pattern.after(...)`.
    #[must_use]
    pub fn new(pattern: Action, phase: Phase, responses: impl IntoIterator<Item = Action>) -> Self {
        Self {
            pattern,
            phase,
            responses: responses.into_iter().collect(),
            once: false,
        }
    }

    /// Fire at most once, then unregister.
    #[must_use]
    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }

    /// Whether a broadcast matches this listener for `owner`.
    pub fn matches(&self, game: &Game, owner: EntityId, op: Op, args: &EventArgs) -> bool {
        self.pattern.op == op && self.pattern.matches_args(game, owner, args)
    }
}
