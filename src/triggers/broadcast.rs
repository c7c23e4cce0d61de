//! Broadcast delivery and the two-phase deferral primitive.
//!
//! ## Delivery order
//!
//! A broadcast sweeps entities in a fixed order: for each player
//! starting with the current one - board, secrets, hero, hero power -
//! and then every player's hand. Hands come last and separately
//! because cards there can carry listeners despite not being on the
//! table yet.
//!
//! Responses queue immediately as each listener matches, so an early
//! response can change what a later listener sees. Two guards keep
//! that sane: each entity's listener list is snapshotted before
//! delivery, and every matched listener is re-checked against the live
//! list before its responses run (a response may have silenced the
//! entity out from under the snapshot).
//!
//! ## Staging
//!
//! Some ops must not announce themselves mid-resolution (a summon
//! reaction must see the minion actually in play). [`BroadcastStage`]
//! is the named two-phase primitive for that: stage broadcasts while
//! resolving, flush them in FIFO order once state has settled.

use crate::actions::{EventArgs, Op};
use crate::core::{EntityId, GameResult};
use crate::game::Game;
use crate::triggers::{EventListener, Phase};

/// Deliver one broadcast to every listening entity.
pub(crate) fn deliver(
    game: &mut Game,
    op: Op,
    phase: Phase,
    args: &EventArgs,
    skip: Option<EntityId>,
) -> GameResult<()> {
    for entity in sweep_order(game) {
        if Some(entity) == skip {
            continue;
        }
        let listeners: Vec<EventListener> = game.card(entity).listeners.clone();
        for listener in listeners {
            if listener.phase != phase || !listener.matches(game, entity, op, args) {
                continue;
            }
            // An earlier response may have removed this listener.
            let live = game.card(entity).listeners.iter().any(|l| *l == listener);
            if !live {
                continue;
            }
            if listener.once {
                game.card_mut(entity).listeners.retain(|l| *l != listener);
            }
            log::debug!("{} reacts to {op:?}", game.card(entity));
            game.queue_actions(entity, &listener.responses, Some(args))?;
        }
    }
    Ok(())
}

/// Entities eligible to react, in delivery order.
fn sweep_order(game: &Game) -> Vec<EntityId> {
    let mut order = Vec::new();
    for player in game.turn_order() {
        let state = game.player(player);
        order.extend(state.board.iter().copied());
        order.extend(state.secrets.iter().copied());
        order.extend(state.hero);
        order.extend(state.hero_power);
    }
    for player in game.turn_order() {
        order.extend(game.player(player).hand.iter().copied());
    }
    order
}

/// Broadcasts staged for a later flush.
///
/// Owned by whichever resolution frame needs deferral; flushing
/// delivers every staged broadcast as an `On` phase notification, in
/// the order staged.
#[derive(Debug, Default)]
pub struct BroadcastStage {
    staged: Vec<(Op, EventArgs, Option<EntityId>)>,
}

impl BroadcastStage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold a broadcast back until the next flush.
    pub fn stage(&mut self, op: Op, args: EventArgs, skip: Option<EntityId>) {
        self.staged.push((op, args, skip));
    }

    /// Deliver everything staged, oldest first.
    pub fn flush(&mut self, game: &mut Game) -> GameResult<()> {
        for (op, args, skip) in self.staged.drain(..) {
            deliver(game, op, Phase::On, &args, skip)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.staged.len()
    }
}
