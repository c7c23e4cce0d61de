//! The resolution loop shared by every targeted op.
//!
//! A targeted action resolves in repetitions. Each repetition
//! re-resolves the target argument, applies the op to every target in
//! order, and queues the action's callbacks per target with the event
//! record seeded as `[target, ...target args]`. Broadcasts an op
//! defers during application are flushed once, after the last
//! repetition.

use crate::actions::catalog;
use crate::actions::{Action, EventArgs, Value};
use crate::core::{EntityId, GameResult};
use crate::game::Game;
use crate::triggers::BroadcastStage;

/// Resolve a targeted action and collect its per-target results.
pub(crate) fn resolve(
    game: &mut Game,
    action: &Action,
    source: EntityId,
    event: Option<&EventArgs>,
) -> GameResult<Vec<Value>> {
    debug_assert!(!action.op.is_game_op());

    let source = resolve_source(game, action, source);
    let times = action.times.resolve(game, source, event)?;

    let mut results = Vec::new();
    let mut stage = BroadcastStage::new();
    for _ in 0..times {
        let targets = resolve_targets(game, action, source, event);
        game.log_action(action.op, source, &targets);

        for &target in &targets {
            let target_args = catalog::target_args(game, action, source, target, event)?;
            let value = catalog::apply(game, action, source, target, &target_args, &mut stage)?;
            results.push(value);

            if !action.callback.is_empty() {
                let mut record = Vec::with_capacity(1 + target_args.len());
                record.push(Value::Entity(target));
                record.extend(target_args.iter().cloned());
                let record = EventArgs::new(record);
                results.extend(game.queue_actions(source, &action.callback, Some(&record))?);
            }
        }
    }
    stage.flush(game)?;

    Ok(results)
}

/// Apply the source redirect, if any. The selector must find exactly
/// one entity.
fn resolve_source(game: &mut Game, action: &Action, source: EntityId) -> EntityId {
    match &action.source_override {
        Some(selector) => {
            let found = selector.eval(game, source);
            assert!(
                found.len() == 1,
                "source selector must find exactly one entity, found {}",
                found.len()
            );
            found[0]
        }
        None => source,
    }
}

/// Resolve the first argument into the target list for one repetition.
fn resolve_targets(
    game: &mut Game,
    action: &Action,
    source: EntityId,
    event: Option<&EventArgs>,
) -> Vec<EntityId> {
    match action.args.first() {
        None => Vec::new(),
        Some(arg) => arg.resolve(game, source, event).entities(),
    }
}
