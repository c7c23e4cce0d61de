//! Resolution of game ops.
//!
//! Game ops run the session: turn flow, combat, card plays, and
//! choices. Unlike targeted ops they resolve once, and every game op
//! ends with a death sweep, which is what makes deaths cascade - a
//! deathrattle that kills something queues a `Death` game op, whose
//! own sweep picks up the next wave of corpses.

use crate::actions::{Action, EventArgs, Op, Value};
use crate::core::{CardType, EntityId, GameError, GameResult, GameTag, MulliganState, PlayState, Zone};
use crate::game::{Choice, ChoiceKind, Game};
use crate::triggers::{BroadcastStage, Phase};

/// Resolve one game op. Game ops produce no per-target values.
pub(crate) fn resolve(
    game: &mut Game,
    action: &Action,
    source: EntityId,
    event: Option<&EventArgs>,
) -> GameResult<Vec<Value>> {
    debug_assert!(action.op.is_game_op());

    let values: Vec<Value> = action
        .args
        .iter()
        .map(|arg| arg.resolve(game, source, event))
        .collect();
    game.log_action(action.op, source, &[]);

    match action.op {
        Op::Attack => attack(game, &values)?,
        Op::BeginTurn => begin_turn(game, &values)?,
        Op::Concede => concede(game, &values)?,
        Op::Death => death(game, &values)?,
        Op::Deaths => {}
        Op::EndTurn => end_turn(game, &values)?,
        Op::GenericChoice => generic_choice(game, source, &values),
        Op::Joust => joust(game, action, source, &values)?,
        Op::MulliganChoice => mulligan_choice(game, source, &values),
        Op::Activate => activate(game, &values)?,
        Op::Overload => overload(game, source, &values)?,
        Op::Play => play(game, &values)?,
        op => unreachable!("{op:?} is a targeted op, not a game op"),
    }

    game.process_deaths()?;
    Ok(Vec::new())
}

/// Run a proposed attack to completion.
///
/// The ON broadcast happens while the attack is still a proposal, so
/// reactions may redirect the defender or knock the attacker out of
/// combat before any damage is queued.
fn attack(game: &mut Game, values: &[Value]) -> GameResult<()> {
    let attacker = values[0].as_entity();
    let defender = values[1].as_entity();
    log::debug!("{} attacks {}", game.card(attacker), game.card(defender));

    game.card_mut(attacker).attack_target = Some(defender);
    game.card_mut(defender).defending = true;
    game.proposed_attacker = Some(attacker);
    game.proposed_defender = Some(defender);

    let args = EventArgs::new([Value::Entity(attacker), Value::Entity(defender)]);
    game.broadcast(Op::Attack, Phase::On, &args, None)?;

    // A reaction may have swapped the defender.
    let defender = game.proposed_defender.unwrap_or(defender);
    game.proposed_attacker = None;
    game.proposed_defender = None;

    if should_exit_combat(game, attacker) {
        log::debug!("{} leaves combat before striking", game.card(attacker));
        game.card_mut(attacker).attack_target = None;
        game.card_mut(defender).defending = false;
        return Ok(());
    }
    assert!(attacker != defender, "{attacker} cannot attack itself");

    // Capture both attack values before either hit lands.
    let attacker_atk = game.card(attacker).atk();
    let defender_atk = game.card(defender).atk();
    game.queue_actions(attacker, &[Action::hit(defender, attacker_atk)], None)?;
    if defender_atk > 0 {
        game.queue_actions(defender, &[Action::hit(attacker, defender_atk)], None)?;
    }

    let args = EventArgs::new([Value::Entity(attacker), Value::Entity(defender)]);
    game.broadcast(Op::Attack, Phase::After, &args, None)?;

    game.card_mut(attacker).attack_target = None;
    game.card_mut(defender).defending = false;
    game.card_mut(attacker).num_attacks += 1;
    Ok(())
}

/// The attack is abandoned if a reaction unseated the attacker.
fn should_exit_combat(game: &Game, attacker: EntityId) -> bool {
    let card = game.card(attacker);
    card.to_be_destroyed || card.zone != Zone::Play || card.has_tag(GameTag::Frozen)
}

fn begin_turn(game: &mut Game, values: &[Value]) -> GameResult<()> {
    let player_entity = values[0].as_entity();
    let args = EventArgs::new([Value::Entity(player_entity)]);
    game.broadcast(Op::BeginTurn, Phase::On, &args, None)?;

    let player = game.controller_of(player_entity);
    game.turn += 1;
    game.current_player = player;
    log::debug!("{player} begins turn {}", game.turn);

    let cap = game.config.max_mana as i32;
    {
        let state = game.player_mut(player);
        state.max_mana = (state.max_mana + 1).min(cap);
        state.used_mana = 0;
        state.temp_mana = 0;
        state.overload_locked = state.overloaded;
        state.overloaded = 0;
        state.combo = false;
        state.cards_played_this_turn = 0;
    }

    // Wake the player's characters and refresh their attacks.
    let mut refresh: Vec<EntityId> = game.player(player).board.clone();
    refresh.extend(game.player(player).hero);
    refresh.extend(game.player(player).hero_power);
    for card in refresh {
        let card = game.card_mut(card);
        card.num_attacks = 0;
        card.turns_in_play += 1;
        card.activations_this_turn = 0;
    }

    game.queue_actions(player_entity, &[Action::draw(player_entity)], None)?;
    Ok(())
}

fn concede(game: &mut Game, values: &[Value]) -> GameResult<()> {
    let player = game.controller_of(values[0].as_entity());
    log::debug!("{player} concedes");
    game.player_mut(player).play_state = PlayState::Quit;
    game.check_for_end_game();
    Ok(())
}

fn death(game: &mut Game, values: &[Value]) -> GameResult<()> {
    let target = values[0].as_entity();
    log::debug!("{} dies", game.card(target));
    let args = EventArgs::new([Value::Entity(target)]);
    game.broadcast(Op::Death, Phase::On, &args, None)?;
    if !game.deathrattles_of(target).is_empty() {
        game.queue_actions(target, &[Action::deathrattle(target)], None)?;
    }
    Ok(())
}

fn end_turn(game: &mut Game, values: &[Value]) -> GameResult<()> {
    let player_entity = values[0].as_entity();
    let player = game.controller_of(player_entity);
    if game.player(player).choice.is_some() {
        return Err(GameError::ChoiceOpen(player));
    }

    let args = EventArgs::new([Value::Entity(player_entity)]);
    game.broadcast(Op::EndTurn, Phase::On, &args, None)?;
    log::debug!("{player} ends turn {}", game.turn);

    game.player_mut(player).temp_mana = 0;

    // Frozen characters that never got to attack thaw now.
    for card in game.characters_of(player) {
        let card = game.card_mut(card);
        if card.has_tag(GameTag::Frozen) && card.num_attacks == 0 {
            card.remove_tag(GameTag::Frozen);
        }
    }
    game.expire_one_turn_buffs();

    let next = EntityId::player(game.next_player(player));
    game.queue_actions(next, &[Action::begin_turn(next)], None)?;
    Ok(())
}

fn generic_choice(game: &mut Game, source: EntityId, values: &[Value]) {
    let player = game.controller_of(values[0].as_entity());
    let options = values[1].entities();
    log::debug!("{player} must choose among {} options", options.len());
    game.player_mut(player).choice = Some(Choice {
        kind: ChoiceKind::Generic,
        source,
        options,
    });
}

/// Reveal one card from each side and compare costs. Callbacks run
/// only when the challenger wins, with `[challenger, defender]` as the
/// event record.
fn joust(game: &mut Game, action: &Action, source: EntityId, values: &[Value]) -> GameResult<()> {
    let challenger = values[0].entities().first().copied();
    let defender = values[1].entities().first().copied();

    let won = match (challenger, defender) {
        (Some(challenger), Some(defender)) => {
            log::debug!(
                "joust: {} vs {}",
                game.card(challenger),
                game.card(defender)
            );
            game.card(challenger).cost > game.card(defender).cost
        }
        _ => false,
    };

    if won {
        let to_value = |card: Option<EntityId>| card.map_or(Value::None, Value::Entity);
        let record = EventArgs::new([to_value(challenger), to_value(defender)]);
        game.queue_actions(source, &action.callback, Some(&record))?;
    }
    Ok(())
}

fn mulligan_choice(game: &mut Game, source: EntityId, values: &[Value]) {
    let player = game.controller_of(values[0].as_entity());
    game.player_mut(player).mulligan_state = MulliganState::Input;

    // The bonus coin is not offered back.
    let coin = game.config.coin_card.clone();
    let options: Vec<EntityId> = game
        .player(player)
        .hand
        .iter()
        .copied()
        .filter(|&card| coin.as_deref() != Some(game.card(card).card_id.as_str()))
        .collect();
    game.player_mut(player).choice = Some(Choice {
        kind: ChoiceKind::Mulligan,
        source,
        options,
    });
}

fn activate(game: &mut Game, values: &[Value]) -> GameResult<()> {
    let player_entity = values[0].as_entity();
    let power = values[1].as_entity();
    let target = values[2].entity();
    log::debug!("{} activates {}", game.controller_of(player_entity), game.card(power));

    let to_value = |card: Option<EntityId>| card.map_or(Value::None, Value::Entity);
    let args = EventArgs::new([
        Value::Entity(player_entity),
        Value::Entity(power),
        to_value(target),
    ]);
    game.broadcast(Op::Activate, Phase::On, &args, None)?;

    let actions = game.registry.must_get(&game.card(power).card_id).activate.clone();
    if let Some(target) = target {
        game.card_mut(power).target = Some(target);
    }
    game.queue_actions(power, &actions, None)?;
    game.card_mut(power).target = None;

    // Inspire minions react to any hero power use.
    let player = game.controller_of(player_entity);
    for minion in game.player(player).board.clone() {
        let inspire = game
            .registry
            .must_get(&game.card(minion).card_id)
            .inspire
            .clone();
        if !inspire.is_empty() {
            game.queue_actions(minion, &inspire, None)?;
        }
    }

    game.card_mut(power).activations_this_turn += 1;
    Ok(())
}

fn overload(game: &mut Game, source: EntityId, values: &[Value]) -> GameResult<()> {
    let player_entity = values[0].as_entity();
    let amount = values[1].as_int();
    let player = game.controller_of(player_entity);
    if game.player(player).has_tag(GameTag::CantOverload) {
        log::debug!("{player} cannot be overloaded");
        return Ok(());
    }
    log::debug!("{} overloads {player} for {amount}", source);

    let args = EventArgs::new([Value::Entity(player_entity), Value::Int(amount)]);
    game.broadcast(Op::Overload, Phase::On, &args, None)?;
    game.player_mut(player).overloaded += amount;
    Ok(())
}

/// Play a card from hand.
///
/// Countering the card during the ON window suppresses its script and
/// both completion broadcasts; the mana is already spent.
fn play(game: &mut Game, values: &[Value]) -> GameResult<()> {
    let player_entity = values[0].as_entity();
    let card = values[1].as_entity();
    let target = values[2].entity();
    let index = match values[3] {
        Value::None => None,
        Value::Int(index) => Some(index.max(0) as usize),
        ref other => panic!("expected a board index, got {other:?}"),
    };
    let choose = values[4].entity();

    let player = game.controller_of(player_entity);
    log::debug!("{player} plays {}", game.card(card));

    let cost = game.card(card).cost;
    game.pay_cost(player, cost);
    game.card_mut(card).target = target;
    game.card_mut(card).summon_position = index;

    let data = game.registry.must_get(&game.card(card).card_id).clone();
    let mut stage = BroadcastStage::new();
    if data.secret {
        game.move_to_zone(card, Zone::Secret);
    } else {
        game.move_to_zone(card, Zone::Play);
    }

    // Playing a minion also reads as a summon to everyone else, but
    // that news is held back until the play itself is announced.
    if data.card_type == CardType::Minion {
        let args = EventArgs::new([Value::Entity(player_entity), Value::Entity(card)]);
        stage.stage(Op::Summon, args, Some(card));
    }
    let to_value = |card: Option<EntityId>| card.map_or(Value::None, Value::Entity);
    let on_args = EventArgs::new([
        Value::Entity(player_entity),
        Value::Entity(card),
        to_value(target),
    ]);
    game.broadcast(Op::Play, Phase::On, &on_args, Some(card))?;
    stage.flush(game)?;

    if !game.card(card).has_tag(GameTag::Countered) {
        let script_card = choose.unwrap_or(card);
        let script_target = game.card(card).target;
        game.queue_actions(
            card,
            &[Action::battlecry(script_card, script_target)],
            None,
        )?;

        // The script may have morphed the card; completion broadcasts
        // name what actually hit the table.
        let played = game.card(card).morphed.unwrap_or(card);
        if game.card(played).card_type == CardType::Minion {
            let args = EventArgs::new([Value::Entity(player_entity), Value::Entity(played)]);
            game.broadcast(Op::Summon, Phase::After, &args, Some(played))?;
        }
        let args = EventArgs::new([
            Value::Entity(player_entity),
            Value::Entity(played),
            to_value(target),
        ]);
        game.broadcast(Op::Play, Phase::After, &args, Some(played))?;
    }

    game.player_mut(player).combo = true;
    game.player_mut(player).cards_played_this_turn += 1;
    game.card_mut(card).target = None;

    // Spent spells leave play; secrets stay hidden.
    if data.card_type == CardType::Spell
        && !data.secret
        && game.card(card).zone == Zone::Play
    {
        game.move_to_zone(card, Zone::Graveyard);
    }
    Ok(())
}
