//! Per-op behavior for the targeted half of the catalog.
//!
//! Two entry points, both called from the targeted resolution loop:
//!
//! - [`target_args`] resolves an action's non-target arguments for one
//!   target. Most ops resolve positionally; a few read live state
//!   instead (`Damage` reads staged predamage, `Draw` peeks the deck).
//! - [`apply`] executes the op against one target. This is the only
//!   place op semantics live; every arm is written here and nowhere
//!   else.
//!
//! Ops that other entities may react to mid-resolution broadcast
//! immediately; ops whose reactions must wait for a settled board
//! (healing, summon entry) defer through the caller's stage.

use crate::actions::{Action, Arg, CardSpec, EventArgs, Op, Value};
use crate::actions::action::BuffProp;
use crate::cards::Buff;
use crate::core::{CardType, EntityId, GameResult, GameTag, Zone};
use crate::game::Game;
use crate::triggers::{BroadcastStage, Phase};

/// Resolve the non-target arguments for one target.
pub(crate) fn target_args(
    game: &mut Game,
    action: &Action,
    source: EntityId,
    target: EntityId,
    event: Option<&EventArgs>,
) -> GameResult<Vec<Value>> {
    match action.op {
        // Damage always applies what Predamage staged on the target.
        Op::Damage => Ok(vec![Value::Int(game.card(target).predamage)]),
        Op::Draw => {
            let controller = game.controller_of(target);
            let top = game.player(controller).deck.last().copied();
            Ok(vec![top.map_or(Value::None, Value::Entity)])
        }
        Op::Discover => {
            let Some(Arg::Cards(CardSpec::Pick(picker))) = action.args.get(1) else {
                panic!("discover requires a card picker argument");
            };
            let ids = picker.clone().times(3).evaluate(game, source);
            let controller = game.controller_of(target);
            let options = ids
                .iter()
                .map(|id| game.create_card(id, controller))
                .collect();
            Ok(vec![Value::Entities(options)])
        }
        Op::Morph => {
            let arg = action.args.get(1).unwrap_or(&Arg::None);
            let cards = arg.resolve(game, source, event).entities();
            assert!(
                cards.len() == 1,
                "morph requires exactly one replacement, found {}",
                cards.len()
            );
            Ok(vec![Value::Entity(cards[0])])
        }
        Op::Retarget => {
            let arg = action.args.get(1).unwrap_or(&Arg::None);
            let found = arg.resolve(game, source, event).entities();
            if found.is_empty() {
                return Ok(vec![Value::None]);
            }
            assert!(
                found.len() == 1,
                "retarget requires at most one new target, found {}",
                found.len()
            );
            Ok(vec![Value::Entity(found[0])])
        }
        // Buff applies its enchantment id per target in `apply`.
        Op::Buff => Ok(Vec::new()),
        _ => Ok(action
            .args
            .iter()
            .skip(1)
            .map(|arg| arg.resolve(game, source, event))
            .collect()),
    }
}

/// Execute one targeted op against one target.
pub(crate) fn apply(
    game: &mut Game,
    action: &Action,
    source: EntityId,
    target: EntityId,
    target_args: &[Value],
    stage: &mut BroadcastStage,
) -> GameResult<Value> {
    match action.op {
        Op::Battlecry => battlecry(game, target, target_args),
        Op::Bounce => {
            let controller = game.card(target).controller;
            if game.player(controller).hand.len() >= game.config.max_hand {
                log::debug!("{} bounces into a full hand and dies", game.card(target));
                game.queue_actions(source, &[Action::destroy(target)], None)?;
            } else {
                game.move_to_zone(target, Zone::Hand);
            }
            Ok(Value::None)
        }
        Op::Buff => {
            let Some(Arg::Cards(CardSpec::Id(buff_id))) = action.args.get(1) else {
                panic!("buff requires an enchantment card id argument");
            };
            let data = game.registry.must_get(buff_id).clone();
            let mut buff = Buff::from_data(&data, source);
            for (prop, lazy) in &action.overrides {
                let value = lazy.evaluate(game, source);
                match prop {
                    BuffProp::Atk => buff.atk = value,
                    BuffProp::MaxHealth => buff.max_health = value,
                }
            }
            log::debug!("{} gains {}", game.card(target), buff_id);
            game.card_mut(target).attach(buff);
            Ok(Value::None)
        }
        Op::CopyDeathrattles => {
            let from = target_args.first().map_or_else(Vec::new, Value::entities);
            for card in from {
                for actions in game.deathrattles_of(card) {
                    game.card_mut(target).extra_deathrattles.push(actions);
                }
            }
            Ok(Value::None)
        }
        Op::Counter => {
            log::debug!("{} is countered", game.card(target));
            game.card_mut(target).set_tag(GameTag::Countered, 1);
            Ok(Value::None)
        }
        Op::Damage => {
            let staged = target_args[0].as_int();
            let dealt = game.card_mut(target).apply_hit(staged);
            game.card_mut(target).predamage = 0;
            if dealt != 0 {
                if !game.is_player(source)
                    && game.card(source).card_type == CardType::Minion
                    && game.card(source).has_tag(GameTag::Stealth)
                {
                    game.card_mut(source).remove_tag(GameTag::Stealth);
                }
                log::debug!("{} takes {} damage", game.card(target), dealt);
                let args = EventArgs::new([
                    Value::Entity(target),
                    Value::Int(dealt),
                    Value::Entity(source),
                ]);
                game.broadcast(Op::Damage, Phase::On, &args, None)?;
            }
            Ok(Value::Int(dealt))
        }
        Op::Deathrattle => {
            let rattles = game.deathrattles_of(target);
            for actions in &rattles {
                log::debug!("{} fires a deathrattle", game.card(target));
                game.queue_actions(target, actions, None)?;
            }
            let controller = game.card(target).controller;
            if game.player(controller).has_tag(GameTag::ExtraDeathrattles) {
                for actions in &rattles {
                    game.queue_actions(target, actions, None)?;
                }
            }
            Ok(Value::None)
        }
        Op::Destroy => {
            if game.card(target).zone == Zone::Play {
                game.card_mut(target).to_be_destroyed = true;
            } else {
                log::debug!("{} is destroyed outside play", game.card(target));
                game.move_to_zone(target, Zone::Graveyard);
            }
            Ok(Value::None)
        }
        Op::Discard => {
            log::debug!("{} is discarded", game.card(target));
            let args = EventArgs::new([Value::Entity(target)]);
            game.broadcast(Op::Discard, Phase::On, &args, None)?;
            game.move_to_zone(target, Zone::Graveyard);
            Ok(Value::None)
        }
        Op::Discover => {
            let options = target_args[0].entities();
            let pick = Action::generic_choice(target, Arg::Entities(options));
            game.queue_actions(source, &[pick], None)?;
            Ok(Value::None)
        }
        Op::Draw => draw(game, source, target, target_args),
        Op::DrawUntil => {
            let goal = target_args[0].as_int();
            let controller = game.controller_of(target);
            let held = game.player(controller).hand.len() as i32;
            for _ in 0..(goal - held).max(0) {
                game.queue_actions(source, &[Action::draw(target)], None)?;
            }
            Ok(Value::None)
        }
        Op::Fatigue => {
            let controller = game.controller_of(target);
            if game.player(controller).has_tag(GameTag::CantFatigue) {
                log::debug!("{controller} is immune to fatigue");
                return Ok(Value::None);
            }
            game.player_mut(controller).fatigue_counter += 1;
            let counter = game.player(controller).fatigue_counter;
            log::debug!("{controller} takes fatigue hit {counter}");
            let hero = game.hero_of(controller);
            game.queue_actions(source, &[Action::hit(hero, counter)], None)?;
            Ok(Value::None)
        }
        Op::FillMana => {
            let amount = target_args[0].as_int();
            let controller = game.controller_of(target);
            let player = game.player_mut(controller);
            player.used_mana = (player.used_mana - amount).max(0);
            Ok(Value::None)
        }
        Op::ForceDraw => {
            // target is a card still in a deck
            let controller = game.card(target).controller;
            if game.player(controller).hand.len() >= game.config.max_hand {
                log::debug!("{} is drawn into a full hand and burns", game.card(target));
                game.move_to_zone(target, Zone::Graveyard);
            } else {
                game.move_to_zone(target, Zone::Hand);
            }
            Ok(Value::None)
        }
        Op::FullHeal => {
            let max = game.card(target).max_health();
            game.queue_actions(source, &[Action::heal(target, max)], None)?;
            Ok(Value::None)
        }
        Op::GainArmor => {
            let amount = target_args[0].as_int();
            let hero = game.character_of(target);
            game.card_mut(hero).armor += amount;
            log::debug!("{} gains {} armor", game.card(hero), amount);
            let args = EventArgs::new([Value::Entity(hero), Value::Int(amount)]);
            game.broadcast(Op::GainArmor, Phase::On, &args, None)?;
            Ok(Value::None)
        }
        Op::GainMana => {
            let amount = target_args[0].as_int();
            let cap = game.config.max_mana as i32;
            let controller = game.controller_of(target);
            let player = game.player_mut(controller);
            player.max_mana = (player.max_mana + amount).clamp(0, cap);
            Ok(Value::None)
        }
        Op::GainEmptyMana => {
            let amount = target_args[0].as_int();
            let cap = game.config.max_mana as i32;
            let controller = game.controller_of(target);
            let player = game.player_mut(controller);
            let gained = (cap - player.max_mana).min(amount).max(0);
            player.max_mana += gained;
            player.used_mana += gained;
            Ok(Value::None)
        }
        Op::Give => {
            let cards = target_args[0].entities();
            let controller = game.controller_of(target);
            let mut given = Vec::new();
            for card in cards {
                if game.player(controller).hand.len() >= game.config.max_hand {
                    log::debug!("{controller}'s hand is full, {} is lost", game.card(card));
                    continue;
                }
                game.move_to_zone_of(card, controller, Zone::Hand);
                given.push(card);
            }
            Ok(Value::Entities(given))
        }
        Op::Heal => heal(game, source, target, target_args, stage),
        Op::Hit => {
            let mut amount = target_args[0].as_int();
            if !game.is_player(source) && game.card(source).card_type == CardType::Spell {
                amount += game.spell_damage_bonus(game.card(source).controller);
            }
            if amount == 0 {
                return Ok(Value::Int(0));
            }
            let results =
                game.queue_actions(source, &[Action::predamage(target, amount)], None)?;
            Ok(results.into_iter().next().unwrap_or(Value::Int(0)))
        }
        Op::ManaThisTurn => {
            let amount = target_args[0].as_int();
            let cap = game.config.max_mana as i32;
            let controller = game.controller_of(target);
            let available = game.player(controller).available_mana();
            let gain = (cap - available).min(amount).max(0);
            game.player_mut(controller).temp_mana += gain;
            Ok(Value::None)
        }
        Op::Mill => {
            let count = target_args[0].as_int().max(0);
            let controller = game.controller_of(target);
            for _ in 0..count {
                let Some(card) = game.player(controller).deck.last().copied() else {
                    break;
                };
                log::debug!("{} is milled", game.card(card));
                game.move_to_zone(card, Zone::Graveyard);
            }
            Ok(Value::None)
        }
        Op::Morph => {
            let card = target_args[0].as_entity();
            log::debug!("{} morphs into {}", game.card(target), game.card(card));
            let controller = game.card(target).controller;
            let old_zone = game.card(target).zone;
            game.card_mut(target).clear_buffs();
            game.move_to_zone_of(card, controller, old_zone);
            game.move_to_zone(target, Zone::SetAside);
            game.card_mut(target).morphed = Some(card);
            Ok(Value::Entity(card))
        }
        Op::Predamage => {
            let mut amount = target_args[0].as_int();
            let controller = game.controller_of(source);
            let doubles = game.player(controller).tag_value(GameTag::DamageDoubled);
            amount <<= doubles as u32;
            game.card_mut(target).predamage = amount;
            if amount == 0 {
                return Ok(Value::Int(0));
            }
            let args = EventArgs::new([Value::Entity(target), Value::Int(amount)]);
            game.broadcast(Op::Predamage, Phase::On, &args, None)?;
            let results = game.queue_actions(source, &[Action::damage(target)], None)?;
            Ok(results.into_iter().next().unwrap_or(Value::Int(0)))
        }
        Op::Retarget => {
            let Some(new_target) = target_args[0].entity() else {
                return Ok(Value::None);
            };
            if game.card(target).attack_target.is_some() {
                log::debug!(
                    "{}'s attack is redirected to {}",
                    game.card(target),
                    game.card(new_target)
                );
                if let Some(old) = game.proposed_defender {
                    game.card_mut(old).defending = false;
                }
                game.proposed_defender = Some(new_target);
                game.card_mut(new_target).defending = true;
            } else {
                game.card_mut(target).target = Some(new_target);
            }
            Ok(Value::None)
        }
        Op::Reveal => {
            log::debug!("{} is revealed", game.card(target));
            let args = EventArgs::new([Value::Entity(target)]);
            game.broadcast(Op::Reveal, Phase::On, &args, None)?;
            game.move_to_zone(target, Zone::Graveyard);
            Ok(Value::None)
        }
        Op::SetCurrentHealth => {
            let amount = target_args[0].as_int();
            let max = game.card(target).max_health();
            game.card_mut(target).damage = (max - amount).max(0);
            Ok(Value::None)
        }
        Op::SetTag => {
            let Value::Tags(tags) = &target_args[0] else {
                panic!("set tag requires a tags argument");
            };
            for &(tag, value) in tags {
                game.set_entity_tag(target, tag, value);
            }
            Ok(Value::None)
        }
        Op::Shuffle => {
            let controller = game.controller_of(target);
            let cards = target_args[0].entities();
            for card in cards {
                if game.player(controller).deck.len() >= game.config.max_deck {
                    log::debug!("{controller}'s deck is full, {} is lost", game.card(card));
                    continue;
                }
                game.move_to_zone_of(card, controller, Zone::Deck);
                game.shuffle_deck(controller);
            }
            Ok(Value::None)
        }
        Op::Silence => {
            log::debug!("{} is silenced", game.card(target));
            let args = EventArgs::new([Value::Entity(target)]);
            game.broadcast(Op::Silence, Phase::On, &args, None)?;
            let card = game.card_mut(target);
            card.clear_buffs();
            card.strip_silenceable_tags();
            card.listeners.clear();
            card.silenced = true;
            Ok(Value::None)
        }
        Op::Steal => {
            let controller = match target_args.first() {
                Some(value) => {
                    let found = value.entities();
                    assert!(
                        found.len() == 1,
                        "steal requires exactly one controller, found {}",
                        found.len()
                    );
                    game.controller_of(found[0])
                }
                None => game.controller_of(source),
            };
            log::debug!("{controller} takes control of {}", game.card(target));
            let zone = game.card(target).zone;
            game.move_to_zone(target, Zone::SetAside);
            game.card_mut(target).turns_in_play = 0;
            game.move_to_zone_of(target, controller, zone);
            Ok(Value::None)
        }
        Op::Summon => summon(game, source, target, target_args, stage),
        Op::Swap => {
            let others = target_args[0].entities();
            if let Some(&other) = others.first() {
                assert!(
                    others.len() == 1,
                    "swap requires at most one other card, found {}",
                    others.len()
                );
                let zone_a = game.card(target).zone;
                let zone_b = game.card(other).zone;
                game.move_to_zone(target, zone_b);
                game.move_to_zone(other, zone_a);
            }
            Ok(Value::None)
        }
        Op::SwapHealth => {
            let others = target_args[0].entities();
            let Some(&other) = others.first() else {
                return Ok(Value::None);
            };
            let health_a = game.card(target).health();
            let health_b = game.card(other).health();
            let max_a = game.card(target).max_health();
            let max_b = game.card(other).max_health();
            game.card_mut(target).damage = (max_a - health_b).max(0);
            game.card_mut(other).damage = (max_b - health_a).max(0);
            Ok(Value::None)
        }
        Op::UnlockOverload => {
            let controller = game.controller_of(target);
            let player = game.player_mut(controller);
            log::debug!("{controller} unlocks {} overloaded crystals", player.overloaded);
            player.overloaded = 0;
            player.overload_locked = 0;
            Ok(Value::None)
        }
        Op::UnsetTag => {
            let Value::Tags(tags) = &target_args[0] else {
                panic!("unset tag requires a tags argument");
            };
            for &(tag, _) in tags {
                game.unset_entity_tag(target, tag);
            }
            Ok(Value::None)
        }
        op => unreachable!("{op:?} is a game op, not a targeted op"),
    }
}

/// Run a card's battlecry (or combo) script. `target` is the card.
fn battlecry(game: &mut Game, card: EntityId, target_args: &[Value]) -> GameResult<Value> {
    let battlecry_target = target_args.first().and_then(Value::entity);
    let controller = game.card(card).controller;
    let data = game.registry.must_get(&game.card(card).card_id).clone();

    let combo = !data.combo.is_empty() && game.player(controller).combo;
    let actions = if combo { &data.combo } else { &data.play };

    if !actions.is_empty() {
        if data.targeted && battlecry_target.is_none() {
            log::debug!("{} requires a target, script skipped", game.card(card));
            return Ok(Value::None);
        }
        if let Some(picked) = battlecry_target {
            game.card_mut(card).target = Some(picked);
        }
        game.queue_actions(card, actions, None)?;
        if game.player(controller).has_tag(GameTag::ExtraBattlecries) && data.has_battlecry() {
            game.queue_actions(card, actions, None)?;
        }
    }
    game.process_deaths()?;

    if data.overload > 0 {
        let player = EntityId::player(controller);
        game.queue_actions(card, &[Action::overload(player, data.overload)], None)?;
    }
    Ok(Value::None)
}

/// Draw the top card, or fatigue on an empty deck.
fn draw(
    game: &mut Game,
    source: EntityId,
    target: EntityId,
    target_args: &[Value],
) -> GameResult<Value> {
    let card = match target_args[0] {
        Value::None => {
            let controller = game.controller_of(target);
            log::debug!("{controller} draws from an empty deck");
            game.queue_actions(source, &[Action::fatigue(target)], None)?;
            return Ok(Value::None);
        }
        Value::Entity(card) => card,
        ref other => panic!("expected a drawable card, got {other:?}"),
    };

    let controller = game.controller_of(target);
    if game.player(controller).hand.len() >= game.config.max_hand {
        log::debug!("{controller} overdraws and burns {}", game.card(card));
        game.move_to_zone(card, Zone::Graveyard);
    } else {
        log::debug!("{controller} draws {}", game.card(card));
        game.move_to_zone(card, Zone::Hand);
    }
    let args = EventArgs::new([
        Value::Entity(target),
        Value::Entity(card),
        Value::Entity(source),
    ]);
    game.broadcast(Op::Draw, Phase::On, &args, None)?;
    Ok(Value::Entity(card))
}

/// Restore health, honoring conversion and doubling modifiers. The
/// heal broadcast is deferred so reactions see the settled total.
fn heal(
    game: &mut Game,
    source: EntityId,
    target: EntityId,
    target_args: &[Value],
    stage: &mut BroadcastStage,
) -> GameResult<Value> {
    let amount = target_args[0].as_int();
    let controller = game.controller_of(source);

    if game.player(controller).has_tag(GameTag::HealingAsDamage) {
        let results = game.queue_actions(source, &[Action::hit(target, amount)], None)?;
        return Ok(results.into_iter().next().unwrap_or(Value::Int(0)));
    }

    let doubles = game.player(controller).tag_value(GameTag::HealingDoubled);
    let amount = (amount << doubles as u32).min(game.card(target).damage);
    if amount > 0 {
        log::debug!("{} heals {} for {}", game.card(source), game.card(target), amount);
        game.card_mut(target).damage -= amount;
        let args = EventArgs::new([Value::Entity(target), Value::Int(amount)]);
        stage.stage(Op::Heal, args, None);
    }
    Ok(Value::Int(amount))
}

/// Put cards into play for the target player. Entry reactions are
/// deferred; completion reactions fire per card.
fn summon(
    game: &mut Game,
    source: EntityId,
    target: EntityId,
    target_args: &[Value],
    stage: &mut BroadcastStage,
) -> GameResult<Value> {
    let controller = game.controller_of(target);
    let cards = target_args[0].entities();
    let player = EntityId::player(controller);

    let mut summoned = Vec::new();
    for (i, &card) in cards.iter().enumerate() {
        if !game.can_summon(card, controller) {
            log::debug!("{} cannot be summoned", game.card(card));
            continue;
        }
        log::debug!("{controller} summons {}", game.card(card));
        if game.card(card).zone != Zone::Play {
            // A minion summoning from play drops its tokens beside
            // itself, alternating right and left.
            if !game.is_player(source) {
                let src = game.card(source);
                if src.card_type == CardType::Minion && src.zone == Zone::Play {
                    let board = &game.player(src.controller).board;
                    if let Some(index) = board.iter().position(|&e| e == source) {
                        game.card_mut(card).summon_position = Some(index + (i + 1) % 2);
                    }
                }
            }
            game.move_to_zone_of(card, controller, Zone::Play);
        }
        let args = EventArgs::new([Value::Entity(player), Value::Entity(card)]);
        stage.stage(Op::Summon, args.clone(), Some(card));
        game.broadcast(Op::Summon, Phase::After, &args, Some(card))?;
        summoned.push(card);
    }
    Ok(Value::Entities(summoned))
}
