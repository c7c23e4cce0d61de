//! Listener and broadcast integration tests.
//!
//! Listeners are stored actions used as patterns. These tests pin the
//! delivery rules: owner-relative matching, the sweep order, once
//! semantics, staged broadcasts, and the countered-play path.

use brazier::{
    Action, Arg, CardData, CardRegistry, EntityId, Filter, Game, GameConfig, GameStatus, GameTag,
    Op, PlayerId, Selector, Value, Zone,
};

fn test_registry() -> CardRegistry {
    let mut registry = CardRegistry::new();
    registry.register(CardData::hero("hero", "Test Hero", 30));
    registry.register(CardData::minion("wisp", "Wisp", 0, 1, 1));
    registry.register(CardData::minion("yeti", "Chillwind Yeti", 4, 4, 5));
    registry.register(
        CardData::spell("bolt", "Fire Bolt", 1)
            .with_play([Action::hit(Selector::EnemyHero, 3)]),
    );
    // Draws a card whenever it takes damage.
    registry.register(
        CardData::minion("watcher", "Watcher", 2, 1, 3).with_listener(
            Action::damage(Selector::It).on([Action::draw(Selector::Controller)]),
        ),
    );
    // Armors the hero whenever a friendly minion takes damage.
    registry.register(
        CardData::minion("guardian", "Guardian", 2, 2, 4).with_listener(
            Action::damage(Selector::FriendlyMinions)
                .on([Action::gain_armor(Selector::FriendlyHero, 1)]),
        ),
    );
    // One-shot reaction to any damage.
    registry.register(
        CardData::minion("alarm", "Alarm Bot", 1, 1, 2).with_listener(
            Action::damage(Arg::None)
                .on([Action::gain_armor(Selector::FriendlyHero, 1)])
                .once(),
        ),
    );
    // Silences friendly taunts when anything takes damage.
    registry.register(
        CardData::minion("disarmer", "Disarmer", 2, 2, 2).with_listener(
            Action::damage(Arg::None).on([Action::silence(Selector::Filtered {
                base: Box::new(Selector::FriendlyMinions),
                filter: Filter::WithTag(GameTag::Taunt),
            })]),
        ),
    );
    // Punishes any damage with a big hit on the enemy hero.
    registry.register(
        CardData::minion("vengeful", "Vengeful", 3, 2, 3)
            .with_tag(GameTag::Taunt)
            .with_listener(
                Action::damage(Arg::None).on([Action::hit(Selector::EnemyHero, 5)]),
            ),
    );
    // Reacts to the opponent playing any card.
    registry.register(
        CardData::minion("play_watch", "Play Watcher", 2, 1, 2).with_listener(
            Action::new(Op::Play, [Arg::Select(Selector::Opponent)])
                .on([Action::gain_armor(Selector::FriendlyHero, 2)]),
        ),
    );
    // Reacts to the opponent summoning any minion.
    registry.register(
        CardData::minion("summon_watch", "Summon Watcher", 2, 1, 2).with_listener(
            Action::new(Op::Summon, [Arg::Select(Selector::Opponent)])
                .on([Action::hit(Selector::FriendlyHero, 3)]),
        ),
    );
    // Reacts after the opponent's play fully resolves.
    registry.register(
        CardData::minion("after_watch", "After Watcher", 2, 1, 2).with_listener(
            Action::new(Op::Play, [Arg::Select(Selector::Opponent)])
                .after([Action::gain_armor(Selector::FriendlyHero, 2)]),
        ),
    );
    // Gives the controller a wisp whenever any card is played.
    registry.register(
        CardData::minion("echo", "Echo", 1, 1, 1).with_listener(
            Action::new(Op::Play, [Arg::None])
                .on([Action::give(Selector::Controller, "wisp")]),
        ),
    );
    // Hits a healed character for the amount it was healed.
    registry.register(
        CardData::minion("leech", "Leech", 2, 2, 2).with_listener(
            Action::new(Op::Heal, [Arg::None])
                .on([Action::hit(Arg::event(0), Arg::event(1))]),
        ),
    );
    registry.register(
        CardData::spell("counterspell", "Counterspell", 3).secret().with_listener(
            Action::new(Op::Play, [Arg::Select(Selector::Opponent)])
                .on([Action::counter(Arg::event(1))]),
        ),
    );
    registry
}

fn test_game() -> Game {
    let mut game = Game::new(GameConfig::default(), test_registry(), 42);
    for player in game.player_ids().collect::<Vec<_>>() {
        game.assign_hero(player, "hero");
    }
    game
}

fn put_in_hand(game: &mut Game, card_id: &str, player: PlayerId) -> EntityId {
    let card = game.create_card(card_id, player);
    game.move_to_zone(card, Zone::Hand);
    card
}

/// Test that a listener fires when its damage pattern matches.
#[test]
fn test_listener_reacts_to_matching_damage() {
    let mut game = test_game();
    let p0 = PlayerId::new(0);
    let p1 = PlayerId::new(1);
    let watcher = game.put_in_play("watcher", p0);
    game.add_deck(p0, &["wisp"]).unwrap();
    let rival_hero = game.hero_of(p1);

    game.queue_actions(rival_hero, &[Action::hit(watcher, 1)], None)
        .unwrap();

    assert_eq!(game.player(p0).hand.len(), 1, "the watcher should draw");
    assert_eq!(game.card(watcher).damage, 1);
}

/// Test that selector patterns are evaluated relative to the listener's
/// owner, not the broadcast's source.
#[test]
fn test_pattern_matches_relative_to_owner() {
    let mut game = test_game();
    let p0 = PlayerId::new(0);
    let p1 = PlayerId::new(1);
    game.put_in_play("guardian", p0);
    let friendly = game.put_in_play("wisp", p0);
    let enemy = game.put_in_play("wisp", p1);
    let hero0 = game.hero_of(p0);
    let rival_hero = game.hero_of(p1);

    game.queue_actions(rival_hero, &[Action::hit(friendly, 1)], None)
        .unwrap();
    assert_eq!(game.card(hero0).armor, 1, "a friendly minion was damaged");

    game.queue_actions(hero0, &[Action::hit(enemy, 1)], None)
        .unwrap();
    assert_eq!(
        game.card(hero0).armor,
        1,
        "an enemy minion's pain is not the guardian's business"
    );
}

/// Test that a once listener unregisters before its response runs.
#[test]
fn test_once_listener_fires_once() {
    let mut game = test_game();
    let p0 = PlayerId::new(0);
    let p1 = PlayerId::new(1);
    let alarm = game.put_in_play("alarm", p0);
    let yeti = game.put_in_play("yeti", p1);
    let hero0 = game.hero_of(p0);

    game.queue_actions(hero0, &[Action::hit(yeti, 1), Action::hit(yeti, 1)], None)
        .unwrap();

    assert_eq!(game.card(hero0).armor, 1, "the alarm only rings once");
    assert!(game.card(alarm).listeners.is_empty());
}

/// Test that a response can disarm a listener queued later in the sweep.
#[test]
fn test_response_disarms_later_listener() {
    let mut game = test_game();
    let p0 = PlayerId::new(0);
    let p1 = PlayerId::new(1);
    game.put_in_play("disarmer", p0);
    let vengeful = game.put_in_play("vengeful", p0);
    let wisp = game.put_in_play("wisp", p0);
    let rival_hero = game.hero_of(p1);

    game.queue_actions(rival_hero, &[Action::hit(wisp, 1)], None)
        .unwrap();

    assert!(game.card(vengeful).silenced, "the disarmer reacts first");
    assert_eq!(
        game.card(rival_hero).damage,
        0,
        "the silenced listener must not fire"
    );
}

/// Test that a minion's summon announcement waits for the play
/// announcement when it arrives via a play.
#[test]
fn test_summon_broadcast_staged_behind_play() {
    let mut game = test_game();
    let p0 = PlayerId::new(0);
    let p1 = PlayerId::new(1);
    game.put_in_play("play_watch", p1);
    game.put_in_play("summon_watch", p1);
    let wisp = put_in_hand(&mut game, "wisp", p0);
    game.player_mut(p0).max_mana = 10;
    game.status = GameStatus::Playing;
    let rival_hero = game.hero_of(p1);

    game.play(wisp, None, None, None).unwrap();

    // Play fires first (armor 2), then the staged summon hit lands on
    // the armored hero.
    assert_eq!(game.card(rival_hero).armor, 0);
    assert_eq!(game.card(rival_hero).damage, 1);
}

/// Test that a played card never reacts to its own play.
#[test]
fn test_played_card_skips_its_own_broadcasts() {
    let mut game = test_game();
    let p0 = PlayerId::new(0);
    let echo = put_in_hand(&mut game, "echo", p0);
    let wisp = put_in_hand(&mut game, "wisp", p0);
    game.player_mut(p0).max_mana = 10;
    game.status = GameStatus::Playing;

    game.play(echo, None, None, None).unwrap();
    assert_eq!(game.player(p0).hand, vec![wisp], "echo must not hear itself");

    game.play(wisp, None, None, None).unwrap();
    let hand = &game.player(p0).hand;
    assert_eq!(hand.len(), 1, "echo reacts to the second play");
    assert_eq!(game.card(hand[0]).card_id, "wisp");
    assert_ne!(hand[0], wisp, "the given wisp is a fresh copy");
}

/// Test that heal broadcasts are deferred and carry the settled amount.
#[test]
fn test_heal_broadcast_carries_settled_amount() {
    let mut game = test_game();
    let p0 = PlayerId::new(0);
    game.put_in_play("leech", p0);
    let yeti = game.put_in_play("yeti", p0);
    game.card_mut(yeti).damage = 3;
    let hero0 = game.hero_of(p0);

    let results = game
        .queue_actions(hero0, &[Action::heal(yeti, 2)], None)
        .unwrap();

    assert_eq!(results, vec![Value::Int(2)]);
    assert_eq!(
        game.card(yeti).damage,
        3,
        "the leech takes back exactly what was healed"
    );
}

/// Test that both phases fire across a play that resolves normally.
#[test]
fn test_play_phases_fire_in_order() {
    let mut game = test_game();
    let p0 = PlayerId::new(0);
    let p1 = PlayerId::new(1);
    game.put_in_play("play_watch", p1);
    game.put_in_play("after_watch", p1);
    let bolt = put_in_hand(&mut game, "bolt", p0);
    game.player_mut(p0).max_mana = 10;
    game.status = GameStatus::Playing;
    let rival_hero = game.hero_of(p1);

    game.play(bolt, None, None, None).unwrap();

    // On-phase armor (2) soaks part of the bolt (3); after-phase armor
    // (2) arrives once the script has resolved.
    assert_eq!(game.card(rival_hero).damage, 1);
    assert_eq!(game.card(rival_hero).armor, 2);
    assert_eq!(game.card(bolt).zone, Zone::Graveyard);
}

/// Test that countering a play skips its script and completion phase.
#[test]
fn test_countered_play_skips_script_and_after() {
    let mut game = test_game();
    let p0 = PlayerId::new(0);
    let p1 = PlayerId::new(1);
    game.put_in_play("play_watch", p1);
    game.put_in_play("after_watch", p1);
    let trap = game.create_card("counterspell", p1);
    game.move_to_zone(trap, Zone::Secret);
    let bolt = put_in_hand(&mut game, "bolt", p0);
    game.player_mut(p0).max_mana = 10;
    game.status = GameStatus::Playing;
    let rival_hero = game.hero_of(p1);

    game.play(bolt, None, None, None).unwrap();

    assert!(game.card(bolt).has_tag(GameTag::Countered));
    assert_eq!(game.card(rival_hero).damage, 0, "the script never runs");
    assert_eq!(
        game.card(rival_hero).armor,
        2,
        "on-phase listeners still fire, after-phase ones do not"
    );
    assert_eq!(game.card(bolt).zone, Zone::Graveyard, "countered spells are spent");
    assert_eq!(game.player(p0).cards_played_this_turn, 1);
}

/// Test that cards in hand are swept for listeners, after the table.
#[test]
fn test_hand_listeners_swept_last() {
    let mut game = test_game();
    let p0 = PlayerId::new(0);
    let p1 = PlayerId::new(1);
    put_in_hand(&mut game, "alarm", p1);
    let yeti = game.put_in_play("yeti", p0);
    let hero0 = game.hero_of(p0);
    let rival_hero = game.hero_of(p1);

    game.queue_actions(hero0, &[Action::hit(yeti, 1)], None)
        .unwrap();

    assert_eq!(
        game.card(rival_hero).armor,
        1,
        "a listener in hand still hears the broadcast"
    );
}
