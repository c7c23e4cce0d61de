//! Combat integration tests.
//!
//! An attack is a proposal: reactions fire while it is pending and may
//! redirect or cancel it, then both characters strike simultaneously.

use brazier::{
    Action, Arg, CardData, CardRegistry, EntityId, Game, GameConfig, GameError, GameStatus,
    GameTag, Op, PlayerId, PlayState, Selector, Zone,
};

fn test_registry() -> CardRegistry {
    let mut registry = CardRegistry::new();
    registry.register(CardData::hero("hero", "Test Hero", 30));
    registry.register(CardData::minion("wisp", "Wisp", 0, 1, 1));
    registry.register(CardData::minion("yeti", "Chillwind Yeti", 4, 4, 5));
    registry.register(CardData::minion("dummy", "Target Dummy", 0, 0, 2));
    registry.register(CardData::minion("boar", "Stonetusk Boar", 1, 1, 1).with_tag(GameTag::Charge));
    registry.register(CardData::minion("harpy", "Windfury Harpy", 6, 4, 5).with_tag(GameTag::Windfury));
    registry.register(CardData::minion("tank", "Shield Tank", 3, 1, 4).with_tag(GameTag::Taunt));
    registry.register(CardData::minion("shade", "Shade", 3, 4, 4).with_tag(GameTag::Stealth));
    registry.register(
        CardData::minion("boomer", "Boomer", 3, 1, 1)
            .with_deathrattle([Action::hit(Selector::EnemyHero, 2)]),
    );
    // Drags any pending attack onto itself.
    registry.register(
        CardData::minion("bodyguard", "Bodyguard", 4, 2, 6).with_listener(
            Action::new(Op::Attack, [Arg::None])
                .on([Action::retarget(Arg::event(0), Selector::It)]),
        ),
    );
    // Freezes anyone who declares an attack.
    registry.register(
        CardData::minion("winterfang", "Winterfang", 4, 2, 4).with_listener(
            Action::new(Op::Attack, [Arg::None])
                .on([Action::set_tag(Arg::event(0), GameTag::Frozen)]),
        ),
    );
    registry
}

fn test_game() -> Game {
    let mut game = Game::new(GameConfig::default(), test_registry(), 42);
    for player in game.player_ids().collect::<Vec<_>>() {
        game.assign_hero(player, "hero");
    }
    game.status = GameStatus::Playing;
    game
}

/// Put a minion into play already awake.
fn put_awake(game: &mut Game, card_id: &str, player: PlayerId) -> EntityId {
    let card = game.put_in_play(card_id, player);
    game.card_mut(card).turns_in_play = 1;
    card
}

/// Test that attacking trades damage both ways.
#[test]
fn test_attack_trades_damage() {
    let mut game = test_game();
    let p0 = PlayerId::new(0);
    let p1 = PlayerId::new(1);
    let attacker = put_awake(&mut game, "yeti", p0);
    let defender = put_awake(&mut game, "yeti", p1);

    game.attack(attacker, defender).unwrap();

    assert_eq!(game.card(attacker).damage, 4);
    assert_eq!(game.card(defender).damage, 4);
    assert_eq!(game.card(attacker).num_attacks, 1);
    assert!(game.card(attacker).attack_target.is_none(), "proposal cleared");
    assert!(!game.card(defender).defending, "proposal cleared");
}

/// Test that a zero-attack defender deals no return damage.
#[test]
fn test_toothless_defender_does_not_strike_back() {
    let mut game = test_game();
    let p0 = PlayerId::new(0);
    let p1 = PlayerId::new(1);
    let attacker = put_awake(&mut game, "yeti", p0);
    let dummy = put_awake(&mut game, "dummy", p1);

    game.attack(attacker, dummy).unwrap();

    assert_eq!(game.card(dummy).damage, 4);
    assert_eq!(game.card(attacker).damage, 0, "nothing to strike back with");
}

/// Test the attacker-side validation errors.
#[test]
fn test_attacker_validation() {
    let mut game = test_game();
    let p0 = PlayerId::new(0);
    let p1 = PlayerId::new(1);
    let rival_hero = game.hero_of(p1);

    // Fresh minions are asleep.
    let sleepy = game.put_in_play("yeti", p0);
    assert!(matches!(
        game.attack(sleepy, rival_hero),
        Err(GameError::CannotAttack(_))
    ));

    // Charge skips the nap.
    let boar = game.put_in_play("boar", p0);
    game.attack(boar, rival_hero).unwrap();
    assert_eq!(game.card(rival_hero).damage, 1);

    // One attack per turn by default.
    assert!(matches!(
        game.attack(boar, rival_hero),
        Err(GameError::CannotAttack(_))
    ));

    // Frozen characters cannot attack.
    let frozen = put_awake(&mut game, "yeti", p0);
    game.card_mut(frozen).set_tag(GameTag::Frozen, 1);
    assert!(matches!(
        game.attack(frozen, rival_hero),
        Err(GameError::CannotAttack(_))
    ));

    // Zero attack means no attacking.
    let dummy = put_awake(&mut game, "dummy", p0);
    assert!(matches!(
        game.attack(dummy, rival_hero),
        Err(GameError::CannotAttack(_))
    ));

    // Pacifists cannot attack either.
    let pacifist = put_awake(&mut game, "yeti", p0);
    game.card_mut(pacifist).set_tag(GameTag::CantAttack, 1);
    assert!(matches!(
        game.attack(pacifist, rival_hero),
        Err(GameError::CannotAttack(_))
    ));

    // Only the active player attacks.
    let rival = put_awake(&mut game, "yeti", p1);
    let hero0 = game.hero_of(p0);
    assert!(matches!(
        game.attack(rival, hero0),
        Err(GameError::NotYourTurn(_))
    ));
}

/// Test that windfury grants a second attack per turn.
#[test]
fn test_windfury_attacks_twice() {
    let mut game = test_game();
    let p0 = PlayerId::new(0);
    let p1 = PlayerId::new(1);
    let harpy = put_awake(&mut game, "harpy", p0);
    let rival_hero = game.hero_of(p1);

    game.attack(harpy, rival_hero).unwrap();
    game.attack(harpy, rival_hero).unwrap();
    assert_eq!(game.card(rival_hero).damage, 8);

    assert!(matches!(
        game.attack(harpy, rival_hero),
        Err(GameError::CannotAttack(_)),
    ));
}

/// Test that taunt shields everything standing beside it.
#[test]
fn test_taunt_protects_neighbors() {
    let mut game = test_game();
    let p0 = PlayerId::new(0);
    let p1 = PlayerId::new(1);
    let attacker = put_awake(&mut game, "yeti", p0);
    let tank = put_awake(&mut game, "tank", p1);
    let wisp = put_awake(&mut game, "wisp", p1);
    let rival_hero = game.hero_of(p1);

    assert!(matches!(
        game.attack(attacker, wisp),
        Err(GameError::IllegalTarget(_))
    ));
    assert!(matches!(
        game.attack(attacker, rival_hero),
        Err(GameError::IllegalTarget(_))
    ));

    // A stealthed taunt stops taunting.
    game.card_mut(tank).set_tag(GameTag::Stealth, 1);
    game.attack(attacker, wisp).unwrap();
    assert!(game.card(wisp).is_dead());
}

/// Test that stealthed characters cannot be attacked directly.
#[test]
fn test_stealth_blocks_targeting() {
    let mut game = test_game();
    let p0 = PlayerId::new(0);
    let p1 = PlayerId::new(1);
    let attacker = put_awake(&mut game, "yeti", p0);
    let shade = put_awake(&mut game, "shade", p1);

    assert!(matches!(
        game.attack(attacker, shade),
        Err(GameError::IllegalTarget(_))
    ));
}

/// Test that a reaction can drag the attack onto another defender.
#[test]
fn test_reaction_redirects_attack() {
    let mut game = test_game();
    let p0 = PlayerId::new(0);
    let p1 = PlayerId::new(1);
    let attacker = put_awake(&mut game, "yeti", p0);
    let bodyguard = put_awake(&mut game, "bodyguard", p1);
    let rival_hero = game.hero_of(p1);

    game.attack(attacker, rival_hero).unwrap();

    assert_eq!(game.card(rival_hero).damage, 0, "the bodyguard steps in");
    assert_eq!(game.card(bodyguard).damage, 4);
    assert_eq!(game.card(attacker).damage, 2, "the bodyguard strikes back");
}

/// Test that freezing the attacker mid-proposal cancels the strikes.
#[test]
fn test_frozen_attacker_exits_combat() {
    let mut game = test_game();
    let p0 = PlayerId::new(0);
    let p1 = PlayerId::new(1);
    let attacker = put_awake(&mut game, "yeti", p0);
    let winterfang = put_awake(&mut game, "winterfang", p1);

    game.attack(attacker, winterfang).unwrap();

    assert!(game.card(attacker).has_tag(GameTag::Frozen));
    assert_eq!(game.card(attacker).damage, 0, "no blows were exchanged");
    assert_eq!(game.card(winterfang).damage, 0, "no blows were exchanged");
    assert_eq!(game.card(attacker).num_attacks, 0, "the attack never happened");
}

/// Test that lethal trades sweep both corpses and fire deathrattles.
#[test]
fn test_death_cascade_fires_deathrattles() {
    let mut game = test_game();
    let p0 = PlayerId::new(0);
    let p1 = PlayerId::new(1);
    let boomer = put_awake(&mut game, "boomer", p0);
    let wisp = put_awake(&mut game, "wisp", p1);
    let rival_hero = game.hero_of(p1);

    game.attack(boomer, wisp).unwrap();

    assert_eq!(game.card(boomer).zone, Zone::Graveyard);
    assert_eq!(game.card(wisp).zone, Zone::Graveyard);
    assert!(game.player(p0).board.is_empty());
    assert!(game.player(p1).board.is_empty());
    assert_eq!(game.card(rival_hero).damage, 2, "the deathrattle goes off");
}

/// Test that killing a hero ends the game.
#[test]
fn test_hero_death_ends_the_game() {
    let mut game = test_game();
    let p0 = PlayerId::new(0);
    let p1 = PlayerId::new(1);
    let attacker = put_awake(&mut game, "yeti", p0);
    let rival_hero = game.hero_of(p1);
    game.card_mut(rival_hero).damage = 29;

    game.attack(attacker, rival_hero).unwrap();

    assert_eq!(game.status, GameStatus::Finished);
    assert_eq!(game.player(p0).play_state, PlayState::Won);
    assert_eq!(game.player(p1).play_state, PlayState::Lost);
    assert_eq!(game.card(rival_hero).zone, Zone::Graveyard);
}
