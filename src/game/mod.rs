//! The game session.
//!
//! [`Game`] owns every entity, the per-player state, and the action
//! queue that all rules run through. Player-facing moves (playing a
//! card, attacking, ending the turn) validate against the rules and
//! then queue game ops; everything downstream of those ops belongs to
//! the action system.
//!
//! ## Entities
//!
//! Players and cards share one id space. The first `player_count` ids
//! are the players themselves; cards are numbered after them and stay
//! in the entity table for their whole lifetime, graveyard included.
//!
//! ## The action queue
//!
//! [`Game::queue_actions`] resolves actions depth-first: each action
//! resolves completely, including everything it queues in turn, before
//! the next one starts. A depth guard panics on runaway trigger loops
//! rather than letting them spin.
//!
//! ## Zone moves
//!
//! [`Game::move_to_zone_of`] is the single choke point for zone and
//! controller changes. It detaches the entity from its old container,
//! applies transition effects (cards returning to hand or deck reset
//! to their printed state, cards entering play wake up fresh), and
//! attaches it to the new one. Heroes and hero powers in play are
//! tracked through per-player slots instead of a container.

mod choice;
mod player_state;

pub use choice::{Choice, ChoiceKind};
pub use player_state::PlayerState;

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::actions::{Action, EventArgs, Op, Value};
use crate::cards::{Card, CardRegistry};
use crate::core::{
    CardType, EntityId, GameConfig, GameError, GameResult, GameRng, GameStatus, GameTag,
    MulliganState, PlayState, PlayerId, PlayerMap, Zone,
};
use crate::triggers::Phase;

/// One resolved action, as recorded in the game's history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLogEntry {
    pub turn: u32,
    pub op: Op,
    pub source: EntityId,
    pub targets: Vec<EntityId>,
}

/// A full game session.
#[derive(Clone, Debug)]
pub struct Game {
    pub config: GameConfig,
    pub registry: CardRegistry,
    pub rng: GameRng,
    pub players: PlayerMap<PlayerState>,
    /// Completed turn count; turn 1 is the first player's first turn.
    pub turn: u32,
    pub current_player: PlayerId,
    pub status: GameStatus,
    /// The attack being proposed, while its announcement resolves.
    /// Reactions may redirect the defender through these.
    pub proposed_attacker: Option<EntityId>,
    pub proposed_defender: Option<EntityId>,

    cards: FxHashMap<EntityId, Card>,
    next_entity: u32,
    action_depth: u32,
    action_log: Vector<ActionLogEntry>,
}

impl Game {
    #[must_use]
    pub fn new(config: GameConfig, registry: CardRegistry, seed: u64) -> Self {
        let player_count = config.player_count;
        Self {
            rng: GameRng::new(seed),
            players: PlayerMap::new(player_count, |_| PlayerState::new()),
            turn: 0,
            current_player: PlayerId::new(0),
            status: GameStatus::Setup,
            proposed_attacker: None,
            proposed_defender: None,
            cards: FxHashMap::default(),
            next_entity: EntityId::first_non_player(player_count),
            action_depth: 0,
            action_log: Vector::new(),
            config,
            registry,
        }
    }

    // === Players ===

    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerState {
        &self.players[player]
    }

    pub fn player_mut(&mut self, player: PlayerId) -> &mut PlayerState {
        &mut self.players[player]
    }

    /// All player ids, in seat order.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.config.player_count)
    }

    /// All player ids, current player first.
    #[must_use]
    pub fn turn_order(&self) -> Vec<PlayerId> {
        let count = self.config.player_count;
        let start = self.current_player.index();
        (0..count)
            .map(|offset| PlayerId::new(((start + offset) % count) as u8))
            .collect()
    }

    /// The player after `player` in seat order.
    #[must_use]
    pub fn next_player(&self, player: PlayerId) -> PlayerId {
        let count = self.config.player_count;
        PlayerId::new(((player.index() + 1) % count) as u8)
    }

    #[must_use]
    pub fn is_player(&self, entity: EntityId) -> bool {
        entity.is_player(self.config.player_count)
    }

    // === Entities ===

    /// Create a card entity in its controller's set-aside zone.
    pub fn create_card(&mut self, card_id: &str, controller: PlayerId) -> EntityId {
        let data = self.registry.must_get(card_id).clone();
        let entity = EntityId(self.next_entity);
        self.next_entity += 1;
        self.cards.insert(entity, Card::new(entity, &data, controller));
        self.players[controller].setaside.push(entity);
        log::trace!("created {} for {controller}", self.card(entity));
        entity
    }

    /// Create a card and put it straight into play.
    pub fn put_in_play(&mut self, card_id: &str, player: PlayerId) -> EntityId {
        let card = self.create_card(card_id, player);
        self.move_to_zone(card, Zone::Play);
        card
    }

    /// Give a player their hero. Must happen before [`Game::start`].
    pub fn assign_hero(&mut self, player: PlayerId, hero_id: &str) {
        let hero = self.create_card(hero_id, player);
        assert!(
            self.card(hero).card_type == CardType::Hero,
            "{hero_id:?} is not a hero"
        );
        self.move_to_zone(hero, Zone::Play);
    }

    /// Give a player their hero power.
    pub fn assign_hero_power(&mut self, player: PlayerId, power_id: &str) {
        let power = self.create_card(power_id, player);
        assert!(
            self.card(power).card_type == CardType::HeroPower,
            "{power_id:?} is not a hero power"
        );
        self.move_to_zone(power, Zone::Play);
    }

    /// Create the given cards in a player's deck. The deck is not
    /// shuffled until the game starts.
    pub fn add_deck(&mut self, player: PlayerId, card_ids: &[&str]) -> GameResult<()> {
        for id in card_ids {
            if !self.registry.contains(id) {
                return Err(GameError::UnknownCard((*id).to_string()));
            }
        }
        for id in card_ids {
            let card = self.create_card(id, player);
            self.move_to_zone(card, Zone::Deck);
        }
        Ok(())
    }

    /// The card behind an entity id. Panics for player ids and for ids
    /// this game never issued.
    #[must_use]
    pub fn card(&self, entity: EntityId) -> &Card {
        self.cards
            .get(&entity)
            .unwrap_or_else(|| panic!("no card for {entity}"))
    }

    pub fn card_mut(&mut self, entity: EntityId) -> &mut Card {
        self.cards
            .get_mut(&entity)
            .unwrap_or_else(|| panic!("no card for {entity}"))
    }

    #[must_use]
    pub fn get_card(&self, entity: EntityId) -> Option<&Card> {
        self.cards.get(&entity)
    }

    /// The player controlling an entity. Player entities control
    /// themselves.
    #[must_use]
    pub fn controller_of(&self, entity: EntityId) -> PlayerId {
        match entity.as_player(self.config.player_count) {
            Some(player) => player,
            None => self.card(entity).controller,
        }
    }

    /// The character behind an entity: player ids resolve to the
    /// player's hero, card ids to themselves.
    #[must_use]
    pub fn character_of(&self, entity: EntityId) -> EntityId {
        match entity.as_player(self.config.player_count) {
            Some(player) => self.hero_of(player),
            None => entity,
        }
    }

    /// A player's characters in play: hero first, then the board left
    /// to right.
    #[must_use]
    pub fn characters_of(&self, player: PlayerId) -> Vec<EntityId> {
        let state = &self.players[player];
        let mut characters = Vec::with_capacity(state.board.len() + 1);
        characters.extend(state.hero);
        characters.extend(state.board.iter().copied());
        characters
    }

    /// A player's hero. Panics if none was assigned.
    #[must_use]
    pub fn hero_of(&self, player: PlayerId) -> EntityId {
        self.players[player]
            .hero
            .unwrap_or_else(|| panic!("{player} has no hero"))
    }

    /// Route a tag write to a player or a card.
    pub(crate) fn set_entity_tag(&mut self, entity: EntityId, tag: GameTag, value: i32) {
        match entity.as_player(self.config.player_count) {
            Some(player) => self.players[player].set_tag(tag, value),
            None => self.card_mut(entity).set_tag(tag, value),
        }
    }

    pub(crate) fn unset_entity_tag(&mut self, entity: EntityId, tag: GameTag) {
        match entity.as_player(self.config.player_count) {
            Some(player) => self.players[player].remove_tag(tag),
            None => self.card_mut(entity).remove_tag(tag),
        }
    }

    // === Zone moves ===

    /// Move an entity to a zone under its current controller.
    pub fn move_to_zone(&mut self, entity: EntityId, zone: Zone) {
        let controller = self.card(entity).controller;
        self.move_to_zone_of(entity, controller, zone);
    }

    /// Move an entity to a zone under the given controller. All zone
    /// and controller changes funnel through here.
    pub fn move_to_zone_of(&mut self, entity: EntityId, controller: PlayerId, zone: Zone) {
        let (old_controller, old_zone, card_type) = {
            let card = self.card(entity);
            (card.controller, card.zone, card.card_type)
        };

        if containerized(old_zone, card_type) {
            self.players[old_controller]
                .container_mut(old_zone)
                .retain(|&e| e != entity);
        }

        if old_zone == Zone::Play && matches!(zone, Zone::Hand | Zone::Deck) {
            // The card becomes its printed self again.
            let data = self.registry.must_get(&self.card(entity).card_id).clone();
            self.card_mut(entity).reset_to_base(&data);
        }
        if zone == Zone::Play && old_zone != Zone::Play {
            let card = self.card_mut(entity);
            card.num_attacks = 0;
            card.turns_in_play = 0;
            card.to_be_destroyed = false;
            if old_zone == Zone::Graveyard {
                // A corpse returns whole.
                card.damage = 0;
            }
        }

        {
            let card = self.card_mut(entity);
            card.controller = controller;
            card.zone = zone;
        }
        log::trace!("{} moves to {zone:?} under {controller}", self.card(entity));

        match (zone, card_type) {
            (Zone::Play, CardType::Minion) => {
                let position = self.card_mut(entity).summon_position.take();
                let board = &mut self.players[controller].board;
                match position {
                    Some(index) => board.insert(index.min(board.len()), entity),
                    None => board.push(entity),
                }
            }
            (Zone::Play, CardType::Hero) => {
                let old = self.players[controller].hero.replace(entity);
                if let Some(old) = old.filter(|&old| old != entity) {
                    self.move_to_zone(old, Zone::Graveyard);
                }
            }
            (Zone::Play, CardType::HeroPower) => {
                let old = self.players[controller].hero_power.replace(entity);
                if let Some(old) = old.filter(|&old| old != entity) {
                    self.move_to_zone(old, Zone::Removed);
                }
            }
            // Spells and enchantments in play are tracked by their
            // zone field alone.
            (Zone::Play, _) => {}
            _ => self.players[controller].container_mut(zone).push(entity),
        }
    }

    /// Whether `entity` may be summoned for `controller` right now.
    pub(crate) fn can_summon(&self, entity: EntityId, controller: PlayerId) -> bool {
        match self.card(entity).card_type {
            CardType::Minion => {
                self.card(entity).zone == Zone::Play
                    || self.players[controller].board.len() < self.config.max_board
            }
            CardType::Hero => true,
            _ => false,
        }
    }

    pub fn shuffle_deck(&mut self, player: PlayerId) {
        self.rng.shuffle(&mut self.players[player].deck);
    }

    // === The action queue ===

    /// Resolve actions depth-first against this game.
    ///
    /// `source` is the entity the actions act for; `event` is the
    /// broadcast record when the actions are a trigger's response.
    /// Returns the flattened values the actions produced.
    pub fn queue_actions(
        &mut self,
        source: EntityId,
        actions: &[Action],
        event: Option<&EventArgs>,
    ) -> GameResult<Vec<Value>> {
        let mut results = Vec::new();
        for action in actions {
            self.action_depth += 1;
            assert!(
                self.action_depth <= self.config.max_action_depth,
                "action depth exceeded {} resolving {:?}: trigger loop",
                self.config.max_action_depth,
                action.op
            );
            let outcome = action.trigger(self, source, event);
            self.action_depth -= 1;
            results.extend(outcome?);
        }
        Ok(results)
    }

    /// Announce an op to every listener in sweep order.
    pub(crate) fn broadcast(
        &mut self,
        op: Op,
        phase: Phase,
        args: &EventArgs,
        skip: Option<EntityId>,
    ) -> GameResult<()> {
        crate::triggers::deliver(self, op, phase, args, skip)
    }

    pub(crate) fn log_action(&mut self, op: Op, source: EntityId, targets: &[EntityId]) {
        self.action_log.push_back(ActionLogEntry {
            turn: self.turn,
            op,
            source,
            targets: targets.to_vec(),
        });
    }

    /// Every action resolved so far, oldest first.
    #[must_use]
    pub fn action_log(&self) -> &Vector<ActionLogEntry> {
        &self.action_log
    }

    // === Rules helpers ===

    /// Spend mana, temporary crystals first. The caller must have
    /// checked affordability.
    pub(crate) fn pay_cost(&mut self, player: PlayerId, cost: i32) {
        let state = &mut self.players[player];
        assert!(
            state.available_mana() >= cost,
            "{player} cannot afford {cost} mana"
        );
        let from_temp = state.temp_mana.min(cost);
        state.temp_mana -= from_temp;
        state.used_mana += cost - from_temp;
    }

    /// Total spell damage bonus for a player's spells.
    pub(crate) fn spell_damage_bonus(&self, player: PlayerId) -> i32 {
        let from_characters: i32 = self
            .characters_of(player)
            .iter()
            .map(|&c| self.card(c).tag_value(GameTag::SpellPower))
            .sum();
        from_characters + self.players[player].tag_value(GameTag::SpellPower)
    }

    /// The deathrattle scripts an entity would fire, silences applied.
    pub(crate) fn deathrattles_of(&self, entity: EntityId) -> Vec<Vec<Action>> {
        let card = self.card(entity);
        if card.silenced {
            return Vec::new();
        }
        let mut rattles = Vec::new();
        let data = self.registry.must_get(&card.card_id);
        if !data.deathrattle.is_empty() {
            rattles.push(data.deathrattle.clone());
        }
        rattles.extend(card.extra_deathrattles.iter().cloned());
        rattles
    }

    pub(crate) fn expire_one_turn_buffs(&mut self) {
        for card in self.cards.values_mut() {
            if card.buffs.iter().any(|b| b.one_turn) {
                card.remove_buffs_where(|b| b.one_turn);
            }
        }
    }

    // === Deaths ===

    /// Sweep the board for dead characters and process their deaths.
    ///
    /// All corpses leave play before any death resolves, so a
    /// deathrattle never sees a half-cleared board. Deaths it causes
    /// in turn are picked up by the next sweep.
    pub(crate) fn process_deaths(&mut self) -> GameResult<()> {
        let mut corpses = Vec::new();
        for player in self.turn_order() {
            for entity in self.characters_of(player) {
                if self.card(entity).is_dead() {
                    corpses.push(entity);
                }
            }
        }
        if corpses.is_empty() {
            return Ok(());
        }

        for &entity in &corpses {
            log::debug!("{} is destroyed", self.card(entity));
            if self.card(entity).card_type == CardType::Hero {
                let controller = self.card(entity).controller;
                self.players[controller].play_state = PlayState::Lost;
            }
            self.move_to_zone(entity, Zone::Graveyard);
        }
        self.check_for_end_game();

        for &entity in &corpses {
            self.queue_actions(entity, &[Action::death(entity)], None)?;
        }
        Ok(())
    }

    /// Settle the match once enough players are out.
    pub(crate) fn check_for_end_game(&mut self) {
        if self.status == GameStatus::Finished {
            return;
        }
        let alive: Vec<PlayerId> = self
            .player_ids()
            .filter(|&p| self.players[p].play_state == PlayState::Playing)
            .collect();
        match alive.len() {
            0 => {
                log::info!("the game ends in a tie");
                for player in self.player_ids() {
                    let state = &mut self.players[player];
                    if state.play_state == PlayState::Lost {
                        state.play_state = PlayState::Tied;
                    }
                }
                self.status = GameStatus::Finished;
            }
            1 => {
                let winner = alive[0];
                log::info!("{winner} wins on turn {}", self.turn);
                self.players[winner].play_state = PlayState::Won;
                self.status = GameStatus::Finished;
            }
            _ => {}
        }
    }

    // === Session flow ===

    /// Start the game: shuffle decks, pick the starting player, deal
    /// opening hands, and offer every player their mulligan.
    pub fn start(&mut self) -> GameResult<()> {
        assert!(
            self.status == GameStatus::Setup,
            "the game has already started"
        );
        for player in self.player_ids() {
            assert!(self.players[player].hero.is_some(), "{player} has no hero");
        }

        for player in self.player_ids() {
            self.shuffle_deck(player);
        }
        let first = self.rng.gen_range_usize(0..self.config.player_count);
        self.current_player = PlayerId::new(first as u8);
        log::info!("{} goes first", self.current_player);

        // Opening hands are dealt directly: no draw events, no fatigue.
        for player in self.turn_order() {
            let count = if player == self.current_player {
                self.config.first_hand
            } else {
                self.config.second_hand
            };
            for _ in 0..count {
                let Some(card) = self.players[player].deck.last().copied() else {
                    break;
                };
                self.move_to_zone(card, Zone::Hand);
            }
        }
        if let Some(coin) = self.config.coin_card.clone() {
            for player in self.turn_order().into_iter().skip(1) {
                let card = self.create_card(&coin, player);
                self.move_to_zone(card, Zone::Hand);
            }
        }

        self.status = GameStatus::Mulligan;
        for player in self.turn_order() {
            let entity = EntityId::player(player);
            self.queue_actions(entity, &[Action::mulligan_choice(entity)], None)?;
        }
        Ok(())
    }

    /// A surface action is allowed when the game is running, no choice
    /// is pending anywhere, and it is the acting player's turn.
    fn ensure_active(&self, player: PlayerId) -> GameResult<()> {
        assert!(self.status != GameStatus::Setup, "the game has not started");
        if self.status == GameStatus::Finished {
            return Err(GameError::GameOver);
        }
        for (owner, state) in self.players.iter() {
            if state.choice.is_some() {
                return Err(GameError::ChoiceOpen(owner));
            }
        }
        if player != self.current_player {
            return Err(GameError::NotYourTurn(player));
        }
        Ok(())
    }

    fn valid_play_target(&self, player: PlayerId, target: EntityId) -> bool {
        let Some(card) = self.get_card(target) else {
            return false;
        };
        card.card_type.is_character()
            && card.zone == Zone::Play
            && !(card.controller != player && card.has_tag(GameTag::Stealth))
    }

    /// Play a card from hand.
    ///
    /// `index` is the board position for minions, `choose` the index
    /// into the card's choose-one modes.
    pub fn play(
        &mut self,
        card: EntityId,
        target: Option<EntityId>,
        index: Option<usize>,
        choose: Option<usize>,
    ) -> GameResult<()> {
        let player = self.card(card).controller;
        self.ensure_active(player)?;
        if self.card(card).zone != Zone::Hand {
            return Err(GameError::NotPlayable(card));
        }
        let data = self.registry.must_get(&self.card(card).card_id).clone();

        let cost = self.card(card).cost;
        let available = self.players[player].available_mana();
        if cost > available {
            return Err(GameError::NotEnoughMana {
                player,
                needed: cost,
                available,
            });
        }
        if data.card_type == CardType::Minion
            && self.players[player].board.len() >= self.config.max_board
        {
            return Err(GameError::NotPlayable(card));
        }

        if let Some(target) = target {
            if !data.targeted || !self.valid_play_target(player, target) {
                return Err(GameError::IllegalTarget(target));
            }
        } else if data.targeted && self.any_play_target(player) {
            return Err(GameError::TargetRequired(card));
        }

        let chosen = match choose {
            Some(pick) => {
                let modes = &data.choose_cards;
                assert!(!modes.is_empty(), "{} offers no modes to choose", self.card(card));
                assert!(
                    pick < modes.len(),
                    "mode {pick} out of range for {}",
                    self.card(card)
                );
                let id = modes[pick].clone();
                Some(self.create_card(&id, player))
            }
            None => {
                assert!(
                    data.choose_cards.is_empty(),
                    "{} requires a chosen mode",
                    self.card(card)
                );
                None
            }
        };

        let entity = EntityId::player(player);
        self.queue_actions(
            entity,
            &[Action::play(entity, card, target, index, chosen)],
            None,
        )?;
        Ok(())
    }

    fn any_play_target(&self, player: PlayerId) -> bool {
        self.player_ids().any(|p| {
            self.characters_of(p)
                .iter()
                .any(|&c| self.valid_play_target(player, c))
        })
    }

    /// Attack a character with one of the player's characters.
    pub fn attack(&mut self, attacker: EntityId, defender: EntityId) -> GameResult<()> {
        let player = self.card(attacker).controller;
        self.ensure_active(player)?;

        let card = self.card(attacker);
        if card.zone != Zone::Play
            || !card.card_type.is_character()
            || card.atk() <= 0
            || card.exhausted()
            || card.asleep()
            || card.has_tag(GameTag::Frozen)
            || card.has_tag(GameTag::CantAttack)
        {
            return Err(GameError::CannotAttack(attacker));
        }
        self.ensure_attack_target(player, defender)?;

        let entity = EntityId::player(player);
        self.queue_actions(entity, &[Action::attack(attacker, defender)], None)?;
        Ok(())
    }

    fn ensure_attack_target(&self, player: PlayerId, defender: EntityId) -> GameResult<()> {
        let Some(card) = self.get_card(defender) else {
            return Err(GameError::IllegalTarget(defender));
        };
        if !card.card_type.is_character()
            || card.zone != Zone::Play
            || card.controller == player
            || card.has_tag(GameTag::Stealth)
        {
            return Err(GameError::IllegalTarget(defender));
        }
        // Taunt protects everything beside it; stealthed taunts do not
        // taunt.
        if !card.has_tag(GameTag::Taunt) {
            let behind_taunt = self.characters_of(card.controller).iter().any(|&c| {
                self.card(c).has_tag(GameTag::Taunt) && !self.card(c).has_tag(GameTag::Stealth)
            });
            if behind_taunt {
                return Err(GameError::IllegalTarget(defender));
            }
        }
        Ok(())
    }

    /// Activate the current player's hero power.
    pub fn use_hero_power(&mut self, target: Option<EntityId>) -> GameResult<()> {
        let player = self.current_player;
        self.ensure_active(player)?;
        let Some(power) = self.players[player].hero_power else {
            return Err(GameError::NotPlayable(EntityId::player(player)));
        };
        if self.card(power).activations_this_turn >= 1 {
            return Err(GameError::HeroPowerExhausted(player));
        }

        let data = self.registry.must_get(&self.card(power).card_id).clone();
        let cost = self.card(power).cost;
        let available = self.players[player].available_mana();
        if cost > available {
            return Err(GameError::NotEnoughMana {
                player,
                needed: cost,
                available,
            });
        }
        if let Some(target) = target {
            if !data.targeted || !self.valid_play_target(player, target) {
                return Err(GameError::IllegalTarget(target));
            }
        } else if data.targeted {
            return Err(GameError::TargetRequired(power));
        }

        self.pay_cost(player, cost);
        let entity = EntityId::player(player);
        self.queue_actions(entity, &[Action::activate(entity, power, target)], None)?;
        Ok(())
    }

    /// End the current player's turn.
    pub fn end_turn(&mut self) -> GameResult<()> {
        let player = self.current_player;
        self.ensure_active(player)?;
        let entity = EntityId::player(player);
        self.queue_actions(entity, &[Action::end_turn(entity)], None)?;
        Ok(())
    }

    /// Give up. Allowed out of turn.
    pub fn concede(&mut self, player: PlayerId) -> GameResult<()> {
        assert!(self.status != GameStatus::Setup, "the game has not started");
        if self.status == GameStatus::Finished {
            return Err(GameError::GameOver);
        }
        let entity = EntityId::player(player);
        self.queue_actions(entity, &[Action::concede(entity)], None)?;
        Ok(())
    }

    /// Answer a player's open choice.
    ///
    /// Generic choices take exactly one pick; mulligans take any
    /// subset of the offer (the picks are swapped back). Picks outside
    /// the offered options are a driver bug and panic.
    pub fn choose(&mut self, player: PlayerId, picks: &[EntityId]) -> GameResult<()> {
        assert!(self.status != GameStatus::Setup, "the game has not started");
        if self.status == GameStatus::Finished {
            return Err(GameError::GameOver);
        }
        let Some(choice) = self.players[player].choice.clone() else {
            return Err(GameError::NoOpenChoice(player));
        };
        for pick in picks {
            assert!(
                choice.options.contains(pick),
                "{pick} was not offered to {player}"
            );
        }

        match choice.kind {
            ChoiceKind::Generic => self.resolve_generic_choice(player, &choice, picks),
            ChoiceKind::Mulligan => self.resolve_mulligan(player, picks)?,
        }
        Ok(())
    }

    fn resolve_generic_choice(&mut self, player: PlayerId, choice: &Choice, picks: &[EntityId]) {
        assert!(
            picks.len() == 1,
            "exactly one option must be picked, got {}",
            picks.len()
        );
        let pick = picks[0];
        log::debug!("{player} picks {}", self.card(pick));
        self.players[player].choice = None;

        for &option in &choice.options {
            if option != pick {
                self.move_to_zone(option, Zone::Graveyard);
            }
        }
        if self.card(pick).card_type == CardType::HeroPower {
            self.move_to_zone_of(pick, player, Zone::Play);
        } else if self.players[player].hand.len() < self.config.max_hand {
            self.move_to_zone_of(pick, player, Zone::Hand);
        } else {
            log::debug!("{player}'s hand is full, {} is lost", self.card(pick));
            self.move_to_zone(pick, Zone::Graveyard);
        }
    }

    fn resolve_mulligan(&mut self, player: PlayerId, picks: &[EntityId]) -> GameResult<()> {
        log::debug!("{player} swaps {} cards back", picks.len());
        self.players[player].choice = None;
        let entity = EntityId::player(player);

        // Replacements are drawn before the swapped cards return, so
        // they cannot be drawn right back.
        for _ in 0..picks.len() {
            self.queue_actions(entity, &[Action::draw(entity)], None)?;
        }
        for &pick in picks {
            self.move_to_zone(pick, Zone::Deck);
        }
        self.shuffle_deck(player);
        self.players[player].mulligan_state = MulliganState::Done;

        let all_done = self
            .player_ids()
            .all(|p| self.players[p].mulligan_state == MulliganState::Done);
        if all_done && self.status == GameStatus::Mulligan {
            self.status = GameStatus::Playing;
            let first = EntityId::player(self.current_player);
            self.queue_actions(first, &[Action::begin_turn(first)], None)?;
        }
        Ok(())
    }
}

/// Whether a (zone, type) pair is tracked through a zone container.
/// In play, only minions sit in one; heroes and hero powers live in
/// slots, and resolving spells are tracked by their zone field alone.
fn containerized(zone: Zone, card_type: CardType) -> bool {
    zone != Zone::Play || card_type == CardType::Minion
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardData;

    fn test_registry() -> CardRegistry {
        let mut registry = CardRegistry::new();
        registry.register(CardData::hero("hero", "Test Hero", 30));
        registry.register(CardData::minion("wisp", "Wisp", 0, 1, 1));
        registry.register(CardData::minion("yeti", "Yeti", 4, 4, 5));
        registry
    }

    fn test_game() -> Game {
        let mut game = Game::new(GameConfig::default(), test_registry(), 42);
        for player in game.player_ids().collect::<Vec<_>>() {
            game.assign_hero(player, "hero");
        }
        game
    }

    #[test]
    fn test_new_game_defaults() {
        let game = Game::new(GameConfig::default(), test_registry(), 7);
        assert_eq!(game.status, GameStatus::Setup);
        assert_eq!(game.turn, 0);
        assert_eq!(game.current_player, PlayerId::new(0));
        assert!(game.action_log().is_empty());
    }

    #[test]
    fn test_create_card_numbers_after_players() {
        let mut game = test_game();
        let p0 = PlayerId::new(0);
        let before = game.create_card("wisp", p0);
        let after = game.create_card("wisp", p0);
        assert!(before.raw() >= 2);
        assert_eq!(after.raw(), before.raw() + 1);
        assert_eq!(game.card(before).zone, Zone::SetAside);
        assert!(game.players[p0].setaside.contains(&before));
    }

    #[test]
    fn test_hero_assignment_fills_slot() {
        let game = test_game();
        let p0 = PlayerId::new(0);
        let hero = game.players[p0].hero.unwrap();
        assert_eq!(game.card(hero).card_type, CardType::Hero);
        assert_eq!(game.card(hero).zone, Zone::Play);
        // Heroes never sit on the board.
        assert!(game.players[p0].board.is_empty());
    }

    #[test]
    fn test_characters_hero_first() {
        let mut game = test_game();
        let p0 = PlayerId::new(0);
        let wisp = game.put_in_play("wisp", p0);
        let hero = game.hero_of(p0);
        assert_eq!(game.characters_of(p0), vec![hero, wisp]);
    }

    #[test]
    fn test_move_to_zone_inserts_at_summon_position() {
        let mut game = test_game();
        let p0 = PlayerId::new(0);
        let a = game.put_in_play("wisp", p0);
        let b = game.put_in_play("wisp", p0);

        let c = game.create_card("yeti", p0);
        game.card_mut(c).summon_position = Some(1);
        game.move_to_zone(c, Zone::Play);
        assert_eq!(game.players[p0].board, vec![a, c, b]);
        // The position is consumed by the move.
        assert!(game.card(c).summon_position.is_none());
    }

    #[test]
    fn test_return_to_hand_resets_card() {
        let mut game = test_game();
        let p0 = PlayerId::new(0);
        let yeti = game.put_in_play("yeti", p0);
        game.card_mut(yeti).damage = 3;
        game.card_mut(yeti).set_tag(GameTag::Taunt, 1);

        game.move_to_zone(yeti, Zone::Hand);
        let card = game.card(yeti);
        assert_eq!(card.zone, Zone::Hand);
        assert_eq!(card.damage, 0);
        assert!(!card.has_tag(GameTag::Taunt));
        assert!(game.players[p0].hand.contains(&yeti));
        assert!(!game.players[p0].board.contains(&yeti));
    }

    #[test]
    fn test_controller_change_moves_containers() {
        let mut game = test_game();
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);
        let yeti = game.put_in_play("yeti", p0);

        game.move_to_zone_of(yeti, p1, Zone::Play);
        assert!(!game.players[p0].board.contains(&yeti));
        assert!(game.players[p1].board.contains(&yeti));
        assert_eq!(game.card(yeti).controller, p1);
        assert_eq!(game.controller_of(yeti), p1);
    }

    #[test]
    fn test_pay_cost_spends_temp_mana_first() {
        let mut game = test_game();
        let p0 = PlayerId::new(0);
        game.players[p0].max_mana = 5;
        game.players[p0].temp_mana = 2;

        game.pay_cost(p0, 4);
        assert_eq!(game.players[p0].temp_mana, 0);
        assert_eq!(game.players[p0].used_mana, 2);
        assert_eq!(game.players[p0].available_mana(), 3);
    }

    #[test]
    #[should_panic(expected = "cannot afford")]
    fn test_pay_cost_requires_funds() {
        let mut game = test_game();
        game.pay_cost(PlayerId::new(0), 3);
    }

    #[test]
    fn test_process_deaths_clears_corpses() {
        let mut game = test_game();
        let p0 = PlayerId::new(0);
        let wisp = game.put_in_play("wisp", p0);
        game.card_mut(wisp).damage = 1;

        game.process_deaths().unwrap();
        assert_eq!(game.card(wisp).zone, Zone::Graveyard);
        assert!(game.players[p0].board.is_empty());
        assert!(game.players[p0].graveyard.contains(&wisp));
    }

    #[test]
    fn test_dead_hero_loses_the_game() {
        let mut game = test_game();
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);
        let hero = game.hero_of(p1);
        game.card_mut(hero).damage = 30;

        game.process_deaths().unwrap();
        assert_eq!(game.players[p1].play_state, PlayState::Lost);
        assert_eq!(game.players[p0].play_state, PlayState::Won);
        assert_eq!(game.status, GameStatus::Finished);
    }

    #[test]
    fn test_simultaneous_hero_deaths_tie() {
        let mut game = test_game();
        for player in game.player_ids().collect::<Vec<_>>() {
            let hero = game.hero_of(player);
            game.card_mut(hero).damage = 30;
        }

        game.process_deaths().unwrap();
        assert_eq!(game.status, GameStatus::Finished);
        for player in game.player_ids().collect::<Vec<_>>() {
            assert_eq!(game.players[player].play_state, PlayState::Tied);
        }
    }

    #[test]
    fn test_queue_actions_returns_values() {
        let mut game = test_game();
        let p0 = PlayerId::new(0);
        let yeti = game.put_in_play("yeti", p0);
        let hero = game.hero_of(p0);

        let values = game
            .queue_actions(hero, &[Action::hit(yeti, 2)], None)
            .unwrap();
        assert_eq!(values, vec![Value::Int(2)]);
        assert_eq!(game.card(yeti).damage, 2);
    }

    #[test]
    #[should_panic(expected = "trigger loop")]
    fn test_action_depth_guard() {
        use crate::dsl::Selector;

        let mut game = Game::new(
            GameConfig::default().with_max_action_depth(12),
            test_registry(),
            1,
        );
        for player in game.player_ids().collect::<Vec<_>>() {
            game.assign_hero(player, "hero");
        }
        let p0 = PlayerId::new(0);
        let yeti = game.put_in_play("yeti", p0);
        // Responds to its own damage by hitting itself again, forever.
        let listener = Action::damage(Selector::It).on([Action::hit(Selector::It, 1)]);
        game.card_mut(yeti).listeners.push(listener);

        let hero = game.hero_of(p0);
        let _ = game.queue_actions(hero, &[Action::hit(yeti, 1)], None);
    }

    #[test]
    fn test_start_deals_opening_hands() {
        let mut game = test_game();
        let deck: Vec<&str> = std::iter::repeat("wisp").take(10).collect();
        for player in game.player_ids().collect::<Vec<_>>() {
            game.add_deck(player, &deck).unwrap();
        }

        game.start().unwrap();
        assert_eq!(game.status, GameStatus::Mulligan);
        let first = game.current_player;
        let second = game.next_player(first);
        assert_eq!(game.players[first].hand.len(), 3);
        assert_eq!(game.players[second].hand.len(), 4);
        assert!(game.players[first].choice.is_some());
        assert!(game.players[second].choice.is_some());
    }

    #[test]
    fn test_coin_goes_to_second_player() {
        let mut registry = test_registry();
        registry.register(CardData::spell("the_coin", "The Coin", 0));
        let mut game = Game::new(
            GameConfig::default().with_coin_card("the_coin"),
            registry,
            42,
        );
        for player in game.player_ids().collect::<Vec<_>>() {
            game.assign_hero(player, "hero");
        }

        game.start().unwrap();
        let second = game.next_player(game.current_player);
        let has_coin = game.players[second]
            .hand
            .iter()
            .any(|&c| game.card(c).card_id == "the_coin");
        assert!(has_coin);
        // The coin is not offered in the mulligan.
        let choice = game.players[second].choice.as_ref().unwrap();
        assert!(choice
            .options
            .iter()
            .all(|&c| game.card(c).card_id != "the_coin"));
    }

    #[test]
    fn test_mulligan_swaps_and_starts_play() {
        let mut game = test_game();
        let deck: Vec<&str> = std::iter::repeat("wisp").take(10).collect();
        for player in game.player_ids().collect::<Vec<_>>() {
            game.add_deck(player, &deck).unwrap();
        }
        game.start().unwrap();

        let first = game.current_player;
        let second = game.next_player(first);
        let swap = vec![game.players[first].hand[0]];
        game.choose(first, &swap).unwrap();
        assert_eq!(game.players[first].hand.len(), 3);
        assert_eq!(game.card(swap[0]).zone, Zone::Deck);
        assert_eq!(game.status, GameStatus::Mulligan);

        game.choose(second, &[]).unwrap();
        assert_eq!(game.status, GameStatus::Playing);
        // The first turn has begun: crystal gained, card drawn.
        assert_eq!(game.turn, 1);
        assert_eq!(game.players[first].max_mana, 1);
        assert_eq!(game.players[first].hand.len(), 4);
    }

    #[test]
    fn test_surface_actions_blocked_by_open_choice() {
        let mut game = test_game();
        for player in game.player_ids().collect::<Vec<_>>() {
            game.add_deck(player, &["wisp", "wisp", "wisp", "wisp", "wisp"])
                .unwrap();
        }
        game.start().unwrap();

        let err = game.end_turn().unwrap_err();
        assert!(matches!(err, GameError::ChoiceOpen(_)));
    }

    #[test]
    fn test_choose_without_choice_is_rejected() {
        let mut game = test_game();
        game.start().unwrap();
        for player in game.player_ids().collect::<Vec<_>>() {
            game.choose(player, &[]).unwrap();
        }

        let err = game.choose(PlayerId::new(0), &[]).unwrap_err();
        assert!(matches!(err, GameError::NoOpenChoice(_)));
    }

    #[test]
    fn test_concede_ends_the_game() {
        let mut game = test_game();
        game.start().unwrap();
        let p1 = PlayerId::new(1);

        game.concede(p1).unwrap();
        assert_eq!(game.status, GameStatus::Finished);
        assert_eq!(game.players[p1].play_state, PlayState::Quit);
        assert_eq!(game.players[PlayerId::new(0)].play_state, PlayState::Won);
        assert!(matches!(game.end_turn(), Err(GameError::GameOver)));
    }
}
