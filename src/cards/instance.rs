//! Live card state.
//!
//! A `Card` is one entity in one game: a definition plus everything
//! that has happened to it. Stats are computed as base values plus
//! attached buffs, so detaching a buff (silence, end of turn) restores
//! the base automatically.
//!
//! ## Health accounting
//!
//! Damage is stored, health is derived: `health = max_health - damage`.
//! When buffs granting max health are removed, damage is re-clamped so
//! the card keeps `min(previous health, new max health)` - losing a
//! buff never kills a healthy card on its own.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::actions::Action;
use crate::core::{CardType, EntityId, GameTag, PlayerId, Zone};
use crate::triggers::EventListener;

use super::definition::CardData;

/// A buff attached to a card.
///
/// Buffs come from enchantment definitions: their `atk`/`health` are
/// deltas, their tags are granted while attached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buff {
    /// Enchantment card id this buff was materialized from.
    pub buff_id: String,
    /// Entity that applied the buff.
    pub source: EntityId,
    pub atk: i32,
    pub max_health: i32,
    /// Tags granted while attached.
    pub tags: SmallVec<[(GameTag, i32); 2]>,
    /// Detach at the end of the current turn.
    pub one_turn: bool,
}

impl Buff {
    /// Materialize a buff from an enchantment definition.
    #[must_use]
    pub fn from_data(data: &CardData, source: EntityId) -> Self {
        assert!(
            data.card_type == CardType::Enchantment,
            "buff {:?} must be an enchantment",
            data.id
        );
        Self {
            buff_id: data.id.clone(),
            source,
            atk: data.atk,
            max_health: data.health,
            tags: data.tags.iter().copied().collect(),
            one_turn: data.one_turn,
        }
    }
}

/// One card in one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub entity_id: EntityId,
    /// Definition key in the registry.
    pub card_id: String,
    pub card_type: CardType,
    /// Player whose deck or effect introduced the card.
    pub owner: PlayerId,
    /// Player currently controlling the card. Changes on steal.
    pub controller: PlayerId,
    pub zone: Zone,
    pub cost: i32,

    base_atk: i32,
    base_max_health: i32,

    /// Damage taken. Health is `max_health() - damage`.
    pub damage: i32,
    /// Damage staged by a predamage step, not yet applied.
    pub predamage: i32,
    /// Heroes only: absorbs damage before health.
    pub armor: i32,

    tags: SmallVec<[(GameTag, i32); 4]>,
    pub buffs: Vec<Buff>,
    pub listeners: Vec<EventListener>,
    /// Deathrattle scripts copied from other cards.
    pub extra_deathrattles: Vec<Vec<Action>>,

    pub silenced: bool,
    /// Marked for the next death sweep regardless of health.
    pub to_be_destroyed: bool,

    pub num_attacks: u32,
    /// Turns this card has been in play. 0 means it arrived this turn.
    pub turns_in_play: u32,
    /// Set while this card is the proposed attacker.
    pub attack_target: Option<EntityId>,
    /// Set while this card is the proposed defender.
    pub defending: bool,

    /// Play or battlecry target chosen for this card.
    pub target: Option<EntityId>,
    /// Board index requested for the next summon of this card.
    pub summon_position: Option<usize>,
    /// What this card turned into, if it morphed while resolving.
    pub morphed: Option<EntityId>,

    /// Hero powers only: uses so far this turn.
    pub activations_this_turn: u32,
}

impl Card {
    /// Instantiate a definition as a new entity. Starts set aside.
    #[must_use]
    pub fn new(entity_id: EntityId, data: &CardData, owner: PlayerId) -> Self {
        Self {
            entity_id,
            card_id: data.id.clone(),
            card_type: data.card_type,
            owner,
            controller: owner,
            zone: Zone::SetAside,
            cost: data.cost,
            base_atk: data.atk,
            base_max_health: data.health,
            damage: 0,
            predamage: 0,
            armor: 0,
            tags: data.tags.iter().copied().collect(),
            buffs: Vec::new(),
            listeners: data.listeners.clone(),
            extra_deathrattles: Vec::new(),
            silenced: false,
            to_be_destroyed: false,
            num_attacks: 0,
            turns_in_play: 0,
            attack_target: None,
            defending: false,
            target: None,
            summon_position: None,
            morphed: None,
            activations_this_turn: 0,
        }
    }

    // === Stats ===

    /// Current attack: base plus buffs, never negative.
    #[must_use]
    pub fn atk(&self) -> i32 {
        let total = self.base_atk + self.buffs.iter().map(|b| b.atk).sum::<i32>();
        total.max(0)
    }

    /// Current maximum health: base plus buffs.
    #[must_use]
    pub fn max_health(&self) -> i32 {
        self.base_max_health + self.buffs.iter().map(|b| b.max_health).sum::<i32>()
    }

    /// Current health.
    #[must_use]
    pub fn health(&self) -> i32 {
        self.max_health() - self.damage
    }

    /// Dead means destroyed or out of health.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.to_be_destroyed || (self.card_type.is_character() && self.health() <= 0)
    }

    /// Apply a hit, routing through armor for heroes.
    ///
    /// Returns the damage that reached health.
    pub fn apply_hit(&mut self, amount: i32) -> i32 {
        let mut amount = amount;
        if self.armor > 0 {
            let absorbed = self.armor.min(amount);
            self.armor -= absorbed;
            amount -= absorbed;
        }
        self.damage += amount;
        amount
    }

    // === Tags ===

    /// Total value of a tag across the card and its buffs.
    #[must_use]
    pub fn tag_value(&self, tag: GameTag) -> i32 {
        let own: i32 = self
            .tags
            .iter()
            .filter(|(t, _)| *t == tag)
            .map(|(_, v)| v)
            .sum();
        let granted: i32 = self
            .buffs
            .iter()
            .flat_map(|b| b.tags.iter())
            .filter(|(t, _)| *t == tag)
            .map(|(_, v)| v)
            .sum();
        own + granted
    }

    /// Whether the card carries a tag (value nonzero).
    #[must_use]
    pub fn has_tag(&self, tag: GameTag) -> bool {
        self.tag_value(tag) != 0
    }

    /// Set a tag's own value (buff-granted values unaffected).
    pub fn set_tag(&mut self, tag: GameTag, value: i32) {
        if let Some(entry) = self.tags.iter_mut().find(|(t, _)| *t == tag) {
            entry.1 = value;
        } else {
            self.tags.push((tag, value));
        }
    }

    /// Remove a tag's own value entirely.
    pub fn remove_tag(&mut self, tag: GameTag) {
        self.tags.retain(|(t, _)| *t != tag);
    }

    /// Drop own tags a silence wipes.
    pub fn strip_silenceable_tags(&mut self) {
        self.tags.retain(|(t, _)| !t.is_silenceable());
    }

    // === Combat bookkeeping ===

    /// Attacks allowed per turn.
    #[must_use]
    pub fn max_attacks(&self) -> u32 {
        if self.has_tag(GameTag::Windfury) {
            2
        } else {
            1
        }
    }

    /// Spent all attacks for this turn.
    #[must_use]
    pub fn exhausted(&self) -> bool {
        self.num_attacks >= self.max_attacks()
    }

    /// Summoning sickness: minions cannot attack the turn they arrive
    /// unless they have charge.
    #[must_use]
    pub fn asleep(&self) -> bool {
        self.card_type == CardType::Minion
            && self.turns_in_play == 0
            && !self.has_tag(GameTag::Charge)
    }

    // === Buffs ===

    /// Attach a buff.
    pub fn attach(&mut self, buff: Buff) {
        self.buffs.push(buff);
    }

    /// Remove buffs matching a predicate, keeping current health where
    /// possible: the card ends at `min(health before, new max health)`.
    pub fn remove_buffs_where(&mut self, predicate: impl Fn(&Buff) -> bool) {
        let health_before = self.health();
        self.buffs.retain(|b| !predicate(b));
        let max_after = self.max_health();
        self.damage = max_after - health_before.min(max_after);
    }

    /// Remove every buff, keeping current health where possible.
    pub fn clear_buffs(&mut self) {
        self.remove_buffs_where(|_| true);
    }

    // === Zone transitions ===

    /// Reset mutable state when the card leaves play for a hidden zone
    /// (hand or deck). The card becomes its printed self again.
    pub fn reset_to_base(&mut self, data: &CardData) {
        self.base_atk = data.atk;
        self.base_max_health = data.health;
        self.cost = data.cost;
        self.damage = 0;
        self.predamage = 0;
        self.armor = 0;
        self.tags = data.tags.iter().copied().collect();
        self.buffs.clear();
        self.listeners = data.listeners.clone();
        self.extra_deathrattles.clear();
        self.silenced = false;
        self.to_be_destroyed = false;
        self.num_attacks = 0;
        self.turns_in_play = 0;
        self.attack_target = None;
        self.defending = false;
        self.target = None;
        self.summon_position = None;
        self.morphed = None;
        self.activations_this_turn = 0;
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.card_id, self.entity_id.raw())
    }
}
