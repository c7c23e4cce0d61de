//! Static card definitions.
//!
//! A `CardData` is everything true of a card before it enters a game:
//! stats, flags, and the scripts that give it behavior. Scripts are
//! plain data (vectors of [`Action`]s), so definitions serialize and
//! compare like any other value.
//!
//! Builders follow the shape of the card text:
//!
//! ```
//! use brazier::actions::Action;
//! use brazier::cards::CardData;
//! use brazier::dsl::Selector;
//!
//! // "Battlecry: Deal 1 damage."
//! let elf = CardData::minion("archer", "Elwynn Archer", 1, 1, 1)
//!     .targeted()
//!     .with_play([Action::hit(Selector::Target, 1)]);
//! # let _ = elf;
//! ```

use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::core::{CardType, GameTag};
use crate::triggers::EventListener;

/// Immutable definition of one card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardData {
    /// Registry key. Stable across games.
    pub id: String,
    /// Display name.
    pub name: String,
    pub card_type: CardType,
    pub cost: i32,
    /// Attack for characters; attack delta for enchantments.
    pub atk: i32,
    /// Max health for characters; max health delta for enchantments.
    pub health: i32,
    /// Whether playing this card requires a target.
    pub targeted: bool,
    /// Secrets go face-down to the secret zone when played.
    pub secret: bool,
    /// Whether random registry picks may offer this card.
    pub collectible: bool,
    /// Enchantments only: detach at the end of the turn.
    pub one_turn: bool,
    /// Mana locked next turn when this card is played.
    pub overload: i32,

    /// Tags present from the start (taunt, charge, spell power...).
    pub tags: Vec<(GameTag, i32)>,
    /// Card ids this card summons or discovers from.
    pub entourage: Vec<String>,
    /// Choose One options, played in this card's stead.
    pub choose_cards: Vec<String>,

    // === Scripts ===
    /// Battlecry for minions, card text for spells and secrets.
    pub play: Vec<Action>,
    /// Replaces `play` when the controller has combo active.
    pub combo: Vec<Action>,
    pub deathrattle: Vec<Action>,
    /// Runs for each friendly minion with it when the hero power fires.
    pub inspire: Vec<Action>,
    /// Hero powers only: the activation script.
    pub activate: Vec<Action>,
    /// Standing event listeners while the card is in a swept zone.
    pub listeners: Vec<EventListener>,
}

impl CardData {
    fn base(id: impl Into<String>, name: impl Into<String>, card_type: CardType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            card_type,
            cost: 0,
            atk: 0,
            health: 0,
            targeted: false,
            secret: false,
            collectible: false,
            one_turn: false,
            overload: 0,
            tags: Vec::new(),
            entourage: Vec::new(),
            choose_cards: Vec::new(),
            play: Vec::new(),
            combo: Vec::new(),
            deathrattle: Vec::new(),
            inspire: Vec::new(),
            activate: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Define a minion.
    #[must_use]
    pub fn minion(
        id: impl Into<String>,
        name: impl Into<String>,
        cost: i32,
        atk: i32,
        health: i32,
    ) -> Self {
        let mut data = Self::base(id, name, CardType::Minion);
        data.cost = cost;
        data.atk = atk;
        data.health = health;
        data
    }

    /// Define a spell.
    #[must_use]
    pub fn spell(id: impl Into<String>, name: impl Into<String>, cost: i32) -> Self {
        let mut data = Self::base(id, name, CardType::Spell);
        data.cost = cost;
        data
    }

    /// Define a hero.
    #[must_use]
    pub fn hero(id: impl Into<String>, name: impl Into<String>, health: i32) -> Self {
        let mut data = Self::base(id, name, CardType::Hero);
        data.health = health;
        data
    }

    /// Define a hero power.
    #[must_use]
    pub fn hero_power(id: impl Into<String>, name: impl Into<String>, cost: i32) -> Self {
        let mut data = Self::base(id, name, CardType::HeroPower);
        data.cost = cost;
        data
    }

    /// Define an enchantment. `atk`/`health` are deltas applied while
    /// attached.
    #[must_use]
    pub fn enchantment(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::base(id, name, CardType::Enchantment)
    }

    // === Builder methods ===

    /// Set attack and health (or their deltas, for enchantments).
    #[must_use]
    pub fn with_stats(mut self, atk: i32, health: i32) -> Self {
        self.atk = atk;
        self.health = health;
        self
    }

    /// Mark as requiring a play target.
    #[must_use]
    pub fn targeted(mut self) -> Self {
        self.targeted = true;
        self
    }

    /// Mark as a secret.
    #[must_use]
    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    /// Mark as collectible (eligible for random registry picks).
    #[must_use]
    pub fn collectible(mut self) -> Self {
        self.collectible = true;
        self
    }

    /// Enchantments only: detach at end of turn.
    #[must_use]
    pub fn one_turn(mut self) -> Self {
        self.one_turn = true;
        self
    }

    /// Lock this much mana on the controller's next turn.
    #[must_use]
    pub fn with_overload(mut self, overload: i32) -> Self {
        self.overload = overload;
        self
    }

    /// Add a tag with value 1.
    #[must_use]
    pub fn with_tag(self, tag: GameTag) -> Self {
        self.with_tag_value(tag, 1)
    }

    /// Add a tag with an explicit value.
    #[must_use]
    pub fn with_tag_value(mut self, tag: GameTag, value: i32) -> Self {
        self.tags.push((tag, value));
        self
    }

    /// Set the entourage pool.
    #[must_use]
    pub fn with_entourage(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.entourage = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Set the Choose One options.
    #[must_use]
    pub fn with_choose(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.choose_cards = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Set the play script (battlecry / spell text).
    #[must_use]
    pub fn with_play(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.play = actions.into_iter().collect();
        self
    }

    /// Set the combo script.
    #[must_use]
    pub fn with_combo(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.combo = actions.into_iter().collect();
        self
    }

    /// Set the deathrattle script.
    #[must_use]
    pub fn with_deathrattle(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.deathrattle = actions.into_iter().collect();
        self
    }

    /// Set the inspire script.
    #[must_use]
    pub fn with_inspire(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.inspire = actions.into_iter().collect();
        self
    }

    /// Set the hero power activation script.
    #[must_use]
    pub fn with_activate(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.activate = actions.into_iter().collect();
        self
    }

    /// Add a standing event listener.
    #[must_use]
    pub fn with_listener(mut self, listener: EventListener) -> Self {
        self.listeners.push(listener);
        self
    }

    // === Queries ===

    /// Whether the play script counts as a battlecry (doubled by
    /// battlecry-doubling effects). True only for minions.
    #[must_use]
    pub fn has_battlecry(&self) -> bool {
        self.card_type == CardType::Minion && !self.play.is_empty()
    }

    /// Whether this card has any deathrattle text.
    #[must_use]
    pub fn has_deathrattle(&self) -> bool {
        !self.deathrattle.is_empty()
    }
}
