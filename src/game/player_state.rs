//! Per-player state.
//!
//! Everything a single player owns lives here: zone containers, hero
//! and hero power slots, the mana pool, and per-turn counters. Zone
//! containers hold entity ids only; the cards themselves are stored in
//! the game's entity table.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{EntityId, GameTag, MulliganState, PlayState, Zone};
use crate::game::Choice;

/// One player's side of the game.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlayerState {
    // === Zones ===
    /// Deck order; the top of the deck is the end of the vec.
    pub deck: Vec<EntityId>,
    /// Hand order, oldest card first.
    pub hand: Vec<EntityId>,
    /// Minions in play, left to right.
    pub board: Vec<EntityId>,
    /// Active secrets.
    pub secrets: Vec<EntityId>,
    pub graveyard: Vec<EntityId>,
    /// Cards held off to the side: choice offers, pending summons.
    pub setaside: Vec<EntityId>,
    /// Cards removed from the game entirely.
    pub removed: Vec<EntityId>,

    // === Slots ===
    pub hero: Option<EntityId>,
    pub hero_power: Option<EntityId>,

    // === Mana ===
    /// Permanent mana crystals.
    pub max_mana: i32,
    /// Crystals spent this turn.
    pub used_mana: i32,
    /// Temporary mana on top of the crystal count.
    pub temp_mana: i32,
    /// Crystals that will be locked next turn.
    pub overloaded: i32,
    /// Crystals locked this turn.
    pub overload_locked: i32,

    // === Turn bookkeeping ===
    /// True once a card has been played this turn.
    pub combo: bool,
    pub cards_played_this_turn: u32,
    /// Increases by one for every draw from an empty deck.
    pub fatigue_counter: i32,

    // === Status ===
    pub play_state: PlayState,
    pub mulligan_state: MulliganState,
    /// Question this player must answer before the game continues.
    pub choice: Option<Choice>,

    /// Player-level tags, e.g. spell damage auras that outlive a card.
    pub tags: SmallVec<[(GameTag, i32); 2]>,
}

impl PlayerState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mana the player can spend right now.
    #[must_use]
    pub fn available_mana(&self) -> i32 {
        (self.max_mana + self.temp_mana - self.used_mana - self.overload_locked).max(0)
    }

    #[must_use]
    pub fn has_tag(&self, tag: GameTag) -> bool {
        self.tag_value(tag) != 0
    }

    #[must_use]
    pub fn tag_value(&self, tag: GameTag) -> i32 {
        self.tags
            .iter()
            .find(|(t, _)| *t == tag)
            .map_or(0, |(_, v)| *v)
    }

    pub fn set_tag(&mut self, tag: GameTag, value: i32) {
        if let Some(entry) = self.tags.iter_mut().find(|(t, _)| *t == tag) {
            entry.1 = value;
        } else {
            self.tags.push((tag, value));
        }
    }

    pub fn remove_tag(&mut self, tag: GameTag) {
        self.tags.retain(|(t, _)| *t != tag);
    }

    /// The container backing a zone. Heroes and hero powers in play are
    /// tracked through their slots instead and never touch `board`.
    #[must_use]
    pub fn container(&self, zone: Zone) -> &Vec<EntityId> {
        match zone {
            Zone::Play => &self.board,
            Zone::Deck => &self.deck,
            Zone::Hand => &self.hand,
            Zone::Graveyard => &self.graveyard,
            Zone::Secret => &self.secrets,
            Zone::SetAside => &self.setaside,
            Zone::Removed => &self.removed,
        }
    }

    pub fn container_mut(&mut self, zone: Zone) -> &mut Vec<EntityId> {
        match zone {
            Zone::Play => &mut self.board,
            Zone::Deck => &mut self.deck,
            Zone::Hand => &mut self.hand,
            Zone::Graveyard => &mut self.graveyard,
            Zone::Secret => &mut self.secrets,
            Zone::SetAside => &mut self.setaside,
            Zone::Removed => &mut self.removed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_mana() {
        let mut player = PlayerState::new();
        player.max_mana = 6;
        player.used_mana = 2;
        assert_eq!(player.available_mana(), 4);

        player.temp_mana = 1;
        assert_eq!(player.available_mana(), 5);

        player.overload_locked = 3;
        assert_eq!(player.available_mana(), 2);

        // Never negative, even when locked past the crystal count.
        player.overload_locked = 10;
        assert_eq!(player.available_mana(), 0);
    }

    #[test]
    fn test_tags() {
        let mut player = PlayerState::new();
        assert!(!player.has_tag(GameTag::SpellPower));

        player.set_tag(GameTag::SpellPower, 1);
        player.set_tag(GameTag::SpellPower, 2);
        assert_eq!(player.tag_value(GameTag::SpellPower), 2);

        player.remove_tag(GameTag::SpellPower);
        assert!(!player.has_tag(GameTag::SpellPower));
    }

    #[test]
    fn test_container_routing() {
        let mut player = PlayerState::new();
        player.container_mut(Zone::Play).push(EntityId(10));
        player.container_mut(Zone::Deck).push(EntityId(11));
        assert_eq!(player.board, vec![EntityId(10)]);
        assert_eq!(player.deck, vec![EntityId(11)]);
        assert!(player.container(Zone::Graveyard).is_empty());
    }
}
