//! Closed vocabularies shared across the engine.
//!
//! Zones, card types, tags, and player lifecycle states are fixed enums
//! rather than game-configured identifiers. Every consumer matches on
//! them exhaustively, so adding a variant surfaces every site that needs
//! a decision.

use serde::{Deserialize, Serialize};

/// The zones a card can occupy.
///
/// A card is in exactly one zone at a time. Zone transitions go through
/// `Game::move_to_zone`, which keeps the per-player containers in sync.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    /// On the battlefield (minions, heroes, hero powers).
    Play,
    /// In the owner's deck. Top of deck is the end of the container.
    Deck,
    /// In the controller's hand.
    Hand,
    /// Dead or spent cards.
    Graveyard,
    /// Face-down secrets in play.
    Secret,
    /// Off to the side: morphed-away bodies, cards mid-materialization.
    SetAside,
    /// Gone from the game entirely.
    Removed,
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Zone::Play => "Play",
            Zone::Deck => "Deck",
            Zone::Hand => "Hand",
            Zone::Graveyard => "Graveyard",
            Zone::Secret => "Secret",
            Zone::SetAside => "SetAside",
            Zone::Removed => "Removed",
        };
        write!(f, "{name}")
    }
}

/// The kinds of cards the engine knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Hero,
    Minion,
    Spell,
    /// A buff attached to another card. Never occupies a zone itself.
    Enchantment,
    HeroPower,
}

impl CardType {
    /// Whether this card type can sit on the battlefield and take damage.
    #[must_use]
    pub fn is_character(self) -> bool {
        matches!(self, CardType::Hero | CardType::Minion)
    }
}

/// Boolean and counted properties a card or player can carry.
///
/// Tags live in a small map on each card (and each player) and can also
/// be granted by buffs. A tag with value 0 is treated as absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameTag {
    // === Character tags ===
    /// Can attack the turn it enters play.
    Charge,
    /// Enemies must attack this character first.
    Taunt,
    /// Cannot be targeted by attacks until it attacks.
    Stealth,
    /// May attack twice per turn.
    Windfury,
    /// Skips its controller's next attack with this character.
    Frozen,
    /// May never attack.
    CantAttack,
    /// Value counts bonus spell damage dealt by the controller.
    SpellPower,

    // === Transient card tags ===
    /// Set by counterspells; the play resolves without its scripts.
    Countered,

    // === Player tags ===
    /// Value counts how many times damage dealt by this player's
    /// sources is doubled.
    DamageDoubled,
    /// Healing effects damage this player's characters instead.
    HealingAsDamage,
    /// Healing on this player's characters is doubled.
    HealingDoubled,
    /// This player's deathrattles fire twice.
    ExtraDeathrattles,
    /// This player's battlecries fire twice.
    ExtraBattlecries,
    /// This player draws from an empty deck without fatigue damage.
    CantFatigue,
    /// Overload costs are ignored for this player.
    CantOverload,
}

impl GameTag {
    /// Whether a silence wipes this tag off a card.
    ///
    /// Player-side tags and bookkeeping tags survive; combat-relevant
    /// character tags do not.
    #[must_use]
    pub fn is_silenceable(self) -> bool {
        matches!(
            self,
            GameTag::Charge
                | GameTag::Taunt
                | GameTag::Stealth
                | GameTag::Windfury
                | GameTag::Frozen
                | GameTag::CantAttack
                | GameTag::SpellPower
        )
    }
}

/// Where a player stands in the match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayState {
    #[default]
    Playing,
    Won,
    Lost,
    Tied,
    /// The player conceded.
    Quit,
}

impl PlayState {
    /// Whether the player is still in the game.
    #[must_use]
    pub fn is_playing(self) -> bool {
        matches!(self, PlayState::Playing)
    }
}

/// Mulligan progress for one player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MulliganState {
    /// Opening hand not dealt yet.
    #[default]
    Waiting,
    /// The player has been offered a hand to return cards from.
    Input,
    /// Replacement cards dealt, deck reshuffled.
    Done,
}

/// Overall progress of a game session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Created, decks registered, not dealt yet.
    #[default]
    Setup,
    /// Opening hands dealt, mulligans outstanding.
    Mulligan,
    /// Turns are running.
    Playing,
    /// At least one player has stopped playing.
    Finished,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_type_is_character() {
        assert!(CardType::Hero.is_character());
        assert!(CardType::Minion.is_character());
        assert!(!CardType::Spell.is_character());
        assert!(!CardType::Enchantment.is_character());
        assert!(!CardType::HeroPower.is_character());
    }

    #[test]
    fn test_silenceable_tags() {
        assert!(GameTag::Taunt.is_silenceable());
        assert!(GameTag::Windfury.is_silenceable());
        assert!(GameTag::Frozen.is_silenceable());
        assert!(!GameTag::Countered.is_silenceable());
        assert!(!GameTag::ExtraDeathrattles.is_silenceable());
    }

    #[test]
    fn test_play_state_default() {
        assert_eq!(PlayState::default(), PlayState::Playing);
        assert!(PlayState::Playing.is_playing());
        assert!(!PlayState::Lost.is_playing());
    }

    #[test]
    fn test_zone_display() {
        assert_eq!(format!("{}", Zone::Play), "Play");
        assert_eq!(format!("{}", Zone::Graveyard), "Graveyard");
    }

    #[test]
    fn test_enum_serialization() {
        let zone = Zone::Hand;
        let json = serde_json::to_string(&zone).unwrap();
        let back: Zone = serde_json::from_str(&json).unwrap();
        assert_eq!(zone, back);

        let tag = GameTag::SpellPower;
        let json = serde_json::to_string(&tag).unwrap();
        let back: GameTag = serde_json::from_str(&json).unwrap();
        assert_eq!(tag, back);
    }
}
