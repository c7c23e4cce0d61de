//! Game configuration.
//!
//! Table limits, opening hand sizes, and the action depth guard are
//! configured per game rather than hardcoded. `GameConfig::default()`
//! gives the standard two-player duel numbers; builders adjust them
//! for tests and variants.

use serde::{Deserialize, Serialize};

/// Static configuration for a game session.
///
/// ## Example
///
/// ```
/// use brazier::core::GameConfig;
///
/// let config = GameConfig::default()
///     .with_max_board(4)
///     .with_opening_hands(1, 2);
///
/// assert_eq!(config.max_board, 4);
/// assert_eq!(config.first_hand, 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of players (at least 2).
    pub player_count: usize,

    /// Maximum minions per side.
    pub max_board: usize,

    /// Maximum cards in hand. Draws beyond this burn the card.
    pub max_hand: usize,

    /// Maximum cards in a deck. Shuffles beyond this lose the card.
    pub max_deck: usize,

    /// Mana crystal ceiling.
    pub max_mana: i32,

    /// Opening hand size for the starting player.
    pub first_hand: usize,

    /// Opening hand size for the player going second.
    pub second_hand: usize,

    /// Card id given to the player going second, if any.
    /// Excluded from the mulligan offer.
    pub coin_card: Option<String>,

    /// Hard cap on recursive action depth. Blowing past this is a
    /// scripting bug (a trigger loop), not a rules situation.
    pub max_action_depth: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_count: 2,
            max_board: 7,
            max_hand: 10,
            max_deck: 60,
            max_mana: 10,
            first_hand: 3,
            second_hand: 4,
            coin_card: None,
            max_action_depth: 64,
        }
    }
}

impl GameConfig {
    /// Create a config with default limits for `player_count` players.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        assert!(player_count >= 2, "Must have at least 2 players");
        assert!(player_count <= 255, "At most 255 players supported");

        Self {
            player_count,
            ..Self::default()
        }
    }

    /// Set the maximum minions per side.
    #[must_use]
    pub fn with_max_board(mut self, max_board: usize) -> Self {
        self.max_board = max_board;
        self
    }

    /// Set the maximum hand size.
    #[must_use]
    pub fn with_max_hand(mut self, max_hand: usize) -> Self {
        self.max_hand = max_hand;
        self
    }

    /// Set the maximum deck size.
    #[must_use]
    pub fn with_max_deck(mut self, max_deck: usize) -> Self {
        self.max_deck = max_deck;
        self
    }

    /// Set the mana crystal ceiling.
    #[must_use]
    pub fn with_max_mana(mut self, max_mana: i32) -> Self {
        self.max_mana = max_mana;
        self
    }

    /// Set opening hand sizes for first and second player.
    #[must_use]
    pub fn with_opening_hands(mut self, first: usize, second: usize) -> Self {
        self.first_hand = first;
        self.second_hand = second;
        self
    }

    /// Give the player going second this card after mulligans.
    #[must_use]
    pub fn with_coin_card(mut self, card_id: impl Into<String>) -> Self {
        self.coin_card = Some(card_id.into());
        self
    }

    /// Set the recursive action depth guard.
    #[must_use]
    pub fn with_max_action_depth(mut self, depth: u32) -> Self {
        self.max_action_depth = depth;
        self
    }
}
