//! Entity identity.
//!
//! Every game object (player, hero, minion, spell, hero power) has a
//! unique `EntityId`. Broadcasts, selectors, and event records all speak
//! in entity IDs, so players and cards share one identifier space.
//!
//! IDs below the configured player count are the players themselves;
//! everything above is allocated by the game as cards enter it.
//!
//! ```
//! use brazier::core::{EntityId, PlayerId};
//!
//! let hero = EntityId(7);
//! assert!(!hero.is_player(2));
//!
//! let owner = EntityId::player(PlayerId::new(1));
//! assert_eq!(owner.as_player(2), Some(PlayerId::new(1)));
//! ```

use serde::{Deserialize, Serialize};

use super::PlayerId;

/// Unique identifier for any game entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// The entity standing for a player.
    #[must_use]
    pub const fn player(id: PlayerId) -> Self {
        Self(id.0 as u32)
    }

    /// The entity standing for the player at `index`.
    #[must_use]
    pub const fn player_id(index: u8) -> Self {
        Self(index as u32)
    }

    /// First ID free for cards in a game with `player_count` players.
    #[must_use]
    pub const fn first_non_player(player_count: usize) -> u32 {
        player_count as u32
    }

    /// Whether this ID sits in the player range.
    #[must_use]
    pub const fn is_player(self, player_count: usize) -> bool {
        self.0 < player_count as u32
    }

    /// The player this ID stands for, if it is one.
    #[must_use]
    pub const fn as_player(self, player_count: usize) -> Option<PlayerId> {
        if self.is_player(player_count) {
            Some(PlayerId::new(self.0 as u8))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}
