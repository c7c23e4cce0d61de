//! Player identity and per-player storage.
//!
//! `PlayerId` is a 0-based seat index. The engine is written for
//! two-player duels but nothing in this module assumes a count.
//! `PlayerMap` holds one value per seat and indexes by `PlayerId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Player identifier. The first player is seat 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// The raw seat index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Every seat of a game with `player_count` players, in order.
    ///
    /// ```
    /// use brazier::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(2).collect();
    /// assert_eq!(players, vec![PlayerId::new(0), PlayerId::new(1)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// One value per seat, indexed by `PlayerId`.
///
/// ```
/// use brazier::core::{PlayerId, PlayerMap};
///
/// let mut fatigue: PlayerMap<i32> = PlayerMap::new(2, |_| 0);
/// fatigue[PlayerId::new(1)] += 1;
/// assert_eq!(fatigue[PlayerId::new(0)], 0);
/// assert_eq!(fatigue[PlayerId::new(1)], 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Build a map from a per-seat factory.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let data = (0..player_count as u8)
            .map(|i| factory(PlayerId(i)))
            .collect();

        Self { data }
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate seats in order with their values.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seats_in_order() {
        let players: Vec<_> = PlayerId::all(2).collect();
        assert_eq!(players, vec![PlayerId::new(0), PlayerId::new(1)]);
        assert_eq!(players[1].index(), 1);
        assert_eq!(format!("{}", players[0]), "Player 0");
    }

    #[test]
    fn test_map_indexing() {
        let mut map: PlayerMap<i32> = PlayerMap::new(2, |p| p.index() as i32 * 10);
        assert_eq!(map[PlayerId::new(1)], 10);

        map[PlayerId::new(0)] = 5;
        assert_eq!(map[PlayerId::new(0)], 5);
    }

    #[test]
    fn test_map_iteration() {
        let map: PlayerMap<i32> = PlayerMap::new(2, |p| p.index() as i32);
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(PlayerId::new(0), &0), (PlayerId::new(1), &1)]);
    }

    #[test]
    fn test_map_serialization() {
        let map: PlayerMap<i32> = PlayerMap::new(2, |p| p.index() as i32 + 1);
        let json = serde_json::to_string(&map).unwrap();
        let back: PlayerMap<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, back);
    }

    #[test]
    #[should_panic(expected = "Must have at least 1 player")]
    fn test_map_rejects_zero_players() {
        let _: PlayerMap<i32> = PlayerMap::new(0, |_| 0);
    }
}
