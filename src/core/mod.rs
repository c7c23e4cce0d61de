//! Core engine types: entities, players, enums, errors, RNG, configuration.
//!
//! This module contains the fundamental building blocks the rest of the
//! engine is written against. Nothing here knows about concrete cards.

pub mod config;
pub mod entity;
pub mod enums;
pub mod error;
pub mod player;
pub mod rng;

pub use config::GameConfig;
pub use entity::EntityId;
pub use enums::{CardType, GameStatus, GameTag, MulliganState, PlayState, Zone};
pub use error::{GameError, GameResult};
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
