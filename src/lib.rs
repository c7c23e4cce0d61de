//! # brazier
//!
//! A turn-based card game rules engine built around a scriptable
//! action system.
//!
//! ## Design Principles
//!
//! 1. **Everything is an action**: every rules change, from a card
//!    play down to a single point of damage, is an op resolving on a
//!    depth-first queue. There is no second path that mutates state.
//!
//! 2. **Cards are data**: card behavior is declared with selectors,
//!    lazy numbers, and action scripts. Adding a card means writing
//!    data, not engine code.
//!
//! 3. **Reactions are broadcasts**: resolving actions announce
//!    themselves, and listeners pattern-match the announcement against
//!    a stored action. Any op in the catalog is triggerable.
//!
//! ## Architecture
//!
//! - **Depth-first resolution**: an action resolves completely,
//!   including everything it queues, before its successor starts. A
//!   depth guard catches trigger loops.
//!
//! - **Two-phase listening**: `On` listeners observe an action in
//!   flight and may still change its outcome; `After` listeners see
//!   the settled result. Broadcasts that must wait for a stable board
//!   are deferred through a staging buffer.
//!
//! - **Deterministic replay**: all randomness runs through a seeded
//!   RNG, and every resolved op lands in the action log.
//!
//! ## Modules
//!
//! - `core`: Entity ids, players, enums, errors, RNG, configuration
//! - `dsl`: Selectors, lazy numbers, and random card pickers
//! - `cards`: Card definitions, instances, and the registry
//! - `actions`: The op catalog and its resolution machinery
//! - `triggers`: Event listeners and the broadcast sweep
//! - `game`: The session: players, zones, choices, the action queue

pub mod core;
pub mod dsl;
pub mod cards;
pub mod actions;
pub mod triggers;
pub mod game;

// Re-export commonly used types
pub use crate::core::{
    CardType, EntityId, GameConfig, GameError, GameResult, GameRng, GameStatus, GameTag,
    MulliganState, PlayState, PlayerId, PlayerMap, Zone,
};

pub use crate::dsl::{CardAttr, CardFilter, Filter, LazyNum, RandomCardPicker, Selector};

pub use crate::cards::{Buff, Card, CardData, CardRegistry};

pub use crate::actions::{Action, Arg, CardSpec, EventArgs, Op, Repeat, Value};

pub use crate::triggers::{EventListener, Phase};

pub use crate::game::{ActionLogEntry, Choice, ChoiceKind, Game, PlayerState};
