//! Reactive triggers.
//!
//! Cards respond to the game by registering listeners: a stored action
//! used as a pattern, a phase, and response actions. When an action
//! resolves it broadcasts itself; every matching listener queues its
//! responses with the broadcast record as event context.
//!
//! ## Key Components
//!
//! - [`EventListener`]: a trigger pattern with its responses
//! - [`Phase`]: whether a listener observes an action in flight (`On`)
//!   or after it resolved (`After`)
//! - [`BroadcastStage`]: two-phase deferral, for broadcasts that must
//!   wait until state has settled
//!
//! ## Design Philosophy
//!
//! There is no separate event vocabulary. The action that resolves and
//! the pattern a listener stores are the same type, compared
//! structurally, so any op in the catalog is triggerable without extra
//! registration plumbing.

mod broadcast;
mod listener;

pub use broadcast::BroadcastStage;
pub(crate) use broadcast::deliver;
pub use listener::{EventListener, Phase};
