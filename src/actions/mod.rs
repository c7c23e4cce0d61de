//! Actions: the unit of game-rule behavior.
//!
//! Everything that happens in a game is an [`Action`] resolving. The
//! data model lives in [`action`]; execution is split between the
//! [`targeted`] loop (per-target ops with callbacks and repetition)
//! and [`game_ops`] (session-level ops that end in a death sweep).
//! [`catalog`] holds the per-op semantics behind a single exhaustive
//! match.

pub mod action;
pub(crate) mod catalog;
pub(crate) mod game_ops;
pub(crate) mod targeted;

pub use action::{Action, Arg, BuffProp, CardSpec, EventArgs, Op, Repeat, Value};
