//! Scripting vocabulary for card text.
//!
//! Card scripts are data: actions whose arguments are selectors, lazy
//! numbers, and card pickers. Everything here evaluates against a live
//! `Game` at resolution time.
//!
//! ## Key Types
//!
//! - [`Selector`]: declarative entity queries ("all enemy minions")
//! - [`Filter`]: predicates narrowing a selector
//! - [`LazyNum`]: numbers computed when the action resolves
//! - [`RandomCardPicker`]: random card id generation for summons,
//!   gives, and discover offers

pub mod lazy;
pub mod picker;
pub mod selector;

pub use lazy::{CardAttr, LazyNum};
pub use picker::{CardFilter, CardSource, RandomCardPicker};
pub use selector::{Filter, Selector};
