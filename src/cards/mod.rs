//! Card system: definitions, instances, and registry.
//!
//! ## Key Types
//!
//! - `CardData`: Static card data with scripts
//! - `Card`: Runtime card state (zone, damage, buffs, listeners)
//! - `Buff`: An attached enchantment's live effect
//! - `CardRegistry`: Card definition lookup by string id

pub mod definition;
pub mod instance;
pub mod registry;

pub use definition::CardData;
pub use instance::{Buff, Card};
pub use registry::CardRegistry;
