//! Domain types for field tracking

mod combatant;
mod slot;

pub use combatant::{CombatantState, TempLock};
pub use slot::PositionSlot;
