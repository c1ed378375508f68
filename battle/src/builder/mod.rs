//! Decision builders
//!
//! Builders accumulate a trainer's decisions one at a time, validating each
//! against the request before accepting it. They are plain values: pushing,
//! undoing and finishing never touch the simulation.

mod error;
mod options;
mod standby;
mod switch;
mod turn;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::BuilderError;
pub use options::{
    ActionOptions, Availability, DisabledReason, ItemChoice, MoveChoice, SwitchChoice,
};
pub use standby::StandbySet;
pub use switch::{SwitchInBuilder, TrainerSwitchSet};
pub use turn::{TrainerDecisionSet, TurnActionBuilder, TurnProgress};
