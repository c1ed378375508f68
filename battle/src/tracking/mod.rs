//! Field tracking from simulation events

mod field;
mod updater;

pub use field::TrackedField;
