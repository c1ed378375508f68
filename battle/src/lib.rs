//! Presentation-side battle logic: targeting, decision builders and field tracking.
//!
//! Nothing in this crate spawns threads or talks to the simulation. It sits
//! between `baton-protocol` (the simulation interface) and `baton-client`
//! (the orchestration that moves events and submissions between threads):
//!
//! ```text
//! baton-protocol (events, requests, decisions)
//!        │
//!        ▼
//! baton-battle (targeting + builders + tracking) ← THIS CRATE
//!        │
//!        ▼
//! baton-client (channel, bridge, dispatcher, session)
//! ```
//!
//! # Main Types
//!
//! - [`resolve`] / [`TargetTable`] - legal targets of a move for a battle format
//! - [`TurnActionBuilder`] - one decision per active combatant, with undo
//! - [`SwitchInBuilder`] - replacements for fainted combatants
//! - [`TrackedField`] - per-position visibility, updated from events
//!
//! # Example Usage
//!
//! ```ignore
//! use baton_battle::{TurnActionBuilder, TurnProgress};
//! use baton_protocol::{Decision, MoveRef};
//!
//! let mut builder = TurnActionBuilder::new(format, request);
//!
//! let table = builder.target_table(0)?;
//! if let Some(targets) = table.default_mask() {
//!     let progress = builder.push(Decision::Move {
//!         choice: MoveRef::Slot(0),
//!         targets,
//!     })?;
//!     if progress == TurnProgress::Complete {
//!         let submission = builder.finish()?.into_submission();
//!     }
//! }
//! ```

pub mod builder;
pub mod geometry;
pub mod targeting;
pub mod tracking;
pub mod types;

pub use builder::{
    ActionOptions, Availability, BuilderError, DisabledReason, ItemChoice, MoveChoice,
    StandbySet, SwitchChoice, SwitchInBuilder, TrainerDecisionSet, TrainerSwitchSet,
    TurnActionBuilder, TurnProgress,
};
pub use targeting::{AdjacencyLinks, PositionEntry, TargetSelection, TargetTable, resolve};
pub use tracking::TrackedField;
pub use types::{CombatantState, PositionSlot, TempLock};

// Re-export commonly used protocol types
pub use baton_protocol::{BattleFormat, FieldPosition, TargetCategory, TargetMask};
