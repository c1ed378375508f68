//! Types exchanged between a battle simulation and its presentation layer.
//!
//! Inbound: [`Event`]s (one at a time, each acknowledged) and [`PhaseState`]
//! notifications. Outbound: [`Submission`]s built from [`Decision`]s.

use thiserror::Error;

pub mod decision;
pub mod event;
pub mod field;
pub mod target;

pub use decision::{Decision, MoveRef, Submission, SwitchDecision, TurnDecision};
pub use event::{
    ActionRequest, ActiveCombatant, BattleOutcome, DecisionRequest, Event, ForcedMove, ItemOption,
    MoveOption, PartyMember, PhaseState, PositionShift, SwitchRequest,
};
pub use field::{BattleFormat, Column, CombatantId, FieldPosition, Side, TrainerId};
pub use target::{TargetCategory, TargetMask};

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid request payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("Unknown field position: {0}")]
    UnknownPosition(String),

    #[error("Unknown battle format: {0}")]
    UnknownFormat(String),

    #[error("Unknown target category: {0}")]
    UnknownTarget(String),
}
