use baton_protocol::{CombatantId, FieldPosition, TargetMask};
use thiserror::Error;

/// A builder operation was rejected; the builder is unchanged
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuilderError {
    #[error("Every decision has already been made")]
    Complete,

    #[error("Decisions are missing: {made} of {needed} made")]
    Incomplete { made: usize, needed: usize },

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("No move in slot {0}")]
    UnknownMoveSlot(usize),

    #[error("Move in slot {0} cannot be used")]
    MoveUnavailable(usize),

    #[error("Struggle is only used when no other move is possible")]
    StruggleNotForced,

    #[error("Target selection {0:?} is not offered for this move")]
    IllegalTarget(TargetMask),

    #[error("Move in slot {0} has no legal target")]
    NoLegalTarget(usize),

    #[error("Item {0} is not available")]
    ItemUnavailable(String),

    #[error("{0} cannot switch out")]
    SwitchNotAllowed(CombatantId),

    #[error("{0} cannot be sent in")]
    IneligibleReplacement(CombatantId),

    #[error("{0} is already chosen")]
    AlreadyChosen(CombatantId),

    #[error("{0} cannot receive a replacement")]
    PositionUnavailable(FieldPosition),

    #[error("{0} already has a replacement")]
    PositionTaken(FieldPosition),

    #[error("All {0} replacements are chosen")]
    Full(usize),
}
