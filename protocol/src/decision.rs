//! Decisions submitted back to the simulation

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::field::{CombatantId, FieldPosition, TrainerId};
use crate::target::TargetMask;

/// Which move a combatant uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MoveRef {
    /// Index into the combatant's move list
    Slot(usize),
    Struggle,
}

/// The chosen action for one combatant in one turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Decision {
    Move { choice: MoveRef, targets: TargetMask },
    Item { item: String },
    Switch { replacement: CombatantId },
}

impl Decision {
    /// Replacement combatant, if this is a switch
    pub fn replacement(&self) -> Option<CombatantId> {
        match self {
            Decision::Switch { replacement } => Some(*replacement),
            _ => None,
        }
    }
}

/// A decision bound to the combatant it was made for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnDecision {
    pub combatant: CombatantId,
    pub decision: Decision,
}

/// Send `replacement` into `position`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchDecision {
    pub replacement: CombatantId,
    pub position: FieldPosition,
}

/// Everything that can be sent back to the simulation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Submission {
    Turn {
        trainer: TrainerId,
        decisions: Vec<TurnDecision>,
    },
    Switches {
        trainer: TrainerId,
        decisions: Vec<SwitchDecision>,
    },
    Flee {
        trainer: TrainerId,
    },
}

impl Submission {
    pub fn trainer(&self) -> TrainerId {
        match self {
            Submission::Turn { trainer, .. }
            | Submission::Switches { trainer, .. }
            | Submission::Flee { trainer } => *trainer,
        }
    }

    /// Serialize to a compact choice string, e.g. "move 1 foe-center, switch t0#3"
    pub fn to_choice_string(&self) -> String {
        match self {
            Submission::Turn { decisions, .. } => decisions
                .iter()
                .map(|d| d.decision.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            Submission::Switches { decisions, .. } => decisions
                .iter()
                .map(|d| format!("switch {} {}", d.replacement, d.position))
                .collect::<Vec<_>>()
                .join(", "),
            Submission::Flee { .. } => "flee".to_string(),
        }
    }
}

impl fmt::Display for Submission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_choice_string())
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Move { choice, targets } => {
                match choice {
                    MoveRef::Slot(slot) => write!(f, "move {}", slot + 1)?,
                    MoveRef::Struggle => f.write_str("move struggle")?,
                }
                for position in targets.positions() {
                    write!(f, " {}", position)?;
                }
                Ok(())
            }
            Decision::Item { item } => write!(f, "item {}", item),
            Decision::Switch { replacement } => write!(f, "switch {}", replacement),
        }
    }
}
