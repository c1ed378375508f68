//! Events emitted by the simulation
//!
//! The simulation publishes one [`Event`] at a time and waits for the
//! presentation side to acknowledge it. Phase changes are reported separately
//! as a [`PhaseState`] and are never acknowledged.

mod request;

use serde::{Deserialize, Serialize};

use crate::field::{CombatantId, FieldPosition, TrainerId};
use crate::target::TargetMask;

pub use request::{
    ActionRequest, ActiveCombatant, DecisionRequest, ForcedMove, ItemOption, MoveOption,
    PartyMember, SwitchRequest,
};

/// Reported when the simulation finishes a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PhaseState {
    /// All decisions for the turn are in; the turn can be resolved
    ReadyToRunTurn,
    /// All replacements are chosen; switch-ins can be resolved
    ReadyToRunSwitches,
    /// The battle is over
    Ended,
}

/// How a battle finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BattleOutcome {
    Victory { winner: TrainerId },
    Draw,
    Fled { trainer: TrainerId },
    Forfeit { trainer: TrainerId },
}

/// A combatant moved from one position to another without leaving the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionShift {
    pub combatant: CombatantId,
    pub from: FieldPosition,
    pub to: FieldPosition,
}

/// One simulation-emitted record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum Event {
    // === Structural ===
    /// Combatant is bound to a move (and its targets) for the coming turns
    #[serde(rename_all = "camelCase")]
    TempLock {
        combatant: CombatantId,
        slot: usize,
        targets: TargetMask,
    },

    TempUnlock { combatant: CombatantId },

    PpChanged {
        combatant: CombatantId,
        slot: usize,
        pp: u32,
    },

    /// Combatant appears disguised as another
    #[serde(rename_all = "camelCase")]
    Illusion {
        combatant: CombatantId,
        disguised_as: String,
    },

    IllusionEnded { combatant: CombatantId },

    Transform {
        combatant: CombatantId,
        target: CombatantId,
    },

    Friendship { combatant: CombatantId, delta: i16 },

    // === Decision requests ===
    Request(DecisionRequest),

    // === Position / visibility ===
    /// Remaining combatants were shifted to the center column (triple battles)
    AutoCenter { shifts: Vec<PositionShift> },

    SwitchIn {
        combatant: CombatantId,
        position: FieldPosition,
        name: String,
    },

    SwitchOut {
        combatant: CombatantId,
        position: FieldPosition,
    },

    Faint {
        combatant: CombatantId,
        position: FieldPosition,
    },

    /// Combatant became visible at a position (e.g. revealed after hiding)
    Appear {
        combatant: CombatantId,
        position: FieldPosition,
        name: String,
    },

    /// Bench rotated (rotation battles)
    Rotate {
        trainer: TrainerId,
        shifts: Vec<PositionShift>,
    },

    // === Message-bearing ===
    FleeFailed { trainer: TrainerId, text: String },

    BattleResult { outcome: BattleOutcome, text: String },

    #[serde(rename_all = "camelCase")]
    MoveUsed {
        combatant: CombatantId,
        move_name: String,
        targets: TargetMask,
        text: String,
    },

    #[serde(rename_all = "camelCase")]
    HpChanged {
        combatant: CombatantId,
        old_hp: u32,
        new_hp: u32,
        text: String,
    },

    StatusChanged {
        combatant: CombatantId,
        status: String,
        text: String,
    },

    /// Anything else the simulation wants shown
    Narration { text: String },
}

impl Event {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Event::TempLock { .. } => "temp_lock",
            Event::TempUnlock { .. } => "temp_unlock",
            Event::PpChanged { .. } => "pp_changed",
            Event::Illusion { .. } => "illusion",
            Event::IllusionEnded { .. } => "illusion_ended",
            Event::Transform { .. } => "transform",
            Event::Friendship { .. } => "friendship",
            Event::Request(_) => "request",
            Event::AutoCenter { .. } => "auto_center",
            Event::SwitchIn { .. } => "switch_in",
            Event::SwitchOut { .. } => "switch_out",
            Event::Faint { .. } => "faint",
            Event::Appear { .. } => "appear",
            Event::Rotate { .. } => "rotate",
            Event::FleeFailed { .. } => "flee_failed",
            Event::BattleResult { .. } => "battle_result",
            Event::MoveUsed { .. } => "move_used",
            Event::HpChanged { .. } => "hp_changed",
            Event::StatusChanged { .. } => "status_changed",
            Event::Narration { .. } => "narration",
        }
    }

    /// The simulation's default localized text, for message-bearing events
    pub fn default_text(&self) -> Option<&str> {
        match self {
            Event::FleeFailed { text, .. }
            | Event::BattleResult { text, .. }
            | Event::MoveUsed { text, .. }
            | Event::HpChanged { text, .. }
            | Event::StatusChanged { text, .. }
            | Event::Narration { text } => Some(text),
            _ => None,
        }
    }

    /// Combatant the event is about, if any
    pub fn combatant(&self) -> Option<CombatantId> {
        match self {
            Event::TempLock { combatant, .. }
            | Event::TempUnlock { combatant }
            | Event::PpChanged { combatant, .. }
            | Event::Illusion { combatant, .. }
            | Event::IllusionEnded { combatant }
            | Event::Transform { combatant, .. }
            | Event::Friendship { combatant, .. }
            | Event::SwitchIn { combatant, .. }
            | Event::SwitchOut { combatant, .. }
            | Event::Faint { combatant, .. }
            | Event::Appear { combatant, .. }
            | Event::MoveUsed { combatant, .. }
            | Event::HpChanged { combatant, .. }
            | Event::StatusChanged { combatant, .. } => Some(*combatant),
            _ => None,
        }
    }
}
