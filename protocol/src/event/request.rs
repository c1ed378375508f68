//! Decision request payloads
//!
//! These types describe what the simulation needs from a trainer: either one
//! action per active combatant, or a number of replacements for fainted ones.

use serde::{Deserialize, Serialize};

use crate::ProtocolError;
use crate::field::{CombatantId, FieldPosition, TrainerId};
use crate::target::{TargetCategory, TargetMask};

/// A request for a trainer to make decisions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DecisionRequest {
    /// The trainer must choose an action for every active combatant
    Actions(ActionRequest),
    /// The trainer must send in replacements for fainted combatants
    Switches(SwitchRequest),
}

impl DecisionRequest {
    /// Parse a request from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a request from an already-decoded JSON value
    pub fn from_value(json: &serde_json::Value) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_value(json.clone())?)
    }

    /// The trainer this request is addressed to
    pub fn trainer(&self) -> TrainerId {
        match self {
            DecisionRequest::Actions(req) => req.trainer,
            DecisionRequest::Switches(req) => req.trainer,
        }
    }
}

/// "Trainer X must act"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    pub trainer: TrainerId,

    /// Active combatants, in the order their decisions must be submitted
    pub active: Vec<ActiveCombatant>,

    /// The whole party, used for switch candidates
    #[serde(default)]
    pub party: Vec<PartyMember>,

    /// Usable bag items
    #[serde(default)]
    pub items: Vec<ItemOption>,

    /// Whether running from battle is allowed
    #[serde(default)]
    pub can_flee: bool,
}

impl ActionRequest {
    /// Party members that could be switched in
    pub fn switch_candidates(&self) -> impl Iterator<Item = &PartyMember> {
        self.party.iter().filter(|p| p.can_enter())
    }
}

/// "Trainer X must supply N replacements"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchRequest {
    pub trainer: TrainerId,

    /// Number of fainted slots to fill
    pub required: usize,

    /// Positions that may receive a replacement
    #[serde(default)]
    pub open_positions: Vec<FieldPosition>,

    #[serde(default)]
    pub party: Vec<PartyMember>,
}

impl SwitchRequest {
    pub fn switch_candidates(&self) -> impl Iterator<Item = &PartyMember> {
        self.party.iter().filter(|p| p.can_enter())
    }
}

/// An active combatant awaiting a decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveCombatant {
    pub id: CombatantId,

    /// Display name
    pub name: String,

    pub position: FieldPosition,

    #[serde(default)]
    pub moves: Vec<MoveOption>,

    /// Set when the simulation will only accept one particular move
    #[serde(default)]
    pub forced: Option<ForcedMove>,

    /// Targets bound by an ongoing multi-turn move (empty if unbound)
    #[serde(default)]
    pub locked_targets: TargetMask,

    /// Whether the combatant is prevented from switching out
    #[serde(default)]
    pub trapped: bool,
}

impl ActiveCombatant {
    /// Check if the combatant may be switched out this turn
    pub fn can_switch(&self) -> bool {
        !self.trapped && self.forced.is_none()
    }

    /// Get usable (non-disabled, with PP) moves
    pub fn usable_moves(&self) -> impl Iterator<Item = (usize, &MoveOption)> {
        self.moves.iter().enumerate().filter(|(_, m)| m.is_usable())
    }
}

/// Why a combatant's move is chosen for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ForcedMove {
    /// No usable moves left
    Struggle,
    /// Locked into the move in `slot` by a multi-turn effect
    Locked { slot: usize },
}

/// A move known by an active combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOption {
    /// Move id (lowercase, no spaces)
    pub id: String,

    /// Display name
    pub name: String,

    pub pp: u32,

    #[serde(rename = "maxpp")]
    pub max_pp: u32,

    pub target: TargetCategory,

    /// Disabled by an effect (Disable, Taunt, ...)
    #[serde(default)]
    pub disabled: bool,
}

impl MoveOption {
    pub fn is_usable(&self) -> bool {
        !self.disabled && self.pp > 0
    }
}

/// A member of the requesting trainer's party
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyMember {
    pub id: CombatantId,

    pub name: String,

    /// Currently on the field
    #[serde(default)]
    pub active: bool,

    #[serde(default)]
    pub fainted: bool,
}

impl PartyMember {
    /// Whether this member could be sent onto the field
    pub fn can_enter(&self) -> bool {
        !self.active && !self.fainted
    }
}

/// A bag item that can be used instead of a move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOption {
    pub id: String,
    pub name: String,
    pub quantity: u32,
}
