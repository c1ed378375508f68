//! Choice lists for the menu layer, with a reason for every disabled entry

use baton_protocol::{CombatantId, TargetCategory};

/// Why a choice cannot be picked right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisabledReason {
    /// Move has no PP left
    NoPp,
    /// Move is disabled by an effect
    MoveDisabled,
    /// Move has nothing it could hit from this position
    NoLegalTarget,
    /// Combatant cannot leave the field
    Trapped,
    /// Already on the field
    Active,
    Fainted,
    /// Already chosen earlier in this round
    Standby,
    /// Every unit of the item is already claimed
    OutOfStock,
    /// Every required replacement is already chosen
    NoSlotsLeft,
}

impl DisabledReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisabledReason::NoPp => "No PP left",
            DisabledReason::MoveDisabled => "Disabled",
            DisabledReason::NoLegalTarget => "No target",
            DisabledReason::Trapped => "Cannot switch out",
            DisabledReason::Active => "Already in battle",
            DisabledReason::Fainted => "Fainted",
            DisabledReason::Standby => "Already chosen",
            DisabledReason::OutOfStock => "None left",
            DisabledReason::NoSlotsLeft => "No room",
        }
    }
}

impl std::fmt::Display for DisabledReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Enabled,
    Disabled(DisabledReason),
}

impl Availability {
    pub fn is_enabled(&self) -> bool {
        matches!(self, Availability::Enabled)
    }

    pub fn reason(&self) -> Option<DisabledReason> {
        match self {
            Availability::Enabled => None,
            Availability::Disabled(reason) => Some(*reason),
        }
    }

    /// First failing check wins
    pub(crate) fn first_of(reasons: impl IntoIterator<Item = Option<DisabledReason>>) -> Self {
        reasons
            .into_iter()
            .flatten()
            .next()
            .map(Availability::Disabled)
            .unwrap_or(Availability::Enabled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveChoice {
    pub slot: usize,
    pub id: String,
    pub name: String,
    pub target: TargetCategory,
    pub pp: u32,
    pub max_pp: u32,
    pub availability: Availability,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchChoice {
    pub combatant: CombatantId,
    pub name: String,
    pub availability: Availability,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemChoice {
    pub id: String,
    pub name: String,
    /// Units left after earlier combatants' claims
    pub remaining: u32,
    pub availability: Availability,
}

/// Everything the current combatant could do
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOptions {
    pub combatant: CombatantId,
    pub moves: Vec<MoveChoice>,
    pub switches: Vec<SwitchChoice>,
    pub items: Vec<ItemChoice>,
    pub can_flee: bool,
}

impl ActionOptions {
    /// Whether any move, switch or item is selectable
    pub fn has_enabled(&self) -> bool {
        self.moves.iter().any(|m| m.availability.is_enabled())
            || self.switches.iter().any(|s| s.availability.is_enabled())
            || self.items.iter().any(|i| i.availability.is_enabled())
    }
}
