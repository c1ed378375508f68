//! TrackedField - per-position visibility and combatant bookkeeping

use std::collections::HashMap;

use baton_protocol::{BattleFormat, BattleOutcome, CombatantId, FieldPosition, TrainerId};

use crate::types::{CombatantState, PositionSlot};

/// The field as the presentation layer sees it
///
/// Reconstructed from simulation events on the presentation thread. Positions
/// are relative to the local trainer: ally positions are always theirs.
#[derive(Debug, Clone)]
pub struct TrackedField {
    pub format: BattleFormat,

    /// Trainer whose side is drawn as the ally side
    pub local_trainer: TrainerId,

    /// Indexed by [`FieldPosition::index`]
    pub(crate) slots: [PositionSlot; 6],

    pub(crate) combatants: HashMap<CombatantId, CombatantState>,

    // === Outcome ===
    pub ended: bool,

    pub outcome: Option<BattleOutcome>,
}

impl TrackedField {
    pub fn new(format: BattleFormat, local_trainer: TrainerId) -> Self {
        Self {
            format,
            local_trainer,
            slots: [PositionSlot::default(); 6],
            combatants: HashMap::new(),
            ended: false,
            outcome: None,
        }
    }

    pub fn slot(&self, position: FieldPosition) -> &PositionSlot {
        &self.slots[position.index()]
    }

    pub(crate) fn slot_mut(&mut self, position: FieldPosition) -> &mut PositionSlot {
        &mut self.slots[position.index()]
    }

    /// All six slots, in [`FieldPosition::ALL`] order
    pub fn slots(&self) -> impl Iterator<Item = (FieldPosition, &PositionSlot)> {
        FieldPosition::ALL.into_iter().zip(self.slots.iter())
    }

    pub fn occupant(&self, position: FieldPosition) -> Option<&CombatantState> {
        self.slot(position)
            .occupant
            .and_then(|id| self.combatants.get(&id))
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&CombatantState> {
        self.combatants.get(&id)
    }

    pub fn combatants(&self) -> impl Iterator<Item = &CombatantState> {
        self.combatants.values()
    }

    /// Get or create the state for a combatant
    pub(crate) fn combatant_mut(&mut self, id: CombatantId, name: &str) -> &mut CombatantState {
        self.combatants
            .entry(id)
            .or_insert_with(|| CombatantState::new(id, name))
    }

    pub fn is_local(&self, id: CombatantId) -> bool {
        id.trainer == self.local_trainer
    }

    /// Visible occupants on one side of the field
    pub fn visible_on(&self, ally: bool) -> impl Iterator<Item = &CombatantState> {
        self.slots()
            .filter(move |(p, s)| p.is_ally() == ally && s.sprite_visible)
            .filter_map(|(p, _)| self.occupant(p))
    }
}
