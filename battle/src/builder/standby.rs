use baton_protocol::{CombatantId, FieldPosition, TargetMask};

/// Combatants and positions already claimed by an in-progress builder.
///
/// A snapshot: it never changes the builder it was taken from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StandbySet {
    combatants: Vec<CombatantId>,
    positions: TargetMask,
}

impl StandbySet {
    pub(crate) fn new(
        combatants: impl IntoIterator<Item = CombatantId>,
        positions: impl IntoIterator<Item = FieldPosition>,
    ) -> Self {
        Self {
            combatants: combatants.into_iter().collect(),
            positions: positions.into_iter().collect(),
        }
    }

    pub fn contains_combatant(&self, combatant: CombatantId) -> bool {
        self.combatants.contains(&combatant)
    }

    pub fn contains_position(&self, position: FieldPosition) -> bool {
        self.positions.has(position)
    }

    /// Claimed combatants, in the order they were chosen
    pub fn combatants(&self) -> &[CombatantId] {
        &self.combatants
    }

    pub fn positions(&self) -> TargetMask {
        self.positions
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty() && self.positions.is_empty()
    }
}
