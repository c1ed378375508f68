//! Combatant bookkeeping

use std::collections::BTreeMap;

use baton_protocol::{CombatantId, FieldPosition, TargetMask};

/// A multi-turn move binding a combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TempLock {
    pub slot: usize,
    pub targets: TargetMask,
}

/// What the presentation side knows about one combatant
///
/// Built up from events; the simulation stays the owner of the real state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatantState {
    pub id: CombatantId,

    /// Name shown when it was last sent in
    pub name: String,

    /// `None` while off the field
    pub position: Option<FieldPosition>,

    pub fainted: bool,

    // === Cleared on switch-out ===
    pub temp_lock: Option<TempLock>,

    /// Name shown instead of the real one
    pub disguise: Option<String>,

    pub transformed_into: Option<CombatantId>,

    // === Accumulated ===
    /// Last reported PP per move slot
    pub pp: BTreeMap<usize, u32>,

    /// Sum of friendship changes this battle
    pub friendship: i32,

    pub hp: Option<u32>,

    pub status: Option<String>,
}

impl CombatantState {
    pub fn new(id: CombatantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            position: None,
            fainted: false,
            temp_lock: None,
            disguise: None,
            transformed_into: None,
            pp: BTreeMap::new(),
            friendship: 0,
            hp: None,
            status: None,
        }
    }

    /// Name to show: the disguise if there is one
    pub fn display_name(&self) -> &str {
        self.disguise.as_deref().unwrap_or(&self.name)
    }

    pub fn is_active(&self) -> bool {
        self.position.is_some()
    }

    pub fn pp(&self, slot: usize) -> Option<u32> {
        self.pp.get(&slot).copied()
    }

    /// Drop the state that does not survive leaving the field
    pub fn leave_field(&mut self) {
        self.position = None;
        self.temp_lock = None;
        self.disguise = None;
        self.transformed_into = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use baton_protocol::TrainerId;

    #[test]
    fn test_display_name_prefers_disguise() {
        let mut state = CombatantState::new(CombatantId::new(TrainerId(1), 0), "Zoroark");
        assert_eq!(state.display_name(), "Zoroark");

        state.disguise = Some("Pidgeot".to_string());
        assert_eq!(state.display_name(), "Pidgeot");
    }

    #[test]
    fn test_leave_field_keeps_accumulated_state() {
        let mut state = CombatantState::new(CombatantId::new(TrainerId(0), 2), "Ditto");
        state.position = Some(FieldPosition::ALLY_CENTER);
        state.transformed_into = Some(CombatantId::new(TrainerId(1), 0));
        state.temp_lock = Some(TempLock {
            slot: 0,
            targets: TargetMask::FOE_CENTER,
        });
        state.pp.insert(0, 7);
        state.friendship = 3;

        state.leave_field();

        assert!(!state.is_active());
        assert!(state.transformed_into.is_none());
        assert!(state.temp_lock.is_none());
        assert_eq!(state.pp(0), Some(7));
        assert_eq!(state.friendship, 3);
    }
}
