//! Update logic for applying simulation events to the tracked field

use baton_protocol::{CombatantId, Event, FieldPosition, PositionShift, TargetMask};
use tracing::{debug, trace};

use super::field::TrackedField;
use crate::types::{CombatantState, PositionSlot, TempLock};

impl TrackedField {
    /// Apply an event; returns the positions whose display changed
    pub fn update(&mut self, event: &Event) -> TargetMask {
        match event {
            // === Structural ===
            Event::TempLock {
                combatant,
                slot,
                targets,
            } => {
                if let Some(state) = self.combatants.get_mut(combatant) {
                    state.temp_lock = Some(TempLock {
                        slot: *slot,
                        targets: *targets,
                    });
                }
                TargetMask::empty()
            }

            Event::TempUnlock { combatant } => {
                if let Some(state) = self.combatants.get_mut(combatant) {
                    state.temp_lock = None;
                }
                TargetMask::empty()
            }

            Event::PpChanged {
                combatant,
                slot,
                pp,
            } => {
                if let Some(state) = self.combatants.get_mut(combatant) {
                    state.pp.insert(*slot, *pp);
                }
                TargetMask::empty()
            }

            Event::Illusion {
                combatant,
                disguised_as,
            } => self.touch(*combatant, |state| {
                state.disguise = Some(disguised_as.clone());
            }),

            Event::IllusionEnded { combatant } => self.touch(*combatant, |state| {
                state.disguise = None;
            }),

            Event::Transform { combatant, target } => self.touch(*combatant, |state| {
                state.transformed_into = Some(*target);
            }),

            Event::Friendship { combatant, delta } => {
                if let Some(state) = self.combatants.get_mut(combatant) {
                    state.friendship = state.friendship.saturating_add(i32::from(*delta));
                }
                TargetMask::empty()
            }

            // Handled by the dispatcher
            Event::Request(_) => TargetMask::empty(),

            // === Position / visibility ===
            Event::SwitchIn {
                combatant,
                position,
                name,
            }
            | Event::Appear {
                combatant,
                position,
                name,
            } => self.enter(*combatant, *position, name),

            Event::SwitchOut {
                combatant,
                position,
            } => {
                self.vacate(*position);
                if let Some(state) = self.combatants.get_mut(combatant) {
                    state.leave_field();
                }
                TargetMask::of(*position)
            }

            Event::Faint {
                combatant,
                position,
            } => {
                self.vacate(*position);
                if let Some(state) = self.combatants.get_mut(combatant) {
                    state.leave_field();
                    state.fainted = true;
                }
                TargetMask::of(*position)
            }

            Event::AutoCenter { shifts } | Event::Rotate { shifts, .. } => {
                self.apply_shifts(shifts)
            }

            // === Message-bearing ===
            Event::HpChanged {
                combatant, new_hp, ..
            } => self.touch(*combatant, |state| {
                state.hp = Some(*new_hp);
            }),

            Event::StatusChanged {
                combatant, status, ..
            } => self.touch(*combatant, |state| {
                state.status = (!status.is_empty()).then(|| status.clone());
            }),

            Event::BattleResult { outcome, .. } => {
                self.ended = true;
                self.outcome = Some(*outcome);
                TargetMask::empty()
            }

            Event::FleeFailed { .. } | Event::MoveUsed { .. } | Event::Narration { .. } => {
                TargetMask::empty()
            }
        }
    }

    /// Update a known combatant; reports its position if it is on the field
    fn touch(
        &mut self,
        combatant: CombatantId,
        apply: impl FnOnce(&mut CombatantState),
    ) -> TargetMask {
        match self.combatants.get_mut(&combatant) {
            Some(state) => {
                apply(state);
                state.position.map(TargetMask::of).unwrap_or_default()
            }
            None => {
                trace!(%combatant, "Event for unknown combatant");
                TargetMask::empty()
            }
        }
    }

    fn enter(&mut self, combatant: CombatantId, position: FieldPosition, name: &str) -> TargetMask {
        let mut changed = TargetMask::of(position);

        // Whoever was drawn here is gone
        if let Some(previous) = self.slot(position).occupant
            && previous != combatant
            && let Some(state) = self.combatants.get_mut(&previous)
        {
            state.leave_field();
        }

        // A combatant is only drawn in one place
        if let Some(old) = self.combatants.get(&combatant).and_then(|s| s.position)
            && old != position
        {
            self.slot_mut(old).clear();
            changed |= TargetMask::of(old);
        }

        let state = self.combatant_mut(combatant, name);
        state.name = name.to_string();
        state.position = Some(position);
        state.fainted = false;
        self.slot_mut(position).show(combatant);

        debug!(%combatant, %position, "Combatant entered");
        changed
    }

    fn vacate(&mut self, position: FieldPosition) {
        self.slot_mut(position).clear();
    }

    /// Move slot contents; all sources are lifted before any target is written
    fn apply_shifts(&mut self, shifts: &[PositionShift]) -> TargetMask {
        let lifted: Vec<(PositionShift, PositionSlot)> = shifts
            .iter()
            .map(|shift| (*shift, std::mem::take(self.slot_mut(shift.from))))
            .collect();

        let mut changed = TargetMask::empty();
        for (shift, slot) in lifted {
            let slot = if slot.occupant == Some(shift.combatant) {
                slot
            } else {
                let mut slot = PositionSlot::default();
                slot.show(shift.combatant);
                slot
            };
            *self.slot_mut(shift.to) = slot;

            if let Some(state) = self.combatants.get_mut(&shift.combatant) {
                state.position = Some(shift.to);
            }
            changed |= TargetMask::of(shift.from) | TargetMask::of(shift.to);
        }

        changed
    }
}
