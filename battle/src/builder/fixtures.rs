//! Request fixtures shared by the builder tests

use baton_protocol::{
    ActionRequest, ActiveCombatant, CombatantId, FieldPosition, ItemOption, MoveOption,
    PartyMember, SwitchRequest, TargetCategory, TargetMask, TrainerId,
};

pub(crate) fn id(party_slot: u8) -> CombatantId {
    CombatantId::new(TrainerId(0), party_slot)
}

fn move_option(id: &str, name: &str, target: TargetCategory) -> MoveOption {
    MoveOption {
        id: id.to_string(),
        name: name.to_string(),
        pp: 10,
        max_pp: 10,
        target,
        disabled: false,
    }
}

/// Active combatant knowing Tackle (slot 0) and Protect (slot 1)
pub(crate) fn active(party_slot: u8, position: FieldPosition) -> ActiveCombatant {
    ActiveCombatant {
        id: id(party_slot),
        name: format!("Mon{}", party_slot),
        position,
        moves: vec![
            move_option("tackle", "Tackle", TargetCategory::Normal),
            move_option("protect", "Protect", TargetCategory::User),
        ],
        forced: None,
        locked_targets: TargetMask::empty(),
        trapped: false,
    }
}

pub(crate) fn bench(party_slot: u8) -> PartyMember {
    PartyMember {
        id: id(party_slot),
        name: format!("Mon{}", party_slot),
        active: false,
        fainted: false,
    }
}

pub(crate) fn potion(quantity: u32) -> ItemOption {
    ItemOption {
        id: "potion".to_string(),
        name: "Potion".to_string(),
        quantity,
    }
}

/// The party lists the active combatants first, then `bench`
pub(crate) fn action_request(active: Vec<ActiveCombatant>, bench: Vec<PartyMember>) -> ActionRequest {
    let party = active
        .iter()
        .map(|a| PartyMember {
            id: a.id,
            name: a.name.clone(),
            active: true,
            fainted: false,
        })
        .chain(bench)
        .collect();

    ActionRequest {
        trainer: TrainerId(0),
        active,
        party,
        items: Vec::new(),
        can_flee: true,
    }
}

pub(crate) fn switch_request(
    required: usize,
    open_positions: Vec<FieldPosition>,
    party: Vec<PartyMember>,
) -> SwitchRequest {
    SwitchRequest {
        trainer: TrainerId(0),
        required,
        open_positions,
        party,
    }
}
