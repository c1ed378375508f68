//! Scripted Battle Example
//!
//! Plays a singles battle between the local trainer and an AI rival against
//! a tiny in-process engine. The local side picks random usable moves and
//! sends in the first healthy replacement when something faints.
//!
//! Run with `RUST_LOG=debug` to watch the event handoff between threads.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use baton_client::{
    BattleSession, ChannelError, EventPublisher, InputState, Presenter, SessionConfig,
    Simulation, TrackedField,
};
use baton_protocol::{
    ActionRequest, ActiveCombatant, BattleFormat, BattleOutcome, Column, CombatantId, Decision,
    DecisionRequest, Event, FieldPosition, MoveOption, MoveRef, PartyMember, PhaseState, Side,
    SwitchDecision, SwitchRequest, TargetCategory, TargetMask, TrainerId, TurnDecision,
};
use rand::Rng;
use rand::seq::SliceRandom;

const PLAYER: TrainerId = TrainerId(0);
const RIVAL: TrainerId = TrainerId(1);

const MOVES: [(&str, &str, TargetCategory); 2] = [
    ("tackle", "Tackle", TargetCategory::Normal),
    ("swift", "Swift", TargetCategory::AllAdjacentFoes),
];

#[derive(Debug, Clone)]
struct Mon {
    id: CombatantId,
    name: &'static str,
    hp: u32,
    active: bool,
}

impl Mon {
    fn new(trainer: TrainerId, party_slot: u8, name: &'static str) -> Self {
        Self {
            id: CombatantId::new(trainer, party_slot),
            name,
            hp: 30,
            active: false,
        }
    }

    fn fainted(&self) -> bool {
        self.hp == 0
    }
}

/// Everything after a turn is resolved
enum Next {
    Turn,
    Replacements(Vec<TrainerId>),
    Over,
}

#[derive(Default)]
struct ArenaState {
    mons: Vec<Mon>,
    turn_decisions: HashMap<TrainerId, Vec<TurnDecision>>,
    replacements: HashMap<TrainerId, Vec<SwitchDecision>>,
    /// Trainers whose submission is still missing
    waiting_on: Vec<TrainerId>,
    /// Reported once `waiting_on` is empty
    next_phase: Option<PhaseState>,
    fled: Option<TrainerId>,
}

impl ArenaState {
    fn active(&self, trainer: TrainerId) -> Option<&Mon> {
        self.mons.iter().find(|m| m.id.trainer == trainer && m.active)
    }

    fn mon_mut(&mut self, id: CombatantId) -> Option<&mut Mon> {
        self.mons.iter_mut().find(|m| m.id == id)
    }

    fn party(&self, trainer: TrainerId) -> Vec<PartyMember> {
        self.mons
            .iter()
            .filter(|m| m.id.trainer == trainer)
            .map(|m| PartyMember {
                id: m.id,
                name: m.name.to_string(),
                active: m.active,
                fainted: m.fainted(),
            })
            .collect()
    }

    fn await_submissions(&mut self, trainers: Vec<TrainerId>, phase: PhaseState) {
        self.waiting_on = trainers;
        self.next_phase = Some(phase);
    }

    fn action_request(&self, trainer: TrainerId) -> Event {
        let active = self
            .active(trainer)
            .map(|mon| ActiveCombatant {
                id: mon.id,
                name: mon.name.to_string(),
                position: lead_position(trainer),
                moves: MOVES
                    .iter()
                    .map(|(id, name, target)| MoveOption {
                        id: id.to_string(),
                        name: name.to_string(),
                        pp: 20,
                        max_pp: 20,
                        target: *target,
                        disabled: false,
                    })
                    .collect(),
                forced: None,
                locked_targets: TargetMask::empty(),
                trapped: false,
            })
            .into_iter()
            .collect();

        Event::Request(DecisionRequest::Actions(ActionRequest {
            trainer,
            active,
            party: self.party(trainer),
            items: Vec::new(),
            can_flee: trainer == PLAYER,
        }))
    }

    fn switch_request(&self, trainer: TrainerId) -> Event {
        Event::Request(DecisionRequest::Switches(SwitchRequest {
            trainer,
            required: 1,
            open_positions: vec![lead_position(trainer)],
            party: self.party(trainer),
        }))
    }

    fn resolve_turn(&mut self) -> (Vec<Event>, Next) {
        if let Some(trainer) = self.fled.take() {
            let events = vec![Event::BattleResult {
                outcome: BattleOutcome::Fled { trainer },
                text: "Got away safely!".to_string(),
            }];
            return (events, Next::Over);
        }

        let mut rng = rand::thread_rng();
        let mut order = [PLAYER, RIVAL];
        order.shuffle(&mut rng);

        let mut events = Vec::new();
        for trainer in order {
            for decision in self.turn_decisions.remove(&trainer).unwrap_or_default() {
                self.resolve_decision(decision, &mut events, &mut rng);
            }
        }

        for trainer in [PLAYER, RIVAL] {
            let standing = self
                .mons
                .iter()
                .any(|m| m.id.trainer == trainer && !m.fainted());
            if !standing {
                let winner = if trainer == PLAYER { RIVAL } else { PLAYER };
                events.push(Event::BattleResult {
                    outcome: BattleOutcome::Victory { winner },
                    text: if winner == PLAYER {
                        "You won the battle!".to_string()
                    } else {
                        "You lost the battle...".to_string()
                    },
                });
                return (events, Next::Over);
            }
        }

        let empty: Vec<TrainerId> = [PLAYER, RIVAL]
            .into_iter()
            .filter(|&t| self.active(t).is_none())
            .collect();
        if empty.is_empty() {
            (events, Next::Turn)
        } else {
            (events, Next::Replacements(empty))
        }
    }

    fn resolve_decision(&mut self, decision: TurnDecision, events: &mut Vec<Event>, rng: &mut impl Rng) {
        let Some(attacker) = self
            .mons
            .iter()
            .find(|m| m.id == decision.combatant && m.active)
            .cloned()
        else {
            return;
        };

        match decision.decision {
            Decision::Move { choice, .. } => {
                let move_name = match choice {
                    MoveRef::Slot(slot) => MOVES.get(slot).map(|m| m.1).unwrap_or("Struggle"),
                    MoveRef::Struggle => "Struggle",
                };
                let foe = if attacker.id.trainer == PLAYER { RIVAL } else { PLAYER };
                let Some(target) = self.active(foe).map(|m| m.id) else {
                    return;
                };

                events.push(Event::MoveUsed {
                    combatant: attacker.id,
                    move_name: move_name.to_string(),
                    targets: TargetMask::of(lead_position(foe)),
                    text: format!("{} used {}!", attacker.name, move_name),
                });

                let damage = rng.gen_range(6..=14);
                if let Some(mon) = self.mon_mut(target) {
                    let old_hp = mon.hp;
                    mon.hp = mon.hp.saturating_sub(damage);
                    events.push(Event::HpChanged {
                        combatant: mon.id,
                        old_hp,
                        new_hp: mon.hp,
                        text: format!("{} took {} damage.", mon.name, old_hp - mon.hp),
                    });

                    if mon.fainted() {
                        mon.active = false;
                        events.push(Event::Faint {
                            combatant: mon.id,
                            position: lead_position(foe),
                        });
                        events.push(Event::Narration {
                            text: format!("{} fainted!", mon.name),
                        });
                    }
                }
            }
            Decision::Switch { replacement } => {
                let position = lead_position(attacker.id.trainer);
                if let Some(mon) = self.mon_mut(attacker.id) {
                    mon.active = false;
                }
                events.push(Event::SwitchOut {
                    combatant: attacker.id,
                    position,
                });
                if let Some(mon) = self.mon_mut(replacement) {
                    mon.active = true;
                    events.push(Event::SwitchIn {
                        combatant: mon.id,
                        position,
                        name: mon.name.to_string(),
                    });
                }
            }
            Decision::Item { item } => events.push(Event::Narration {
                text: format!("{} used {}.", attacker.name, item),
            }),
        }
    }
}

/// A two-trainer singles engine
struct Arena {
    state: Mutex<ArenaState>,
}

impl Arena {
    fn new() -> Self {
        let mons = vec![
            Mon::new(PLAYER, 0, "Pikachu"),
            Mon::new(PLAYER, 1, "Bulbasaur"),
            Mon::new(PLAYER, 2, "Squirtle"),
            Mon::new(RIVAL, 0, "Eevee"),
            Mon::new(RIVAL, 1, "Charmander"),
            Mon::new(RIVAL, 2, "Geodude"),
        ];
        Self {
            state: Mutex::new(ArenaState {
                mons,
                ..ArenaState::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ArenaState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Report the awaited phase once every trainer has submitted.
    /// Runs on whichever thread sees the last submission.
    fn report_when_ready(&self, events: &EventPublisher) -> Result<(), ChannelError> {
        let phase = {
            let mut state = self.lock();
            if state.waiting_on.is_empty() {
                state.next_phase.take()
            } else {
                None
            }
        };

        match phase {
            Some(phase) => events.notify_phase(phase),
            None => Ok(()),
        }
    }

    /// The lock is never held while publishing: the presentation thread
    /// submits through it while the publisher is parked.
    fn publish_all(events: &EventPublisher, script: Vec<Event>) -> Result<(), ChannelError> {
        script.into_iter().try_for_each(|event| events.publish(event))
    }

    fn request_turn(&self, events: &EventPublisher) -> Result<(), ChannelError> {
        let script = {
            let mut state = self.lock();
            state.await_submissions(vec![RIVAL, PLAYER], PhaseState::ReadyToRunTurn);
            vec![state.action_request(RIVAL), state.action_request(PLAYER)]
        };
        Self::publish_all(events, script)?;
        self.report_when_ready(events)
    }

    fn request_replacements(
        &self,
        trainers: Vec<TrainerId>,
        events: &EventPublisher,
    ) -> Result<(), ChannelError> {
        let script = {
            let mut state = self.lock();
            let script = trainers.iter().map(|&t| state.switch_request(t)).collect();
            state.await_submissions(trainers, PhaseState::ReadyToRunSwitches);
            script
        };
        Self::publish_all(events, script)?;
        self.report_when_ready(events)
    }
}

impl Simulation for Arena {
    fn format(&self) -> BattleFormat {
        BattleFormat::Single
    }

    fn begin(&self, events: &EventPublisher) -> Result<(), ChannelError> {
        let script = {
            let mut state = self.lock();
            let mut script = vec![Event::Narration {
                text: "Your rival wants to battle!".to_string(),
            }];
            for trainer in [RIVAL, PLAYER] {
                if let Some(mon) = state.mons.iter_mut().find(|m| m.id.trainer == trainer) {
                    mon.active = true;
                    script.push(Event::SwitchIn {
                        combatant: mon.id,
                        position: lead_position(trainer),
                        name: mon.name.to_string(),
                    });
                }
            }
            script
        };

        Self::publish_all(events, script)?;
        self.request_turn(events)
    }

    fn run_turn(&self, events: &EventPublisher) -> Result<(), ChannelError> {
        let (script, next) = self.lock().resolve_turn();
        Self::publish_all(events, script)?;

        match next {
            Next::Turn => self.request_turn(events),
            Next::Replacements(trainers) => self.request_replacements(trainers, events),
            Next::Over => events.notify_phase(PhaseState::Ended),
        }
    }

    fn run_switches(&self, events: &EventPublisher) -> Result<(), ChannelError> {
        let script = {
            let mut state = self.lock();
            let chosen: Vec<SwitchDecision> = state
                .replacements
                .drain()
                .flat_map(|(_, decisions)| decisions)
                .collect();

            let mut script = Vec::new();
            for decision in chosen {
                if let Some(mon) = state.mon_mut(decision.replacement) {
                    mon.active = true;
                    script.push(Event::SwitchIn {
                        combatant: mon.id,
                        position: decision.position,
                        name: mon.name.to_string(),
                    });
                }
            }
            script
        };

        Self::publish_all(events, script)?;
        self.request_turn(events)
    }

    fn run_ai_decision(&self, trainer: TrainerId, events: &EventPublisher) -> Result<(), ChannelError> {
        {
            let mut state = self.lock();
            if state.next_phase == Some(PhaseState::ReadyToRunSwitches) {
                let pick = state
                    .party(trainer)
                    .into_iter()
                    .find(|m| m.can_enter())
                    .map(|m| SwitchDecision {
                        replacement: m.id,
                        position: lead_position(trainer),
                    });
                state.replacements.insert(trainer, pick.into_iter().collect());
            } else if let Some(mon) = state.active(trainer) {
                let slot = rand::thread_rng().gen_range(0..MOVES.len());
                let decision = TurnDecision {
                    combatant: mon.id,
                    decision: Decision::Move {
                        choice: MoveRef::Slot(slot),
                        targets: TargetMask::of(lead_position(PLAYER)),
                    },
                };
                state.turn_decisions.insert(trainer, vec![decision]);
            }
            state.waiting_on.retain(|&t| t != trainer);
        }

        self.report_when_ready(events)
    }

    fn submit_turn_decisions(&self, trainer: TrainerId, decisions: Vec<TurnDecision>) {
        let mut state = self.lock();
        state.turn_decisions.insert(trainer, decisions);
        state.waiting_on.retain(|&t| t != trainer);
    }

    fn submit_switch_decisions(&self, trainer: TrainerId, decisions: Vec<SwitchDecision>) {
        let mut state = self.lock();
        state.replacements.insert(trainer, decisions);
        state.waiting_on.retain(|&t| t != trainer);
    }

    fn submit_flee(&self, trainer: TrainerId) {
        let mut state = self.lock();
        state.fled = Some(trainer);
        state.waiting_on.retain(|&t| t != trainer);
    }
}

/// Positions are drawn from the player's point of view
fn lead_position(trainer: TrainerId) -> FieldPosition {
    let side = if trainer == PLAYER { Side::Ally } else { Side::Foe };
    FieldPosition::new(side, Column::Center)
}

/// Prints everything to stdout
struct Console;

impl Presenter for Console {
    fn on_message(&mut self, text: &str) {
        println!("  {}", text);
    }

    fn on_field_changed(&mut self, changed: TargetMask, field: &TrackedField) {
        for position in changed.positions() {
            match field.occupant(position) {
                Some(mon) => println!("  [{}] {}", position, mon.display_name()),
                None => println!("  [{}] (empty)", position),
            }
        }
    }

    fn on_phase(&mut self, phase: PhaseState) {
        if phase == PhaseState::ReadyToRunTurn {
            println!("--- turn ---");
        }
    }
}

fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = SessionConfig::default()
        .with_message_auto_advance(Some(Duration::from_millis(250)))
        .with_thread_name_prefix("arena");
    let mut session = BattleSession::new(config, Arc::new(Arena::new()), Console);
    session.start().context("Failed to start the battle")?;

    let mut rng = rand::thread_rng();
    while !session.is_ended() {
        session.tick(Instant::now())?;

        match session.state() {
            InputState::Actions(_) => {
                let options = session.options().context("No combatant to decide for")?;
                let usable: Vec<usize> = options
                    .moves
                    .iter()
                    .filter(|m| m.availability.is_enabled())
                    .map(|m| m.slot)
                    .collect();
                let slot = *usable.choose(&mut rng).context("No usable move")?;
                session.choose_move(slot, None)?;
            }
            InputState::Switches(builder) => {
                let full = builder.is_full();
                let pick = builder
                    .options()
                    .into_iter()
                    .find(|c| c.availability.is_enabled())
                    .map(|c| c.combatant);

                match pick {
                    Some(replacement) if !full => {
                        session.choose_replacement(replacement, None)?;
                    }
                    _ => session.submit_replacements()?,
                }
            }
            _ => {}
        }

        thread::sleep(Duration::from_millis(5));
    }

    match session.field().outcome {
        Some(outcome) => println!("Battle over: {:?}", outcome),
        None => println!("Battle over"),
    }
    Ok(())
}
