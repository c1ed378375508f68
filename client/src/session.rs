//! BattleSession - per-battle orchestration on the presentation thread

use std::sync::Arc;
use std::time::Instant;

use baton_battle::{
    ActionOptions, BuilderError, SwitchInBuilder, TargetTable, TrackedField, TurnActionBuilder,
    TurnProgress,
};
use baton_protocol::{
    BattleFormat, CombatantId, Decision, Event, FieldPosition, MoveRef, PhaseState, Submission,
};
use tracing::{debug, error, info, warn};

use crate::bridge::SimulationBridge;
use crate::channel::{EventReceiver, event_channel};
use crate::config::SessionConfig;
use crate::dispatcher::{Dispatcher, Disposition, PendingDecision};
use crate::error::SessionError;
use crate::message::MessageDisplay;
use crate::presenter::Presenter;
use crate::simulation::Simulation;

/// What the presentation thread is waiting on
#[derive(Debug)]
pub enum InputState {
    /// Polling for the next event
    Idle,
    /// A message holds the simulation
    Message(MessageDisplay),
    /// The player is choosing this turn's actions
    Actions(TurnActionBuilder),
    /// The player is choosing replacements
    Switches(SwitchInBuilder),
    Ended,
    Aborted,
}

/// One battle between a [`Simulation`] and a [`Presenter`].
///
/// Owns the receiving half of the event channel, so dropping the session
/// stops any simulation thread still waiting on it. Call
/// [`tick`](Self::tick) once per frame.
pub struct BattleSession<S: Simulation, P: Presenter> {
    config: SessionConfig,
    events: EventReceiver,
    bridge: SimulationBridge<S>,
    dispatcher: Dispatcher,
    field: TrackedField,
    presenter: P,
    state: InputState,
}

impl<S: Simulation, P: Presenter> BattleSession<S, P> {
    pub fn new(config: SessionConfig, sim: Arc<S>, presenter: P) -> Self {
        let (publisher, events) = event_channel();
        let format = sim.format();
        let bridge = SimulationBridge::new(sim, publisher, config.thread_name_prefix.clone());

        Self {
            dispatcher: Dispatcher::new(format, config.local_trainer),
            field: TrackedField::new(format, config.local_trainer),
            config,
            events,
            bridge,
            presenter,
            state: InputState::Idle,
        }
    }

    /// Start the simulation's opening phase
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.ensure_live()?;
        info!(format = %self.field.format, "Battle starting");
        let result = self.bridge.begin().map_err(SessionError::from);
        self.check(result)
    }

    /// Drive the session: handle phase notifications, expire a timed-out
    /// message, and dispatch at most one pending event.
    pub fn tick(&mut self, now: Instant) -> Result<(), SessionError> {
        if matches!(self.state, InputState::Ended) {
            return Ok(());
        }
        self.ensure_live()?;

        let result = self.tick_inner(now);
        self.check(result)
    }

    fn tick_inner(&mut self, now: Instant) -> Result<(), SessionError> {
        while let Some(phase) = self.events.poll_phase()? {
            info!(?phase, "Phase finished");
            self.presenter.on_phase(phase);

            match phase {
                PhaseState::ReadyToRunTurn => self.bridge.run_turn()?,
                PhaseState::ReadyToRunSwitches => self.bridge.run_switches()?,
                PhaseState::Ended => {
                    info!(outcome = ?self.field.outcome, "Battle ended");
                    self.state = InputState::Ended;
                    return Ok(());
                }
            }
        }

        let expired = matches!(&self.state, InputState::Message(message) if message.is_expired(now));
        if expired {
            debug!("Message auto-advanced");
            self.release_message()?;
        }

        if matches!(self.state, InputState::Idle)
            && let Some(event) = self.events.take_pending()?
        {
            self.handle_event(event, now)?;
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event, now: Instant) -> Result<(), SessionError> {
        let disposition =
            self.dispatcher
                .dispatch(&event, &mut self.field, &self.bridge, &mut self.presenter)?;

        match disposition {
            Disposition::Resume => self.events.resume()?,
            Disposition::AwaitMessage(text) => {
                self.presenter.on_message(&text);
                self.state = InputState::Message(MessageDisplay::new(
                    text,
                    now,
                    self.config.message_auto_advance,
                ));
            }
            Disposition::AwaitDecision(PendingDecision::Actions(builder)) => {
                // Every combatant may already be forced
                if builder.is_complete() {
                    self.submit_turn(builder)?;
                } else {
                    self.presenter.on_turn_input(&builder);
                    self.state = InputState::Actions(builder);
                }
            }
            Disposition::AwaitDecision(PendingDecision::Switches(builder)) => {
                if builder.required() == 0 {
                    self.submit_switches(builder)?;
                } else {
                    self.presenter.on_switch_input(&builder);
                    self.state = InputState::Switches(builder);
                }
            }
        }

        Ok(())
    }

    // === Messages ===

    /// The reader has finished the current message
    pub fn advance_message(&mut self) -> Result<(), SessionError> {
        self.ensure_live()?;
        if !matches!(self.state, InputState::Message(_)) {
            return Err(SessionError::NoMessage);
        }

        let result = self.release_message();
        self.check(result)
    }

    fn release_message(&mut self) -> Result<(), SessionError> {
        self.state = InputState::Idle;
        self.events.resume()?;
        Ok(())
    }

    // === Turn actions ===

    /// Target table for the current combatant's move in `slot`
    pub fn target_table(&self, slot: usize) -> Result<TargetTable, SessionError> {
        self.ensure_live()?;
        match &self.state {
            InputState::Actions(builder) => Ok(builder.target_table(slot)?),
            _ => Err(SessionError::NoPendingDecision),
        }
    }

    /// Use the move in `slot`, aimed at `target` or at the default selection
    pub fn choose_move(
        &mut self,
        slot: usize,
        target: Option<FieldPosition>,
    ) -> Result<TurnProgress, SessionError> {
        let table = self.target_table(slot)?;
        let targets = match target {
            Some(position) => table
                .mask_for(position)
                .ok_or(SessionError::TargetUnavailable(position))?,
            None => table
                .default_mask()
                .ok_or(BuilderError::NoLegalTarget(slot))?,
        };

        self.push_decision(Decision::Move {
            choice: MoveRef::Slot(slot),
            targets,
        })
    }

    pub fn choose_item(&mut self, item: impl Into<String>) -> Result<TurnProgress, SessionError> {
        self.push_decision(Decision::Item { item: item.into() })
    }

    pub fn choose_switch(&mut self, replacement: CombatantId) -> Result<TurnProgress, SessionError> {
        self.push_decision(Decision::Switch { replacement })
    }

    /// Record a decision for the current combatant, submitting the turn once
    /// every combatant has one
    pub fn push_decision(&mut self, decision: Decision) -> Result<TurnProgress, SessionError> {
        self.ensure_live()?;

        let progress = {
            let InputState::Actions(builder) = &mut self.state else {
                return Err(SessionError::NoPendingDecision);
            };
            builder
                .push(decision)
                .inspect_err(|e| warn!(error = %e, "Decision rejected"))?
        };

        match progress {
            TurnProgress::Complete => {
                let result = self.complete_turn();
                self.check(result)?;
            }
            TurnProgress::Awaiting(_) => {
                if let InputState::Actions(builder) = &self.state {
                    self.presenter.on_turn_input(builder);
                }
            }
        }

        Ok(progress)
    }

    /// Run from the battle instead of choosing actions
    pub fn flee(&mut self) -> Result<(), SessionError> {
        self.ensure_live()?;

        let trainer = match &self.state {
            InputState::Actions(builder) if builder.request().can_flee => builder.trainer(),
            InputState::Actions(_) => return Err(SessionError::FleeNotAllowed),
            _ => return Err(SessionError::NoPendingDecision),
        };

        self.state = InputState::Idle;
        self.bridge.submit(Submission::Flee { trainer });
        let result = self.events.resume().map_err(SessionError::from);
        self.check(result)
    }

    fn complete_turn(&mut self) -> Result<(), SessionError> {
        match std::mem::replace(&mut self.state, InputState::Idle) {
            InputState::Actions(builder) => self.submit_turn(builder),
            other => {
                self.state = other;
                Err(SessionError::NoPendingDecision)
            }
        }
    }

    fn submit_turn(&mut self, builder: TurnActionBuilder) -> Result<(), SessionError> {
        let submission = builder.finish()?.into_submission();
        self.state = InputState::Idle;
        self.bridge.submit(submission);
        self.events.resume()?;
        Ok(())
    }

    // === Replacements ===

    /// Pick a replacement for `position`, or for the next open position.
    /// Returns how many replacements are still required.
    pub fn choose_replacement(
        &mut self,
        replacement: CombatantId,
        position: Option<FieldPosition>,
    ) -> Result<usize, SessionError> {
        self.ensure_live()?;

        let InputState::Switches(builder) = &mut self.state else {
            return Err(SessionError::NoPendingDecision);
        };

        let position = position
            .or_else(|| builder.next_open_position())
            .ok_or(BuilderError::Full(builder.required()))?;

        let remaining = builder
            .push(replacement, position)
            .inspect_err(|e| warn!(error = %e, "Replacement rejected"))?;
        self.presenter.on_switch_input(builder);

        Ok(remaining)
    }

    /// Send the chosen replacements, however many there are
    pub fn submit_replacements(&mut self) -> Result<(), SessionError> {
        self.ensure_live()?;

        match std::mem::replace(&mut self.state, InputState::Idle) {
            InputState::Switches(builder) => {
                let result = self.submit_switches(builder);
                self.check(result)
            }
            other => {
                self.state = other;
                Err(SessionError::NoPendingDecision)
            }
        }
    }

    fn submit_switches(&mut self, builder: SwitchInBuilder) -> Result<(), SessionError> {
        let submission = builder.finish().into_submission();
        self.state = InputState::Idle;
        self.bridge.submit(submission);
        self.events.resume()?;
        Ok(())
    }

    // === Shared input ===

    /// Take back the last decision or replacement
    pub fn undo(&mut self) -> Result<(), SessionError> {
        self.ensure_live()?;

        match &mut self.state {
            InputState::Actions(builder) => {
                builder.pop()?;
                self.presenter.on_turn_input(builder);
            }
            InputState::Switches(builder) => {
                builder.pop()?;
                self.presenter.on_switch_input(builder);
            }
            _ => return Err(SessionError::NoPendingDecision),
        }

        Ok(())
    }

    /// Stop the battle. Parked simulation threads wake and exit.
    pub fn abort(&mut self) {
        if matches!(self.state, InputState::Aborted) {
            return;
        }
        warn!("Battle session aborted");
        self.state = InputState::Aborted;
        self.events.close();
    }

    // === Accessors ===

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn format(&self) -> BattleFormat {
        self.field.format
    }

    pub fn field(&self) -> &TrackedField {
        &self.field
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn message(&self) -> Option<&MessageDisplay> {
        match &self.state {
            InputState::Message(message) => Some(message),
            _ => None,
        }
    }

    pub fn turn_builder(&self) -> Option<&TurnActionBuilder> {
        match &self.state {
            InputState::Actions(builder) => Some(builder),
            _ => None,
        }
    }

    pub fn switch_builder(&self) -> Option<&SwitchInBuilder> {
        match &self.state {
            InputState::Switches(builder) => Some(builder),
            _ => None,
        }
    }

    /// Choices for the combatant currently deciding
    pub fn options(&self) -> Option<ActionOptions> {
        self.turn_builder().and_then(|builder| builder.options())
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.state, InputState::Ended)
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self.state, InputState::Aborted)
    }

    fn ensure_live(&self) -> Result<(), SessionError> {
        match self.state {
            InputState::Aborted => Err(SessionError::Aborted),
            _ => Ok(()),
        }
    }

    /// Abort on fatal errors; everything else leaves the session as it was
    fn check<T>(&mut self, result: Result<T, SessionError>) -> Result<T, SessionError> {
        if let Err(e) = &result
            && e.is_fatal()
            && !matches!(self.state, InputState::Aborted)
        {
            error!(error = %e, "Fatal session error");
            self.state = InputState::Aborted;
            self.events.close();
        }
        result
    }
}
