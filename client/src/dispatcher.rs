//! Per-event dispatch

use baton_battle::{SwitchInBuilder, TrackedField, TurnActionBuilder};
use baton_protocol::{BattleFormat, DecisionRequest, Event, TrainerId};
use tracing::{debug, info};

use crate::bridge::SimulationBridge;
use crate::error::SessionError;
use crate::presenter::Presenter;
use crate::simulation::Simulation;

/// A builder waiting for the local player; at most one exists at a time
#[derive(Debug, Clone)]
pub enum PendingDecision {
    Actions(TurnActionBuilder),
    Switches(SwitchInBuilder),
}

/// What to do with the simulation thread after an event
#[derive(Debug, Clone)]
pub enum Disposition {
    /// Release it now
    Resume,
    /// Keep it parked until the player submits
    AwaitDecision(PendingDecision),
    /// Keep it parked until the message has been read
    AwaitMessage(String),
}

/// Turns each event into bookkeeping plus exactly one [`Disposition`]
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    format: BattleFormat,
    local_trainer: TrainerId,
}

impl Dispatcher {
    pub fn new(format: BattleFormat, local_trainer: TrainerId) -> Self {
        Self {
            format,
            local_trainer,
        }
    }

    pub fn local_trainer(&self) -> TrainerId {
        self.local_trainer
    }

    pub fn dispatch<S: Simulation, P: Presenter>(
        &self,
        event: &Event,
        field: &mut TrackedField,
        bridge: &SimulationBridge<S>,
        presenter: &mut P,
    ) -> Result<Disposition, SessionError> {
        debug!(event = event.name(), "Dispatching event");

        match event {
            Event::TempLock { .. }
            | Event::TempUnlock { .. }
            | Event::PpChanged { .. }
            | Event::Illusion { .. }
            | Event::IllusionEnded { .. }
            | Event::Transform { .. }
            | Event::Friendship { .. } => {
                apply(event, field, presenter);
                Ok(Disposition::Resume)
            }

            Event::Request(request) => self.dispatch_request(request, bridge),

            Event::AutoCenter { .. }
            | Event::SwitchIn { .. }
            | Event::SwitchOut { .. }
            | Event::Faint { .. }
            | Event::Appear { .. }
            | Event::Rotate { .. } => {
                apply(event, field, presenter);
                Ok(Disposition::Resume)
            }

            Event::FleeFailed { .. }
            | Event::BattleResult { .. }
            | Event::MoveUsed { .. }
            | Event::HpChanged { .. }
            | Event::StatusChanged { .. }
            | Event::Narration { .. } => {
                apply(event, field, presenter);

                let text = presenter
                    .message_override(event)
                    .or_else(|| event.default_text().map(str::to_string))
                    .unwrap_or_default();

                if text.is_empty() {
                    Ok(Disposition::Resume)
                } else {
                    Ok(Disposition::AwaitMessage(text))
                }
            }
        }
    }

    fn dispatch_request<S: Simulation>(
        &self,
        request: &DecisionRequest,
        bridge: &SimulationBridge<S>,
    ) -> Result<Disposition, SessionError> {
        let trainer = request.trainer();
        if trainer != self.local_trainer {
            info!(%trainer, "Handing decision to AI");
            bridge.run_ai_decision(trainer)?;
            return Ok(Disposition::Resume);
        }

        let pending = match request {
            DecisionRequest::Actions(actions) => {
                PendingDecision::Actions(TurnActionBuilder::new(self.format, actions.clone()))
            }
            DecisionRequest::Switches(switches) => {
                PendingDecision::Switches(SwitchInBuilder::new(self.format, switches.clone()))
            }
        };

        Ok(Disposition::AwaitDecision(pending))
    }
}

fn apply<P: Presenter>(event: &Event, field: &mut TrackedField, presenter: &mut P) {
    let changed = field.update(event);
    if !changed.is_empty() {
        presenter.on_field_changed(changed, field);
    }
}
