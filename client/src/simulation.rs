use baton_protocol::{BattleFormat, SwitchDecision, TrainerId, TurnDecision};

use crate::channel::{ChannelError, EventPublisher};

/// The battle engine, seen from the presentation side.
///
/// Phase methods run on threads spawned by
/// [`SimulationBridge`](crate::SimulationBridge), publish their events through
/// `events` (parking on each one) and report the end of the phase with
/// [`EventPublisher::notify_phase`]. Returning `Err(ChannelError::Closed)`
/// is the normal way to stop when the session goes away.
///
/// Submissions are fire-and-forget: the engine reports the outcome through
/// later events.
///
/// # Example
///
/// ```ignore
/// impl Simulation for Engine {
///     fn run_turn(&self, events: &EventPublisher) -> Result<(), ChannelError> {
///         for event in self.resolve_turn() {
///             events.publish(event)?;
///         }
///         events.notify_phase(PhaseState::ReadyToRunTurn)
///     }
///     // ...
/// }
/// ```
pub trait Simulation: Send + Sync + 'static {
    fn format(&self) -> BattleFormat;

    /// Opening phase: initial switch-ins and the first requests
    fn begin(&self, events: &EventPublisher) -> Result<(), ChannelError>;

    fn run_turn(&self, events: &EventPublisher) -> Result<(), ChannelError>;

    fn run_switches(&self, events: &EventPublisher) -> Result<(), ChannelError>;

    /// Decide for a trainer the local player does not control
    fn run_ai_decision(
        &self,
        trainer: TrainerId,
        events: &EventPublisher,
    ) -> Result<(), ChannelError>;

    fn submit_turn_decisions(&self, trainer: TrainerId, decisions: Vec<TurnDecision>);

    fn submit_switch_decisions(&self, trainer: TrainerId, decisions: Vec<SwitchDecision>);

    fn submit_flee(&self, trainer: TrainerId);
}
