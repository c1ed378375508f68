//! Presentation-side orchestration for a threaded battle simulation.
//!
//! The simulation runs on its own threads and publishes one event at a time,
//! parking until the presentation thread lets it continue. This crate owns
//! that handoff:
//!
//! - [`event_channel`] - the single-slot event handoff and phase notifications
//! - [`SimulationBridge`] - starts each simulation phase on a fresh thread
//! - [`Dispatcher`] - decides, per event, whether to resume or wait
//! - [`BattleSession`] - ties them together behind a per-frame [`tick`](BattleSession::tick)
//!
//! # Example
//!
//! ```ignore
//! let mut session = BattleSession::new(SessionConfig::default(), Arc::new(engine), ui);
//! session.start()?;
//!
//! while !session.is_ended() {
//!     session.tick(Instant::now())?;
//!     if session.turn_builder().is_some() {
//!         session.choose_move(0, None)?;
//!     }
//! }
//! ```

mod bridge;
mod channel;
mod config;
mod dispatcher;
mod error;
mod message;
mod presenter;
mod session;
mod simulation;

pub use bridge::SimulationBridge;
pub use channel::{ChannelError, EventPublisher, EventReceiver, event_channel};
pub use config::SessionConfig;
pub use dispatcher::{Dispatcher, Disposition, PendingDecision};
pub use error::SessionError;
pub use message::MessageDisplay;
pub use presenter::Presenter;
pub use session::{BattleSession, InputState};
pub use simulation::Simulation;

pub use baton_battle::{
    ActionOptions, Availability, BuilderError, DisabledReason, SwitchInBuilder, TargetTable,
    TrackedField, TurnActionBuilder, TurnProgress,
};
pub use baton_protocol::{
    BattleFormat, CombatantId, Decision, Event, FieldPosition, PhaseState, Submission, TrainerId,
};
