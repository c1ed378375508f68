use std::io;
use std::sync::Arc;
use std::thread;

use baton_protocol::{BattleFormat, Submission, TrainerId};
use tracing::{debug, debug_span, error, info};

use crate::channel::{ChannelError, EventPublisher};
use crate::simulation::Simulation;

/// Starts simulation phases on their own threads.
///
/// Threads are named `{prefix}-{phase}` and detached; their progress is only
/// observed through the event channel.
pub struct SimulationBridge<S: Simulation> {
    sim: Arc<S>,
    events: EventPublisher,
    thread_name_prefix: String,
}

impl<S: Simulation> Clone for SimulationBridge<S> {
    fn clone(&self) -> Self {
        Self {
            sim: Arc::clone(&self.sim),
            events: self.events.clone(),
            thread_name_prefix: self.thread_name_prefix.clone(),
        }
    }
}

impl<S: Simulation> SimulationBridge<S> {
    pub fn new(sim: Arc<S>, events: EventPublisher, thread_name_prefix: impl Into<String>) -> Self {
        Self {
            sim,
            events,
            thread_name_prefix: thread_name_prefix.into(),
        }
    }

    pub fn format(&self) -> BattleFormat {
        self.sim.format()
    }

    pub fn simulation(&self) -> &Arc<S> {
        &self.sim
    }

    pub fn begin(&self) -> io::Result<()> {
        self.spawn("begin", |sim, events| sim.begin(events))
    }

    pub fn run_turn(&self) -> io::Result<()> {
        self.spawn("turn", |sim, events| sim.run_turn(events))
    }

    pub fn run_switches(&self) -> io::Result<()> {
        self.spawn("switches", |sim, events| sim.run_switches(events))
    }

    pub fn run_ai_decision(&self, trainer: TrainerId) -> io::Result<()> {
        self.spawn("ai", move |sim, events| sim.run_ai_decision(trainer, events))
    }

    /// Forward a submission to the simulation on the calling thread
    pub fn submit(&self, submission: Submission) {
        info!(trainer = %submission.trainer(), choice = %submission, "Submitting decisions");

        match submission {
            Submission::Turn { trainer, decisions } => {
                self.sim.submit_turn_decisions(trainer, decisions)
            }
            Submission::Switches { trainer, decisions } => {
                self.sim.submit_switch_decisions(trainer, decisions)
            }
            Submission::Flee { trainer } => self.sim.submit_flee(trainer),
        }
    }

    fn spawn<F>(&self, phase: &'static str, job: F) -> io::Result<()>
    where
        F: FnOnce(&S, &EventPublisher) -> Result<(), ChannelError> + Send + 'static,
    {
        let sim = Arc::clone(&self.sim);
        let events = self.events.clone();

        thread::Builder::new()
            .name(format!("{}-{}", self.thread_name_prefix, phase))
            .spawn(move || {
                let _span = debug_span!("simulation", phase).entered();
                match job(&sim, &events) {
                    Ok(()) => debug!("Phase finished"),
                    Err(ChannelError::Closed) => debug!("Event channel closed, phase stopped"),
                    Err(e) => error!(error = %e, "Phase failed"),
                }
            })?;

        Ok(())
    }
}
