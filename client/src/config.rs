use std::time::Duration;

use baton_protocol::TrainerId;

/// Per-battle session settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Trainer controlled by the player; requests for anyone else go to the AI
    pub local_trainer: TrainerId,

    /// How long a message stays up before the simulation continues on its
    /// own. `None` waits for the reader.
    pub message_auto_advance: Option<Duration>,

    /// Simulation threads are named `{prefix}-{phase}`
    pub thread_name_prefix: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            local_trainer: TrainerId(0),
            message_auto_advance: Some(Duration::from_secs(2)),
            thread_name_prefix: "baton-sim".to_string(),
        }
    }
}

impl SessionConfig {
    pub fn with_local_trainer(mut self, trainer: TrainerId) -> Self {
        self.local_trainer = trainer;
        self
    }

    pub fn with_message_auto_advance(mut self, delay: Option<Duration>) -> Self {
        self.message_auto_advance = delay;
        self
    }

    pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }
}
