use std::io;

use baton_battle::BuilderError;
use baton_protocol::FieldPosition;
use thiserror::Error;

use crate::channel::ChannelError;

/// Errors returned by [`BattleSession`](crate::BattleSession)
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Event channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Decision rejected: {0}")]
    Builder(#[from] BuilderError),

    #[error("Failed to spawn simulation thread: {0}")]
    Spawn(#[from] io::Error),

    #[error("No decision is being made")]
    NoPendingDecision,

    #[error("No message is being shown")]
    NoMessage,

    #[error("{0} cannot be targeted by this move")]
    TargetUnavailable(FieldPosition),

    #[error("Fleeing is not allowed")]
    FleeNotAllowed,

    #[error("Battle session was aborted")]
    Aborted,
}

impl SessionError {
    /// Whether the session can no longer continue after this error
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SessionError::Channel(_) | SessionError::Spawn(_) | SessionError::Aborted
        )
    }
}
