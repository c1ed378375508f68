use std::time::{Duration, Instant};

/// A message holding the simulation until it has been read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDisplay {
    pub text: String,
    pub shown_at: Instant,
    pub auto_advance: Option<Duration>,
}

impl MessageDisplay {
    pub fn new(text: impl Into<String>, shown_at: Instant, auto_advance: Option<Duration>) -> Self {
        Self {
            text: text.into(),
            shown_at,
            auto_advance,
        }
    }

    /// Whether the auto-advance delay has elapsed at `now`
    pub fn is_expired(&self, now: Instant) -> bool {
        self.auto_advance
            .is_some_and(|delay| now.saturating_duration_since(self.shown_at) >= delay)
    }

    /// Time left before auto-advance, `None` if it never auto-advances
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.auto_advance
            .map(|delay| delay.saturating_sub(now.saturating_duration_since(self.shown_at)))
    }
}
