use baton_battle::{SwitchInBuilder, TrackedField, TurnActionBuilder};
use baton_protocol::{Event, PhaseState, TargetMask};

/// Trait for the UI layer driven by a [`BattleSession`](crate::BattleSession).
///
/// All methods have default no-op implementations, so you only need to
/// implement the ones you care about. Every call happens on the presentation
/// thread, inside [`BattleSession::tick`](crate::BattleSession::tick) or one of
/// the input methods.
///
/// # Example
///
/// ```ignore
/// struct Log;
///
/// impl Presenter for Log {
///     fn on_message(&mut self, text: &str) {
///         println!("{}", text);
///     }
/// }
/// ```
pub trait Presenter {
    /// Custom text for a message-bearing event.
    /// `None` falls back to the simulation's default text; an empty string
    /// skips the message.
    fn message_override(&mut self, event: &Event) -> Option<String> {
        let _ = event;
        None
    }

    /// A message is now shown and holds the simulation until it is advanced
    fn on_message(&mut self, text: &str) {
        let _ = text;
    }

    /// Display state changed at the positions in `changed`
    fn on_field_changed(&mut self, changed: TargetMask, field: &TrackedField) {
        let _ = (changed, field);
    }

    /// The turn builder is waiting for a decision (called again after every
    /// accepted push or undo)
    fn on_turn_input(&mut self, builder: &TurnActionBuilder) {
        let _ = builder;
    }

    /// The switch-in builder is waiting for replacements
    fn on_switch_input(&mut self, builder: &SwitchInBuilder) {
        let _ = builder;
    }

    fn on_phase(&mut self, phase: PhaseState) {
        let _ = phase;
    }
}

/// Presents nothing
impl Presenter for () {}
