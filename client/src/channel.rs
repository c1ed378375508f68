//! Single-slot event handoff between simulation and presentation threads
//!
//! The simulation side calls [`EventPublisher::publish`], which parks the
//! calling thread until the presentation side has taken the event and called
//! [`EventReceiver::resume`]. Phase notifications travel on a separate queue
//! and never park anyone.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use baton_protocol::{Event, PhaseState};
use thiserror::Error;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, oneshot};
use tracing::{trace, warn};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelError {
    #[error("An event was published while another was still waiting for resume")]
    Overlap,

    #[error("Resume called with no event pending")]
    NothingPending,

    #[error("Event channel closed")]
    Closed,
}

/// An event and the gate its publisher is parked on
struct Parcel {
    event: Event,
    gate: oneshot::Sender<()>,
}

/// Create a connected publisher/receiver pair
pub fn event_channel() -> (EventPublisher, EventReceiver) {
    let (events_tx, events_rx) = mpsc::channel(1);
    let (phases_tx, phases_rx) = mpsc::unbounded_channel();
    let in_flight = Arc::new(AtomicBool::new(false));
    let overlapped = Arc::new(AtomicBool::new(false));

    let publisher = EventPublisher {
        events: events_tx,
        phases: phases_tx,
        in_flight: Arc::clone(&in_flight),
        overlapped: Arc::clone(&overlapped),
    };
    let receiver = EventReceiver {
        events: events_rx,
        phases: phases_rx,
        in_flight,
        overlapped,
        pending: None,
    };

    (publisher, receiver)
}

/// Simulation-side half of the channel.
///
/// Cloneable and `Send`; every simulation thread gets its own clone.
#[derive(Clone)]
pub struct EventPublisher {
    events: mpsc::Sender<Parcel>,
    phases: mpsc::UnboundedSender<PhaseState>,
    in_flight: Arc<AtomicBool>,
    overlapped: Arc<AtomicBool>,
}

impl EventPublisher {
    /// Hand `event` to the presentation thread and block until it is resumed.
    ///
    /// Must be called from a plain thread, never from inside an async
    /// runtime. An overlapping publish is also reported to the receiver,
    /// which fails every later poll with [`ChannelError::Overlap`].
    pub fn publish(&self, event: Event) -> Result<(), ChannelError> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            self.overlapped.store(true, Ordering::Release);
            warn!(event = event.name(), "Event published while another is pending");
            return Err(ChannelError::Overlap);
        }

        let name = event.name();
        let (gate, parked) = oneshot::channel();
        if self.events.blocking_send(Parcel { event, gate }).is_err() {
            self.in_flight.store(false, Ordering::Release);
            return Err(ChannelError::Closed);
        }

        trace!(event = name, "Parked until resume");
        parked.blocking_recv().map_err(|_| {
            self.in_flight.store(false, Ordering::Release);
            ChannelError::Closed
        })
    }

    /// Report a finished phase. Never blocks.
    pub fn notify_phase(&self, phase: PhaseState) -> Result<(), ChannelError> {
        self.phases.send(phase).map_err(|_| ChannelError::Closed)
    }

    /// Whether the presentation side has gone away
    pub fn is_closed(&self) -> bool {
        self.events.is_closed()
    }
}

/// Presentation-side half of the channel.
///
/// Closing it (or dropping it) wakes any parked publisher with
/// [`ChannelError::Closed`].
pub struct EventReceiver {
    events: mpsc::Receiver<Parcel>,
    phases: mpsc::UnboundedReceiver<PhaseState>,
    in_flight: Arc<AtomicBool>,
    overlapped: Arc<AtomicBool>,
    pending: Option<oneshot::Sender<()>>,
}

impl EventReceiver {
    /// Take the published event, if there is one. Never blocks.
    ///
    /// The event stays pending until [`resume`](Self::resume) is called;
    /// nothing new can arrive in the meantime.
    pub fn take_pending(&mut self) -> Result<Option<Event>, ChannelError> {
        self.ensure_ordered()?;
        if self.pending.is_some() {
            return Ok(None);
        }

        match self.events.try_recv() {
            Ok(Parcel { event, gate }) => {
                self.pending = Some(gate);
                Ok(Some(event))
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(ChannelError::Closed),
        }
    }

    /// Whether an event has been taken but not resumed
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Release the publisher parked on the pending event
    pub fn resume(&mut self) -> Result<(), ChannelError> {
        let gate = self.pending.take().ok_or(ChannelError::NothingPending)?;
        self.in_flight.store(false, Ordering::Release);
        gate.send(()).map_err(|_| ChannelError::Closed)
    }

    /// Next phase notification, if any. Never blocks.
    pub fn poll_phase(&mut self) -> Result<Option<PhaseState>, ChannelError> {
        self.ensure_ordered()?;
        Ok(self.phases.try_recv().ok())
    }

    /// Fails once any publisher has broken the one-event-at-a-time rule
    pub fn ensure_ordered(&self) -> Result<(), ChannelError> {
        if self.overlapped.load(Ordering::Acquire) {
            Err(ChannelError::Overlap)
        } else {
            Ok(())
        }
    }

    /// Stop accepting events and wake every parked publisher
    pub fn close(&mut self) {
        self.events.close();
        self.phases.close();
        self.pending = None;
        // Gates still sitting in the buffer belong to parked publishers too
        while let Ok(parcel) = self.events.try_recv() {
            drop(parcel.gate);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.events.is_closed()
    }
}

impl Drop for EventReceiver {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::{Duration, Instant};

    use super::*;

    fn narration(text: &str) -> Event {
        Event::Narration {
            text: text.to_string(),
        }
    }

    /// Poll until the publisher thread's event shows up
    fn wait_for_event(receiver: &mut EventReceiver) -> Event {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(event) = receiver.take_pending().unwrap() {
                return event;
            }
            assert!(Instant::now() < deadline, "timed out waiting for event");
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_publish_parks_until_resume() {
        let (publisher, mut receiver) = event_channel();

        let sim = thread::spawn(move || publisher.publish(narration("A wild battle!")));

        let event = wait_for_event(&mut receiver);
        assert_eq!(event, narration("A wild battle!"));
        assert!(receiver.has_pending());

        // Still parked
        thread::sleep(Duration::from_millis(20));
        assert!(!sim.is_finished());

        receiver.resume().unwrap();
        assert_eq!(sim.join().unwrap(), Ok(()));
        assert!(!receiver.has_pending());
    }

    #[test]
    fn test_events_arrive_in_order() {
        let (publisher, mut receiver) = event_channel();

        let sim = thread::spawn(move || -> Result<(), ChannelError> {
            publisher.publish(narration("one"))?;
            publisher.publish(narration("two"))?;
            Ok(())
        });

        assert_eq!(wait_for_event(&mut receiver), narration("one"));
        receiver.resume().unwrap();
        assert_eq!(wait_for_event(&mut receiver), narration("two"));
        receiver.resume().unwrap();

        assert_eq!(sim.join().unwrap(), Ok(()));
    }

    #[test]
    fn test_resume_without_pending() {
        let (_publisher, mut receiver) = event_channel();
        assert_eq!(receiver.resume(), Err(ChannelError::NothingPending));
    }

    #[test]
    fn test_double_resume() {
        let (publisher, mut receiver) = event_channel();
        let sim = thread::spawn(move || publisher.publish(narration("hi")));

        wait_for_event(&mut receiver);
        receiver.resume().unwrap();
        assert_eq!(receiver.resume(), Err(ChannelError::NothingPending));
        assert_eq!(sim.join().unwrap(), Ok(()));
    }

    #[test]
    fn test_overlapping_publish() {
        let (publisher, mut receiver) = event_channel();
        let second = publisher.clone();

        let sim = thread::spawn(move || publisher.publish(narration("first")));
        wait_for_event(&mut receiver);

        assert_eq!(second.publish(narration("second")), Err(ChannelError::Overlap));
        assert_eq!(receiver.ensure_ordered(), Err(ChannelError::Overlap));
        assert_eq!(receiver.poll_phase(), Err(ChannelError::Overlap));
        assert_eq!(receiver.take_pending(), Err(ChannelError::Overlap));

        receiver.resume().unwrap();
        assert_eq!(sim.join().unwrap(), Ok(()));
    }

    #[test]
    fn test_close_wakes_parked_publisher() {
        let (publisher, mut receiver) = event_channel();
        let after = publisher.clone();

        let sim = thread::spawn(move || publisher.publish(narration("stuck")));
        wait_for_event(&mut receiver);

        receiver.close();
        assert_eq!(sim.join().unwrap(), Err(ChannelError::Closed));
        assert!(after.is_closed());
        assert_eq!(after.publish(narration("late")), Err(ChannelError::Closed));
    }

    #[test]
    fn test_drop_wakes_buffered_publisher() {
        let (publisher, receiver) = event_channel();

        let sim = thread::spawn(move || publisher.publish(narration("never taken")));
        thread::sleep(Duration::from_millis(20));
        drop(receiver);

        assert_eq!(sim.join().unwrap(), Err(ChannelError::Closed));
    }

    #[test]
    fn test_phase_notifications() {
        let (publisher, mut receiver) = event_channel();
        assert_eq!(receiver.poll_phase(), Ok(None));

        publisher.notify_phase(PhaseState::ReadyToRunTurn).unwrap();
        publisher.notify_phase(PhaseState::Ended).unwrap();

        assert_eq!(receiver.poll_phase(), Ok(Some(PhaseState::ReadyToRunTurn)));
        assert_eq!(receiver.poll_phase(), Ok(Some(PhaseState::Ended)));
        assert_eq!(receiver.poll_phase(), Ok(None));
    }
}
