//! # Event bus for broadcasting runtime events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that lets the
//! discovery loop and every device worker report what they are doing without
//! ever waiting on whoever renders those reports.
//!
//! ## Architecture
//! ```text
//! Publishers (many):                     Subscriber (one):
//!   DiscoveryLoop ──┐
//!   Worker A      ──┼──────► Bus ───────► subscriber_listener ────► SubscriberSet
//!   Worker B      ──┤  (broadcast chan)     (in Supervisor)
//!   Supervisor    ──┘
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks; it calls `broadcast::Sender::send`.
//! - **Bounded capacity**: a single ring buffer stores recent events for all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` oldest items.
//! - **No persistence**: events are lost if there are no active subscribers at send time.
//!
//! Events are diagnostics only. Log records never travel over the bus; they
//! go straight to the [`OutputSink`](crate::OutputSink).

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for runtime events.
///
/// ### Properties
/// - **Non-blocking**: `publish()` returns immediately.
/// - **Fire-and-forget**: no delivery or durability guarantees.
/// - **Cloneable**: cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active subscribers.
    ///
    /// If there are no receivers, the event is dropped.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver that observes events sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn receivers_see_events_published_after_subscribing() {
        let bus = Bus::new(8);
        bus.publish(Event::new(EventKind::NoDevices));

        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::ShutdownRequested).with_reason("late"));

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::ShutdownRequested);
        assert_eq!(ev.reason.as_deref(), Some("late"));
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let bus = Bus::new(0);
        let _rx = bus.subscribe();
        bus.publish(Event::new(EventKind::NoDevices));
    }
}
