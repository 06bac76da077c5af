//! Fan-out of engine events to subscribers

use crossbeam::channel::{unbounded, Receiver, Sender};
use flight_seats_core::EngineEvent;
use parking_lot::RwLock;

/// List of subscriber channels
///
/// Channels are unbounded, so publishing never blocks. Publishers on
/// different flights share the list through read guards; only subscribing
/// and pruning a dropped receiver take the write guard.
#[derive(Default)]
pub struct EventFeed {
    subscribers: RwLock<Vec<Sender<EngineEvent>>>,
}

impl EventFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new subscription receiving every event published from now on
    pub fn subscribe(&self) -> Receiver<EngineEvent> {
        let (sender, receiver) = unbounded();
        self.subscribers.write().push(sender);
        receiver
    }

    /// Send `event` to all subscribers
    pub fn publish(&self, event: &EngineEvent) {
        let dropped: Vec<_> = self
            .subscribers
            .read()
            .iter()
            .filter(|subscriber| subscriber.send(event.clone()).is_err())
            .cloned()
            .collect();
        if !dropped.is_empty() {
            self.subscribers
                .write()
                .retain(|subscriber| !dropped.iter().any(|d| d.same_channel(subscriber)));
        }
    }
}

#[cfg(test)]
mod tests {
    use flight_seats_core::{FareClass, FlightNumber, PassengerId};

    use super::*;

    fn event(passenger: u64) -> EngineEvent {
        EngineEvent::LeftWaitlist {
            passenger_id: PassengerId(passenger),
            flight_number: FlightNumber(100),
            fare_class: FareClass::Economy,
        }
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let feed = EventFeed::new();
        let kept = feed.subscribe();
        drop(feed.subscribe());

        feed.publish(&event(1));
        assert_eq!(feed.subscribers.read().len(), 1);
        feed.publish(&event(2));

        let received: Vec<_> = kept.try_iter().collect();
        assert_eq!(received, [event(1), event(2)]);
    }

    #[test]
    fn publishers_share_the_subscriber_list() {
        let feed = EventFeed::new();
        let receiver = feed.subscribe();

        // another flight publishing at the same time holds a read guard too
        let other = feed.subscribers.read();
        feed.publish(&event(1));
        drop(other);

        assert_eq!(receiver.try_recv(), Ok(event(1)));
    }
}
