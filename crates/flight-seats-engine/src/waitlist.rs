//! Implementation of the per-class waitlists

use std::collections::{BTreeMap, HashMap};
use std::ops::Index;

use flight_seats_core::{EngineError, FareClass, FlightNumber, PassengerId, WaitlistEntry};

use crate::per_class::PerClass;

/// Strict FIFO queue of passengers waiting for one class of one flight
///
/// Entries are ordered by the sequence number assigned when they were
/// enqueued. Removing an entry never renumbers the others.
#[derive(Clone, Debug)]
pub struct WaitlistQueue {
    flight: FlightNumber,
    class: FareClass,
    /// map from sequence number to passenger
    entries: BTreeMap<u64, PassengerId>,
    /// map from passenger to their sequence number
    sequences: HashMap<PassengerId, u64>,
    next_sequence: u64,
}

impl WaitlistQueue {
    /// Create an empty [`WaitlistQueue`]
    pub fn new(flight: FlightNumber, class: FareClass) -> Self {
        Self {
            flight,
            class,
            entries: BTreeMap::new(),
            sequences: HashMap::new(),
            next_sequence: 0,
        }
    }

    fn entry(&self, sequence: u64, passenger_id: PassengerId) -> WaitlistEntry {
        WaitlistEntry {
            passenger_id,
            flight_number: self.flight,
            fare_class: self.class,
            sequence,
        }
    }

    /// Number of waiting passengers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, passenger: PassengerId) -> bool {
        self.sequences.contains_key(&passenger)
    }

    /// Append `passenger` behind everyone already waiting
    pub fn enqueue(&mut self, passenger: PassengerId) -> Result<WaitlistEntry, EngineError> {
        let sequence = self.next_sequence;
        self.enqueue_at(passenger, sequence)
    }

    /// Insert `passenger` with a given sequence number
    ///
    /// Later calls to [`Self::enqueue`] continue after the highest sequence
    /// seen so far.
    pub fn enqueue_at(
        &mut self,
        passenger: PassengerId,
        sequence: u64,
    ) -> Result<WaitlistEntry, EngineError> {
        if self.contains(passenger) {
            return Err(EngineError::AlreadyWaitlisted {
                passenger,
                flight: self.flight,
            });
        }
        if self.entries.contains_key(&sequence) {
            return Err(EngineError::InvalidRecord(format!(
                "waitlist sequence {sequence} used twice on flight {} {}",
                self.flight, self.class
            )));
        }
        let following = sequence.checked_add(1).ok_or_else(|| {
            EngineError::InvalidRecord(format!(
                "waitlist sequence {sequence} on flight {} {} leaves no room for later entries",
                self.flight, self.class
            ))
        })?;
        self.entries.insert(sequence, passenger);
        self.sequences.insert(passenger, sequence);
        self.next_sequence = self.next_sequence.max(following);
        Ok(self.entry(sequence, passenger))
    }

    /// The entry that will be promoted next
    pub fn peek_front(&self) -> Option<WaitlistEntry> {
        self.entries
            .first_key_value()
            .map(|(&sequence, &passenger)| self.entry(sequence, passenger))
    }

    /// Remove and return the entry with the lowest sequence number
    pub fn dequeue_front(&mut self) -> Option<WaitlistEntry> {
        let (sequence, passenger) = self.entries.pop_first()?;
        self.sequences.remove(&passenger);
        Some(self.entry(sequence, passenger))
    }

    /// Remove `passenger` wherever they are in the queue
    pub fn remove_by_passenger(&mut self, passenger: PassengerId) -> Option<WaitlistEntry> {
        let sequence = self.sequences.remove(&passenger)?;
        self.entries.remove(&sequence);
        Some(self.entry(sequence, passenger))
    }

    /// 1-indexed rank of `passenger` in promotion order
    pub fn position(&self, passenger: PassengerId) -> Option<usize> {
        let sequence = *self.sequences.get(&passenger)?;
        Some(self.entries.range(..sequence).count() + 1)
    }

    /// Entries in promotion order
    pub fn iter(&self) -> impl Iterator<Item = WaitlistEntry> + '_ {
        self.entries
            .iter()
            .map(|(&sequence, &passenger)| self.entry(sequence, passenger))
    }
}

/// The waitlists of every class of one flight
///
/// A passenger waits in at most one class of a flight.
#[derive(Clone, Debug)]
pub struct Waitlists {
    queues: PerClass<WaitlistQueue>,
}

impl Waitlists {
    pub fn new(flight: FlightNumber) -> Self {
        Self {
            queues: PerClass::from_fn(|class| WaitlistQueue::new(flight, class)),
        }
    }

    /// Whether `passenger` waits in any class
    pub fn contains(&self, passenger: PassengerId) -> bool {
        self.class_of(passenger).is_some()
    }

    /// Class in which `passenger` waits
    pub fn class_of(&self, passenger: PassengerId) -> Option<FareClass> {
        self.queues
            .iter()
            .find(|(_, queue)| queue.contains(passenger))
            .map(|(class, _)| class)
    }

    /// Append `passenger` to the waitlist of `class`
    ///
    /// Fails if the passenger already waits in any class of the flight.
    pub fn enqueue(
        &mut self,
        class: FareClass,
        passenger: PassengerId,
        sequence: Option<u64>,
    ) -> Result<WaitlistEntry, EngineError> {
        if self.contains(passenger) {
            let flight = self.queues[class].flight;
            return Err(EngineError::AlreadyWaitlisted { passenger, flight });
        }
        let queue = &mut self.queues[class];
        match sequence {
            Some(sequence) => queue.enqueue_at(passenger, sequence),
            None => queue.enqueue(passenger),
        }
    }

    pub fn dequeue_front(&mut self, class: FareClass) -> Option<WaitlistEntry> {
        self.queues[class].dequeue_front()
    }

    pub fn remove_by_passenger(&mut self, passenger: PassengerId) -> Option<WaitlistEntry> {
        let class = self.class_of(passenger)?;
        self.queues[class].remove_by_passenger(passenger)
    }

    /// Class and 1-indexed position of `passenger`
    pub fn position(&self, passenger: PassengerId) -> Option<(FareClass, usize)> {
        let class = self.class_of(passenger)?;
        Some((class, self.queues[class].position(passenger)?))
    }

    /// Queues in cabin order
    pub fn iter(&self) -> impl Iterator<Item = (FareClass, &WaitlistQueue)> {
        self.queues.iter()
    }
}

impl Index<FareClass> for Waitlists {
    type Output = WaitlistQueue;

    fn index(&self, class: FareClass) -> &WaitlistQueue {
        &self.queues[class]
    }
}
