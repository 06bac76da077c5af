//! Passenger names and the flights each passenger is active on

use std::collections::BTreeSet;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use flight_seats_core::{FlightNumber, PassengerId, PassengerRecord};

/// Directory of passengers
///
/// The flight sets are only changed while the lock of the affected flight is
/// held, so for every flight they agree with that flight's ledger and
/// waitlists whenever the lock is free.
#[derive(Default)]
pub struct PassengerDirectory {
    names: DashMap<PassengerId, String>,
    /// map from passenger to the flights they are booked or waitlisted on
    flights: DashMap<PassengerId, BTreeSet<FlightNumber>>,
}

impl PassengerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record or update the display name of a passenger
    pub fn register(&self, passenger: PassengerId, name: String) {
        self.names.insert(passenger, name);
    }

    pub fn name(&self, passenger: PassengerId) -> Option<String> {
        self.names.get(&passenger).map(|name| name.clone())
    }

    /// Registered passengers ordered by id
    pub fn passengers(&self) -> Vec<PassengerRecord> {
        let mut passengers: Vec<_> = self
            .names
            .iter()
            .map(|entry| PassengerRecord {
                passenger_id: *entry.key(),
                name: entry.value().clone(),
            })
            .collect();
        passengers.sort_by_key(|p| p.passenger_id);
        passengers
    }

    /// Note that `passenger` became active on `flight`
    pub fn attach(&self, passenger: PassengerId, flight: FlightNumber) {
        self.flights.entry(passenger).or_default().insert(flight);
    }

    /// Note that `passenger` is no longer active on `flight`
    pub fn detach(&self, passenger: PassengerId, flight: FlightNumber) {
        if let Entry::Occupied(mut entry) = self.flights.entry(passenger) {
            entry.get_mut().remove(&flight);
            if entry.get().is_empty() {
                entry.remove();
            }
        }
    }

    /// Flights `passenger` is active on, in ascending order
    pub fn flights_of(&self, passenger: PassengerId) -> Vec<FlightNumber> {
        self.flights
            .get(&passenger)
            .map(|flights| flights.iter().copied().collect())
            .unwrap_or_default()
    }
}
