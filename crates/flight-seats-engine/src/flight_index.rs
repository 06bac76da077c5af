//! Lookup of flights by number

use std::collections::HashMap;

use flight_seats_core::{EngineError, FlightNumber};

use crate::flight::Flight;

/// All flights of the system, keyed by flight number
///
/// Filled while the engine is launched and read-only afterwards, so lookups
/// need no lock.
#[derive(Default)]
pub struct FlightIndex {
    flights: HashMap<FlightNumber, Flight>,
}

impl FlightIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a flight; its number must not be in use yet
    pub fn insert(&mut self, flight: Flight) -> Result<(), EngineError> {
        let number = flight.number();
        if self.flights.contains_key(&number) {
            return Err(EngineError::DuplicateFlight(number));
        }
        self.flights.insert(number, flight);
        Ok(())
    }

    pub fn resolve(&self, number: FlightNumber) -> Result<&Flight, EngineError> {
        self.flights
            .get(&number)
            .ok_or(EngineError::FlightNotFound(number))
    }

    /// Flights in ascending flight number order
    pub fn sorted(&self) -> Vec<&Flight> {
        let mut flights: Vec<_> = self.flights.values().collect();
        flights.sort_unstable_by_key(|flight| flight.number());
        flights
    }

    /// Flight numbers in ascending order
    pub fn numbers(&self) -> Vec<FlightNumber> {
        self.sorted().into_iter().map(Flight::number).collect()
    }
}
