//! Results returned by the allocation engine and the events it publishes

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{FareClass, FlightNumber, PassengerId, SeatId};

/// Result of a booking request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookResult {
    /// A seat was assigned
    Confirmed { seat: SeatId, reference: Uuid },
    /// The class is full; `position` is the 1-indexed rank on its waitlist
    Waitlisted { position: usize },
}

/// A waitlisted passenger that received a seat
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion {
    pub passenger_id: PassengerId,
    pub fare_class: FareClass,
    pub seat: SeatId,
}

/// Result of a cancellation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CancelResult {
    /// A confirmed booking was cancelled and its seat freed
    ///
    /// `promoted` lists the waitlisted passengers that received a seat as a
    /// consequence, in promotion order.
    Cancelled {
        seat: SeatId,
        promoted: Vec<Promotion>,
    },
    /// A waitlist entry was withdrawn
    CancelledFromWaitlist { fare_class: FareClass },
}

/// Where a passenger currently stands
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusResult {
    Confirmed {
        flight_number: FlightNumber,
        fare_class: FareClass,
        seat: SeatId,
    },
    Waitlisted {
        flight_number: FlightNumber,
        fare_class: FareClass,
        position: usize,
    },
    Unbooked,
}

/// Occupancy of one class of a flight
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSnapshot {
    pub fare_class: FareClass,
    pub capacity: u32,
    pub available: u32,
    pub assigned: u32,
    /// Waitlisted passengers in promotion order
    pub waitlist: Vec<PassengerId>,
}

/// An assigned seat
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub seat: SeatId,
    pub fare_class: FareClass,
    pub passenger_id: PassengerId,
    /// Display name, if the passenger is registered
    pub name: Option<String>,
}

/// Consistent view of one flight
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightSnapshot {
    pub flight_number: FlightNumber,
    pub departure_airport: String,
    pub arrival_airport: String,
    pub departure_date: NaiveDateTime,
    /// One entry per fare class in cabin order
    pub classes: Vec<ClassSnapshot>,
    /// Assigned seats in seat-map order
    pub manifest: Vec<ManifestEntry>,
}

impl FlightSnapshot {
    /// Occupancy of `class`
    pub fn class(&self, class: FareClass) -> Option<&ClassSnapshot> {
        self.classes.iter().find(|c| c.fare_class == class)
    }
}

/// State change published to subscribers of the engine
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    Confirmed {
        passenger_id: PassengerId,
        flight_number: FlightNumber,
        fare_class: FareClass,
        seat: SeatId,
    },
    Waitlisted {
        passenger_id: PassengerId,
        flight_number: FlightNumber,
        fare_class: FareClass,
        position: usize,
    },
    Cancelled {
        passenger_id: PassengerId,
        flight_number: FlightNumber,
        fare_class: FareClass,
        seat: SeatId,
    },
    LeftWaitlist {
        passenger_id: PassengerId,
        flight_number: FlightNumber,
        fare_class: FareClass,
    },
    Promoted {
        passenger_id: PassengerId,
        flight_number: FlightNumber,
        fare_class: FareClass,
        seat: SeatId,
    },
}
