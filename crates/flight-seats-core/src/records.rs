//! Entities and the records exchanged with the data loader

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{FareClass, FlightNumber, PassengerId, SeatId};

/// Static description of a flight as supplied by the data loader
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub flight_number: FlightNumber,
    pub departure_airport: String,
    pub arrival_airport: String,
    /// Local departure time, e.g. `2024-05-01T09:30:00`
    pub departure_date: NaiveDateTime,
    /// Seat capacity per class; missing classes have no seats
    #[serde(default)]
    pub capacities: BTreeMap<FareClass, u32>,
}

impl FlightRecord {
    /// Capacity configured for `class`
    pub fn capacity(&self, class: FareClass) -> u32 {
        self.capacities.get(&class).copied().unwrap_or(0)
    }
}

/// A passenger known to the system
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerRecord {
    pub passenger_id: PassengerId,
    pub name: String,
}

/// A confirmed booking to restore at load time
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub passenger_id: PassengerId,
    pub flight_number: FlightNumber,
    pub fare_class: FareClass,
    /// Seat to claim; any free seat of the class is taken if absent
    #[serde(default)]
    pub seat: Option<SeatId>,
    #[serde(default)]
    pub reference: Option<Uuid>,
}

/// A waitlist entry to restore at load time
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistRecord {
    pub passenger_id: PassengerId,
    pub flight_number: FlightNumber,
    pub fare_class: FareClass,
    /// Original enqueue sequence; records without one keep their input order
    #[serde(default)]
    pub sequence: Option<u64>,
}

/// Everything the engine is started from
///
/// This is both the input of [`launch`](../flight_seats_engine/fn.launch.html)
/// and the image produced by exporting a running engine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadData {
    #[serde(default)]
    pub flights: Vec<FlightRecord>,
    #[serde(default)]
    pub passengers: Vec<PassengerRecord>,
    #[serde(default)]
    pub bookings: Vec<BookingRecord>,
    #[serde(default)]
    pub waitlist: Vec<WaitlistRecord>,
}

/// Status of an active booking
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Confirmed,
}

/// An active booking; immutable once recorded
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub passenger_id: PassengerId,
    pub flight_number: FlightNumber,
    pub fare_class: FareClass,
    pub seat: SeatId,
    pub status: BookingStatus,
    /// Record locator
    pub reference: Uuid,
}

impl Booking {
    /// Create a confirmed booking with a fresh reference
    pub fn confirmed(
        passenger_id: PassengerId,
        flight_number: FlightNumber,
        fare_class: FareClass,
        seat: SeatId,
    ) -> Self {
        Self {
            passenger_id,
            flight_number,
            fare_class,
            seat,
            status: BookingStatus::Confirmed,
            reference: Uuid::new_v4(),
        }
    }
}

impl From<&Booking> for BookingRecord {
    fn from(booking: &Booking) -> Self {
        Self {
            passenger_id: booking.passenger_id,
            flight_number: booking.flight_number,
            fare_class: booking.fare_class,
            seat: Some(booking.seat.clone()),
            reference: Some(booking.reference),
        }
    }
}

/// A passenger waiting for a seat in one class of one flight
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub passenger_id: PassengerId,
    pub flight_number: FlightNumber,
    pub fare_class: FareClass,
    /// Sole ordering key, fixed at enqueue time
    pub sequence: u64,
}

impl From<&WaitlistEntry> for WaitlistRecord {
    fn from(entry: &WaitlistEntry) -> Self {
        Self {
            passenger_id: entry.passenger_id,
            flight_number: entry.flight_number,
            fare_class: entry.fare_class,
            sequence: Some(entry.sequence),
        }
    }
}
