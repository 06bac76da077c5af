//! Implementation of the booking ledger
//!
//! The ledger is partitioned by flight: every [`Flight`](crate::flight::Flight)
//! owns the slice of confirmed bookings that reference it, guarded by the
//! same lock as its seat pools and waitlists.

use std::collections::HashMap;

use flight_seats_core::{Booking, EngineError, FareClass, FlightNumber, PassengerId, SeatId};

/// Confirmed bookings of one flight
#[derive(Clone, Debug)]
pub struct BookingLedger {
    flight: FlightNumber,
    /// map from passenger to their booking
    bookings: HashMap<PassengerId, Booking>,
    /// map from assigned seat to its holder
    holders: HashMap<SeatId, PassengerId>,
}

impl BookingLedger {
    /// Create an empty [`BookingLedger`]
    pub fn new(flight: FlightNumber) -> Self {
        Self {
            flight,
            bookings: HashMap::new(),
            holders: HashMap::new(),
        }
    }

    /// Record a new booking
    ///
    /// Fails if the passenger already holds a booking on this flight or the
    /// seat is held by someone else.
    pub fn record(&mut self, booking: Booking) -> Result<(), EngineError> {
        if booking.flight_number != self.flight {
            return Err(EngineError::InvalidRecord(format!(
                "booking for flight {} recorded in the ledger of flight {}",
                booking.flight_number, self.flight
            )));
        }
        if self.bookings.contains_key(&booking.passenger_id) {
            return Err(EngineError::DuplicateBooking {
                passenger: booking.passenger_id,
                flight: self.flight,
            });
        }
        if let Some(holder) = self.holders.get(&booking.seat) {
            return Err(EngineError::InvariantViolated(format!(
                "seat {} of flight {} is already held by passenger {holder}",
                booking.seat, self.flight
            )));
        }
        self.holders
            .insert(booking.seat.clone(), booking.passenger_id);
        self.bookings.insert(booking.passenger_id, booking);
        Ok(())
    }

    pub fn contains(&self, passenger: PassengerId) -> bool {
        self.bookings.contains_key(&passenger)
    }

    pub fn find(&self, passenger: PassengerId) -> Option<&Booking> {
        self.bookings.get(&passenger)
    }

    /// Remove and return the booking of `passenger`
    pub fn remove(&mut self, passenger: PassengerId) -> Option<Booking> {
        let booking = self.bookings.remove(&passenger)?;
        self.holders.remove(&booking.seat);
        Some(booking)
    }

    /// Passenger holding `seat`
    pub fn holder(&self, seat: &SeatId) -> Option<PassengerId> {
        self.holders.get(seat).copied()
    }

    /// Number of seats assigned in `class`
    pub fn assigned(&self, class: FareClass) -> u32 {
        self.bookings
            .values()
            .filter(|b| b.fare_class == class)
            .count() as u32
    }

    /// Bookings in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &Booking> {
        self.bookings.values()
    }
}
