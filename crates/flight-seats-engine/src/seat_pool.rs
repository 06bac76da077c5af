//! Implementation of the pool of available seats

use std::collections::HashSet;

use flight_seats_core::{EngineError, Exhausted, FareClass, FlightNumber, SeatId};

/// Available seats of one class of one flight
///
/// Seats are issued last-in-first-out: a returned seat is the next one
/// handed out. Initially the seats are issued in the order they were
/// given to [`SeatPool::new`].
#[derive(Clone, Debug)]
pub struct SeatPool {
    flight: FlightNumber,
    class: FareClass,
    /// Seats not assigned to any booking; the last one is issued next
    available: Vec<SeatId>,
    /// Same seats as `available`, for membership checks
    free: HashSet<SeatId>,
    /// Every seat belonging to this pool, available or not
    roster: HashSet<SeatId>,
}

impl SeatPool {
    /// Create a new [`SeatPool`] holding `seats`.
    pub fn new(flight: FlightNumber, class: FareClass, seats: Vec<SeatId>) -> Self {
        let roster: HashSet<_> = seats.iter().cloned().collect();
        let mut available = seats;
        available.reverse();
        Self {
            flight,
            class,
            free: roster.clone(),
            available,
            roster,
        }
    }

    /// Total number of seats of the pool.
    pub fn capacity(&self) -> u32 {
        self.roster.len() as u32
    }

    /// Get the number of available seats.
    pub fn available(&self) -> u32 {
        self.available.len() as u32
    }

    /// Whether `seat` belongs to this pool.
    pub fn owns(&self, seat: &SeatId) -> bool {
        self.roster.contains(seat)
    }

    /// Whether `seat` belongs to this pool and is currently available.
    pub fn is_available(&self, seat: &SeatId) -> bool {
        self.free.contains(seat)
    }

    /// Iterate over every seat of the pool in no particular order.
    pub fn roster(&self) -> impl Iterator<Item = &SeatId> {
        self.roster.iter()
    }

    /// Remove and return the next seat.
    pub fn take(&mut self) -> Result<SeatId, Exhausted> {
        let seat = self.available.pop().ok_or(Exhausted)?;
        self.free.remove(&seat);
        Ok(seat)
    }

    /// Return `seat` to the pool.
    ///
    /// Fails if the seat belongs to another pool or is already available.
    pub fn give(&mut self, seat: SeatId) -> Result<(), EngineError> {
        if !self.owns(&seat) {
            return Err(self.unknown(seat));
        }
        if self.is_available(&seat) {
            return Err(EngineError::SeatNotAssigned {
                seat,
                flight: self.flight,
            });
        }
        self.free.insert(seat.clone());
        self.available.push(seat);
        Ok(())
    }

    /// Remove a specific available seat, used when restoring bookings.
    ///
    /// The issue order of the remaining seats is unchanged. Unlike the other
    /// operations this walks the issue stack, so it is only used at launch.
    pub fn claim(&mut self, seat: &SeatId) -> Result<(), EngineError> {
        if !self.free.remove(seat) {
            return Err(self.unknown(seat.clone()));
        }
        self.available.retain(|s| s != seat);
        Ok(())
    }

    fn unknown(&self, seat: SeatId) -> EngineError {
        EngineError::UnknownSeat {
            seat,
            flight: self.flight,
            class: self.class,
        }
    }
}
