//! Error kinds surfaced by the allocation engine

use crate::{FareClass, FlightNumber, PassengerId, SeatId};

/// A seat pool has no seat left
///
/// Only ever consumed inside the engine, where it turns a booking into a
/// waitlist entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("seat pool exhausted")]
pub struct Exhausted;

/// Errors returned by engine operations
///
/// No variant is ever retried by the engine. Whenever an operation returns
/// one of these, the shared state is exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("flight {0} not found")]
    FlightNotFound(FlightNumber),

    #[error("passenger {passenger} is already booked or waitlisted on flight {flight}")]
    AlreadyBookedOrWaitlisted {
        passenger: PassengerId,
        flight: FlightNumber,
    },

    #[error("passenger {passenger} has no booking or waitlist entry on flight {flight}")]
    NotFound {
        passenger: PassengerId,
        flight: FlightNumber,
    },

    #[error("passenger {passenger} is already waitlisted on flight {flight}")]
    AlreadyWaitlisted {
        passenger: PassengerId,
        flight: FlightNumber,
    },

    #[error("seat {seat} does not belong to the {class} pool of flight {flight}")]
    UnknownSeat {
        seat: SeatId,
        flight: FlightNumber,
        class: FareClass,
    },

    #[error("seat {seat} of flight {flight} is not assigned")]
    SeatNotAssigned { seat: SeatId, flight: FlightNumber },

    #[error("passenger {passenger} already holds a booking on flight {flight}")]
    DuplicateBooking {
        passenger: PassengerId,
        flight: FlightNumber,
    },

    #[error("flight {0} is defined more than once")]
    DuplicateFlight(FlightNumber),

    #[error("no {class} seat left on flight {flight} for a restored booking")]
    Overbooked { flight: FlightNumber, class: FareClass },

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("invariant violated: {0}")]
    InvariantViolated(String),
}
