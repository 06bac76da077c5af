//! Vocabulary of the flight seat allocation system: identifiers, records,
//! outcomes, errors, and the request boundary shared by every front end.

mod error;
mod ids;
mod outcome;
mod records;
mod request;

pub use error::{EngineError, Exhausted};
pub use ids::{FareClass, FlightNumber, PassengerId, SeatId, UnknownFareClass};
pub use outcome::{
    BookResult, CancelResult, ClassSnapshot, EngineEvent, FlightSnapshot, ManifestEntry,
    Promotion, StatusResult,
};
pub use records::{
    Booking, BookingRecord, BookingStatus, FlightRecord, LoadData, PassengerRecord,
    WaitlistEntry, WaitlistRecord,
};
pub use request::{status_code, RawRequest, Request, RequestHandler, RequestKind, RequestMethod};

/// Configuration of the allocation engine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Seats per cabin row when generating seat labels (`A`, `B`, ...)
    pub seats_per_row: u8,
}

impl Config {
    /// Largest supported row width, one letter per seat
    pub const MAX_SEATS_PER_ROW: u8 = 26;
}

impl Default for Config {
    fn default() -> Self {
        Self { seats_per_row: 5 }
    }
}
