//! The flight entity and the state guarded by its lock

use flight_seats_core::{
    ClassSnapshot, Config, EngineError, FareClass, FlightNumber, FlightRecord, PassengerId,
};
use parking_lot::{Mutex, MutexGuard};

use crate::ledger::BookingLedger;
use crate::per_class::PerClass;
use crate::seat_map;
use crate::seat_pool::SeatPool;
use crate::waitlist::Waitlists;

/// A flight: its static attributes plus everything allocation mutates
pub struct Flight {
    record: FlightRecord,
    state: Mutex<FlightState>,
}

/// Mutable part of a flight
///
/// All of it is mutated under the flight's single lock, so booking,
/// cancellation and promotion on one flight never interleave.
pub struct FlightState {
    pub pools: PerClass<SeatPool>,
    pub waitlists: Waitlists,
    pub ledger: BookingLedger,
}

impl Flight {
    /// Create a [`Flight`] with full seat pools
    pub fn new(record: FlightRecord, config: &Config) -> Result<Self, EngineError> {
        if record.departure_airport.trim().is_empty() || record.arrival_airport.trim().is_empty()
        {
            return Err(EngineError::InvalidRecord(format!(
                "flight {} has no departure or arrival airport",
                record.flight_number
            )));
        }

        let number = record.flight_number;
        let mut seats = seat_map::layout(&record, config.seats_per_row);
        let pools = PerClass::from_fn(|class| {
            SeatPool::new(number, class, std::mem::take(&mut seats[class]))
        });
        Ok(Self {
            state: Mutex::new(FlightState {
                pools,
                waitlists: Waitlists::new(number),
                ledger: BookingLedger::new(number),
            }),
            record,
        })
    }

    #[inline]
    pub fn number(&self) -> FlightNumber {
        self.record.flight_number
    }

    /// Static attributes as loaded
    pub fn record(&self) -> &FlightRecord {
        &self.record
    }

    /// Enter the flight's exclusion scope
    pub fn lock(&self) -> MutexGuard<'_, FlightState> {
        self.state.lock()
    }
}

impl FlightState {
    /// Whether `passenger` is booked or waitlisted on this flight
    pub fn holds(&self, passenger: PassengerId) -> bool {
        self.ledger.contains(passenger) || self.waitlists.contains(passenger)
    }

    /// Occupancy of `class`
    pub fn class_snapshot(&self, class: FareClass) -> ClassSnapshot {
        let pool = &self.pools[class];
        ClassSnapshot {
            fare_class: class,
            capacity: pool.capacity(),
            available: pool.available(),
            assigned: pool.capacity() - pool.available(),
            waitlist: self.waitlists[class].iter().map(|e| e.passenger_id).collect(),
        }
    }
}
