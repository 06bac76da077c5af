//! Implementation of the allocation engine

use std::collections::HashSet;

use crossbeam::channel::Receiver;
use flight_seats_core::{
    BookResult, Booking, BookingRecord, BookingStatus, CancelResult, Config, EngineError,
    EngineEvent, Exhausted, FareClass, FlightNumber, FlightSnapshot, LoadData, ManifestEntry,
    PassengerId, Promotion, StatusResult, WaitlistRecord,
};
use uuid::Uuid;

use crate::directory::PassengerDirectory;
use crate::events::EventFeed;
use crate::flight::FlightState;
use crate::flight_index::FlightIndex;

/// Allocation engine deciding who gets which seat
///
/// Every operation on a flight runs inside that flight's exclusion scope;
/// operations on different flights proceed in parallel. No operation holds
/// two flight locks at once.
pub struct Engine {
    config: Config,
    flights: FlightIndex,
    directory: PassengerDirectory,
    events: EventFeed,
}

impl Engine {
    /// Create the [`Engine`] over a loaded flight index
    pub(crate) fn new(config: Config, flights: FlightIndex) -> Self {
        Self {
            config,
            flights,
            directory: PassengerDirectory::new(),
            events: EventFeed::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Record or update the display name of a passenger
    pub fn register_passenger(&self, passenger: PassengerId, name: impl Into<String>) {
        self.directory.register(passenger, name.into());
    }

    /// Subscribe to the events of all later operations
    pub fn subscribe(&self) -> Receiver<EngineEvent> {
        self.events.subscribe()
    }

    /// All flight numbers in ascending order
    pub fn flight_numbers(&self) -> Vec<FlightNumber> {
        self.flights.numbers()
    }

    fn emit(&self, event: EngineEvent) {
        self.events.publish(&event);
    }

    /// Book a seat in `class`, or waitlist the passenger if the class is full
    pub fn book(
        &self,
        passenger: PassengerId,
        flight_number: FlightNumber,
        class: FareClass,
    ) -> Result<BookResult, EngineError> {
        let flight = self.flights.resolve(flight_number)?;
        let mut state = flight.lock();

        if state.holds(passenger) {
            return Err(EngineError::AlreadyBookedOrWaitlisted {
                passenger,
                flight: flight_number,
            });
        }

        match state.pools[class].take() {
            Ok(seat) => {
                let booking = Booking::confirmed(passenger, flight_number, class, seat.clone());
                let reference = booking.reference;
                if let Err(err) = state.ledger.record(booking) {
                    // the seat was just taken from this pool, so it goes back cleanly
                    let _ = state.pools[class].give(seat);
                    return Err(err);
                }
                self.directory.attach(passenger, flight_number);
                self.emit(EngineEvent::Confirmed {
                    passenger_id: passenger,
                    flight_number,
                    fare_class: class,
                    seat: seat.clone(),
                });
                Ok(BookResult::Confirmed { seat, reference })
            }
            Err(Exhausted) => {
                state.waitlists.enqueue(class, passenger, None)?;
                // new entries always go last
                let position = state.waitlists[class].len();
                self.directory.attach(passenger, flight_number);
                self.emit(EngineEvent::Waitlisted {
                    passenger_id: passenger,
                    flight_number,
                    fare_class: class,
                    position,
                });
                Ok(BookResult::Waitlisted { position })
            }
        }
    }

    /// Cancel the booking or waitlist entry of `passenger` on a flight
    ///
    /// A freed seat is immediately offered to the waitlist of its class.
    pub fn cancel(
        &self,
        passenger: PassengerId,
        flight_number: FlightNumber,
    ) -> Result<CancelResult, EngineError> {
        let flight = self.flights.resolve(flight_number)?;
        let mut state = flight.lock();

        if let Some(booking) = state.ledger.remove(passenger) {
            let class = booking.fare_class;
            if let Err(err) = state.pools[class].give(booking.seat.clone()) {
                state.ledger.record(booking)?;
                return Err(err);
            }
            self.directory.detach(passenger, flight_number);
            self.emit(EngineEvent::Cancelled {
                passenger_id: passenger,
                flight_number,
                fare_class: class,
                seat: booking.seat.clone(),
            });
            let promoted = self.promote_locked(&mut state, flight_number, class)?;
            return Ok(CancelResult::Cancelled {
                seat: booking.seat,
                promoted,
            });
        }

        if let Some(entry) = state.waitlists.remove_by_passenger(passenger) {
            self.directory.detach(passenger, flight_number);
            self.emit(EngineEvent::LeftWaitlist {
                passenger_id: passenger,
                flight_number,
                fare_class: entry.fare_class,
            });
            return Ok(CancelResult::CancelledFromWaitlist {
                fare_class: entry.fare_class,
            });
        }

        Err(EngineError::NotFound {
            passenger,
            flight: flight_number,
        })
    }

    /// Move waitlisted passengers of `class` into free seats, front first
    pub fn promote(
        &self,
        flight_number: FlightNumber,
        class: FareClass,
    ) -> Result<Vec<Promotion>, EngineError> {
        let flight = self.flights.resolve(flight_number)?;
        let mut state = flight.lock();
        self.promote_locked(&mut state, flight_number, class)
    }

    /// Promote in every class of a flight, in cabin order
    pub fn promote_all(&self, flight_number: FlightNumber) -> Result<Vec<Promotion>, EngineError> {
        let flight = self.flights.resolve(flight_number)?;
        let mut state = flight.lock();
        let mut promoted = Vec::new();
        for class in FareClass::ALL {
            promoted.extend(self.promote_locked(&mut state, flight_number, class)?);
        }
        Ok(promoted)
    }

    /// Promotion loop; the caller holds the flight's lock
    fn promote_locked(
        &self,
        state: &mut FlightState,
        flight_number: FlightNumber,
        class: FareClass,
    ) -> Result<Vec<Promotion>, EngineError> {
        let mut promoted = Vec::new();
        while let Some(front) = state.waitlists[class].peek_front() {
            let passenger = front.passenger_id;
            if state.ledger.contains(passenger) {
                return Err(EngineError::InvariantViolated(format!(
                    "passenger {passenger} is waitlisted on flight {flight_number} while holding a booking"
                )));
            }
            let Ok(seat) = state.pools[class].take() else {
                break;
            };
            state.waitlists.dequeue_front(class);
            state.ledger.record(Booking::confirmed(
                passenger,
                flight_number,
                class,
                seat.clone(),
            ))?;
            self.emit(EngineEvent::Promoted {
                passenger_id: passenger,
                flight_number,
                fare_class: class,
                seat: seat.clone(),
            });
            promoted.push(Promotion {
                passenger_id: passenger,
                fare_class: class,
                seat,
            });
        }
        Ok(promoted)
    }

    /// Where `passenger` stands
    ///
    /// A confirmed booking is reported before any waitlist entry; among
    /// several flights the lowest flight number wins.
    pub fn status(&self, passenger: PassengerId) -> StatusResult {
        let flights: Vec<_> = self
            .directory
            .flights_of(passenger)
            .into_iter()
            .filter_map(|number| self.flights.resolve(number).ok())
            .collect();

        for flight in &flights {
            if let Some(booking) = flight.lock().ledger.find(passenger) {
                return StatusResult::Confirmed {
                    flight_number: booking.flight_number,
                    fare_class: booking.fare_class,
                    seat: booking.seat.clone(),
                };
            }
        }
        for flight in &flights {
            if let Some((fare_class, position)) = flight.lock().waitlists.position(passenger) {
                return StatusResult::Waitlisted {
                    flight_number: flight.number(),
                    fare_class,
                    position,
                };
            }
        }
        StatusResult::Unbooked
    }

    /// The booking of `passenger` on a flight
    pub fn booking(&self, passenger: PassengerId, flight_number: FlightNumber) -> Option<Booking> {
        let flight = self.flights.resolve(flight_number).ok()?;
        let state = flight.lock();
        state.ledger.find(passenger).cloned()
    }

    /// The booking of `passenger` on the lowest-numbered flight they hold one on
    pub fn booking_for(&self, passenger: PassengerId) -> Option<Booking> {
        self.directory
            .flights_of(passenger)
            .into_iter()
            .find_map(|number| self.booking(passenger, number))
    }

    /// Number of available seats in one class of a flight
    pub fn available(
        &self,
        flight_number: FlightNumber,
        class: FareClass,
    ) -> Result<u32, EngineError> {
        let flight = self.flights.resolve(flight_number)?;
        let available = flight.lock().pools[class].available();
        Ok(available)
    }

    /// Consistent view of one flight
    pub fn flight_info(&self, flight_number: FlightNumber) -> Result<FlightSnapshot, EngineError> {
        let flight = self.flights.resolve(flight_number)?;
        let record = flight.record();

        let state = flight.lock();
        let classes = FareClass::ALL
            .into_iter()
            .map(|class| state.class_snapshot(class))
            .collect();
        let mut manifest: Vec<_> = state
            .ledger
            .iter()
            .map(|booking| ManifestEntry {
                seat: booking.seat.clone(),
                fare_class: booking.fare_class,
                passenger_id: booking.passenger_id,
                name: self.directory.name(booking.passenger_id),
            })
            .collect();
        drop(state);

        manifest.sort_by(|a, b| a.seat.sort_key().cmp(&b.seat.sort_key()));
        Ok(FlightSnapshot {
            flight_number,
            departure_airport: record.departure_airport.clone(),
            arrival_airport: record.arrival_airport.clone(),
            departure_date: record.departure_date,
            classes,
            manifest,
        })
    }

    /// Image of the engine that [`launch`](crate::launch) resumes from
    ///
    /// Each flight is captured under its own lock; flights are not captured
    /// at one common instant.
    pub fn export(&self) -> LoadData {
        let mut data = LoadData {
            passengers: self.directory.passengers(),
            ..LoadData::default()
        };
        for flight in self.flights.sorted() {
            data.flights.push(flight.record().clone());

            let state = flight.lock();
            let mut bookings: Vec<_> = state.ledger.iter().collect();
            bookings.sort_by(|a, b| a.seat.sort_key().cmp(&b.seat.sort_key()));
            data.bookings
                .extend(bookings.into_iter().map(BookingRecord::from));
            for (_, queue) in state.waitlists.iter() {
                data.waitlist
                    .extend(queue.iter().map(|entry| WaitlistRecord::from(&entry)));
            }
        }
        data
    }

    /// Verify the allocation invariants on every flight
    ///
    /// Returns the first violation found.
    pub fn check_invariants(&self) -> Result<(), EngineError> {
        let violated =
            |msg: String| -> Result<(), EngineError> { Err(EngineError::InvariantViolated(msg)) };

        for flight in self.flights.sorted() {
            let number = flight.number();
            let state = flight.lock();

            let mut seen = HashSet::new();
            for (class, pool) in state.pools.iter() {
                let assigned = state.ledger.assigned(class);
                if pool.available() + assigned != pool.capacity() {
                    return violated(format!(
                        "flight {number} {class}: {} available + {assigned} assigned != capacity {}",
                        pool.available(),
                        pool.capacity()
                    ));
                }
                if let Some(seat) = pool.roster().find(|&seat| !seen.insert(seat)) {
                    return violated(format!("seat {seat} of flight {number} is in two pools"));
                }
                if pool.available() > 0 && !state.waitlists[class].is_empty() {
                    return violated(format!(
                        "flight {number} {class} has free seats and waiting passengers"
                    ));
                }
            }

            for booking in state.ledger.iter() {
                let pool = &state.pools[booking.fare_class];
                if !pool.owns(&booking.seat) || pool.is_available(&booking.seat) {
                    return violated(format!(
                        "seat {} of passenger {} is not an assigned {} seat of flight {number}",
                        booking.seat, booking.passenger_id, booking.fare_class
                    ));
                }
                if state.ledger.holder(&booking.seat) != Some(booking.passenger_id) {
                    return violated(format!(
                        "seat {} of flight {number} is not indexed to passenger {}",
                        booking.seat, booking.passenger_id
                    ));
                }
                if state.waitlists.contains(booking.passenger_id) {
                    return violated(format!(
                        "passenger {} is confirmed and waitlisted on flight {number}",
                        booking.passenger_id
                    ));
                }
            }

            let waiting = state
                .waitlists
                .iter()
                .flat_map(|(_, queue)| queue.iter().map(|entry| entry.passenger_id));
            for passenger in state.ledger.iter().map(|b| b.passenger_id).chain(waiting) {
                if !self.directory.flights_of(passenger).contains(&number) {
                    return violated(format!(
                        "passenger {passenger} is active on flight {number} but not indexed"
                    ));
                }
            }
        }
        Ok(())
    }

    /// Restore a confirmed booking while launching
    pub(crate) fn restore_booking(&self, record: &BookingRecord) -> Result<(), EngineError> {
        let flight_number = record.flight_number;
        let passenger = record.passenger_id;
        let class = record.fare_class;
        let flight = self.flights.resolve(flight_number)?;
        let mut state = flight.lock();

        if state.ledger.contains(passenger) {
            return Err(EngineError::DuplicateBooking {
                passenger,
                flight: flight_number,
            });
        }
        if state.waitlists.contains(passenger) {
            return Err(EngineError::AlreadyBookedOrWaitlisted {
                passenger,
                flight: flight_number,
            });
        }

        let pool = &mut state.pools[class];
        let seat = match &record.seat {
            Some(seat) => {
                pool.claim(seat)?;
                seat.clone()
            }
            None => pool.take().map_err(|Exhausted| EngineError::Overbooked {
                flight: flight_number,
                class,
            })?,
        };
        state.ledger.record(Booking {
            passenger_id: passenger,
            flight_number,
            fare_class: class,
            seat,
            status: BookingStatus::Confirmed,
            reference: record.reference.unwrap_or_else(Uuid::new_v4),
        })?;
        self.directory.attach(passenger, flight_number);
        Ok(())
    }

    /// Restore waitlist entries while launching
    ///
    /// Entries with a sequence number are placed by it; the others follow in
    /// input order.
    pub(crate) fn restore_waitlist(&self, records: Vec<WaitlistRecord>) -> Result<(), EngineError> {
        let (sequenced, unsequenced): (Vec<_>, Vec<_>) =
            records.into_iter().partition(|r| r.sequence.is_some());

        for record in sequenced.into_iter().chain(unsequenced) {
            let passenger = record.passenger_id;
            let flight = self.flights.resolve(record.flight_number)?;
            let mut state = flight.lock();
            if state.ledger.contains(passenger) {
                return Err(EngineError::AlreadyBookedOrWaitlisted {
                    passenger,
                    flight: record.flight_number,
                });
            }
            state
                .waitlists
                .enqueue(record.fare_class, passenger, record.sequence)?;
            self.directory.attach(passenger, record.flight_number);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Barrier;
    use std::thread;

    use flight_seats_core::{SeatId, WaitlistRecord};

    use super::*;
    use crate::launch;
    use crate::testing::flight_record;

    const ECONOMY: FareClass = FareClass::Economy;

    fn engine(flights: &[(u32, &[(FareClass, u32)])]) -> Engine {
        let data = LoadData {
            flights: flights
                .iter()
                .map(|&(number, capacities)| flight_record(number, capacities))
                .collect(),
            ..LoadData::default()
        };
        launch(&Config::default(), data).unwrap()
    }

    fn confirmed_seat(result: BookResult) -> SeatId {
        match result {
            BookResult::Confirmed { seat, .. } => seat,
            other => panic!("expected a confirmation, got {other:?}"),
        }
    }

    #[test]
    fn last_seat_goes_to_waitlist_then_promotion() {
        let engine = engine(&[(100, &[(ECONOMY, 1)])]);
        let flight = FlightNumber(100);

        let seat = confirmed_seat(engine.book(PassengerId(7), flight, ECONOMY).unwrap());
        assert_eq!(
            engine.book(PassengerId(8), flight, ECONOMY).unwrap(),
            BookResult::Waitlisted { position: 1 }
        );

        let cancelled = engine.cancel(PassengerId(7), flight).unwrap();
        assert_eq!(
            cancelled,
            CancelResult::Cancelled {
                seat: seat.clone(),
                promoted: vec![Promotion {
                    passenger_id: PassengerId(8),
                    fare_class: ECONOMY,
                    seat: seat.clone(),
                }],
            }
        );
        assert_eq!(
            engine.status(PassengerId(8)),
            StatusResult::Confirmed {
                flight_number: flight,
                fare_class: ECONOMY,
                seat,
            }
        );
        assert_eq!(engine.status(PassengerId(7)), StatusResult::Unbooked);
        engine.check_invariants().unwrap();
    }

    #[test]
    fn zero_capacity_class_waitlists_immediately() {
        let engine = engine(&[(200, &[(FareClass::Business, 0), (ECONOMY, 3)])]);
        let flight = FlightNumber(200);

        assert_eq!(
            engine.book(PassengerId(1), flight, FareClass::Business).unwrap(),
            BookResult::Waitlisted { position: 1 }
        );
        assert_eq!(engine.available(flight, ECONOMY).unwrap(), 3);
        assert!(engine.booking(PassengerId(1), flight).is_none());
        engine.check_invariants().unwrap();
    }

    #[test]
    fn unknown_flight_mutates_nothing() {
        let engine = engine(&[(100, &[(ECONOMY, 2)])]);
        let before = engine.export();

        assert_eq!(
            engine.book(PassengerId(1), FlightNumber(9999), ECONOMY),
            Err(EngineError::FlightNotFound(FlightNumber(9999)))
        );
        assert_eq!(engine.export(), before);
        assert_eq!(engine.status(PassengerId(1)), StatusResult::Unbooked);
    }

    #[test]
    fn duplicate_booking_is_rejected_across_classes() {
        let engine = engine(&[(100, &[(FareClass::First, 1), (ECONOMY, 0)])]);
        let flight = FlightNumber(100);

        engine.book(PassengerId(1), flight, FareClass::First).unwrap();
        engine.book(PassengerId(2), flight, ECONOMY).unwrap();

        for (passenger, class) in [(1, ECONOMY), (1, FareClass::First), (2, FareClass::First)] {
            assert_eq!(
                engine.book(PassengerId(passenger), flight, class),
                Err(EngineError::AlreadyBookedOrWaitlisted {
                    passenger: PassengerId(passenger),
                    flight
                })
            );
        }
        engine.check_invariants().unwrap();
    }

    #[test]
    fn promotion_is_fifo_regardless_of_later_cancellations() {
        let engine = engine(&[(100, &[(ECONOMY, 2)])]);
        let flight = FlightNumber(100);
        engine.book(PassengerId(10), flight, ECONOMY).unwrap();
        engine.book(PassengerId(11), flight, ECONOMY).unwrap();
        for p in [1, 2, 3] {
            engine.book(PassengerId(p), flight, ECONOMY).unwrap();
        }

        let CancelResult::Cancelled { promoted, .. } = engine.cancel(PassengerId(10), flight).unwrap()
        else {
            panic!("expected a cancelled booking");
        };
        assert_eq!(promoted[0].passenger_id, PassengerId(1));

        assert_eq!(
            engine.cancel(PassengerId(3), flight).unwrap(),
            CancelResult::CancelledFromWaitlist { fare_class: ECONOMY }
        );
        let CancelResult::Cancelled { promoted, .. } = engine.cancel(PassengerId(11), flight).unwrap()
        else {
            panic!("expected a cancelled booking");
        };
        assert_eq!(promoted.len(), 1);
        assert_eq!(promoted[0].passenger_id, PassengerId(2));
        engine.check_invariants().unwrap();
    }

    #[test]
    fn cancel_returns_seat_to_pool() {
        let engine = engine(&[(100, &[(ECONOMY, 4)])]);
        let flight = FlightNumber(100);
        let before = engine.available(flight, ECONOMY).unwrap();

        let seat = confirmed_seat(engine.book(PassengerId(5), flight, ECONOMY).unwrap());
        assert_eq!(engine.available(flight, ECONOMY).unwrap(), before - 1);
        engine.cancel(PassengerId(5), flight).unwrap();
        assert_eq!(engine.available(flight, ECONOMY).unwrap(), before);

        // the returned seat is issued again first
        let again = confirmed_seat(engine.book(PassengerId(6), flight, ECONOMY).unwrap());
        assert_eq!(again, seat);
    }

    #[test]
    fn cancel_of_unknown_passenger_is_not_found() {
        let engine = engine(&[(100, &[(ECONOMY, 1)])]);
        assert_eq!(
            engine.cancel(PassengerId(1), FlightNumber(100)),
            Err(EngineError::NotFound {
                passenger: PassengerId(1),
                flight: FlightNumber(100)
            })
        );
    }

    #[test]
    fn status_prefers_confirmation_and_lowest_flight() {
        let engine = engine(&[(300, &[(ECONOMY, 1)]), (100, &[(ECONOMY, 0)])]);
        let p = PassengerId(9);
        engine.book(p, FlightNumber(100), ECONOMY).unwrap();
        assert_eq!(
            engine.status(p),
            StatusResult::Waitlisted {
                flight_number: FlightNumber(100),
                fare_class: ECONOMY,
                position: 1
            }
        );

        engine.book(p, FlightNumber(300), ECONOMY).unwrap();
        assert!(matches!(
            engine.status(p),
            StatusResult::Confirmed { flight_number: FlightNumber(300), .. }
        ));
        assert_eq!(engine.booking_for(p).unwrap().flight_number, FlightNumber(300));
    }

    #[test]
    fn flight_info_lists_manifest_and_waitlists() {
        let engine = engine(&[(100, &[(FareClass::First, 2), (ECONOMY, 1)])]);
        let flight = FlightNumber(100);
        engine.register_passenger(PassengerId(2), "Grace");
        engine.book(PassengerId(1), flight, ECONOMY).unwrap();
        engine.book(PassengerId(2), flight, FareClass::First).unwrap();
        engine.book(PassengerId(3), flight, ECONOMY).unwrap();

        let info = engine.flight_info(flight).unwrap();
        assert_eq!(info.departure_airport, "LHR");
        let seats: Vec<_> = info.manifest.iter().map(|m| m.seat.as_str()).collect();
        assert_eq!(seats, ["1A", "2A"]);
        assert_eq!(info.manifest[0].name.as_deref(), Some("Grace"));
        assert_eq!(info.manifest[1].name, None);

        let economy = info.class(ECONOMY).unwrap();
        assert_eq!((economy.capacity, economy.available, economy.assigned), (1, 0, 1));
        assert_eq!(economy.waitlist, [PassengerId(3)]);
        assert_eq!(info.class(FareClass::First).unwrap().available, 1);
    }

    #[test]
    fn events_follow_mutation_order() {
        let engine = engine(&[(100, &[(ECONOMY, 1)])]);
        let flight = FlightNumber(100);
        let events = engine.subscribe();

        engine.book(PassengerId(1), flight, ECONOMY).unwrap();
        engine.book(PassengerId(2), flight, ECONOMY).unwrap();
        engine.cancel(PassengerId(1), flight).unwrap();

        let kinds: Vec<_> = events
            .try_iter()
            .map(|event| match event {
                EngineEvent::Confirmed { passenger_id, .. } => ("confirmed", passenger_id.0),
                EngineEvent::Waitlisted { passenger_id, .. } => ("waitlisted", passenger_id.0),
                EngineEvent::Cancelled { passenger_id, .. } => ("cancelled", passenger_id.0),
                EngineEvent::LeftWaitlist { passenger_id, .. } => ("left", passenger_id.0),
                EngineEvent::Promoted { passenger_id, .. } => ("promoted", passenger_id.0),
            })
            .collect();
        assert_eq!(
            kinds,
            [("confirmed", 1), ("waitlisted", 2), ("cancelled", 1), ("promoted", 2)]
        );

        drop(events);
        engine.cancel(PassengerId(2), flight).unwrap();
    }

    #[test]
    fn concurrent_bookings_for_last_seat() {
        const N: u64 = 16;
        let engine = engine(&[(100, &[(ECONOMY, 1)])]);
        let flight = FlightNumber(100);
        let barrier = Barrier::new(N as usize);

        let results: Vec<_> = thread::scope(|s| {
            let handles: Vec<_> = (0..N)
                .map(|p| {
                    let engine = &engine;
                    let barrier = &barrier;
                    s.spawn(move || {
                        barrier.wait();
                        engine.book(PassengerId(p), flight, ECONOMY).unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let confirmed = results
            .iter()
            .filter(|r| matches!(r, BookResult::Confirmed { .. }))
            .count();
        let mut positions: Vec<_> = results
            .iter()
            .filter_map(|r| match r {
                BookResult::Waitlisted { position } => Some(*position),
                _ => None,
            })
            .collect();
        positions.sort_unstable();

        assert_eq!(confirmed, 1);
        assert_eq!(positions, (1..N as usize).collect::<Vec<_>>());
        engine.check_invariants().unwrap();
    }

    #[test]
    fn export_then_launch_resumes_state() {
        let engine = engine(&[(100, &[(FareClass::Business, 2), (ECONOMY, 1)])]);
        let flight = FlightNumber(100);
        engine.register_passenger(PassengerId(1), "Ada");
        engine.book(PassengerId(1), flight, ECONOMY).unwrap();
        for p in [2, 3, 4] {
            engine.book(PassengerId(p), flight, ECONOMY).unwrap();
        }
        engine.book(PassengerId(5), flight, FareClass::Business).unwrap();
        engine.cancel(PassengerId(3), flight).unwrap();

        let image = engine.export();
        let resumed = launch(&Config::default(), image.clone()).unwrap();
        resumed.check_invariants().unwrap();
        assert_eq!(resumed.export(), image);

        assert_eq!(
            resumed.status(PassengerId(4)),
            StatusResult::Waitlisted {
                flight_number: flight,
                fare_class: ECONOMY,
                position: 2
            }
        );
        let next = resumed.book(PassengerId(6), flight, ECONOMY).unwrap();
        assert_eq!(next, BookResult::Waitlisted { position: 3 });
    }

    #[test]
    fn launch_promotes_hand_written_waitlists_into_free_seats() {
        let data = LoadData {
            flights: vec![flight_record(100, &[(ECONOMY, 2)])],
            bookings: vec![BookingRecord {
                passenger_id: PassengerId(1),
                flight_number: FlightNumber(100),
                fare_class: ECONOMY,
                seat: Some(SeatId::from("1B")),
                reference: None,
            }],
            waitlist: vec![WaitlistRecord {
                passenger_id: PassengerId(2),
                flight_number: FlightNumber(100),
                fare_class: ECONOMY,
                sequence: None,
            }],
            ..LoadData::default()
        };
        let engine = launch(&Config::default(), data).unwrap();
        assert_eq!(
            engine.booking(PassengerId(2), FlightNumber(100)).unwrap().seat,
            SeatId::from("1A")
        );
        engine.check_invariants().unwrap();
    }

    #[test]
    fn launch_rejects_inconsistent_data() {
        let base = LoadData {
            flights: vec![flight_record(100, &[(ECONOMY, 1)])],
            ..LoadData::default()
        };
        let booking = |passenger, seat: Option<&str>| BookingRecord {
            passenger_id: PassengerId(passenger),
            flight_number: FlightNumber(100),
            fare_class: ECONOMY,
            seat: seat.map(SeatId::from),
            reference: None,
        };

        let mut duplicate_flight = base.clone();
        duplicate_flight.flights.push(flight_record(100, &[]));
        let mut foreign_seat = base.clone();
        foreign_seat.bookings.push(booking(1, Some("9Z")));
        let mut overbooked = base.clone();
        overbooked.bookings.extend([booking(1, None), booking(2, None)]);
        let mut double = base.clone();
        double.bookings.push(booking(1, None));
        double.waitlist.push(WaitlistRecord {
            passenger_id: PassengerId(1),
            flight_number: FlightNumber(100),
            fare_class: ECONOMY,
            sequence: None,
        });

        let mut last_sequence = base.clone();
        last_sequence.waitlist.push(WaitlistRecord {
            passenger_id: PassengerId(2),
            flight_number: FlightNumber(100),
            fare_class: ECONOMY,
            sequence: Some(u64::MAX),
        });

        let config = Config::default();
        assert!(matches!(
            launch(&config, last_sequence),
            Err(EngineError::InvalidRecord(_))
        ));
        assert!(matches!(
            launch(&config, duplicate_flight),
            Err(EngineError::DuplicateFlight(_))
        ));
        assert!(matches!(
            launch(&config, foreign_seat),
            Err(EngineError::UnknownSeat { .. })
        ));
        assert!(matches!(
            launch(&config, overbooked),
            Err(EngineError::Overbooked { .. })
        ));
        assert!(matches!(
            launch(&config, double),
            Err(EngineError::AlreadyBookedOrWaitlisted { .. })
        ));
        assert!(matches!(
            launch(&Config { seats_per_row: 0 }, base),
            Err(EngineError::InvalidRecord(_))
        ));
    }
}
