//! :airplane: Seat allocation and waitlist management for flights.
//!
//! The system is made of the [seat pools][seat_pool], [waitlists][waitlist]
//! and [booking ledger][ledger] of every [flight], found through the
//! [flight index][flight_index] and driven by the allocation [engine].
//!
//! Front ends talk to the [`Engine`] either directly or through the
//! [`RequestHandler`](flight_seats_core::RequestHandler) implementation in
//! [handler].

#![allow(rustdoc::private_intra_doc_links)]
use flight_seats_core::{Config, EngineError, LoadData};

mod directory;
mod engine;
mod events;
mod flight;
mod flight_index;
mod handler;
mod ledger;
mod per_class;
mod seat_map;
mod seat_pool;
mod waitlist;

pub use engine::Engine;
use flight::Flight;
use flight_index::FlightIndex;

/// Entrypoint of the allocation engine
///
/// Builds every flight with full seat pools, registers the passengers, and
/// resumes the bookings and waitlist entries of `data`. Resumed waitlists
/// are then promoted into any seats that are still free.
pub fn launch(config: &Config, data: LoadData) -> Result<Engine, EngineError> {
    if config.seats_per_row == 0 || config.seats_per_row > Config::MAX_SEATS_PER_ROW {
        return Err(EngineError::InvalidRecord(format!(
            "seats per row must be between 1 and {}, got {}",
            Config::MAX_SEATS_PER_ROW,
            config.seats_per_row
        )));
    }

    let mut flights = FlightIndex::new();
    for record in data.flights {
        flights.insert(Flight::new(record, config)?)?;
    }

    #[cfg(feature = "logging")]
    let (bookings, waitlisted) = (data.bookings.len(), data.waitlist.len());

    let engine = Engine::new(*config, flights);
    for passenger in data.passengers {
        engine.register_passenger(passenger.passenger_id, passenger.name);
    }
    for booking in &data.bookings {
        engine.restore_booking(booking)?;
    }
    engine.restore_waitlist(data.waitlist)?;
    for number in engine.flight_numbers() {
        engine.promote_all(number)?;
    }

    #[cfg(feature = "logging")]
    tracing::info!(
        flights = engine.flight_numbers().len(),
        bookings,
        waitlisted,
        "engine launched"
    );

    Ok(engine)
}
