use std::collections::HashSet;

use eyre::{eyre, Result};
use flight_seats_core::{BookResult, FlightNumber, PassengerId, SeatId};
use flight_seats_tests::TestCtx;

/// Seat of a confirmed booking
#[allow(unused)]
pub fn confirmed(result: BookResult) -> Result<SeatId> {
    match result {
        BookResult::Confirmed { seat, .. } => Ok(seat),
        BookResult::Waitlisted { position } => Err(eyre!(
            "The booking must have been confirmed, but it is on the waitlist at position {position}."
        )),
    }
}

/// Checks that no seat of `flight` was lost or handed out twice.
#[allow(unused)]
pub async fn assert_conserved(ctx: &TestCtx, flight: FlightNumber) -> Result<()> {
    let info = ctx.api.flight_info(flight).await??;
    for class in &info.classes {
        assert_eq!(
            class.available + class.assigned,
            class.capacity,
            "Available and assigned seats of {flight} {} must add up to its capacity.",
            class.fare_class
        );
        assert!(
            class.available == 0 || class.waitlist.is_empty(),
            "{flight} {} must not have free seats while passengers are waiting.",
            class.fare_class
        );
    }
    let seats: HashSet<_> = info.manifest.iter().map(|entry| &entry.seat).collect();
    assert_eq!(
        seats.len(),
        info.manifest.len(),
        "No seat of {flight} may be assigned twice."
    );
    Ok(())
}

/// All passengers holding a seat on or waiting for `flight`
#[allow(unused)]
pub async fn active_passengers(ctx: &TestCtx, flight: FlightNumber) -> Result<HashSet<PassengerId>> {
    let info = ctx.api.flight_info(flight).await??;
    let booked = info.manifest.iter().map(|entry| entry.passenger_id);
    let waiting = info.classes.iter().flat_map(|class| class.waitlist.iter().copied());
    Ok(booked.chain(waiting).collect())
}
