//! Generation of seat labels from class capacities

use flight_seats_core::{FareClass, FlightRecord, SeatId};

use crate::per_class::PerClass;

/// Lay out the cabin of `flight`
///
/// Classes are placed in cabin order, each starting on a fresh row. Rows
/// are numbered from 1 and seats within a row are lettered from `A`. The
/// seats of each class are returned in label order.
pub fn layout(flight: &FlightRecord, seats_per_row: u8) -> PerClass<Vec<SeatId>> {
    let per_row = u32::from(seats_per_row.max(1));
    let mut next_row = 1;
    PerClass::from_fn(|class: FareClass| {
        let capacity = flight.capacity(class);
        let seats = (0..capacity)
            .map(|i| {
                let row = next_row + i / per_row;
                let letter = char::from(b'A' + (i % per_row) as u8);
                SeatId::new(format!("{row}{letter}"))
            })
            .collect();
        next_row += capacity.div_ceil(per_row);
        seats
    })
}
