//! Dispatch of front-end requests to the engine

use flight_seats_core::{EngineError, Request, RequestHandler, RequestKind};
use serde::Serialize;

use crate::Engine;

impl RequestHandler for Engine {
    fn handle(&self, mut rq: Request) {
        match *rq.kind() {
            RequestKind::Book => {
                let (Some(passenger), Some(flight)) = (rq.passenger_id(), rq.flight_number())
                else {
                    return rq.respond_with_err(400, "Book needs a passenger id and a flight number");
                };
                match rq.read_fare_class() {
                    Ok(Some(class)) => reply(rq, self.book(passenger, flight, class)),
                    Ok(None) => rq.respond_with_err(400, "Book needs a fare class"),
                    Err(e) => rq.respond_with_err(400, e),
                }
            }
            RequestKind::Cancel => {
                let (Some(passenger), Some(flight)) = (rq.passenger_id(), rq.flight_number())
                else {
                    return rq
                        .respond_with_err(400, "Cancel needs a passenger id and a flight number");
                };
                reply(rq, self.cancel(passenger, flight));
            }
            RequestKind::Status => match rq.passenger_id() {
                Some(passenger) => rq.respond_with(&self.status(passenger)),
                None => rq.respond_with_err(400, "Status needs a passenger id"),
            },
            RequestKind::FlightInfo => match rq.flight_number() {
                Some(flight) => reply(rq, self.flight_info(flight)),
                None => rq.respond_with_err(400, "FlightInfo needs a flight number"),
            },
            RequestKind::Promote => {
                let Some(flight) = rq.flight_number() else {
                    return rq.respond_with_err(400, "Promote needs a flight number");
                };
                match rq.read_fare_class() {
                    Ok(Some(class)) => reply(rq, self.promote(flight, class)),
                    Ok(None) => reply(rq, self.promote_all(flight)),
                    Err(e) => rq.respond_with_err(400, e),
                }
            }
            RequestKind::ListFlights => rq.respond_with(&self.flight_numbers()),
            RequestKind::Export => rq.respond_with(&self.export()),
            RequestKind::Debug => match self.check_invariants() {
                Ok(()) => rq.respond_with_string("all invariants hold"),
                Err(e) => rq.respond_with_error(&e),
            },
        }
    }
}

fn reply<T: Serialize>(rq: Request, result: Result<T, EngineError>) {
    match result {
        Ok(value) => rq.respond_with(&value),
        Err(e) => rq.respond_with_error(&e),
    }
}
