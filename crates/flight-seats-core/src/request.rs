use std::io;

use serde::Serialize;

use crate::{EngineError, FareClass, FlightNumber, PassengerId};

/// Kind of the request
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(u8)]
pub enum RequestKind {
    /// Book a seat for a passenger, or waitlist them if the class is full
    ///
    /// Needs a passenger id, a flight number and the fare class as body.
    Book,

    /// Cancel a passenger's booking or waitlist entry on a flight
    ///
    /// Needs a passenger id and a flight number.
    Cancel,

    /// Report where a passenger stands
    ///
    /// Needs a passenger id.
    Status,

    /// Describe a flight, its occupancy and its seat manifest
    ///
    /// Needs a flight number.
    FlightInfo,

    /// Promote waitlisted passengers of a flight into free seats
    ///
    /// Needs a flight number; the body names a fare class or is empty to
    /// promote every class.
    Promote,

    /// List all flight numbers
    ListFlights,

    /// Dump the complete engine state in load format
    Export,

    /// Useful for sending information for debugging
    Debug,
}

/// HTTP request method
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum RequestMethod {
    /// GET request
    Get,
    /// POST request, may have a payload
    Post,
}

/// Request sent by a front end
pub struct Request {
    kind: RequestKind,
    passenger: Option<PassengerId>,
    flight: Option<FlightNumber>,
    raw: Box<dyn RawRequest + Send>,
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("kind", &self.kind)
            .field("passenger", &self.passenger)
            .field("flight", &self.flight)
            .field("raw", &format_args!(".."))
            .finish()
    }
}

/// Interface for handling requests from a front end
pub trait RequestHandler {
    /// Handle a request
    ///
    /// This method may be called concurrently from different threads.
    fn handle(&self, request: Request);
}

/// A raw request, implemented by the transport (HTTP server, test mock)
pub trait RawRequest {
    /// Get the URL
    fn url(&self) -> &str;
    /// Get the request method
    fn method(&self) -> RequestMethod;

    /// Read the request body as string
    fn read_string(&mut self) -> io::Result<String>;

    /// Respond with an error status and message
    fn respond_with_err(self: Box<Self>, status: u16, err: String);
    /// Respond with a JSON document
    fn respond_with_json(self: Box<Self>, json: String);
    /// Respond with plain text
    fn respond_with_string(self: Box<Self>, s: String);
}

impl Request {
    /// Get the request's kind
    #[inline]
    pub fn kind(&self) -> &RequestKind {
        &self.kind
    }

    /// Get the passenger id, if the front end supplied one
    #[inline]
    pub fn passenger_id(&self) -> Option<PassengerId> {
        self.passenger
    }

    /// Get the flight number, if the front end supplied one
    #[inline]
    pub fn flight_number(&self) -> Option<FlightNumber> {
        self.flight
    }

    /// Get the request URL
    #[inline]
    #[allow(unused)]
    pub fn url(&self) -> &str {
        self.raw.url()
    }

    /// Get the request method
    #[inline]
    #[allow(unused)]
    pub fn method(&self) -> RequestMethod {
        self.raw.method()
    }

    /// Read the payload as a UTF-8 string
    ///
    /// This method has side effects and should be called only once per
    /// request.
    #[inline]
    pub fn read_string(&mut self) -> io::Result<String> {
        self.raw.read_string()
    }

    /// Read the fare class from the payload
    ///
    /// An empty payload yields `Ok(None)`. Like [`Self::read_string()`], this
    /// consumes the payload.
    pub fn read_fare_class(&mut self) -> Result<Option<FareClass>, String> {
        let body = self.raw.read_string().map_err(|e| e.to_string())?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        body.parse().map(Some).map_err(|e| format!("{e}"))
    }

    /// Respond with an error status and message
    #[inline]
    pub fn respond_with_err(self, status: u16, err: impl Into<String>) {
        self.raw.respond_with_err(status, err.into());
    }

    /// Respond with the status and message matching an engine error
    pub fn respond_with_error(self, err: &EngineError) {
        self.respond_with_err(status_code(err), err.to_string());
    }

    /// Respond with `value` encoded as JSON
    pub fn respond_with<T: Serialize>(self, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.raw.respond_with_json(json),
            Err(e) => self.respond_with_err(500, format!("could not encode response: {e}")),
        }
    }

    /// Respond with an arbitrary string
    #[inline]
    pub fn respond_with_string(self, s: impl Into<String>) {
        self.raw.respond_with_string(s.into());
    }

    /// Create a new request from a [`RawRequest`]
    #[inline]
    pub fn from_raw(
        kind: RequestKind,
        passenger: Option<PassengerId>,
        flight: Option<FlightNumber>,
        raw: Box<dyn RawRequest + Send>,
    ) -> Self {
        Self {
            kind,
            passenger,
            flight,
            raw,
        }
    }
}

/// HTTP status code reported for `err`
pub fn status_code(err: &EngineError) -> u16 {
    match err {
        EngineError::FlightNotFound(_) | EngineError::NotFound { .. } => 404,
        EngineError::AlreadyBookedOrWaitlisted { .. }
        | EngineError::AlreadyWaitlisted { .. }
        | EngineError::DuplicateBooking { .. }
        | EngineError::DuplicateFlight(_) => 409,
        EngineError::InvalidRecord(_) => 400,
        EngineError::UnknownSeat { .. }
        | EngineError::SeatNotAssigned { .. }
        | EngineError::Overbooked { .. }
        | EngineError::InvariantViolated(_) => 422,
    }
}
