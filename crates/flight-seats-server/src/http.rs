//! 🏗 HTTP request implementation

use std::io;
use std::io::Read;

use flight_seats_core::{FlightNumber, PassengerId, RequestKind, RequestMethod};
use tiny_http::{Header, Response};

const ROUTES: &str = "✈ could not find the service you are looking for!

Valid requests are:
  POST /api/book              X-Passenger-Id, X-Flight-Number, body: fare class
  POST /api/cancel            X-Passenger-Id, X-Flight-Number
  GET  /api/status            X-Passenger-Id
  GET  /api/flight_info       X-Flight-Number
  POST /api/admin/promote     X-Flight-Number, body: fare class or empty
  GET  /api/admin/flights
  GET  /api/admin/export
  GET  /api/debug(.*)
  POST /api/debug(.*)";

struct HTTPRequest(tiny_http::Request);

impl flight_seats_core::RawRequest for HTTPRequest {
    fn url(&self) -> &str {
        self.0.url()
    }

    fn method(&self) -> RequestMethod {
        match self.0.method() {
            tiny_http::Method::Post => RequestMethod::Post,
            // `parse` only lets GET and POST through
            _ => RequestMethod::Get,
        }
    }

    fn read_string(&mut self) -> io::Result<String> {
        let mut s = String::with_capacity(self.0.body_length().unwrap_or(0));
        self.0.as_reader().read_to_string(&mut s)?;
        Ok(s)
    }

    fn respond_with_err(self: Box<Self>, status: u16, err: String) {
        respond(self.0, Response::from_string(err).with_status_code(status));
    }

    fn respond_with_json(self: Box<Self>, json: String) {
        let mut res = Response::from_string(json).with_status_code(200);
        add_header(&mut res, "Content-Type", "application/json");
        respond(self.0, res);
    }

    fn respond_with_string(self: Box<Self>, s: String) {
        respond(self.0, Response::from_string(s).with_status_code(200));
    }
}

/// Add CORS headers to `res` and send it
fn respond<R: Read>(rq: tiny_http::Request, mut res: Response<R>) {
    add_response_cors_headers(&mut res);
    if let Err(err) = rq.respond(res) {
        tracing::warn!(%err, "HTTP response failed");
    }
}

/// Parse the given HTTP request
///
/// If [`None`] is returned, the request was already answered with a
/// corresponding error message.
pub fn parse(rq: tiny_http::Request) -> Option<flight_seats_core::Request> {
    use tiny_http::Method::*;

    let kind = match (rq.method(), rq.url()) {
        (Options, _) => {
            respond(rq, Response::empty(204));
            return None;
        }
        (Post, "/api/book") => RequestKind::Book,
        (Post, "/api/cancel") => RequestKind::Cancel,
        (Get, "/api/status") => RequestKind::Status,
        (Get, "/api/flight_info") => RequestKind::FlightInfo,
        (Post, "/api/admin/promote") => RequestKind::Promote,
        (Get, "/api/admin/flights") => RequestKind::ListFlights,
        (Get, "/api/admin/export") => RequestKind::Export,
        (Get, url) | (Post, url) => {
            if url.starts_with("/api/debug") {
                RequestKind::Debug
            } else {
                respond(rq, Response::from_string(ROUTES).with_status_code(404));
                return None;
            }
        }
        _ => {
            respond(rq, Response::empty(405));
            return None;
        }
    };

    let (passenger, flight) = match ids(&rq) {
        Ok(ids) => ids,
        Err(msg) => {
            respond(rq, Response::from_string(msg).with_status_code(400));
            return None;
        }
    };

    Some(flight_seats_core::Request::from_raw(
        kind,
        passenger,
        flight,
        Box::new(HTTPRequest(rq)),
    ))
}

/// Read the passenger id and flight number headers
fn ids(
    rq: &tiny_http::Request,
) -> Result<(Option<PassengerId>, Option<FlightNumber>), &'static str> {
    let mut passenger = None;
    let mut flight = None;
    for hdr in rq.headers() {
        if hdr.field.equiv("x-passenger-id") {
            let id = hdr
                .value
                .as_str()
                .parse()
                .map_err(|_| "X-Passenger-Id must be a decimal passenger id")?;
            passenger = Some(id);
        } else if hdr.field.equiv("x-flight-number") {
            let number = hdr
                .value
                .as_str()
                .parse()
                .map_err(|_| "X-Flight-Number must be a decimal flight number")?;
            flight = Some(number);
        }
    }
    Ok((passenger, flight))
}

fn add_header<R: Read>(res: &mut Response<R>, field: &str, value: &str) {
    if let Ok(header) = Header::from_bytes(field.as_bytes(), value.as_bytes()) {
        res.add_header(header);
    }
}

/// Add CORS headers to `res`
fn add_response_cors_headers<R: Read>(res: &mut Response<R>) {
    add_header(res, "Access-Control-Request-Method", "*");
    add_header(res, "Access-Control-Allow-Origin", "*");
    add_header(res, "Access-Control-Allow-Headers", "*");
    add_header(res, "Access-Control-Expose-Headers", "*");
}
