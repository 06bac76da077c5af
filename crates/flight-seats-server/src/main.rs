//! Server implementation

#![warn(missing_docs)]

mod fleet;
mod http;

use std::path::PathBuf;
use std::thread;

use eyre::{eyre, Result, WrapErr};
use flight_seats_core::{Config, EngineEvent, RequestHandler};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Command line options
#[derive(Debug)]
struct Opts {
    /// Configuration of the allocation engine
    config: Config,

    /// Port for the HTTP server to listen on
    port: u16,
    /// Host for the HTTP server to listen on
    host: String,
    /// Number of request handler threads
    handler_threads: u32,

    /// Fleet file to load flights, passengers and bookings from
    fleet: Option<PathBuf>,
}

impl Opts {
    fn from_args() -> Result<Self> {
        let mut opts = Opts {
            config: Config::default(),
            port: 8585,
            host: String::from("127.0.0.1"),
            handler_threads: 16,
            fleet: None,
        };

        let mut option: Option<String> = None;
        for arg in std::env::args().skip(1) {
            if let Some(opt) = option {
                match opt.as_str() {
                    "-port" => opts.port = arg.parse().wrap_err("-port takes a decimal u16")?,
                    "-host" => opts.host = arg,
                    "-handler-threads" => {
                        opts.handler_threads = arg
                            .parse()
                            .wrap_err("-handler-threads takes a decimal u32")?
                    }
                    "-fleet" => opts.fleet = Some(PathBuf::from(arg)),
                    "-seats-per-row" => {
                        opts.config.seats_per_row =
                            arg.parse().wrap_err("-seats-per-row takes a decimal u8")?
                    }
                    _ => return Err(eyre!("unknown option {opt}")),
                }
                option = None;
            } else {
                option = Some(arg);
            }
        }
        if let Some(opt) = option {
            return Err(eyre!("option {opt} is missing its value"));
        }
        if opts.handler_threads == 0 {
            return Err(eyre!("-handler-threads must be at least 1"));
        }

        Ok(opts)
    }
}

fn http_loop<H: RequestHandler>(server: &tiny_http::Server, handler: &H) {
    loop {
        let rq = match server.recv() {
            Ok(rq) => rq,
            Err(err) => {
                tracing::error!(%err, "HTTP receive failed");
                continue;
            }
        };
        if let Some(rq) = http::parse(rq) {
            tracing::debug!(?rq, "handling request");
            handler.handle(rq);
        }
    }
}

/// Log every engine event until the engine goes away
fn event_log(events: impl IntoIterator<Item = EngineEvent>) {
    for event in events {
        tracing::info!(?event, "engine event");
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let opts = Opts::from_args()?;
    let data = match &opts.fleet {
        Some(path) => fleet::load(path)?,
        None => {
            tracing::warn!("no fleet file given, starting without flights");
            Default::default()
        }
    };

    let engine = flight_seats_engine::launch(&opts.config, data)
        .wrap_err("could not start the allocation engine")?;

    let server = tiny_http::Server::http((opts.host.as_str(), opts.port))
        .map_err(|err| eyre!("could not listen on {}:{}: {err}", opts.host, opts.port))?;
    tracing::info!(
        host = %opts.host,
        port = opts.port,
        threads = opts.handler_threads,
        "listening"
    );

    let events = engine.subscribe();
    thread::scope(|s| -> Result<()> {
        thread::Builder::new()
            .name(String::from("event_log"))
            .spawn_scoped(s, move || event_log(events))?;
        for i in 0..opts.handler_threads {
            thread::Builder::new()
                .name(format!("handler_{i}"))
                .spawn_scoped(s, || http_loop(&server, &engine))?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use flight_seats_core::{FareClass, FlightNumber, FlightRecord, LoadData, PassengerId};
    use tracing::Level;

    use super::*;

    /// Log output shared between the subscriber and the test
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn each_event_is_logged_once() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let data = LoadData {
                flights: vec![FlightRecord {
                    flight_number: FlightNumber(100),
                    departure_airport: "LHR".into(),
                    arrival_airport: "JFK".into(),
                    departure_date: "2024-05-01T09:30:00".parse().unwrap(),
                    capacities: [(FareClass::Economy, 1)].into_iter().collect(),
                }],
                ..LoadData::default()
            };
            let engine = flight_seats_engine::launch(&Config::default(), data).unwrap();
            let events = engine.subscribe();
            let flight = FlightNumber(100);

            // confirmed, waitlisted, then cancelled and promoted
            engine.book(PassengerId(1), flight, FareClass::Economy).unwrap();
            engine.book(PassengerId(2), flight, FareClass::Economy).unwrap();
            engine.cancel(PassengerId(1), flight).unwrap();
            drop(engine);

            event_log(events);
        });

        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert_eq!(logs.matches("engine event").count(), 4, "{logs}");
    }
}
