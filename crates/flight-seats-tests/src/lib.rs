use eyre::Result;
use flight_seats_core::{
    Config, FareClass, FlightNumber, FlightRecord, LoadData, PassengerId, PassengerRecord,
};
use flight_seats_engine::Engine;

mod api;
pub use api::{Api, ApiError, ApiResult, PassengerSession, RequestOptions};

/// Departure time given to every flight created by [`TestCtxBuilder::with_flight`]
pub const DEPARTURE: &str = "2024-05-01T09:30:00";

pub struct TestCtxBuilder {
    /// Count of request handler threads
    pub handler_threads: u16,
    /// Seats per cabin row
    pub seats_per_row: u8,
    /// Data the engine is launched from
    pub data: LoadData,
}

impl Default for TestCtxBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestCtxBuilder {
    /// Create a new test context builder without any flights
    pub fn new() -> Self {
        TestCtxBuilder {
            handler_threads: 2,
            seats_per_row: Config::default().seats_per_row,
            data: LoadData::default(),
        }
    }

    /// Add a flight from LHR to JFK with the given capacities
    ///
    /// Classes not listed have no seats.
    pub fn with_flight(mut self, number: u32, capacities: &[(FareClass, u32)]) -> Result<Self> {
        self.data.flights.push(FlightRecord {
            flight_number: FlightNumber(number),
            departure_airport: "LHR".into(),
            arrival_airport: "JFK".into(),
            departure_date: DEPARTURE.parse()?,
            capacities: capacities.iter().copied().collect(),
        });
        Ok(self)
    }

    /// Register a passenger name
    pub fn with_passenger(mut self, id: u64, name: &str) -> Self {
        self.data.passengers.push(PassengerRecord {
            passenger_id: PassengerId(id),
            name: name.into(),
        });
        self
    }

    /// Replace all load data, e.g. with the export of another context
    pub fn with_data(mut self, data: LoadData) -> Self {
        self.data = data;
        self
    }

    /// Set the number of request handler threads to use
    pub fn with_handler_threads(mut self, threads: u16) -> Self {
        assert_ne!(threads, 0);
        self.handler_threads = threads;
        self
    }

    /// Set the number of seats per cabin row
    pub fn with_seats_per_row(mut self, seats: u8) -> Self {
        self.seats_per_row = seats;
        self
    }

    /// Build the test context
    pub async fn build(self) -> Result<TestCtx> {
        let config = Config {
            seats_per_row: self.seats_per_row,
        };
        let (handler, api) = api::mock::start(self.handler_threads, config, self.data).await?;

        Ok(TestCtx {
            api,
            handler,
            handler_threads: self.handler_threads,
            drop_bomb: DropBomb,
        })
    }
}

/// Test context
pub struct TestCtx {
    /// API allowing to interact with the allocation engine
    pub api: Api,
    handler: api::mock::MockHandler,
    /// Number of request handler threads
    pub handler_threads: u16,

    drop_bomb: DropBomb,
}

impl TestCtx {
    /// Direct access to the engine, bypassing the request boundary
    pub fn engine(&self) -> &Engine {
        self.handler.engine()
    }

    /// Shut the handler threads down, then verify the allocation invariants
    pub async fn finish(self) -> Result<()> {
        std::mem::forget(self.drop_bomb);
        drop(self.api);
        self.handler.shutdown().await
    }
}

struct DropBomb;

impl Drop for DropBomb {
    fn drop(&mut self) {
        eprintln!("@TestAuthor: You should call `ctx.finish().await` to shut the engine down");
    }
}
