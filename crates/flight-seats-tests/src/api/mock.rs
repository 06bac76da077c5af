//! Mock API implementation directly using the `flight-seats-engine` crate

use std::sync::Arc;

use eyre::Result;
use flight_seats_core::{
    Config, LoadData, RawRequest, Request, RequestHandler, RequestKind, RequestMethod,
};
use flight_seats_engine::Engine;
use tokio::sync::oneshot;
use tokio::task::{self, JoinHandle};

use super::{Api, RequestMsg, Response};

pub struct MockHandler {
    engine: Arc<Engine>,
    join_handles: Vec<JoinHandle<()>>,
}

struct MockRawRequest {
    body: Option<String>,
    kind: RequestKind,
    response_channel: oneshot::Sender<Response>,
}

pub async fn start(threads: u16, config: Config, data: LoadData) -> Result<(MockHandler, Api)> {
    let engine = task::spawn_blocking(move || flight_seats_engine::launch(&config, data)).await??;
    let engine = Arc::new(engine);

    let it = (0..threads).map(|_| {
        let (sender, receiver) = flume::bounded::<RequestMsg>(65536);
        let engine = engine.clone();
        let handle = task::spawn_blocking(move || {
            let engine = &*engine;
            for msg in receiver.into_iter() {
                let raw = Box::new(MockRawRequest {
                    body: msg.options.body,
                    kind: msg.kind,
                    response_channel: msg.response_channel,
                });
                engine.handle(Request::from_raw(
                    msg.kind,
                    msg.options.passenger,
                    msg.options.flight,
                    raw,
                ))
            }
        });
        (sender, handle)
    });
    let (senders, join_handles) = it.unzip();

    let handler = MockHandler {
        engine,
        join_handles,
    };
    Ok((handler, Api::new(senders)))
}

impl MockHandler {
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Wait for all handler threads to drain their channels, then check the
    /// engine's invariants
    pub async fn shutdown(self) -> Result<()> {
        for handle in self.join_handles {
            handle.await?;
        }
        let engine = self.engine;
        task::spawn_blocking(move || engine.check_invariants()).await??;
        Ok(())
    }
}

impl RawRequest for MockRawRequest {
    fn url(&self) -> &str {
        use RequestKind::*;
        match self.kind {
            Book => "/api/book",
            Cancel => "/api/cancel",
            Status => "/api/status",
            FlightInfo => "/api/flight_info",
            Promote => "/api/admin/promote",
            ListFlights => "/api/admin/flights",
            Export => "/api/admin/export",
            Debug => "/api/debug",
        }
    }

    fn method(&self) -> RequestMethod {
        use RequestKind::*;
        match self.kind {
            Status | FlightInfo | ListFlights | Export | Debug => RequestMethod::Get,
            Book | Cancel | Promote => RequestMethod::Post,
        }
    }

    fn read_string(&mut self) -> std::io::Result<String> {
        Ok(self.body.take().unwrap_or_default())
    }

    fn respond_with_err(self: Box<Self>, status: u16, msg: String) {
        self.send(Response::Error { status, msg })
    }

    fn respond_with_json(self: Box<Self>, json: String) {
        self.send(Response::Json(json))
    }

    fn respond_with_string(self: Box<Self>, s: String) {
        self.send(Response::Text(s))
    }
}

impl MockRawRequest {
    fn send(self, response: Response) {
        // the test may have stopped waiting, e.g. after a timeout
        let _ = self.response_channel.send(response);
    }
}
