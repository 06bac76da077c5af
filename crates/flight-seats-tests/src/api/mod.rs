use std::sync::Arc;

use eyre::Result;
use flight_seats_core::{
    BookResult, CancelResult, FareClass, FlightNumber, FlightSnapshot, LoadData, PassengerId,
    Promotion, RequestKind, StatusResult,
};
use flume::Sender;
use nanorand::Rng;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::oneshot;

pub mod mock;

#[derive(Debug, Error)]
#[error("Error {status}: {msg}")]
pub struct ApiError {
    pub status: u16,
    pub msg: String,
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug)]
enum Response {
    Error { status: u16, msg: String },
    Json(String),
    Text(String),
}

impl Response {
    fn into_api_result<T: DeserializeOwned>(self, rq_kind: RequestKind) -> Result<ApiResult<T>> {
        match self {
            Response::Error { status, msg } => Ok(Err(ApiError { status, msg })),
            Response::Json(json) => Ok(Ok(serde_json::from_str(&json)?)),
            resp => panic!("{rq_kind:?} must not be answered by {resp:?}"),
        }
    }

    fn into_body(self) -> ApiResult<String> {
        match self {
            Response::Error { status, msg } => Err(ApiError { status, msg }),
            Response::Json(s) | Response::Text(s) => Ok(s),
        }
    }
}

struct RequestMsg {
    kind: RequestKind,
    options: RequestOptions,
    response_channel: oneshot::Sender<Response>,
}

pub struct Api {
    /// One channel per handler thread
    channels: Arc<Vec<Sender<RequestMsg>>>,

    my_channel: Sender<RequestMsg>,
    my_index: usize,
}

impl Api {
    fn new(channels: Vec<Sender<RequestMsg>>) -> Self {
        let my_channel = channels[0].clone();
        Self {
            channels: Arc::new(channels),
            my_channel,
            my_index: 0,
        }
    }
}

impl Clone for Api {
    fn clone(&self) -> Self {
        let my_index = (self.my_index + 1) % self.channels.len();
        Self {
            channels: self.channels.clone(),
            my_channel: self.channels[my_index].clone(),
            my_index,
        }
    }
}

impl Api {
    async fn make_request(&self, kind: RequestKind, options: RequestOptions) -> Result<Response> {
        let (sender, receiver) = oneshot::channel();
        let msg = RequestMsg {
            kind,
            options,
            response_channel: sender,
        };
        self.my_channel.send_async(msg).await?;
        Ok(receiver.await?)
    }

    async fn typed<T: DeserializeOwned>(
        &self,
        kind: RequestKind,
        options: RequestOptions,
    ) -> Result<ApiResult<T>> {
        self.make_request(kind, options).await?.into_api_result(kind)
    }

    /// Send a request exactly as given and return the raw response body
    pub async fn request(
        &self,
        kind: RequestKind,
        options: RequestOptions,
    ) -> Result<ApiResult<String>> {
        Ok(self.make_request(kind, options).await?.into_body())
    }

    pub async fn book(
        &self,
        passenger: PassengerId,
        flight: FlightNumber,
        class: FareClass,
    ) -> Result<ApiResult<BookResult>> {
        let options = RequestOptions::new(passenger, flight).with_body(class.as_str());
        self.typed(RequestKind::Book, options).await
    }

    pub async fn cancel(
        &self,
        passenger: PassengerId,
        flight: FlightNumber,
    ) -> Result<ApiResult<CancelResult>> {
        let options = RequestOptions::new(passenger, flight);
        self.typed(RequestKind::Cancel, options).await
    }

    pub async fn status(&self, passenger: PassengerId) -> Result<ApiResult<StatusResult>> {
        let options = RequestOptions {
            passenger: Some(passenger),
            ..RequestOptions::default()
        };
        self.typed(RequestKind::Status, options).await
    }

    pub async fn flight_info(&self, flight: FlightNumber) -> Result<ApiResult<FlightSnapshot>> {
        let options = RequestOptions {
            flight: Some(flight),
            ..RequestOptions::default()
        };
        self.typed(RequestKind::FlightInfo, options).await
    }

    /// Promote in one class, or in every class if `class` is [`None`]
    pub async fn promote(
        &self,
        flight: FlightNumber,
        class: Option<FareClass>,
    ) -> Result<ApiResult<Vec<Promotion>>> {
        let options = RequestOptions {
            flight: Some(flight),
            body: class.map(|class| class.as_str().to_owned()),
            ..RequestOptions::default()
        };
        self.typed(RequestKind::Promote, options).await
    }

    pub async fn list_flights(&self) -> Result<ApiResult<Vec<FlightNumber>>> {
        self.typed(RequestKind::ListFlights, RequestOptions::default()).await
    }

    pub async fn export(&self) -> Result<ApiResult<LoadData>> {
        self.typed(RequestKind::Export, RequestOptions::default()).await
    }

    /// Ask the engine to verify its invariants
    pub async fn debug(&self) -> Result<ApiResult<String>> {
        self.request(RequestKind::Debug, RequestOptions::default()).await
    }

    /// Create a session for a passenger with a random id
    pub fn create_passenger_session(&self) -> PassengerSession {
        PassengerSession {
            api: self,
            passenger: PassengerId(nanorand::tls_rng().generate()),
        }
    }
}

/// Identifiers and payload sent along with a request
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    pub passenger: Option<PassengerId>,
    pub flight: Option<FlightNumber>,
    pub body: Option<String>,
}

impl RequestOptions {
    pub fn new(passenger: PassengerId, flight: FlightNumber) -> Self {
        Self {
            passenger: Some(passenger),
            flight: Some(flight),
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// A single passenger talking to the engine
pub struct PassengerSession<'a> {
    pub api: &'a Api,
    pub passenger: PassengerId,
}

impl PassengerSession<'_> {
    pub async fn book(
        &self,
        flight: FlightNumber,
        class: FareClass,
    ) -> Result<ApiResult<BookResult>> {
        self.api.book(self.passenger, flight, class).await
    }

    pub async fn cancel(&self, flight: FlightNumber) -> Result<ApiResult<CancelResult>> {
        self.api.cancel(self.passenger, flight).await
    }

    pub async fn status(&self) -> Result<ApiResult<StatusResult>> {
        self.api.status(self.passenger).await
    }
}
