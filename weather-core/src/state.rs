//! Per-screen state holder with one observable slot per query kind.
//!
//! Every write to a slot carries a request token. Issuing a new request,
//! resetting or reporting a failure mints a fresh token, and only the holder
//! of the latest token may publish. A response that arrives after being
//! superseded is dropped instead of overwriting newer state.

use futures_util::StreamExt;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tokio::{sync::watch, task::JoinHandle};
use tracing::debug;

use crate::{
    envelope::ResultEnvelope,
    location::{LocationFailure, LocationFix},
    model::WeatherReport,
    repository::WeatherStream,
    usecase::{GetWeatherByCity, GetWeatherByLocation},
};

pub type WeatherState = ResultEnvelope<WeatherReport>;

#[derive(Debug)]
struct Slot {
    name: &'static str,
    tx: watch::Sender<WeatherState>,
    latest: AtomicU64,
}

impl Slot {
    fn new(name: &'static str) -> Arc<Self> {
        let (tx, _rx) = watch::channel(WeatherState::Idle);
        Arc::new(Self { name, tx, latest: AtomicU64::new(0) })
    }

    fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, token: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == token
    }

    /// Returns whether subscribers were notified.
    fn publish(&self, token: u64, next: WeatherState) -> bool {
        self.tx.send_if_modified(|current| {
            if !self.is_current(token) || *current == next {
                return false;
            }
            *current = next;
            true
        })
    }

    fn snapshot(&self) -> WeatherState {
        self.tx.borrow().clone()
    }

    async fn drive(self: Arc<Self>, token: u64, mut states: WeatherStream) {
        while let Some(state) = states.next().await {
            if !self.is_current(token) {
                debug!(slot = self.name, token, "Request superseded, dropping result");
                return;
            }
            self.publish(token, state);
        }
    }
}

pub struct WeatherStateHolder {
    by_city: GetWeatherByCity,
    by_location: GetWeatherByLocation,
    city: Arc<Slot>,
    location: Arc<Slot>,
}

impl WeatherStateHolder {
    pub fn new(by_city: GetWeatherByCity, by_location: GetWeatherByLocation) -> Self {
        Self { by_city, by_location, city: Slot::new("city"), location: Slot::new("location") }
    }

    /// Starts a city lookup on the tokio runtime. Must be called from within a
    /// runtime context.
    pub fn request_city_weather(&self, city: &str) -> JoinHandle<()> {
        let token = self.city.issue();
        debug!(%city, token, "City weather requested");
        let states = self.by_city.execute(city);
        tokio::spawn(Arc::clone(&self.city).drive(token, states))
    }

    /// Starts a coordinate lookup on the tokio runtime. Must be called from
    /// within a runtime context.
    pub fn request_location_weather(&self, latitude: f64, longitude: f64) -> JoinHandle<()> {
        let token = self.location.issue();
        debug!(latitude, longitude, token, "Location weather requested");
        let states = self.by_location.execute(latitude, longitude);
        tokio::spawn(Arc::clone(&self.location).drive(token, states))
    }

    pub fn reset_city_state(&self) {
        let token = self.city.issue();
        self.city.publish(token, WeatherState::Idle);
    }

    pub fn reset_location_state(&self) {
        let token = self.location.issue();
        self.location.publish(token, WeatherState::Idle);
    }

    /// Sets the location slot to `Error(message)` without touching the
    /// network, superseding any lookup still in flight.
    pub fn report_location_failure(&self, message: impl Into<String>) {
        let token = self.location.issue();
        self.location.publish(token, WeatherState::Error(message.into()));
    }

    /// Entry point for a location source: a fix starts a lookup, a failure is
    /// reported directly.
    pub fn on_location_result(
        &self,
        result: Result<LocationFix, LocationFailure>,
    ) -> Option<JoinHandle<()>> {
        match result {
            Ok(fix) => Some(self.request_location_weather(fix.latitude, fix.longitude)),
            Err(failure) => {
                self.report_location_failure(failure.message());
                None
            }
        }
    }

    pub fn city_state(&self) -> WeatherState {
        self.city.snapshot()
    }

    pub fn location_state(&self) -> WeatherState {
        self.location.snapshot()
    }

    pub fn subscribe_city(&self) -> watch::Receiver<WeatherState> {
        self.city.tx.subscribe()
    }

    pub fn subscribe_location(&self) -> watch::Receiver<WeatherState> {
        self.location.tx.subscribe()
    }
}

impl std::fmt::Debug for WeatherStateHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherStateHolder")
            .field("city", &self.city)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}
