//! Turns one provider call into a two-step envelope sequence.

use futures_util::{
    StreamExt,
    stream::{self, BoxStream},
};
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::{
    client::{ClientError, WeatherClient},
    envelope::ResultEnvelope,
    model::{Units, WeatherReport},
};

pub type WeatherStream = BoxStream<'static, ResultEnvelope<WeatherReport>>;

const NETWORK_MESSAGE: &str = "Network error: Please check your internet connection";

/// Produces `Loading` followed by exactly one terminal envelope per call.
pub trait WeatherRepository: Send + Sync {
    fn observe_city_weather(&self, city: &str) -> WeatherStream;

    fn observe_location_weather(&self, latitude: f64, longitude: f64) -> WeatherStream;
}

#[derive(Debug, Clone)]
pub struct RemoteWeatherRepository {
    client: Arc<dyn WeatherClient>,
    api_key: String,
    units: Units,
}

impl RemoteWeatherRepository {
    pub fn new(client: Arc<dyn WeatherClient>, api_key: impl Into<String>, units: Units) -> Self {
        Self { client, api_key: api_key.into(), units }
    }
}

impl WeatherRepository for RemoteWeatherRepository {
    fn observe_city_weather(&self, city: &str) -> WeatherStream {
        let client = Arc::clone(&self.client);
        let api_key = self.api_key.clone();
        let units = self.units;
        let city = city.to_string();

        let terminal = async move {
            match client.fetch_by_city(&city, &api_key, units).await {
                Ok(report) => {
                    debug!(%city, ?report, "Weather data received");
                    ResultEnvelope::Success(report)
                }
                Err(err) => {
                    let message = city_error_message(&err, &city);
                    log_failure(&err, &message);
                    ResultEnvelope::Error(message)
                }
            }
        };

        stream::once(async { ResultEnvelope::Loading }).chain(stream::once(terminal)).boxed()
    }

    fn observe_location_weather(&self, latitude: f64, longitude: f64) -> WeatherStream {
        let client = Arc::clone(&self.client);
        let api_key = self.api_key.clone();
        let units = self.units;

        let terminal = async move {
            match client.fetch_by_coordinates(latitude, longitude, &api_key, units).await {
                Ok(report) => {
                    debug!(latitude, longitude, ?report, "Location weather data received");
                    ResultEnvelope::Success(report)
                }
                Err(err) => {
                    let message = location_error_message(&err);
                    log_failure(&err, &message);
                    ResultEnvelope::Error(message)
                }
            }
        };

        stream::once(async { ResultEnvelope::Loading }).chain(stream::once(terminal)).boxed()
    }
}

/// User-facing message for a failed city lookup, with per-status wording.
pub fn city_error_message(err: &ClientError, city: &str) -> String {
    match err {
        ClientError::Transport { status, message } => match status {
            401 => "Unauthorized: Invalid API key".to_string(),
            404 => format!("City not found: {city}"),
            429 => "Too many requests: Rate limit exceeded".to_string(),
            500 => "Server error: Please try again later".to_string(),
            _ => format!("HTTP error {status}: {message}"),
        },
        other => common_error_message(other),
    }
}

/// User-facing message for a failed coordinate lookup. Every HTTP status gets
/// the generic wording here.
pub fn location_error_message(err: &ClientError) -> String {
    match err {
        ClientError::Transport { status, message } => format!("HTTP error {status}: {message}"),
        other => common_error_message(other),
    }
}

fn common_error_message(err: &ClientError) -> String {
    match err {
        ClientError::Network(_) => NETWORK_MESSAGE.to_string(),
        ClientError::Unknown(message) if !message.is_empty() => {
            format!("Unexpected error: {message}")
        }
        _ => "Unexpected error: Unknown error occurred".to_string(),
    }
}

fn log_failure(err: &ClientError, message: &str) {
    match err {
        ClientError::Transport { status, .. } => error!(status, %message, "HTTP error"),
        ClientError::Network(cause) => warn!(%cause, "Network error"),
        ClientError::Unknown(cause) => error!(%cause, "Unexpected error"),
    }
}
