use crate::{
    Config,
    client::openweather::OpenWeatherClient,
    model::{Units, WeatherReport},
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};
use thiserror::Error;

pub mod openweather;

/// Failure of a single provider call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// The provider answered with a non-2xx status.
    #[error("HTTP error {status}: {message}")]
    Transport { status: u16, message: String },

    /// No HTTP response: connection refused, DNS failure or timeout.
    #[error("Network error: {0}")]
    Network(String),

    /// Anything else, including bodies that cannot be decoded.
    #[error("{0}")]
    Unknown(String),
}

#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn fetch_by_city(
        &self,
        city: &str,
        api_key: &str,
        units: Units,
    ) -> Result<WeatherReport, ClientError>;

    async fn fetch_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
        api_key: &str,
        units: Units,
    ) -> Result<WeatherReport, ClientError>;
}

/// Construct the OpenWeather client from config.
pub fn client_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherClient>> {
    let client = OpenWeatherClient::from_config(config)?;
    Ok(Arc::new(client))
}
