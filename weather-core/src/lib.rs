//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client and its error taxonomy
//! - A repository that turns one provider call into `Loading` + a terminal envelope
//! - Use cases and a state holder with one observable slot per query kind
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod client;
pub mod config;
pub mod envelope;
pub mod location;
pub mod model;
pub mod repository;
pub mod state;
pub mod usecase;

pub use client::{ClientError, WeatherClient, client_from_config, openweather::OpenWeatherClient};
pub use config::Config;
pub use envelope::ResultEnvelope;
pub use location::{LocationFailure, LocationFix};
pub use model::{Units, WeatherQuery, WeatherReport};
pub use repository::{RemoteWeatherRepository, WeatherRepository, WeatherStream};
pub use state::{WeatherState, WeatherStateHolder};
pub use usecase::{GetWeatherByCity, GetWeatherByLocation};

use std::sync::Arc;

/// Wire client, repository, use cases and state holder from config.
pub fn state_holder_from_config(config: &Config) -> anyhow::Result<WeatherStateHolder> {
    let client = client_from_config(config)?;
    let repo: Arc<dyn WeatherRepository> = Arc::new(RemoteWeatherRepository::new(
        client,
        config.api_key_or_empty(),
        config.units,
    ));

    Ok(WeatherStateHolder::new(
        GetWeatherByCity::new(Arc::clone(&repo)),
        GetWeatherByLocation::new(repo),
    ))
}
