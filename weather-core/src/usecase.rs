use std::sync::Arc;

use crate::repository::{WeatherRepository, WeatherStream};

/// Looks up current weather by city name.
#[derive(Clone)]
pub struct GetWeatherByCity {
    repo: Arc<dyn WeatherRepository>,
}

impl GetWeatherByCity {
    pub fn new(repo: Arc<dyn WeatherRepository>) -> Self {
        Self { repo }
    }

    pub fn execute(&self, city: &str) -> WeatherStream {
        self.repo.observe_city_weather(city)
    }
}

/// Looks up current weather by coordinates.
#[derive(Clone)]
pub struct GetWeatherByLocation {
    repo: Arc<dyn WeatherRepository>,
}

impl GetWeatherByLocation {
    pub fn new(repo: Arc<dyn WeatherRepository>) -> Self {
        Self { repo }
    }

    pub fn execute(&self, latitude: f64, longitude: f64) -> WeatherStream {
        self.repo.observe_location_weather(latitude, longitude)
    }
}

impl std::fmt::Debug for GetWeatherByCity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GetWeatherByCity").finish_non_exhaustive()
    }
}

impl std::fmt::Debug for GetWeatherByLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GetWeatherByLocation").finish_non_exhaustive()
    }
}
