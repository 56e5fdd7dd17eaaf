use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{
    Config,
    model::{Units, WeatherQuery, WeatherReport},
};

use super::{ClientError, WeatherClient};

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(
        base_url: impl Into<String>,
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http = Client::builder()
            .connect_timeout(connect_timeout)
            .read_timeout(read_timeout)
            .build()
            .map_err(|e| ClientError::Unknown(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { base_url: base_url.into().trim_end_matches('/').to_string(), http })
    }

    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        Self::new(config.base_url.clone(), config.connect_timeout(), config.read_timeout())
    }

    #[instrument(level = "debug", skip(self, api_key))]
    async fn fetch(
        &self,
        query: &WeatherQuery,
        api_key: &str,
        units: Units,
    ) -> Result<WeatherReport, ClientError> {
        let url = format!("{}{CURRENT_WEATHER_PATH}", self.base_url);

        let mut params: Vec<(&str, String)> = match query {
            WeatherQuery::City { name } => vec![("q", name.clone())],
            WeatherQuery::Coordinates { latitude, longitude } => {
                vec![("lat", latitude.to_string()), ("lon", longitude.to_string())]
            }
        };
        params.push(("appid", api_key.to_string()));
        params.push(("units", units.as_str().to_string()));

        debug!(%url, %query, "Sending OpenWeather request");

        let res = self.http.get(&url).query(&params).send().await.map_err(classify)?;

        let status = res.status();
        let body = res.text().await.map_err(classify)?;

        debug!(status = status.as_u16(), body = %truncate_body(&body), "OpenWeather response");

        if !status.is_success() {
            return Err(ClientError::Transport {
                status: status.as_u16(),
                message: provider_message(status, &body),
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| ClientError::Unknown(format!("Failed to parse OpenWeather JSON: {e}")))
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    async fn fetch_by_city(
        &self,
        city: &str,
        api_key: &str,
        units: Units,
    ) -> Result<WeatherReport, ClientError> {
        self.fetch(&WeatherQuery::city(city), api_key, units).await
    }

    async fn fetch_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
        api_key: &str,
        units: Units,
    ) -> Result<WeatherReport, ClientError> {
        self.fetch(&WeatherQuery::coordinates(latitude, longitude), api_key, units).await
    }
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<String>,
}

/// Reason phrase of the status line. The body's `message` is only used for
/// statuses without a canonical reason.
fn provider_message(status: StatusCode, body: &str) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .or_else(|| {
            serde_json::from_str::<OwErrorBody>(body)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.is_empty())
        })
        .unwrap_or_else(|| "Unknown error".to_string())
}

fn classify(err: reqwest::Error) -> ClientError {
    if err.is_connect() || err.is_timeout() {
        ClientError::Network(err.to_string())
    } else {
        ClientError::Unknown(err.to_string())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
