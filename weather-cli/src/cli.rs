use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use weather_core::{
    Config, LocationFailure, LocationFix, ResultEnvelope, Units, WeatherReport, WeatherState,
    state_holder_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather from OpenWeather")]
pub struct Cli {
    /// Override the configured unit system (standard, metric, imperial).
    #[arg(long, global = true)]
    pub units: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current weather for a city.
    City {
        /// City name, e.g. "London" or "Paris,FR".
        name: String,
    },

    /// Show current weather for a coordinate pair.
    Locate {
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;
        if let Some(units) = self.units.as_deref() {
            config.units = Units::try_from(units)?;
        }
        if !config.has_api_key() && !matches!(self.command, Command::Configure) {
            warn!("No API key configured; run `weather configure` or set OPENWEATHER_API_KEY");
        }

        match self.command {
            Command::Configure => configure(config),
            Command::City { name } => {
                if name.trim().is_empty() {
                    return Err(anyhow!("City name must not be empty"));
                }
                let holder = state_holder_from_config(&config)?;
                let rx = holder.subscribe_city();
                holder.request_city_weather(name.trim());
                show(rx, config.units).await
            }
            Command::Locate { lat, lon } => {
                let holder = state_holder_from_config(&config)?;
                let rx = holder.subscribe_location();
                holder.on_location_result(coordinates(lat, lon));
                show(rx, config.units).await
            }
        }
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(key.trim().to_string());
    config.save()?;

    let path = Config::config_file_path()?;
    info!(path = %path.display(), "Configuration saved");
    println!("Saved API key to {}", path.display());
    Ok(())
}

/// Stands in for a location sensor: both coordinates present and in range
/// form a fix, anything else is a failure.
fn coordinates(lat: Option<f64>, lon: Option<f64>) -> Result<LocationFix, LocationFailure> {
    match (lat, lon) {
        (Some(lat), Some(lon)) if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) => {
            Ok(LocationFix::new(lat, lon))
        }
        (Some(lat), Some(lon)) => {
            Err(LocationFailure::Other(format!("coordinates out of range ({lat}, {lon})")))
        }
        _ => Err(LocationFailure::Unavailable),
    }
}

/// Wait for the slot to settle and print it.
async fn show(mut rx: watch::Receiver<WeatherState>, units: Units) -> anyhow::Result<()> {
    let state = rx
        .wait_for(|s| s.is_terminal())
        .await
        .context("Weather state was dropped before a result arrived")?
        .clone();

    debug!(?state, "Terminal state reached");

    match state {
        ResultEnvelope::Success(report) => {
            print_report(&report, units);
            Ok(())
        }
        ResultEnvelope::Error(message) => Err(anyhow!(message)),
        ResultEnvelope::Idle | ResultEnvelope::Loading => {
            Err(anyhow!("Weather lookup ended without a result"))
        }
    }
}

fn print_report(report: &WeatherReport, units: Units) {
    for line in render::report_lines(report, units) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_in_range_form_a_fix() {
        assert_eq!(coordinates(Some(51.5), Some(-0.12)), Ok(LocationFix::new(51.5, -0.12)));
    }

    #[test]
    fn missing_coordinates_are_unavailable() {
        assert_eq!(coordinates(Some(1.0), None), Err(LocationFailure::Unavailable));
        assert_eq!(coordinates(None, None), Err(LocationFailure::Unavailable));
    }

    #[test]
    fn out_of_range_coordinates_fail() {
        let err = coordinates(Some(91.0), Some(0.0)).unwrap_err();
        assert!(err.message().starts_with("Error getting location: coordinates out of range"));
    }

    #[test]
    fn parses_negative_coordinates() {
        let cli = Cli::try_parse_from(["weather", "locate", "--lat", "-33.9", "--lon", "-70.6"])
            .expect("args parse");
        match cli.command {
            Command::Locate { lat, lon } => {
                assert_eq!(lat, Some(-33.9));
                assert_eq!(lon, Some(-70.6));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_global_units_flag() {
        let cli = Cli::try_parse_from(["weather", "city", "Oslo", "--units", "imperial"])
            .expect("args parse");
        assert_eq!(cli.units.as_deref(), Some("imperial"));
    }
}
