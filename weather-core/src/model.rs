use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// One lookup against the provider: either by city name or by coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    City { name: String },
    Coordinates { latitude: f64, longitude: f64 },
}

impl WeatherQuery {
    pub fn city(name: impl Into<String>) -> Self {
        WeatherQuery::City { name: name.into() }
    }

    pub fn coordinates(latitude: f64, longitude: f64) -> Self {
        WeatherQuery::Coordinates { latitude, longitude }
    }
}

impl std::fmt::Display for WeatherQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherQuery::City { name } => write!(f, "city '{name}'"),
            WeatherQuery::Coordinates { latitude, longitude } => {
                write!(f, "coordinates ({latitude}, {longitude})")
            }
        }
    }
}

/// Unit system requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Standard,
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Standard => "standard",
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Units::Standard => "K",
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn speed_suffix(&self) -> &'static str {
        match self {
            Units::Imperial => "mph",
            Units::Standard | Units::Metric => "m/s",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "standard" => Ok(Units::Standard),
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown units '{value}'. Supported units: standard, metric, imperial."
            )),
        }
    }
}

/// Normalized current-weather payload.
///
/// Every field is optional: the provider may omit any of them, and absence
/// means "unknown", never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    #[serde(default)]
    pub coord: Option<Coord>,
    #[serde(default)]
    pub weather: Option<Vec<Condition>>,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub main: Option<MainReadings>,
    /// Metres.
    #[serde(default)]
    pub visibility: Option<u32>,
    #[serde(default)]
    pub wind: Option<Wind>,
    #[serde(default)]
    pub clouds: Option<Clouds>,
    #[serde(default)]
    pub rain: Option<Rain>,
    /// Unix seconds.
    #[serde(default)]
    pub dt: Option<i64>,
    #[serde(default)]
    pub sys: Option<Sys>,
    /// Offset from UTC in seconds.
    #[serde(default)]
    pub timezone: Option<i32>,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub cod: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MainReadings {
    #[serde(default)]
    pub temp: Option<f64>,
    #[serde(default)]
    pub feels_like: Option<f64>,
    #[serde(default)]
    pub temp_min: Option<f64>,
    #[serde(default)]
    pub temp_max: Option<f64>,
    /// hPa.
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(default)]
    pub humidity: Option<u8>,
    #[serde(default)]
    pub sea_level: Option<f64>,
    #[serde(default)]
    pub grnd_level: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub deg: Option<f64>,
    #[serde(default)]
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Clouds {
    #[serde(default)]
    pub all: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rain {
    #[serde(default, rename = "1h")]
    pub one_hour: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sys {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub sunrise: Option<i64>,
    #[serde(default)]
    pub sunset: Option<i64>,
}

impl WeatherReport {
    pub fn location_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn country_code(&self) -> Option<&str> {
        self.sys.as_ref()?.country.as_deref()
    }

    /// Primary condition entry; the provider lists the dominant one first.
    pub fn condition(&self) -> Option<&Condition> {
        self.weather.as_ref()?.first()
    }

    pub fn condition_code(&self) -> Option<i32> {
        self.condition()?.id
    }

    pub fn condition_description(&self) -> Option<&str> {
        self.condition()?.description.as_deref()
    }

    pub fn icon(&self) -> Option<&str> {
        self.condition()?.icon.as_deref()
    }

    pub fn icon_url(&self) -> Option<String> {
        self.icon().map(|icon| format!("{ICON_BASE_URL}/{icon}@2x.png"))
    }

    pub fn temperature(&self) -> Option<f64> {
        self.main.as_ref()?.temp
    }

    pub fn feels_like(&self) -> Option<f64> {
        self.main.as_ref()?.feels_like
    }

    pub fn humidity(&self) -> Option<u8> {
        self.main.as_ref()?.humidity
    }

    pub fn pressure(&self) -> Option<f64> {
        self.main.as_ref()?.pressure
    }

    pub fn wind_speed(&self) -> Option<f64> {
        self.wind.as_ref()?.speed
    }

    pub fn visibility_km(&self) -> Option<f64> {
        self.visibility.map(|metres| f64::from(metres) / 1000.0)
    }

    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        self.dt.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_provider_payload() {
        let json = r#"{
            "coord": {"lon": -0.12, "lat": 51.5},
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "base": "stations",
            "main": {"temp": 15.2, "feels_like": 14.1, "pressure": 1012, "humidity": 70},
            "visibility": 10000,
            "wind": {"speed": 4.1, "deg": 80},
            "clouds": {"all": 0},
            "rain": {"1h": 0.3},
            "dt": 1700000000,
            "sys": {"country": "GB", "sunrise": 1699990000, "sunset": 1700020000},
            "timezone": 0,
            "id": 2643743,
            "name": "London",
            "cod": 200
        }"#;

        let report: WeatherReport = serde_json::from_str(json).expect("payload should parse");

        assert_eq!(report.location_name(), Some("London"));
        assert_eq!(report.country_code(), Some("GB"));
        assert_eq!(report.condition_code(), Some(800));
        assert_eq!(report.condition_description(), Some("clear sky"));
        assert_eq!(report.icon_url().as_deref(), Some("https://openweathermap.org/img/wn/01d@2x.png"));
        assert_eq!(report.temperature(), Some(15.2));
        assert_eq!(report.humidity(), Some(70));
        assert_eq!(report.pressure(), Some(1012.0));
        assert_eq!(report.visibility_km(), Some(10.0));
        assert_eq!(report.rain.as_ref().and_then(|r| r.one_hour), Some(0.3));
        assert_eq!(report.observed_at().map(|t| t.timestamp()), Some(1_700_000_000));
    }

    #[test]
    fn missing_fields_are_unknown_not_zero() {
        let report: WeatherReport =
            serde_json::from_str(r#"{"name": "Nowhere", "extra": {"ignored": true}}"#)
                .expect("sparse payload should parse");

        assert_eq!(report.location_name(), Some("Nowhere"));
        assert_eq!(report.temperature(), None);
        assert_eq!(report.humidity(), None);
        assert_eq!(report.condition(), None);
        assert_eq!(report.icon_url(), None);
        assert_eq!(report.observed_at(), None);
    }

    #[test]
    fn units_roundtrip() {
        for units in [Units::Standard, Units::Metric, Units::Imperial] {
            assert_eq!(Units::try_from(units.as_str()).expect("known units"), units);
        }
        assert!(Units::try_from("kelvinish").is_err());
    }

    #[test]
    fn query_display() {
        assert_eq!(WeatherQuery::city("Oslo").to_string(), "city 'Oslo'");
        assert_eq!(
            WeatherQuery::coordinates(51.5, -0.12).to_string(),
            "coordinates (51.5, -0.12)"
        );
    }
}
