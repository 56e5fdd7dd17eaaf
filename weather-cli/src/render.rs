//! Human-friendly text for a weather report. Absent fields print as "N/A".

use chrono::{DateTime, FixedOffset, Utc};
use weather_core::{Units, WeatherReport};

const UNKNOWN: &str = "N/A";

pub fn report_lines(report: &WeatherReport, units: Units) -> Vec<String> {
    let temp = units.temperature_suffix();
    let speed = units.speed_suffix();

    vec![
        heading(report),
        format!(
            "  {}",
            report.condition_description().map(capitalize).unwrap_or_else(|| UNKNOWN.into())
        ),
        format!("  Temperature: {}", or_unknown(report.temperature().map(|t| format!("{t:.1}{temp}")))),
        format!("  Feels like:  {}", or_unknown(report.feels_like().map(|t| format!("{t:.1}{temp}")))),
        format!("  Humidity:    {}", or_unknown(report.humidity().map(|h| format!("{h}%")))),
        format!("  Wind:        {}", or_unknown(report.wind_speed().map(|w| format!("{w} {speed}")))),
        format!("  Pressure:    {}", or_unknown(report.pressure().map(|p| format!("{p} hPa")))),
        format!("  Visibility:  {}", or_unknown(report.visibility_km().map(|v| format!("{v} km")))),
        format!("  Observed:    {}", or_unknown(observed(report))),
        format!("  Icon:        {}", or_unknown(report.icon_url())),
    ]
}

fn heading(report: &WeatherReport) -> String {
    match (report.location_name(), report.country_code()) {
        (Some(name), Some(country)) => format!("{name}, {country}"),
        (Some(name), None) => name.to_string(),
        (None, Some(country)) => format!("Unknown city, {country}"),
        (None, None) => "Unknown city".to_string(),
    }
}

/// Observation time in the location's own offset when the provider sent one.
fn observed(report: &WeatherReport) -> Option<String> {
    let at: DateTime<Utc> = report.observed_at()?;
    let local = report
        .timezone
        .and_then(FixedOffset::east_opt)
        .map(|offset| at.with_timezone(&offset).format("%Y-%m-%d %H:%M %:z").to_string());

    Some(local.unwrap_or_else(|| at.format("%Y-%m-%d %H:%M UTC").to_string()))
}

fn or_unknown(value: Option<String>) -> String {
    value.unwrap_or_else(|| UNKNOWN.to_string())
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_core::model::{Condition, MainReadings, Sys};

    #[test]
    fn renders_known_fields() {
        let report = WeatherReport {
            name: Some("London".into()),
            sys: Some(Sys { country: Some("GB".into()), ..Default::default() }),
            weather: Some(vec![Condition {
                description: Some("clear sky".into()),
                icon: Some("01d".into()),
                ..Default::default()
            }]),
            main: Some(MainReadings {
                temp: Some(15.2),
                humidity: Some(70),
                ..Default::default()
            }),
            dt: Some(1_700_000_000),
            timezone: Some(3600),
            ..Default::default()
        };

        let lines = report_lines(&report, Units::Metric);

        assert_eq!(lines[0], "London, GB");
        assert_eq!(lines[1], "  Clear sky");
        assert_eq!(lines[2], "  Temperature: 15.2°C");
        assert_eq!(lines[4], "  Humidity:    70%");
        assert_eq!(lines[8], "  Observed:    2023-11-14 23:13 +01:00");
        assert_eq!(lines[9], "  Icon:        https://openweathermap.org/img/wn/01d@2x.png");
    }

    #[test]
    fn absent_fields_render_as_unknown() {
        let lines = report_lines(&WeatherReport::default(), Units::Imperial);

        assert_eq!(lines[0], "Unknown city");
        assert_eq!(lines[1], "  N/A");
        assert!(lines[2..].iter().all(|l| l.ends_with(UNKNOWN)));
    }
}
