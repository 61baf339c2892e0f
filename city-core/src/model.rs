use chrono::{DateTime, FixedOffset, NaiveDate};
use chrono_tz::Tz;
use serde::Serialize;

use crate::fallback::ProviderId;

/// Static reference data for one supported city.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CityRecord {
    /// Lower-case lookup key, e.g. "new york".
    pub key: &'static str,
    pub name: &'static str,
    pub country: &'static str,
    /// ISO 3166-1 alpha-2 code.
    pub country_code: &'static str,
    pub population: u64,
    pub latitude: f64,
    pub longitude: f64,
    pub currency: &'static str,
    pub language: &'static str,
    pub timezone: Tz,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeatherAlert {
    pub kind: &'static str,
    pub severity: &'static str,
    pub description: &'static str,
    pub expires: &'static str,
}

/// Current conditions for a city. Temperatures are Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    pub condition: &'static str,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_kph: f64,
    pub wind_direction: &'static str,
    pub pressure_hpa: f64,
    pub visibility_km: f64,
    pub uv_index: u8,
    pub air_quality: &'static str,
    pub alerts: &'static [WeatherAlert],
}

impl WeatherSnapshot {
    pub fn temperature_f(&self) -> f64 {
        celsius_to_fahrenheit(self.temperature_c)
    }

    pub fn feels_like_f(&self) -> f64 {
        celsius_to_fahrenheit(self.feels_like_c)
    }
}

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

/// A weather lookup: the city plus its snapshot and the requested level of detail.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WeatherReport {
    pub city: &'static CityRecord,
    pub weather: &'static WeatherSnapshot,
    pub detailed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFormat {
    #[default]
    Standard,
    Business,
    Iso,
    Relative,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeResult {
    pub city: &'static CityRecord,
    pub instant: DateTime<FixedOffset>,
    pub utc_offset_seconds: i32,
    pub style: TimeFormat,
    pub formatted: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CityInfo {
    pub city: &'static CityRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub condition: &'static str,
    pub temperature_c: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Forecast {
    pub city: &'static CityRecord,
    pub days: Vec<ForecastDay>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonKind {
    Weather,
    Time,
    Info,
}

/// Two cities side by side. Every delta is `first - second`.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub kind: ComparisonKind,
    pub first: &'static CityRecord,
    pub second: &'static CityRecord,
    pub first_weather: &'static WeatherSnapshot,
    pub second_weather: &'static WeatherSnapshot,
    pub first_time: DateTime<FixedOffset>,
    pub second_time: DateTime<FixedOffset>,
    pub temperature_delta_c: f64,
    pub humidity_delta_pct: i16,
    pub time_delta_hours: f64,
    pub distance_km: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TravelInfo {
    pub origin: &'static CityRecord,
    pub destination: &'static CityRecord,
    pub distance_km: f64,
    pub distance_miles: f64,
    /// Destination offset minus origin offset.
    pub time_delta_hours: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub query: String,
    pub matches: Vec<&'static CityRecord>,
}

/// Category of question the router recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Weather,
    Time,
    Info,
    Forecast,
    Compare,
    Travel,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "via")]
pub enum AnswerSource {
    /// Answered from the city database.
    Lookup(Intent),
    /// Answered by an external provider.
    Fallback(ProviderId),
    /// Nothing could answer the question.
    Unavailable,
    /// The question was blank; the text is the usage help.
    Help,
}

/// What the agent says back. Always present, even when nothing matched.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub text: String,
    pub source: AnswerSource,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)?;
        for note in &self.notes {
            write!(f, "\n\nℹ️ {note}")?;
        }
        Ok(())
    }
}
