//! The static city table and its weather data.
//!
//! Everything here is `'static` and never mutated; lookups hand out references
//! into the table.

use chrono_tz::Tz;

use crate::{
    error::LookupError,
    model::{CityRecord, WeatherAlert, WeatherSnapshot},
};

static CITIES: [CityRecord; 8] = [
    CityRecord {
        key: "new york",
        name: "New York",
        country: "United States",
        country_code: "US",
        population: 8_336_817,
        latitude: 40.7128,
        longitude: -74.0060,
        currency: "USD",
        language: "English",
        timezone: Tz::America__New_York,
    },
    CityRecord {
        key: "london",
        name: "London",
        country: "United Kingdom",
        country_code: "UK",
        population: 9_648_110,
        latitude: 51.5074,
        longitude: -0.1278,
        currency: "GBP",
        language: "English",
        timezone: Tz::Europe__London,
    },
    CityRecord {
        key: "tokyo",
        name: "Tokyo",
        country: "Japan",
        country_code: "JP",
        population: 13_960_000,
        latitude: 35.6762,
        longitude: 139.6503,
        currency: "JPY",
        language: "Japanese",
        timezone: Tz::Asia__Tokyo,
    },
    CityRecord {
        key: "lagos",
        name: "Lagos",
        country: "Nigeria",
        country_code: "NG",
        population: 15_388_000,
        latitude: 6.5244,
        longitude: 3.3792,
        currency: "NGN",
        language: "English",
        timezone: Tz::Africa__Lagos,
    },
    CityRecord {
        key: "paris",
        name: "Paris",
        country: "France",
        country_code: "FR",
        population: 2_165_423,
        latitude: 48.8566,
        longitude: 2.3522,
        currency: "EUR",
        language: "French",
        timezone: Tz::Europe__Paris,
    },
    CityRecord {
        key: "dubai",
        name: "Dubai",
        country: "United Arab Emirates",
        country_code: "AE",
        population: 3_331_420,
        latitude: 25.2048,
        longitude: 55.2708,
        currency: "AED",
        language: "Arabic",
        timezone: Tz::Asia__Dubai,
    },
    CityRecord {
        key: "sydney",
        name: "Sydney",
        country: "Australia",
        country_code: "AU",
        population: 5_312_163,
        latitude: -33.8688,
        longitude: 151.2093,
        currency: "AUD",
        language: "English",
        timezone: Tz::Australia__Sydney,
    },
    CityRecord {
        key: "mumbai",
        name: "Mumbai",
        country: "India",
        country_code: "IN",
        population: 20_411_274,
        latitude: 19.0760,
        longitude: 72.8777,
        currency: "INR",
        language: "Hindi/English",
        timezone: Tz::Asia__Kolkata,
    },
];

static LAGOS_ALERTS: [WeatherAlert; 1] = [WeatherAlert {
    kind: "Thunderstorm",
    severity: "moderate",
    description: "Scattered thunderstorms expected",
    expires: "2025-06-03T20:00:00",
}];

static DUBAI_ALERTS: [WeatherAlert; 1] = [WeatherAlert {
    kind: "Extreme Heat",
    severity: "high",
    description: "Limit outdoor activity between 11:00 and 16:00",
    expires: "2025-06-04T18:00:00",
}];

static MUMBAI_ALERTS: [WeatherAlert; 1] = [WeatherAlert {
    kind: "Heavy Rain",
    severity: "moderate",
    description: "Monsoon showers may cause local flooding",
    expires: "2025-06-03T23:00:00",
}];

/// Indexed in the same order as `CITIES`.
static WEATHER: [WeatherSnapshot; 8] = [
    // New York
    WeatherSnapshot {
        condition: "sunny",
        temperature_c: 25.0,
        feels_like_c: 27.0,
        humidity_pct: 60,
        wind_speed_kph: 15.0,
        wind_direction: "SW",
        pressure_hpa: 1013.2,
        visibility_km: 10.0,
        uv_index: 6,
        air_quality: "Good",
        alerts: &[],
    },
    // London
    WeatherSnapshot {
        condition: "cloudy",
        temperature_c: 18.0,
        feels_like_c: 16.0,
        humidity_pct: 75,
        wind_speed_kph: 10.0,
        wind_direction: "W",
        pressure_hpa: 1008.5,
        visibility_km: 8.0,
        uv_index: 3,
        air_quality: "Moderate",
        alerts: &[],
    },
    // Tokyo
    WeatherSnapshot {
        condition: "partly cloudy",
        temperature_c: 28.0,
        feels_like_c: 31.0,
        humidity_pct: 65,
        wind_speed_kph: 8.0,
        wind_direction: "E",
        pressure_hpa: 1015.1,
        visibility_km: 12.0,
        uv_index: 7,
        air_quality: "Good",
        alerts: &[],
    },
    // Lagos
    WeatherSnapshot {
        condition: "thunderstorms",
        temperature_c: 26.0,
        feels_like_c: 28.0,
        humidity_pct: 94,
        wind_speed_kph: 5.0,
        wind_direction: "W",
        pressure_hpa: 1009.8,
        visibility_km: 5.0,
        uv_index: 4,
        air_quality: "Moderate",
        alerts: &LAGOS_ALERTS,
    },
    // Paris
    WeatherSnapshot {
        condition: "rainy",
        temperature_c: 16.0,
        feels_like_c: 14.0,
        humidity_pct: 80,
        wind_speed_kph: 20.0,
        wind_direction: "NW",
        pressure_hpa: 1005.2,
        visibility_km: 6.0,
        uv_index: 2,
        air_quality: "Good",
        alerts: &[],
    },
    // Dubai
    WeatherSnapshot {
        condition: "sunny",
        temperature_c: 38.0,
        feels_like_c: 41.0,
        humidity_pct: 40,
        wind_speed_kph: 12.0,
        wind_direction: "NW",
        pressure_hpa: 1002.3,
        visibility_km: 10.0,
        uv_index: 10,
        air_quality: "Moderate",
        alerts: &DUBAI_ALERTS,
    },
    // Sydney
    WeatherSnapshot {
        condition: "clear",
        temperature_c: 14.0,
        feels_like_c: 12.0,
        humidity_pct: 55,
        wind_speed_kph: 18.0,
        wind_direction: "S",
        pressure_hpa: 1020.4,
        visibility_km: 15.0,
        uv_index: 3,
        air_quality: "Good",
        alerts: &[],
    },
    // Mumbai
    WeatherSnapshot {
        condition: "rainy",
        temperature_c: 29.0,
        feels_like_c: 34.0,
        humidity_pct: 88,
        wind_speed_kph: 22.0,
        wind_direction: "SW",
        pressure_hpa: 1004.0,
        visibility_km: 4.0,
        uv_index: 5,
        air_quality: "Moderate",
        alerts: &MUMBAI_ALERTS,
    },
];

/// Every supported city, in a stable order.
pub fn all() -> &'static [CityRecord] {
    &CITIES
}

/// Resolve a city name.
///
/// Case-insensitive. An exact match on the key wins; otherwise the first city
/// whose key is contained in `name` (e.g. "New York City"), or that contains
/// `name` when it is at least three characters long (e.g. "york").
pub fn lookup(name: &str) -> Result<&'static CityRecord, LookupError> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return Err(LookupError::UnknownCity(name.to_string()));
    }

    if let Some(city) = CITIES.iter().find(|c| c.key == needle) {
        return Ok(city);
    }

    CITIES
        .iter()
        .find(|c| needle.contains(c.key) || (needle.len() >= 3 && c.key.contains(&needle)))
        .ok_or_else(|| LookupError::UnknownCity(name.trim().to_string()))
}

/// Static weather for a city from the table.
pub fn weather_for(city: &CityRecord) -> &'static WeatherSnapshot {
    let idx = CITIES
        .iter()
        .position(|c| c.key == city.key)
        .unwrap_or_default();
    &WEATHER[idx]
}

/// A city mentioned in free text, with the byte offset of the mention in the
/// lower-cased text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mention {
    pub city: &'static CityRecord,
    pub position: usize,
}

/// Every supported city named in `text`, ordered by where it first appears.
///
/// Names must sit on word boundaries, so "comparison" does not mention Paris.
pub fn find_in(text: &str) -> Vec<Mention> {
    let haystack = text.to_lowercase();

    let mut mentions: Vec<Mention> = CITIES
        .iter()
        .filter_map(|city| {
            haystack
                .match_indices(city.key)
                .find(|(pos, m)| on_word_boundary(&haystack, *pos, m.len()))
                .map(|(position, _)| Mention { city, position })
        })
        .collect();

    mentions.sort_by_key(|m| m.position);
    mentions
}

pub(crate) fn on_word_boundary(haystack: &str, start: usize, len: usize) -> bool {
    let before = haystack[..start].chars().next_back();
    let after = haystack[start + len..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

/// Comma-separated display names, for "try one of ..." messages.
pub fn supported_names() -> String {
    CITIES.iter().map(|c| c.name).collect::<Vec<_>>().join(", ")
}
