//! Lookup functions over the city table.
//!
//! Each function resolves its city names through [`database::lookup`] and
//! returns a small structured result whose `Display` is the human-readable
//! answer. Anything that depends on the clock takes `now`
//! explicitly so results are reproducible.

use chrono::{DateTime, Duration, Offset, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::{
    database,
    error::LookupError,
    model::{
        CityInfo, CityRecord, Comparison, ComparisonKind, Forecast, ForecastDay, SearchResult,
        TimeFormat, TimeResult, TravelInfo, WeatherReport,
    },
};

/// Longest forecast horizon; longer requests are clamped to this.
pub const MAX_FORECAST_DAYS: u32 = 7;

/// Horizon used when the question doesn't name one.
pub const DEFAULT_FORECAST_DAYS: u32 = 3;

const EARTH_RADIUS_KM: f64 = 6371.0;
const KM_TO_MILES: f64 = 0.621371;

const FORECAST_CONDITIONS: [&str; 5] =
    ["sunny", "partly cloudy", "cloudy", "rainy", "thunderstorms"];

/// Country names people use that differ from the table, mapped to country codes.
const COUNTRY_ALIASES: [(&str, &str); 9] = [
    ("usa", "US"),
    ("america", "US"),
    ("united states of america", "US"),
    ("britain", "UK"),
    ("great britain", "UK"),
    ("england", "UK"),
    ("uae", "AE"),
    ("emirates", "AE"),
    ("nigerian", "NG"),
];

pub fn weather(city: &str, detailed: bool) -> Result<WeatherReport, LookupError> {
    let city = database::lookup(city)?;
    Ok(WeatherReport { city, weather: database::weather_for(city), detailed })
}

pub fn current_time(
    city: &str,
    style: TimeFormat,
    now: DateTime<Utc>,
) -> Result<TimeResult, LookupError> {
    let city = database::lookup(city)?;
    let local = now.with_timezone(&city.timezone);

    let formatted = match style {
        TimeFormat::Standard => local.format("%A, %B %d, %Y at %I:%M:%S %p %Z").to_string(),
        TimeFormat::Business => local.format("%Y-%m-%d %H:%M %Z").to_string(),
        TimeFormat::Iso => local.to_rfc3339(),
        TimeFormat::Relative => format!("{} (UTC{})", local.format("%I:%M %p"), local.format("%z")),
    };

    Ok(TimeResult {
        city,
        instant: local.fixed_offset(),
        utc_offset_seconds: offset_seconds(city.timezone, now),
        style,
        formatted,
    })
}

pub fn city_info(city: &str) -> Result<CityInfo, LookupError> {
    database::lookup(city).map(|city| CityInfo { city })
}

/// Mock forecast derived from the city's current weather.
///
/// `days` is clamped to `1..=MAX_FORECAST_DAYS`. Day one is tomorrow in the
/// city's own timezone.
pub fn forecast(city: &str, days: u32, now: DateTime<Utc>) -> Result<Forecast, LookupError> {
    let city = database::lookup(city)?;
    let base = database::weather_for(city);

    let horizon = days.clamp(1, MAX_FORECAST_DAYS);
    if horizon != days {
        debug!(requested = days, horizon, "forecast horizon clamped");
    }

    let today = now.with_timezone(&city.timezone).date_naive();

    let days = (0..horizon as usize)
        .map(|i| {
            let variation = if i < 3 { i as f64 - 2.0 } else { 1.0 - i as f64 };
            ForecastDay {
                date: today + Duration::days(i as i64 + 1),
                condition: FORECAST_CONDITIONS[i % FORECAST_CONDITIONS.len()],
                temperature_c: base.temperature_c + variation,
            }
        })
        .collect();

    Ok(Forecast { city, days })
}

pub fn compare(
    first: &str,
    second: &str,
    kind: ComparisonKind,
    now: DateTime<Utc>,
) -> Result<Comparison, LookupError> {
    let first = database::lookup(first)?;
    let second = database::lookup(second)?;

    let first_weather = database::weather_for(first);
    let second_weather = database::weather_for(second);

    let delta_seconds = offset_seconds(first.timezone, now) - offset_seconds(second.timezone, now);

    Ok(Comparison {
        kind,
        first,
        second,
        first_weather,
        second_weather,
        first_time: now.with_timezone(&first.timezone).fixed_offset(),
        second_time: now.with_timezone(&second.timezone).fixed_offset(),
        temperature_delta_c: first_weather.temperature_c - second_weather.temperature_c,
        humidity_delta_pct: i16::from(first_weather.humidity_pct)
            - i16::from(second_weather.humidity_pct),
        time_delta_hours: f64::from(delta_seconds) / 3600.0,
        distance_km: haversine_km(first, second),
    })
}

pub fn travel(origin: &str, destination: &str, now: DateTime<Utc>) -> Result<TravelInfo, LookupError> {
    let origin = database::lookup(origin)?;
    let destination = database::lookup(destination)?;

    let distance_km = haversine_km(origin, destination);
    let delta_seconds =
        offset_seconds(destination.timezone, now) - offset_seconds(origin.timezone, now);

    Ok(TravelInfo {
        origin,
        destination,
        distance_km,
        distance_miles: distance_km * KM_TO_MILES,
        time_delta_hours: f64::from(delta_seconds) / 3600.0,
    })
}

/// Cities whose name, country or country code matches `query`.
pub fn search(query: &str) -> Result<SearchResult, LookupError> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Err(LookupError::NoMatches(query.to_string()));
    }

    let alias_code = COUNTRY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == needle)
        .map(|(_, code)| *code);

    let matches: Vec<&'static CityRecord> = database::all()
        .iter()
        .filter(|c| {
            c.key.contains(&needle)
                || c.country.to_lowercase().contains(&needle)
                || c.country_code.eq_ignore_ascii_case(&needle)
                || alias_code == Some(c.country_code)
        })
        .collect();

    if matches.is_empty() {
        return Err(LookupError::NoMatches(query.trim().to_string()));
    }

    Ok(SearchResult { query: query.trim().to_string(), matches })
}

/// Country codes that are also ordinary English words ("us", "in").
const WORD_LIKE_CODES: [&str; 2] = ["US", "IN"];

/// Country names, country codes and aliases that may appear in a question.
pub fn country_terms() -> impl Iterator<Item = &'static str> {
    let mut countries: Vec<&'static str> = database::all().iter().map(|c| c.country).collect();
    countries.dedup();
    let codes = database::all()
        .iter()
        .map(|c| c.country_code)
        .filter(|code| !WORD_LIKE_CODES.contains(code));

    countries
        .into_iter()
        .chain(codes)
        .chain(COUNTRY_ALIASES.iter().map(|(alias, _)| *alias))
}

/// Great-circle distance in kilometres.
pub fn haversine_km(a: &CityRecord, b: &CityRecord) -> f64 {
    let (lat1, lon1) = (a.latitude.to_radians(), a.longitude.to_radians());
    let (lat2, lon2) = (b.latitude.to_radians(), b.longitude.to_radians());

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

fn offset_seconds(tz: Tz, now: DateTime<Utc>) -> i32 {
    now.with_timezone(&tz).offset().fix().local_minus_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn june_noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap()
    }

    #[test]
    fn unknown_city_is_reported() {
        let err = weather("Atlantis", false).unwrap_err();
        assert_eq!(err, LookupError::UnknownCity("Atlantis".into()));
        assert!(current_time("Atlantis", TimeFormat::Iso, june_noon()).is_err());
        assert!(travel("London", "Atlantis", june_noon()).is_err());
    }

    #[test]
    fn forecast_is_clamped_to_seven_days() {
        for days in [8, 10, 30, u32::MAX] {
            let f = forecast("Tokyo", days, june_noon()).unwrap();
            assert_eq!(f.days.len(), 7, "requested {days}");
        }
        assert_eq!(forecast("Tokyo", 0, june_noon()).unwrap().days.len(), 1);
        assert_eq!(forecast("Tokyo", 5, june_noon()).unwrap().days.len(), 5);
    }

    #[test]
    fn forecast_days_follow_the_pattern() {
        let f = forecast("paris", 5, june_noon()).unwrap();
        let temps: Vec<f64> = f.days.iter().map(|d| d.temperature_c).collect();
        assert_eq!(temps, [14.0, 15.0, 16.0, 14.0, 13.0]);
        assert_eq!(f.days[0].date.to_string(), "2025-06-03");
        assert_eq!(f.days[0].condition, "sunny");
        assert_eq!(f.days[4].condition, "thunderstorms");
    }

    #[test]
    fn comparing_a_city_with_itself_has_no_difference() {
        for city in database::all() {
            for kind in [ComparisonKind::Weather, ComparisonKind::Time, ComparisonKind::Info] {
                let c = compare(city.name, city.key, kind, june_noon()).unwrap();
                assert_eq!(c.temperature_delta_c, 0.0);
                assert_eq!(c.humidity_delta_pct, 0);
                assert_eq!(c.time_delta_hours, 0.0);
                assert_eq!(c.distance_km, 0.0);
            }
        }
    }

    #[test]
    fn time_difference_respects_daylight_saving() {
        // New York is on EDT (UTC-4) in June and EST (UTC-5) in January.
        let summer = compare("Tokyo", "New York", ComparisonKind::Time, june_noon()).unwrap();
        assert_eq!(summer.time_delta_hours, 13.0);

        let winter_now = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        let winter = compare("Tokyo", "New York", ComparisonKind::Time, winter_now).unwrap();
        assert_eq!(winter.time_delta_hours, 14.0);
    }

    #[test]
    fn half_hour_offsets_are_kept() {
        let t = travel("London", "Mumbai", june_noon()).unwrap();
        assert_eq!(t.time_delta_hours, 4.5);
    }

    #[test]
    fn london_to_paris_distance() {
        let t = travel("London", "Paris", june_noon()).unwrap();
        assert!((t.distance_km - 343.5).abs() < 2.0, "{}", t.distance_km);
        assert!((t.distance_miles - t.distance_km * KM_TO_MILES).abs() < f64::EPSILON);
        assert_eq!(t.time_delta_hours, 1.0);
    }

    #[test]
    fn time_styles() {
        let now = june_noon();
        let iso = current_time("Tokyo", TimeFormat::Iso, now).unwrap();
        assert_eq!(iso.formatted, "2025-06-02T21:00:00+09:00");
        assert_eq!(iso.utc_offset_seconds, 9 * 3600);

        let business = current_time("London", TimeFormat::Business, now).unwrap();
        assert_eq!(business.formatted, "2025-06-02 13:00 BST");

        let standard = current_time("New York", TimeFormat::Standard, now).unwrap();
        assert_eq!(standard.formatted, "Monday, June 02, 2025 at 08:00:00 AM EDT");

        let relative = current_time("Dubai", TimeFormat::Relative, now).unwrap();
        assert_eq!(relative.formatted, "04:00 PM (UTC+0400)");
    }

    #[test]
    fn search_by_country_code_alias_and_name() {
        let by_country = search("United States").unwrap();
        assert_eq!(by_country.matches.len(), 1);
        assert_eq!(by_country.matches[0].name, "New York");

        assert_eq!(search("uae").unwrap().matches[0].name, "Dubai");
        assert_eq!(search("JP").unwrap().matches[0].name, "Tokyo");
        assert_eq!(search("united").unwrap().matches.len(), 3);
        assert!(matches!(search("Germany"), Err(LookupError::NoMatches(_))));
        assert!(matches!(search("  "), Err(LookupError::NoMatches(_))));
    }

    #[test]
    fn country_terms_include_codes_but_not_english_words() {
        let terms: Vec<&str> = country_terms().collect();
        for code in ["UK", "JP", "NG", "FR", "AE", "AU"] {
            assert!(terms.contains(&code), "missing {code}");
        }
        assert!(!terms.contains(&"US"));
        assert!(!terms.contains(&"IN"));
        assert!(terms.contains(&"United Kingdom"));
        assert!(terms.contains(&"uae"));
    }
}
