//! Keyword-based intent routing.
//!
//! A question is scanned for supported city names and for category keywords.
//! The number of cities is decided first, then the category:
//!
//! * two cities: travel if a travel keyword is present, otherwise a
//!   comparison (time, then weather/forecast, then general info);
//! * one city: forecast, then weather, then time, then info;
//! * no city: a database search when a search keyword and a known country
//!   are present.
//!
//! Everything else goes to the fallback.

use std::collections::HashSet;

use tracing::debug;

use crate::{
    database::{self, on_word_boundary},
    lookup::{self, DEFAULT_FORECAST_DAYS, MAX_FORECAST_DAYS},
    model::{CityRecord, ComparisonKind, Intent, TimeFormat},
};

const FORECAST_WORDS: &[&str] = &["forecast", "forecasts", "tomorrow", "outlook"];
const WEATHER_WORDS: &[&str] = &[
    "weather", "temperature", "temp", "rain", "raining", "rainy", "sunny", "humid", "humidity",
    "hot", "cold", "warm", "warmer", "cooler", "wind", "windy", "climate",
];
const TIME_WORDS: &[&str] = &["time", "times", "clock", "timezone", "timezones", "hour", "hours"];
const TRAVEL_WORDS: &[&str] = &[
    "travel", "distance", "far", "flight", "flights", "fly", "trip", "journey", "km", "miles",
];
const COMPARE_WORDS: &[&str] = &["compare", "comparison", "vs", "versus", "difference", "differ"];
const INFO_WORDS: &[&str] = &[
    "info", "information", "about", "population", "currency", "language", "languages", "country",
    "facts",
];
const SEARCH_WORDS: &[&str] = &["search", "database", "list", "find"];

const TIME_PHRASES: &[&str] = &["time zone", "time difference"];
const INFO_PHRASES: &[&str] = &["tell me"];
const SEARCH_PHRASES: &[&str] = &["which cities", "cities in", "what cities"];

/// Why a question could not be answered from the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// No supported city was named.
    UnknownCity,
    /// A city was named but no handler covers what was asked.
    UnsupportedIntent,
}

/// The handler chosen for a question.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Weather { city: &'static CityRecord, detailed: bool },
    Time { city: &'static CityRecord, style: TimeFormat },
    Info { city: &'static CityRecord },
    /// `days` is what was asked for; the lookup clamps it.
    Forecast { city: &'static CityRecord, days: u32 },
    Compare { first: &'static CityRecord, second: &'static CityRecord, kind: ComparisonKind },
    Travel { origin: &'static CityRecord, destination: &'static CityRecord },
    Search { term: String },
    Fallback { reason: FallbackReason },
}

impl Route {
    /// The lookup category, or `None` for the fallback.
    pub fn intent(&self) -> Option<Intent> {
        match self {
            Route::Weather { .. } => Some(Intent::Weather),
            Route::Time { .. } => Some(Intent::Time),
            Route::Info { .. } => Some(Intent::Info),
            Route::Forecast { .. } => Some(Intent::Forecast),
            Route::Compare { .. } => Some(Intent::Compare),
            Route::Travel { .. } => Some(Intent::Travel),
            Route::Search { .. } => Some(Intent::Search),
            Route::Fallback { .. } => None,
        }
    }
}

/// A route plus anything worth telling the user about how it was chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct Routed {
    pub route: Route,
    pub notes: Vec<String>,
}

/// Categories present in a question.
#[derive(Debug, Default, Clone, Copy)]
struct Categories {
    forecast: bool,
    weather: bool,
    time: bool,
    travel: bool,
    compare: bool,
    info: bool,
    search: bool,
}

pub fn route(question: &str) -> Routed {
    let text = question.to_lowercase();
    let words = tokenize(&text);
    let cats = categorize(&text, &words);

    let mut notes = Vec::new();
    let mut cities: Vec<&'static CityRecord> =
        database::find_in(question).into_iter().map(|m| m.city).collect();

    if cities.len() > 2 {
        let ignored: Vec<&str> = cities[2..].iter().map(|c| c.name).collect();
        notes.push(format!(
            "Only the first two cities are considered; ignored: {}.",
            ignored.join(", ")
        ));
        cities.truncate(2);
    }

    if cities.len() == 1 && cats.compare && !(cats.forecast || cats.weather || cats.time) {
        notes.push("Name a second supported city to compare with.".to_string());
    }

    let route = match *cities.as_slice() {
        [origin, destination] if cats.travel || is_from_to(&words) => {
            Route::Travel { origin, destination }
        }
        [first, second] => {
            let kind = if cats.time {
                ComparisonKind::Time
            } else if cats.weather || cats.forecast {
                ComparisonKind::Weather
            } else {
                ComparisonKind::Info
            };
            Route::Compare { first, second, kind }
        }
        [city] if cats.forecast => Route::Forecast { city, days: forecast_days(&words) },
        [city] if cats.weather => Route::Weather { city, detailed: is_detailed(&words) },
        [city] if cats.time => Route::Time { city, style: time_style(&text, &words) },
        [city] if cats.info || cats.search => Route::Info { city },
        [_] => Route::Fallback { reason: FallbackReason::UnsupportedIntent },
        _ if cats.search => match country_term(&text) {
            Some(term) => Route::Search { term },
            None => Route::Fallback { reason: FallbackReason::UnknownCity },
        },
        _ => Route::Fallback { reason: FallbackReason::UnknownCity },
    };

    debug!(?route, ?cats, "routed question");
    Routed { route, notes }
}

fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|w| !w.is_empty())
        .collect()
}

fn categorize(text: &str, words: &[&str]) -> Categories {
    let set: HashSet<&str> = words.iter().copied().collect();
    let any = |list: &[&str]| list.iter().any(|w| set.contains(w));
    let phrase = |list: &[&str]| list.iter().any(|p| text.contains(p));

    Categories {
        forecast: any(FORECAST_WORDS) || has_day_count(words) || set.contains("week"),
        weather: any(WEATHER_WORDS),
        time: any(TIME_WORDS) || phrase(TIME_PHRASES),
        travel: any(TRAVEL_WORDS),
        compare: any(COMPARE_WORDS),
        info: any(INFO_WORDS) || phrase(INFO_PHRASES),
        search: any(SEARCH_WORDS) || phrase(SEARCH_PHRASES),
    }
}

/// "5 day", "10-day", "next 3 days".
fn has_day_count(words: &[&str]) -> bool {
    words
        .windows(2)
        .any(|w| parse_number(w[0]).is_some() && matches!(w[1], "day" | "days"))
}

/// "from London to Paris", in that order.
fn is_from_to(words: &[&str]) -> bool {
    words
        .iter()
        .position(|w| *w == "from")
        .is_some_and(|from| words[from..].contains(&"to"))
}

fn forecast_days(words: &[&str]) -> u32 {
    if let Some(n) = words.iter().find_map(|w| parse_number(w)) {
        return n;
    }
    if words.contains(&"week") {
        return MAX_FORECAST_DAYS;
    }
    if words.contains(&"tomorrow") {
        return 1;
    }
    DEFAULT_FORECAST_DAYS
}

fn parse_number(word: &str) -> Option<u32> {
    if word.is_empty() || !word.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(word.parse::<u32>().unwrap_or(u32::MAX))
}

fn is_detailed(words: &[&str]) -> bool {
    words.iter().any(|w| w.starts_with("detail"))
}

fn time_style(text: &str, words: &[&str]) -> TimeFormat {
    if words.contains(&"iso") {
        TimeFormat::Iso
    } else if words.contains(&"business") {
        TimeFormat::Business
    } else if words.contains(&"relative") || text.contains("utc offset") {
        TimeFormat::Relative
    } else {
        TimeFormat::Standard
    }
}

/// Longest country name, code or alias mentioned on word boundaries.
fn country_term(text: &str) -> Option<String> {
    let mut terms: Vec<String> = lookup::country_terms().map(str::to_lowercase).collect();
    terms.sort_by_key(|t| std::cmp::Reverse(t.len()));

    terms.into_iter().find(|term| {
        text.match_indices(term.as_str())
            .any(|(pos, m)| on_word_boundary(text, pos, m.len()))
    })
}
