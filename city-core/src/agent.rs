//! Question answering: route, look up, or fall back.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::{
    Config, database,
    error::LookupError,
    fallback::{Fallback, default_provider_from_config},
    lookup,
    model::{Answer, AnswerSource},
    router::{self, Route},
};

#[derive(Debug, Default)]
pub struct Agent {
    fallback: Option<Box<dyn Fallback>>,
}

impl Agent {
    /// An agent that uses `fallback` for anything the database can't answer.
    /// With `None` it answers from the database only.
    pub fn new(fallback: Option<Box<dyn Fallback>>) -> Self {
        Self { fallback }
    }

    /// Use the configured default provider when it has an API key.
    pub fn from_config(config: &Config) -> Self {
        match default_provider_from_config(config) {
            Ok(fallback) => {
                info!(provider = %fallback.id(), "web fallback enabled");
                Self::new(Some(fallback))
            }
            Err(err) => {
                info!("web fallback disabled: {err:#}");
                Self::new(None)
            }
        }
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    pub async fn answer(&self, question: &str) -> Answer {
        self.answer_at(question, Utc::now()).await
    }

    /// Answer as if the current instant were `now`.
    pub async fn answer_at(&self, question: &str, now: DateTime<Utc>) -> Answer {
        if question.trim().is_empty() {
            return Answer { text: help_text(), source: AnswerSource::Help, notes: vec![] };
        }

        let routed = router::route(question);
        let notes = routed.notes;

        match routed.route.intent().zip(run_lookup(&routed.route, now)) {
            Some((intent, Ok(text))) => Answer { text, source: AnswerSource::Lookup(intent), notes },
            Some((_, Err(err))) => {
                debug!(%err, "lookup missed");
                self.fall_back(question, notes).await
            }
            None => self.fall_back(question, notes).await,
        }
    }

    async fn fall_back(&self, question: &str, notes: Vec<String>) -> Answer {
        let Some(fallback) = &self.fallback else {
            return unavailable("web search is not configured", notes);
        };

        debug!(provider = %fallback.id(), "delegating to fallback");

        match fallback.answer(question).await {
            Ok(text) => Answer { text, source: AnswerSource::Fallback(fallback.id()), notes },
            Err(err) => {
                warn!(provider = %fallback.id(), "fallback failed: {err:#}");
                unavailable("web search is unavailable right now", notes)
            }
        }
    }
}

/// `None` for routes that go straight to the fallback.
fn run_lookup(route: &Route, now: DateTime<Utc>) -> Option<Result<String, LookupError>> {
    let result = match route {
        Route::Weather { city, detailed } => {
            lookup::weather(city.name, *detailed).map(|r| r.to_string())
        }
        Route::Time { city, style } => {
            lookup::current_time(city.name, *style, now).map(|r| r.to_string())
        }
        Route::Info { city } => lookup::city_info(city.name).map(|r| r.to_string()),
        Route::Forecast { city, days } => {
            lookup::forecast(city.name, *days, now).map(|r| r.to_string())
        }
        Route::Compare { first, second, kind } => {
            lookup::compare(first.name, second.name, *kind, now).map(|r| r.to_string())
        }
        Route::Travel { origin, destination } => {
            lookup::travel(origin.name, destination.name, now).map(|r| r.to_string())
        }
        Route::Search { term } => lookup::search(term).map(|r| r.to_string()),
        Route::Fallback { .. } => return None,
    };
    Some(result)
}

fn unavailable(why: &str, notes: Vec<String>) -> Answer {
    let text = format!(
        "🤷 I don't have that information ({why}).\n\
         I can answer questions about these cities: {}.",
        database::supported_names()
    );
    Answer { text, source: AnswerSource::Unavailable, notes }
}

/// What the agent can do, for empty questions and the CLI.
pub fn help_text() -> String {
    const CAPABILITIES: [&str; 7] = [
        "🌤️ weather, optionally detailed",
        "🕐 current time (standard, business, ISO or relative)",
        "🏙️ city facts",
        "📅 forecasts of up to 7 days",
        "🔄 comparisons of two cities",
        "✈️ distance and time difference between two cities",
        "🔍 searching the database by country",
    ];

    let mut text = format!("Ask me about {}.\n", database::supported_names());
    for line in CAPABILITIES {
        text.push_str("\n• ");
        text.push_str(line);
    }
    text
}
