use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use city_core::{
    Agent, AnswerSource, ComparisonKind, Config, Fallback, Intent, ProviderId, lookup,
};

/// Records every question it is asked and replies with a fixed result.
#[derive(Debug, Clone)]
struct RecordingFallback {
    calls: Arc<Mutex<Vec<String>>>,
    reply: Result<String, String>,
}

impl RecordingFallback {
    fn replying(text: &str) -> Self {
        Self { calls: Arc::default(), reply: Ok(text.to_string()) }
    }

    fn failing(message: &str) -> Self {
        Self { calls: Arc::default(), reply: Err(message.to_string()) }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fallback for RecordingFallback {
    fn id(&self) -> ProviderId {
        ProviderId::Gemini
    }

    async fn answer(&self, question: &str) -> anyhow::Result<String> {
        self.calls.lock().unwrap().push(question.to_string());
        self.reply.clone().map_err(anyhow::Error::msg)
    }
}

fn agent_with(fallback: &RecordingFallback) -> Agent {
    Agent::new(Some(Box::new(fallback.clone())))
}

fn june_noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap()
}

#[tokio::test]
async fn weather_in_lagos_is_answered_from_the_database() {
    let fallback = RecordingFallback::replying("web");
    let agent = agent_with(&fallback);

    let answer = agent.answer_at("What's the weather in Lagos?", june_noon()).await;

    assert_eq!(answer.source, AnswerSource::Lookup(Intent::Weather));
    assert!(answer.text.contains("Lagos"));
    assert!(answer.text.contains("Thunderstorms"));
    assert!(fallback.calls().is_empty());
}

#[tokio::test]
async fn new_york_and_tokyo_time_comparison() {
    let agent = Agent::new(None);

    let answer =
        agent.answer_at("Compare time zones between New York and Tokyo", june_noon()).await;
    assert_eq!(answer.source, AnswerSource::Lookup(Intent::Compare));
    assert!(answer.text.contains("Time difference: 13 hours"), "{}", answer.text);

    let comparison =
        lookup::compare("New York", "Tokyo", ComparisonKind::Time, june_noon()).unwrap();
    assert_ne!(comparison.time_delta_hours, 0.0);
}

#[tokio::test]
async fn atlantis_goes_to_the_fallback() {
    let fallback = RecordingFallback::replying("Atlantis is a legendary island.");
    let agent = agent_with(&fallback);

    let answer = agent.answer_at("Weather for Atlantis", june_noon()).await;

    assert_eq!(answer.source, AnswerSource::Fallback(ProviderId::Gemini));
    assert_eq!(answer.text, "Atlantis is a legendary island.");
    assert_eq!(fallback.calls(), ["Weather for Atlantis"]);
}

#[tokio::test]
async fn ten_day_forecast_is_limited_to_seven_days() {
    let agent = Agent::new(None);

    let answer = agent.answer_at("10-day forecast for Tokyo", june_noon()).await;

    assert_eq!(answer.source, AnswerSource::Lookup(Intent::Forecast));
    assert!(answer.text.starts_with("📅 7-Day Weather Forecast for Tokyo"));
    assert_eq!(answer.text.matches("📆").count(), 7);
    assert_eq!(lookup::forecast("Tokyo", 10, june_noon()).unwrap().days.len(), 7);
}

#[tokio::test]
async fn london_to_paris_distance() {
    let agent = Agent::new(None);

    let answer = agent.answer_at("Distance between London and Paris", june_noon()).await;

    assert_eq!(answer.source, AnswerSource::Lookup(Intent::Travel));
    assert!(answer.text.contains("London"));
    assert!(answer.text.contains("Paris"));
    assert!(lookup::travel("London", "Paris", june_noon()).unwrap().distance_km > 0.0);
}

#[tokio::test]
async fn known_city_with_unknown_intent_uses_the_fallback() {
    let fallback = RecordingFallback::replying("The Burj Khalifa.");
    let agent = agent_with(&fallback);

    let answer = agent.answer_at("What is the tallest building in Dubai?", june_noon()).await;

    assert_eq!(answer.source, AnswerSource::Fallback(ProviderId::Gemini));
    assert_eq!(fallback.calls().len(), 1);
}

#[tokio::test]
async fn missing_fallback_degrades_gracefully() {
    let agent = Agent::new(None);
    assert!(!agent.has_fallback());

    let answer = agent.answer_at("What's the weather like in Addis Ababa?", june_noon()).await;

    assert_eq!(answer.source, AnswerSource::Unavailable);
    assert!(answer.text.contains("I don't have that information"));
    assert!(answer.text.contains("not configured"));
    assert!(answer.text.contains("Mumbai"));
}

#[tokio::test]
async fn failing_fallback_degrades_gracefully() {
    let fallback = RecordingFallback::failing("connection refused");
    let agent = agent_with(&fallback);

    let answer = agent.answer_at("Who won the 1998 World Cup?", june_noon()).await;

    assert_eq!(answer.source, AnswerSource::Unavailable);
    assert!(answer.text.contains("unavailable right now"));
    assert_eq!(fallback.calls().len(), 1);
}

#[tokio::test]
async fn extra_cities_are_ignored_with_a_note() {
    let agent = Agent::new(None);

    let answer = agent
        .answer_at("Compare the weather in London, Paris and Sydney", june_noon())
        .await;

    assert_eq!(answer.source, AnswerSource::Lookup(Intent::Compare));
    assert!(answer.text.contains("London vs Paris"));
    assert_eq!(answer.notes.len(), 1);
    assert!(answer.to_string().contains("ignored: Sydney"));
}

#[tokio::test]
async fn database_search_by_country() {
    let agent = Agent::new(None);

    let answer = agent
        .answer_at("Search your database for cities in the United States.", june_noon())
        .await;

    assert_eq!(answer.source, AnswerSource::Lookup(Intent::Search));
    assert!(answer.text.contains("New York, United States"));
}

#[tokio::test]
async fn blank_question_gets_help_without_the_fallback() {
    let fallback = RecordingFallback::replying("web");
    let agent = agent_with(&fallback);

    let answer = agent.answer_at("   ", june_noon()).await;

    assert!(answer.text.contains("Ask me about New York"));
    assert_eq!(answer.source, AnswerSource::Help);
    assert!(fallback.calls().is_empty());
}

#[tokio::test]
async fn agent_from_config_without_keys_has_no_fallback() {
    let agent = Agent::from_config(&Config::default());
    assert!(!agent.has_fallback());

    let mut cfg = Config::default();
    cfg.upsert_provider_api_key(ProviderId::Brave, "KEY".into());
    assert!(Agent::from_config(&cfg).has_fallback());
}
