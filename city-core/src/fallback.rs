use crate::{
    Config,
    fallback::{brave::BraveFallback, gemini::GeminiFallback},
};
use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use std::{fmt::Debug, time::Duration};

pub mod brave;
pub mod gemini;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Gemini,
    Brave,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Gemini => "gemini",
            ProviderId::Brave => "brave",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::Gemini, ProviderId::Brave]
    }

    /// Environment variable that can supply this provider's API key.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderId::Gemini => "GOOGLE_API_KEY",
            ProviderId::Brave => "BRAVE_API_KEY",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "gemini" | "google" => Ok(ProviderId::Gemini),
            "brave" => Ok(ProviderId::Brave),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: gemini, brave."
            )),
        }
    }
}

/// Answers questions the city database can't: a hosted search or LLM service.
#[async_trait]
pub trait Fallback: Send + Sync + Debug {
    fn id(&self) -> ProviderId;

    async fn answer(&self, question: &str) -> anyhow::Result<String>;
}

/// Construct a fallback from config and explicit ProviderId.
pub fn provider_from_config(id: ProviderId, config: &Config) -> anyhow::Result<Box<dyn Fallback>> {
    let settings = config.provider_config(id).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{id}'.\n\
                 Hint: run `city configure {id}` or set {}.",
            id.api_key_env()
        )
    })?;

    let api_key = settings.api_key.to_owned();
    let model = settings.model.clone();

    let boxed: Box<dyn Fallback> = match id {
        ProviderId::Gemini => Box::new(GeminiFallback::new(api_key, model)?),
        ProviderId::Brave => Box::new(BraveFallback::new(api_key)?),
    };

    Ok(boxed)
}

/// Construct the default fallback from config, using `default_provider` field.
pub fn default_provider_from_config(config: &Config) -> anyhow::Result<Box<dyn Fallback>> {
    let id = config.default_provider_id()?;
    provider_from_config(id, config)
}

pub(crate) fn http_client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let end = (0..=MAX).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
