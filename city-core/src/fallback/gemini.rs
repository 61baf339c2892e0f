use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Fallback, ProviderId, http_client, truncate_body};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

const INSTRUCTION: &str = "You are a web search specialist. Use Google Search to find information \
     about cities, weather, or any other queries when the data is not available in the internal \
     database. Provide comprehensive and accurate information.";

/// Gemini with the Google Search tool enabled.
#[derive(Debug, Clone)]
pub struct GeminiFallback {
    api_key: String,
    model: String,
    base_url: String,
    http: Client,
}

impl GeminiFallback {
    pub fn new(api_key: String, model: Option<String>) -> Result<Self> {
        Ok(Self {
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: DEFAULT_BASE_URL.to_string(),
            http: http_client()?,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: GContent<'a>,
    contents: Vec<GContent<'a>>,
    tools: Vec<GTool>,
}

#[derive(Debug, Serialize)]
struct GContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<GPartOut<'a>>,
}

#[derive(Debug, Serialize)]
struct GPartOut<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GTool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<GCandidate>,
}

#[derive(Debug, Deserialize)]
struct GCandidate {
    content: Option<GContentIn>,
}

#[derive(Debug, Deserialize)]
struct GContentIn {
    #[serde(default)]
    parts: Vec<GPartIn>,
}

#[derive(Debug, Deserialize)]
struct GPartIn {
    text: Option<String>,
}

fn build_request(question: &str) -> GenerateRequest<'_> {
    GenerateRequest {
        system_instruction: GContent { role: None, parts: vec![GPartOut { text: INSTRUCTION }] },
        contents: vec![GContent { role: Some("user"), parts: vec![GPartOut { text: question }] }],
        tools: vec![GTool { google_search: GoogleSearch {} }],
    }
}

/// Text of the first candidate, parts joined.
fn parse_answer(body: &str) -> Result<String> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).context("Failed to parse Gemini generateContent JSON")?;

    let text = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<Vec<_>>().join(""))
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(anyhow!("Gemini response contained no text"));
    }

    Ok(text.trim().to_string())
}

#[async_trait]
impl Fallback for GeminiFallback {
    fn id(&self) -> ProviderId {
        ProviderId::Gemini
    }

    async fn answer(&self, question: &str) -> Result<String> {
        debug!(model = %self.model, "asking gemini");

        let res = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&build_request(question))
            .send()
            .await
            .context("Failed to send request to Gemini")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read Gemini response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Gemini request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        parse_answer(&body)
    }
}
