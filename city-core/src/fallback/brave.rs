use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{Fallback, ProviderId, http_client, truncate_body};

pub const DEFAULT_BASE_URL: &str = "https://api.search.brave.com";
const MAX_RESULTS: u8 = 5;

/// Brave Search web results, rendered as a numbered list.
#[derive(Debug, Clone)]
pub struct BraveFallback {
    api_key: String,
    base_url: String,
    http: Client,
}

impl BraveFallback {
    pub fn new(api_key: String) -> Result<Self> {
        Ok(Self { api_key, base_url: DEFAULT_BASE_URL.to_string(), http: http_client()? })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct BsResponse {
    web: Option<BsWeb>,
}

#[derive(Debug, Deserialize)]
struct BsWeb {
    #[serde(default)]
    results: Vec<BsResult>,
}

#[derive(Debug, Deserialize)]
struct BsResult {
    title: String,
    url: String,
    #[serde(default)]
    description: String,
}

fn render_results(query: &str, body: &str) -> Result<String> {
    let parsed: BsResponse =
        serde_json::from_str(body).context("Failed to parse Brave Search JSON")?;

    let results = parsed.web.map(|w| w.results).unwrap_or_default();
    if results.is_empty() {
        return Err(anyhow!("Brave Search returned no results for '{query}'"));
    }

    let mut out = format!("🌍 Web results for: {query}\n");
    for (i, r) in results.iter().enumerate() {
        out.push_str(&format!("\n{}. {}\n   {}", i + 1, r.title, r.url));
        if !r.description.is_empty() {
            out.push_str(&format!("\n   {}", r.description));
        }
    }

    Ok(out)
}

#[async_trait]
impl Fallback for BraveFallback {
    fn id(&self) -> ProviderId {
        ProviderId::Brave
    }

    async fn answer(&self, question: &str) -> Result<String> {
        let url = format!("{}/res/v1/web/search", self.base_url.trim_end_matches('/'));
        let count = MAX_RESULTS.to_string();

        let res = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .header("X-Subscription-Token", &self.api_key)
            .query(&[("q", question), ("count", count.as_str())])
            .send()
            .await
            .context("Failed to send request to Brave Search")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read Brave Search response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Brave Search request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        render_results(question, &body)
    }
}
