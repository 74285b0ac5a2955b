use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::Summarizer;
use crate::config::SummarizerConfig;
use crate::domain::Filing;
use crate::error::{FilingcastError, Result};
use crate::observability::metrics::SUMMARIZER_LATENCY;

/// Summarizer backed by an OpenAI-compatible chat completions API
pub struct GroqSummarizer {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl std::fmt::Debug for GroqSummarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqSummarizer")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

impl GroqSummarizer {
    pub fn new(config: &SummarizerConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| FilingcastError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
        })
    }

    pub fn build_request<'a>(&'a self, filing: &Filing) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt_for(filing),
            }],
        }
    }

    async fn request(&self, filing: &Filing) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.build_request(filing))
            .send()
            .await
            .map_err(|e| FilingcastError::SummarizerTransport(e.to_string()))?;

        let status = response.status();
        tracing::debug!(filing_id = %filing.id, status = %status, "summarizer responded");

        let body = response
            .text()
            .await
            .map_err(|e| FilingcastError::SummarizerTransport(e.to_string()))?;

        if !status.is_success() {
            return Err(FilingcastError::SummarizerStatus {
                status: status.as_u16(),
                body,
            });
        }

        parse_completion(&body)
    }
}

pub fn prompt_for(filing: &Filing) -> String {
    format!("Summarize this 8-K filing: {}", filing.content)
}

/// Pull `choices[0].message.content` out of a completion body
pub fn parse_completion(body: &str) -> Result<String> {
    let completion: ChatCompletion = serde_json::from_str(body)
        .map_err(|e| FilingcastError::SummarizerFormat(e.to_string()))?;

    completion
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .ok_or_else(|| FilingcastError::SummarizerFormat("missing choices[0].message".into()))
}

#[async_trait]
impl Summarizer for GroqSummarizer {
    async fn summarize(&self, filing: &Filing) -> Result<String> {
        let start = Instant::now();
        let result = self.request(filing).await;
        let status = if result.is_ok() { "ok" } else { "error" };
        SUMMARIZER_LATENCY
            .with_label_values(&[self.name(), status])
            .observe(start.elapsed().as_secs_f64());

        if let Err(ref e) = result {
            tracing::warn!(filing_id = %filing.id, error = %e, "groq summarization failed");
        }
        result
    }

    fn name(&self) -> &'static str {
        "groq"
    }
}
