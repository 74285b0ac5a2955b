mod groq;
mod mock;

pub use groq::*;
pub use mock::*;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{SummarizerConfig, SummarizerMode};
use crate::domain::Filing;
use crate::error::{FilingcastError, Result};

/// Key value shipped in sample configs; treated as "no key"
pub const PLACEHOLDER_API_KEY: &str = "your-groq-key";

/// Trait for filing summarization backends
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Produce summary text for a filing
    async fn summarize(&self, filing: &Filing) -> Result<String>;

    /// Short name used in logs and metric labels
    fn name(&self) -> &'static str;
}

/// Pick the summarizer for `config`, reading the API key from the environment
pub fn from_config(config: &SummarizerConfig) -> Result<Arc<dyn Summarizer>> {
    let api_key = std::env::var(&config.api_key_env).ok();
    select(config, api_key)
}

fn select(config: &SummarizerConfig, api_key: Option<String>) -> Result<Arc<dyn Summarizer>> {
    let api_key = api_key.filter(|k| usable_key(k));

    match (config.mode, api_key) {
        (SummarizerMode::Mock, _) => {
            tracing::info!("using mock summarizer");
            Ok(Arc::new(MockSummarizer))
        }
        (SummarizerMode::Auto, None) => {
            tracing::info!(
                api_key_env = %config.api_key_env,
                "no API key configured, using mock summarizer"
            );
            Ok(Arc::new(MockSummarizer))
        }
        (SummarizerMode::Groq, None) => Err(FilingcastError::Config(format!(
            "summarizer mode groq requires {} to be set",
            config.api_key_env
        ))),
        (SummarizerMode::Auto | SummarizerMode::Groq, Some(key)) => {
            tracing::info!(endpoint = %config.endpoint, model = %config.model, "using groq summarizer");
            Ok(Arc::new(GroqSummarizer::new(config, key)?))
        }
    }
}

fn usable_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && key != PLACEHOLDER_API_KEY
}
