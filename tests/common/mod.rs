#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use filingcast::AppState;
use filingcast::cache::{MemoryCache, SummaryCache};
use filingcast::config::{FeedConfig, FeedMode, Settings, SummarizerMode};
use filingcast::domain::Filing;
use filingcast::error::{FilingcastError, Result};
use filingcast::feed::{FilingSource, StaticSource};
use filingcast::summarizer::{MockSummarizer, Summarizer};

/// Summarizer that always fails like an unreachable upstream
pub struct FailingSummarizer;

#[async_trait]
impl Summarizer for FailingSummarizer {
    async fn summarize(&self, _filing: &Filing) -> Result<String> {
        Err(FilingcastError::SummarizerTransport(
            "connection refused".to_string(),
        ))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Feed source whose fetch always errors
pub struct BrokenSource;

#[async_trait]
impl FilingSource for BrokenSource {
    async fn fetch(&self) -> Result<Vec<Filing>> {
        Err(FilingcastError::FilingSource("upstream down".to_string()))
    }

    fn name(&self) -> &'static str {
        "broken"
    }
}

pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.http.listen = "127.0.0.1:0".to_string();
    settings.summarizer.mode = SummarizerMode::Mock;
    settings.feed = FeedConfig {
        enabled: false,
        mode: FeedMode::Static,
        ..FeedConfig::default()
    };
    settings.shutdown.drain_timeout_seconds = 0;
    settings
}

pub fn sample_filings() -> Vec<Filing> {
    vec![
        Filing::new("123", "Sample 8-K content"),
        Filing::new("124", "Another 8-K content"),
    ]
}

pub struct TestContext {
    pub state: Arc<AppState>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with(Arc::new(MockSummarizer), Arc::new(StaticSource::new(sample_filings())))
    }

    pub fn with(summarizer: Arc<dyn Summarizer>, source: Arc<dyn FilingSource>) -> Self {
        let cache: Arc<dyn SummaryCache> = Arc::new(MemoryCache::new());
        let state = AppState::new(test_settings(), summarizer, cache, source);
        Self { state }
    }

    pub fn router(&self) -> axum::Router {
        filingcast::api::create_router(self.state.clone())
    }

    /// Poll until the registry holds `n` members or two seconds pass
    pub async fn wait_for_connections(&self, n: usize) -> bool {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while tokio::time::Instant::now() < deadline {
            if self.state.registry.len().await == n {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.state.registry.len().await == n
    }
}
