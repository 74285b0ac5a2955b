mod http;

pub use http::*;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{FeedConfig, FeedMode};
use crate::domain::Filing;
use crate::error::{FilingcastError, Result};

/// Trait for upstream filing feeds
#[async_trait]
pub trait FilingSource: Send + Sync {
    /// Fetch the current batch of filings
    async fn fetch(&self) -> Result<Vec<Filing>>;

    fn name(&self) -> &'static str;
}

/// Serves a fixed list of filings
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    filings: Vec<Filing>,
}

impl StaticSource {
    pub fn new(filings: Vec<Filing>) -> Self {
        Self { filings }
    }
}

#[async_trait]
impl FilingSource for StaticSource {
    async fn fetch(&self) -> Result<Vec<Filing>> {
        Ok(self.filings.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

pub fn from_config(config: &FeedConfig) -> Result<Arc<dyn FilingSource>> {
    match config.mode {
        FeedMode::Static => {
            tracing::info!(filings = config.filings.len(), "using static filing source");
            Ok(Arc::new(StaticSource::new(config.filings.clone())))
        }
        FeedMode::Http => {
            let url = config
                .url
                .clone()
                .ok_or_else(|| FilingcastError::Config("feed mode http requires url".into()))?;
            tracing::info!(url = %url, "using HTTP filing source");
            Ok(Arc::new(HttpSource::new(url)?))
        }
    }
}
