use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::broadcast;

use crate::cache::{MemoryCache, SummaryCache};
use crate::config::Settings;
use crate::error::Result;
use crate::feed::{self, FilingSource};
use crate::pipeline::FilingProcessor;
use crate::scheduler::FeedScheduler;
use crate::summarizer::{self, Summarizer};
use crate::ws::ConnectionRegistry;

/// Shared application state
pub struct AppState {
    pub settings: Settings,
    pub registry: Arc<ConnectionRegistry>,
    pub cache: Arc<dyn SummaryCache>,
    pub processor: FilingProcessor,
    pub scheduler: FeedScheduler,
    pub shutdown_tx: broadcast::Sender<()>,
    shutting_down: AtomicBool,
}

impl AppState {
    pub fn new(
        settings: Settings,
        summarizer: Arc<dyn Summarizer>,
        cache: Arc<dyn SummaryCache>,
        source: Arc<dyn FilingSource>,
    ) -> Arc<Self> {
        let (shutdown_tx, _) = broadcast::channel(1);

        let registry = ConnectionRegistry::new();
        let processor = FilingProcessor::new(summarizer, cache.clone(), registry.clone());
        let scheduler = FeedScheduler::new(
            source,
            processor.clone(),
            settings.feed.interval_seconds,
        );

        Arc::new(Self {
            settings,
            registry,
            cache,
            processor,
            scheduler,
            shutdown_tx,
            shutting_down: AtomicBool::new(false),
        })
    }

    /// Build state with the collaborators named in `settings`
    pub fn from_settings(settings: Settings) -> Result<Arc<Self>> {
        let summarizer = summarizer::from_config(&settings.summarizer)?;
        let source = feed::from_config(&settings.feed)?;
        let cache: Arc<dyn SummaryCache> =
            Arc::new(MemoryCache::with_max_entries(settings.cache.max_entries));

        Ok(Self::new(settings, summarizer, cache, source))
    }

    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    pub fn trigger_shutdown(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
        let _ = self.shutdown_tx.send(());
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }

    /// Stop background work and wait out the configured drain period
    pub async fn drain(&self) {
        let drain_timeout = self.settings.shutdown.drain_timeout_seconds;
        let connections = self.registry.len().await;
        tracing::info!(
            drain_timeout_seconds = drain_timeout,
            connections,
            "shutdown signal received, beginning graceful shutdown"
        );

        self.trigger_shutdown();

        if drain_timeout > 0 {
            tracing::info!(seconds = drain_timeout, "waiting for drain period");
            tokio::time::sleep(Duration::from_secs(drain_timeout)).await;
        }

        let connections = self.registry.len().await;
        tracing::info!(connections, "graceful shutdown complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::feed::StaticSource;
    use crate::summarizer::MockSummarizer;

    fn state(drain_timeout_seconds: u64) -> Arc<AppState> {
        let mut settings = Settings::default();
        settings.shutdown.drain_timeout_seconds = drain_timeout_seconds;
        AppState::new(
            settings,
            Arc::new(MockSummarizer),
            Arc::new(MemoryCache::new()),
            Arc::new(StaticSource::default()),
        )
    }

    fn assert_send<T: Send>(_: &T) {}

    #[tokio::test]
    async fn test_drain_future_is_send() {
        // axum's graceful shutdown needs a Send future
        let state = state(0);
        let drain = state.drain();
        assert_send(&drain);
        drain.await;
    }

    #[tokio::test]
    async fn test_drain_triggers_shutdown() {
        let state = state(0);
        let mut shutdown_rx = state.subscribe_shutdown();
        assert!(!state.is_shutting_down());

        state.drain().await;

        assert!(state.is_shutting_down());
        assert!(shutdown_rx.try_recv().is_ok());
    }
}
