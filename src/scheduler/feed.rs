use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

use crate::error::Result;
use crate::feed::FilingSource;
use crate::observability::metrics::SCHEDULED_CYCLES;
use crate::pipeline::{CycleReport, FilingProcessor};

/// Periodically pulls filings from the feed and runs them through the pipeline
#[derive(Clone)]
pub struct FeedScheduler {
    source: Arc<dyn FilingSource>,
    processor: FilingProcessor,
    interval: Duration,
}

impl FeedScheduler {
    pub fn new(
        source: Arc<dyn FilingSource>,
        processor: FilingProcessor,
        interval_seconds: u64,
    ) -> Self {
        Self {
            source,
            processor,
            interval: Duration::from_secs(interval_seconds.max(1)),
        }
    }

    pub async fn run(&self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            source = self.source.name(),
            "starting feed scheduler"
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.run_cycle().await {
                        tracing::error!(error = %e, "scheduled cycle failed");
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("feed scheduler shutting down");
                    break;
                }
            }
        }
    }

    /// Run one fetch/process cycle (also used by the manual trigger endpoint)
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let filings = match self.source.fetch().await {
            Ok(filings) => filings,
            Err(e) => {
                SCHEDULED_CYCLES.with_label_values(&["fetch_failed"]).inc();
                return Err(e);
            }
        };

        let report = self
            .processor
            .process_batch(&filings, self.source.name())
            .await;

        let status = if report.failed == 0 { "ok" } else { "partial" };
        SCHEDULED_CYCLES.with_label_values(&[status]).inc();

        tracing::info!(
            fetched = report.fetched,
            processed = report.processed,
            failed = report.failed,
            "scheduled cycle complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::cache::{MemoryCache, SummaryCache};
    use crate::domain::Filing;
    use crate::error::FilingcastError;
    use crate::feed::StaticSource;
    use crate::summarizer::MockSummarizer;
    use crate::ws::{Connection, ConnectionRegistry};

    struct BrokenSource;

    #[async_trait]
    impl FilingSource for BrokenSource {
        async fn fetch(&self) -> Result<Vec<Filing>> {
            Err(FilingcastError::FilingSource("connection refused".into()))
        }

        fn name(&self) -> &'static str {
            "broken"
        }
    }

    fn processor(registry: Arc<ConnectionRegistry>, cache: Arc<MemoryCache>) -> FilingProcessor {
        FilingProcessor::new(Arc::new(MockSummarizer), cache, registry)
    }

    #[tokio::test]
    async fn test_cycle_processes_feed() {
        let registry = ConnectionRegistry::new();
        let cache = Arc::new(MemoryCache::new());
        let (conn, mut peer) = Connection::pair(4);
        registry.register(conn).await;

        let source = Arc::new(StaticSource::new(vec![
            Filing::new("123", "Sample 8-K content"),
            Filing::new("124", "Another filing"),
        ]));
        let scheduler = FeedScheduler::new(source, processor(registry, cache.clone()), 60);

        let report = scheduler.run_cycle().await.unwrap();
        assert_eq!(report.processed, 2);
        assert_eq!(cache.len().await, 2);
        assert!(peer.try_recv().unwrap().contains(r#""filingId":"123""#));
        assert!(peer.try_recv().unwrap().contains(r#""filingId":"124""#));
    }

    #[tokio::test]
    async fn test_cycle_surfaces_fetch_error() {
        let scheduler = FeedScheduler::new(
            Arc::new(BrokenSource),
            processor(ConnectionRegistry::new(), Arc::new(MemoryCache::new())),
            60,
        );
        assert!(matches!(
            scheduler.run_cycle().await,
            Err(FilingcastError::FilingSource(_))
        ));
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let cache = Arc::new(MemoryCache::new());
        let scheduler = FeedScheduler::new(
            Arc::new(StaticSource::new(vec![Filing::new("1", "x")])),
            processor(ConnectionRegistry::new(), cache.clone()),
            3600,
        );
        let (tx, rx) = broadcast::channel(1);

        let handle = tokio::spawn(async move { scheduler.run(rx).await });
        // First tick fires immediately
        tokio::time::timeout(Duration::from_secs(2), async {
            while cache.len().await == 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();

        tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
