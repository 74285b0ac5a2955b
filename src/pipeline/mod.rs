//! Summarize → cache → broadcast, for one filing or a batch.

use std::sync::Arc;

use crate::cache::SummaryCache;
use crate::domain::{Filing, FilingSummary};
use crate::error::{FilingcastError, Result};
use crate::observability::metrics::FILINGS_PROCESSED;
use crate::summarizer::Summarizer;
use crate::ws::{BroadcastOutcome, ConnectionRegistry};

#[derive(Debug, Clone)]
pub struct Processed {
    pub summary: FilingSummary,
    pub broadcast: BroadcastOutcome,
}

/// Per-batch tally; a failed item never stops the rest of the batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub fetched: usize,
    pub processed: usize,
    pub failed: usize,
}

#[derive(Clone)]
pub struct FilingProcessor {
    summarizer: Arc<dyn Summarizer>,
    cache: Arc<dyn SummaryCache>,
    registry: Arc<ConnectionRegistry>,
}

impl FilingProcessor {
    pub fn new(
        summarizer: Arc<dyn Summarizer>,
        cache: Arc<dyn SummaryCache>,
        registry: Arc<ConnectionRegistry>,
    ) -> Self {
        Self {
            summarizer,
            cache,
            registry,
        }
    }

    pub fn summarizer_name(&self) -> &'static str {
        self.summarizer.name()
    }

    /// Run one filing through the pipeline. `origin` labels metrics and logs.
    pub async fn process(&self, filing: &Filing, origin: &str) -> Result<Processed> {
        let result = self.process_inner(filing).await;
        let status = if result.is_ok() { "ok" } else { "error" };
        FILINGS_PROCESSED.with_label_values(&[origin, status]).inc();
        result
    }

    async fn process_inner(&self, filing: &Filing) -> Result<Processed> {
        if filing.id.trim().is_empty() {
            return Err(FilingcastError::InvalidRequest("filing id is required".into()));
        }

        let summary = self.summarizer.summarize(filing).await?;

        self.cache.put(&filing.id, &summary).await?;
        tracing::info!(
            filing_id = %filing.id,
            summarizer = self.summarizer.name(),
            "summary stored"
        );

        let payload = filing.summarized(summary);
        let json = serde_json::to_string(&payload)?;
        let broadcast = self.registry.broadcast(json).await;

        Ok(Processed {
            summary: payload,
            broadcast,
        })
    }

    /// Process every filing, logging and counting failures instead of aborting
    pub async fn process_batch(&self, filings: &[Filing], origin: &str) -> CycleReport {
        let mut report = CycleReport {
            fetched: filings.len(),
            ..CycleReport::default()
        };

        for filing in filings {
            match self.process(filing, origin).await {
                Ok(_) => report.processed += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::error!(filing_id = %filing.id, error = %e, "failed to process filing");
                }
            }
        }

        report
    }
}
