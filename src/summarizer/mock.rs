use async_trait::async_trait;

use super::Summarizer;
use crate::domain::Filing;
use crate::error::Result;

/// Local stand-in used when no API key is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct MockSummarizer;

impl MockSummarizer {
    pub fn summary_for(filing_id: &str) -> String {
        format!(
            "Mock summary of filing {}: This is a test summary for local development. \
             The actual AI API would be called in production with a valid API key.",
            filing_id
        )
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, filing: &Filing) -> Result<String> {
        tracing::debug!(filing_id = %filing.id, "mock: summarizing filing");
        Ok(Self::summary_for(&filing.id))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_summary_mentions_filing() {
        let summary = MockSummarizer
            .summarize(&Filing::new("123", "Sample 8-K content"))
            .await
            .unwrap();
        assert!(summary.starts_with("Mock summary of filing 123:"));
        assert!(summary.ends_with("with a valid API key."));
    }
}
