mod memory;

pub use memory::*;

use async_trait::async_trait;

use crate::error::Result;

/// Key-value store for generated summaries, keyed by filing id
#[async_trait]
pub trait SummaryCache: Send + Sync {
    async fn put(&self, key: &str, value: &str) -> Result<()>;

    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn len(&self) -> usize;
}
