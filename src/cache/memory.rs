use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use tokio::sync::RwLock;

use super::SummaryCache;
use crate::error::Result;

#[derive(Debug, Default)]
struct Entries {
    values: HashMap<String, String>,
    order: VecDeque<String>,
}

/// In-process summary cache with optional insertion-order eviction
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<Entries>,
    max_entries: Option<usize>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_entries(max_entries: Option<usize>) -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            max_entries: max_entries.map(|m| m.max(1)),
        }
    }
}

#[async_trait]
impl SummaryCache for MemoryCache {
    async fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().await;

        if entries
            .values
            .insert(key.to_string(), value.to_string())
            .is_none()
        {
            entries.order.push_back(key.to_string());
        }

        if let Some(max) = self.max_entries {
            while entries.values.len() > max {
                let Some(oldest) = entries.order.pop_front() else {
                    break;
                };
                entries.values.remove(&oldest);
                tracing::debug!(key = %oldest, "evicted cached summary");
            }
        }

        tracing::debug!(key = %key, entries = entries.values.len(), "cached summary");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.values.get(key).cloned())
    }

    async fn len(&self) -> usize {
        self.entries.read().await.values.len()
    }
}
