use async_trait::async_trait;
use std::sync::Mutex;

use crate::errors::CoreError;
use crate::models::performance::PortfolioPerformance;
use super::traits::{sort_newest_first, HistoryStore};

/// In-process history store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    records: Mutex<Vec<PortfolioPerformance>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<PortfolioPerformance>>, CoreError> {
        self.records
            .lock()
            .map_err(|_| CoreError::Persistence("history lock poisoned".into()))
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list(&self) -> Result<Vec<PortfolioPerformance>, CoreError> {
        let mut summaries: Vec<PortfolioPerformance> =
            self.lock()?.iter().map(PortfolioPerformance::summary).collect();
        sort_newest_first(&mut summaries);
        Ok(summaries)
    }

    async fn get(&self, id: i64) -> Result<PortfolioPerformance, CoreError> {
        self.lock()?
            .iter()
            .find(|r| r.id == Some(id))
            .cloned()
            .ok_or(CoreError::HistoryNotFound(id))
    }

    async fn create(
        &self,
        performance: &PortfolioPerformance,
    ) -> Result<PortfolioPerformance, CoreError> {
        let mut records = self.lock()?;
        let id = records.iter().filter_map(|r| r.id).max().unwrap_or(0) + 1;
        let stored = performance.with_id(id);
        records.push(stored.clone());
        Ok(stored)
    }
}
