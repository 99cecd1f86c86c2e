use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::performance::PortfolioPerformance;

/// Durable store of calculation runs.
///
/// Records are immutable snapshots; the store only assigns ids. Ordering of
/// `list` is defined by the store (local stores return newest first).
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Human-readable name of this store (for logs/errors).
    fn name(&self) -> &str;

    /// All records, without per-stock rows.
    async fn list(&self) -> Result<Vec<PortfolioPerformance>, CoreError>;

    /// One record with its per-stock rows. Unknown ids fail with
    /// `CoreError::HistoryNotFound`.
    async fn get(&self, id: i64) -> Result<PortfolioPerformance, CoreError>;

    /// Persist a record and return it with its assigned id.
    async fn create(
        &self,
        performance: &PortfolioPerformance,
    ) -> Result<PortfolioPerformance, CoreError>;
}

/// Newest first, ties broken by id descending.
pub(crate) fn sort_newest_first(records: &mut [PortfolioPerformance]) {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
}
