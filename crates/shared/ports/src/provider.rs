use async_trait::async_trait;
use intrinsic_core::FinancialDataSnapshot;

use crate::error::ProviderResult;

/// Source of per-company financial figures.
///
/// Implementations own fetching and caching. The valuation core only sees
/// the snapshot they return and never holds on to it between calls.
#[async_trait]
pub trait FinancialDataProvider: Send + Sync {
    /// Latest snapshot for a normalized ticker
    async fn snapshot(&self, ticker: &str) -> ProviderResult<FinancialDataSnapshot>;

    /// Provider name for logs
    fn name(&self) -> &str {
        "FinancialDataProvider"
    }
}
