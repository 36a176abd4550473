use async_trait::async_trait;
use dashmap::DashMap;
use intrinsic_core::{FinancialDataSnapshot, Ticker, normalize_ticker};
use intrinsic_ports::{FinancialDataProvider, ProviderError, ProviderResult};
use std::sync::Arc;

/// In-memory financial data, keyed by normalized ticker
pub struct InMemoryFinancialDataProvider {
    snapshots: Arc<DashMap<Ticker, FinancialDataSnapshot>>,
}

impl InMemoryFinancialDataProvider {
    pub fn new() -> Self {
        InMemoryFinancialDataProvider {
            snapshots: Arc::new(DashMap::new()),
        }
    }

    pub fn with_snapshots(
        snapshots: impl IntoIterator<Item = FinancialDataSnapshot>,
    ) -> ProviderResult<Self> {
        let provider = Self::new();
        for snapshot in snapshots {
            provider.add(snapshot)?;
        }
        Ok(provider)
    }

    /// Add or replace a snapshot; its ticker is normalized on the way in
    pub fn add(&self, mut snapshot: FinancialDataSnapshot) -> ProviderResult<()> {
        let ticker = normalize_ticker(&snapshot.ticker)
            .ok_or_else(|| ProviderError::InvalidTicker(snapshot.ticker.clone()))?;
        snapshot.ticker = ticker.clone();
        self.snapshots.insert(ticker, snapshot);
        Ok(())
    }

    pub fn remove(&self, ticker: &str) -> Option<FinancialDataSnapshot> {
        let ticker = normalize_ticker(ticker)?;
        self.snapshots.remove(&ticker).map(|(_, snapshot)| snapshot)
    }

    /// Sorted tickers
    pub fn tickers(&self) -> Vec<Ticker> {
        let mut tickers: Vec<Ticker> = self
            .snapshots
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        tickers.sort();
        tickers
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl Default for InMemoryFinancialDataProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemoryFinancialDataProvider {
    fn clone(&self) -> Self {
        InMemoryFinancialDataProvider {
            snapshots: Arc::clone(&self.snapshots),
        }
    }
}

#[async_trait]
impl FinancialDataProvider for InMemoryFinancialDataProvider {
    async fn snapshot(&self, ticker: &str) -> ProviderResult<FinancialDataSnapshot> {
        let ticker =
            normalize_ticker(ticker).ok_or_else(|| ProviderError::InvalidTicker(ticker.to_string()))?;
        self.snapshots
            .get(&ticker)
            .map(|entry| entry.value().clone())
            .ok_or(ProviderError::UnknownTicker(ticker))
    }

    fn name(&self) -> &str {
        "InMemoryFinancialDataProvider"
    }
}
