//! Valuation Service
//!
//! Async front of the engine. Requests are validated before any data is
//! fetched; the synchronous calculation then runs on tokio's blocking pool
//! so many valuations can proceed at once.

use intrinsic_core::{DcfInput, DcfOutput, DcfRequest, Rate};
use intrinsic_engine::{Advisory, DcfCalculator, SensitivityGrid, Validator, projector};
use intrinsic_ports::{Clock, FinancialDataProvider, ProviderError};
use log::{debug, error, info};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Valuation(#[from] intrinsic_engine::Error),

    #[error("Valuation task failed: {0}")]
    Task(String),
}

impl ServiceError {
    /// Taxonomy name used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Config(_) => "ConfigError",
            ServiceError::Provider(_) => "ProviderError",
            ServiceError::Valuation(err) => err.kind(),
            ServiceError::Task(_) => "TaskError",
        }
    }
}

impl From<intrinsic_engine::ValidationError> for ServiceError {
    fn from(err: intrinsic_engine::ValidationError) -> Self {
        ServiceError::Valuation(err.into())
    }
}

impl From<tokio::task::JoinError> for ServiceError {
    fn from(err: tokio::task::JoinError) -> Self {
        ServiceError::Task(err.to_string())
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// A valuation together with its advisories
#[derive(Debug, Clone)]
pub struct Appraisal {
    pub input: DcfInput,
    pub output: DcfOutput,
    pub advisories: Vec<Advisory>,
    /// Mean year-over-year revenue growth of the snapshot, in percent
    pub revenue_growth_pct: Option<Rate>,
}

pub struct ValuationService<P> {
    provider: Arc<P>,
    calculator: Arc<DcfCalculator>,
}

impl<P> Clone for ValuationService<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            calculator: Arc::clone(&self.calculator),
        }
    }
}

impl<P: FinancialDataProvider + 'static> ValuationService<P> {
    pub fn new(provider: Arc<P>, calculator: Arc<DcfCalculator>) -> Self {
        Self {
            provider,
            calculator,
        }
    }

    pub fn calculator(&self) -> &DcfCalculator {
        &self.calculator
    }

    /// Validate, fetch and value one request
    pub async fn appraise(&self, request: &DcfRequest) -> ServiceResult<Appraisal> {
        let input = Validator::validate_request(request)?
            .with_created_at(self.calculator.clock().now());
        let data = self.provider.snapshot(&input.ticker).await?;
        debug!(
            "Fetched {} from {} ({} fiscal years)",
            input.ticker,
            self.provider.name(),
            data.fiscal_years.len()
        );

        let calculator = Arc::clone(&self.calculator);
        tokio::task::spawn_blocking(move || -> ServiceResult<Appraisal> {
            let output = calculator.calculate(&input, &data)?;
            let advisories = calculator.advise(&input, Some(&output));
            let revenue_growth_pct = projector::historical_growth_rate(&data.revenue)?;
            Ok(Appraisal {
                input,
                output,
                advisories,
                revenue_growth_pct,
            })
        })
        .await?
    }

    /// Appraise every request concurrently; results keep request order
    pub async fn appraise_all(&self, requests: &[DcfRequest]) -> Vec<ServiceResult<Appraisal>> {
        info!("Appraising {} requests", requests.len());

        let mut tasks = JoinSet::new();
        for (index, request) in requests.iter().cloned().enumerate() {
            let service = self.clone();
            tasks.spawn(async move { (index, service.appraise(&request).await) });
        }

        let mut results: Vec<Option<ServiceResult<Appraisal>>> =
            requests.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(err) => error!("Appraisal task failed: {}", err),
            }
        }

        results
            .into_iter()
            .map(|result| {
                result.unwrap_or_else(|| Err(ServiceError::Task("task did not complete".into())))
            })
            .collect()
    }

    /// Fetch and sweep one request over the given axes.
    ///
    /// Only the presence of required fields is checked up front. Range and
    /// cross-field rules apply per cell, so a base case that breaks them
    /// fails on its own and the rest of the grid still runs.
    pub async fn sweep(
        &self,
        request: &DcfRequest,
        discount_rates: Vec<Rate>,
        growth_rates: Vec<Rate>,
    ) -> ServiceResult<SensitivityGrid> {
        let input = Validator::input_from_request(request)?
            .with_created_at(self.calculator.clock().now());
        let data = self.provider.snapshot(&input.ticker).await?;

        let calculator = Arc::clone(&self.calculator);
        let grid = tokio::task::spawn_blocking(move || {
            calculator.calculate_sensitivity(&input, &data, &discount_rates, &growth_rates)
        })
        .await?;
        Ok(grid)
    }
}
