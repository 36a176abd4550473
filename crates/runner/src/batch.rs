//! Batch Run
//!
//! Executes everything a [`RunnerConfig`] describes:
//!
//! ```text
//! RunnerConfig ──► InMemoryFinancialDataProvider ◄── companies
//!      │
//!      ├── valuations ────► ValuationService::appraise_all ──► ValuationEntry*
//!      │
//!      └── sensitivities ─► ValuationService::sweep ─────────► SensitivityEntry*
//!                                                                   │
//!                                           ValuationStats ◄────────┘
//! ```

use intrinsic_engine::{DcfCalculator, ValuationStats};
use intrinsic_ports::Clock;
use log::{info, warn};
use std::sync::Arc;

use crate::config::RunnerConfig;
use crate::provider::InMemoryFinancialDataProvider;
use crate::report::{BatchReport, SensitivityEntry, ValuationEntry};
use crate::service::{ServiceResult, ValuationService};

pub struct BatchRunner {
    config: RunnerConfig,
    service: ValuationService<InMemoryFinancialDataProvider>,
    clock: Arc<dyn Clock>,
}

impl BatchRunner {
    pub fn new(config: RunnerConfig, clock: Arc<dyn Clock>) -> ServiceResult<Self> {
        config.validate()?;
        let provider = InMemoryFinancialDataProvider::with_snapshots(config.companies.clone())?;
        info!(
            "Loaded {} companies for run '{}'",
            provider.len(),
            config.name
        );

        let calculator = DcfCalculator::new(config.engine.clone(), Arc::clone(&clock));
        let service = ValuationService::new(Arc::new(provider), Arc::new(calculator));
        Ok(Self {
            config,
            service,
            clock,
        })
    }

    pub fn service(&self) -> &ValuationService<InMemoryFinancialDataProvider> {
        &self.service
    }

    pub async fn run(&self) -> ServiceResult<BatchReport> {
        let results = self.service.appraise_all(&self.config.valuations).await;
        let valuations: Vec<ValuationEntry> = self
            .config
            .valuations
            .iter()
            .zip(&results)
            .map(|(request, result)| ValuationEntry::new(request.ticker.clone(), result))
            .collect();

        let mut sensitivities = Vec::with_capacity(self.config.sensitivities.len());
        for sweep in &self.config.sensitivities {
            let ticker = sweep.request.ticker.clone();
            let outcome = self
                .service
                .sweep(&sweep.request, sweep.discount_rates()?, sweep.growth_rates()?)
                .await;
            match outcome {
                Ok(grid) => sensitivities.push(SensitivityEntry::from_grid(&grid)),
                Err(err) => {
                    warn!("Sensitivity sweep for {:?} failed: {}", ticker, err);
                    sensitivities.push(SensitivityEntry::failed(ticker, &err));
                }
            }
        }

        let stats = ValuationStats::from_outputs(
            results
                .iter()
                .filter_map(|result| result.as_ref().ok())
                .map(|appraisal| &appraisal.output),
        )?;

        let report = BatchReport {
            name: self.config.name.clone(),
            generated_at: self.clock.now(),
            valuations,
            sensitivities,
            stats,
        };
        info!(
            "Run '{}' complete: {} valuations, {} sweeps, {} failures",
            report.name,
            report.valuations.len(),
            report.sensitivities.len(),
            report.failure_count()
        );
        Ok(report)
    }
}
