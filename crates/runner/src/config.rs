//! Configuration loading for the batch runner
//!
//! One JSON file describes a run:
//! - Engine settings (fair value band, parallel sweeps, advisory thresholds)
//! - Company snapshots served by the in-memory provider
//! - Valuation requests
//! - Sensitivity sweeps with their discount and growth axes

use intrinsic_core::{DcfRequest, FinancialDataSnapshot, Rate, normalize_ticker};
use intrinsic_engine::{EngineConfig, SensitivityAxes};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Largest number of points on one sensitivity axis
pub const MAX_AXIS_POINTS: usize = 25;

/// Root configuration for a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Run name, echoed in the report
    #[serde(default = "default_run_name")]
    pub name: String,

    #[serde(default)]
    pub engine: EngineConfig,

    /// Financial data per company
    #[serde(default)]
    pub companies: Vec<FinancialDataSnapshot>,

    #[serde(default)]
    pub valuations: Vec<DcfRequest>,

    #[serde(default)]
    pub sensitivities: Vec<SensitivityConfig>,
}

fn default_run_name() -> String {
    "Intrinsic valuation run".to_string()
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            name: default_run_name(),
            engine: EngineConfig::default(),
            companies: Vec::new(),
            valuations: Vec::new(),
            sensitivities: Vec::new(),
        }
    }
}

impl RunnerConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse and check configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Structural checks; valuation inputs are left to the engine
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut tickers = HashSet::new();
        for company in &self.companies {
            let ticker = normalize_ticker(&company.ticker).ok_or_else(|| {
                ConfigError::InvalidCompany(format!("invalid ticker '{}'", company.ticker))
            })?;
            if !tickers.insert(ticker.clone()) {
                return Err(ConfigError::InvalidCompany(format!(
                    "duplicate company {}",
                    ticker
                )));
            }
        }

        for sweep in &self.sensitivities {
            sweep.discount_rates()?;
            sweep.growth_rates()?;
        }
        Ok(())
    }
}

/// One sensitivity sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityConfig {
    /// Base case; its rates are replaced cell by cell
    pub request: DcfRequest,
    pub discount_axis: AxisConfig,
    pub growth_axis: AxisConfig,
}

impl SensitivityConfig {
    pub fn discount_rates(&self) -> Result<Vec<Rate>, ConfigError> {
        self.discount_axis.rates("discount_axis")
    }

    pub fn growth_rates(&self) -> Result<Vec<Rate>, ConfigError> {
        self.growth_axis.rates("growth_axis")
    }
}

/// Axis of a sweep: explicit rates, or evenly spaced around a center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisConfig {
    Values(Vec<Rate>),
    Centered { center: Rate, step: Rate, count: usize },
}

impl AxisConfig {
    fn rates(&self, axis: &str) -> Result<Vec<Rate>, ConfigError> {
        let rates = match self {
            AxisConfig::Values(rates) => rates.clone(),
            AxisConfig::Centered {
                center,
                step,
                count,
            } => SensitivityAxes::centered(*center, *step, *count)
                .map_err(|e| ConfigError::InvalidAxis(format!("{}: {}", axis, e)))?,
        };

        if rates.is_empty() {
            return Err(ConfigError::InvalidAxis(format!("{} has no points", axis)));
        }
        if rates.len() > MAX_AXIS_POINTS {
            return Err(ConfigError::InvalidAxis(format!(
                "{} has {} points, at most {} allowed",
                axis,
                rates.len(),
                MAX_AXIS_POINTS
            )));
        }
        Ok(rates)
    }
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid company config: {0}")]
    InvalidCompany(String),

    #[error("Invalid sensitivity axis: {0}")]
    InvalidAxis(String),
}
