//! Engine Configuration

use intrinsic_core::Rate;
use serde::{Deserialize, Serialize};

use crate::advisory::AdvisoryConfig;
use crate::aggregator::DEFAULT_FAIR_VALUE_BAND_PCT;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Half-width of the fair value band in percent, edges inclusive
    pub fair_value_band_pct: Rate,
    /// Run sensitivity cells on the rayon pool
    pub parallel_sensitivity: bool,
    pub advisories: AdvisoryConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fair_value_band_pct: DEFAULT_FAIR_VALUE_BAND_PCT,
            parallel_sensitivity: false,
            advisories: AdvisoryConfig::default(),
        }
    }
}
