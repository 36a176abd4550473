use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::values::{Rate, Ticker, Timestamp};

/// Horizon used when a request does not name one
pub const DEFAULT_PROJECTION_YEARS: u32 = 5;

fn default_projection_years() -> u32 {
    DEFAULT_PROJECTION_YEARS
}

/// Assumptions for one DCF valuation.
///
/// All rates are percentages (`8` means 8%). The struct is a plain value
/// object: range and cross-field checks live in the engine's validator so
/// that a bad input is reported before any arithmetic runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcfInput {
    /// Identifier that outputs link back to
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// Company being valued
    pub ticker: Ticker,

    /// Discount rate (cost of capital)
    pub discount_rate: Rate,

    /// Annual free cash flow growth over the projection horizon, or in the
    /// first year when `final_growth_rate` is set
    pub growth_rate: Rate,

    /// Growth in the last projected year. When present, growth fades
    /// linearly from `growth_rate` to this rate across the horizon.
    #[serde(default)]
    pub final_growth_rate: Option<Rate>,

    /// Perpetual growth after the horizon
    pub terminal_growth_rate: Rate,

    /// Number of explicitly projected years
    #[serde(default = "default_projection_years")]
    pub projection_years: u32,

    /// Who asked for the valuation, if known
    #[serde(default)]
    pub requested_by: Option<String>,

    /// When the assumptions were recorded
    #[serde(default = "Utc::now")]
    pub created_at: Timestamp,
}

impl DcfInput {
    /// Create an input with the default five-year horizon
    pub fn new(
        ticker: impl Into<String>,
        discount_rate: Rate,
        growth_rate: Rate,
        terminal_growth_rate: Rate,
    ) -> Self {
        let ticker: String = ticker.into();
        Self {
            id: Uuid::new_v4(),
            ticker: ticker.trim().to_ascii_uppercase(),
            discount_rate,
            growth_rate,
            final_growth_rate: None,
            terminal_growth_rate,
            projection_years: DEFAULT_PROJECTION_YEARS,
            requested_by: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_projection_years(mut self, years: u32) -> Self {
        self.projection_years = years;
        self
    }

    pub fn with_requester(mut self, requester: impl Into<String>) -> Self {
        self.requested_by = Some(requester.into());
        self
    }

    /// Fade growth linearly to `final_growth_rate` by the last projected year
    pub fn with_final_growth_rate(mut self, final_growth_rate: Rate) -> Self {
        self.final_growth_rate = Some(final_growth_rate);
        self
    }

    /// Restamp with a caller-supplied instant, typically from a clock
    pub fn with_created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = created_at;
        self
    }

    /// Derive an input that differs only in discount and growth rate.
    ///
    /// The derived input keeps this input's id, so every sensitivity cell
    /// links back to the request that produced it.
    pub fn with_rates(&self, discount_rate: Rate, growth_rate: Rate) -> Self {
        Self {
            discount_rate,
            growth_rate,
            ..self.clone()
        }
    }
}

/// A valuation request as it arrives from an outer layer (config file,
/// HTTP body). Every field may be absent; the validator turns it into a
/// [`DcfInput`] or names the first missing field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DcfRequest {
    pub ticker: Option<String>,
    pub discount_rate: Option<Rate>,
    pub growth_rate: Option<Rate>,
    pub final_growth_rate: Option<Rate>,
    pub terminal_growth_rate: Option<Rate>,
    pub projection_years: Option<u32>,
    pub requested_by: Option<String>,
}
