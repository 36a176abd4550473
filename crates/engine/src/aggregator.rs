//! Valuation Aggregation
//!
//! Turns the discounted pieces into per-share figures and a classification:
//!
//! ```text
//! EV          = PV + TV (today)
//! equity      = EV - latest total debt
//! fair value  = equity / shares            (money scale)
//! upside %    = (fair - price) / price × 100
//! ```
//!
//! Classification compares the fair value with a symmetric band around the
//! market price, `price × (1 ± band/100)`. Fair values inside the band,
//! edges included, are a fair value. The band is worked in money terms, so
//! an extreme upside percentage never decides or blocks the outcome.

use intrinsic_core::{DataField, FinancialDataSnapshot, Money, Rate, ValuationStatus};
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{Error, Result, Stage};
use crate::policy::{self, QuantityClass};

/// Default half-width of the fair value band, in percent
pub const DEFAULT_FAIR_VALUE_BAND_PCT: Rate = dec!(5);

/// The latest per-company figures the aggregation needs, already checked
#[derive(Debug, Clone, PartialEq)]
pub struct LatestFigures {
    shares: Decimal,
    total_debt: Money,
    price: Money,
}

impl LatestFigures {
    /// Absent debt counts as zero debt. Shares and price must be present and
    /// positive.
    pub fn new(
        ticker: &str,
        shares: Option<Decimal>,
        total_debt: Option<Money>,
        price: Option<Money>,
    ) -> Result<Self> {
        let stage = Stage::Aggregation;

        let shares = shares
            .ok_or_else(|| Error::missing(ticker, DataField::SharesOutstanding, "is absent"))?;
        let shares = policy::fit(shares, QuantityClass::Shares, stage)?;
        if shares <= Decimal::ZERO {
            return Err(Error::missing(
                ticker,
                DataField::SharesOutstanding,
                format!("must be positive, got {}", shares),
            ));
        }

        let price =
            price.ok_or_else(|| Error::missing(ticker, DataField::CurrentPrice, "is absent"))?;
        let price = policy::fit(price, QuantityClass::Money, stage)?;
        if price <= Decimal::ZERO {
            return Err(Error::missing(
                ticker,
                DataField::CurrentPrice,
                format!("must be positive, got {}", price),
            ));
        }

        let total_debt = policy::fit(
            total_debt.unwrap_or(Decimal::ZERO),
            QuantityClass::Intermediate,
            stage,
        )?;

        Ok(Self {
            shares,
            total_debt,
            price,
        })
    }

    pub fn from_snapshot(snapshot: &FinancialDataSnapshot) -> Result<Self> {
        Self::new(
            &snapshot.ticker,
            snapshot.latest_shares_outstanding(),
            snapshot.latest_total_debt(),
            snapshot.current_price,
        )
    }

    pub fn shares(&self) -> Decimal {
        self.shares
    }

    pub fn total_debt(&self) -> Money {
        self.total_debt
    }

    pub fn price(&self) -> Money {
        self.price
    }
}

/// Aggregated figures of one valuation, before display rounding
#[derive(Debug, Clone, PartialEq)]
pub struct Valuation {
    pub enterprise_value: Money,
    pub equity_value: Money,
    pub fair_value_per_share: Money,
    pub upside_pct: Option<Rate>,
    pub margin_of_safety_pct: Option<Rate>,
    pub status: ValuationStatus,
}

#[derive(Debug, Clone)]
pub struct ValuationAggregator {
    band_pct: Rate,
}

impl Default for ValuationAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_FAIR_VALUE_BAND_PCT)
    }
}

impl ValuationAggregator {
    /// A negative band is treated as its magnitude
    pub fn new(band_pct: Rate) -> Self {
        Self {
            band_pct: band_pct.abs(),
        }
    }

    pub fn band_pct(&self) -> Rate {
        self.band_pct
    }

    pub fn aggregate(
        &self,
        present_value: Money,
        discounted_terminal_value: Money,
        figures: &LatestFigures,
    ) -> Result<Valuation> {
        let stage = Stage::Aggregation;

        let enterprise_value = policy::add(
            present_value,
            discounted_terminal_value,
            QuantityClass::Intermediate,
            stage,
        )?;
        let equity_value = policy::sub(
            enterprise_value,
            figures.total_debt,
            QuantityClass::Intermediate,
            stage,
        )?;
        let fair_value_per_share =
            policy::divide(equity_value, figures.shares, QuantityClass::Money, stage)?;

        let upside_pct = upside_pct(fair_value_per_share, figures.price)?;
        let margin_of_safety_pct = margin_of_safety_pct(fair_value_per_share, figures.price)?;
        let status = self.classify(fair_value_per_share, figures.price)?;

        debug!(
            "Aggregated EV={} equity={} fair={} price={} upside={:?}% -> {}",
            enterprise_value, equity_value, fair_value_per_share, figures.price, upside_pct, status
        );

        Ok(Valuation {
            enterprise_value,
            equity_value,
            fair_value_per_share,
            upside_pct,
            margin_of_safety_pct,
            status,
        })
    }

    /// Place a fair value against the band around `price`
    pub fn classify(&self, fair_value: Money, price: Money) -> Result<ValuationStatus> {
        let stage = Stage::Classification;
        let band = policy::percent_to_fraction(self.band_pct, stage)?;
        let upper_factor = policy::add(Decimal::ONE, band, QuantityClass::Factor, stage)?;
        let lower_factor = policy::sub(Decimal::ONE, band, QuantityClass::Factor, stage)?;
        let upper = policy::mul(price, upper_factor, QuantityClass::Intermediate, stage)?;
        let lower = policy::mul(price, lower_factor, QuantityClass::Intermediate, stage)?;

        Ok(if fair_value > upper {
            ValuationStatus::Undervalued
        } else if fair_value < lower {
            ValuationStatus::Overvalued
        } else {
            ValuationStatus::FairValue
        })
    }
}

/// `(fair - price) / price × 100` at rate scale, `None` when too large to hold
pub fn upside_pct(fair_value: Money, price: Money) -> Result<Option<Rate>> {
    let stage = Stage::Classification;
    let difference = policy::sub(fair_value, price, QuantityClass::Money, stage)?;
    policy::percentage(difference, price, stage)
}

/// `(fair - price) / fair × 100`, `None` unless fair value is positive
pub fn margin_of_safety_pct(fair_value: Money, price: Money) -> Result<Option<Rate>> {
    if fair_value <= Decimal::ZERO {
        return Ok(None);
    }
    let stage = Stage::Classification;
    let difference = policy::sub(fair_value, price, QuantityClass::Money, stage)?;
    policy::percentage(difference, fair_value, stage)
}
