//! Input Validation
//!
//! Checks a valuation input before any arithmetic runs. Rules are applied
//! in a fixed order and the first violation is returned:
//!
//! 1. Required fields are present (ticker non-blank and well formed)
//! 2. Each field lies in its numeric range
//! 3. Each rate respects its integer-digit and fractional-digit limits
//! 4. Terminal growth is strictly below the discount rate

use intrinsic_core::{DEFAULT_PROJECTION_YEARS, DcfInput, DcfRequest, Rate, normalize_ticker};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{InputField, ValidationError, Violation};
use crate::policy::{QuantityClass, fractional_digits, integer_digits};

pub const MIN_PROJECTION_YEARS: u32 = 1;
pub const MAX_PROJECTION_YEARS: u32 = 20;

/// Range and digit limits for one percentage field
#[derive(Debug, Clone, Copy)]
struct RateRule {
    field: InputField,
    min: Decimal,
    max: Decimal,
    max_integer_digits: u32,
}

fn growth_rule(field: InputField) -> RateRule {
    RateRule {
        field,
        min: dec!(-100),
        max: dec!(1000),
        max_integer_digits: 4,
    }
}

fn rate_rules(input: &DcfInput) -> Vec<(RateRule, Rate)> {
    let mut rules = vec![
        (
            RateRule {
                field: InputField::DiscountRate,
                min: dec!(0),
                max: dec!(100),
                max_integer_digits: 3,
            },
            input.discount_rate,
        ),
        (growth_rule(InputField::GrowthRate), input.growth_rate),
    ];
    if let Some(final_rate) = input.final_growth_rate {
        rules.push((growth_rule(InputField::FinalGrowthRate), final_rate));
    }
    rules.push((
        RateRule {
            field: InputField::TerminalGrowthRate,
            min: dec!(0),
            max: dec!(10),
            max_integer_digits: 2,
        },
        input.terminal_growth_rate,
    ));
    rules
}

/// Validates valuation inputs
///
/// Stateless: every rule is a pure function of the input.
pub struct Validator;

impl Validator {
    /// Check an input; `Ok(())` means every rule passed
    pub fn validate(input: &DcfInput) -> Result<(), ValidationError> {
        Self::check_presence(input)?;
        Self::check_ranges(input)?;
        Self::check_digits(input)?;
        Self::check_cross_fields(input)
    }

    /// Build an input from a raw request, reporting the first absent
    /// required field, then run [`Validator::validate`] on the result.
    pub fn validate_request(request: &DcfRequest) -> Result<DcfInput, ValidationError> {
        let input = Self::input_from_request(request)?;
        Self::validate(&input)?;
        Ok(input)
    }

    /// Build an input from a raw request with presence checks only.
    ///
    /// Sweeps start from such an input: a base case that breaks a range or
    /// cross-field rule fails on its own while the grid still runs.
    pub fn input_from_request(request: &DcfRequest) -> Result<DcfInput, ValidationError> {
        let ticker = request
            .ticker
            .as_deref()
            .filter(|ticker| !ticker.trim().is_empty())
            .ok_or_else(|| ValidationError::missing(InputField::Ticker))?;
        let discount_rate = request
            .discount_rate
            .ok_or_else(|| ValidationError::missing(InputField::DiscountRate))?;
        let growth_rate = request
            .growth_rate
            .ok_or_else(|| ValidationError::missing(InputField::GrowthRate))?;
        let terminal_growth_rate = request
            .terminal_growth_rate
            .ok_or_else(|| ValidationError::missing(InputField::TerminalGrowthRate))?;

        let mut input = DcfInput::new(ticker, discount_rate, growth_rate, terminal_growth_rate)
            .with_projection_years(request.projection_years.unwrap_or(DEFAULT_PROJECTION_YEARS));
        input.final_growth_rate = request.final_growth_rate;
        input.requested_by = request.requested_by.clone();
        Ok(input)
    }

    fn check_presence(input: &DcfInput) -> Result<(), ValidationError> {
        if input.ticker.trim().is_empty() {
            return Err(ValidationError::missing(InputField::Ticker));
        }
        if normalize_ticker(&input.ticker).is_none() {
            return Err(ValidationError::new(
                InputField::Ticker,
                Violation::Malformed,
                &input.ticker,
            ));
        }
        Ok(())
    }

    fn check_ranges(input: &DcfInput) -> Result<(), ValidationError> {
        for (rule, value) in rate_rules(input) {
            if value < rule.min {
                return Err(ValidationError::new(
                    rule.field,
                    Violation::BelowMinimum(rule.min),
                    value,
                ));
            }
            if value > rule.max {
                return Err(ValidationError::new(
                    rule.field,
                    Violation::AboveMaximum(rule.max),
                    value,
                ));
            }
        }

        let years = input.projection_years;
        if years < MIN_PROJECTION_YEARS {
            return Err(ValidationError::new(
                InputField::ProjectionYears,
                Violation::BelowMinimum(Decimal::from(MIN_PROJECTION_YEARS)),
                years,
            ));
        }
        if years > MAX_PROJECTION_YEARS {
            return Err(ValidationError::new(
                InputField::ProjectionYears,
                Violation::AboveMaximum(Decimal::from(MAX_PROJECTION_YEARS)),
                years,
            ));
        }
        Ok(())
    }

    fn check_digits(input: &DcfInput) -> Result<(), ValidationError> {
        let max_scale = QuantityClass::Rate.scale();
        for (rule, value) in rate_rules(input) {
            if integer_digits(value) > rule.max_integer_digits {
                return Err(ValidationError::new(
                    rule.field,
                    Violation::TooManyIntegerDigits(rule.max_integer_digits),
                    value,
                ));
            }
            if fractional_digits(value) > max_scale {
                return Err(ValidationError::new(
                    rule.field,
                    Violation::TooManyFractionalDigits(max_scale),
                    value,
                ));
            }
        }
        Ok(())
    }

    fn check_cross_fields(input: &DcfInput) -> Result<(), ValidationError> {
        if input.terminal_growth_rate >= input.discount_rate {
            return Err(ValidationError::new(
                InputField::TerminalGrowthRate,
                Violation::NotBelow(InputField::DiscountRate),
                input.terminal_growth_rate,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> DcfInput {
        DcfInput::new("AAPL", dec!(8), dec!(10), dec!(2.5))
    }

    fn violation_of(input: &DcfInput) -> (InputField, Violation) {
        let err = Validator::validate(input).unwrap_err();
        (err.field, err.violation)
    }

    #[test]
    fn test_accepts_valid_input() {
        assert_eq!(Validator::validate(&valid_input()), Ok(()));
    }

    #[test]
    fn test_blank_and_malformed_ticker() {
        let mut input = valid_input();
        input.ticker = "  ".to_string();
        assert_eq!(
            violation_of(&input),
            (InputField::Ticker, Violation::Missing)
        );

        input.ticker = "BRK.B".to_string();
        assert_eq!(
            violation_of(&input),
            (InputField::Ticker, Violation::Malformed)
        );
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let input = DcfInput::new("AAPL", dec!(100), dec!(1000), dec!(10));
        assert_eq!(Validator::validate(&input), Ok(()));

        let input = DcfInput::new("AAPL", dec!(8), dec!(-100), dec!(0));
        assert_eq!(Validator::validate(&input), Ok(()));
    }

    #[test]
    fn test_growth_just_above_maximum_rejected() {
        let input = DcfInput::new("AAPL", dec!(8), dec!(1000.0001), dec!(2.5));
        let err = Validator::validate(&input).unwrap_err();
        assert_eq!(err.field, InputField::GrowthRate);
        assert_eq!(err.violation, Violation::AboveMaximum(dec!(1000)));
        assert_eq!(err.value, "1000.0001");
    }

    #[test]
    fn test_each_range_rule() {
        let cases = [
            (
                DcfInput::new("AAPL", dec!(-0.5), dec!(10), dec!(0)),
                InputField::DiscountRate,
                Violation::BelowMinimum(dec!(0)),
            ),
            (
                DcfInput::new("AAPL", dec!(100.5), dec!(10), dec!(2.5)),
                InputField::DiscountRate,
                Violation::AboveMaximum(dec!(100)),
            ),
            (
                DcfInput::new("AAPL", dec!(8), dec!(-100.1), dec!(2.5)),
                InputField::GrowthRate,
                Violation::BelowMinimum(dec!(-100)),
            ),
            (
                DcfInput::new("AAPL", dec!(8), dec!(10), dec!(-1)),
                InputField::TerminalGrowthRate,
                Violation::BelowMinimum(dec!(0)),
            ),
            (
                DcfInput::new("AAPL", dec!(12), dec!(10), dec!(10.5)),
                InputField::TerminalGrowthRate,
                Violation::AboveMaximum(dec!(10)),
            ),
        ];

        for (input, field, violation) in cases {
            assert_eq!(violation_of(&input), (field, violation));
        }
    }

    #[test]
    fn test_projection_years_bounds() {
        let input = valid_input().with_projection_years(0);
        assert_eq!(
            violation_of(&input),
            (
                InputField::ProjectionYears,
                Violation::BelowMinimum(dec!(1))
            )
        );

        let input = valid_input().with_projection_years(21);
        assert_eq!(
            violation_of(&input),
            (
                InputField::ProjectionYears,
                Violation::AboveMaximum(dec!(20))
            )
        );

        assert!(Validator::validate(&valid_input().with_projection_years(20)).is_ok());
    }

    #[test]
    fn test_scale_limit() {
        let input = DcfInput::new("AAPL", dec!(8.1234567), dec!(10), dec!(2.5));
        assert_eq!(
            violation_of(&input),
            (
                InputField::DiscountRate,
                Violation::TooManyFractionalDigits(6)
            )
        );

        // Trailing zeros are not significant
        let input = DcfInput::new("AAPL", dec!(8.123456000), dec!(10), dec!(2.5));
        assert!(Validator::validate(&input).is_ok());
    }

    #[test]
    fn test_terminal_growth_must_stay_below_discount() {
        let input = DcfInput::new("AAPL", dec!(3), dec!(10), dec!(3));
        let err = Validator::validate(&input).unwrap_err();
        assert_eq!(err.field, InputField::TerminalGrowthRate);
        assert_eq!(err.violation, Violation::NotBelow(InputField::DiscountRate));

        let input = DcfInput::new("AAPL", dec!(2), dec!(10), dec!(3));
        assert!(Validator::validate(&input).is_err());
    }

    #[test]
    fn test_range_reported_before_cross_field() {
        // Both out of range and not below discount; the range rule wins
        let input = DcfInput::new("AAPL", dec!(8), dec!(10), dec!(11));
        assert_eq!(
            violation_of(&input),
            (
                InputField::TerminalGrowthRate,
                Violation::AboveMaximum(dec!(10))
            )
        );
    }

    #[test]
    fn test_validate_request_reports_first_missing_field() {
        let request = DcfRequest {
            ticker: Some("aapl".to_string()),
            discount_rate: Some(dec!(8)),
            ..Default::default()
        };
        let err = Validator::validate_request(&request).unwrap_err();
        assert_eq!(err, ValidationError::missing(InputField::GrowthRate));

        let err = Validator::validate_request(&DcfRequest::default()).unwrap_err();
        assert_eq!(err.field, InputField::Ticker);
    }

    #[test]
    fn test_validate_request_builds_input() {
        let request = DcfRequest {
            ticker: Some("aapl".to_string()),
            discount_rate: Some(dec!(8)),
            growth_rate: Some(dec!(10)),
            terminal_growth_rate: Some(dec!(2.5)),
            projection_years: None,
            requested_by: Some("analyst-1".to_string()),
            ..Default::default()
        };
        let input = Validator::validate_request(&request).unwrap();
        assert_eq!(input.ticker, "AAPL");
        assert_eq!(input.projection_years, DEFAULT_PROJECTION_YEARS);
        assert_eq!(input.requested_by.as_deref(), Some("analyst-1"));
        assert!(input.final_growth_rate.is_none());
    }

    #[test]
    fn test_final_growth_rate_is_range_checked() {
        let input = valid_input().with_final_growth_rate(dec!(4));
        assert!(Validator::validate(&input).is_ok());

        let input = valid_input().with_final_growth_rate(dec!(-100.5));
        assert_eq!(
            violation_of(&input),
            (
                InputField::FinalGrowthRate,
                Violation::BelowMinimum(dec!(-100))
            )
        );

        let input = valid_input().with_final_growth_rate(dec!(4.1234567));
        assert_eq!(
            violation_of(&input),
            (
                InputField::FinalGrowthRate,
                Violation::TooManyFractionalDigits(6)
            )
        );
    }

    #[test]
    fn test_request_carries_final_growth_rate() {
        let request = DcfRequest {
            ticker: Some("aapl".to_string()),
            discount_rate: Some(dec!(8)),
            growth_rate: Some(dec!(15)),
            final_growth_rate: Some(dec!(1001)),
            terminal_growth_rate: Some(dec!(2.5)),
            ..Default::default()
        };
        let err = Validator::validate_request(&request).unwrap_err();
        assert_eq!(err.field, InputField::FinalGrowthRate);

        let request = DcfRequest {
            final_growth_rate: Some(dec!(5)),
            ..request
        };
        let input = Validator::validate_request(&request).unwrap();
        assert_eq!(input.final_growth_rate, Some(dec!(5)));
    }

    #[test]
    fn test_input_from_request_skips_rules() {
        let request = DcfRequest {
            ticker: Some("aapl".to_string()),
            discount_rate: Some(dec!(2)),
            growth_rate: Some(dec!(10)),
            terminal_growth_rate: Some(dec!(2.5)),
            ..Default::default()
        };
        let input = Validator::input_from_request(&request).unwrap();
        assert_eq!(input.ticker, "AAPL");
        assert!(Validator::validate(&input).is_err());
        assert!(Validator::validate_request(&request).is_err());

        let err = Validator::input_from_request(&DcfRequest::default()).unwrap_err();
        assert_eq!(err, ValidationError::missing(InputField::Ticker));
    }
}
