//! Decimal Policy
//!
//! One table fixes precision, scale and rounding for every class of quantity
//! the engine handles. All arithmetic in the pipeline goes through the
//! helpers below, so no call site picks its own scale or rounding mode.
//!
//! | class        | precision | scale | holds                                   |
//! |--------------|-----------|-------|-----------------------------------------|
//! | Rate         | 16        | 6     | percentages                             |
//! | Factor       | 28        | 16    | rate fractions, compounded factors      |
//! | Intermediate | 28        | 10    | money inside the pipeline               |
//! | Money        | 25        | 2     | stored and displayed money              |
//! | Shares       | 20        | 0     | share counts                            |
//!
//! Products and quotients are computed at the full 28-digit precision of
//! [`Decimal`] and then rounded half-up to the class scale. A value whose
//! integer part needs more than `precision - scale` digits is an overflow.
//!
//! Ratio percentages ([`percentage`]) are worked at intermediate magnitude
//! and only then rounded to rate scale, so a valid valuation never fails
//! on its upside figure.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use std::fmt;

use crate::error::{ArithmeticKind, Error, Result, Stage};

/// Round-half-up: ties move away from zero
pub const ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuantityClass {
    Rate,
    Factor,
    Intermediate,
    Money,
    Shares,
}

/// Precision (total digits) and scale (fractional digits) of a class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleSpec {
    pub precision: u32,
    pub scale: u32,
}

impl ScaleSpec {
    pub const fn max_integer_digits(&self) -> u32 {
        self.precision - self.scale
    }
}

impl QuantityClass {
    pub const fn spec(self) -> ScaleSpec {
        match self {
            QuantityClass::Rate => ScaleSpec {
                precision: 16,
                scale: 6,
            },
            QuantityClass::Factor => ScaleSpec {
                precision: 28,
                scale: 16,
            },
            QuantityClass::Intermediate => ScaleSpec {
                precision: 28,
                scale: 10,
            },
            QuantityClass::Money => ScaleSpec {
                precision: 25,
                scale: 2,
            },
            QuantityClass::Shares => ScaleSpec {
                precision: 20,
                scale: 0,
            },
        }
    }

    pub const fn scale(self) -> u32 {
        self.spec().scale
    }

    pub fn name(self) -> &'static str {
        match self {
            QuantityClass::Rate => "rate",
            QuantityClass::Factor => "factor",
            QuantityClass::Intermediate => "intermediate",
            QuantityClass::Money => "money",
            QuantityClass::Shares => "shares",
        }
    }
}

impl fmt::Display for QuantityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Number of digits left of the decimal point (zero for |value| < 1)
pub fn integer_digits(value: Decimal) -> u32 {
    let mut whole = value.abs().trunc();
    let mut digits = 0;
    while whole >= Decimal::ONE {
        whole = (whole / dec!(10)).trunc();
        digits += 1;
    }
    digits
}

/// Number of significant fractional digits (trailing zeros ignored)
pub fn fractional_digits(value: Decimal) -> u32 {
    value.normalize().scale()
}

fn overflow(stage: Stage, operation: &'static str, class: QuantityClass) -> Error {
    Error::Overflow {
        stage,
        operation,
        class,
    }
}

fn fit_as(
    value: Decimal,
    class: QuantityClass,
    stage: Stage,
    operation: &'static str,
) -> Result<Decimal> {
    let spec = class.spec();
    let rounded = value.round_dp_with_strategy(spec.scale, ROUNDING);
    if integer_digits(rounded) > spec.max_integer_digits() {
        return Err(overflow(stage, operation, class));
    }
    Ok(rounded)
}

/// Round to the class scale and enforce the class magnitude
pub fn fit(value: Decimal, class: QuantityClass, stage: Stage) -> Result<Decimal> {
    fit_as(value, class, stage, "round")
}

/// Like [`fit`], but always carries exactly the class scale (`25.7` becomes `25.70`)
pub fn quantize(value: Decimal, class: QuantityClass, stage: Stage) -> Result<Decimal> {
    let mut fitted = fit(value, class, stage)?;
    fitted.rescale(class.scale());
    Ok(fitted)
}

pub fn add(a: Decimal, b: Decimal, class: QuantityClass, stage: Stage) -> Result<Decimal> {
    let sum = a
        .checked_add(b)
        .ok_or_else(|| overflow(stage, "add", class))?;
    fit_as(sum, class, stage, "add")
}

pub fn sub(a: Decimal, b: Decimal, class: QuantityClass, stage: Stage) -> Result<Decimal> {
    let difference = a
        .checked_sub(b)
        .ok_or_else(|| overflow(stage, "subtract", class))?;
    fit_as(difference, class, stage, "subtract")
}

pub fn mul(a: Decimal, b: Decimal, class: QuantityClass, stage: Stage) -> Result<Decimal> {
    let product = a
        .checked_mul(b)
        .ok_or_else(|| overflow(stage, "multiply", class))?;
    fit_as(product, class, stage, "multiply")
}

/// Quotient rounded half-up to the class scale
pub fn divide(
    numerator: Decimal,
    denominator: Decimal,
    class: QuantityClass,
    stage: Stage,
) -> Result<Decimal> {
    if denominator.is_zero() {
        return Err(Error::Arithmetic {
            stage,
            kind: ArithmeticKind::DivisionByZero,
        });
    }
    let quotient = numerator
        .checked_div(denominator)
        .ok_or_else(|| overflow(stage, "divide", class))?;
    fit_as(quotient, class, stage, "divide")
}

/// `base^exponent` by repeated multiplication, rounding after every step
pub fn pow(base: Decimal, exponent: u32, class: QuantityClass, stage: Stage) -> Result<Decimal> {
    let mut acc = Decimal::ONE;
    for _ in 0..exponent {
        acc = mul(acc, base, class, stage)?;
    }
    Ok(acc)
}

/// `part / whole × 100`, rounded to rate scale.
///
/// The quotient is checked against the intermediate class. A percentage
/// beyond that magnitude is `None`; a zero `whole` is still an error.
pub fn percentage(part: Decimal, whole: Decimal, stage: Stage) -> Result<Option<Decimal>> {
    let Some(scaled) = part.checked_mul(dec!(100)) else {
        return Ok(None);
    };
    match divide(scaled, whole, QuantityClass::Intermediate, stage) {
        Ok(ratio) => Ok(Some(ratio.round_dp_with_strategy(
            QuantityClass::Rate.scale(),
            ROUNDING,
        ))),
        Err(Error::Overflow { .. }) => Ok(None),
        Err(err) => Err(err),
    }
}

/// `8` (percent) becomes `0.08`
pub fn percent_to_fraction(rate: Decimal, stage: Stage) -> Result<Decimal> {
    divide(rate, dec!(100), QuantityClass::Factor, stage)
}

/// `1 + rate / 100`
pub fn growth_factor(rate: Decimal, stage: Stage) -> Result<Decimal> {
    let fraction = percent_to_fraction(rate, stage)?;
    add(Decimal::ONE, fraction, QuantityClass::Factor, stage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_and_fractional_digits() {
        assert_eq!(integer_digits(dec!(0.5)), 0);
        assert_eq!(integer_digits(dec!(1)), 1);
        assert_eq!(integer_digits(dec!(-100)), 3);
        assert_eq!(integer_digits(dec!(1000.9999)), 4);
        assert_eq!(fractional_digits(dec!(8.500000)), 1);
        assert_eq!(fractional_digits(dec!(8.1234567)), 7);
        assert_eq!(fractional_digits(dec!(8)), 0);
    }

    #[test]
    fn test_rounding_is_half_up() {
        let stage = Stage::Aggregation;
        assert_eq!(fit(dec!(2.345), QuantityClass::Money, stage).unwrap(), dec!(2.35));
        assert_eq!(fit(dec!(2.344), QuantityClass::Money, stage).unwrap(), dec!(2.34));
        assert_eq!(fit(dec!(-2.345), QuantityClass::Money, stage).unwrap(), dec!(-2.35));
        assert_eq!(fit(dec!(0.5), QuantityClass::Shares, stage).unwrap(), dec!(1));
    }

    #[test]
    fn test_quantize_pads_to_class_scale() {
        let value = quantize(dec!(25.7), QuantityClass::Money, Stage::Aggregation).unwrap();
        assert_eq!(value.to_string(), "25.70");
        assert_eq!(value.scale(), 2);
    }

    #[test]
    fn test_divide_uses_explicit_scale() {
        let third = divide(dec!(1), dec!(3), QuantityClass::Intermediate, Stage::Discounting).unwrap();
        assert_eq!(third, dec!(0.3333333333));
        let two_thirds = divide(dec!(2), dec!(3), QuantityClass::Money, Stage::Aggregation).unwrap();
        assert_eq!(two_thirds, dec!(0.67));
    }

    #[test]
    fn test_divide_by_zero_is_typed() {
        let err = divide(dec!(1), Decimal::ZERO, QuantityClass::Money, Stage::Discounting)
            .unwrap_err();
        assert_eq!(
            err,
            Error::Arithmetic {
                stage: Stage::Discounting,
                kind: ArithmeticKind::DivisionByZero,
            }
        );
    }

    #[test]
    fn test_pow_is_exact_for_short_exponents() {
        let factor = growth_factor(dec!(10), Stage::Projection).unwrap();
        assert_eq!(factor, dec!(1.1));
        let fifth = pow(factor, 5, QuantityClass::Factor, Stage::Projection).unwrap();
        assert_eq!(fifth, dec!(1.61051));
        assert_eq!(
            pow(factor, 0, QuantityClass::Factor, Stage::Projection).unwrap(),
            Decimal::ONE
        );
    }

    #[test]
    fn test_class_magnitude_is_enforced() {
        // 13 integer digits do not fit a factor (28 - 16 = 12)
        let err = fit(dec!(1000000000000), QuantityClass::Factor, Stage::Projection).unwrap_err();
        assert!(matches!(
            err,
            Error::Overflow {
                class: QuantityClass::Factor,
                ..
            }
        ));
        assert!(fit(dec!(999999999999), QuantityClass::Factor, Stage::Projection).is_ok());
    }

    #[test]
    fn test_percentage_rounds_to_rate_scale() {
        let stage = Stage::Classification;
        assert_eq!(percentage(dec!(5.71), dec!(20), stage).unwrap(), Some(dec!(28.55)));
        assert_eq!(percentage(dec!(1), dec!(3), stage).unwrap(), Some(dec!(33.333333)));
        assert_eq!(percentage(dec!(-1), dec!(8), stage).unwrap(), Some(dec!(-12.5)));
    }

    #[test]
    fn test_percentage_beyond_intermediate_is_absent() {
        let stage = Stage::Classification;
        // 2.5e17 / 0.01 × 100 needs 22 integer digits
        let huge = percentage(dec!(250000000000000000), dec!(0.01), stage).unwrap();
        assert_eq!(huge, None);
        // well past the rate class, still inside intermediate
        let large = percentage(dec!(2571179056), dec!(0.01), stage).unwrap();
        assert_eq!(large, Some(dec!(25711790560000)));

        let err = percentage(dec!(1), Decimal::ZERO, stage).unwrap_err();
        assert!(matches!(
            err,
            Error::Arithmetic {
                kind: ArithmeticKind::DivisionByZero,
                ..
            }
        ));
    }

    #[test]
    fn test_checked_overflow_is_typed() {
        let err = mul(Decimal::MAX, dec!(2), QuantityClass::Intermediate, Stage::Projection)
            .unwrap_err();
        assert_eq!(
            err,
            Error::Overflow {
                stage: Stage::Projection,
                operation: "multiply",
                class: QuantityClass::Intermediate,
            }
        );
    }
}
