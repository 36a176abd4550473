//! Valuation property tests
//!
//! Reference scenarios and the behavioural guarantees of the pipeline:
//! determinism, monotonicity, the terminal growth guard, the one-year
//! identity and sensitivity sweeps.

use std::sync::Arc;

use intrinsic_clock::FixedClock;
use intrinsic_core::{DataField, DcfInput, FinancialDataSnapshot, ValuationStatus};
use intrinsic_engine::{
    ArithmeticKind, DcfCalculator, EngineConfig, Error, InputField, SensitivityAxes, Stage,
    Validator, Violation, discounter, projector, terminal,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn calculator() -> DcfCalculator {
    DcfCalculator::new(EngineConfig::default(), Arc::new(FixedClock::epoch()))
}

fn parallel_calculator() -> DcfCalculator {
    let config = EngineConfig {
        parallel_sensitivity: true,
        ..EngineConfig::default()
    };
    DcfCalculator::new(config, Arc::new(FixedClock::epoch()))
}

/// 1bn free cash flow, 1bn shares, no debt
fn reference_snapshot(price: Decimal) -> FinancialDataSnapshot {
    FinancialDataSnapshot {
        fiscal_years: vec![2022, 2023, 2024],
        revenue: vec![dec!(8000000000), dec!(9000000000), dec!(10000000000)],
        free_cash_flow: vec![dec!(800000000), dec!(900000000), dec!(1000000000)],
        eps: vec![dec!(0.80), dec!(0.90), dec!(1.00)],
        shares_outstanding: vec![dec!(1000000000), dec!(1000000000), dec!(1000000000)],
        current_price: Some(price),
        ..FinancialDataSnapshot::new("ACME")
    }
}

fn reference_input() -> DcfInput {
    DcfInput::new("ACME", dec!(8), dec!(10), dec!(2.5))
}

// ============================================================================
// Scenario A: reference valuation
// ============================================================================

#[test]
fn test_reference_valuation() {
    init_logging();
    let output = calculator()
        .calculate(&reference_input(), &reference_snapshot(dec!(20.00)))
        .unwrap();

    assert_eq!(output.fair_value_per_share, dec!(25.71));
    assert_eq!(output.fair_value_per_share.to_string(), "25.71");
    assert_eq!(output.present_value_of_cash_flows, dec!(5284732456.02));
    assert_eq!(output.terminal_value, dec!(30014050000.00));
    assert_eq!(output.discounted_terminal_value, dec!(20427058104.93));
    assert_eq!(output.enterprise_value, dec!(25711790560.95));
    assert_eq!(output.equity_value, dec!(25711790560.95));
    assert_eq!(output.shares_outstanding, dec!(1000000000));
    assert_eq!(output.upside_pct, Some(dec!(28.55)));
    assert_eq!(output.valuation, ValuationStatus::Undervalued);
}

#[test]
fn test_reference_valuation_against_expensive_price() {
    init_logging();
    let output = calculator()
        .calculate(&reference_input(), &reference_snapshot(dec!(150)))
        .unwrap();

    assert_eq!(output.fair_value_per_share, dec!(25.71));
    assert_eq!(output.upside_pct, Some(dec!(-82.86)));
    assert_eq!(output.valuation, ValuationStatus::Overvalued);
}

#[test]
fn test_reference_valuation_inside_band() {
    init_logging();
    // 25.71 against 25.00 is +2.84%
    let output = calculator()
        .calculate(&reference_input(), &reference_snapshot(dec!(25)))
        .unwrap();
    assert_eq!(output.valuation, ValuationStatus::FairValue);
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_repeated_calculation_is_identical() {
    init_logging();
    let calculator = calculator();
    let input = DcfInput::new("ACME", dec!(9.25), dec!(7.125), dec!(3)).with_projection_years(12);
    let data = reference_snapshot(dec!(33.33));

    let first = calculator.calculate(&input, &data).unwrap();
    let second = calculator.calculate(&input, &data).unwrap();

    assert_eq!(first, second);
    for (a, b) in [
        (first.fair_value_per_share, second.fair_value_per_share),
        (first.present_value_of_cash_flows, second.present_value_of_cash_flows),
        (first.terminal_value, second.terminal_value),
        (first.enterprise_value, second.enterprise_value),
        (first.upside_pct.unwrap(), second.upside_pct.unwrap()),
    ] {
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(a.scale(), b.scale());
    }
    assert_eq!(first.fair_value_per_share.scale(), 2);
}

// ============================================================================
// Monotonicity
// ============================================================================

#[test]
fn test_fair_value_never_decreases_with_growth() {
    init_logging();
    let calculator = calculator();
    let data = reference_snapshot(dec!(20));

    let mut previous: Option<Decimal> = None;
    for growth in SensitivityAxes::centered(dec!(10), dec!(2.5), 21).unwrap() {
        let input = DcfInput::new("ACME", dec!(10), growth, dec!(2));
        let fair = calculator.calculate(&input, &data).unwrap().fair_value_per_share;
        if let Some(previous) = previous {
            assert!(fair >= previous, "growth {} gave {} < {}", growth, fair, previous);
        }
        previous = Some(fair);
    }
}

#[test]
fn test_fair_value_never_increases_with_discount() {
    init_logging();
    let calculator = calculator();
    let data = reference_snapshot(dec!(20));

    let mut previous: Option<Decimal> = None;
    for discount in SensitivityAxes::centered(dec!(12), dec!(0.5), 30).unwrap() {
        let input = DcfInput::new("ACME", discount, dec!(6), dec!(2));
        let fair = calculator.calculate(&input, &data).unwrap().fair_value_per_share;
        if let Some(previous) = previous {
            assert!(fair <= previous, "discount {} gave {} > {}", discount, fair, previous);
        }
        previous = Some(fair);
    }
}

// ============================================================================
// Terminal growth guard
// ============================================================================

#[test]
fn test_terminal_growth_not_below_discount_is_rejected() {
    init_logging();
    let calculator = calculator();
    let data = reference_snapshot(dec!(20));

    for (discount, terminal) in [(dec!(3), dec!(3)), (dec!(2.5), dec!(3)), (dec!(0), dec!(0))] {
        let input = DcfInput::new("ACME", discount, dec!(5), terminal);
        match calculator.calculate(&input, &data) {
            Err(Error::Validation(err)) => {
                assert_eq!(err.field, InputField::TerminalGrowthRate);
                assert_eq!(err.violation, Violation::NotBelow(InputField::DiscountRate));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}

#[test]
fn test_terminal_value_guards_without_validation() {
    let flows = projector::project(dec!(100), dec!(5), 3).unwrap();
    let err = terminal::terminal_value(&flows, dec!(6), dec!(6)).unwrap_err();
    assert!(matches!(
        err,
        Error::Arithmetic {
            stage: Stage::TerminalValue,
            kind: ArithmeticKind::NonConvergentTerminalValue { .. },
        }
    ));
}

// ============================================================================
// One-year identity
// ============================================================================

#[test]
fn test_one_year_present_value_equals_base_when_growth_equals_discount() {
    for (base, rate) in [
        (dec!(1000000000), dec!(8)),
        (dec!(1000000000), dec!(12.5)),
        (dec!(123456.78), dec!(7.123456)),
        (dec!(42), dec!(0.5)),
    ] {
        let flows = projector::project(base, rate, 1).unwrap();
        let present = discounter::present_value(&flows, rate).unwrap();
        assert_eq!(present.total, base, "rate {}", rate);
    }
}

// ============================================================================
// Scenario B: growth bound
// ============================================================================

#[test]
fn test_growth_upper_bound_is_inclusive() {
    init_logging();
    let accepted = DcfInput::new("ACME", dec!(8), dec!(1000), dec!(2.5));
    assert!(Validator::validate(&accepted).is_ok());
    assert!(
        calculator()
            .calculate(&accepted, &reference_snapshot(dec!(20)))
            .is_ok()
    );

    let rejected = DcfInput::new("ACME", dec!(8), dec!(1000.0001), dec!(2.5));
    let err = calculator()
        .calculate(&rejected, &reference_snapshot(dec!(20)))
        .unwrap_err();
    match err {
        Error::Validation(err) => {
            assert_eq!(err.field, InputField::GrowthRate);
            assert_eq!(err.violation, Violation::AboveMaximum(dec!(1000)));
            assert_eq!(err.value, "1000.0001");
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

// ============================================================================
// Scenario C: sensitivity sweeps
// ============================================================================

#[test]
fn test_sweep_cells_match_direct_calculation() {
    init_logging();
    let calculator = calculator();
    let input = reference_input();
    let data = reference_snapshot(dec!(20));
    let discounts = SensitivityAxes::centered(dec!(8), dec!(1), 6).unwrap();
    let growths = SensitivityAxes::centered(dec!(10), dec!(2), 6).unwrap();

    let grid = calculator.calculate_sensitivity(&input, &data, &discounts, &growths);

    assert_eq!(grid.len(), 36);
    assert_eq!(grid.failure_count(), 0);
    assert_eq!(grid.discount_rates, discounts);
    assert_eq!(grid.growth_rates, growths);
    assert_eq!(
        grid.base_case.as_ref().unwrap(),
        &calculator.calculate(&input, &data).unwrap()
    );

    for (row, discount) in discounts.iter().enumerate() {
        for (column, growth) in growths.iter().enumerate() {
            let cell = grid.cell(row, column).unwrap();
            assert_eq!(cell.discount_rate, *discount);
            assert_eq!(cell.growth_rate, *growth);

            let direct = calculator
                .calculate(&input.with_rates(*discount, *growth), &data)
                .unwrap();
            assert_eq!(cell.outcome.as_ref().unwrap(), &direct);
        }
    }

    // The base case sits at discount 8%, growth 10%
    assert_eq!(grid.cell(3, 3).unwrap().fair_value(), Some(dec!(25.71)));
}

#[test]
fn test_parallel_sweep_matches_sequential() {
    init_logging();
    let input = reference_input();
    let data = reference_snapshot(dec!(20));
    let discounts = SensitivityAxes::centered(dec!(8), dec!(1), 6).unwrap();
    let growths = SensitivityAxes::centered(dec!(10), dec!(2), 6).unwrap();

    let sequential = calculator().calculate_sensitivity(&input, &data, &discounts, &growths);
    let parallel = parallel_calculator().calculate_sensitivity(&input, &data, &discounts, &growths);

    assert_eq!(sequential.fair_values(), parallel.fair_values());
    for (a, b) in sequential.iter().zip(parallel.iter()) {
        assert_eq!(a.outcome, b.outcome);
    }
}

#[test]
fn test_sweep_continues_past_failing_cells() {
    init_logging();
    let input = reference_input();
    let data = reference_snapshot(dec!(20));
    let discounts = [dec!(2), dec!(2.5), dec!(8)];
    let growths = [dec!(5), dec!(10)];

    for calculator in [calculator(), parallel_calculator()] {
        let grid = calculator.calculate_sensitivity(&input, &data, &discounts, &growths);

        assert_eq!(grid.len(), 6);
        assert_eq!(grid.failure_count(), 4);
        for column in 0..growths.len() {
            for row in 0..2 {
                let err = grid.cell(row, column).unwrap().outcome.as_ref().unwrap_err();
                assert_eq!(err.kind(), "ValidationError");
            }
            assert!(grid.cell(2, column).unwrap().is_ok());
        }
        assert_eq!(
            grid.fair_values()[0],
            vec![None, None]
        );
    }
}

// ============================================================================
// Scenario D: missing figures
// ============================================================================

#[test]
fn test_zero_shares_is_missing_data() {
    init_logging();
    let mut data = reference_snapshot(dec!(20));
    data.shares_outstanding = vec![dec!(1000000000), dec!(1000000000), dec!(0)];

    let err = calculator().calculate(&reference_input(), &data).unwrap_err();
    assert_eq!(err.kind(), "MissingDataError");
    assert!(matches!(
        err,
        Error::MissingData {
            field: DataField::SharesOutstanding,
            ..
        }
    ));
}

#[test]
fn test_absent_shares_and_price_are_missing_data() {
    init_logging();
    let mut data = reference_snapshot(dec!(20));
    data.shares_outstanding.clear();
    let err = calculator().calculate(&reference_input(), &data).unwrap_err();
    assert!(matches!(
        err,
        Error::MissingData {
            field: DataField::SharesOutstanding,
            ..
        }
    ));

    let mut data = reference_snapshot(dec!(20));
    data.current_price = None;
    let err = calculator().calculate(&reference_input(), &data).unwrap_err();
    assert!(matches!(
        err,
        Error::MissingData {
            field: DataField::CurrentPrice,
            ..
        }
    ));
}

#[test]
fn test_debt_reduces_fair_value() {
    init_logging();
    let mut data = reference_snapshot(dec!(20));
    data.total_debt = vec![dec!(0), dec!(0), dec!(5000000000)];

    let output = calculator().calculate(&reference_input(), &data).unwrap();
    assert_eq!(output.equity_value, dec!(20711790560.95));
    assert_eq!(output.fair_value_per_share, dec!(20.71));
    assert_eq!(output.valuation, ValuationStatus::FairValue);
}

// ============================================================================
// Extreme but valid inputs
// ============================================================================

#[test]
fn test_tiny_price_against_large_fair_value_classifies() {
    init_logging();
    let mut data = reference_snapshot(dec!(0.01));
    data.free_cash_flow = vec![dec!(80000000), dec!(90000000), dec!(100000000)];
    data.shares_outstanding = vec![dec!(1), dec!(1), dec!(1)];

    let output = calculator().calculate(&reference_input(), &data).unwrap();
    assert_eq!(output.valuation, ValuationStatus::Undervalued);
    assert_eq!(output.current_price, dec!(0.01));
    assert!(output.upside_pct.unwrap() > dec!(10000000000));
}

#[test]
fn test_thousandfold_growth_on_unit_cash_flow() {
    init_logging();
    let mut data = reference_snapshot(dec!(10));
    data.free_cash_flow = vec![dec!(1), dec!(1), dec!(1)];
    data.shares_outstanding = vec![dec!(1), dec!(1), dec!(1)];

    let input = DcfInput::new("ACME", dec!(8), dec!(1000), dec!(2.5)).with_projection_years(10);
    let output = calculator().calculate(&input, &data).unwrap();
    assert_eq!(output.valuation, ValuationStatus::Undervalued);

    // 11^18 no longer fits the intermediate class
    let err = calculator()
        .calculate(&input.with_projection_years(20), &data)
        .unwrap_err();
    assert_eq!(err.kind(), "OverflowError");
    assert_eq!(err.stage(), Some(Stage::Projection));
}

#[test]
fn test_wacc_feeds_the_discount_rate() {
    init_logging();
    let rate = discounter::wacc(dec!(10), dec!(5), dec!(600), dec!(400), dec!(25)).unwrap();
    assert_eq!(rate, dec!(7.5));

    let input = DcfInput::new("ACME", rate, dec!(10), dec!(2.5));
    let at_wacc = calculator()
        .calculate(&input, &reference_snapshot(dec!(20)))
        .unwrap();
    let at_eight = calculator()
        .calculate(&reference_input(), &reference_snapshot(dec!(20)))
        .unwrap();
    assert!(at_wacc.fair_value_per_share > at_eight.fair_value_per_share);
}
