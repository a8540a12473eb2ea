//! Engine contract validation
//!
//! Exercises the documented indicator fallbacks, the metrics fixtures, and
//! the reproducibility guarantees end to end.
//!
//! Run with: cargo test --test engine_validation

use approx::{assert_abs_diff_eq, assert_relative_eq};
use chrono::NaiveDate;
use proptest::prelude::*;

use marketpulse::backtest::{
    compute_metrics, run_portfolio_backtest, run_threshold_backtest, BacktestConfig, Portfolio,
    PortfolioStock, ThresholdParams, RISK_FREE_RATE,
};
use marketpulse::error::EngineError;
use marketpulse::provider::{MarketData, MockMarketData};
use marketpulse::{fibonacci_levels, macd, rsi, stochastic, support_resistance};

// ============================================================================
// Indicator contracts
// ============================================================================

#[test]
fn rsi_short_series_returns_exactly_neutral() {
    for len in 0..15 {
        let closes: Vec<f64> = (0..len).map(|i| 100.0 + i as f64).collect();
        assert_eq!(rsi(&closes, 14), 50.0, "len {len}");
    }
}

#[test]
fn rsi_monotonic_series_saturate() {
    let up: Vec<f64> = (1..=30).map(|x| x as f64).collect();
    assert_eq!(rsi(&up, 14), 100.0);

    let down: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
    assert_abs_diff_eq!(rsi(&down, 14), 0.0, epsilon = 1e-12);
}

#[test]
fn rsi_regression_fixture() {
    let prices = vec![
        100.0, 102.0, 101.0, 105.0, 107.0, 103.0, 99.0, 98.0, 100.0, 104.0, 106.0, 108.0, 110.0,
        107.0, 105.0,
    ];
    // gains sum to 20, losses to 15 over the 14 deltas: RSI = 400/7
    assert_relative_eq!(rsi(&prices, 14), 400.0 / 7.0, max_relative = 1e-12);
}

#[test]
fn macd_degenerate_inputs_return_zero() {
    assert_eq!(macd(&[], 12, 26), 0.0);
    assert_eq!(macd(&[100.0], 12, 26), 0.0);
    assert_eq!(macd(&[1.0, f64::INFINITY], 12, 26), 0.0);
}

#[test]
fn stochastic_unformed_window_is_neutral_pair() {
    assert_eq!(stochastic(&[], &[], &[], 14, 3), (50.0, 50.0));
    let short = vec![10.0; 5];
    assert_eq!(stochastic(&short, &short, &short, 14, 3), (50.0, 50.0));
}

#[test]
fn support_resistance_brackets_last_close_on_fallback() {
    let closes = vec![100.0, 120.0];
    let (support, resistance) = support_resistance(&[121.0, 122.0], &[99.0, 100.0], &closes, 20);
    assert_relative_eq!(support, 114.0, max_relative = 1e-12);
    assert_relative_eq!(resistance, 126.0, max_relative = 1e-12);
}

// ============================================================================
// Metrics contracts
// ============================================================================

#[test]
fn flat_curve_metrics_are_all_zero() {
    let equity = vec![100_000.0; 30];
    let m = compute_metrics(&equity, 100_000.0, RISK_FREE_RATE).unwrap();
    assert_eq!(m.total_return, 0.0);
    assert_eq!(m.volatility, 0.0);
    assert_eq!(m.sharpe_ratio, 0.0);
    assert_eq!(m.max_drawdown, 0.0);
}

#[test]
fn metrics_reject_invalid_inputs_with_typed_errors() {
    assert!(matches!(
        compute_metrics(&[1.0, 2.0], 0.0, RISK_FREE_RATE),
        Err(EngineError::NonPositiveInitialCash(_))
    ));
    assert!(matches!(
        compute_metrics(&[], 100_000.0, RISK_FREE_RATE),
        Err(EngineError::EmptyEquityCurve)
    ));
}

#[test]
fn drawdown_fixture_peak_to_trough() {
    let curve = vec![100_000.0, 105_000.0, 110_000.0, 108_000.0, 95_000.0, 100_000.0];
    let m = compute_metrics(&curve, 100_000.0, RISK_FREE_RATE).unwrap();
    assert_abs_diff_eq!(m.max_drawdown, -13.6364, epsilon = 0.001);
}

// ============================================================================
// Simulation reproducibility
// ============================================================================

fn portfolio() -> Portfolio {
    Portfolio {
        name: "balanced".to_string(),
        stocks: vec![
            PortfolioStock { symbol: "AAPL".to_string(), weight: 50.0 },
            PortfolioStock { symbol: "JPM".to_string(), weight: 30.0 },
        ],
        initial_cash: 100_000.0,
    }
}

fn config(seed: u64) -> BacktestConfig {
    BacktestConfig {
        start_date: "2023-01-01".to_string(),
        end_date: "2023-12-31".to_string(),
        indicators: vec![],
        strategy_logic: "AND".to_string(),
        rebalance_frequency: "monthly".to_string(),
        seed: Some(seed),
    }
}

#[test]
fn seeded_portfolio_backtest_is_reproducible() {
    let a = run_portfolio_backtest(&portfolio(), &config(123), |_| 150.0).unwrap();
    let b = run_portfolio_backtest(&portfolio(), &config(123), |_| 150.0).unwrap();

    assert_eq!(a.final_value, b.final_value);
    assert_eq!(a.volatility, b.volatility);
    assert_eq!(a.total_trades, b.total_trades);
    assert_eq!(a.winning_trades, b.winning_trades);
    let pairs = a.performance_history.iter().zip(&b.performance_history);
    for (x, y) in pairs {
        assert_eq!(x.date, y.date);
        assert_eq!(x.value, y.value);
    }
}

#[test]
fn portfolio_backtest_rejects_inverted_range() {
    let mut bad = config(1);
    bad.start_date = "2023-12-31".to_string();
    bad.end_date = "2023-01-01".to_string();
    assert!(matches!(
        run_portfolio_backtest(&portfolio(), &bad, |_| 100.0),
        Err(EngineError::InvalidDateRange { .. })
    ));
}

// ============================================================================
// Provider + threshold backtest end to end
// ============================================================================

#[test]
fn threshold_backtest_over_mock_bars() {
    let provider = MockMarketData::new(99).unwrap();
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
    let bars = provider.fetch_bars("AAPL", start, end).unwrap();

    let params = ThresholdParams {
        ticker: "AAPL".to_string(),
        start_date: "2023-01-01".to_string(),
        end_date: "2023-12-31".to_string(),
        rsi_period: 14,
        rsi_buy: 30.0,
        rsi_sell: 70.0,
        initial_cash: 100_000.0,
    };

    let a = run_threshold_backtest(&bars.closes, &params).unwrap();
    let b = run_threshold_backtest(&bars.closes, &params).unwrap();

    assert_eq!(a.initial_value, 100_000.0);
    assert_eq!(a.final_value, b.final_value);
    assert_eq!(a.total_trades, a.winning_trades + a.losing_trades);
    assert!(a.max_drawdown >= 0.0);
    assert!(a.final_value > 0.0);
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    #[test]
    fn rsi_is_always_within_bounds(
        closes in prop::collection::vec(1.0f64..1000.0, 0..60),
        period in 1usize..30,
    ) {
        let value = rsi(&closes, period);
        prop_assert!((0.0..=100.0).contains(&value));
    }

    #[test]
    fn stochastic_k_is_bounded_for_well_formed_bars(
        mids in prop::collection::vec(10.0f64..1000.0, 14..80),
    ) {
        // Close sits inside the bar's high-low band
        let highs: Vec<f64> = mids.iter().map(|m| m + 1.0).collect();
        let lows: Vec<f64> = mids.iter().map(|m| m - 1.0).collect();
        let (k, d) = stochastic(&highs, &lows, &mids, 14, 3);
        prop_assert!((0.0..=100.0).contains(&k));
        prop_assert!((0.0..=100.0).contains(&d));
    }

    #[test]
    fn fibonacci_levels_are_strictly_ordered(
        lows in prop::collection::vec(10.0f64..500.0, 1..60),
        spread in 1.0f64..100.0,
    ) {
        let highs: Vec<f64> = lows.iter().map(|l| l + spread).collect();
        let closes = lows.clone();
        let fib = fibonacci_levels(&highs, &lows, &closes, 50);
        prop_assert!(fib.fib_236 > fib.fib_382);
        prop_assert!(fib.fib_382 > fib.fib_500);
        prop_assert!(fib.fib_500 > fib.fib_618);
    }

    #[test]
    fn max_drawdown_is_never_positive(
        equity in prop::collection::vec(1.0f64..1_000_000.0, 1..100),
    ) {
        let m = compute_metrics(&equity, 100_000.0, RISK_FREE_RATE).unwrap();
        prop_assert!(m.max_drawdown <= 0.0);
        prop_assert!(m.max_drawdown.is_finite());
    }
}
