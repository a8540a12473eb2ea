// src/backtest/metrics.rs
// Performance metrics over a simulated equity curve

use serde::Serialize;

use crate::common::{simple_returns, std_dev};
use crate::error::EngineError;

/// Assumed risk-free rate, in percent
pub const RISK_FREE_RATE: f64 = 2.0;
/// Annualization factor for daily returns
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Aggregate metrics for an equity curve
#[derive(Debug, Clone, Default, Serialize)]
pub struct CurveMetrics {
    pub final_value: f64,
    pub total_return: f64,
    pub total_return_pct: f64,
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
}

/// Compute all curve metrics from an equity value series.
///
/// Unlike the indicator family this is a hard-validating entry point:
/// an empty curve or non-positive initial cash is caller misuse and is
/// surfaced as an error, never papered over with NaN or Inf.
///
/// - volatility: population std-dev of daily returns, annualized by
///   sqrt(252), in percent
/// - sharpe: (total return % - risk-free %) / volatility, 0 when the
///   curve has no volatility
/// - max drawdown: worst peak-to-trough decline in percent, reported as
///   a negative number; the running peak starts at `initial_cash`
pub fn compute_metrics(
    equity: &[f64],
    initial_cash: f64,
    risk_free_rate: f64,
) -> Result<CurveMetrics, EngineError> {
    if initial_cash <= 0.0 {
        return Err(EngineError::NonPositiveInitialCash(initial_cash));
    }
    if equity.is_empty() {
        return Err(EngineError::EmptyEquityCurve);
    }

    let final_value = equity[equity.len() - 1];
    let total_return = final_value - initial_cash;
    let total_return_pct = total_return / initial_cash * 100.0;

    let daily_returns = simple_returns(equity);
    let volatility = std_dev(&daily_returns) * TRADING_DAYS_PER_YEAR.sqrt() * 100.0;

    let sharpe_ratio = if volatility > 0.0 {
        (total_return_pct - risk_free_rate) / volatility
    } else {
        0.0
    };

    let max_drawdown = -max_drawdown_pct(equity, initial_cash);

    Ok(CurveMetrics {
        final_value,
        total_return,
        total_return_pct,
        volatility,
        sharpe_ratio,
        max_drawdown,
    })
}

/// Maximum drawdown over `values` as a positive percentage.
///
/// Tracks a running peak seeded with `initial_peak`; drawdown at each point
/// is `(peak - value) / peak * 100`.
pub(crate) fn max_drawdown_pct(values: &[f64], initial_peak: f64) -> f64 {
    let mut peak = initial_peak;
    let mut max_dd = 0.0;

    for &value in values {
        if value > peak {
            peak = value;
        }
        if peak > 0.0 {
            let dd = (peak - value) / peak * 100.0;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}
