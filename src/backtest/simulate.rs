// src/backtest/simulate.rs
// Portfolio backtest simulation over generated price paths

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::backtest::metrics::{compute_metrics, RISK_FREE_RATE};
use crate::backtest::types::{
    BacktestConfig, BacktestResult, PerformancePoint, Portfolio, TradeEstimates,
};
use crate::error::EngineError;
use crate::oscillators::rsi;

/// Daily drift of generated price paths (slight upward bias)
pub const DEFAULT_DRIFT: f64 = 0.0008;
/// Daily volatility of generated price paths
pub const DEFAULT_VOLATILITY: f64 = 0.02;

/// Seed used when a request does not supply one
pub const DEFAULT_SEED: u64 = 42;

/// Periods of history required before indicator nudges apply
const NUDGE_WARMUP: usize = 14;
/// Trailing equity values fed to the nudge RSI
const NUDGE_LOOKBACK: usize = 15;

/// Geometric random walk with normally distributed daily returns.
///
/// Price paths are floored at 0.01 so a long losing streak can never
/// produce a non-positive price.
pub struct RandomWalk {
    step: Normal<f64>,
}

impl RandomWalk {
    pub fn new(drift: f64, volatility: f64) -> Result<Self, EngineError> {
        let step =
            Normal::new(drift, volatility).map_err(|_| EngineError::InvalidVolatility(volatility))?;
        Ok(Self { step })
    }

    /// Generate `base_price` followed by `steps` random-walk values
    pub fn generate(&self, base_price: f64, steps: usize, rng: &mut impl Rng) -> Vec<f64> {
        let mut prices = Vec::with_capacity(steps + 1);
        let mut last = base_price;
        prices.push(last);
        for _ in 0..steps {
            let daily_return = self.step.sample(rng);
            last = (last * (1.0 + daily_return)).max(0.01);
            prices.push(last);
        }
        prices
    }
}

/// Parse a `YYYY-MM-DD` date string
pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, EngineError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| EngineError::InvalidDate {
        value: value.to_string(),
    })
}

/// Run the full portfolio backtest: generate one seeded price path per
/// holding, accumulate the buy-and-hold equity curve, and derive metrics.
///
/// Share counts are fixed at period 0 from `initial_cash * weight / 100`;
/// there is no rebalancing. When RSI over the trailing equity values
/// crosses a configured threshold, the current period's aggregate value is
/// nudged +-0.1% multiplicatively. The nudge is a deliberately simplified
/// placeholder for signal-driven rebalancing, kept for client
/// compatibility.
///
/// `base_price_for` resolves a symbol to the starting price of its path.
/// All randomness (paths, trade estimates, beta/correlation draws) comes
/// from one `StdRng` seeded by `config.seed`, so identical requests give
/// identical results.
pub fn run_portfolio_backtest<F>(
    portfolio: &Portfolio,
    config: &BacktestConfig,
    base_price_for: F,
) -> Result<BacktestResult, EngineError>
where
    F: Fn(&str) -> f64,
{
    let start = parse_date(&config.start_date)?;
    let end = parse_date(&config.end_date)?;
    let duration_days = (end - start).num_days();
    if duration_days <= 0 {
        return Err(EngineError::InvalidDateRange {
            start: config.start_date.clone(),
            end: config.end_date.clone(),
        });
    }
    if portfolio.initial_cash <= 0.0 {
        return Err(EngineError::NonPositiveInitialCash(portfolio.initial_cash));
    }

    let steps = duration_days as usize;
    let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or(DEFAULT_SEED));
    let walk = RandomWalk::new(DEFAULT_DRIFT, DEFAULT_VOLATILITY)?;

    // One path per holding, generated in request order so the rng stream
    // is stable for a given seed
    let positions: Vec<(f64, Vec<f64>)> = portfolio
        .stocks
        .iter()
        .map(|stock| {
            let base = base_price_for(&stock.symbol);
            let prices = walk.generate(base, steps, &mut rng);
            let allocation = portfolio.initial_cash * stock.weight / 100.0;
            let shares = if prices[0] > 0.0 { allocation / prices[0] } else { 0.0 };
            (shares, prices)
        })
        .collect();

    let mut equity: Vec<f64> = Vec::with_capacity(steps + 1);
    for day in 0..=steps {
        let value: f64 = positions
            .iter()
            .map(|(shares, prices)| shares * prices[day])
            .sum();
        equity.push(value);

        if day > NUDGE_WARMUP {
            for indicator in &config.indicators {
                if !indicator.name.eq_ignore_ascii_case("rsi") {
                    continue;
                }
                // Window includes the current (possibly already nudged) value
                let lookback = equity.len().saturating_sub(NUDGE_LOOKBACK);
                let rsi_value = rsi(&equity[lookback..], indicator.period);
                if let Some(last) = equity.last_mut() {
                    if rsi_value < indicator.buy_condition.value {
                        *last *= 1.001;
                    } else if rsi_value > indicator.sell_condition.value {
                        *last *= 0.999;
                    }
                }
            }
        }
    }

    let metrics = compute_metrics(&equity, portfolio.initial_cash, RISK_FREE_RATE)?;
    let trades = estimate_trade_stats(duration_days, metrics.total_return, &mut rng);

    // Roughly weekly reporting points over the simulated range
    let week_interval = (duration_days / 52).max(1) as usize;
    let mut performance_history = Vec::new();
    let mut i = 0;
    while i < equity.len() {
        let value = equity[i];
        performance_history.push(PerformancePoint {
            date: (start + Duration::days(i as i64)).format("%Y-%m-%d").to_string(),
            value,
            return_percent: (value - portfolio.initial_cash) / portfolio.initial_cash * 100.0,
        });
        i += week_interval;
    }

    let mut additional_metrics = HashMap::new();
    additional_metrics.insert("beta".to_string(), rng.gen_range(0.8..1.4));
    additional_metrics.insert(
        "alpha".to_string(),
        (metrics.total_return_pct - 8.0) / 100.0,
    );
    additional_metrics.insert("correlation".to_string(), rng.gen_range(0.6..0.9));

    Ok(BacktestResult {
        final_value: metrics.final_value,
        total_return: metrics.total_return,
        total_return_pct: metrics.total_return_pct,
        sharpe_ratio: metrics.sharpe_ratio,
        max_drawdown: metrics.max_drawdown,
        volatility: metrics.volatility,
        total_trades: trades.total_trades,
        winning_trades: trades.winning_trades,
        losing_trades: trades.losing_trades,
        avg_win: trades.avg_win,
        avg_loss: trades.avg_loss,
        win_rate: trades.win_rate,
        performance_history,
        additional_metrics,
    })
}

/// Estimate trade statistics from duration and total return.
///
/// Illustrative only: assumes roughly one round trip per 30 days and draws
/// the win split uniformly from [0.4, 0.7). Not derived from trade events.
fn estimate_trade_stats(
    duration_days: i64,
    total_return: f64,
    rng: &mut impl Rng,
) -> TradeEstimates {
    let total_trades = (duration_days / 30).max(1) as u32;
    let winning_trades = (total_trades as f64 * rng.gen_range(0.4..0.7)) as u32;
    let losing_trades = total_trades - winning_trades;

    let avg_win = if winning_trades > 0 {
        (total_return / winning_trades as f64).abs() * 1.2
    } else {
        0.0
    };
    let avg_loss = if losing_trades > 0 {
        (total_return / losing_trades as f64).abs() * 0.8
    } else {
        0.0
    };

    TradeEstimates {
        total_trades,
        winning_trades,
        losing_trades,
        avg_win,
        avg_loss,
        win_rate: winning_trades as f64 / total_trades as f64 * 100.0,
    }
}
