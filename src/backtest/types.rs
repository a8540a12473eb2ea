// src/backtest/types.rs
// Wire types for both backtest flavors, matching the client app's models

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Portfolio simulation (platform backend)
// ============================================================================

/// A portfolio position expressed as a percentage of initial cash.
/// Weights are not required to sum to 100.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PortfolioStock {
    pub symbol: String,
    pub weight: f64,
}

fn default_initial_cash() -> f64 {
    100_000.0
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Portfolio {
    pub name: String,
    pub stocks: Vec<PortfolioStock>,
    #[serde(default = "default_initial_cash")]
    pub initial_cash: f64,
}

/// Comparison operator carried on indicator conditions.
///
/// Accepted and echoed for client compatibility; the simulation applies the
/// fixed below-buy / above-sell rule regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    LessThan,
    GreaterThan,
    Equals,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndicatorCondition {
    pub operator: ConditionOperator,
    pub value: f64,
}

fn default_period() -> usize {
    14
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BacktestIndicator {
    pub name: String,
    #[serde(default = "default_period")]
    pub period: usize,
    pub buy_condition: IndicatorCondition,
    pub sell_condition: IndicatorCondition,
}

fn default_strategy_logic() -> String {
    "AND".to_string()
}

fn default_rebalance_frequency() -> String {
    "monthly".to_string()
}

/// Configuration for a portfolio backtest.
///
/// `strategy_logic` and `rebalance_frequency` are part of the wire contract
/// but not interpreted by the simulation. `seed` makes the random-walk
/// price paths and the derived trade statistics reproducible.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BacktestConfig {
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub indicators: Vec<BacktestIndicator>,
    #[serde(default = "default_strategy_logic")]
    pub strategy_logic: String,
    #[serde(default = "default_rebalance_frequency")]
    pub rebalance_frequency: String,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BacktestRequest {
    pub portfolio: Portfolio,
    pub config: BacktestConfig,
}

/// A point on the reported performance history (weekly granularity)
#[derive(Debug, Clone, Serialize)]
pub struct PerformancePoint {
    pub date: String,
    pub value: f64,
    pub return_percent: f64,
}

/// Trade statistics derived from duration and total return.
///
/// These are illustrative estimates, not an accounting of discrete trade
/// events; the simulation holds a static allocation and never actually
/// trades.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TradeEstimates {
    pub total_trades: u32,
    pub winning_trades: u32,
    pub losing_trades: u32,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub win_rate: f64,
}

/// Full portfolio backtest response
#[derive(Debug, Clone, Serialize)]
pub struct BacktestResult {
    pub final_value: f64,
    pub total_return: f64,
    pub total_return_pct: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub volatility: f64,
    pub total_trades: u32,
    pub winning_trades: u32,
    pub losing_trades: u32,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub win_rate: f64,
    pub performance_history: Vec<PerformancePoint>,
    pub additional_metrics: HashMap<String, f64>,
}

// ============================================================================
// Threshold backtest (analysis backend)
// ============================================================================

fn default_rsi_buy() -> f64 {
    30.0
}

fn default_rsi_sell() -> f64 {
    70.0
}

/// Parameters for the RSI-threshold backtest
#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdParams {
    pub ticker: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default = "default_period")]
    pub rsi_period: usize,
    #[serde(default = "default_rsi_buy")]
    pub rsi_buy: f64,
    #[serde(default = "default_rsi_sell")]
    pub rsi_sell: f64,
    #[serde(default = "default_initial_cash")]
    pub initial_cash: f64,
}

/// Result of the RSI-threshold backtest.
///
/// Unlike [`TradeEstimates`], the trade counts here come from a real trade
/// log: every buy/sell round trip is recorded with its profit and loss.
/// Drawdown follows the analyzer convention of a positive percentage.
#[derive(Debug, Clone, Serialize)]
pub struct ThresholdReport {
    pub final_value: f64,
    pub initial_value: f64,
    pub total_return: f64,
    pub total_return_pct: f64,
    pub total_trades: u32,
    pub winning_trades: u32,
    pub losing_trades: u32,
    pub win_rate: f64,
    pub max_drawdown: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portfolio_defaults() {
        let p: Portfolio = serde_json::from_str(
            r#"{"name": "growth", "stocks": [{"symbol": "AAPL", "weight": 60.0}]}"#,
        )
        .unwrap();
        assert_eq!(p.initial_cash, 100_000.0);
        assert_eq!(p.stocks.len(), 1);
    }

    #[test]
    fn config_defaults() {
        let c: BacktestConfig = serde_json::from_str(
            r#"{"start_date": "2023-01-01", "end_date": "2023-12-31"}"#,
        )
        .unwrap();
        assert!(c.indicators.is_empty());
        assert_eq!(c.strategy_logic, "AND");
        assert_eq!(c.rebalance_frequency, "monthly");
        assert_eq!(c.seed, None);
    }

    #[test]
    fn condition_operator_wire_names() {
        let c: IndicatorCondition =
            serde_json::from_str(r#"{"operator": "less_than", "value": 30.0}"#).unwrap();
        assert_eq!(c.operator, ConditionOperator::LessThan);
        assert_eq!(
            serde_json::to_string(&ConditionOperator::GreaterThan).unwrap(),
            "\"greater_than\""
        );
    }

    #[test]
    fn threshold_params_defaults() {
        let p: ThresholdParams = serde_json::from_str(
            r#"{"ticker": "MSFT", "start_date": "2023-01-01", "end_date": "2023-06-30"}"#,
        )
        .unwrap();
        assert_eq!(p.rsi_period, 14);
        assert_eq!(p.rsi_buy, 30.0);
        assert_eq!(p.rsi_sell, 70.0);
        assert_eq!(p.initial_cash, 100_000.0);
    }
}
