// src/backtest/mod.rs
// Backtest engine: portfolio simulation and performance metrics

pub mod metrics;
pub mod simulate;
pub mod threshold;
pub mod types;

// Re-export main types and functions
pub use metrics::{compute_metrics, CurveMetrics, RISK_FREE_RATE, TRADING_DAYS_PER_YEAR};
pub use simulate::{run_portfolio_backtest, RandomWalk, DEFAULT_DRIFT, DEFAULT_VOLATILITY};
pub use threshold::run_threshold_backtest;
pub use types::*;
