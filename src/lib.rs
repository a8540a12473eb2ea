//! # Marketpulse
//!
//! Technical indicator and backtest metrics engine for the trading client,
//! plus the data providers and report assembly behind its two HTTP
//! backends.
//!
//! ## Design
//! - Indicator functions are pure and never fail: degenerate input
//!   degrades to a documented neutral value (RSI 50, MACD 0, stochastic
//!   50/50, level fallbacks) so a dashboard always has something to show.
//! - Metrics and simulation entry points validate loudly: bad dates,
//!   non-positive cash, or inverted thresholds surface as typed
//!   [`EngineError`]s for the HTTP layer to translate.
//! - Everything stochastic (price paths, trade estimates, analyst noise)
//!   draws from a caller-seeded rng, so identical requests give identical
//!   responses.
//!
//! ## Example
//! ```
//! use marketpulse::{rsi, macd, stochastic};
//!
//! let closes = vec![44.0, 44.5, 45.0, 44.5, 45.5, 46.0, 45.5, 46.5];
//!
//! let r = rsi(&closes, 5);
//! let m = macd(&closes, 12, 26);
//! let (k, d) = stochastic(&closes, &closes, &closes, 5, 3);
//! assert!((0.0..=100.0).contains(&r));
//! # let _ = (m, k, d);
//! ```

pub mod analysis;
pub mod backtest;
pub mod common;
pub mod error;
pub mod levels;
pub mod momentum;
pub mod oscillators;
pub mod provider;

// Re-export the engine surface at the crate root
pub use backtest::{
    compute_metrics, run_portfolio_backtest, run_threshold_backtest, BacktestConfig,
    BacktestRequest, BacktestResult, CurveMetrics, Portfolio, ThresholdParams, ThresholdReport,
};
pub use error::EngineError;
pub use levels::{fibonacci_levels, support_resistance, FibLevels};
pub use momentum::{macd, MACD_FAST, MACD_SLOW};
pub use oscillators::{rsi, stochastic};

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

/// WASM bindings for browser/Node.js use
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct Indicators;

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl Indicators {
    #[wasm_bindgen]
    pub fn rsi(closes: &[f64], period: usize) -> f64 {
        oscillators::rsi(closes, period)
    }

    #[wasm_bindgen]
    pub fn macd(closes: &[f64], fast: usize, slow: usize) -> f64 {
        momentum::macd(closes, fast, slow)
    }

    /// Returns `[percent_k, percent_d]`
    #[wasm_bindgen]
    pub fn stochastic(
        highs: &[f64],
        lows: &[f64],
        closes: &[f64],
        k_period: usize,
        d_period: usize,
    ) -> Vec<f64> {
        let (k, d) = oscillators::stochastic(highs, lows, closes, k_period, d_period);
        vec![k, d]
    }

    /// Returns `[support, resistance]`
    #[wasm_bindgen]
    pub fn support_resistance(
        highs: &[f64],
        lows: &[f64],
        closes: &[f64],
        window: usize,
    ) -> Vec<f64> {
        let (s, r) = levels::support_resistance(highs, lows, closes, window);
        vec![s, r]
    }

    /// Returns `[fib_236, fib_382, fib_500, fib_618]`
    #[wasm_bindgen]
    pub fn fibonacci_levels(
        highs: &[f64],
        lows: &[f64],
        closes: &[f64],
        periods: usize,
    ) -> Vec<f64> {
        let fib = levels::fibonacci_levels(highs, lows, closes, periods);
        vec![fib.fib_236, fib.fib_382, fib.fib_500, fib.fib_618]
    }
}
