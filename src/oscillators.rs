//! Oscillator Indicators
//!
//! This module provides the oscillator calculations served to the client:
//! - RSI: Relative Strength Index (simple-average smoothing)
//! - Stochastic: %K and %D
//!
//! All functions here follow the dashboard contract: they never fail and
//! never return NaN. Insufficient history, a zero denominator, or otherwise
//! degenerate input degrades to a documented neutral value so that one bad
//! symbol cannot break an entire response.

use crate::common::{diff, gains_losses, max, mean, min, trailing_window};

/// Neutral midpoint returned when an oscillator cannot be computed
pub const NEUTRAL_OSCILLATOR: f64 = 50.0;

/// Relative Strength Index, evaluated at the most recent close.
///
/// Uses a simple moving average of gains and losses over the trailing
/// `period` deltas (the RSI-SMA variant, not Wilder's smoothing).
///
/// # Formula
/// RS = avg gain / avg loss over the last `period` deltas
/// RSI = 100 - (100 / (1 + RS))
///
/// # Fallbacks
/// - fewer than `period + 1` closes, or `period == 0`: 50.0 (neutral)
/// - avg loss of zero (no down periods): 100.0
pub fn rsi(closes: &[f64], period: usize) -> f64 {
    if period == 0 || closes.len() < period + 1 {
        return NEUTRAL_OSCILLATOR;
    }

    let changes = diff(closes);
    let (gains, losses) = gains_losses(&changes);

    // closes.len() >= period + 1 guarantees `period` trailing deltas exist
    let avg_gain = mean(trailing_window(&gains, period).unwrap_or(&[]));
    let avg_loss = mean(trailing_window(&losses, period).unwrap_or(&[]));

    if !avg_gain.is_finite() || !avg_loss.is_finite() {
        return NEUTRAL_OSCILLATOR;
    }
    if avg_loss == 0.0 {
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Full RSI series over `closes`, NaN-padded for the first `period` bars.
///
/// Rolling counterpart of [`rsi`] for callers that walk a price history
/// bar by bar (the threshold backtest). Same smoothing, same values:
/// `rsi_series(c, p)[i]` equals `rsi(&c[..=i], p)` wherever it is not NaN.
pub(crate) fn rsi_series(closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period + 1 {
        return result;
    }

    let changes = diff(closes);
    let (gains, losses) = gains_losses(&changes);

    let mut gain_sum: f64 = gains[..period].iter().sum();
    let mut loss_sum: f64 = losses[..period].iter().sum();

    for i in period..n {
        if i > period {
            gain_sum += gains[i - 1] - gains[i - 1 - period];
            loss_sum += losses[i - 1] - losses[i - 1 - period];
        }
        result[i] = if loss_sum == 0.0 {
            100.0
        } else {
            let rs = gain_sum / loss_sum;
            100.0 - (100.0 / (1.0 + rs))
        };
    }

    result
}

/// Stochastic oscillator (%K, %D), evaluated at the most recent close.
///
/// # Formula
/// %K = (Close - Lowest Low) / (Highest High - Lowest Low) x 100
/// %D = SMA of the trailing `d_period` %K values
///
/// # Fallbacks
/// Each component independently degrades to 50.0: %K when the lookback
/// window cannot be formed or the high-low range is zero, %D when fewer
/// than `d_period` %K values exist.
pub fn stochastic(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    k_period: usize,
    d_period: usize,
) -> (f64, f64) {
    let n = closes.len();
    if k_period == 0 || n < k_period || highs.len() != n || lows.len() != n {
        return (NEUTRAL_OSCILLATOR, NEUTRAL_OSCILLATOR);
    }

    let k_at = |i: usize| -> f64 {
        let high_window = &highs[(i + 1 - k_period)..=i];
        let low_window = &lows[(i + 1 - k_period)..=i];
        let highest = max(high_window);
        let lowest = min(low_window);
        if highest > lowest {
            (closes[i] - lowest) / (highest - lowest) * 100.0
        } else {
            NEUTRAL_OSCILLATOR
        }
    };

    let k = k_at(n - 1);

    // %D needs d_period %K values, i.e. k_period + d_period - 1 bars
    let d = if d_period > 0 && n >= k_period + d_period - 1 {
        let window: Vec<f64> = ((n - d_period)..n).map(&k_at).collect();
        mean(&window)
    } else {
        NEUTRAL_OSCILLATOR
    };

    (k, d)
}
