//! Price levels: support/resistance and Fibonacci retracements

use serde::Serialize;

use crate::common::{max, min};

/// Default lookback for support/resistance
pub const SUPPORT_RESISTANCE_WINDOW: usize = 20;
/// Default lookback for Fibonacci retracements
pub const FIBONACCI_PERIODS: usize = 50;

/// Fibonacci retracement levels for a high-low range.
///
/// Each level is `high - (high - low) * ratio`, so with `high > low` the
/// levels are strictly decreasing: 23.6% > 38.2% > 50% > 61.8%.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FibLevels {
    pub fib_236: f64,
    pub fib_382: f64,
    pub fib_500: f64,
    pub fib_618: f64,
}

/// Support and resistance as rolling extremes of the trailing window.
///
/// Support is the lowest low and resistance the highest high over the last
/// `window` bars.
///
/// # Fallbacks
/// - window cannot be formed: `(0.95, 1.05) * last_close`
/// - no closes either: `(0.0, 0.0)`
pub fn support_resistance(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    window: usize,
) -> (f64, f64) {
    let n = closes.len();
    if window > 0 && n >= window && highs.len() == n && lows.len() == n {
        let support = min(&lows[n - window..]);
        let resistance = max(&highs[n - window..]);
        if support.is_finite() && resistance.is_finite() {
            return (support, resistance);
        }
    }

    match closes.last() {
        Some(&last_close) => (last_close * 0.95, last_close * 1.05),
        None => (0.0, 0.0),
    }
}

/// Fibonacci retracement levels over the trailing `periods` bars.
///
/// Uses all bars when fewer than `periods` are available, mirroring a
/// `tail(n)` over a short frame.
///
/// # Fallbacks
/// - empty high/low data: fixed fractions of the last close
///   (0.98, 0.95, 0.92, 0.90)
/// - no closes either: all zeros
pub fn fibonacci_levels(highs: &[f64], lows: &[f64], closes: &[f64], periods: usize) -> FibLevels {
    let take = periods.max(1);
    let high_tail = &highs[highs.len().saturating_sub(take)..];
    let low_tail = &lows[lows.len().saturating_sub(take)..];

    if !high_tail.is_empty() && !low_tail.is_empty() {
        let high = max(high_tail);
        let low = min(low_tail);
        let diff = high - low;
        if diff.is_finite() {
            return FibLevels {
                fib_236: high - diff * 0.236,
                fib_382: high - diff * 0.382,
                fib_500: high - diff * 0.500,
                fib_618: high - diff * 0.618,
            };
        }
    }

    let last_close = closes.last().copied().unwrap_or(0.0);
    FibLevels {
        fib_236: last_close * 0.98,
        fib_382: last_close * 0.95,
        fib_500: last_close * 0.92,
        fib_618: last_close * 0.90,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn support_resistance_rolling_extremes() {
        let highs = vec![11.0, 12.0, 13.0, 12.5, 14.0];
        let lows = vec![9.0, 10.0, 11.0, 10.5, 12.0];
        let closes = vec![10.0, 11.0, 12.0, 11.5, 13.0];

        let (support, resistance) = support_resistance(&highs, &lows, &closes, 3);
        assert_eq!(support, 10.5);
        assert_eq!(resistance, 14.0);
    }

    #[test]
    fn support_resistance_window_fallback() {
        let highs = vec![11.0, 12.0];
        let lows = vec![9.0, 10.0];
        let closes = vec![10.0, 100.0];

        let (support, resistance) = support_resistance(&highs, &lows, &closes, 20);
        assert!((support - 95.0).abs() < 1e-12);
        assert!((resistance - 105.0).abs() < 1e-12);
    }

    #[test]
    fn support_resistance_empty_input() {
        assert_eq!(support_resistance(&[], &[], &[], 20), (0.0, 0.0));
    }

    #[test]
    fn fibonacci_ordering() {
        let highs = vec![100.0, 110.0, 120.0];
        let lows = vec![90.0, 95.0, 100.0];
        let closes = vec![95.0, 105.0, 110.0];

        let fib = fibonacci_levels(&highs, &lows, &closes, 50);
        assert!(fib.fib_236 > fib.fib_382);
        assert!(fib.fib_382 > fib.fib_500);
        assert!(fib.fib_500 > fib.fib_618);
        // high = 120, low = 90, diff = 30
        assert!((fib.fib_500 - 105.0).abs() < 1e-12);
    }

    #[test]
    fn fibonacci_uses_trailing_periods_only() {
        let mut highs = vec![1000.0];
        highs.extend(vec![120.0; 50]);
        let mut lows = vec![1.0];
        lows.extend(vec![90.0; 50]);
        let closes = vec![100.0; 51];

        let fib = fibonacci_levels(&highs, &lows, &closes, 50);
        // The leading outlier bar falls outside the trailing 50
        assert!((fib.fib_236 - (120.0 - 30.0 * 0.236)).abs() < 1e-12);
    }

    #[test]
    fn fibonacci_empty_ohlc_falls_back_to_close_fractions() {
        let fib = fibonacci_levels(&[], &[], &[200.0], 50);
        assert!((fib.fib_236 - 196.0).abs() < 1e-12);
        assert!((fib.fib_382 - 190.0).abs() < 1e-12);
        assert!((fib.fib_500 - 184.0).abs() < 1e-12);
        assert!((fib.fib_618 - 180.0).abs() < 1e-12);
    }

    #[test]
    fn fibonacci_no_data_at_all() {
        let fib = fibonacci_levels(&[], &[], &[], 50);
        assert_eq!(fib.fib_236, 0.0);
        assert_eq!(fib.fib_618, 0.0);
    }
}
