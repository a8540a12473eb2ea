//! Momentum indicators
//!
//! MACD is the only momentum indicator the client consumes. Only the MACD
//! line itself is exposed; the signal line and histogram are not part of
//! the response contract.

/// Default MACD fast span
pub const MACD_FAST: usize = 12;
/// Default MACD slow span
pub const MACD_SLOW: usize = 26;

/// Span-weighted exponential moving average.
///
/// Weights decay by `1 - 2/(span + 1)` and are renormalized over the
/// observations seen so far, so the series is defined from the first bar
/// onward (no warmup gap). Evaluated recursively:
///
/// num[t] = x[t] + (1 - alpha) * num[t-1]
/// den[t] = 1    + (1 - alpha) * den[t-1]
/// ema[t] = num[t] / den[t]
fn ewm_span(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 {
        return vec![f64::NAN; values.len()];
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let decay = 1.0 - alpha;

    let mut result = Vec::with_capacity(values.len());
    let mut num = 0.0;
    let mut den = 0.0;
    for &v in values {
        num = v + decay * num;
        den = 1.0 + decay * den;
        result.push(num / den);
    }
    result
}

/// MACD line (fast EMA minus slow EMA), evaluated at the most recent close.
///
/// # Fallbacks
/// Degenerate input (empty series, zero span, non-finite prices) returns
/// 0.0 rather than an error or NaN.
pub fn macd(closes: &[f64], fast: usize, slow: usize) -> f64 {
    if closes.is_empty() || fast == 0 || slow == 0 {
        return 0.0;
    }

    let fast_ema = ewm_span(closes, fast);
    let slow_ema = ewm_span(closes, slow);

    match (fast_ema.last(), slow_ema.last()) {
        (Some(f), Some(s)) if (f - s).is_finite() => f - s,
        _ => 0.0,
    }
}
