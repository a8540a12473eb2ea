//! Per-symbol analysis report: technical snapshot, sentiment, analyst block.
//!
//! Indicator values come from the indicator family and inherit its
//! never-fail contract. The sentiment block is a deterministic function of
//! the price move; the analyst block adds seeded noise. Both are
//! presentation-layer stand-ins, not real research output.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;

use crate::levels::{
    fibonacci_levels, support_resistance, FibLevels, FIBONACCI_PERIODS, SUPPORT_RESISTANCE_WINDOW,
};
use crate::momentum::{macd, MACD_FAST, MACD_SLOW};
use crate::oscillators::{rsi, stochastic};
use crate::provider::{OhlcBars, QuoteMeta};

/// Default RSI lookback for snapshots
pub const RSI_PERIOD: usize = 14;
/// Default stochastic lookbacks
pub const STOCH_K_PERIOD: usize = 14;
pub const STOCH_D_PERIOD: usize = 3;

/// The four indicator values shown on the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct TechnicalSnapshot {
    pub rsi: f64,
    pub macd: f64,
    pub stochastic_k: f64,
    pub stochastic_d: f64,
}

/// Compute the indicator snapshot for a bar history
pub fn technical_snapshot(bars: &OhlcBars) -> TechnicalSnapshot {
    let (stochastic_k, stochastic_d) = stochastic(
        &bars.highs,
        &bars.lows,
        &bars.closes,
        STOCH_K_PERIOD,
        STOCH_D_PERIOD,
    );
    TechnicalSnapshot {
        rsi: rsi(&bars.closes, RSI_PERIOD),
        macd: macd(&bars.closes, MACD_FAST, MACD_SLOW),
        stochastic_k,
        stochastic_d,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SentimentFactor {
    pub factor: &'static str,
    pub impact: &'static str,
}

/// Sentiment summary derived from the day's price move
#[derive(Debug, Clone, Serialize)]
pub struct SentimentBlock {
    pub overall_sentiment: &'static str,
    pub sentiment_score: f64,
    pub short_term_sentiment: &'static str,
    pub short_term_score: f64,
    pub long_term_sentiment: &'static str,
    pub long_term_score: f64,
    pub sentiment_factors: Vec<SentimentFactor>,
}

/// Map a daily change percentage onto the sentiment block.
///
/// Pure thresholding on the move: above +2% reads bullish, below -2%
/// bearish, neutral in between. Long-term sentiment is a fixed optimistic
/// placeholder.
pub fn sentiment_from_change(change_percent: f64) -> SentimentBlock {
    let (overall_sentiment, sentiment_score, short_term_sentiment, short_term_score) =
        if change_percent > 2.0 {
            ("Bullish", 7.5, "Positive", 8.0)
        } else if change_percent < -2.0 {
            ("Bearish", 3.0, "Negative", 2.5)
        } else {
            ("Neutral", 5.5, "Neutral", 5.0)
        };

    SentimentBlock {
        overall_sentiment,
        sentiment_score,
        short_term_sentiment,
        short_term_score,
        long_term_sentiment: "Bullish",
        long_term_score: 6.5,
        sentiment_factors: vec![
            SentimentFactor {
                factor: "Market Trends",
                impact: if change_percent > 0.0 { "Positive" } else { "Negative" },
            },
            SentimentFactor {
                factor: "Company Earnings",
                impact: "Neutral",
            },
            SentimentFactor {
                factor: "Industry Growth",
                impact: "Positive",
            },
            SentimentFactor {
                factor: "Economic Indicators",
                impact: "Neutral",
            },
        ],
    }
}

/// Analyst recommendation counts and target price
#[derive(Debug, Clone, Serialize)]
pub struct AnalystBlock {
    pub analyst_buy: u32,
    pub analyst_hold: u32,
    pub analyst_sell: u32,
    pub target_price: f64,
}

fn normal_sample(rng: &mut impl Rng, mean: f64, std: f64) -> f64 {
    Normal::new(mean, std)
        .map(|n| n.sample(rng))
        .unwrap_or(mean)
}

/// Generate mock analyst coverage anchored on the price move.
///
/// Stronger up moves skew the counts toward buy ratings; the noise comes
/// from the caller's rng, so a seeded rng gives reproducible coverage.
pub fn analyst_estimates(
    current_price: f64,
    change_percent: f64,
    rng: &mut impl Rng,
) -> AnalystBlock {
    let buy = 5.0 + change_percent * 0.5 + normal_sample(rng, 0.0, 1.0);
    let hold = 3.0 + normal_sample(rng, 0.0, 0.5);
    let sell = 2.0 - change_percent * 0.3 + normal_sample(rng, 0.0, 0.5);

    AnalystBlock {
        analyst_buy: (buy as i64).max(1) as u32,
        analyst_hold: (hold as i64).max(1) as u32,
        analyst_sell: (sell as i64).max(0) as u32,
        target_price: current_price * rng.gen_range(1.05..1.15),
    }
}

/// Complete per-symbol report served by the analysis backend
#[derive(Debug, Clone, Serialize)]
pub struct StockReport {
    pub symbol: String,
    pub company_name: String,
    pub sector: String,
    pub current_price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: u64,
    pub market_cap: f64,
    pub pe_ratio: f64,

    pub support_level: f64,
    pub resistance_level: f64,
    pub rsi: f64,
    pub macd: f64,
    pub stochastic_k: f64,
    pub stochastic_d: f64,

    #[serde(flatten)]
    pub fibonacci: FibLevels,

    #[serde(flatten)]
    pub sentiment: SentimentBlock,

    #[serde(flatten)]
    pub analysts: AnalystBlock,
}

/// Assemble the full report from quote metadata and bar history.
///
/// Never fails: every indicator degrades to its neutral value on broken
/// data, so one bad symbol cannot abort a response.
pub fn build_report(quote: &QuoteMeta, bars: &OhlcBars, rng: &mut impl Rng) -> StockReport {
    let current_price = bars.last_close().unwrap_or(0.0);
    let previous_close = if bars.len() > 1 {
        bars.closes[bars.len() - 2]
    } else {
        current_price
    };
    let change = current_price - previous_close;
    let change_percent = if previous_close != 0.0 {
        change / previous_close * 100.0
    } else {
        0.0
    };

    let snapshot = technical_snapshot(bars);
    let (support_level, resistance_level) = support_resistance(
        &bars.highs,
        &bars.lows,
        &bars.closes,
        SUPPORT_RESISTANCE_WINDOW,
    );

    StockReport {
        symbol: quote.symbol.clone(),
        company_name: quote.company_name.clone(),
        sector: quote.sector.clone(),
        current_price,
        change,
        change_percent,
        volume: bars.volumes.last().copied().unwrap_or(0.0) as u64,
        market_cap: quote.market_cap,
        pe_ratio: quote.pe_ratio,
        support_level,
        resistance_level,
        rsi: snapshot.rsi,
        macd: snapshot.macd,
        stochastic_k: snapshot.stochastic_k,
        stochastic_d: snapshot.stochastic_d,
        fibonacci: fibonacci_levels(&bars.highs, &bars.lows, &bars.closes, FIBONACCI_PERIODS),
        sentiment: sentiment_from_change(change_percent),
        analysts: analyst_estimates(current_price, change_percent, rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_bars(n: usize) -> OhlcBars {
        let mut bars = OhlcBars::default();
        for i in 0..n {
            let close = 100.0 + (i as f64 * 0.7).sin() * 5.0;
            bars.dates.push(
                chrono::NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
            );
            bars.opens.push(close - 0.5);
            bars.highs.push(close + 1.0);
            bars.lows.push(close - 1.0);
            bars.closes.push(close);
            bars.volumes.push(1_000_000.0);
        }
        bars
    }

    #[test]
    fn snapshot_values_are_in_range() {
        let bars = sample_bars(60);
        let snap = technical_snapshot(&bars);
        assert!((0.0..=100.0).contains(&snap.rsi));
        assert!((0.0..=100.0).contains(&snap.stochastic_k));
        assert!((0.0..=100.0).contains(&snap.stochastic_d));
        assert!(snap.macd.is_finite());
    }

    #[test]
    fn snapshot_degrades_on_short_history() {
        let bars = sample_bars(3);
        let snap = technical_snapshot(&bars);
        assert_eq!(snap.rsi, 50.0);
        assert_eq!(snap.stochastic_k, 50.0);
        assert_eq!(snap.stochastic_d, 50.0);
    }

    #[test]
    fn sentiment_thresholds() {
        assert_eq!(sentiment_from_change(3.0).overall_sentiment, "Bullish");
        assert_eq!(sentiment_from_change(-3.0).overall_sentiment, "Bearish");
        assert_eq!(sentiment_from_change(0.5).overall_sentiment, "Neutral");
        assert_eq!(sentiment_from_change(2.0).overall_sentiment, "Neutral");
    }

    #[test]
    fn sentiment_factors_track_direction() {
        let up = sentiment_from_change(1.0);
        assert_eq!(up.sentiment_factors[0].impact, "Positive");
        let down = sentiment_from_change(-1.0);
        assert_eq!(down.sentiment_factors[0].impact, "Negative");
    }

    #[test]
    fn analyst_estimates_are_sane_and_seeded() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = analyst_estimates(100.0, 1.5, &mut rng);
        assert!(a.analyst_buy >= 1);
        assert!(a.analyst_hold >= 1);
        assert!(a.target_price >= 105.0 && a.target_price <= 115.0);

        let mut rng2 = StdRng::seed_from_u64(3);
        let b = analyst_estimates(100.0, 1.5, &mut rng2);
        assert_eq!(a.analyst_buy, b.analyst_buy);
        assert_eq!(a.target_price, b.target_price);
    }

    #[test]
    fn report_assembles_quote_and_indicators() {
        let bars = sample_bars(90);
        let quote = QuoteMeta {
            symbol: "AAPL".to_string(),
            company_name: "Apple Inc.".to_string(),
            sector: "Technology".to_string(),
            market_cap: 2.8e12,
            pe_ratio: 28.5,
        };
        let mut rng = StdRng::seed_from_u64(1);
        let report = build_report(&quote, &bars, &mut rng);

        assert_eq!(report.symbol, "AAPL");
        assert_eq!(report.current_price, bars.last_close().unwrap());
        assert!(report.support_level <= report.resistance_level);
        assert!(report.fibonacci.fib_236 >= report.fibonacci.fib_618);

        // Flattened blocks appear at the top level of the JSON payload
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("fib_236").is_some());
        assert!(json.get("overall_sentiment").is_some());
        assert!(json.get("analyst_buy").is_some());
    }
}
