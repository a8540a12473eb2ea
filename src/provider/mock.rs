//! Mock market data: a hardcoded stock table and seeded price generation.
//!
//! Everything here is illustrative. Prices jitter around fixed base values
//! and histories are random walks; with the same seed every output is
//! reproducible.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::backtest::simulate::{RandomWalk, DEFAULT_DRIFT, DEFAULT_VOLATILITY};
use crate::error::EngineError;
use crate::provider::{MarketData, OhlcBars, QuoteMeta};

/// A row of the mock stock table
#[derive(Debug, Clone, serde::Serialize)]
pub struct StockRecord {
    pub symbol: &'static str,
    pub name: &'static str,
    pub sector: &'static str,
    pub price: f64,
    pub volume: u64,
    pub market_cap: f64,
    pub pe_ratio: f64,
    pub dividend_yield: f64,
    pub fifty_two_week_high: f64,
    pub fifty_two_week_low: f64,
    pub description: &'static str,
}

/// Base price assumed for symbols missing from the table
pub const FALLBACK_BASE_PRICE: f64 = 100.0;

/// The mock stock universe
pub static MOCK_STOCKS: &[StockRecord] = &[
    StockRecord {
        symbol: "AAPL",
        name: "Apple Inc.",
        sector: "Technology",
        price: 175.43,
        volume: 45_678_900,
        market_cap: 2_800_000_000_000.0,
        pe_ratio: 28.5,
        dividend_yield: 0.0043,
        fifty_two_week_high: 198.23,
        fifty_two_week_low: 124.17,
        description: "Apple Inc. designs, manufactures, and markets smartphones, personal computers, tablets, wearables, and accessories worldwide.",
    },
    StockRecord {
        symbol: "GOOGL",
        name: "Alphabet Inc.",
        sector: "Communication Services",
        price: 2750.12,
        volume: 1_234_567,
        market_cap: 1_800_000_000_000.0,
        pe_ratio: 25.3,
        dividend_yield: 0.0,
        fifty_two_week_high: 3030.93,
        fifty_two_week_low: 2193.62,
        description: "Alphabet Inc. provides online advertising services in the United States, Europe, the Middle East, Africa, the Asia-Pacific, Canada, and Latin America.",
    },
    StockRecord {
        symbol: "TSLA",
        name: "Tesla, Inc.",
        sector: "Consumer Discretionary",
        price: 245.67,
        volume: 23_456_789,
        market_cap: 780_000_000_000.0,
        pe_ratio: 65.2,
        dividend_yield: 0.0,
        fifty_two_week_high: 414.50,
        fifty_two_week_low: 101.81,
        description: "Tesla, Inc. designs, develops, manufactures, leases, and sells electric vehicles, and energy generation and storage systems.",
    },
    StockRecord {
        symbol: "MSFT",
        name: "Microsoft Corporation",
        sector: "Technology",
        price: 338.11,
        volume: 12_345_678,
        market_cap: 2_500_000_000_000.0,
        pe_ratio: 32.1,
        dividend_yield: 0.0072,
        fifty_two_week_high: 384.30,
        fifty_two_week_low: 213.43,
        description: "Microsoft Corporation develops, licenses, and supports software, services, devices, and solutions worldwide.",
    },
    StockRecord {
        symbol: "AMZN",
        name: "Amazon.com Inc.",
        sector: "Consumer Discretionary",
        price: 145.32,
        volume: 18_765_432,
        market_cap: 1_500_000_000_000.0,
        pe_ratio: 45.8,
        dividend_yield: 0.0,
        fifty_two_week_high: 188.11,
        fifty_two_week_low: 118.35,
        description: "Amazon.com Inc. engages in the retail sale of consumer products and subscriptions in North America and internationally.",
    },
    StockRecord {
        symbol: "NVDA",
        name: "NVIDIA Corporation",
        sector: "Technology",
        price: 875.28,
        volume: 8_765_432,
        market_cap: 2_200_000_000_000.0,
        pe_ratio: 58.3,
        dividend_yield: 0.0012,
        fifty_two_week_high: 950.02,
        fifty_two_week_low: 180.96,
        description: "NVIDIA Corporation operates as a visual computing company worldwide.",
    },
    StockRecord {
        symbol: "META",
        name: "Meta Platforms Inc.",
        sector: "Communication Services",
        price: 298.75,
        volume: 12_987_654,
        market_cap: 800_000_000_000.0,
        pe_ratio: 22.4,
        dividend_yield: 0.0035,
        fifty_two_week_high: 384.33,
        fifty_two_week_low: 185.82,
        description: "Meta Platforms Inc. develops products that enable people to connect and share with friends and family through mobile devices, personal computers, virtual reality headsets, and wearables worldwide.",
    },
    StockRecord {
        symbol: "BRK.B",
        name: "Berkshire Hathaway Inc.",
        sector: "Financials",
        price: 354.82,
        volume: 2_345_678,
        market_cap: 850_000_000_000.0,
        pe_ratio: 18.9,
        dividend_yield: 0.0,
        fifty_two_week_high: 365.14,
        fifty_two_week_low: 295.04,
        description: "Berkshire Hathaway Inc., through its subsidiaries, engages in the insurance, freight rail transportation, and utility businesses worldwide.",
    },
    StockRecord {
        symbol: "JPM",
        name: "JPMorgan Chase & Co.",
        sector: "Financials",
        price: 142.56,
        volume: 9_876_543,
        market_cap: 420_000_000_000.0,
        pe_ratio: 12.8,
        dividend_yield: 0.0285,
        fifty_two_week_high: 148.36,
        fifty_two_week_low: 126.06,
        description: "JPMorgan Chase & Co. operates as a financial services company worldwide.",
    },
    StockRecord {
        symbol: "V",
        name: "Visa Inc.",
        sector: "Financials",
        price: 245.18,
        volume: 5_432_167,
        market_cap: 520_000_000_000.0,
        pe_ratio: 29.7,
        dividend_yield: 0.0075,
        fifty_two_week_high: 250.46,
        fifty_two_week_low: 201.73,
        description: "Visa Inc. operates as a payments technology company worldwide.",
    },
];

/// Look up a symbol in the mock table (case insensitive)
pub fn find_stock(symbol: &str) -> Option<&'static StockRecord> {
    MOCK_STOCKS
        .iter()
        .find(|s| s.symbol.eq_ignore_ascii_case(symbol))
}

/// Base price for a symbol: table price, or the fallback for strangers
pub fn base_price(symbol: &str) -> f64 {
    find_stock(symbol).map_or(FALLBACK_BASE_PRICE, |s| s.price)
}

/// Apply up to +-5% of jitter to a base price.
///
/// Returns `(price, change, change_percent)` relative to the base.
pub fn jitter_price(base: f64, rng: &mut impl Rng) -> (f64, f64, f64) {
    let swing: f64 = rng.gen_range(-0.05..0.05);
    let price = base * (1.0 + swing);
    let change = price - base;
    let change_percent = if base != 0.0 { change / base * 100.0 } else { 0.0 };
    (price, change, change_percent)
}

/// Stable per-symbol seed so every symbol gets its own rng stream
/// (FNV-1a fold of the uppercased symbol into the base seed)
fn symbol_seed(symbol: &str, base_seed: u64) -> u64 {
    symbol
        .bytes()
        .map(|b| b.to_ascii_uppercase())
        .fold(base_seed ^ 0xcbf2_9ce4_8422_2325, |hash, byte| {
            (hash ^ byte as u64).wrapping_mul(0x0000_0100_0000_01b3)
        })
}

/// Mock [`MarketData`] implementation: seeded random-walk histories around
/// the table's base prices, with synthetic open/high/low bands.
pub struct MockMarketData {
    seed: u64,
    walk: RandomWalk,
}

impl MockMarketData {
    pub fn new(seed: u64) -> Result<Self, EngineError> {
        Ok(Self {
            seed,
            walk: RandomWalk::new(DEFAULT_DRIFT, DEFAULT_VOLATILITY)?,
        })
    }
}

impl MarketData for MockMarketData {
    fn fetch_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<OhlcBars, EngineError> {
        let days = (end - start).num_days();
        if days < 0 {
            return Err(EngineError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        let mut rng = StdRng::seed_from_u64(symbol_seed(symbol, self.seed));
        let closes = self.walk.generate(base_price(symbol), days as usize, &mut rng);

        let mut bars = OhlcBars::default();
        for (i, &close) in closes.iter().enumerate() {
            let open = if i == 0 { close } else { closes[i - 1] };
            bars.dates.push(start + chrono::Duration::days(i as i64));
            bars.opens.push(open);
            bars.highs.push(open.max(close) * 1.005);
            bars.lows.push(open.min(close) * 0.995);
            bars.closes.push(close);
            bars.volumes.push(rng.gen_range(1_000_000.0..50_000_000.0));
        }
        Ok(bars)
    }

    fn fetch_quote(&self, symbol: &str) -> Result<QuoteMeta, EngineError> {
        match find_stock(symbol) {
            Some(stock) => Ok(QuoteMeta {
                symbol: stock.symbol.to_string(),
                company_name: stock.name.to_string(),
                sector: stock.sector.to_string(),
                market_cap: stock.market_cap,
                pe_ratio: stock.pe_ratio,
            }),
            None => Err(EngineError::UnknownSymbol(symbol.to_string())),
        }
    }
}
