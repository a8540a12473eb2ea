//! Market data providers.
//!
//! The engine never fetches data itself; callers hand it price series. The
//! HTTP layers obtain those series through the [`MarketData`] trait so the
//! mock generator and the parquet-file reader are interchangeable.

pub mod directory;
pub mod mock;
pub mod parquet;

use chrono::NaiveDate;

use crate::error::EngineError;

pub use directory::{search_suggestions, StockSuggestion};
pub use mock::{MockMarketData, StockRecord};
pub use parquet::ParquetMarketData;

/// Aligned OHLCV history for one symbol, oldest bar first
#[derive(Debug, Clone, Default)]
pub struct OhlcBars {
    pub dates: Vec<NaiveDate>,
    pub opens: Vec<f64>,
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
    pub closes: Vec<f64>,
    pub volumes: Vec<f64>,
}

impl OhlcBars {
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.closes.last().copied()
    }
}

/// Quote-level metadata for one symbol
#[derive(Debug, Clone)]
pub struct QuoteMeta {
    pub symbol: String,
    pub company_name: String,
    pub sector: String,
    pub market_cap: f64,
    pub pe_ratio: f64,
}

impl QuoteMeta {
    /// Placeholder metadata for symbols the provider has bars for but no
    /// listing information
    pub fn unknown(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            company_name: format!("{symbol} Corporation"),
            sector: "Technology".to_string(),
            market_cap: 0.0,
            pe_ratio: 0.0,
        }
    }
}

/// A source of historical bars and quote metadata.
///
/// Implementations must be cheap to share behind an `Arc` and safe to call
/// concurrently; the servers hold one instance for the process lifetime.
pub trait MarketData: Send + Sync {
    /// Historical bars for `symbol` over `[start, end]`, oldest first
    fn fetch_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<OhlcBars, EngineError>;

    /// Quote metadata for `symbol`
    fn fetch_quote(&self, symbol: &str) -> Result<QuoteMeta, EngineError>;
}
