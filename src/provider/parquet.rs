//! Parquet-backed market data: one `{SYMBOL}.parquet` file per symbol.
//!
//! Expected schema: a `Date` string column (`YYYY-MM-DD`) plus `Open`,
//! `High`, `Low`, `Close`, `Volume` float columns.

use std::fs::File;
use std::path::{Path, PathBuf};

use arrow::array::{Array, Float64Array, StringArray};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::EngineError;
use crate::provider::{MarketData, OhlcBars, QuoteMeta};

/// [`MarketData`] implementation reading per-symbol parquet files from a
/// directory
pub struct ParquetMarketData {
    dir: PathBuf,
}

impl ParquetMarketData {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn symbol_path(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.parquet", symbol.to_uppercase()))
    }

    fn read_file(&self, path: &Path, symbol: &str) -> Result<OhlcBars, EngineError> {
        let file = File::open(path)?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)
            .map_err(|e| EngineError::Io(std::io::Error::other(e)))?;
        let reader = builder
            .build()
            .map_err(|e| EngineError::Io(std::io::Error::other(e)))?;

        let mut bars = OhlcBars::default();
        for batch in reader {
            let batch = batch.map_err(|e| EngineError::Io(std::io::Error::other(e)))?;

            if let Some(col) = batch.column_by_name("Date") {
                if let Some(arr) = col.as_any().downcast_ref::<StringArray>() {
                    for i in 0..arr.len() {
                        let date = NaiveDate::parse_from_str(arr.value(i), "%Y-%m-%d")
                            .map_err(|_| EngineError::InvalidDate {
                                value: arr.value(i).to_string(),
                            })?;
                        bars.dates.push(date);
                    }
                }
            }

            extract_f64(&batch, "Open", &mut bars.opens);
            extract_f64(&batch, "High", &mut bars.highs);
            extract_f64(&batch, "Low", &mut bars.lows);
            extract_f64(&batch, "Close", &mut bars.closes);
            extract_f64(&batch, "Volume", &mut bars.volumes);
        }

        if bars.is_empty() || bars.dates.len() != bars.closes.len() {
            return Err(EngineError::NoData {
                symbol: symbol.to_string(),
            });
        }
        Ok(bars)
    }
}

fn extract_f64(batch: &RecordBatch, name: &str, out: &mut Vec<f64>) {
    if let Some(col) = batch.column_by_name(name) {
        if let Some(arr) = col.as_any().downcast_ref::<Float64Array>() {
            for i in 0..arr.len() {
                out.push(if arr.is_null(i) { f64::NAN } else { arr.value(i) });
            }
        }
    }
}

impl MarketData for ParquetMarketData {
    fn fetch_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<OhlcBars, EngineError> {
        let path = self.symbol_path(symbol);
        if !path.exists() {
            return Err(EngineError::UnknownSymbol(symbol.to_string()));
        }

        let all = self.read_file(&path, symbol)?;

        let mut bars = OhlcBars::default();
        for i in 0..all.len() {
            let date = all.dates[i];
            if date < start || date > end {
                continue;
            }
            bars.dates.push(date);
            bars.opens.push(all.opens.get(i).copied().unwrap_or(f64::NAN));
            bars.highs.push(all.highs.get(i).copied().unwrap_or(f64::NAN));
            bars.lows.push(all.lows.get(i).copied().unwrap_or(f64::NAN));
            bars.closes.push(all.closes[i]);
            bars.volumes.push(all.volumes.get(i).copied().unwrap_or(0.0));
        }

        if bars.is_empty() {
            return Err(EngineError::NoData {
                symbol: symbol.to_string(),
            });
        }
        Ok(bars)
    }

    fn fetch_quote(&self, symbol: &str) -> Result<QuoteMeta, EngineError> {
        if !self.symbol_path(symbol).exists() {
            return Err(EngineError::UnknownSymbol(symbol.to_string()));
        }
        // Parquet files carry no listing metadata
        Ok(QuoteMeta::unknown(&symbol.to_uppercase()))
    }
}
