// src/backtest/threshold.rs
// RSI-threshold strategy backtest over historical closes

use chrono::NaiveDate;

use crate::backtest::metrics::max_drawdown_pct;
use crate::backtest::simulate::parse_date;
use crate::backtest::types::{ThresholdParams, ThresholdReport};
use crate::error::EngineError;
use crate::oscillators::rsi_series;

/// Bounds on the RSI calculation period
pub const MIN_RSI_PERIOD: usize = 5;
pub const MAX_RSI_PERIOD: usize = 50;
/// Smallest accepted starting portfolio value
pub const MIN_INITIAL_CASH: f64 = 1_000.0;

impl ThresholdParams {
    /// Validate the numeric strategy parameters
    pub fn validate_numeric(&self) -> Result<(), EngineError> {
        if !(MIN_RSI_PERIOD..=MAX_RSI_PERIOD).contains(&self.rsi_period) {
            return Err(EngineError::PeriodOutOfRange {
                value: self.rsi_period,
                min: MIN_RSI_PERIOD,
                max: MAX_RSI_PERIOD,
            });
        }
        for threshold in [self.rsi_buy, self.rsi_sell] {
            if !(0.0..=100.0).contains(&threshold) {
                return Err(EngineError::ThresholdOutOfRange(threshold));
            }
        }
        if self.rsi_sell <= self.rsi_buy {
            return Err(EngineError::ThresholdOrder {
                buy: self.rsi_buy,
                sell: self.rsi_sell,
            });
        }
        if self.initial_cash < MIN_INITIAL_CASH {
            return Err(EngineError::InitialCashBelowMinimum {
                value: self.initial_cash,
                minimum: MIN_INITIAL_CASH,
            });
        }
        Ok(())
    }

    /// Parse and validate the requested date range against `today`
    pub fn date_range(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), EngineError> {
        let start = parse_date(&self.start_date)?;
        let end = parse_date(&self.end_date)?;
        if start >= end {
            return Err(EngineError::InvalidDateRange {
                start: self.start_date.clone(),
                end: self.end_date.clone(),
            });
        }
        if end > today {
            return Err(EngineError::EndDateInFuture {
                end: self.end_date.clone(),
            });
        }
        Ok((start, end))
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Run the RSI-threshold strategy over a close series.
///
/// The strategy is all-in/all-out: buy with all available cash when the
/// trailing RSI drops below the buy threshold, exit the whole position when
/// it rises above the sell threshold. Each completed round trip is recorded
/// as a winning or losing trade by its realized profit; a position still
/// open at the end is marked to market but not counted as a trade.
pub fn run_threshold_backtest(
    closes: &[f64],
    params: &ThresholdParams,
) -> Result<ThresholdReport, EngineError> {
    params.validate_numeric()?;
    if closes.is_empty() {
        return Err(EngineError::NoData {
            symbol: params.ticker.clone(),
        });
    }

    let rsi = rsi_series(closes, params.rsi_period);

    let mut cash = params.initial_cash;
    let mut shares = 0.0_f64;
    let mut cost_basis = 0.0_f64;
    let mut total_trades = 0_u32;
    let mut winning_trades = 0_u32;
    let mut losing_trades = 0_u32;
    let mut equity = Vec::with_capacity(closes.len());

    for (i, &close) in closes.iter().enumerate() {
        let value = rsi[i];
        if value.is_finite() && close > 0.0 {
            if shares == 0.0 && value < params.rsi_buy {
                shares = cash / close;
                cost_basis = cash;
                cash = 0.0;
            } else if shares > 0.0 && value > params.rsi_sell {
                let proceeds = shares * close;
                let pnl = proceeds - cost_basis;
                total_trades += 1;
                if pnl > 0.0 {
                    winning_trades += 1;
                } else {
                    losing_trades += 1;
                }
                cash = proceeds;
                shares = 0.0;
            }
        }
        equity.push(cash + shares * close);
    }

    let final_value = equity.last().copied().unwrap_or(params.initial_cash);
    let total_return = final_value - params.initial_cash;
    let total_return_pct = total_return / params.initial_cash * 100.0;
    let win_rate = if total_trades > 0 {
        winning_trades as f64 / total_trades as f64 * 100.0
    } else {
        0.0
    };

    Ok(ThresholdReport {
        final_value: round2(final_value),
        initial_value: round2(params.initial_cash),
        total_return: round2(total_return),
        total_return_pct: round2(total_return_pct),
        total_trades,
        winning_trades,
        losing_trades,
        win_rate: round2(win_rate),
        max_drawdown: round2(max_drawdown_pct(&equity, params.initial_cash)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ThresholdParams {
        ThresholdParams {
            ticker: "TEST".to_string(),
            start_date: "2023-01-01".to_string(),
            end_date: "2023-06-30".to_string(),
            rsi_period: 5,
            rsi_buy: 30.0,
            rsi_sell: 70.0,
            initial_cash: 100_000.0,
        }
    }

    /// Closes that fall long enough to push RSI(5) under 30, then rally
    /// far enough to push it over 70
    fn v_shape() -> Vec<f64> {
        let mut closes: Vec<f64> = (0..10).map(|i| 100.0 - i as f64 * 3.0).collect();
        closes.extend((1..12).map(|i| 73.0 + i as f64 * 4.0));
        closes
    }

    #[test]
    fn buy_low_sell_high_records_a_win() {
        let report = run_threshold_backtest(&v_shape(), &params()).unwrap();
        assert_eq!(report.total_trades, 1);
        assert_eq!(report.winning_trades, 1);
        assert_eq!(report.losing_trades, 0);
        assert_eq!(report.win_rate, 100.0);
        assert!(report.total_return > 0.0);
        assert!(report.final_value > report.initial_value);
    }

    #[test]
    fn no_signal_no_trades() {
        // Flat series: RSI clamps to 100 (no losses), never below buy
        let closes = vec![100.0; 30];
        let report = run_threshold_backtest(&closes, &params()).unwrap();
        assert_eq!(report.total_trades, 0);
        assert_eq!(report.final_value, 100_000.0);
        assert_eq!(report.win_rate, 0.0);
        assert_eq!(report.max_drawdown, 0.0);
    }

    #[test]
    fn open_position_marks_to_market() {
        // Falls into a buy and keeps falling: no closed trade, value < cash
        let closes: Vec<f64> = (0..30).map(|i| 100.0 - i as f64 * 2.0).collect();
        let report = run_threshold_backtest(&closes, &params()).unwrap();
        assert_eq!(report.total_trades, 0);
        assert!(report.final_value < report.initial_value);
        assert!(report.max_drawdown > 0.0);
    }

    #[test]
    fn rejects_empty_series() {
        assert!(matches!(
            run_threshold_backtest(&[], &params()),
            Err(EngineError::NoData { .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_period() {
        let mut p = params();
        p.rsi_period = 3;
        assert!(matches!(
            run_threshold_backtest(&v_shape(), &p),
            Err(EngineError::PeriodOutOfRange { .. })
        ));
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let mut p = params();
        p.rsi_buy = 70.0;
        p.rsi_sell = 30.0;
        assert!(matches!(
            run_threshold_backtest(&v_shape(), &p),
            Err(EngineError::ThresholdOrder { .. })
        ));
    }

    #[test]
    fn rejects_threshold_above_hundred() {
        let mut p = params();
        p.rsi_sell = 170.0;
        assert!(matches!(
            run_threshold_backtest(&v_shape(), &p),
            Err(EngineError::ThresholdOutOfRange(_))
        ));
    }

    #[test]
    fn rejects_small_account() {
        let mut p = params();
        p.initial_cash = 500.0;
        assert!(matches!(
            run_threshold_backtest(&v_shape(), &p),
            Err(EngineError::InitialCashBelowMinimum { .. })
        ));
    }

    #[test]
    fn date_range_validation() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let p = params();
        let (start, end) = p.date_range(today).unwrap();
        assert!(start < end);

        let mut inverted = params();
        inverted.start_date = "2023-06-30".to_string();
        inverted.end_date = "2023-01-01".to_string();
        assert!(matches!(
            inverted.date_range(today),
            Err(EngineError::InvalidDateRange { .. })
        ));

        let mut future = params();
        future.end_date = "2030-01-01".to_string();
        assert!(matches!(
            future.date_range(today),
            Err(EngineError::EndDateInFuture { .. })
        ));

        let mut garbled = params();
        garbled.start_date = "yesterday".to_string();
        assert!(matches!(
            garbled.date_range(today),
            Err(EngineError::InvalidDate { .. })
        ));
    }
}
