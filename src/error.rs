//! Engine error types.
//!
//! Only the validation-sensitive entry points (metrics, simulation, data
//! providers) return these. The indicator family never fails; it degrades
//! to documented neutral values instead.

/// Top-level error type for the engine and its data providers.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("start date {start} must be before end date {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("end date {end} cannot be in the future")]
    EndDateInFuture { end: String },

    #[error("initial cash must be positive, got {0}")]
    NonPositiveInitialCash(f64),

    #[error("initial cash must be at least {minimum}, got {value}")]
    InitialCashBelowMinimum { value: f64, minimum: f64 },

    #[error("equity curve is empty")]
    EmptyEquityCurve,

    #[error("RSI period must be between {min} and {max}, got {value}")]
    PeriodOutOfRange { value: usize, min: usize, max: usize },

    #[error("RSI threshold must be within 0..=100, got {0}")]
    ThresholdOutOfRange(f64),

    #[error("sell threshold {sell} must be greater than buy threshold {buy}")]
    ThresholdOrder { buy: f64, sell: f64 },

    #[error("volatility must be a finite non-negative number, got {0}")]
    InvalidVolatility(f64),

    #[error("unknown symbol {0}")]
    UnknownSymbol(String),

    #[error("no bars for {symbol} in the requested range")]
    NoData { symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Whether the error represents caller misuse (a 400 at the HTTP
    /// boundary) as opposed to a missing symbol or an internal failure.
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            EngineError::UnknownSymbol(_) | EngineError::NoData { .. } | EngineError::Io(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = EngineError::NonPositiveInitialCash(0.0);
        assert_eq!(err.to_string(), "initial cash must be positive, got 0");

        let err = EngineError::ThresholdOrder {
            buy: 70.0,
            sell: 30.0,
        };
        assert!(err.to_string().contains("must be greater than"));
    }

    #[test]
    fn validation_classification() {
        assert!(EngineError::EmptyEquityCurve.is_validation());
        assert!(!EngineError::UnknownSymbol("ZZZ".into()).is_validation());
    }
}
