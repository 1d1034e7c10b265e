//! Bar: the fundamental market data unit.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// OHLCV bar for a single symbol on a single day (or week after resampling).
///
/// Only `date` and `close` are required by the scans; the other price
/// fields may be NaN when the source table does not carry them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Bar carrying only a close price.
    pub fn from_close(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            open: f64::NAN,
            high: f64::NAN,
            low: f64::NAN,
            close,
            volume: f64::NAN,
        }
    }

    /// Index key used for series built from this bar (days since CE).
    pub fn index_key(&self) -> i64 {
        i64::from(self.date.num_days_from_ce())
    }

    /// Returns true if the close is missing (void bar).
    pub fn is_void(&self) -> bool {
        self.close.is_nan()
    }
}
