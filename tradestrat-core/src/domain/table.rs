//! Price table: one symbol's bars in strictly increasing date order.

use super::bar::Bar;
use crate::error::{Result, SignalError};
use crate::series::TimeSeries;
use serde::{Deserialize, Serialize};

/// Aligned bar table consumed by strategy scans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    symbol: String,
    bars: Vec<Bar>,
}

impl PriceTable {
    /// Build a table, rejecting unordered or duplicate dates.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self> {
        if let Some(pos) = bars.windows(2).position(|w| w[0].date >= w[1].date) {
            return Err(SignalError::misaligned(
                "price table",
                format!(
                    "dates not strictly increasing at row {}: {} then {}",
                    pos + 1,
                    bars[pos].date,
                    bars[pos + 1].date
                ),
            ));
        }
        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Bar index keys shared by every series derived from this table.
    pub fn index(&self) -> Vec<i64> {
        self.bars.iter().map(Bar::index_key).collect()
    }

    /// Close prices as an indexed series.
    pub fn close(&self) -> TimeSeries {
        self.column(|b| b.close)
    }

    /// Any price field as an indexed series.
    pub fn column(&self, field: impl Fn(&Bar) -> f64) -> TimeSeries {
        let values: Vec<f64> = self.bars.iter().map(field).collect();
        // Dates are strictly increasing, so the index is valid by construction.
        TimeSeries::from_f64_indexed(self.index(), &values)
            .unwrap_or_else(|_| TimeSeries::from_f64(&values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn close_series_uses_date_index() {
        let table = PriceTable::new(
            "SPY",
            vec![Bar::from_close(day(2), 10.0), Bar::from_close(day(3), 11.0)],
        )
        .unwrap();
        let close = table.close();
        assert_eq!(close.values(), &[Some(10.0), Some(11.0)]);
        assert_eq!(close.index()[1] - close.index()[0], 1);
        assert_eq!(table.symbol(), "SPY");
    }

    #[test]
    fn rejects_duplicate_dates() {
        let err = PriceTable::new(
            "SPY",
            vec![Bar::from_close(day(2), 10.0), Bar::from_close(day(2), 11.0)],
        )
        .unwrap_err();
        assert!(matches!(err, SignalError::MisalignedInput { .. }));
    }

    #[test]
    fn rejects_unordered_dates() {
        let err = PriceTable::new(
            "SPY",
            vec![Bar::from_close(day(3), 10.0), Bar::from_close(day(2), 11.0)],
        )
        .unwrap_err();
        assert!(matches!(err, SignalError::MisalignedInput { .. }));
    }
}
