//! Daily → weekly resampling.
//!
//! Bars are grouped by ISO week. Each week keeps the first open, the
//! highest high, the lowest low, the last close and the summed volume, and
//! is dated by its last bar.

use chrono::Datelike;

use crate::domain::{Bar, PriceTable};
use crate::error::Result;

fn week_key(bar: &Bar) -> (i32, u32) {
    let week = bar.date.iso_week();
    (week.year(), week.week())
}

fn merge(week: &[Bar]) -> Option<Bar> {
    let first = week.first()?;
    let last = week.last()?;
    Some(Bar {
        date: last.date,
        open: first.open,
        high: week.iter().map(|b| b.high).fold(f64::NAN, f64::max),
        low: week.iter().map(|b| b.low).fold(f64::NAN, f64::min),
        close: last.close,
        volume: week.iter().map(|b| b.volume).filter(|v| !v.is_nan()).sum(),
    })
}

/// One bar per ISO week, same symbol.
pub fn resample_weekly(table: &PriceTable) -> Result<PriceTable> {
    let bars = table
        .bars()
        .chunk_by(|a, b| week_key(a) == week_key(b))
        .filter_map(merge)
        .collect();
    PriceTable::new(table.symbol(), bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn daily(start: NaiveDate, closes: &[f64]) -> PriceTable {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar {
                date: start + Duration::days(i as i64),
                open: c - 0.5,
                high: c + 1.0,
                low: c - 1.0,
                close: c,
                volume: 100.0,
            })
            .collect();
        PriceTable::new("AAA", bars).unwrap()
    }

    #[test]
    fn groups_by_iso_week() {
        // Monday 2024-01-01 through Wednesday 2024-01-10
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let closes: Vec<f64> = (1..=10).map(f64::from).collect();
        let weekly = resample_weekly(&daily(start, &closes)).unwrap();

        assert_eq!(weekly.len(), 2);
        let first = &weekly.bars()[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());
        assert_eq!(first.open, 0.5);
        assert_eq!(first.high, 8.0);
        assert_eq!(first.low, 0.0);
        assert_eq!(first.close, 7.0);
        assert_eq!(first.volume, 700.0);

        let second = &weekly.bars()[1];
        assert_eq!(second.date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(second.close, 10.0);
        assert_eq!(second.volume, 300.0);
    }

    #[test]
    fn year_boundary_week_stays_together() {
        // 2020-12-28 (Mon) .. 2021-01-03 (Sun) is ISO week 2020-W53
        let start = NaiveDate::from_ymd_opt(2020, 12, 28).unwrap();
        let weekly = resample_weekly(&daily(start, &[1.0; 7])).unwrap();
        assert_eq!(weekly.len(), 1);
        assert_eq!(weekly.symbol(), "AAA");
    }

    #[test]
    fn empty_table_stays_empty() {
        let table = PriceTable::new("AAA", Vec::new()).unwrap();
        assert!(resample_weekly(&table).unwrap().is_empty());
    }
}
