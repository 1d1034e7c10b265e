//! polars boundary: DataFrame ↔ [`PriceTable`], and report augmentation.
//!
//! Expected input columns: `date` (Date or `YYYY-MM-DD` strings) and
//! `close` are mandatory; `open`, `high`, `low` fall back to `close` and
//! `volume` to zero when absent. Null prices become missing bars.

use chrono::{DateTime, Duration, NaiveDate};
use polars::prelude::*;

use crate::domain::{Bar, PriceTable};
use crate::error::SignalError;
use crate::strategies::{ColumnData, ScanReport};

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("missing required column `{0}`")]
    MissingColumn(String),

    #[error("column `{column}` has unsupported type {dtype}")]
    UnsupportedType { column: String, dtype: String },

    #[error("null date at row {0}")]
    NullDate(usize),

    #[error("unparseable date `{value}` at row {row}")]
    InvalidDate { value: String, row: usize },

    #[error("report has {report} rows, frame has {frame}")]
    HeightMismatch { report: usize, frame: usize },

    #[error("polars error: {0}")]
    Polars(String),

    #[error(transparent)]
    Signal(#[from] SignalError),
}

impl From<PolarsError> for FrameError {
    fn from(e: PolarsError) -> Self {
        FrameError::Polars(e.to_string())
    }
}

fn epoch() -> NaiveDate {
    DateTime::UNIX_EPOCH.date_naive()
}

fn read_dates(df: &DataFrame) -> Result<Vec<NaiveDate>, FrameError> {
    let column = df
        .column("date")
        .map_err(|_| FrameError::MissingColumn("date".into()))?;

    match column.dtype() {
        DataType::Date => {
            let ca = column.date()?;
            (0..df.height())
                .map(|row| {
                    let days = ca.get(row).ok_or(FrameError::NullDate(row))?;
                    Ok(epoch() + Duration::days(i64::from(days)))
                })
                .collect()
        }
        DataType::String => {
            let ca = column.str()?;
            (0..df.height())
                .map(|row| {
                    let raw = ca.get(row).ok_or(FrameError::NullDate(row))?;
                    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
                        FrameError::InvalidDate {
                            value: raw.to_string(),
                            row,
                        }
                    })
                })
                .collect()
        }
        other => Err(FrameError::UnsupportedType {
            column: "date".into(),
            dtype: other.to_string(),
        }),
    }
}

/// Numeric column as f64 options, or `None` when the column is absent.
fn read_prices(df: &DataFrame, name: &str) -> Result<Option<Vec<Option<f64>>>, FrameError> {
    let Ok(column) = df.column(name) else {
        return Ok(None);
    };
    let numeric = matches!(
        column.dtype(),
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::UInt64
            | DataType::UInt32
    );
    if !numeric {
        return Err(FrameError::UnsupportedType {
            column: name.to_string(),
            dtype: column.dtype().to_string(),
        });
    }
    let cast = column.cast(&DataType::Float64)?;
    let ca = cast.f64()?;
    Ok(Some(ca.into_iter().collect()))
}

/// Build a [`PriceTable`] from a bar DataFrame.
pub fn table_from_dataframe(df: &DataFrame, symbol: &str) -> Result<PriceTable, FrameError> {
    let dates = read_dates(df)?;
    let close = read_prices(df, "close")?.ok_or_else(|| FrameError::MissingColumn("close".into()))?;
    let open = read_prices(df, "open")?;
    let high = read_prices(df, "high")?;
    let low = read_prices(df, "low")?;
    let volume = read_prices(df, "volume")?;

    let pick = |col: &Option<Vec<Option<f64>>>, row: usize, fallback: f64| {
        col.as_ref()
            .map_or(fallback, |values| values[row].unwrap_or(f64::NAN))
    };

    let bars = dates
        .into_iter()
        .enumerate()
        .map(|(row, date)| {
            let c = close[row].unwrap_or(f64::NAN);
            Bar {
                date,
                open: pick(&open, row, c),
                high: pick(&high, row, c),
                low: pick(&low, row, c),
                close: c,
                volume: pick(&volume, row, 0.0),
            }
        })
        .collect();

    Ok(PriceTable::new(symbol, bars)?)
}

/// Bar DataFrame with a `Date` column and the five price columns.
pub fn table_to_dataframe(table: &PriceTable) -> Result<DataFrame, FrameError> {
    let bars = table.bars();
    let days: Vec<i32> = bars
        .iter()
        .map(|b| (b.date - epoch()).num_days() as i32)
        .collect();
    let field = |f: fn(&Bar) -> f64| bars.iter().map(f).collect::<Vec<f64>>();

    Ok(DataFrame::new(vec![
        Column::new("date".into(), days).cast(&DataType::Date)?,
        Column::new("open".into(), field(|b| b.open)),
        Column::new("high".into(), field(|b| b.high)),
        Column::new("low".into(), field(|b| b.low)),
        Column::new("close".into(), field(|b| b.close)),
        Column::new("volume".into(), field(|b| b.volume)),
    ])?)
}

fn report_column(name: &str, data: &ColumnData) -> Column {
    match data {
        ColumnData::Float(s) => Column::new(name.into(), s.values().to_vec()),
        ColumnData::Detector(s) => Column::new(
            name.into(),
            s.iter().map(|v| v.map(i32::from)).collect::<Vec<Option<i32>>>(),
        ),
        ColumnData::Flag(s) => Column::new(name.into(), s.values().to_vec()),
        ColumnData::Signal(s) => Column::new(
            name.into(),
            s.iter()
                .map(|v| v.map(|sig| i32::from(sig.as_i8())))
                .collect::<Vec<Option<i32>>>(),
        ),
    }
}

/// Append every report column to `df` under its contract name.
///
/// Detector and signal columns are written as Int32, flags as Boolean.
/// A column already present in `df` is replaced.
pub fn augment(mut df: DataFrame, report: &ScanReport) -> Result<DataFrame, FrameError> {
    if df.height() != report.len() {
        return Err(FrameError::HeightMismatch {
            report: report.len(),
            frame: df.height(),
        });
    }
    for column in report.columns() {
        df.with_column(report_column(column.name, &column.data))?;
    }
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::{DoubleRsi, DoubleRsiParams, Strategy};

    fn frame(n: usize) -> DataFrame {
        let dates: Vec<String> = (0..n)
            .map(|i| {
                (NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(i as i64))
                    .format("%Y-%m-%d")
                    .to_string()
            })
            .collect();
        let close: Vec<f64> = (0..n).map(|i| 100.0 + ((i as f64) * 0.7).sin() * 5.0).collect();
        DataFrame::new(vec![
            Column::new("date".into(), dates),
            Column::new("close".into(), close),
        ])
        .unwrap()
    }

    #[test]
    fn close_only_frame_fills_ohlc_from_close() {
        let table = table_from_dataframe(&frame(3), "AAA").unwrap();
        assert_eq!(table.len(), 3);
        let bar = &table.bars()[1];
        assert_eq!(bar.open, bar.close);
        assert_eq!(bar.high, bar.close);
        assert_eq!(bar.volume, 0.0);
    }

    #[test]
    fn missing_close_is_an_error() {
        let df = DataFrame::new(vec![Column::new("date".into(), vec!["2024-01-01"])]).unwrap();
        assert!(matches!(
            table_from_dataframe(&df, "AAA"),
            Err(FrameError::MissingColumn(c)) if c == "close"
        ));
    }

    #[test]
    fn bad_date_is_reported_with_row() {
        let df = DataFrame::new(vec![
            Column::new("date".into(), vec!["2024-01-01", "not a date"]),
            Column::new("close".into(), vec![1.0, 2.0]),
        ])
        .unwrap();
        assert!(matches!(
            table_from_dataframe(&df, "AAA"),
            Err(FrameError::InvalidDate { row: 1, .. })
        ));
    }

    #[test]
    fn unordered_dates_are_misaligned() {
        let df = DataFrame::new(vec![
            Column::new("date".into(), vec!["2024-01-02", "2024-01-01"]),
            Column::new("close".into(), vec![1.0, 2.0]),
        ])
        .unwrap();
        assert!(matches!(
            table_from_dataframe(&df, "AAA"),
            Err(FrameError::Signal(SignalError::MisalignedInput { .. }))
        ));
    }

    #[test]
    fn table_roundtrips_through_date_frame() {
        let table = table_from_dataframe(&frame(5), "AAA").unwrap();
        let df = table_to_dataframe(&table).unwrap();
        assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);
        let back = table_from_dataframe(&df, "AAA").unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn augment_appends_contract_columns() {
        let df = frame(40);
        let table = table_from_dataframe(&df, "AAA").unwrap();
        let report = DoubleRsi::new(DoubleRsiParams::default())
            .unwrap()
            .scan(&table)
            .unwrap();
        let out = augment(df, &report).unwrap();
        assert_eq!(out.width(), 2 + report.columns().len());
        assert_eq!(out.column("Signal").unwrap().dtype(), &DataType::Int32);
        assert_eq!(out.column("Higher Low").unwrap().dtype(), &DataType::Boolean);
        assert_eq!(out.column("RSI Fast").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn augment_rejects_height_mismatch() {
        let table = table_from_dataframe(&frame(40), "AAA").unwrap();
        let report = DoubleRsi::new(DoubleRsiParams::default())
            .unwrap()
            .scan(&table)
            .unwrap();
        assert!(matches!(
            augment(frame(39), &report),
            Err(FrameError::HeightMismatch { .. })
        ));
    }
}
