//! Scan output: named columns on the table's index.

use serde::Serialize;

use crate::domain::SignalSeries;
use crate::error::{Result, SignalError};
use crate::series::{DetectorSeries, FlagSeries, TimeSeries};

/// Typed payload of one report column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ColumnData {
    Float(TimeSeries),
    Detector(DetectorSeries),
    Flag(FlagSeries),
    Signal(SignalSeries),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Float(s) => s.len(),
            ColumnData::Detector(s) => s.len(),
            ColumnData::Flag(s) => s.len(),
            ColumnData::Signal(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn index(&self) -> &[i64] {
        match self {
            ColumnData::Float(s) => s.index(),
            ColumnData::Detector(s) => s.index(),
            ColumnData::Flag(s) => s.index(),
            ColumnData::Signal(s) => s.index(),
        }
    }

    /// Cell at `pos` rendered for text export; missing is an empty string.
    pub fn cell(&self, pos: usize) -> String {
        match self {
            ColumnData::Float(s) => s.get(pos).map(|v| v.to_string()),
            ColumnData::Detector(s) => s.get(pos).map(|v| v.to_string()),
            ColumnData::Flag(s) => s.get(pos).map(|v| v.to_string()),
            ColumnData::Signal(s) => s.get(pos).map(|v| v.as_i8().to_string()),
        }
        .unwrap_or_default()
    }
}

impl From<TimeSeries> for ColumnData {
    fn from(series: TimeSeries) -> Self {
        ColumnData::Float(series)
    }
}

impl From<DetectorSeries> for ColumnData {
    fn from(series: DetectorSeries) -> Self {
        ColumnData::Detector(series)
    }
}

impl From<FlagSeries> for ColumnData {
    fn from(series: FlagSeries) -> Self {
        ColumnData::Flag(series)
    }
}

impl From<SignalSeries> for ColumnData {
    fn from(series: SignalSeries) -> Self {
        ColumnData::Signal(series)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedColumn {
    pub name: &'static str,
    pub data: ColumnData,
}

/// Everything one strategy scan produced for one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    strategy: String,
    symbol: String,
    index: Vec<i64>,
    columns: Vec<NamedColumn>,
}

impl ScanReport {
    pub fn new(strategy: impl Into<String>, symbol: impl Into<String>, index: Vec<i64>) -> Self {
        Self {
            strategy: strategy.into(),
            symbol: symbol.into(),
            index,
            columns: Vec::new(),
        }
    }

    /// Append a column. It must sit on the report's index and its name must
    /// be new.
    pub fn push(&mut self, name: &'static str, data: impl Into<ColumnData>) -> Result<()> {
        let data = data.into();
        if data.index() != self.index.as_slice() {
            return Err(SignalError::misaligned(
                "scan report",
                format!("column `{name}` is not on the table index"),
            ));
        }
        if self.column(name).is_some() {
            return Err(SignalError::misaligned(
                "scan report",
                format!("duplicate column `{name}`"),
            ));
        }
        self.columns.push(NamedColumn { name, data });
        Ok(())
    }

    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn index(&self) -> &[i64] {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn columns(&self) -> &[NamedColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnData> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.data)
    }

    pub fn float(&self, name: &str) -> Option<&TimeSeries> {
        match self.column(name)? {
            ColumnData::Float(s) => Some(s),
            _ => None,
        }
    }

    pub fn detector(&self, name: &str) -> Option<&DetectorSeries> {
        match self.column(name)? {
            ColumnData::Detector(s) => Some(s),
            _ => None,
        }
    }

    pub fn flag(&self, name: &str) -> Option<&FlagSeries> {
        match self.column(name)? {
            ColumnData::Flag(s) => Some(s),
            _ => None,
        }
    }

    /// The composed decision column, if the strategy produces one.
    pub fn signal(&self) -> Option<&SignalSeries> {
        self.columns.iter().find_map(|c| match &c.data {
            ColumnData::Signal(s) => Some(s),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_lookup() {
        let mut report = ScanReport::new("test", "AAA", vec![0, 1, 2]);
        report
            .push("x", TimeSeries::from_f64(&[1.0, f64::NAN, 3.0]))
            .unwrap();
        report
            .push("flag", FlagSeries::from_bools(&[true, false, true]))
            .unwrap();
        assert!(report.float("x").is_some());
        assert!(report.float("flag").is_none());
        assert!(report.flag("flag").is_some());
        assert!(report.signal().is_none());
        assert_eq!(report.column_names(), vec!["x", "flag"]);
        assert_eq!(report.column("x").map(|c| c.cell(1)), Some(String::new()));
    }

    #[test]
    fn rejects_misaligned_and_duplicate_columns() {
        let mut report = ScanReport::new("test", "AAA", vec![0, 1]);
        assert!(report.push("x", TimeSeries::from_f64(&[1.0])).is_err());
        report.push("x", TimeSeries::from_f64(&[1.0, 2.0])).unwrap();
        assert!(report.push("x", TimeSeries::from_f64(&[1.0, 2.0])).is_err());
    }
}
