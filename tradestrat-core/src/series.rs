//! Aligned time series with explicit missing values.
//!
//! Every series carries its own index so that combining two series can be
//! checked for alignment instead of trusting positions. Missing values are
//! `None`, never a sentinel number: NaN handed to a float constructor is
//! normalised to `None` on the way in.

use crate::error::{Result, SignalError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Element type storable in a [`Series`].
pub trait SeriesValue: Copy + PartialEq + fmt::Debug {
    /// Whether a present value is usable. Floats reject NaN.
    fn is_valid(&self) -> bool {
        true
    }
}

impl SeriesValue for f64 {
    fn is_valid(&self) -> bool {
        !self.is_nan()
    }
}

impl SeriesValue for i8 {}

impl SeriesValue for bool {}

/// Ordered `(index, value)` pairs, one value per bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series<T> {
    index: Vec<i64>,
    values: Vec<Option<T>>,
}

/// Numeric series (prices, oscillators, moving averages).
pub type TimeSeries = Series<f64>;

/// Discrete detector output over {-1, 0, 1}.
pub type DetectorSeries = Series<i8>;

/// Boolean per-bar flags (e.g. "Higher High").
pub type FlagSeries = Series<bool>;

impl<T: SeriesValue> Series<T> {
    /// Build a series from an explicit index.
    ///
    /// The index must be strictly increasing and as long as `values`.
    pub fn try_new(index: Vec<i64>, values: Vec<Option<T>>) -> Result<Self> {
        if index.len() != values.len() {
            return Err(SignalError::misaligned(
                "series construction",
                format!("{} index keys for {} values", index.len(), values.len()),
            ));
        }
        if let Some(pos) = index.windows(2).position(|w| w[0] >= w[1]) {
            return Err(SignalError::misaligned(
                "series construction",
                format!(
                    "index not strictly increasing at position {}: {} then {}",
                    pos + 1,
                    index[pos],
                    index[pos + 1]
                ),
            ));
        }
        let values = values
            .into_iter()
            .map(|v| v.filter(SeriesValue::is_valid))
            .collect();
        Ok(Self { index, values })
    }

    /// Build a series indexed by bar position `0..n`.
    pub fn from_options(values: Vec<Option<T>>) -> Self {
        let index = (0..values.len() as i64).collect();
        let values = values
            .into_iter()
            .map(|v| v.filter(SeriesValue::is_valid))
            .collect();
        Self { index, values }
    }

    /// Series of `len` missing values sharing `self`'s index.
    pub fn missing_like<U: SeriesValue>(&self) -> Series<U> {
        Series {
            index: self.index.clone(),
            values: vec![None; self.values.len()],
        }
    }

    /// New series on the same index, failing when `values` has a
    /// different length.
    pub fn try_with_values<U: SeriesValue>(
        &self,
        values: Vec<Option<U>>,
        context: &'static str,
    ) -> Result<Series<U>> {
        if values.len() != self.values.len() {
            return Err(SignalError::misaligned(
                context,
                format!("{} values for an index of {}", values.len(), self.values.len()),
            ));
        }
        Ok(self.with_values(values))
    }

    /// New series on the same index. Callers build `values` by mapping over
    /// `self`, so the lengths already match.
    pub(crate) fn with_values<U: SeriesValue>(&self, values: Vec<Option<U>>) -> Series<U> {
        debug_assert_eq!(values.len(), self.values.len());
        Series {
            index: self.index.clone(),
            values: values
                .into_iter()
                .map(|v| v.filter(SeriesValue::is_valid))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn index(&self) -> &[i64] {
        &self.index
    }

    pub fn values(&self) -> &[Option<T>] {
        &self.values
    }

    /// Value at bar position `pos`; `None` when missing or out of range.
    pub fn get(&self, pos: usize) -> Option<T> {
        self.values.get(pos).copied().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<T>> + '_ {
        self.values.iter().copied()
    }

    /// Number of present (non-missing) values.
    pub fn count_present(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Elementwise map over present values; missing stays missing.
    pub fn map<U: SeriesValue>(&self, f: impl Fn(T) -> U) -> Series<U> {
        self.with_values(self.values.iter().map(|v| v.map(&f)).collect())
    }

    /// Value of the previous bar at each position (first bar missing).
    pub fn shift(&self) -> Series<T> {
        let mut values = Vec::with_capacity(self.values.len());
        if !self.values.is_empty() {
            values.push(None);
            values.extend(self.values[..self.values.len() - 1].iter().copied());
        }
        self.with_values(values)
    }

    /// Fail unless `other` has the same length and index keys.
    pub fn ensure_aligned<U: SeriesValue>(
        &self,
        other: &Series<U>,
        context: &'static str,
    ) -> Result<()> {
        if self.len() != other.len() {
            return Err(SignalError::misaligned(
                context,
                format!("lengths differ: {} vs {}", self.len(), other.len()),
            ));
        }
        if let Some(pos) = self
            .index
            .iter()
            .zip(other.index.iter())
            .position(|(a, b)| a != b)
        {
            return Err(SignalError::misaligned(
                context,
                format!(
                    "index differs at position {pos}: {} vs {}",
                    self.index[pos], other.index[pos]
                ),
            ));
        }
        Ok(())
    }
}

impl TimeSeries {
    /// Float series from raw values, NaN meaning missing.
    pub fn from_f64(values: &[f64]) -> Self {
        Self::from_options(values.iter().map(|&v| Some(v)).collect())
    }

    /// Float series with an explicit index, NaN meaning missing.
    pub fn from_f64_indexed(index: Vec<i64>, values: &[f64]) -> Result<Self> {
        Self::try_new(index, values.iter().map(|&v| Some(v)).collect())
    }

    /// Raw values with NaN standing in for missing.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.values.iter().map(|v| v.unwrap_or(f64::NAN)).collect()
    }
}

impl DetectorSeries {
    /// Detector series indexed by position, every bar present.
    pub fn from_i8(values: &[i8]) -> Self {
        Self::from_options(values.iter().map(|&v| Some(v)).collect())
    }

    /// Detector values with missing reported as 0.
    pub fn to_i8_vec(&self) -> Vec<i8> {
        self.values.iter().map(|v| v.unwrap_or(0)).collect()
    }
}

impl FlagSeries {
    /// Flag series indexed by position, every bar present.
    pub fn from_bools(values: &[bool]) -> Self {
        Self::from_options(values.iter().map(|&v| Some(v)).collect())
    }

    /// Flags with missing reported as `false`.
    pub fn to_bool_vec(&self) -> Vec<bool> {
        self.values.iter().map(|v| v.unwrap_or(false)).collect()
    }
}

/// Check that every series in `set` shares the first one's index.
pub fn ensure_all_aligned<T: SeriesValue>(set: &[&Series<T>], context: &'static str) -> Result<()> {
    if let Some((first, rest)) = set.split_first() {
        for other in rest {
            first.ensure_aligned(other, context)?;
        }
    }
    Ok(())
}
