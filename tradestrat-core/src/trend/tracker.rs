//! Sequential trend tracker.
//!
//! For each extremum kind the tracker remembers the last two qualified
//! values. Every new qualified extremum moves the last value into the
//! previous slot and recomputes the flag as `previous < new`. Between events
//! the flag holds (latches) its last value; before two events it is false.
//!
//! [`TrendState::observe`] is the event-level entry point and is keyed by
//! the bar's index key so replays and out-of-order delivery are detected.
//! [`TrendTracker::scan`] is the batch fold over a whole [`QualifiedExtrema`].

use super::{ExtremumKind, QualifiedExtrema};
use crate::error::{Result, SignalError};
use crate::series::{FlagSeries, TimeSeries};

/// How many qualified extrema a [`TrendState`] has absorbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendPhase {
    Unseen,
    SeenOne,
    Tracking,
}

/// Tracker state for a single extremum kind.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrendState {
    last_value: Option<f64>,
    prev_value: Option<f64>,
    flag: bool,
    last_key: Option<i64>,
}

impl TrendState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> TrendPhase {
        match (self.last_value, self.prev_value) {
            (None, _) => TrendPhase::Unseen,
            (Some(_), None) => TrendPhase::SeenOne,
            (Some(_), Some(_)) => TrendPhase::Tracking,
        }
    }

    pub fn flag(&self) -> bool {
        self.flag
    }

    pub fn last_value(&self) -> Option<f64> {
        self.last_value
    }

    pub fn prev_value(&self) -> Option<f64> {
        self.prev_value
    }

    /// Absorb a qualified extremum at index key `key` and return the flag.
    ///
    /// Re-delivering the event already absorbed at `key` is a no-op. A key
    /// older than the last one, or the same key with a different value, is
    /// rejected. NaN is treated as "no event".
    pub fn observe(&mut self, key: i64, value: f64) -> Result<bool> {
        if value.is_nan() {
            return Ok(self.flag);
        }
        if let Some(last_key) = self.last_key {
            if key < last_key {
                return Err(SignalError::misaligned(
                    "trend tracker",
                    format!("event at index {key} arrived after index {last_key}"),
                ));
            }
            if key == last_key {
                return match self.last_value {
                    Some(v) if v == value => Ok(self.flag),
                    _ => Err(SignalError::misaligned(
                        "trend tracker",
                        format!("conflicting event values at index {key}"),
                    )),
                };
            }
        }
        self.advance(value);
        self.last_key = Some(key);
        Ok(self.flag)
    }

    fn advance(&mut self, value: f64) {
        if let Some(last) = self.last_value {
            self.prev_value = Some(last);
            self.flag = last < value;
        }
        self.last_value = Some(value);
    }
}

/// Per-bar latched trend flags.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendFlags {
    /// Latest qualified maximum strictly above the previous one.
    pub higher_high: FlagSeries,
    /// Latest qualified minimum strictly above the previous one.
    pub higher_low: FlagSeries,
}

/// Pair of [`TrendState`]s, one per extremum kind.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrendTracker {
    highs: TrendState,
    lows: TrendState,
}

impl TrendTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, kind: ExtremumKind) -> &TrendState {
        match kind {
            ExtremumKind::Max => &self.highs,
            ExtremumKind::Min => &self.lows,
        }
    }

    pub fn observe(&mut self, kind: ExtremumKind, key: i64, value: f64) -> Result<bool> {
        match kind {
            ExtremumKind::Max => self.highs.observe(key, value),
            ExtremumKind::Min => self.lows.observe(key, value),
        }
    }

    pub fn higher_high(&self) -> bool {
        self.highs.flag
    }

    pub fn higher_low(&self) -> bool {
        self.lows.flag
    }

    /// Fold every bar of `extrema` through a fresh tracker.
    ///
    /// Output has one flag per bar, present everywhere. `highs` and `lows`
    /// must share one index.
    pub fn scan(extrema: &QualifiedExtrema) -> Result<TrendFlags> {
        extrema
            .highs
            .ensure_aligned(&extrema.lows, "trend tracker")?;
        let mut tracker = Self::new();
        let n = extrema.highs.len();
        let mut higher_high = Vec::with_capacity(n);
        let mut higher_low = Vec::with_capacity(n);

        for (high, low) in extrema.highs.iter().zip(extrema.lows.iter()) {
            if let Some(v) = high {
                tracker.highs.advance(v);
            }
            if let Some(v) = low {
                tracker.lows.advance(v);
            }
            higher_high.push(Some(tracker.highs.flag));
            higher_low.push(Some(tracker.lows.flag));
        }

        Ok(TrendFlags {
            higher_high: extrema.highs.with_values(higher_high),
            higher_low: extrema.lows.with_values(higher_low),
        })
    }
}

/// Latched flag series for a single sparse extrema series.
pub fn track_trend(extrema: &TimeSeries) -> FlagSeries {
    let mut state = TrendState::new();
    let flags = extrema
        .iter()
        .map(|v| {
            if let Some(v) = v {
                state.advance(v);
            }
            Some(state.flag)
        })
        .collect();
    extrema.with_values(flags)
}
