//! Local-extrema location.
//!
//! A bar is a local maximum when its value is strictly greater than every
//! neighbour within `order` bars on both sides (strictly less for a
//! minimum). Neighbour positions past either edge are clipped to the edge,
//! so the first and last bars compare against themselves and never qualify.
//! Missing values never qualify and never satisfy a comparison.

use crate::error::{Result, SignalError};
use crate::series::TimeSeries;
use crate::trend::{ExtremaCandidate, ExtremumKind};

/// Source of raw extrema candidates for the extrema filter.
pub trait ExtremaLocator: Send + Sync {
    /// Candidates of both kinds, ordered by position.
    fn locate(&self, series: &TimeSeries) -> Vec<ExtremaCandidate>;
}

/// Symmetric-window strict local extrema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalExtrema {
    order: usize,
}

impl LocalExtrema {
    pub fn new(order: usize) -> Result<Self> {
        if order == 0 {
            return Err(SignalError::invalid("order", "window radius must be >= 1"));
        }
        Ok(Self { order })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    fn is_extremum(&self, values: &[Option<f64>], i: usize, kind: ExtremumKind) -> bool {
        let Some(center) = values[i] else {
            return false;
        };
        let last = values.len() - 1;
        (1..=self.order).all(|shift| {
            let left = values[i.saturating_sub(shift)];
            let right = values[(i + shift).min(last)];
            [left, right].into_iter().all(|neighbour| match (kind, neighbour) {
                (ExtremumKind::Max, Some(n)) => center > n,
                (ExtremumKind::Min, Some(n)) => center < n,
                (_, None) => false,
            })
        })
    }
}

impl ExtremaLocator for LocalExtrema {
    fn locate(&self, series: &TimeSeries) -> Vec<ExtremaCandidate> {
        let values = series.values();
        let mut candidates = Vec::new();
        for (position, value) in values.iter().enumerate() {
            let Some(value) = *value else {
                continue;
            };
            for kind in [ExtremumKind::Max, ExtremumKind::Min] {
                if self.is_extremum(values, position, kind) {
                    candidates.push(ExtremaCandidate {
                        position,
                        value,
                        kind,
                    });
                }
            }
        }
        candidates
    }
}
