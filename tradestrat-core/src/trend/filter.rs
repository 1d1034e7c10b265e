//! Extrema filter: keeps only extrema formed inside an extreme zone.
//!
//! A maximum qualifies when its value is at or above the upper bound, a
//! minimum when its value is at or below the lower bound. Every other bar is
//! missing in the output, never zero: the tracker must skip those bars, not
//! read them as "no movement".

use super::{ExtremaCandidate, ExtremumKind};
use crate::error::{require_finite, Result, SignalError};
use crate::series::TimeSeries;

/// Qualified extrema of both kinds, sparse and aligned to the source index.
#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedExtrema {
    pub highs: TimeSeries,
    pub lows: TimeSeries,
}

impl QualifiedExtrema {
    pub fn series(&self, kind: ExtremumKind) -> &TimeSeries {
        match kind {
            ExtremumKind::Max => &self.highs,
            ExtremumKind::Min => &self.lows,
        }
    }

    pub fn count(&self, kind: ExtremumKind) -> usize {
        self.series(kind).count_present()
    }

    /// Re-express the qualified positions in terms of another series.
    ///
    /// Each qualified bar takes `reference`'s value at that bar; a missing
    /// reference value leaves the bar missing.
    pub fn project_onto(&self, reference: &TimeSeries) -> Result<QualifiedExtrema> {
        self.highs.ensure_aligned(reference, "extrema projection")?;
        self.lows.ensure_aligned(reference, "extrema projection")?;
        let pick = |sparse: &TimeSeries| {
            let values = sparse
                .iter()
                .zip(reference.iter())
                .map(|(q, r)| q.and(r))
                .collect();
            sparse.with_values(values)
        };
        Ok(QualifiedExtrema {
            highs: pick(&self.highs),
            lows: pick(&self.lows),
        })
    }
}

/// Threshold-zone qualification of raw extrema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtremaFilter {
    upper: f64,
    lower: f64,
}

impl ExtremaFilter {
    pub fn new(upper: f64, lower: f64) -> Result<Self> {
        require_finite("upper", upper)?;
        require_finite("lower", lower)?;
        if upper < lower {
            return Err(SignalError::invalid(
                "upper",
                format!("upper bound {upper} is below lower bound {lower}"),
            ));
        }
        Ok(Self { upper, lower })
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn qualifies(&self, candidate: &ExtremaCandidate) -> bool {
        match candidate.kind {
            ExtremumKind::Max => candidate.value >= self.upper,
            ExtremumKind::Min => candidate.value <= self.lower,
        }
    }

    /// Sparse qualified series on `source`'s index.
    ///
    /// `source` is the series the candidates were located on; it only
    /// provides the index and length.
    pub fn apply(
        &self,
        candidates: &[ExtremaCandidate],
        source: &TimeSeries,
    ) -> Result<QualifiedExtrema> {
        let n = source.len();
        let mut highs = vec![None; n];
        let mut lows = vec![None; n];

        for candidate in candidates {
            if candidate.position >= n {
                return Err(SignalError::misaligned(
                    "extrema filter",
                    format!(
                        "candidate at position {} outside series of length {n}",
                        candidate.position
                    ),
                ));
            }
            if !self.qualifies(candidate) {
                continue;
            }
            let slot = match candidate.kind {
                ExtremumKind::Max => &mut highs,
                ExtremumKind::Min => &mut lows,
            };
            slot[candidate.position] = Some(candidate.value);
        }

        Ok(QualifiedExtrema {
            highs: source.with_values(highs),
            lows: source.with_values(lows),
        })
    }
}
