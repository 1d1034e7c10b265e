//! Sequential-extrema trend detection.
//!
//! Raw local extrema (from an [`ExtremaLocator`](crate::indicators::ExtremaLocator))
//! are qualified against threshold zones by the [`ExtremaFilter`], then the
//! [`TrendTracker`] folds the qualified extrema of each kind into a latched
//! "higher than the previous one" flag per bar.

pub mod filter;
pub mod tracker;

pub use filter::{ExtremaFilter, QualifiedExtrema};
pub use tracker::{track_trend, TrendFlags, TrendPhase, TrendState, TrendTracker};

use serde::{Deserialize, Serialize};

/// Local maximum or local minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtremumKind {
    Max,
    Min,
}

/// A strict local extremum of a series, before zone qualification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtremaCandidate {
    /// Bar position in the series the candidate was located on.
    pub position: usize,
    pub value: f64,
    pub kind: ExtremumKind,
}
