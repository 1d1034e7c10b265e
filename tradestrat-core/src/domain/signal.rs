//! Final per-bar trade decision.

use crate::series::{Series, SeriesValue};
use serde::{Deserialize, Serialize};

/// Trade decision for one bar: +1 long entry, -1 short entry, 0 no action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Signal {
    Short,
    #[default]
    Flat,
    Long,
}

impl Signal {
    pub fn as_i8(self) -> i8 {
        match self {
            Signal::Short => -1,
            Signal::Flat => 0,
            Signal::Long => 1,
        }
    }

    pub fn from_i8(value: i8) -> Option<Self> {
        match value {
            -1 => Some(Signal::Short),
            0 => Some(Signal::Flat),
            1 => Some(Signal::Long),
            _ => None,
        }
    }

    pub fn is_flat(self) -> bool {
        self == Signal::Flat
    }
}

impl SeriesValue for Signal {}

/// Composer output, one decision per bar.
pub type SignalSeries = Series<Signal>;

impl SignalSeries {
    /// Decisions as integers in {-1, 0, 1}; missing reported as 0.
    pub fn to_i8_vec(&self) -> Vec<i8> {
        self.iter().map(|s| s.map_or(0, Signal::as_i8)).collect()
    }
}
