//! Rule sets used by the strategy scans.

use super::RuleTable;
use crate::domain::{Signal, SignalSeries};
use crate::error::Result;
use crate::series::DetectorSeries;
use crate::trend::TrendFlags;

// ─── Reversal: fixed-threshold cross gated by the trend tracker ─────

/// Per-bar inputs of the reversal rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReversalInputs {
    pub threshold_cross: Option<i8>,
    pub higher_high: Option<bool>,
    pub higher_low: Option<bool>,
}

/// Long on a +1 cross with a higher low; short on a -1 cross without a
/// higher high.
///
/// The short side tests `higher_high == false`, not a dedicated lower-high
/// flag.
pub fn reversal_rules() -> RuleTable<ReversalInputs> {
    RuleTable::new()
        .with_rule("cross up, higher low", Signal::Long, |r: &ReversalInputs| {
            r.threshold_cross == Some(1) && r.higher_low == Some(true)
        })
        .with_rule(
            "cross down, no higher high",
            Signal::Short,
            |r: &ReversalInputs| r.threshold_cross == Some(-1) && r.higher_high == Some(false),
        )
}

pub fn compose_reversal(threshold_cross: &DetectorSeries, trend: &TrendFlags) -> Result<SignalSeries> {
    threshold_cross.ensure_aligned(&trend.higher_high, "compose_reversal")?;
    threshold_cross.ensure_aligned(&trend.higher_low, "compose_reversal")?;

    let records = threshold_cross
        .iter()
        .zip(trend.higher_high.iter())
        .zip(trend.higher_low.iter())
        .map(|((threshold_cross, higher_high), higher_low)| ReversalInputs {
            threshold_cross,
            higher_high,
            higher_low,
        });

    reversal_rules().compose(threshold_cross, records)
}

// ─── Momentum: gradient agreement plus K/D crossover ────────────────

/// Per-bar inputs of the momentum rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MomentumInputs {
    pub gradient: Option<i8>,
    pub crossover: Option<i8>,
}

pub fn momentum_rules() -> RuleTable<MomentumInputs> {
    RuleTable::new()
        .with_rule("rising, cross up", Signal::Long, |m: &MomentumInputs| {
            m.gradient == Some(1) && m.crossover == Some(1)
        })
        .with_rule("falling, cross down", Signal::Short, |m: &MomentumInputs| {
            m.gradient == Some(-1) && m.crossover == Some(-1)
        })
}

pub fn compose_momentum(gradient: &DetectorSeries, crossover: &DetectorSeries) -> Result<SignalSeries> {
    gradient.ensure_aligned(crossover, "compose_momentum")?;
    let records = gradient
        .iter()
        .zip(crossover.iter())
        .map(|(gradient, crossover)| MomentumInputs {
            gradient,
            crossover,
        });
    momentum_rules().compose(gradient, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SignalError;
    use crate::series::FlagSeries;

    fn trend_flags(higher_high: &[bool], higher_low: &[bool]) -> TrendFlags {
        TrendFlags {
            higher_high: FlagSeries::from_bools(higher_high),
            higher_low: FlagSeries::from_bools(higher_low),
        }
    }

    #[test]
    fn reversal_with_higher_lows_everywhere() {
        let cross = DetectorSeries::from_i8(&[0, 1, 0, -1, 0]);
        let flags = trend_flags(&[false; 5], &[true; 5]);
        let out = compose_reversal(&cross, &flags).unwrap();
        assert_eq!(out.to_i8_vec(), vec![0, 1, 0, -1, 0]);
    }

    #[test]
    fn higher_high_blocks_short() {
        let cross = DetectorSeries::from_i8(&[0, 1, 0, -1, 0]);
        let flags = trend_flags(&[true; 5], &[true; 5]);
        let out = compose_reversal(&cross, &flags).unwrap();
        assert_eq!(out.to_i8_vec(), vec![0, 1, 0, 0, 0]);
    }

    #[test]
    fn missing_higher_low_blocks_long() {
        let cross = DetectorSeries::from_i8(&[1, 1]);
        let flags = TrendFlags {
            higher_high: FlagSeries::from_bools(&[false, false]),
            higher_low: FlagSeries::from_options(vec![None, Some(true)]),
        };
        let out = compose_reversal(&cross, &flags).unwrap();
        assert_eq!(out.to_i8_vec(), vec![0, 1]);
    }

    #[test]
    fn momentum_requires_agreement() {
        let gradient = DetectorSeries::from_options(vec![None, Some(1), Some(1), Some(-1), Some(0)]);
        let crossover = DetectorSeries::from_i8(&[1, 1, -1, -1, 1]);
        let out = compose_momentum(&gradient, &crossover).unwrap();
        assert_eq!(out.to_i8_vec(), vec![0, 1, 0, -1, 0]);
    }

    #[test]
    fn misaligned_inputs_rejected() {
        let cross = DetectorSeries::from_i8(&[0, 1]);
        let flags = trend_flags(&[false; 3], &[true; 3]);
        assert!(matches!(
            compose_reversal(&cross, &flags),
            Err(SignalError::MisalignedInput { .. })
        ));
    }
}
