//! Error taxonomy shared by every engine component.
//!
//! All operations are pure and single-pass, so errors are never retried:
//! they are returned to the caller before any output is produced. Missing
//! values inside an otherwise valid series are ordinary data, not errors.

use thiserror::Error;

/// Errors raised by indicators, detectors, the extrema filter, the trend
/// tracker and the composer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    /// Malformed period, threshold pair or window size.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Not enough history for the requested computation.
    #[error("insufficient data for {context}: need {required} values, found {available}")]
    InsufficientData {
        context: &'static str,
        required: usize,
        available: usize,
    },

    /// Series that must share an index differ in length or index values.
    #[error("misaligned input in {context}: {detail}")]
    MisalignedInput {
        context: &'static str,
        detail: String,
    },
}

impl SignalError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub fn misaligned(context: &'static str, detail: impl Into<String>) -> Self {
        Self::MisalignedInput {
            context,
            detail: detail.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SignalError>;

/// Reject a zero period for windowed/recursive computations.
pub(crate) fn require_period(name: &'static str, period: usize) -> Result<()> {
    if period == 0 {
        return Err(SignalError::invalid(name, "period must be >= 1"));
    }
    Ok(())
}

/// Reject NaN or infinite threshold values.
pub(crate) fn require_finite(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(SignalError::invalid(name, format!("must be finite, got {value}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_period_is_rejected() {
        let err = require_period("period", 0).unwrap_err();
        assert!(matches!(err, SignalError::InvalidParameter { name: "period", .. }));
        assert!(require_period("period", 1).is_ok());
    }

    #[test]
    fn non_finite_threshold_is_rejected() {
        assert!(require_finite("upper", f64::NAN).is_err());
        assert!(require_finite("upper", f64::INFINITY).is_err());
        assert!(require_finite("upper", 80.0).is_ok());
    }

    #[test]
    fn display_mentions_context() {
        let err = SignalError::InsufficientData {
            context: "higher_last_point",
            required: 2,
            available: 1,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data for higher_last_point: need 2 values, found 1"
        );
    }
}
