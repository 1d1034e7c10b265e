//! Detector primitives: stateless pattern detection over aligned series.
//!
//! Each detector consumes one or more aligned series and returns a
//! same-length discrete series. Detectors are independent of each other and
//! depend only on their input values at a fixed local window, so they can
//! run on independent series in parallel.
//!
//! Comparisons against a missing value are always false. A transition
//! therefore needs both the current and the previous bar to be present.

pub mod crossover;
pub mod crossover_fixed;
pub mod gradient;
pub mod higher_last_point;
pub mod threshold;

pub use crossover::{crossover, strictly_above};
pub use crossover_fixed::crossover_fixed;
pub use gradient::{first_difference, gradient_sign};
pub use higher_last_point::higher_last_point;
pub use threshold::threshold;
