//! Signal composer: reduces detector outputs into one decision per bar.
//!
//! A [`RuleTable`] is an ordered list of (condition, signal) pairs evaluated
//! first-match-wins against a per-bar input record; no match yields
//! [`Signal::Flat`]. The composer adds no smoothing or hysteresis of its own.
//!
//! The two rule sets used by the strategy scans live in [`rules`].

pub mod rules;

pub use rules::{
    compose_momentum, compose_reversal, momentum_rules, reversal_rules, MomentumInputs,
    ReversalInputs,
};

use std::fmt;

use crate::domain::{Signal, SignalSeries};
use crate::error::Result;
use crate::series::{Series, SeriesValue};

type Condition<R> = Box<dyn Fn(&R) -> bool + Send + Sync>;

/// One row of a rule table.
pub struct Rule<R> {
    label: &'static str,
    signal: Signal,
    condition: Condition<R>,
}

impl<R> Rule<R> {
    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn signal(&self) -> Signal {
        self.signal
    }

    pub fn matches(&self, inputs: &R) -> bool {
        (self.condition)(inputs)
    }
}

impl<R> fmt::Debug for Rule<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("label", &self.label)
            .field("signal", &self.signal)
            .finish_non_exhaustive()
    }
}

/// Ordered, first-match-wins rule table over per-bar records of type `R`.
#[derive(Debug)]
pub struct RuleTable<R> {
    rules: Vec<Rule<R>>,
}

impl<R> Default for RuleTable<R> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<R> RuleTable<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule; earlier rules take precedence.
    pub fn with_rule(
        mut self,
        label: &'static str,
        signal: Signal,
        condition: impl Fn(&R) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.rules.push(Rule {
            label,
            signal,
            condition: Box::new(condition),
        });
        self
    }

    pub fn rules(&self) -> &[Rule<R>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First matching rule for this bar, if any.
    pub fn matched(&self, inputs: &R) -> Option<&Rule<R>> {
        self.rules.iter().find(|rule| rule.matches(inputs))
    }

    pub fn evaluate(&self, inputs: &R) -> Signal {
        self.matched(inputs).map_or(Signal::Flat, Rule::signal)
    }

    /// Evaluate one record per bar and lay the decisions on `like`'s index.
    ///
    /// `records` must yield exactly `like.len()` items, otherwise the call
    /// fails with `MisalignedInput`.
    pub fn compose<T: SeriesValue>(
        &self,
        like: &Series<T>,
        records: impl IntoIterator<Item = R>,
    ) -> Result<SignalSeries> {
        let values = records
            .into_iter()
            .map(|record| Some(self.evaluate(&record)))
            .collect();
        like.try_with_values(values, "rule table")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_match_wins() {
        let table = RuleTable::<i32>::new()
            .with_rule("positive", Signal::Long, |x| *x > 0)
            .with_rule("large", Signal::Short, |x| *x > 10);
        assert_eq!(table.evaluate(&20), Signal::Long);
        assert_eq!(table.matched(&20).map(Rule::label), Some("positive"));
    }

    #[test]
    fn no_match_is_flat() {
        let table = RuleTable::<i32>::new().with_rule("positive", Signal::Long, |x| *x > 0);
        assert_eq!(table.evaluate(&-3), Signal::Flat);
        assert!(table.matched(&-3).is_none());
    }

    #[test]
    fn empty_table_is_always_flat() {
        let table = RuleTable::<()>::new();
        assert!(table.is_empty());
        assert_eq!(table.evaluate(&()), Signal::Flat);
    }

    #[test]
    fn compose_keeps_index() {
        let like = crate::series::TimeSeries::from_f64_indexed(vec![10, 20, 30], &[1.0, 2.0, 3.0])
            .unwrap();
        let table = RuleTable::<i32>::new().with_rule("even", Signal::Long, |x| x % 2 == 0);
        let out = table.compose(&like, [1, 2, 3]).unwrap();
        assert_eq!(out.index(), &[10, 20, 30]);
        assert_eq!(out.to_i8_vec(), vec![0, 1, 0]);
    }

    #[test]
    fn compose_rejects_record_count_mismatch() {
        let like = crate::series::TimeSeries::from_f64(&[1.0, 2.0, 3.0]);
        let table = RuleTable::<i32>::new().with_rule("even", Signal::Long, |x| x % 2 == 0);
        assert!(matches!(
            table.compose(&like, [2]),
            Err(crate::error::SignalError::MisalignedInput { .. })
        ));
        assert!(table.compose(&like, [1, 2, 3, 4]).is_err());
    }
}
