//! TradeStrat Core: signal composition engine.
//!
//! This crate turns aligned price series into discrete trade decisions:
//! - Aligned series with explicit missing values
//! - Moving averages plus reference oscillators (RSI, stochastic RSI)
//! - Stateless detector primitives (crossovers, thresholds, gradient sign)
//! - Extrema qualification and the sequential trend tracker
//! - First-match-wins rule tables composing the final signal
//! - Strategy scans producing named report columns
//! - polars conversion and weekly resampling at the table boundary

pub mod composer;
pub mod data;
pub mod detectors;
pub mod domain;
pub mod error;
pub mod indicators;
pub mod series;
pub mod strategies;
pub mod trend;

pub use error::{Result, SignalError};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything a scan hands across threads is Send + Sync.
    ///
    /// The runner fans symbols out over a thread pool; if any of these types
    /// stops being Send + Sync, the build breaks here first.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Series and domain
        require_send::<series::TimeSeries>();
        require_sync::<series::TimeSeries>();
        require_send::<series::DetectorSeries>();
        require_sync::<series::DetectorSeries>();
        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::PriceTable>();
        require_sync::<domain::PriceTable>();
        require_send::<domain::SignalSeries>();
        require_sync::<domain::SignalSeries>();

        // Trend tracking
        require_send::<trend::TrendTracker>();
        require_sync::<trend::TrendTracker>();
        require_send::<trend::QualifiedExtrema>();
        require_sync::<trend::QualifiedExtrema>();

        // Composer
        require_send::<composer::RuleTable<composer::ReversalInputs>>();
        require_sync::<composer::RuleTable<composer::ReversalInputs>>();

        // Strategies
        require_send::<Box<dyn strategies::Strategy>>();
        require_sync::<Box<dyn strategies::Strategy>>();
        require_send::<strategies::ScanReport>();
        require_sync::<strategies::ScanReport>();
        require_send::<strategies::StrategyConfig>();
        require_sync::<strategies::StrategyConfig>();
    }

    /// Architecture contract: a strategy sees one table and nothing else.
    ///
    /// `scan` takes only `&PriceTable`; cross-symbol state cannot leak into a
    /// scan without changing the trait.
    #[test]
    fn strategy_scan_takes_only_a_table() {
        fn _check_trait_object_builds(
            strategy: &dyn strategies::Strategy,
            table: &domain::PriceTable,
        ) -> Result<strategies::ScanReport> {
            strategy.scan(table)
        }
    }
}
