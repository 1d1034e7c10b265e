//! Integration tests for extrema qualification and the trend tracker.
//!
//! Tests:
//! 1. Documented tracker scenarios (rising third high, ties, replays).
//! 2. Locator → filter → tracker pipeline on a hand-built oscillator.
//! 3. Projection onto a second series drives the flags.

use tradestrat_core::indicators::{ExtremaLocator, LocalExtrema};
use tradestrat_core::series::TimeSeries;
use tradestrat_core::trend::{
    track_trend, ExtremaFilter, ExtremumKind, TrendPhase, TrendState, TrendTracker,
};

fn sparse(n: usize, events: &[(usize, f64)]) -> TimeSeries {
    let mut values = vec![f64::NAN; n];
    for &(pos, v) in events {
        values[pos] = v;
    }
    TimeSeries::from_f64(&values)
}

// ──────────────────────────────────────────────
// Tracker scenarios
// ──────────────────────────────────────────────

#[test]
fn three_highs_flag_from_third() {
    let highs = sparse(15, &[(2, 90.0), (5, 88.0), (9, 95.0)]);
    let flags = track_trend(&highs).to_bool_vec();
    assert!(flags[..9].iter().all(|f| !f));
    assert!(flags[9..].iter().all(|f| *f));
}

#[test]
fn equal_extrema_are_not_higher() {
    let highs = sparse(4, &[(0, 10.0), (2, 10.0)]);
    assert_eq!(track_trend(&highs).to_bool_vec(), vec![false; 4]);
}

#[test]
fn equal_after_higher_clears_flag() {
    let lows = sparse(6, &[(0, 10.0), (2, 12.0), (4, 12.0)]);
    assert_eq!(
        track_trend(&lows).to_bool_vec(),
        vec![false, false, true, true, false, false]
    );
}

#[test]
fn replayed_bar_does_not_change_state() {
    let mut state = TrendState::new();
    state.observe(10, 40.0).unwrap();
    assert_eq!(state.phase(), TrendPhase::SeenOne);
    state.observe(10, 40.0).unwrap();
    assert_eq!(state.phase(), TrendPhase::SeenOne);
    assert!(state.observe(12, 41.0).unwrap());
    assert!(state.observe(12, 41.0).unwrap());
    assert_eq!(state.prev_value(), Some(40.0));
}

// ──────────────────────────────────────────────
// Full pipeline
// ──────────────────────────────────────────────

/// Oscillator with peaks at 3, 11, 19 and troughs at 7, 15, 23.
fn oscillator() -> TimeSeries {
    let mut values = vec![50.0; 27];
    let peaks = [(3, 90.0), (11, 70.0), (19, 95.0)];
    let troughs = [(7, 10.0), (15, 12.0), (23, 8.0)];
    for (pos, v) in peaks.iter().chain(troughs.iter()) {
        values[*pos] = *v;
        // shoulders keep each extremum strict within radius 2
        values[pos - 1] = (v + 50.0) / 2.0;
        values[pos + 1] = (v + 50.0) / 2.0;
    }
    TimeSeries::from_f64(&values)
}

#[test]
fn pipeline_qualifies_and_tracks() {
    let osc = oscillator();
    let candidates = LocalExtrema::new(2).unwrap().locate(&osc);
    let maxima: Vec<usize> = candidates
        .iter()
        .filter(|c| c.kind == ExtremumKind::Max)
        .map(|c| c.position)
        .collect();
    assert_eq!(maxima, vec![3, 11, 19]);

    let qualified = ExtremaFilter::new(80.0, 20.0)
        .unwrap()
        .apply(&candidates, &osc)
        .unwrap();
    // the 70 peak sits outside the upper zone
    assert_eq!(qualified.count(ExtremumKind::Max), 2);
    assert_eq!(qualified.count(ExtremumKind::Min), 3);

    let flags = TrendTracker::scan(&qualified).unwrap();
    let hh = flags.higher_high.to_bool_vec();
    assert!(hh[..19].iter().all(|f| !f));
    assert!(hh[19..].iter().all(|f| *f));

    let hl = flags.higher_low.to_bool_vec();
    assert!(hl[..15].iter().all(|f| !f));
    assert!(hl[15..23].iter().all(|f| *f));
    assert!(hl[23..].iter().all(|f| !f));
}

#[test]
fn projection_uses_reference_values() {
    let osc = oscillator();
    let candidates = LocalExtrema::new(2).unwrap().locate(&osc);
    let qualified = ExtremaFilter::new(80.0, 20.0)
        .unwrap()
        .apply(&candidates, &osc)
        .unwrap();

    // a slow line falling through the whole window
    let slow: Vec<f64> = (0..27).map(|i| 60.0 - i as f64).collect();
    let projected = qualified.project_onto(&TimeSeries::from_f64(&slow)).unwrap();
    assert_eq!(projected.highs.get(3), Some(57.0));
    assert_eq!(projected.highs.get(19), Some(41.0));

    let flags = TrendTracker::scan(&projected).unwrap();
    assert!(flags.higher_high.to_bool_vec().iter().all(|f| !f));
    assert!(flags.higher_low.to_bool_vec().iter().all(|f| !f));
}
