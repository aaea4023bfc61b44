//! Property-based tests for physlab
//!
//! - Model evaluation is deterministic and never produces non-finite numbers
//! - Control values always land inside the declared bounds
//! - Statistics respect min <= mean <= max
//! - Table views never touch the log
//! - JSON export round-trips readings field for field
//! - Run with ProptestConfig::with_cases(100)

use physlab::apparatus::Apparatus;
use physlab::controls::ControlPanel;
use physlab::experiment::{ExperimentSession, Reading};
use physlab::export::{ExperimentMeta, ExportDocument};
use physlab::quantity::{Fields, Quantity};
use physlab::stats::compute_stats;
use physlab::table;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_apparatus() -> impl Strategy<Value = Apparatus> {
    prop::sample::select(Apparatus::ALL.to_vec())
}

/// Raw control input, deliberately wider than any declared range.
fn arb_raw() -> impl Strategy<Value = f64> {
    prop_oneof![
        -1_000.0f64..1_000.0,
        Just(0.0),
        Just(f64::NAN),
        Just(f64::INFINITY),
    ]
}

fn arb_quantity() -> impl Strategy<Value = Quantity> {
    prop_oneof![
        (-1e6f64..1e6).prop_map(Quantity::number),
        "[a-z ]{0,8}".prop_map(Quantity::from),
        Just(Quantity::Undefined),
    ]
}

fn arb_reading() -> impl Strategy<Value = Reading> {
    (
        prop::collection::vec(("[a-c]", -100.0f64..100.0), 0..3),
        prop::collection::vec(("[x-z]", arb_quantity()), 1..3),
    )
        .prop_map(|(inputs, outputs)| {
            let inputs: Fields = inputs.into_iter().collect();
            let outputs: Fields = outputs.into_iter().collect();
            Reading::new(inputs, outputs)
        })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: clamped controls stay within [min, max]
    #[test]
    fn prop_controls_stay_in_bounds(apparatus in arb_apparatus(), raws in prop::collection::vec(arb_raw(), 4)) {
        let mut panel = ControlPanel::new(apparatus);
        for (spec, raw) in apparatus.parameters().iter().zip(raws) {
            panel.set_parameter(spec.id, raw).unwrap();
            let value = panel.value(spec.id).unwrap();
            prop_assert!(value >= spec.min && value <= spec.max);
        }
    }

    /// Property: compute is deterministic and every number is finite
    #[test]
    fn prop_compute_deterministic_and_finite(apparatus in arb_apparatus(), raws in prop::collection::vec(arb_raw(), 4)) {
        let mut panel = ControlPanel::new(apparatus);
        for (spec, raw) in apparatus.parameters().iter().zip(raws) {
            panel.set_parameter(spec.id, raw).unwrap();
        }
        let a = panel.evaluate();
        let b = panel.evaluate();
        prop_assert_eq!(&a, &b);
        for (_, value) in a.derived.iter() {
            if let Quantity::Number(v) = value {
                prop_assert!(v.is_finite());
            }
        }
    }

    /// Property: min <= mean <= max and std_dev >= 0
    #[test]
    fn prop_stats_bounds(values in prop::collection::vec(-1e6f64..1e6, 1..50)) {
        let stats = compute_stats(&values).unwrap();
        prop_assert_eq!(stats.n, values.len());
        prop_assert!(stats.min <= stats.mean + 1e-6);
        prop_assert!(stats.mean <= stats.max + 1e-6);
        prop_assert!(stats.std_dev >= 0.0);
    }

    /// Property: filtering and sorting leave the source untouched
    #[test]
    fn prop_filter_sort_do_not_mutate(readings in prop::collection::vec(arb_reading(), 0..10), query in "[a-z0-9]{0,3}") {
        let before = readings.clone();
        let filtered = table::filter(&readings, &query);
        let _ = table::sort(&readings, "x", table::SortDirection::Descending);
        prop_assert!(filtered.len() <= readings.len());
        prop_assert_eq!(readings, before);
    }

    /// Property: JSON export round-trips the ordered readings
    #[test]
    fn prop_json_round_trip(readings in prop::collection::vec(arb_reading(), 1..10)) {
        let doc = ExportDocument::new(&ExperimentMeta::default(), &readings, &[]).unwrap();
        let back = ExportDocument::from_json(&doc.to_json().unwrap()).unwrap();
        let restored: Vec<Reading> = back.readings().cloned().collect();
        prop_assert_eq!(restored, readings);
    }

    /// Property: recorded session readings mirror the controls
    #[test]
    fn prop_session_record_matches_controls(apparatus in arb_apparatus(), count in 1usize..5) {
        let mut session = ExperimentSession::new(apparatus);
        for _ in 0..count {
            prop_assert!(session.record().is_some());
        }
        let expected = session.controls().values().to_fields();
        for reading in session.log().current() {
            prop_assert_eq!(reading.inputs(), &expected);
        }
    }
}
