//! Property-based tests for annotation collections and classification.
//!
//! Uses proptest to check the collection invariants across random edit sequences.

use proptest::prelude::*;
use vi_annotate::{
    add_damage_point, classify, remove_damage_point, upsert_tire_measurement, DamagePoint,
    SeverityBand, TirePosition, MAX_TREAD_DEPTH_MM,
};

#[derive(Debug, Clone)]
enum Edit {
    Add(f64, f64),
    Remove(u32),
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (-0.2..1.2f64, -0.2..1.2f64).prop_map(|(x, y)| Edit::Add(x, y)),
        (1u32..12).prop_map(Edit::Remove),
    ]
}

fn position_strategy() -> impl Strategy<Value = TirePosition> {
    prop_oneof![
        Just(TirePosition::FrontLeft),
        Just(TirePosition::FrontRight),
        Just(TirePosition::RearLeft),
        Just(TirePosition::RearRight),
    ]
}

fn is_dense(points: &[DamagePoint]) -> bool {
    points
        .iter()
        .enumerate()
        .all(|(idx, p)| p.sequence == idx as u32 + 1)
}

// ============================================================================
// Damage point numbering
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Any add/remove sequence leaves markers numbered 1..N in order.
    #[test]
    fn damage_points_stay_dense(edits in prop::collection::vec(edit_strategy(), 0..40)) {
        let mut points: Vec<DamagePoint> = Vec::new();
        let mut labels: Vec<String> = Vec::new();
        for (step, edit) in edits.into_iter().enumerate() {
            match edit {
                Edit::Add(x, y) => {
                    let label = format!("p{}", step);
                    points = add_damage_point(&points, x, y, label.clone(), None);
                    labels.push(label);
                }
                Edit::Remove(seq) => {
                    if (seq as usize) <= labels.len() && seq > 0 {
                        labels.remove(seq as usize - 1);
                    }
                    points = remove_damage_point(&points, seq);
                }
            }
            prop_assert!(is_dense(&points));
        }
        let remaining: Vec<String> = points.iter().map(|p| p.label.clone()).collect();
        prop_assert_eq!(remaining, labels);
    }

    /// Removing a point never changes the relative order of the others.
    #[test]
    fn removal_preserves_order(count in 1usize..20, pick in 0usize..20) {
        let mut points = Vec::new();
        for i in 0..count {
            points = add_damage_point(&points, i as f64 / 20.0, 0.5, format!("{}", i), None);
        }
        let target = (pick % count) as u32 + 1;
        let after = remove_damage_point(&points, target);
        prop_assert_eq!(after.len(), count - 1);
        let xs: Vec<f64> = after.iter().map(|p| p.x).collect();
        let mut sorted = xs.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        prop_assert_eq!(xs, sorted);
    }
}

// ============================================================================
// Tire measurement upsert
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// At most one reading per position, holding the latest accepted value.
    #[test]
    fn upsert_is_keyed(
        readings in prop::collection::vec((position_strategy(), 0.0..=MAX_TREAD_DEPTH_MM), 1..30)
    ) {
        let mut measurements = Vec::new();
        for (position, value) in &readings {
            measurements = upsert_tire_measurement(&measurements, *position, *value).unwrap();
        }
        for position in TirePosition::ALL {
            let matching: Vec<_> = measurements.iter().filter(|m| m.position == position).collect();
            let latest = readings.iter().rev().find(|(p, _)| *p == position).map(|(_, v)| *v);
            match latest {
                Some(value) => {
                    prop_assert_eq!(matching.len(), 1);
                    prop_assert_eq!(matching[0].value, value);
                }
                None => prop_assert!(matching.is_empty()),
            }
        }
    }

    /// Rejected readings never alter the collection.
    #[test]
    fn invalid_upsert_is_rejected(value in prop_oneof![6.3401..100.0f64, -100.0..-0.0001f64]) {
        let base = upsert_tire_measurement(&[], TirePosition::FrontLeft, 3.0).unwrap();
        prop_assert!(upsert_tire_measurement(&base, TirePosition::FrontLeft, value).is_err());
        prop_assert_eq!(base[0].value, 3.0);
    }

    /// Every accepted reading classifies into a real band.
    #[test]
    fn accepted_readings_have_known_band(value in 0.0..=MAX_TREAD_DEPTH_MM) {
        prop_assert_ne!(classify(Some(value)), SeverityBand::Unknown);
    }
}
