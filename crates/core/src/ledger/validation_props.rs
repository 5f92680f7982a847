//! Property-based tests for odometer intervals and the interval index.
//!
//! - Overlap is symmetric and never holds for touching intervals
//! - The index answers exactly like a brute-force scan

use milebook_shared::types::TripId;
use proptest::prelude::*;

use super::interval::{OdometerIndex, OdometerInterval};

/// Strategy for valid intervals on a small odometer range so collisions are common.
fn interval_strategy() -> impl Strategy<Value = OdometerInterval> {
    (0i64..2_000, 1i64..300).prop_map(|(start, len)| OdometerInterval::new(start, start + len).unwrap())
}

/// Builds a disjoint set by keeping only intervals that fit.
fn disjoint_set(candidates: Vec<OdometerInterval>) -> Vec<(TripId, OdometerInterval)> {
    let mut kept: Vec<(TripId, OdometerInterval)> = Vec::new();
    for candidate in candidates {
        if kept.iter().all(|(_, k)| !k.overlaps(&candidate)) {
            kept.push((TripId::new(), candidate));
        }
    }
    kept
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Overlap is symmetric.
    #[test]
    fn prop_overlap_is_symmetric(a in interval_strategy(), b in interval_strategy()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    /// Every interval overlaps itself; touching intervals never overlap.
    #[test]
    fn prop_touching_intervals_do_not_overlap(a in interval_strategy(), len in 1i64..500) {
        let next = OdometerInterval::new(a.end(), a.end() + len).unwrap();
        prop_assert!(a.overlaps(&a));
        prop_assert!(!a.overlaps(&next));
    }

    /// Inverted or empty ranges are always rejected.
    #[test]
    fn prop_non_positive_distance_rejected(start in -1_000i64..1_000, back in 0i64..1_000) {
        prop_assert!(OdometerInterval::new(start, start - back).is_err());
    }

    /// On disjoint data the indexed lookup agrees with a linear scan.
    #[test]
    fn prop_index_matches_linear_scan(
        candidates in prop::collection::vec(interval_strategy(), 0..40),
        query in interval_strategy(),
    ) {
        let stored = disjoint_set(candidates);
        let index: OdometerIndex = stored.iter().copied().collect();

        let expected = stored.iter().any(|(_, s)| s.overlaps(&query));
        let found = index.find_overlap(&query, None);

        prop_assert_eq!(found.is_some(), expected);
        if let Some(id) = found {
            let (_, hit) = stored.iter().find(|(sid, _)| *sid == id).unwrap();
            prop_assert!(hit.overlaps(&query));
        }
    }

    /// Excluding a trip makes the index ignore exactly that trip.
    #[test]
    fn prop_index_exclusion_matches_linear_scan(
        candidates in prop::collection::vec(interval_strategy(), 1..40),
        query in interval_strategy(),
        pick in any::<prop::sample::Index>(),
    ) {
        let stored = disjoint_set(candidates);
        let (excluded, _) = stored[pick.index(stored.len())];
        let index: OdometerIndex = stored.iter().copied().collect();

        let expected = stored
            .iter()
            .any(|(id, s)| *id != excluded && s.overlaps(&query));
        let found = index.find_overlap(&query, Some(excluded));

        prop_assert_eq!(found.is_some(), expected);
        prop_assert_ne!(found, Some(excluded));
    }

    /// With colliding rows the index still agrees with a linear scan.
    #[test]
    fn prop_index_with_collisions_matches_linear_scan(
        stored in prop::collection::vec(interval_strategy(), 0..30),
        query in interval_strategy(),
    ) {
        let stored: Vec<_> = stored.into_iter().map(|i| (TripId::new(), i)).collect();
        let index: OdometerIndex = stored.iter().copied().collect();

        let expected = stored.iter().any(|(_, s)| s.overlaps(&query));
        prop_assert_eq!(index.find_overlap(&query, None).is_some(), expected);
    }
}
