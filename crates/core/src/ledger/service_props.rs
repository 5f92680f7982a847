//! Property-based tests for TripLedgerService.
//!
//! Replays random create/update/delete sequences against one vehicle and
//! checks the ledger invariants after every step:
//! - no two active trips overlap
//! - every active trip has positive distance
//! - every active trip starts at or above the initial mileage

use chrono::NaiveDate;
use milebook_shared::types::{UserId, VehicleId};
use proptest::prelude::*;

use super::error::LedgerError;
use super::service::TripLedgerService;
use super::types::{Trip, TripFields, VehicleInfo};

const INITIAL_MILEAGE: i64 = 10_000;

#[derive(Debug, Clone)]
enum Op {
    Create { start: i64, end: i64 },
    Update { pick: usize, start: i64, end: i64 },
    Delete { pick: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    // Readings straddle the floor and include inverted ranges.
    let reading = 9_500i64..12_000;
    prop_oneof![
        (reading.clone(), reading.clone()).prop_map(|(start, end)| Op::Create { start, end }),
        (any::<usize>(), reading.clone(), reading).prop_map(|(pick, start, end)| Op::Update { pick, start, end }),
        any::<usize>().prop_map(|pick| Op::Delete { pick }),
    ]
}

fn fields(start: i64, end: i64) -> TripFields {
    TripFields {
        date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        start_odometer: start,
        end_odometer: end,
        purpose: None,
        is_business: true,
    }
}

fn assert_invariants(trips: &[Trip]) -> Result<(), TestCaseError> {
    let active: Vec<&Trip> = trips.iter().filter(|t| t.is_active()).collect();
    for (i, a) in active.iter().enumerate() {
        prop_assert!(a.end_odometer > a.start_odometer);
        prop_assert!(a.start_odometer >= INITIAL_MILEAGE);
        for b in &active[i + 1..] {
            let (ia, ib) = (a.interval().unwrap(), b.interval().unwrap());
            prop_assert!(!ia.overlaps(&ib), "{:?} overlaps {:?}", ia, ib);
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Ledger invariants hold after any sequence of operations.
    #[test]
    fn prop_invariants_hold_for_any_operation_sequence(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let user = UserId::new();
        let vehicle = VehicleInfo { id: VehicleId::new(), user_id: user, initial_mileage: INITIAL_MILEAGE };
        let mut trips: Vec<Trip> = Vec::new();

        for op in ops {
            let index = TripLedgerService::index_trips(&trips);
            match op {
                Op::Create { start, end } => {
                    if let Ok(trip) = TripLedgerService::create_trip(user, &vehicle, fields(start, end), &index) {
                        trips.push(trip);
                    }
                }
                Op::Update { pick, start, end } => {
                    if !trips.is_empty() {
                        let i = pick % trips.len();
                        let _ = TripLedgerService::update_trip(&mut trips[i], &vehicle, fields(start, end), &index);
                    }
                }
                Op::Delete { pick } => {
                    if !trips.is_empty() {
                        let i = pick % trips.len();
                        TripLedgerService::delete_trip(&mut trips[i]);
                    }
                }
            }
            assert_invariants(&trips)?;
        }
    }

    /// A rejected create reports the first rule broken, in rule order.
    #[test]
    fn prop_create_rejection_follows_rule_order(start in 0i64..20_000, end in 0i64..20_000) {
        let user = UserId::new();
        let vehicle = VehicleInfo { id: VehicleId::new(), user_id: user, initial_mileage: INITIAL_MILEAGE };
        let existing = TripLedgerService::create_trip(user, &vehicle, fields(10_000, 10_500), &Default::default()).unwrap();
        let index = TripLedgerService::index_trips([&existing]);

        let result = TripLedgerService::create_trip(user, &vehicle, fields(start, end), &index);

        if end <= start {
            prop_assert_eq!(result.unwrap_err(), LedgerError::EndNotAfterStart);
        } else if start < INITIAL_MILEAGE {
            prop_assert_eq!(
                result.unwrap_err(),
                LedgerError::BelowInitialMileage { initial_mileage: INITIAL_MILEAGE }
            );
        } else if start < 10_500 && end > 10_000 {
            prop_assert_eq!(result.unwrap_err(), LedgerError::TripOverlap { existing: existing.id });
        } else {
            prop_assert_eq!(result.unwrap().distance(), end - start);
        }
    }

    /// Deleting a trip always frees its exact interval.
    #[test]
    fn prop_delete_frees_interval(start in 10_000i64..20_000, len in 1i64..1_000) {
        let user = UserId::new();
        let vehicle = VehicleInfo { id: VehicleId::new(), user_id: user, initial_mileage: INITIAL_MILEAGE };
        let mut a = TripLedgerService::create_trip(user, &vehicle, fields(start, start + len), &Default::default()).unwrap();

        let index = TripLedgerService::index_trips([&a]);
        prop_assert!(TripLedgerService::create_trip(user, &vehicle, fields(start, start + len), &index).is_err());

        TripLedgerService::delete_trip(&mut a);
        let index = TripLedgerService::index_trips([&a]);
        prop_assert!(TripLedgerService::create_trip(user, &vehicle, fields(start, start + len), &index).is_ok());
    }
}
