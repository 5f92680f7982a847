//! Property tests for the year-lock state machine.

use milebook_shared::types::UserId;
use proptest::prelude::*;

use super::service::YearLockService;
use super::types::{LockAction, YearLockEvent};
use crate::auth::Actor;
use crate::ledger::LedgerError;

#[derive(Debug, Clone, Copy)]
enum Step {
    Lock,
    UnlockAsAdmin,
    UnlockAsUser,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Lock),
        Just(Step::UnlockAsAdmin),
        Just(Step::UnlockAsUser),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The summary follows a two-state model; every rejected step leaves it
    /// untouched and every accepted step appends exactly one event.
    #[test]
    fn prop_lock_state_follows_model(
        year in 1900i32..=9999,
        steps in prop::collection::vec(step(), 0..30),
    ) {
        let owner = UserId::new();
        let admin = Actor::admin(UserId::new());
        let mut summary = YearLockService::new_summary(owner, year).unwrap();
        let mut locked = false;
        let mut history: Vec<YearLockEvent> = Vec::new();

        for step in steps {
            let before = summary.clone();
            let result = match step {
                Step::Lock => YearLockService::lock(&summary, owner, "filed".to_string()),
                Step::UnlockAsAdmin => YearLockService::unlock(&summary, &admin, "fix".to_string()),
                Step::UnlockAsUser => {
                    YearLockService::unlock(&summary, &Actor::user(owner), "fix".to_string())
                }
            };

            match (step, locked) {
                (Step::Lock, false) | (Step::UnlockAsAdmin, true) => {
                    let transition = result.unwrap();
                    history.push(transition.event(summary.id));
                    transition.apply(&mut summary);
                    locked = !locked;
                }
                (Step::Lock, true) => {
                    prop_assert_eq!(result, Err(LedgerError::YearAlreadyLocked(year)));
                    prop_assert_eq!(&summary, &before);
                }
                (Step::UnlockAsAdmin, false) => {
                    prop_assert_eq!(result, Err(LedgerError::YearNotLocked(year)));
                    prop_assert_eq!(&summary, &before);
                }
                (Step::UnlockAsUser, _) => {
                    prop_assert_eq!(result, Err(LedgerError::UnlockNotPermitted));
                    prop_assert_eq!(&summary, &before);
                }
            }

            prop_assert_eq!(summary.is_locked, locked);
            prop_assert_eq!(summary.locked_at.is_some(), locked);
        }

        // History alternates lock, unlock, lock, ...
        for (i, event) in history.iter().enumerate() {
            let expected = if i % 2 == 0 { LockAction::Lock } else { LockAction::Unlock };
            prop_assert_eq!(event.action, expected);
        }
    }

    #[test]
    fn prop_years_outside_range_rejected(year in prop_oneof![i32::MIN..1900, 10_000..i32::MAX]) {
        prop_assert_eq!(
            YearLockService::new_summary(UserId::new(), year),
            Err(LedgerError::YearOutOfRange(year))
        );
    }
}
