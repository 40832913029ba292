use std::cell::Cell;
use std::rc::Rc;

use proptest::prelude::*;

use super::fake::FakeGuard;
use super::{enforce_active, GateDecision};
use crate::guards::{Guard, GuardSet};
use crate::principals::PrincipalStatus;

fn status_strategy() -> impl Strategy<Value = Option<PrincipalStatus>> {
    prop_oneof![
        Just(None),
        Just(Some(PrincipalStatus::Active)),
        Just(Some(PrincipalStatus::Inactive)),
    ]
}

fn build(states: &[Option<PrincipalStatus>]) -> (GuardSet, Vec<Rc<Cell<u32>>>) {
    let mut guards: Vec<Box<dyn Guard>> = Vec::new();
    let mut counters = Vec::new();
    for (i, status) in states.iter().enumerate() {
        let (guard, kills) = FakeGuard::new(&format!("g{i}"), *status);
        guards.push(Box::new(guard));
        counters.push(kills);
    }
    (GuardSet::new(guards), counters)
}

proptest! {
    #[test]
    fn prop_first_inactive_guard_alone_is_terminated(
        states in prop::collection::vec(status_strategy(), 0..8)
    ) {
        let (mut guards, counters) = build(&states);
        let first_inactive = states
            .iter()
            .position(|s| *s == Some(PrincipalStatus::Inactive));

        let decision = enforce_active(&mut guards);

        match first_inactive {
            None => prop_assert_eq!(decision, GateDecision::Forward),
            Some(idx) => match decision {
                GateDecision::Reject { guard, .. } => {
                    prop_assert_eq!(guard.to_string(), format!("g{idx}"))
                }
                GateDecision::Forward => prop_assert!(false, "expected rejection"),
            },
        }

        for (i, kills) in counters.iter().enumerate() {
            let expected = u32::from(Some(i) == first_inactive);
            prop_assert_eq!(kills.get(), expected);
        }
    }

    #[test]
    fn prop_gate_converges_after_one_rejection_per_inactive_guard(
        states in prop::collection::vec(status_strategy(), 0..8)
    ) {
        let (mut guards, _) = build(&states);
        let inactive = states
            .iter()
            .filter(|s| **s == Some(PrincipalStatus::Inactive))
            .count();

        let mut rejections = 0;
        while !enforce_active(&mut guards).is_forward() {
            rejections += 1;
            prop_assert!(rejections <= inactive);
        }
        prop_assert_eq!(rejections, inactive);

        // Nothing left to terminate: the gate is now a stable no-op.
        prop_assert_eq!(enforce_active(&mut guards), GateDecision::Forward);
    }
}
