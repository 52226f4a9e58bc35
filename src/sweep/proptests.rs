//! Property-Based Tests for the Activation Sweep
//!
//! Random organization layouts are generated and swept against the
//! in-memory API. Properties checked:
//!
//! - Active webhooks never receive an activation call
//! - Every inactive webhook receives exactly one activation call
//! - Failure records match exactly the activation calls that errored
//!
//! # Running the Tests
//!
//! ```bash
//! cargo test --lib sweep::proptests
//! ```

use super::fake::{Call, FakeApi};
use super::run;
use proptest::prelude::*;
use std::collections::HashSet;

#[derive(Debug, Clone)]
struct Layout {
    org_hooks: Vec<bool>,
    repos: Vec<Vec<bool>>,
}

fn arb_layout() -> impl Strategy<Value = Layout> {
    (
        prop::collection::vec(any::<bool>(), 0..6),
        prop::collection::vec(prop::collection::vec(any::<bool>(), 0..5), 0..4),
    )
        .prop_map(|(org_hooks, repos)| Layout { org_hooks, repos })
}

/// Build the fake with globally unique hook ids, returning (id, active) pairs
fn build(layout: &Layout, failing: &HashSet<u64>) -> (FakeApi, Vec<(u64, bool)>) {
    let mut next_id = 1u64;
    let mut all = Vec::new();

    let org_hooks: Vec<(u64, bool)> = layout
        .org_hooks
        .iter()
        .map(|&active| {
            let hook = (next_id, active);
            next_id += 1;
            hook
        })
        .collect();
    all.extend(org_hooks.iter().copied());
    let mut api = FakeApi::new().with_org_hooks("acme", &org_hooks);

    for (i, repo) in layout.repos.iter().enumerate() {
        let hooks: Vec<(u64, bool)> = repo
            .iter()
            .map(|&active| {
                let hook = (next_id, active);
                next_id += 1;
                hook
            })
            .collect();
        all.extend(hooks.iter().copied());
        api = api.with_repo("acme", &format!("repo-{}", i), &hooks);
    }

    for id in failing {
        api = api.failing_activation(*id);
    }

    (api, all)
}

fn activated_ids(calls: &[Call]) -> Vec<u64> {
    calls
        .iter()
        .filter_map(|c| match c {
            Call::ActivateOrgHook(_, id) | Call::ActivateRepoHook(_, _, id) => Some(*id),
            _ => None,
        })
        .collect()
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    #[test]
    fn prop_only_inactive_hooks_are_activated(layout in arb_layout()) {
        let (api, hooks) = build(&layout, &HashSet::new());
        let outcome = block_on(run(&api, &["acme".to_string()]));

        let mut called = activated_ids(&api.calls());
        called.sort_unstable();
        let expected: Vec<u64> = hooks.iter().filter(|(_, a)| !a).map(|(id, _)| *id).collect();

        prop_assert_eq!(called, expected);
        prop_assert_eq!(outcome.skipped, hooks.iter().filter(|(_, a)| *a).count());
        prop_assert!(outcome.failures.is_empty());
        prop_assert_eq!(outcome.repositories, layout.repos.len());
    }

    #[test]
    fn prop_failures_match_failed_calls(
        layout in arb_layout(),
        failing in prop::collection::hash_set(1u64..30, 0..8),
    ) {
        let (api, hooks) = build(&layout, &failing);
        let outcome = block_on(run(&api, &["acme".to_string()]));

        let expected_failures: Vec<u64> = hooks
            .iter()
            .filter(|(id, active)| !active && failing.contains(id))
            .map(|(id, _)| *id)
            .collect();
        let recorded: Vec<u64> = outcome.failures.iter().map(|f| f.hook_id).collect();

        prop_assert_eq!(recorded, expected_failures);
        prop_assert_eq!(
            outcome.activated + outcome.failures.len(),
            activated_ids(&api.calls()).len()
        );
        prop_assert!(outcome.aborted.is_none());
    }
}
