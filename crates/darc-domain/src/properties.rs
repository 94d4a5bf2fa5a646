//! Property-based tests for the judgement engine.
//!
//! These tests use proptest to verify invariants around:
//! - Boolean composition (double negation, `or` / `and` against `||` / `&&`)
//! - Registration order determinism
//! - Conflict resolution (reject precedence, level, registration tie-break)

use crate::condition::ConditionNode;
use crate::engine::judge_snapshot;
use crate::evaluator::evaluate;
use crate::model::{OperationContext, Plugin};
use crate::policy::EffectiveConfig;
use crate::registry::PluginRegistry;
use crate::resolver::{VoteSnapshot, VotingRuleResolver};
use crate::test_support::{addr, before_op, caller_is, registered};
use darc_types::{FinalDecision, HookPoint, PluginId, ReturnType, VoteOutcome, VotingRuleId};
use proptest::prelude::*;
use std::collections::BTreeMap;

// ============================================================================
// Strategies
// ============================================================================

/// Addresses are drawn from a pool of four so that matches are common.
fn arb_addr_index() -> impl Strategy<Value = u64> {
    1u64..=4
}

fn arb_leaf() -> impl Strategy<Value = ConditionNode> {
    prop_oneof![
        arb_addr_index().prop_map(caller_is),
        prop::collection::btree_set(arb_addr_index(), 1..=3)
            .prop_map(|set| ConditionNode::target_in_set(set.into_iter().map(addr))),
        (0u64..3).prop_map(|r| ConditionNode::vote_passed(Some(VotingRuleId(r)))),
    ]
}

fn arb_condition() -> impl Strategy<Value = ConditionNode> {
    arb_leaf().prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 2..=3)
                .prop_map(|children| ConditionNode::And { children }),
            prop::collection::vec(inner.clone(), 2..=3)
                .prop_map(|children| ConditionNode::Or { children }),
            inner.prop_map(ConditionNode::negate),
        ]
    })
}

fn arb_context() -> impl Strategy<Value = OperationContext> {
    (
        arb_addr_index(),
        prop::collection::vec(arb_addr_index(), 0..=3),
    )
        .prop_map(|(caller, targets)| {
            OperationContext::new(addr(caller), targets.into_iter().map(addr).collect())
        })
}

fn arb_outcome() -> impl Strategy<Value = VoteOutcome> {
    prop_oneof![
        Just(VoteOutcome::Passed),
        Just(VoteOutcome::Failed),
        Just(VoteOutcome::Pending),
    ]
}

fn arb_votes() -> impl Strategy<Value = VoteSnapshot> {
    prop::collection::btree_map((0u64..3).prop_map(VotingRuleId), arb_outcome(), 0..=3)
        .prop_map(VoteSnapshot::from)
}

fn arb_return_type() -> impl Strategy<Value = ReturnType> {
    prop_oneof![
        Just(ReturnType::Approve),
        Just(ReturnType::ApproveSkipIsolation),
        Just(ReturnType::Reject),
    ]
}

/// (return type, level, fires for caller 1)
fn arb_plugin_shape() -> impl Strategy<Value = (ReturnType, u64, bool)> {
    (arb_return_type(), 0u64..5, any::<bool>())
}

fn plugin_from_shape((return_type, level, fires): (ReturnType, u64, bool)) -> Plugin {
    let condition = if fires { caller_is(1) } else { caller_is(2) };
    before_op(condition, return_type, level)
}

/// Straight-line statement of the decision policy, for comparison.
fn expected_decision(shapes: &[(ReturnType, u64, bool)]) -> (FinalDecision, Option<PluginId>) {
    let firing = shapes
        .iter()
        .enumerate()
        .filter(|(_, (_, _, fires))| *fires)
        .map(|(i, (rt, level, _))| (PluginId(i as u64 + 1), *rt, *level));

    let mut best: Option<(PluginId, ReturnType, u64)> = None;
    for (id, rt, level) in firing {
        if rt == ReturnType::Reject {
            return (FinalDecision::Rejected, Some(id));
        }
        if best.is_none_or(|(_, _, l)| level > l) {
            best = Some((id, rt, level));
        }
    }
    match best {
        Some((id, rt, _)) => (rt.decision(), Some(id)),
        None => (FinalDecision::Rejected, None),
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn double_negation_is_identity(
        c in arb_condition(),
        ctx in arb_context(),
        votes in arb_votes(),
    ) {
        let nn = ConditionNode::negate(ConditionNode::negate(c.clone()));
        prop_assert_eq!(
            evaluate(&nn, &ctx, &votes).unwrap(),
            evaluate(&c, &ctx, &votes).unwrap()
        );
    }

    #[test]
    fn or_and_match_boolean_operators(
        c1 in arb_condition(),
        c2 in arb_condition(),
        ctx in arb_context(),
        votes in arb_votes(),
    ) {
        let a = evaluate(&c1, &ctx, &votes).unwrap();
        let b = evaluate(&c2, &ctx, &votes).unwrap();

        let or = ConditionNode::or(vec![c1.clone(), c2.clone()]).unwrap();
        let and = ConditionNode::and(vec![c1, c2]).unwrap();
        prop_assert_eq!(evaluate(&or, &ctx, &votes).unwrap(), a || b);
        prop_assert_eq!(evaluate(&and, &ctx, &votes).unwrap(), a && b);
    }

    #[test]
    fn generated_conditions_pass_validation(c in arb_condition()) {
        prop_assert!(c.validate(64, None).is_ok());
    }

    #[test]
    fn list_returns_registration_order(levels in prop::collection::vec(0u64..100, 0..8)) {
        let registry = PluginRegistry::default();
        let ids: Vec<PluginId> = levels
            .iter()
            .map(|l| registry.register(before_op(caller_is(1), ReturnType::Approve, *l)).unwrap())
            .collect();

        let listed: Vec<PluginId> = registry
            .list(HookPoint::BeforeOperation)
            .iter()
            .map(|p| p.id)
            .collect();
        prop_assert_eq!(listed, ids);
    }

    #[test]
    fn decision_follows_reject_then_level_then_order(
        shapes in prop::collection::vec(arb_plugin_shape(), 0..8),
    ) {
        let plugins = registered(shapes.iter().copied().map(plugin_from_shape).collect());
        let result = judge_snapshot(
            &plugins,
            HookPoint::BeforeOperation,
            &OperationContext::new(addr(1), Vec::new()),
            &VoteSnapshot::new(),
            &EffectiveConfig::default(),
            None,
        )
        .unwrap();

        let (decision, trigger) = expected_decision(&shapes);
        prop_assert_eq!(result.final_decision, decision);
        prop_assert_eq!(result.triggering_plugin, trigger);

        // Verdicts are a prefix of registration order.
        let evaluated: Vec<PluginId> = result.verdicts.iter().map(|v| v.plugin).collect();
        let registered_ids: Vec<PluginId> = plugins.iter().map(|p| p.id).collect();
        prop_assert!(registered_ids.starts_with(&evaluated));
    }

    #[test]
    fn observed_votes_match_the_resolver(
        c in arb_condition(),
        ctx in arb_context(),
        votes in arb_votes(),
    ) {
        let plugins = registered(vec![before_op(c, ReturnType::Approve, 0)]);
        let result = judge_snapshot(
            &plugins,
            HookPoint::BeforeOperation,
            &ctx,
            &votes,
            &EffectiveConfig::default(),
            None,
        )
        .unwrap();

        let expected: BTreeMap<VotingRuleId, VoteOutcome> = result
            .voting_results
            .keys()
            .map(|rule| (*rule, votes.resolve(*rule)))
            .collect();
        prop_assert_eq!(result.voting_results, expected);
    }
}
