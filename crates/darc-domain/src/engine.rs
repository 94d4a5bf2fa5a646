use crate::error::JudgeError;
use crate::evaluator::Evaluator;
use crate::model::{OperationContext, RegisteredPlugin};
use crate::policy::EffectiveConfig;
use crate::report::JudgementResult;
use crate::resolver::{MemoizingResolver, VotingRuleResolver};
use darc_types::{HookPoint, PluginVerdict, ReturnType};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Caller-held flag checked between plugins. Clones share the flag.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Judge one operation against a plugin snapshot.
///
/// Decision policy:
/// 1) plugins are evaluated in snapshot (registration) order
/// 2) the first firing `reject` decides immediately; later plugins are not evaluated
/// 3) otherwise the firing approval with the highest level decides (earliest wins ties)
/// 4) if nothing fires, the hook point default from `cfg` applies
///
/// Any evaluation error aborts the whole judgement.
pub fn judge_snapshot<R: VotingRuleResolver + ?Sized>(
    plugins: &[RegisteredPlugin],
    hook: HookPoint,
    ctx: &OperationContext,
    resolver: &R,
    cfg: &EffectiveConfig,
    cancel: Option<&CancellationToken>,
) -> Result<JudgementResult, JudgeError> {
    let evaluator = Evaluator::new(cfg.max_depth);
    let votes = MemoizingResolver::new(resolver);
    let mut verdicts = Vec::with_capacity(plugins.len());
    let mut leader: Option<&RegisteredPlugin> = None;

    for plugin in plugins {
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            warn!(%hook, evaluated = verdicts.len(), "judgement cancelled");
            return Err(JudgeError::Cancelled);
        }

        let fired = evaluator
            .evaluate_for(
                &plugin.plugin.condition,
                ctx,
                &votes,
                plugin.plugin.voting_rule,
            )
            .inspect_err(|err| {
                warn!(%hook, plugin = %plugin.id, error = %err, "judgement aborted");
            })?;

        debug!(%hook, plugin = %plugin.id, level = plugin.level(), fired, "plugin evaluated");
        verdicts.push(PluginVerdict {
            plugin: plugin.id,
            level: plugin.level(),
            return_type: plugin.return_type(),
            fired,
        });

        if !fired {
            continue;
        }

        if plugin.return_type() == ReturnType::Reject {
            info!(%hook, plugin = %plugin.id, "operation rejected by plugin");
            return Ok(JudgementResult {
                final_decision: ReturnType::Reject.decision(),
                triggering_plugin: Some(plugin.id),
                verdicts,
                voting_results: votes.into_results(),
            });
        }

        if leader.is_none_or(|current| plugin.level() > current.level()) {
            leader = Some(plugin);
        }
    }

    let result = match leader {
        Some(winner) => JudgementResult {
            final_decision: winner.return_type().decision(),
            triggering_plugin: Some(winner.id),
            verdicts,
            voting_results: votes.into_results(),
        },
        None => JudgementResult {
            final_decision: cfg.default_decision(hook),
            triggering_plugin: None,
            verdicts,
            voting_results: votes.into_results(),
        },
    };

    info!(
        %hook,
        decision = %result.final_decision,
        triggering_plugin = ?result.triggering_plugin,
        "judgement complete"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{ConditionNode, Operand};
    use crate::resolver::VoteSnapshot;
    use crate::test_support::{before_op, caller_is, ctx, registered};
    use darc_types::{FinalDecision, PluginId, VoteOutcome, VotingRuleId};
    use std::cell::Cell;

    fn run(plugins: &[RegisteredPlugin], caller: u64) -> Result<JudgementResult, JudgeError> {
        judge_snapshot(
            plugins,
            HookPoint::BeforeOperation,
            &ctx(caller, &[]),
            &VoteSnapshot::new(),
            &EffectiveConfig::default(),
            None,
        )
    }

    #[test]
    fn reject_beats_higher_level_approval() {
        let plugins = registered(vec![
            before_op(caller_is(1), ReturnType::Approve, 10),
            before_op(caller_is(1), ReturnType::Reject, 1),
        ]);
        let result = run(&plugins, 1).unwrap();
        assert_eq!(result.final_decision, FinalDecision::Rejected);
        assert_eq!(result.triggering_plugin, Some(PluginId(2)));
    }

    #[test]
    fn reject_short_circuits_remaining_plugins() {
        let plugins = registered(vec![
            before_op(caller_is(1), ReturnType::Reject, 0),
            before_op(
                ConditionNode::leaf("never-evaluated", Operand::None),
                ReturnType::Approve,
                0,
            ),
        ]);
        let result = run(&plugins, 1).unwrap();
        assert_eq!(result.final_decision, FinalDecision::Rejected);
        assert_eq!(result.verdicts.len(), 1);
    }

    #[test]
    fn highest_level_approval_wins() {
        let plugins = registered(vec![
            before_op(caller_is(1), ReturnType::Approve, 3),
            before_op(caller_is(1), ReturnType::ApproveSkipIsolation, 7),
            before_op(caller_is(2), ReturnType::Approve, 100),
        ]);
        let result = run(&plugins, 1).unwrap();
        assert_eq!(result.final_decision, FinalDecision::ApprovedSkipIsolation);
        assert!(result.skips_isolation());
        assert_eq!(result.triggering_plugin, Some(PluginId(2)));
        assert_eq!(result.fired().count(), 2);
        assert_eq!(result.verdicts.len(), 3);
    }

    #[test]
    fn equal_levels_go_to_the_earliest_registration() {
        let plugins = registered(vec![
            before_op(caller_is(1), ReturnType::Approve, 5),
            before_op(caller_is(1), ReturnType::ApproveSkipIsolation, 5),
        ]);
        let result = run(&plugins, 1).unwrap();
        assert_eq!(result.triggering_plugin, Some(PluginId(1)));
        assert_eq!(result.final_decision, FinalDecision::Approved);
    }

    #[test]
    fn nothing_fires_uses_hook_default() {
        let plugins = registered(vec![before_op(caller_is(1), ReturnType::Approve, 0)]);
        let result = run(&plugins, 2).unwrap();
        assert_eq!(result.final_decision, FinalDecision::Rejected);
        assert_eq!(result.triggering_plugin, None);

        let mut cfg = EffectiveConfig::default();
        cfg.hook_defaults
            .insert(HookPoint::BeforeOperation, FinalDecision::Approved);
        let result = judge_snapshot(
            &plugins,
            HookPoint::BeforeOperation,
            &ctx(2, &[]),
            &VoteSnapshot::new(),
            &cfg,
            None,
        )
        .unwrap();
        assert_eq!(result.final_decision, FinalDecision::Approved);
        assert_eq!(result.triggering_plugin, None);
    }

    #[test]
    fn evaluation_error_aborts_instead_of_reading_false() {
        let plugins = registered(vec![
            before_op(
                ConditionNode::negate(ConditionNode::leaf("caller-is-whale", Operand::None)),
                ReturnType::Reject,
                0,
            ),
            before_op(caller_is(1), ReturnType::Approve, 0),
        ]);
        let result = run(&plugins, 1);
        assert!(matches!(result, Err(JudgeError::InvalidPredicate { .. })));
        assert_eq!(crate::report::fail_closed(&result), FinalDecision::Rejected);
    }

    #[test]
    fn cancelled_token_stops_judgement() {
        let plugins = registered(vec![before_op(caller_is(1), ReturnType::Approve, 0)]);
        let token = CancellationToken::new();
        token.cancel();
        let result = judge_snapshot(
            &plugins,
            HookPoint::BeforeOperation,
            &ctx(1, &[]),
            &VoteSnapshot::new(),
            &EffectiveConfig::default(),
            Some(&token),
        );
        assert_eq!(result, Err(JudgeError::Cancelled));
    }

    #[test]
    fn one_vote_resolution_per_rule_per_judgement() {
        struct FlipAfterFirst(Cell<u32>);
        impl VotingRuleResolver for FlipAfterFirst {
            fn resolve(&self, _rule: VotingRuleId) -> VoteOutcome {
                let n = self.0.get();
                self.0.set(n + 1);
                if n == 0 {
                    VoteOutcome::Passed
                } else {
                    VoteOutcome::Failed
                }
            }
        }

        let vote = ConditionNode::vote_passed(None);
        let plugins = registered(vec![
            before_op(vote.clone(), ReturnType::Approve, 1).with_voting_rule(VotingRuleId(9)),
            before_op(
                ConditionNode::and(vec![vote.clone(), vote]).unwrap(),
                ReturnType::Approve,
                2,
            )
            .with_voting_rule(VotingRuleId(9)),
        ]);

        let resolver = FlipAfterFirst(Cell::new(0));
        let result = judge_snapshot(
            &plugins,
            HookPoint::BeforeOperation,
            &ctx(1, &[]),
            &resolver,
            &EffectiveConfig::default(),
            None,
        )
        .unwrap();

        assert_eq!(resolver.0.get(), 1);
        assert!(result.verdicts.iter().all(|v| v.fired));
        assert_eq!(result.triggering_plugin, Some(PluginId(2)));
        assert_eq!(
            result.voting_results.get(&VotingRuleId(9)),
            Some(&VoteOutcome::Passed)
        );
    }
}
