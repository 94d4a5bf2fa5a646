//! The `judge` use case: load plugins, judge one operation, produce a receipt.

use anyhow::Context;
use darc_domain::fingerprint::snapshot_fingerprint;
use darc_domain::{OperationContext, Organization, TimeoutResolver, VoteSnapshot, judge_snapshot};
use darc_settings::{DarcConfigV1, Overrides, ResolvedConfig};
use darc_types::{
    FinalDecision, HookPoint, JudgementReceipt, OperationRecord, SCHEMA_JUDGEMENT_V1, ToolMeta,
    VoteOutcome, VotingRuleId,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{debug, info};

/// Input for the judge use case.
#[derive(Clone, Debug)]
pub struct JudgeInput<'a> {
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// Operation context JSON: `{"caller": "0x..", "targets": ["0x.."]}`.
    pub context_json: &'a str,
    /// Voting rule outcomes JSON: `{"0": "passed"}`. Unlisted rules read as pending.
    pub votes_json: Option<&'a str>,
    pub hook: HookPoint,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the judge use case.
#[derive(Clone, Debug)]
pub struct JudgeOutput {
    pub receipt: JudgementReceipt,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the judge use case: parse config, register plugins, judge the operation.
pub fn run_judge(input: JudgeInput<'_>) -> anyhow::Result<JudgeOutput> {
    let started_at = OffsetDateTime::now_utc();

    let resolved = load_config(input.config_text, input.overrides.clone())?;
    let org = Organization::initialize(resolved.effective.clone());
    for (i, plugin) in resolved.plugins.iter().cloned().enumerate() {
        org.register(plugin)
            .with_context(|| format!("register plugin #{}", i + 1))?;
    }

    let ctx: OperationContext =
        serde_json::from_str(input.context_json).context("parse operation context")?;
    let votes = match input.votes_json {
        Some(text) => parse_votes(text)?,
        None => VoteSnapshot::new(),
    };
    debug!(votes = votes.len(), hook = %input.hook, "judging operation");

    let snapshot = org.list(input.hook);
    let fingerprint = snapshot_fingerprint(&snapshot).context("fingerprint plugin snapshot")?;

    let resolver = TimeoutResolver::new(Arc::new(votes), resolved.effective.resolver_timeout)
        .context("start voting rule resolver")?;
    let result = judge_snapshot(&snapshot, input.hook, &ctx, &resolver, org.config(), None)
        .with_context(|| format!("judge {} operation", input.hook))?;

    info!(
        hook = %input.hook,
        decision = %result.final_decision,
        plugins = snapshot.len(),
        "judgement receipt ready"
    );

    let receipt = JudgementReceipt {
        schema: SCHEMA_JUDGEMENT_V1.to_string(),
        tool: tool_meta(),
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        hook: input.hook,
        operation: OperationRecord {
            caller: Some(ctx.caller),
            targets: ctx.targets,
        },
        decision: result.final_decision,
        skip_isolation: result.skips_isolation(),
        triggering_plugin: result.triggering_plugin,
        verdicts: result.verdicts,
        voting_results: result.voting_results,
        fingerprint: Some(fingerprint),
        error: None,
    };

    Ok(JudgeOutput {
        receipt,
        resolved_config: resolved,
    })
}

/// A fail-closed receipt for a judgement that could not complete.
pub fn runtime_error_receipt(hook: HookPoint, message: &str) -> JudgementReceipt {
    let now = OffsetDateTime::now_utc();
    JudgementReceipt {
        schema: SCHEMA_JUDGEMENT_V1.to_string(),
        tool: tool_meta(),
        started_at: now,
        finished_at: now,
        hook,
        operation: OperationRecord::default(),
        decision: FinalDecision::Rejected,
        skip_isolation: false,
        triggering_plugin: None,
        verdicts: Vec::new(),
        voting_results: BTreeMap::new(),
        fingerprint: None,
        error: Some(message.to_string()),
    }
}

/// Map decision to exit code: 0 = approved (either flavor), 2 = rejected.
pub fn decision_exit_code(decision: FinalDecision) -> i32 {
    if decision.is_approved() { 0 } else { 2 }
}

pub(crate) fn load_config(config_text: &str, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    // Empty is allowed, defaults apply.
    let cfg = if config_text.trim().is_empty() {
        DarcConfigV1::default()
    } else {
        darc_settings::parse_config_toml(config_text).context("parse config")?
    };
    darc_settings::resolve_config(cfg, overrides).context("resolve config")
}

fn parse_votes(text: &str) -> anyhow::Result<VoteSnapshot> {
    let map: BTreeMap<VotingRuleId, VoteOutcome> =
        serde_json::from_str(text).context("parse voting results")?;
    Ok(VoteSnapshot::from(map))
}

fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: "darc".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use darc_types::PluginId;

    const TARGET1: &str = "0x3c44cdddb6a900fa2b585dd299e03d12fa4293bc";
    const TARGET2: &str = "0x90f79bf6eb2c4f870365e785982e1f101e93b906";

    const CONFIG: &str = r#"
[[plugins]]
hook = "before-operation"
return_type = "reject"
level = 1

[plugins.condition]
predicate = "caller-equals-address"
address = "0x0000000000000000000000000000000000000bad"

[[plugins]]
hook = "before-operation"
return_type = "approve"
level = 2

[plugins.condition]
and = [
  { predicate = "target-in-set", addresses = ["0x3c44cdddb6a900fa2b585dd299e03d12fa4293bc"] },
  { predicate = "vote-passed", voting_rule = 5 },
]
"#;

    fn judge(context_json: &str, votes_json: Option<&str>) -> anyhow::Result<JudgeOutput> {
        run_judge(JudgeInput {
            config_text: CONFIG,
            context_json,
            votes_json,
            hook: HookPoint::BeforeOperation,
            overrides: Overrides::default(),
        })
    }

    #[test]
    fn empty_config_rejects_by_default() {
        let output = run_judge(JudgeInput {
            config_text: "",
            context_json: &format!(r#"{{"caller": "{TARGET1}"}}"#),
            votes_json: None,
            hook: HookPoint::AfterOperation,
            overrides: Overrides::default(),
        })
        .expect("run_judge");
        assert_eq!(output.resolved_config.effective.profile, "strict");
        assert_eq!(output.receipt.decision, FinalDecision::Rejected);
        assert_eq!(output.receipt.triggering_plugin, None);
        assert!(output.receipt.verdicts.is_empty());
        assert!(output.receipt.fingerprint.is_some());
    }

    #[test]
    fn approval_needs_the_vote() {
        let ctx = format!(r#"{{"caller": "{TARGET2}", "targets": ["{TARGET1}"]}}"#);

        let pending = judge(&ctx, None).expect("judge");
        assert_eq!(pending.receipt.decision, FinalDecision::Rejected);
        assert_eq!(
            pending.receipt.voting_results.get(&VotingRuleId(5)),
            Some(&VoteOutcome::Pending)
        );

        let passed = judge(&ctx, Some(r#"{"5": "passed"}"#)).expect("judge");
        assert_eq!(passed.receipt.decision, FinalDecision::Approved);
        assert_eq!(passed.receipt.triggering_plugin, Some(PluginId(2)));
        assert_eq!(passed.receipt.operation.targets.len(), 1);
        assert_eq!(passed.receipt.verdicts.len(), 2);
    }

    #[test]
    fn reject_plugin_wins() {
        let ctx = format!(
            r#"{{"caller": "0x0000000000000000000000000000000000000BAD", "targets": ["{TARGET1}"]}}"#
        );
        let output = judge(&ctx, Some(r#"{"5": "passed"}"#)).expect("judge");
        assert_eq!(output.receipt.decision, FinalDecision::Rejected);
        assert_eq!(output.receipt.triggering_plugin, Some(PluginId(1)));
        assert_eq!(output.receipt.verdicts.len(), 1);
    }

    #[test]
    fn fingerprint_matches_the_judged_snapshot() {
        let ctx = format!(r#"{{"caller": "{TARGET2}", "targets": ["{TARGET1}"]}}"#);
        let output = judge(&ctx, None).expect("judge");

        let listing = crate::run_list(
            CONFIG,
            Overrides::default(),
            Some(HookPoint::BeforeOperation),
        )
        .expect("run_list");
        let expected = snapshot_fingerprint(&listing[0].1).expect("fingerprint");
        assert_eq!(output.receipt.fingerprint.as_deref(), Some(expected.as_str()));
        assert_eq!(output.receipt.verdicts.len(), listing[0].1.len());
    }

    #[test]
    fn bad_inputs_are_errors() {
        assert!(judge("not json", None).is_err());
        assert!(judge(r#"{"caller": "0x12"}"#, None).is_err());
        assert!(judge(&format!(r#"{{"caller": "{TARGET1}"}}"#), Some(r#"{"5": "maybe"}"#)).is_err());
    }

    #[test]
    fn invalid_plugin_fails_registration() {
        let err = run_judge(JudgeInput {
            config_text: r#"
[[plugins]]
hook = "before-operation"
return_type = "approve"

[plugins.condition]
predicate = "caller-is-whale"
"#,
            context_json: &format!(r#"{{"caller": "{TARGET1}"}}"#),
            votes_json: None,
            hook: HookPoint::BeforeOperation,
            overrides: Overrides::default(),
        })
        .unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("register plugin #1"), "{msg}");
        assert!(msg.contains("caller-is-whale"), "{msg}");
    }

    #[test]
    fn runtime_error_receipt_is_fail_closed() {
        let receipt = runtime_error_receipt(HookPoint::BeforeOperation, "boom");
        assert_eq!(receipt.decision, FinalDecision::Rejected);
        assert!(!receipt.skip_isolation);
        assert_eq!(receipt.error.as_deref(), Some("boom"));
    }

    #[test]
    fn decision_exit_codes() {
        assert_eq!(decision_exit_code(FinalDecision::Approved), 0);
        assert_eq!(decision_exit_code(FinalDecision::ApprovedSkipIsolation), 0);
        assert_eq!(decision_exit_code(FinalDecision::Rejected), 2);
    }
}
