use crate::error::JudgeError;
use darc_types::{FinalDecision, PluginId, PluginVerdict, VoteOutcome, VotingRuleId};
use std::collections::BTreeMap;

/// Outcome of judging one operation at one hook point. Never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JudgementResult {
    pub final_decision: FinalDecision,
    /// Plugin whose verdict decided; `None` when the hook point default applied.
    pub triggering_plugin: Option<PluginId>,
    /// Every plugin evaluated, in evaluation order.
    pub verdicts: Vec<PluginVerdict>,
    /// Vote outcomes observed during this judgement.
    pub voting_results: BTreeMap<VotingRuleId, VoteOutcome>,
}

impl JudgementResult {
    pub fn skips_isolation(&self) -> bool {
        self.final_decision.skips_isolation()
    }

    pub fn fired(&self) -> impl Iterator<Item = &PluginVerdict> {
        self.verdicts.iter().filter(|v| v.fired)
    }
}

/// Decision a dispatcher must act on: an engine error is a rejection.
pub fn fail_closed(result: &Result<JudgementResult, JudgeError>) -> FinalDecision {
    match result {
        Ok(r) => r.final_decision,
        Err(_) => FinalDecision::Rejected,
    }
}
