use crate::ids;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned by the plugin registry at registration time. Never reused.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct PluginId(pub u64);

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "plugin#{}", self.0)
    }
}

/// Reference to an externally owned voting rule instance.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct VotingRuleId(pub u64);

impl fmt::Display for VotingRuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "voting-rule#{}", self.0)
    }
}

/// Named stage of operation execution at which plugins are judged.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum HookPoint {
    BeforeOperation,
    AfterOperation,
}

impl HookPoint {
    pub const ALL: [HookPoint; 2] = [HookPoint::BeforeOperation, HookPoint::AfterOperation];

    pub fn as_str(self) -> &'static str {
        match self {
            HookPoint::BeforeOperation => ids::HOOK_BEFORE_OPERATION,
            HookPoint::AfterOperation => ids::HOOK_AFTER_OPERATION,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            ids::HOOK_BEFORE_OPERATION => Some(HookPoint::BeforeOperation),
            ids::HOOK_AFTER_OPERATION => Some(HookPoint::AfterOperation),
            _ => None,
        }
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decision a plugin yields when its condition holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ReturnType {
    Approve,
    ApproveSkipIsolation,
    Reject,
}

impl ReturnType {
    pub fn as_str(self) -> &'static str {
        match self {
            ReturnType::Approve => ids::RETURN_APPROVE,
            ReturnType::ApproveSkipIsolation => ids::RETURN_APPROVE_SKIP_ISOLATION,
            ReturnType::Reject => ids::RETURN_REJECT,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            ids::RETURN_APPROVE => Some(ReturnType::Approve),
            ids::RETURN_APPROVE_SKIP_ISOLATION => Some(ReturnType::ApproveSkipIsolation),
            ids::RETURN_REJECT => Some(ReturnType::Reject),
            _ => None,
        }
    }

    /// The final decision this return type produces when its plugin wins.
    pub fn decision(self) -> FinalDecision {
        match self {
            ReturnType::Approve => FinalDecision::Approved,
            ReturnType::ApproveSkipIsolation => FinalDecision::ApprovedSkipIsolation,
            ReturnType::Reject => FinalDecision::Rejected,
        }
    }
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict handed to the operation dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum FinalDecision {
    Approved,
    ApprovedSkipIsolation,
    Rejected,
}

impl FinalDecision {
    pub fn as_str(self) -> &'static str {
        match self {
            FinalDecision::Approved => ids::DECISION_APPROVED,
            FinalDecision::ApprovedSkipIsolation => ids::DECISION_APPROVED_SKIP_ISOLATION,
            FinalDecision::Rejected => ids::DECISION_REJECTED,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            ids::DECISION_APPROVED => Some(FinalDecision::Approved),
            ids::DECISION_APPROVED_SKIP_ISOLATION => Some(FinalDecision::ApprovedSkipIsolation),
            ids::DECISION_REJECTED => Some(FinalDecision::Rejected),
            _ => None,
        }
    }

    pub fn is_approved(self) -> bool {
        !matches!(self, FinalDecision::Rejected)
    }

    /// Isolation of the operation's side effects stays in force unless this is true.
    pub fn skips_isolation(self) -> bool {
        matches!(self, FinalDecision::ApprovedSkipIsolation)
    }
}

impl fmt::Display for FinalDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved state of a voting rule instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum VoteOutcome {
    Passed,
    Failed,
    Pending,
}

impl VoteOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            VoteOutcome::Passed => ids::VOTE_PASSED,
            VoteOutcome::Failed => ids::VOTE_FAILED,
            VoteOutcome::Pending => ids::VOTE_PENDING,
        }
    }
}

impl fmt::Display for VoteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
