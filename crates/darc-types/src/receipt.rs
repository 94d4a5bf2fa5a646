use crate::{Address, FinalDecision, HookPoint, PluginId, ReturnType, VoteOutcome, VotingRuleId};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Stable schema identifier for judgement receipts.
pub const SCHEMA_JUDGEMENT_V1: &str = "darc.judgement.v1";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// The operation a judgement was made for.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OperationRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller: Option<Address>,
    #[serde(default)]
    pub targets: Vec<Address>,
}

/// What one plugin contributed to a judgement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PluginVerdict {
    pub plugin: PluginId,
    pub level: u64,
    pub return_type: ReturnType,
    pub fired: bool,
}

/// Receipt written for every judgement, including failed ones.
///
/// A receipt with `error` set always carries `decision = rejected`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JudgementReceipt {
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub hook: HookPoint,
    pub operation: OperationRecord,
    pub decision: FinalDecision,
    pub skip_isolation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triggering_plugin: Option<PluginId>,
    #[serde(default)]
    pub verdicts: Vec<PluginVerdict>,
    #[serde(default)]
    pub voting_results: BTreeMap<VotingRuleId, VoteOutcome>,
    /// SHA-256 over the canonical JSON of the plugin snapshot that was judged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
