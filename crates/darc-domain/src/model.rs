use crate::condition::ConditionNode;
use crate::error::JudgeError;
use darc_types::{Address, HookPoint, PluginId, ReturnType, VotingRuleId};
use serde::{Deserialize, Serialize};

/// An authorization rule as submitted by an organization administrator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plugin {
    pub hook: HookPoint,
    pub condition: ConditionNode,
    pub return_type: ReturnType,
    /// Advisory tier: breaks ties among firing approvals, never reorders evaluation.
    pub level: u64,
    /// Voting rule consulted by vote leaves that do not name their own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voting_rule: Option<VotingRuleId>,
    /// Free text for operators; has no effect on judgement.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

impl Plugin {
    pub fn new(hook: HookPoint, condition: ConditionNode, return_type: ReturnType) -> Self {
        Self {
            hook,
            condition,
            return_type,
            level: 0,
            voting_rule: None,
            notes: String::new(),
        }
    }

    pub fn with_level(mut self, level: u64) -> Self {
        self.level = level;
        self
    }

    pub fn with_voting_rule(mut self, rule: VotingRuleId) -> Self {
        self.voting_rule = Some(rule);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn validate(&self, max_depth: usize) -> Result<(), JudgeError> {
        self.condition.validate(max_depth, self.voting_rule)
    }
}

/// A plugin accepted by the registry. Immutable from here on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredPlugin {
    pub id: PluginId,
    #[serde(flatten)]
    pub plugin: Plugin,
}

impl RegisteredPlugin {
    pub fn level(&self) -> u64 {
        self.plugin.level
    }

    pub fn return_type(&self) -> ReturnType {
        self.plugin.return_type
    }
}

/// The pending operation every plugin is judged against.
///
/// Vote outcomes are deliberately absent: they are fetched from the resolver during each
/// judgement so they are never stale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationContext {
    pub caller: Address,
    #[serde(default)]
    pub targets: Vec<Address>,
}

impl OperationContext {
    pub fn new(caller: Address, targets: Vec<Address>) -> Self {
        Self { caller, targets }
    }
}
