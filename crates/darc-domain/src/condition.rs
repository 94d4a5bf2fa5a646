//! Boolean condition trees attached to plugins.
//!
//! Nodes are owned values (children live in `Vec`/`Box`), so a tree is always finite and acyclic.
//! Structural checks that cannot be expressed in the type (child counts, operand shapes, depth)
//! run in [`ConditionNode::validate`] before a plugin is accepted by the registry.

use crate::error::JudgeError;
use darc_types::{Address, VotingRuleId, ids};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ConditionNode {
    Leaf(Leaf),
    And { children: Vec<ConditionNode> },
    Or { children: Vec<ConditionNode> },
    Not { child: Box<ConditionNode> },
}

/// A predicate tag plus the operand data it is evaluated with.
///
/// The tag is kept as a string so that conditions loaded from configuration can carry tags this
/// build does not know; those fail with `InvalidPredicate` instead of being dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaf {
    pub predicate: String,
    #[serde(default)]
    pub operand: Operand,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum Operand {
    #[default]
    None,
    Address(Address),
    AddressSet(BTreeSet<Address>),
    VotingRule(VotingRuleId),
}

impl ConditionNode {
    pub fn leaf(predicate: impl Into<String>, operand: Operand) -> Self {
        ConditionNode::Leaf(Leaf {
            predicate: predicate.into(),
            operand,
        })
    }

    pub fn caller_equals(address: Address) -> Self {
        Self::leaf(ids::PREDICATE_CALLER_EQUALS_ADDRESS, Operand::Address(address))
    }

    pub fn target_in_set<I: IntoIterator<Item = Address>>(addresses: I) -> Self {
        Self::leaf(
            ids::PREDICATE_TARGET_IN_SET,
            Operand::AddressSet(addresses.into_iter().collect()),
        )
    }

    /// A vote leaf. `None` defers to the owning plugin's voting rule.
    pub fn vote_passed(rule: Option<VotingRuleId>) -> Self {
        let operand = match rule {
            Some(rule) => Operand::VotingRule(rule),
            None => Operand::None,
        };
        Self::leaf(ids::PREDICATE_VOTE_PASSED, operand)
    }

    pub fn and(children: Vec<ConditionNode>) -> Result<Self, JudgeError> {
        check_arity("and", children.len())?;
        Ok(ConditionNode::And { children })
    }

    pub fn or(children: Vec<ConditionNode>) -> Result<Self, JudgeError> {
        check_arity("or", children.len())?;
        Ok(ConditionNode::Or { children })
    }

    pub fn negate(child: ConditionNode) -> Self {
        ConditionNode::Not {
            child: Box::new(child),
        }
    }

    /// Check the structural invariants of the whole tree.
    ///
    /// `default_rule` is the owning plugin's voting rule, used by vote leaves without one.
    /// The walk never descends more than `max_depth` levels, so an oversized tree is rejected
    /// without being fully traversed.
    pub fn validate(
        &self,
        max_depth: usize,
        default_rule: Option<VotingRuleId>,
    ) -> Result<(), JudgeError> {
        self.validate_at(1, max_depth, default_rule)
    }

    fn validate_at(
        &self,
        depth: usize,
        max_depth: usize,
        default_rule: Option<VotingRuleId>,
    ) -> Result<(), JudgeError> {
        if depth > max_depth {
            return Err(JudgeError::TreeTooDeep { max_depth });
        }
        match self {
            ConditionNode::Leaf(leaf) => leaf.validate(default_rule),
            ConditionNode::And { children } => {
                check_arity("and", children.len())?;
                children
                    .iter()
                    .try_for_each(|c| c.validate_at(depth + 1, max_depth, default_rule))
            }
            ConditionNode::Or { children } => {
                check_arity("or", children.len())?;
                children
                    .iter()
                    .try_for_each(|c| c.validate_at(depth + 1, max_depth, default_rule))
            }
            ConditionNode::Not { child } => child.validate_at(depth + 1, max_depth, default_rule),
        }
    }
}

// Children are detached onto a heap stack so arbitrarily deep trees drop without recursion.
impl Drop for ConditionNode {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_children(self, &mut pending);
        while let Some(mut node) = pending.pop() {
            detach_children(&mut node, &mut pending);
        }
    }
}

fn detach_children(node: &mut ConditionNode, out: &mut Vec<ConditionNode>) {
    match node {
        ConditionNode::Leaf(_) => {}
        ConditionNode::And { children } | ConditionNode::Or { children } => {
            out.append(children);
        }
        ConditionNode::Not { child } => {
            let empty = ConditionNode::Leaf(Leaf {
                predicate: String::new(),
                operand: Operand::None,
            });
            out.push(std::mem::replace(&mut **child, empty));
        }
    }
}

impl Leaf {
    pub fn validate(&self, default_rule: Option<VotingRuleId>) -> Result<(), JudgeError> {
        match (self.predicate.as_str(), &self.operand) {
            (ids::PREDICATE_CALLER_EQUALS_ADDRESS, Operand::Address(_)) => Ok(()),
            (ids::PREDICATE_TARGET_IN_SET, Operand::AddressSet(set)) if set.is_empty() => Err(
                JudgeError::invalid_predicate(&self.predicate, "address set must not be empty"),
            ),
            (ids::PREDICATE_TARGET_IN_SET, Operand::AddressSet(_)) => Ok(()),
            (ids::PREDICATE_VOTE_PASSED, Operand::VotingRule(_)) => Ok(()),
            (ids::PREDICATE_VOTE_PASSED, Operand::None) if default_rule.is_some() => Ok(()),
            (ids::PREDICATE_VOTE_PASSED, Operand::None) => Err(JudgeError::InvalidCondition(
                "vote-passed leaf has no voting rule and its plugin has none".to_string(),
            )),
            (tag, operand) if ids::is_known_predicate(tag) => Err(JudgeError::invalid_predicate(
                tag,
                format!("unsupported operand {}", operand.kind()),
            )),
            (tag, _) => Err(JudgeError::invalid_predicate(tag, "unknown predicate tag")),
        }
    }
}

impl Operand {
    pub fn kind(&self) -> &'static str {
        match self {
            Operand::None => "none",
            Operand::Address(_) => "address",
            Operand::AddressSet(_) => "address-set",
            Operand::VotingRule(_) => "voting-rule",
        }
    }
}

fn check_arity(op: &str, len: usize) -> Result<(), JudgeError> {
    if len < 2 {
        return Err(JudgeError::InvalidCondition(format!(
            "`{op}` needs at least two children, got {len}"
        )));
    }
    Ok(())
}
