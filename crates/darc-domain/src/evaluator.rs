//! Condition tree evaluation.
//!
//! Evaluation is pure apart from resolver queries. `and` / `or` short-circuit left to right, so
//! a vote leaf after a deciding sibling is never queried.

use crate::condition::{ConditionNode, Leaf, Operand};
use crate::error::JudgeError;
use crate::model::OperationContext;
use crate::policy::DEFAULT_MAX_DEPTH;
use crate::resolver::VotingRuleResolver;
use darc_types::{VoteOutcome, VotingRuleId, ids};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Evaluator {
    max_depth: usize,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl Evaluator {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn evaluate<R: VotingRuleResolver + ?Sized>(
        &self,
        node: &ConditionNode,
        ctx: &OperationContext,
        resolver: &R,
    ) -> Result<bool, JudgeError> {
        self.evaluate_for(node, ctx, resolver, None)
    }

    /// Evaluate a plugin's condition; `default_rule` serves vote leaves without their own rule.
    pub fn evaluate_for<R: VotingRuleResolver + ?Sized>(
        &self,
        node: &ConditionNode,
        ctx: &OperationContext,
        resolver: &R,
        default_rule: Option<VotingRuleId>,
    ) -> Result<bool, JudgeError> {
        let env = Env {
            ctx,
            resolver,
            default_rule,
            max_depth: self.max_depth,
        };
        env.eval(node, 1)
    }
}

/// Evaluate with the default depth limit and no plugin voting rule.
pub fn evaluate<R: VotingRuleResolver + ?Sized>(
    node: &ConditionNode,
    ctx: &OperationContext,
    resolver: &R,
) -> Result<bool, JudgeError> {
    Evaluator::default().evaluate(node, ctx, resolver)
}

struct Env<'a, R: ?Sized> {
    ctx: &'a OperationContext,
    resolver: &'a R,
    default_rule: Option<VotingRuleId>,
    max_depth: usize,
}

impl<R: VotingRuleResolver + ?Sized> Env<'_, R> {
    fn eval(&self, node: &ConditionNode, depth: usize) -> Result<bool, JudgeError> {
        if depth > self.max_depth {
            return Err(JudgeError::TreeTooDeep {
                max_depth: self.max_depth,
            });
        }

        match node {
            ConditionNode::Leaf(leaf) => self.eval_leaf(leaf),
            ConditionNode::And { children } => {
                require_children("and", children)?;
                for child in children {
                    if !self.eval(child, depth + 1)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            ConditionNode::Or { children } => {
                require_children("or", children)?;
                for child in children {
                    if self.eval(child, depth + 1)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            ConditionNode::Not { child } => Ok(!self.eval(child, depth + 1)?),
        }
    }

    fn eval_leaf(&self, leaf: &Leaf) -> Result<bool, JudgeError> {
        match (leaf.predicate.as_str(), &leaf.operand) {
            (ids::PREDICATE_CALLER_EQUALS_ADDRESS, Operand::Address(address)) => {
                Ok(self.ctx.caller == *address)
            }
            (ids::PREDICATE_TARGET_IN_SET, Operand::AddressSet(set)) => {
                Ok(self.ctx.targets.iter().any(|t| set.contains(t)))
            }
            (ids::PREDICATE_VOTE_PASSED, Operand::VotingRule(rule)) => Ok(self.vote_passed(*rule)),
            (ids::PREDICATE_VOTE_PASSED, Operand::None) => match self.default_rule {
                Some(rule) => Ok(self.vote_passed(rule)),
                None => Err(JudgeError::InvalidCondition(
                    "vote-passed leaf has no voting rule and its plugin has none".to_string(),
                )),
            },
            (tag, operand) if ids::is_known_predicate(tag) => Err(JudgeError::InvalidPredicate {
                predicate: tag.to_string(),
                reason: format!("unsupported operand {}", operand.kind()),
            }),
            (tag, _) => Err(JudgeError::InvalidPredicate {
                predicate: tag.to_string(),
                reason: "unknown predicate tag".to_string(),
            }),
        }
    }

    fn vote_passed(&self, rule: VotingRuleId) -> bool {
        self.resolver.resolve(rule) == VoteOutcome::Passed
    }
}

fn require_children(op: &str, children: &[ConditionNode]) -> Result<(), JudgeError> {
    if children.len() < 2 {
        return Err(JudgeError::InvalidCondition(format!(
            "`{op}` needs at least two children, got {}",
            children.len()
        )));
    }
    Ok(())
}
