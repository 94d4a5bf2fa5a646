//! Pure plugin judgement (no file or network IO).
//!
//! Input: plugins registered with an [`Organization`], an operation context, and a voting rule
//! resolver supplied by the caller.
//! Output: one final decision per operation, plus the per-plugin verdicts that produced it.

#![forbid(unsafe_code)]

pub mod condition;
pub mod error;
pub mod evaluator;
pub mod fingerprint;
pub mod model;
pub mod policy;
pub mod registry;
pub mod report;
pub mod resolver;

mod engine;
mod organization;

pub use condition::{ConditionNode, Leaf, Operand};
pub use engine::{CancellationToken, judge_snapshot};
pub use error::JudgeError;
pub use evaluator::{Evaluator, evaluate};
pub use model::{OperationContext, Plugin, RegisteredPlugin};
pub use organization::Organization;
pub use policy::EffectiveConfig;
pub use registry::{PluginRegistry, PluginSnapshot};
pub use report::{JudgementResult, fail_closed};
pub use resolver::{
    MemoizingResolver, ResolveError, TimeoutResolver, VoteSnapshot, VotingRuleResolver,
};

#[cfg(test)]
mod properties;
#[cfg(test)]
mod test_support;
