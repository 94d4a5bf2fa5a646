//! Embeddable DARC plugin judgement.
//!
//! ```
//! use darc::{ConditionNode, EffectiveConfig, OperationContext, Organization, Plugin, VoteSnapshot};
//! use darc::types::{Address, FinalDecision, HookPoint, ReturnType};
//!
//! let operator = Address::parse("0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC")?;
//! let org = Organization::initialize(EffectiveConfig::default());
//! org.register(Plugin::new(
//!     HookPoint::BeforeOperation,
//!     ConditionNode::caller_equals(operator.clone()),
//!     ReturnType::Approve,
//! ))?;
//!
//! let ctx = OperationContext::new(operator, Vec::new());
//! let result = org.judge(HookPoint::BeforeOperation, &ctx, &VoteSnapshot::new())?;
//! assert_eq!(result.final_decision, FinalDecision::Approved);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

pub use darc_domain::*;
pub use darc_types as types;
