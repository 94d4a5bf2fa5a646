//! Stable DTOs and IDs used across the DARC judgement workspace.
//!
//! This crate is intentionally boring:
//! - account addresses and identifier newtypes
//! - decision, vote, and hook point enums
//! - stable string IDs for predicate tags and schemas
//! - the judgement receipt emitted by the CLI
//! - explain registry for predicates and return types

#![forbid(unsafe_code)]

pub mod address;
pub mod decision;
pub mod explain;
pub mod ids;
pub mod receipt;

pub use address::{Address, AddressError};
pub use decision::{FinalDecision, HookPoint, PluginId, ReturnType, VoteOutcome, VotingRuleId};
pub use explain::{lookup_explanation, ExamplePair, Explanation};
pub use receipt::{
    JudgementReceipt, OperationRecord, PluginVerdict, ToolMeta, SCHEMA_JUDGEMENT_V1,
};
