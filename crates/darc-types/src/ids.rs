//! Stable identifiers for predicate tags, hook points, and decisions.
//!
//! All identifiers are kebab-case so they read the same in `darc.toml`, JSON receipts, and logs.

// Predicate tags
pub const PREDICATE_CALLER_EQUALS_ADDRESS: &str = "caller-equals-address";
pub const PREDICATE_TARGET_IN_SET: &str = "target-in-set";
pub const PREDICATE_VOTE_PASSED: &str = "vote-passed";

// Hook points
pub const HOOK_BEFORE_OPERATION: &str = "before-operation";
pub const HOOK_AFTER_OPERATION: &str = "after-operation";

// Plugin return types
pub const RETURN_APPROVE: &str = "approve";
pub const RETURN_APPROVE_SKIP_ISOLATION: &str = "approve-skip-isolation";
pub const RETURN_REJECT: &str = "reject";

// Final decisions
pub const DECISION_APPROVED: &str = "approved";
pub const DECISION_APPROVED_SKIP_ISOLATION: &str = "approved-skip-isolation";
pub const DECISION_REJECTED: &str = "rejected";

// Vote outcomes
pub const VOTE_PASSED: &str = "passed";
pub const VOTE_FAILED: &str = "failed";
pub const VOTE_PENDING: &str = "pending";

pub fn all_predicates() -> &'static [&'static str] {
    &[
        PREDICATE_CALLER_EQUALS_ADDRESS,
        PREDICATE_TARGET_IN_SET,
        PREDICATE_VOTE_PASSED,
    ]
}

pub fn is_known_predicate(tag: &str) -> bool {
    all_predicates().contains(&tag)
}
