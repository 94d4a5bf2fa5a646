//! Explain registry for predicate tags and plugin return types.
//!
//! Maps identifiers to human-readable explanations with configuration guidance.

use crate::ids;

/// Explanation entry for a predicate or return type.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the identifier.
    pub title: &'static str,
    /// What it means during judgement.
    pub description: &'static str,
    /// How to use it correctly.
    pub guidance: &'static str,
    /// Example `darc.toml` fragments.
    pub examples: ExamplePair,
}

/// A correct and an incorrect configuration fragment.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Fragment rejected at registration.
    pub invalid: &'static str,
    /// Fragment accepted at registration.
    pub valid: &'static str,
}

/// Look up an explanation by predicate tag or return type name.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        ids::PREDICATE_CALLER_EQUALS_ADDRESS => Some(explain_caller_equals_address()),
        ids::PREDICATE_TARGET_IN_SET => Some(explain_target_in_set()),
        ids::PREDICATE_VOTE_PASSED => Some(explain_vote_passed()),

        ids::RETURN_APPROVE => Some(explain_approve()),
        ids::RETURN_APPROVE_SKIP_ISOLATION => Some(explain_approve_skip_isolation()),
        ids::RETURN_REJECT => Some(explain_reject()),

        _ => None,
    }
}

/// List all known predicate tags.
pub fn all_predicates() -> &'static [&'static str] {
    ids::all_predicates()
}

/// List all known return types.
pub fn all_return_types() -> &'static [&'static str] {
    &[
        ids::RETURN_APPROVE,
        ids::RETURN_APPROVE_SKIP_ISOLATION,
        ids::RETURN_REJECT,
    ]
}

fn explain_caller_equals_address() -> Explanation {
    Explanation {
        title: "Caller equals address",
        description: "True when the address initiating the operation equals the configured \
address. Addresses are compared case-insensitively after normalization to lowercase hex.",
        guidance: "Set `address` to a 0x-prefixed, 40 hex digit account address. Combine several \
leaves under `or` to allow any one of a set of operators.",
        examples: ExamplePair {
            invalid: r#"[plugins.condition]
predicate = "caller-equals-address"
addresses = ["0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC"]"#,
            valid: r#"[plugins.condition]
predicate = "caller-equals-address"
address = "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC""#,
        },
    }
}

fn explain_target_in_set() -> Explanation {
    Explanation {
        title: "Target in set",
        description: "True when any address the operation affects is a member of the configured \
address set.",
        guidance: "Set `addresses` to a non-empty list of account addresses. Order does not \
matter and duplicates are ignored.",
        examples: ExamplePair {
            invalid: r#"[plugins.condition]
predicate = "target-in-set"
addresses = []"#,
            valid: r#"[plugins.condition]
predicate = "target-in-set"
addresses = ["0x90F79bf6EB2c4f870365E785982E1f101E93b906"]"#,
        },
    }
}

fn explain_vote_passed() -> Explanation {
    Explanation {
        title: "Vote passed",
        description: "True when the referenced voting rule has resolved to `passed`. Pending and \
failed votes evaluate to false. Each rule is resolved at most once per judgement, so every leaf \
sees the same outcome.",
        guidance: "Name the rule with `voting_rule` on the leaf, or set `voting_rule` on the plugin \
and leave the leaf operand empty. A leaf with neither is rejected at registration.",
        examples: ExamplePair {
            invalid: r#"[[plugins]]
return_type = "approve"
[plugins.condition]
predicate = "vote-passed""#,
            valid: r#"[[plugins]]
return_type = "approve"
voting_rule = 0
[plugins.condition]
predicate = "vote-passed""#,
        },
    }
}

fn explain_approve() -> Explanation {
    Explanation {
        title: "Approve",
        description: "When the condition holds the plugin votes to approve the operation with \
isolation of its side effects kept in force. Among firing approvals the highest level wins; \
ties go to the earliest registered plugin.",
        guidance: "Use `approve` for routine grants. Raise `level` when this plugin should \
outrank other approving plugins.",
        examples: ExamplePair {
            invalid: r#"return_type = "yes""#,
            valid: r#"return_type = "approve""#,
        },
    }
}

fn explain_approve_skip_isolation() -> Explanation {
    Explanation {
        title: "Approve and skip isolation",
        description: "When the condition holds and this plugin wins, the operation is approved \
and executed without isolation of its side effects.",
        guidance: "Reserve for trusted operators. Give the plugin a level above any plain \
`approve` plugin that may fire for the same operation, otherwise isolation stays in force.",
        examples: ExamplePair {
            invalid: r#"return_type = "approve_skip_isolation""#,
            valid: r#"return_type = "approve-skip-isolation""#,
        },
    }
}

fn explain_reject() -> Explanation {
    Explanation {
        title: "Reject",
        description: "When the condition holds the operation is rejected, regardless of any other \
plugin's level. Evaluation stops at the first firing rejection.",
        guidance: "Use for hard deny rules. Level has no effect on a firing rejection.",
        examples: ExamplePair {
            invalid: r#"return_type = "deny""#,
            valid: r#"return_type = "reject""#,
        },
    }
}
