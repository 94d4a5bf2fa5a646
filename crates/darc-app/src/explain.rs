//! The `explain` use case: what a predicate or return type contributes to a judgement.
//!
//! Predicates are described by the operand keys they read from `[plugins.condition]`; return
//! types by the decision they produce and where they stand in conflict resolution.

use darc_types::explain::{self, Explanation};
use darc_types::{FinalDecision, ReturnType};

/// A documented identifier, resolved to its role in the engine.
#[derive(Clone, Debug)]
pub struct Topic {
    pub identifier: &'static str,
    pub role: Role,
    pub explanation: Explanation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Condition leaf reading the given operand key.
    Predicate(OperandKey),
    /// Plugin outcome when its condition fires.
    ReturnType(ReturnType),
}

/// The `[plugins.condition]` key a predicate reads its operand from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OperandKey {
    pub key: &'static str,
    pub shape: &'static str,
    pub note: &'static str,
}

pub fn run_explain(identifier: &str) -> Option<Topic> {
    let explanation = explain::lookup_explanation(identifier)?;

    if let Some(&tag) = explain::all_predicates().iter().find(|p| **p == identifier) {
        return operand_key(tag).map(|key| Topic {
            identifier: tag,
            role: Role::Predicate(key),
            explanation,
        });
    }
    let rt = ReturnType::from_name(identifier)?;
    Some(Topic {
        identifier: rt.as_str(),
        role: Role::ReturnType(rt),
        explanation,
    })
}

fn operand_key(tag: &str) -> Option<OperandKey> {
    let key = match tag {
        darc_types::ids::PREDICATE_CALLER_EQUALS_ADDRESS => OperandKey {
            key: "address",
            shape: "\"0x\" + 40 hex digits",
            note: "compared with the operation's caller",
        },
        darc_types::ids::PREDICATE_TARGET_IN_SET => OperandKey {
            key: "addresses",
            shape: "non-empty list of addresses",
            note: "matches when any operation target is listed",
        },
        darc_types::ids::PREDICATE_VOTE_PASSED => OperandKey {
            key: "voting_rule",
            shape: "integer, optional",
            note: "falls back to the plugin's `voting_rule`",
        },
        _ => return None,
    };
    Some(key)
}

/// Where a firing plugin with this return type stands against the others.
fn precedence(rt: ReturnType) -> &'static str {
    match rt {
        ReturnType::Reject => {
            "decides as soon as it fires; later plugins are not evaluated and `level` is ignored"
        }
        ReturnType::Approve | ReturnType::ApproveSkipIsolation => {
            "loses to any firing reject; among firing approvals the highest `level` wins, \
             the earliest registered on ties"
        }
    }
}

fn isolation(decision: FinalDecision) -> &'static str {
    match decision {
        FinalDecision::Rejected => "not applicable, the operation does not run",
        FinalDecision::Approved => "kept in force",
        FinalDecision::ApprovedSkipIsolation => "bypassed",
    }
}

/// Format a topic for terminal display.
pub fn format_topic(topic: &Topic) -> String {
    let exp = &topic.explanation;
    let mut out = String::new();

    let kind = match topic.role {
        Role::Predicate(_) => "predicate",
        Role::ReturnType(_) => "return type",
    };
    out.push_str(&format!("{}  [{kind}]\n{}\n\n", topic.identifier, exp.title));
    out.push_str(exp.description);
    out.push_str("\n\n");

    match topic.role {
        Role::Predicate(op) => {
            out.push_str("Operand in [plugins.condition]:\n");
            out.push_str(&format!("  {:<12}{}\n", op.key, op.shape));
            out.push_str(&format!("  {:<12}{}\n", "", op.note));
        }
        Role::ReturnType(rt) => {
            let decision = rt.decision();
            out.push_str("When it wins the judgement:\n");
            out.push_str(&format!("  {:<12}{}\n", "decision", decision));
            out.push_str(&format!("  {:<12}{}\n", "isolation", isolation(decision)));
            out.push_str(&format!("  {:<12}{}\n", "precedence", precedence(rt)));
        }
    }
    out.push('\n');
    out.push_str(exp.guidance);
    out.push_str("\n\n");

    out.push_str("Rejected at registration:\n");
    push_indented(&mut out, exp.examples.invalid);
    out.push_str("\nAccepted:\n");
    push_indented(&mut out, exp.examples.valid);

    out
}

fn push_indented(out: &mut String, block: &str) {
    for line in block.lines() {
        out.push_str("    ");
        out.push_str(line);
        out.push('\n');
    }
}

/// Known identifiers sharing a word with `identifier` (`vote` -> `vote-passed`).
pub fn suggestions(identifier: &str) -> Vec<&'static str> {
    let words: Vec<&str> = identifier
        .split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .collect();
    explain::all_predicates()
        .iter()
        .chain(explain::all_return_types())
        .copied()
        .filter(|known| known.split('-').any(|part| words.contains(&part)))
        .collect()
}

/// Format the "unknown identifier" message for terminal display.
pub fn format_unknown(identifier: &str) -> String {
    let mut out = format!("darc: nothing to explain for `{identifier}`\n");

    let close = suggestions(identifier);
    if !close.is_empty() {
        out.push_str(&format!("did you mean: {}\n", close.join(", ")));
    }
    out.push_str(&format!(
        "predicates: {}\n",
        explain::all_predicates().join(", ")
    ));
    out.push_str(&format!(
        "return types: {}\n",
        explain::all_return_types().join(", ")
    ));
    out
}
