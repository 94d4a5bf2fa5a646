//! The `list` use case: show registered plugins in registration order.

use anyhow::Context;
use darc_domain::{ConditionNode, Operand, Organization, RegisteredPlugin};
use darc_settings::Overrides;
use darc_types::HookPoint;

/// Register the configured plugins and return them per hook point, in registration order.
///
/// `hook = None` lists every hook point.
pub fn run_list(
    config_text: &str,
    overrides: Overrides,
    hook: Option<HookPoint>,
) -> anyhow::Result<Vec<(HookPoint, Vec<RegisteredPlugin>)>> {
    let resolved = crate::judge::load_config(config_text, overrides)?;
    let org = Organization::initialize(resolved.effective);
    for (i, plugin) in resolved.plugins.into_iter().enumerate() {
        org.register(plugin)
            .with_context(|| format!("register plugin #{}", i + 1))?;
    }

    let hooks: Vec<HookPoint> = match hook {
        Some(h) => vec![h],
        None => HookPoint::ALL.to_vec(),
    };
    Ok(hooks
        .into_iter()
        .map(|h| (h, org.list(h).as_ref().clone()))
        .collect())
}

/// Format a plugin listing for terminal display.
pub fn format_plugin_list(listing: &[(HookPoint, Vec<RegisteredPlugin>)]) -> String {
    let mut out = String::new();

    for (hook, plugins) in listing {
        out.push_str(&format!("{hook} ({} plugins)\n", plugins.len()));
        for p in plugins {
            out.push_str(&format!(
                "  {}  level={}  {}  {}\n",
                p.id,
                p.level(),
                p.return_type(),
                format_condition(&p.plugin.condition)
            ));
            if let Some(rule) = p.plugin.voting_rule {
                out.push_str(&format!("      default vote: {rule}\n"));
            }
            if !p.plugin.notes.is_empty() {
                out.push_str(&format!("      notes: {}\n", p.plugin.notes));
            }
        }
    }

    out
}

/// Compact single-line rendering of a condition tree.
pub fn format_condition(node: &ConditionNode) -> String {
    match node {
        ConditionNode::Leaf(leaf) => match &leaf.operand {
            Operand::None => leaf.predicate.clone(),
            Operand::Address(a) => format!("{}({a})", leaf.predicate),
            Operand::AddressSet(set) => {
                let items: Vec<&str> = set.iter().map(|a| a.as_str()).collect();
                format!("{}([{}])", leaf.predicate, items.join(", "))
            }
            Operand::VotingRule(rule) => format!("{}({rule})", leaf.predicate),
        },
        ConditionNode::And { children } => join_children("and", children),
        ConditionNode::Or { children } => join_children("or", children),
        ConditionNode::Not { child } => format!("not({})", format_condition(child)),
    }
}

fn join_children(op: &str, children: &[ConditionNode]) -> String {
    let parts: Vec<String> = children.iter().map(format_condition).collect();
    format!("{op}({})", parts.join(", "))
}
