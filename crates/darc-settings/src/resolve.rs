use crate::{
    model::{ConditionConfig, DarcConfigV1, PluginConfig},
    presets,
};
use anyhow::Context;
use darc_domain::policy::EffectiveConfig;
use darc_domain::{ConditionNode, Operand, Plugin};
use darc_types::{Address, FinalDecision, HookPoint, ReturnType, VotingRuleId};
use std::collections::BTreeSet;
use std::time::Duration;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub max_depth: Option<u32>,
    pub resolver_timeout_ms: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
    /// Plugin declarations in file order, not yet registered.
    pub plugins: Vec<Plugin>,
}

pub fn resolve_config(cfg: DarcConfigV1, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "strict".to_string());

    let mut effective = presets::preset(&profile);

    if let Some(depth) = overrides.max_depth.or(cfg.max_depth) {
        if depth == 0 {
            anyhow::bail!("max_depth must be at least 1");
        }
        effective.max_depth = depth as usize;
    }

    if let Some(ms) = overrides.resolver_timeout_ms.or(cfg.resolver_timeout_ms) {
        if ms == 0 {
            anyhow::bail!("resolver_timeout_ms must be greater than zero");
        }
        effective.resolver_timeout = Duration::from_millis(ms);
    }

    // per-hook overrides
    for (name, hc) in cfg.hooks.iter() {
        let hook = parse_hook(name)?;
        if let Some(default) = hc.default.as_deref() {
            let decision = parse_hook_default(default)
                .with_context(|| format!("invalid default for hook {name}"))?;
            effective.hook_defaults.insert(hook, decision);
        }
    }

    let plugins = cfg
        .plugins
        .iter()
        .enumerate()
        .map(|(i, pc)| {
            resolve_plugin(pc).with_context(|| format!("invalid plugin #{} in config", i + 1))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(ResolvedConfig { effective, plugins })
}

fn resolve_plugin(pc: &PluginConfig) -> anyhow::Result<Plugin> {
    let hook = parse_hook(&pc.hook)?;
    let return_type = parse_return_type(&pc.return_type)?;
    let condition = resolve_condition(&pc.condition).context("invalid condition")?;

    let mut plugin = Plugin::new(hook, condition, return_type)
        .with_level(pc.level)
        .with_notes(pc.notes.clone());
    if let Some(rule) = pc.voting_rule {
        plugin = plugin.with_voting_rule(VotingRuleId(rule));
    }
    Ok(plugin)
}

fn resolve_condition(cc: &ConditionConfig) -> anyhow::Result<ConditionNode> {
    let forms = [
        cc.predicate.is_some(),
        cc.and.is_some(),
        cc.or.is_some(),
        cc.not.is_some(),
    ];
    match forms.iter().filter(|set| **set).count() {
        1 => {}
        0 => anyhow::bail!("condition needs one of: predicate, and, or, not"),
        _ => anyhow::bail!("condition sets more than one of: predicate, and, or, not"),
    }

    if let Some(children) = cc.and.as_deref() {
        return Ok(ConditionNode::And {
            children: resolve_children(children)?,
        });
    }
    if let Some(children) = cc.or.as_deref() {
        return Ok(ConditionNode::Or {
            children: resolve_children(children)?,
        });
    }
    if let Some(child) = cc.not.as_deref() {
        return Ok(ConditionNode::negate(resolve_condition(child)?));
    }

    let predicate = cc.predicate.clone().unwrap_or_default();
    let operand = resolve_operand(cc).with_context(|| format!("invalid operand for {predicate}"))?;
    Ok(ConditionNode::leaf(predicate, operand))
}

// Child counts are checked by the registry, which reports them as `InvalidCondition`.
fn resolve_children(children: &[ConditionConfig]) -> anyhow::Result<Vec<ConditionNode>> {
    children.iter().map(resolve_condition).collect()
}

fn resolve_operand(cc: &ConditionConfig) -> anyhow::Result<Operand> {
    let mut operands = Vec::new();

    if let Some(address) = cc.address.as_deref() {
        operands.push(Operand::Address(parse_address(address)?));
    }
    if !cc.addresses.is_empty() {
        let set = cc
            .addresses
            .iter()
            .map(|a| parse_address(a))
            .collect::<anyhow::Result<BTreeSet<_>>>()?;
        operands.push(Operand::AddressSet(set));
    }
    if let Some(rule) = cc.voting_rule {
        operands.push(Operand::VotingRule(VotingRuleId(rule)));
    }

    if operands.len() > 1 {
        anyhow::bail!("at most one of address, addresses, voting_rule may be set");
    }
    Ok(operands.pop().unwrap_or_default())
}

fn parse_address(v: &str) -> anyhow::Result<Address> {
    Address::parse(v).with_context(|| format!("invalid address: {v}"))
}

/// Parse a hook point name as used in config files and on the command line.
pub fn parse_hook(v: &str) -> anyhow::Result<HookPoint> {
    match HookPoint::from_name(v) {
        Some(hook) => Ok(hook),
        None => anyhow::bail!(
            "unknown hook: {v} (expected 'before-operation' or 'after-operation')"
        ),
    }
}

fn parse_return_type(v: &str) -> anyhow::Result<ReturnType> {
    match ReturnType::from_name(v) {
        Some(rt) => Ok(rt),
        None => anyhow::bail!(
            "unknown return_type: {v} (expected approve|approve-skip-isolation|reject)"
        ),
    }
}

fn parse_hook_default(v: &str) -> anyhow::Result<FinalDecision> {
    match FinalDecision::from_name(v) {
        Some(d @ (FinalDecision::Approved | FinalDecision::Rejected)) => Ok(d),
        _ => anyhow::bail!("unknown default: {v} (expected approved|rejected)"),
    }
}
