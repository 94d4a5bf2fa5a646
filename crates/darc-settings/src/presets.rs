use darc_domain::policy::{DEFAULT_MAX_DEPTH, DEFAULT_RESOLVER_TIMEOUT, EffectiveConfig};
use darc_types::{FinalDecision, HookPoint};
use std::collections::BTreeMap;

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything complex should go into repo config.
pub fn preset(profile: &str) -> EffectiveConfig {
    match profile {
        "permissive" => permissive_profile(),
        // default
        _ => strict_profile(),
    }
}

fn strict_profile() -> EffectiveConfig {
    EffectiveConfig {
        profile: "strict".to_string(),
        max_depth: DEFAULT_MAX_DEPTH,
        resolver_timeout: DEFAULT_RESOLVER_TIMEOUT,
        hook_defaults: hook_defaults(FinalDecision::Rejected, FinalDecision::Rejected),
    }
}

fn permissive_profile() -> EffectiveConfig {
    // Post-operation hooks observe; they only block when a plugin says so.
    EffectiveConfig {
        profile: "permissive".to_string(),
        max_depth: DEFAULT_MAX_DEPTH,
        resolver_timeout: DEFAULT_RESOLVER_TIMEOUT,
        hook_defaults: hook_defaults(FinalDecision::Rejected, FinalDecision::Approved),
    }
}

fn hook_defaults(before: FinalDecision, after: FinalDecision) -> BTreeMap<HookPoint, FinalDecision> {
    BTreeMap::from([
        (HookPoint::BeforeOperation, before),
        (HookPoint::AfterOperation, after),
    ])
}
