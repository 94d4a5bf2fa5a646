use darc_types::{FinalDecision, HookPoint};
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_MAX_DEPTH: usize = 64;
pub const DEFAULT_RESOLVER_TIMEOUT: Duration = Duration::from_millis(2000);

/// Engine limits and per-hook defaults, resolved from configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub profile: String,
    /// Deepest condition tree accepted at registration or evaluated at judgement.
    pub max_depth: usize,
    /// Upper bound on a single voting rule query.
    pub resolver_timeout: Duration,
    /// Decision when no plugin fires. Hook points not listed fail closed.
    pub hook_defaults: BTreeMap<HookPoint, FinalDecision>,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            profile: "strict".to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            resolver_timeout: DEFAULT_RESOLVER_TIMEOUT,
            hook_defaults: BTreeMap::new(),
        }
    }
}

impl EffectiveConfig {
    pub fn default_decision(&self, hook: HookPoint) -> FinalDecision {
        self.hook_defaults
            .get(&hook)
            .copied()
            .unwrap_or(FinalDecision::Rejected)
    }
}
