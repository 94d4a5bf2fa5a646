use crate::engine::{CancellationToken, judge_snapshot};
use crate::error::JudgeError;
use crate::model::{OperationContext, Plugin, RegisteredPlugin};
use crate::policy::EffectiveConfig;
use crate::registry::{PluginRegistry, PluginSnapshot};
use crate::report::JudgementResult;
use crate::resolver::VotingRuleResolver;
use darc_types::{HookPoint, PluginId};
use tracing::info;

/// Process-wide plugin state for one organization.
///
/// Created once by [`Organization::initialize`] at organization setup and shared by reference
/// (typically behind an `Arc`) with every dispatcher thread. Plugins change only through
/// `register` / `unregister`; there is no reset.
#[derive(Debug)]
pub struct Organization {
    config: EffectiveConfig,
    registry: PluginRegistry,
}

impl Organization {
    pub fn initialize(config: EffectiveConfig) -> Self {
        info!(
            profile = %config.profile,
            max_depth = config.max_depth,
            "organization initialized"
        );
        let registry = PluginRegistry::new(config.max_depth);
        Self { config, registry }
    }

    pub fn config(&self) -> &EffectiveConfig {
        &self.config
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    pub fn register(&self, plugin: Plugin) -> Result<PluginId, JudgeError> {
        self.registry.register(plugin)
    }

    pub fn unregister(&self, id: PluginId) -> Result<RegisteredPlugin, JudgeError> {
        self.registry.unregister(id)
    }

    pub fn list(&self, hook: HookPoint) -> PluginSnapshot {
        self.registry.list(hook)
    }

    /// Judge `ctx` against the plugins registered for `hook` at the moment of the call.
    pub fn judge<R: VotingRuleResolver + ?Sized>(
        &self,
        hook: HookPoint,
        ctx: &OperationContext,
        resolver: &R,
    ) -> Result<JudgementResult, JudgeError> {
        let snapshot = self.registry.list(hook);
        judge_snapshot(&snapshot, hook, ctx, resolver, &self.config, None)
    }

    pub fn judge_with_cancel<R: VotingRuleResolver + ?Sized>(
        &self,
        hook: HookPoint,
        ctx: &OperationContext,
        resolver: &R,
        cancel: &CancellationToken,
    ) -> Result<JudgementResult, JudgeError> {
        let snapshot = self.registry.list(hook);
        judge_snapshot(&snapshot, hook, ctx, resolver, &self.config, Some(cancel))
    }
}
