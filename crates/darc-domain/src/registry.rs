//! Ordered plugin storage, keyed by hook point.
//!
//! Registration order is evaluation order. Each hook point's list sits behind an `Arc`; writers
//! copy-on-write under the lock, readers clone the `Arc` and judge against that snapshot, so a
//! judgement never observes a half-applied registration.

use crate::error::JudgeError;
use crate::model::{Plugin, RegisteredPlugin};
use crate::policy::DEFAULT_MAX_DEPTH;
use darc_types::{HookPoint, PluginId};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;

/// Immutable view of one hook point's plugins, in registration order.
pub type PluginSnapshot = Arc<Vec<RegisteredPlugin>>;

#[derive(Debug)]
pub struct PluginRegistry {
    max_depth: usize,
    state: RwLock<RegistryState>,
}

#[derive(Debug, Default)]
struct RegistryState {
    next_id: u64,
    hooks: BTreeMap<HookPoint, PluginSnapshot>,
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl PluginRegistry {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            state: RwLock::new(RegistryState::default()),
        }
    }

    /// Validate and append a plugin to its hook point. Ids start at 1 and are never reused.
    pub fn register(&self, plugin: Plugin) -> Result<PluginId, JudgeError> {
        plugin.validate(self.max_depth)?;

        let mut state = self.write();
        state.next_id += 1;
        let id = PluginId(state.next_id);
        let hook = plugin.hook;
        let level = plugin.level;
        let return_type = plugin.return_type;

        let list = state.hooks.entry(hook).or_default();
        Arc::make_mut(list).push(RegisteredPlugin { id, plugin });
        let position = list.len();
        drop(state);

        info!(%id, %hook, %return_type, level, position, "plugin registered");
        Ok(id)
    }

    pub fn unregister(&self, id: PluginId) -> Result<RegisteredPlugin, JudgeError> {
        let mut state = self.write();
        for (hook, list) in state.hooks.iter_mut() {
            if let Some(idx) = list.iter().position(|p| p.id == id) {
                let removed = Arc::make_mut(list).remove(idx);
                info!(%id, %hook, "plugin unregistered");
                return Ok(removed);
            }
        }
        Err(JudgeError::NotFound(id))
    }

    /// Plugins for `hook` in registration order. Later registrations do not affect the snapshot.
    pub fn list(&self, hook: HookPoint) -> PluginSnapshot {
        self.read().hooks.get(&hook).cloned().unwrap_or_default()
    }

    pub fn get(&self, id: PluginId) -> Option<RegisteredPlugin> {
        self.read()
            .hooks
            .values()
            .flat_map(|list| list.iter())
            .find(|p| p.id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.read().hooks.values().map(|list| list.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    // State is only ever replaced whole, so a poisoned lock still guards consistent data.
    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
