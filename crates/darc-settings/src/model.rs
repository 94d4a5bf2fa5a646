use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SCHEMA_CONFIG_V1: &str = "darc.config.v1";

/// `darc.toml` schema v1.
///
/// This is a *user-facing* config model: it is intentionally permissive so forward-compat is easy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DarcConfigV1 {
    /// Optional schema string for tooling (`darc.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// `strict` (default) or `permissive`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Deepest condition tree accepted by the registry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,

    /// Upper bound on a single voting rule query, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolver_timeout_ms: Option<u64>,

    /// Map of hook point name -> config.
    #[serde(default)]
    pub hooks: BTreeMap<String, HookConfig>,

    /// Plugins, registered in file order.
    #[serde(default)]
    pub plugins: Vec<PluginConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HookConfig {
    /// Decision when no plugin fires: `approved` or `rejected`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PluginConfig {
    /// `before-operation` or `after-operation`.
    pub hook: String,

    /// `approve`, `approve-skip-isolation`, or `reject`.
    pub return_type: String,

    #[serde(default)]
    pub level: u64,

    /// Voting rule used by `vote-passed` leaves that do not name one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voting_rule: Option<u64>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,

    pub condition: ConditionConfig,
}

/// One condition node. Exactly one of `predicate`, `and`, `or`, `not` must be set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConditionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<String>,

    /// Operand for `caller-equals-address`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Operand for `target-in-set`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<String>,

    /// Operand for `vote-passed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voting_rule: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub and: Option<Vec<ConditionConfig>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub or: Option<Vec<ConditionConfig>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<ConditionConfig>>,
}
