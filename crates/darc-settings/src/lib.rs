//! Config parsing and profile/preset resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{ConditionConfig, DarcConfigV1, HookConfig, PluginConfig, SCHEMA_CONFIG_V1};
pub use resolve::{Overrides, ResolvedConfig, parse_hook};

/// Parse `darc.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<DarcConfigV1> {
    let cfg: DarcConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective engine config and plugin declarations (profiles + overrides).
pub fn resolve_config(cfg: DarcConfigV1, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
