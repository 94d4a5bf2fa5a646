//! JSON Schemas for the config file and the judgement receipt.

use anyhow::Context;
use schemars::schema_for;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaKind {
    Config,
    Receipt,
}

impl SchemaKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "config" => Some(SchemaKind::Config),
            "receipt" => Some(SchemaKind::Receipt),
            _ => None,
        }
    }
}

pub fn render_schema(kind: SchemaKind) -> anyhow::Result<String> {
    let schema = match kind {
        SchemaKind::Config => schema_for!(darc_settings::DarcConfigV1),
        SchemaKind::Receipt => schema_for!(darc_types::JudgementReceipt),
    };
    serde_json::to_string_pretty(&schema).context("serialize json schema")
}
