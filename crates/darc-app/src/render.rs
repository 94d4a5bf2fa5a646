//! Receipt serialization and Markdown rendering.

use anyhow::Context;
use darc_types::{JudgementReceipt, SCHEMA_JUDGEMENT_V1};

pub fn serialize_receipt(receipt: &JudgementReceipt) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(receipt).context("serialize judgement receipt")
}

pub fn parse_receipt_json(text: &str) -> anyhow::Result<JudgementReceipt> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse receipt json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_JUDGEMENT_V1 {
        anyhow::bail!("unknown receipt schema: {schema} (expected {SCHEMA_JUDGEMENT_V1})");
    }

    serde_json::from_value(value).context("parse judgement receipt")
}

pub fn render_markdown(receipt: &JudgementReceipt) -> String {
    let mut out = String::new();

    out.push_str("# DARC judgement\n\n");
    out.push_str(&format!(
        "- Hook: `{}`\n- Decision: **{}**\n- Isolation: {}\n",
        receipt.hook,
        receipt.decision.as_str().to_uppercase(),
        if receipt.skip_isolation {
            "skipped"
        } else {
            "required"
        }
    ));
    match receipt.triggering_plugin {
        Some(id) => out.push_str(&format!("- Decided by: `{id}`\n")),
        None => out.push_str("- Decided by: hook default\n"),
    }
    if let Some(caller) = &receipt.operation.caller {
        out.push_str(&format!("- Caller: `{caller}`\n"));
    }
    if let Some(fp) = &receipt.fingerprint {
        out.push_str(&format!("- Plugin set: `{fp}`\n"));
    }
    out.push('\n');

    if let Some(err) = &receipt.error {
        out.push_str(&format!("> Error: {}\n\n", err));
    }

    if receipt.verdicts.is_empty() {
        out.push_str("No plugins evaluated.\n");
    } else {
        out.push_str("## Plugins\n\n");
        out.push_str("| Plugin | Level | Return type | Fired |\n");
        out.push_str("|---|---|---|---|\n");
        for v in &receipt.verdicts {
            out.push_str(&format!(
                "| `{}` | {} | {} | {} |\n",
                v.plugin,
                v.level,
                v.return_type,
                if v.fired { "yes" } else { "no" }
            ));
        }
    }

    if !receipt.voting_results.is_empty() {
        out.push_str("\n## Votes\n\n");
        for (rule, outcome) in &receipt.voting_results {
            out.push_str(&format!("- `{rule}`: {outcome}\n"));
        }
    }

    out
}
