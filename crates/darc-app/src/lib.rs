//! Use case orchestration for DARC.
//!
//! This crate provides the application layer: use cases that coordinate settings, the judgement
//! engine, and rendering. It is intentionally thin and delegates heavy lifting to the domain.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod explain;
mod judge;
mod list;
mod render;
mod schema;

pub use explain::{
    OperandKey, Role, Topic, format_topic, format_unknown, run_explain, suggestions,
};
pub use judge::{JudgeInput, JudgeOutput, decision_exit_code, run_judge, runtime_error_receipt};
pub use list::{format_condition, format_plugin_list, run_list};
pub use render::{parse_receipt_json, render_markdown, serialize_receipt};
pub use schema::{SchemaKind, render_schema};
