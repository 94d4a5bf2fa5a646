//! CLI entry point for DARC.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `darc-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use darc_app::{
    JudgeInput, SchemaKind, decision_exit_code, format_plugin_list,
    parse_receipt_json, render_markdown, render_schema, run_explain, run_judge,
    run_list, runtime_error_receipt, serialize_receipt,
};
use darc_settings::{Overrides, parse_hook};
use darc_types::JudgementReceipt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(
    name = "darc",
    version,
    about = "Plugin judgement engine for DARC organizations"
)]
struct Cli {
    /// Path to darc config TOML. A missing file means no plugins and profile defaults.
    #[arg(long, default_value = "darc.toml")]
    config: Utf8PathBuf,

    /// Override profile (strict|permissive).
    #[arg(long)]
    profile: Option<String>,

    /// Override the maximum condition tree depth.
    #[arg(long)]
    max_depth: Option<u32>,

    /// Override the voting rule resolver timeout, in milliseconds.
    #[arg(long)]
    resolver_timeout_ms: Option<u64>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Judge one operation and write a receipt.
    Judge {
        /// Operation context JSON: {"caller": "0x..", "targets": ["0x.."]}.
        #[arg(long)]
        context: Utf8PathBuf,

        /// Voting rule outcomes JSON: {"<rule>": "passed|failed|pending"}.
        #[arg(long)]
        votes: Option<Utf8PathBuf>,

        /// Hook point to judge at.
        #[arg(long, default_value = "before-operation")]
        hook: String,

        /// Where to write the JSON receipt.
        #[arg(long, default_value = "artifacts/darc/judgement.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown summary alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown summary (if enabled).
        #[arg(long, default_value = "artifacts/darc/judgement.md")]
        markdown_out: Utf8PathBuf,
    },

    /// List configured plugins in registration order.
    List {
        /// Only list this hook point.
        #[arg(long)]
        hook: Option<String>,
    },

    /// Render markdown from an existing JSON receipt.
    Md {
        /// Path to the JSON receipt file.
        #[arg(long, default_value = "artifacts/darc/judgement.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Explain a predicate tag or return type.
    Explain {
        /// The predicate (e.g., "vote-passed") or return type (e.g., "reject") to explain.
        identifier: String,
    },

    /// Print the JSON Schema for `config` or `receipt`.
    Schema {
        kind: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.cmd {
        Commands::Judge {
            ref context,
            ref votes,
            ref hook,
            ref report_out,
            write_markdown,
            ref markdown_out,
        } => cmd_judge(
            &cli,
            context,
            votes.as_deref(),
            hook,
            report_out,
            write_markdown,
            markdown_out,
        ),
        Commands::List { ref hook } => cmd_list(&cli, hook.as_deref()),
        Commands::Md { report, output } => cmd_md(report, output),
        Commands::Explain { identifier } => cmd_explain(&identifier),
        Commands::Schema { kind } => cmd_schema(&kind),
    }
}

/// Logs go to stderr so stdout stays machine readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("DARC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .init();
}

fn overrides(cli: &Cli) -> Overrides {
    Overrides {
        profile: cli.profile.clone(),
        max_depth: cli.max_depth,
        resolver_timeout_ms: cli.resolver_timeout_ms,
    }
}

/// Missing config is allowed (defaults apply).
fn read_config(path: &Utf8Path) -> String {
    std::fs::read_to_string(path).unwrap_or_default()
}

fn cmd_judge(
    cli: &Cli,
    context: &Utf8Path,
    votes: Option<&Utf8Path>,
    hook: &str,
    report_out: &Utf8Path,
    write_markdown: bool,
    markdown_out: &Utf8Path,
) -> anyhow::Result<()> {
    let hook = parse_hook(hook)?;

    let result = (|| -> anyhow::Result<i32> {
        let cfg_text = read_config(&cli.config);
        let context_text = std::fs::read_to_string(context)
            .with_context(|| format!("read operation context: {}", context))?;
        let votes_text = votes
            .map(|path| {
                std::fs::read_to_string(path)
                    .with_context(|| format!("read voting results: {}", path))
            })
            .transpose()?;

        let output = run_judge(JudgeInput {
            config_text: &cfg_text,
            context_json: &context_text,
            votes_json: votes_text.as_deref(),
            hook,
            overrides: overrides(cli),
        })?;

        write_receipt_file(report_out, &output.receipt).context("write receipt json")?;
        if write_markdown {
            let md = render_markdown(&output.receipt);
            write_text_file(markdown_out, &md).context("write markdown")?;
        }

        println!("{}", output.receipt.decision);
        Ok(decision_exit_code(output.receipt.decision))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            let receipt = runtime_error_receipt(hook, &format!("{err:#}"));
            if let Err(write_err) = write_receipt_file(report_out, &receipt) {
                tracing::warn!(error = %write_err, "could not write fail-closed receipt");
            }
            eprintln!("darc error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn cmd_list(cli: &Cli, hook: Option<&str>) -> anyhow::Result<()> {
    let hook = hook.map(parse_hook).transpose()?;
    let cfg_text = read_config(&cli.config);
    let listing = run_list(&cfg_text, overrides(cli), hook)?;
    print!("{}", format_plugin_list(&listing));
    Ok(())
}

fn write_receipt_file(path: &Utf8Path, receipt: &JudgementReceipt) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    let data = serialize_receipt(receipt).context("serialize receipt")?;
    std::fs::write(path, data).with_context(|| format!("write receipt: {}", path))?;
    Ok(())
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    std::fs::write(path, text).with_context(|| format!("write text: {}", path))?;
    Ok(())
}

fn cmd_md(report_path: Utf8PathBuf, output: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(&report_path)
        .with_context(|| format!("read receipt: {}", report_path))?;
    let receipt = parse_receipt_json(&report_text)?;
    let md = render_markdown(&receipt);

    if let Some(out_path) = output {
        write_text_file(&out_path, &md).context("write markdown output")?;
    } else {
        print!("{}", md);
    }

    Ok(())
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    match run_explain(identifier) {
        Some(topic) => {
            print!("{}", darc_app::format_topic(&topic));
            Ok(())
        }
        None => {
            eprint!("{}", darc_app::format_unknown(identifier));
            std::process::exit(1);
        }
    }
}

fn cmd_schema(kind: &str) -> anyhow::Result<()> {
    let Some(kind) = SchemaKind::from_name(kind) else {
        anyhow::bail!("unknown schema: {kind} (expected config or receipt)");
    };
    println!("{}", render_schema(kind)?);
    Ok(())
}
