//! `protoprobe merge`: drain both logs, reconcile, write the report.
//!
//! The whole report is rendered in memory before anything is written, so a
//! failing run leaves no partial output behind.

use anyhow::{Context, Result};
use clap::ValueEnum;
use pp_config::{engine_config, UnusedKeyPolicy};
use pp_logs::{open_log, RawLog};
use pp_reconcile::{reconcile, EngineConfig, Report};
use pp_table::render_table;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::load_config;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

pub struct MergeArgs {
    pub receiver_log: PathBuf,
    pub sender_log: PathBuf,
    pub config_paths: Vec<PathBuf>,
    pub format: OutputFormat,
    pub out: Option<PathBuf>,
    pub strict_config: bool,
}

pub fn run_merge(args: MergeArgs) -> Result<()> {
    let policy = if args.strict_config {
        UnusedKeyPolicy::Fail
    } else {
        UnusedKeyPolicy::Warn
    };
    let loaded = load_config(&args.config_paths, policy)?;
    let config = engine_config(&loaded)?;

    let receiver = drain(&args.receiver_log, "receiver")?;
    let sender = drain(&args.sender_log, "sender")?;

    let report = reconcile(&sender, &receiver, &config).context("reconcile failed")?;
    let text = render(&report, &config, args.format)?;

    match &args.out {
        Some(path) => fs::write(path, &text)
            .with_context(|| format!("write report failed: {}", path.display()))?,
        None => print!("{text}"),
    }

    info!(
        rows = report.len(),
        received = report.rows.iter().filter(|r| r.received).count(),
        "merge complete"
    );
    Ok(())
}

fn drain(path: &Path, role: &str) -> Result<RawLog> {
    let mut source = open_log(path);
    let log = source
        .drain()
        .with_context(|| format!("failed to read {role} log: {}", path.display()))?;
    info!(
        role,
        source = source.name(),
        path = %path.display(),
        records = log.len(),
        "log drained"
    );
    Ok(log)
}

fn render(report: &Report, config: &EngineConfig, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(&report.to_table(&config.render))),
        OutputFormat::Json => {
            let mut s = serde_json::to_string_pretty(&report.to_json())
                .context("serialize report json failed")?;
            s.push('\n');
            Ok(s)
        }
    }
}
