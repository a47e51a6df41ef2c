use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::merge::{MergeArgs, OutputFormat};

#[derive(Parser)]
#[command(name = "protoprobe")]
#[command(about = "Reconcile IP protocol probe logs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a receiver log and a sender log into a per-protocol report
    Merge {
        /// Log written by the receiving side (captures)
        receiver_log: PathBuf,

        /// Log written by the sending side (attempts)
        sender_log: PathBuf,

        /// Layered config paths in merge order (later overrides earlier)
        #[arg(long = "config")]
        config_paths: Vec<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Write the report here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Fail on config keys nothing reads (default: warn)
        #[arg(long, default_value_t = false)]
        strict_config: bool,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Merge {
            receiver_log,
            sender_log,
            config_paths,
            format,
            out,
            strict_config,
        } => commands::merge::run_merge(MergeArgs {
            receiver_log,
            sender_log,
            config_paths,
            format,
            out,
            strict_config,
        })?,

        Commands::ConfigHash { paths } => {
            let loaded = pp_config::load_layered_yaml(paths.as_slice())?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }
    }

    Ok(())
}

/// Logs go to stderr; stdout carries only the report.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
