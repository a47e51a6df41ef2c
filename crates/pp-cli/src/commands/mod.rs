//! Command handler modules for the protoprobe CLI.
//!
//! Shared utilities used by multiple command paths live here.

pub mod merge;

use anyhow::{Context, Result};
use pp_config::{report_unused_keys, LoadedConfig, UnusedKeyPolicy};
use std::path::PathBuf;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Load layered config (empty when no paths are given) and run the
/// unused-key guard under `policy`.
pub fn load_config(paths: &[PathBuf], policy: UnusedKeyPolicy) -> Result<LoadedConfig> {
    let loaded = if paths.is_empty() {
        LoadedConfig::empty()?
    } else {
        pp_config::load_layered_yaml(paths).context("config load failed")?
    };

    let report = report_unused_keys(&loaded.config_json, policy)?;
    if !report.is_clean() {
        warn!(
            unused = ?report.unused_leaf_pointers,
            "config has keys nothing reads"
        );
    }

    info!(config_hash = %loaded.config_hash, layers = paths.len(), "config loaded");
    Ok(loaded)
}
