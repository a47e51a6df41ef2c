//! pp-reconcile
//!
//! Reconciliation engine for protocol reachability probes.
//!
//! A sender log records every protocol number it tried to transmit; a
//! receiver log records every packet it captured. This crate lines the two
//! up by protocol number and reports, per number:
//! - whether the packet was received
//! - the transit time, when both timestamps exist and are causally ordered
//!
//! Deterministic, pure logic. No IO. Sources live in `pp-logs`, text
//! rendering in `pp-table`.

mod assemble;
mod derive;
mod engine;
mod error;
mod join;
mod normalizer;
mod options;
mod types;

pub use assemble::{assemble, output_columns, Report};
pub use derive::{derive_row, transit_time};
pub use engine::{reconcile, reconcile_normalized};
pub use error::ReconcileError;
pub use join::{outer_join, JoinedPair};
pub use normalizer::{
    coerce_micros, coerce_protocol_number, coerce_text, normalize_attempts, normalize_captures,
    MalformedCell,
};
pub use options::{ColumnNames, EngineConfig, MarkerEffect, MarkerPolicy, RenderOptions};
pub use types::*;
