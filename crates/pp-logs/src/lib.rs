//! pp-logs
//!
//! Sender and receiver log sources. A sender log has one record per
//! attempted transmission; a receiver log has one record per captured
//! packet. Both arrive here as untyped [`RawLog`]s.
//!
//! This crate does **not** interpret columns. Callers hand the drained logs
//! to `pp_reconcile`.

pub mod jsonl_source;
pub mod source;
pub mod table_source;

use std::path::Path;

pub use jsonl_source::{parse_json_lines, JsonLinesLogSource};
pub use source::{LogSource, MemoryLogSource, RawLog, RawRecord, RawValue, SourceError};
pub use table_source::{table_to_log, TableLogSource};

/// Pick a source for `path` by extension: `.jsonl` / `.ndjson` are JSON
/// lines, everything else is treated as a table.
pub fn open_log(path: &Path) -> Box<dyn LogSource> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jsonl") | Some("ndjson") => Box::new(JsonLinesLogSource::from_path(path)),
        _ => Box::new(TableLogSource::from_path(path)),
    }
}
