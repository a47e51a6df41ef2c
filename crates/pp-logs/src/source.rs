//! Log source boundary for probe observations.
//!
//! This module defines **only** the raw record model and the source trait.
//! No typing of protocol numbers or timestamps happens here; that is the
//! reconcile normalizer's job.

use std::collections::BTreeMap;
use std::fmt;

use pp_table::TableError;

// ---------------------------------------------------------------------------
// Raw values
// ---------------------------------------------------------------------------

/// A single cell exactly as a source produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Text(String),
    Int(i64),
    /// The source had no value at all (missing column, JSON `null`).
    Absent,
}

impl RawValue {
    pub fn text(s: impl Into<String>) -> Self {
        RawValue::Text(s.into())
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Int(v)
    }
}

static ABSENT: RawValue = RawValue::Absent;

/// One observation: column name → raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based position of the record within its log (data rows only).
    pub row: usize,
    pub values: BTreeMap<String, RawValue>,
}

impl RawRecord {
    pub fn new(row: usize) -> Self {
        Self {
            row,
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.values.insert(column.into(), value.into());
        self
    }

    /// Value for `column`, or [`RawValue::Absent`] when the record lacks it.
    pub fn get(&self, column: &str) -> &RawValue {
        self.values.get(column).unwrap_or(&ABSENT)
    }
}

/// A fully drained log: column order plus every record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawLog {
    /// Column names in source order (header order, or first-seen order).
    pub columns: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl RawLog {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that a [`LogSource`] implementation may return.
#[derive(Debug, PartialEq, Eq)]
pub enum SourceError {
    /// The underlying file could not be read.
    Io(String),
    /// The table text was structurally invalid.
    Table(TableError),
    /// A JSON-lines record could not be decoded.
    Decode { line: usize, message: String },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Io(msg) => write!(f, "log io error: {msg}"),
            SourceError::Table(e) => write!(f, "log table error: {e}"),
            SourceError::Decode { line, message } => {
                write!(f, "log line {line}: {message}")
            }
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::Table(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TableError> for SourceError {
    fn from(e: TableError) -> Self {
        match e {
            TableError::Io(msg) => SourceError::Io(msg),
            other => SourceError::Table(other),
        }
    }
}

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// Producer of sender or receiver observations.
///
/// `drain` must return the complete log. Reconciliation joins whole
/// collections, so a source that streams from a live collaborator has to
/// finish (or be closed) before it is drained.
pub trait LogSource {
    /// Short name identifying the source kind (e.g. `"table"`).
    fn name(&self) -> &'static str;

    fn drain(&mut self) -> Result<RawLog, SourceError>;
}

/// A source over an already-built [`RawLog`].
#[derive(Debug, Clone, Default)]
pub struct MemoryLogSource {
    log: RawLog,
}

impl MemoryLogSource {
    pub fn new(log: RawLog) -> Self {
        Self { log }
    }
}

impl LogSource for MemoryLogSource {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn drain(&mut self) -> Result<RawLog, SourceError> {
        Ok(std::mem::take(&mut self.log))
    }
}
