//! pp-table
//!
//! Pipe-delimited text tables: the format both probe logs and the merged
//! report are exchanged in.
//!
//! ```text
//! | Protocol Number | Time (μs) (Server) | Source IP (Server) |
//! |-----------------|--------------------|--------------------|
//! | 6               | 150                | 10.0.0.1           |
//! ```
//!
//! This crate only moves text in and out of [`Table`]. It does not know what
//! any column means; typing and absent-value markers are the caller's job.

mod reader;
mod writer;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use reader::{parse_table_file, parse_table_str};
pub use writer::render_table;

/// A header plus zero or more rows of trimmed text cells.
///
/// Every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced while reading or building a table.
#[derive(Debug, PartialEq, Eq)]
pub enum TableError {
    /// An I/O failure reading the source.
    Io(String),
    /// The input had no non-blank lines, so there is no header.
    Empty,
    /// The second non-blank line is not a `|---|---|` separator.
    MissingSeparator { line: usize },
    /// The same column name appears twice in the header.
    DuplicateHeader(String),
    /// A data row has a different number of cells than the header.
    RowWidth {
        line: usize,
        expected: usize,
        got: usize,
    },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::Io(msg) => write!(f, "table io error: {msg}"),
            TableError::Empty => write!(f, "table is empty: no header row"),
            TableError::MissingSeparator { line } => {
                write!(f, "line {line}: expected a separator row like |---|---|")
            }
            TableError::DuplicateHeader(col) => {
                write!(f, "duplicate header column: '{col}'")
            }
            TableError::RowWidth {
                line,
                expected,
                got,
            } => write!(f, "line {line}: expected {expected} cells, got {got}"),
        }
    }
}

impl std::error::Error for TableError {}
