//! Table-backed log source.
//!
//! Reads a pipe-delimited table (see `pp-table`) and yields every cell as
//! [`RawValue::Text`]. Absent-value markers such as `-` are passed through
//! untouched; the normalizer decides what they mean.

use std::path::{Path, PathBuf};

use pp_table::{parse_table_file, parse_table_str, Table};
use tracing::debug;

use crate::source::{LogSource, RawLog, RawRecord, RawValue, SourceError};

#[derive(Debug, Clone)]
enum Origin {
    File(PathBuf),
    Text(String),
}

/// A [`LogSource`] over a table file or in-memory table text.
#[derive(Debug, Clone)]
pub struct TableLogSource {
    origin: Origin,
}

impl TableLogSource {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            origin: Origin::File(path.as_ref().to_path_buf()),
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            origin: Origin::Text(text.into()),
        }
    }
}

impl LogSource for TableLogSource {
    fn name(&self) -> &'static str {
        "table"
    }

    fn drain(&mut self) -> Result<RawLog, SourceError> {
        let table = match &self.origin {
            Origin::File(p) => parse_table_file(p)?,
            Origin::Text(s) => parse_table_str(s)?,
        };
        let log = table_to_log(table);
        debug!(
            columns = log.columns.len(),
            records = log.records.len(),
            "drained table log"
        );
        Ok(log)
    }
}

/// Convert a parsed table into a raw log, numbering rows from 1.
pub fn table_to_log(table: Table) -> RawLog {
    let Table { headers, rows } = table;
    let mut log = RawLog::new(headers);
    for (i, row) in rows.into_iter().enumerate() {
        let mut rec = RawRecord::new(i + 1);
        for (col, cell) in log.columns.iter().zip(row) {
            rec.values.insert(col.clone(), RawValue::Text(cell));
        }
        log.records.push(rec);
    }
    log
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_become_text_values() {
        let mut src = TableLogSource::from_text(
            "| Protocol Number | Time (μs) (Client) |\n|---|---|\n| 6 | 100 |\n| 17 | - |",
        );
        let log = src.drain().unwrap();
        assert_eq!(log.columns, vec!["Protocol Number", "Time (μs) (Client)"]);
        assert_eq!(log.records.len(), 2);
        assert_eq!(log.records[0].row, 1);
        assert_eq!(log.records[1].row, 2);
        assert_eq!(
            log.records[1].get("Time (μs) (Client)"),
            &RawValue::text("-")
        );
    }

    #[test]
    fn structural_error_is_surfaced() {
        let mut src = TableLogSource::from_text("| a |\n| 1 |");
        assert!(matches!(src.drain(), Err(SourceError::Table(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let mut src = TableLogSource::from_path("/no/such/log.md");
        assert!(matches!(src.drain(), Err(SourceError::Io(_))));
    }
}
