//! Read side: text → [`Table`].
//!
//! Line numbers in errors are 1-based and count blank lines, so they match
//! what an editor shows.

use std::collections::BTreeSet;
use std::path::Path;

use crate::{Table, TableError};

/// Read and parse a table file.
pub fn parse_table_file(path: &Path) -> Result<Table, TableError> {
    let src = std::fs::read_to_string(path)
        .map_err(|e| TableError::Io(format!("read '{}': {e}", path.display())))?;
    parse_table_str(&src)
}

/// Parse a table from text.
///
/// Blank lines are ignored everywhere. The first non-blank line is the
/// header, the second must be a separator row, the rest are data rows.
/// A header with no rows is a valid, empty table.
pub fn parse_table_str(src: &str) -> Result<Table, TableError> {
    let mut lines = src
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    let (_, header_line) = lines.next().ok_or(TableError::Empty)?;
    let headers = split_cells(header_line);

    let mut seen = BTreeSet::new();
    for h in &headers {
        if !seen.insert(h.as_str()) {
            return Err(TableError::DuplicateHeader(h.clone()));
        }
    }

    let mut table = Table::new(headers);

    match lines.next() {
        None => return Ok(table),
        Some((line_no, sep)) => {
            let cells = split_cells(sep);
            if !cells.iter().all(|c| is_separator_cell(c)) {
                return Err(TableError::MissingSeparator { line: line_no });
            }
            if cells.len() != table.headers.len() {
                return Err(TableError::RowWidth {
                    line: line_no,
                    expected: table.headers.len(),
                    got: cells.len(),
                });
            }
        }
    }

    for (line_no, line) in lines {
        let cells = split_cells(line);
        if cells.len() != table.headers.len() {
            return Err(TableError::RowWidth {
                line: line_no,
                expected: table.headers.len(),
                got: cells.len(),
            });
        }
        table.rows.push(cells);
    }

    Ok(table)
}

fn is_separator_cell(c: &str) -> bool {
    !c.is_empty() && c.contains('-') && c.chars().all(|ch| ch == '-' || ch == ':')
}

/// Split one line into trimmed cells.
///
/// One leading and one trailing `|` are optional decorations. `\|` is a
/// literal pipe inside a cell.
fn split_cells(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cur = String::new();
    let mut chars = line.chars().peekable();
    let mut ends_with_pipe = false;

    while let Some(ch) = chars.next() {
        ends_with_pipe = false;
        match ch {
            '\\' if chars.peek() == Some(&'|') => {
                cur.push('|');
                chars.next();
            }
            '|' => {
                cells.push(cur.trim().to_string());
                cur.clear();
                ends_with_pipe = true;
            }
            _ => cur.push(ch),
        }
    }
    if !ends_with_pipe {
        cells.push(cur.trim().to_string());
    }

    if line.starts_with('|') && !cells.is_empty() {
        cells.remove(0);
    }
    cells
}
