//! Report assembly: output column set, ordering, and projection to cells.

use std::collections::BTreeSet;

use pp_table::Table;
use serde_json::{json, Value};

use crate::options::{ColumnNames, RenderOptions};
use crate::types::{LogLayout, ProtocolNumber, ReconciledRow, TransitTime};

/// The reconciled report: output columns plus rows ascending by protocol
/// number.
///
/// Column order: key, receiver columns in receiver header order (source
/// address included), received, sender columns in sender header order,
/// transit time. Neither raw timestamp column is carried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub columns: Vec<String>,
    pub rows: Vec<ReconciledRow>,
    /// Index of the source address among the receiver cells, when present.
    receiver_source_at: Option<usize>,
}

impl Report {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn protocol_numbers(&self) -> Vec<ProtocolNumber> {
        self.rows.iter().map(|r| r.protocol_number).collect()
    }

    pub fn row(&self, protocol_number: ProtocolNumber) -> Option<&ReconciledRow> {
        self.rows
            .binary_search_by_key(&protocol_number, |r| r.protocol_number)
            .ok()
            .map(|i| &self.rows[i])
    }

    /// Receiver-side values of `row`, in output column order.
    fn receiver_cells<'r>(&self, row: &'r ReconciledRow) -> Vec<&'r Option<String>> {
        let mut cells: Vec<&Option<String>> = row.receiver_columns.iter().collect();
        if let Some(at) = self.receiver_source_at {
            cells.insert(at.min(cells.len()), &row.source_address);
        }
        cells
    }

    /// Project one row to text cells aligned with `columns`.
    pub fn cells(&self, row: &ReconciledRow, render: &RenderOptions) -> Vec<String> {
        let opt = |v: &Option<String>| v.clone().unwrap_or_else(|| render.absent.clone());

        let mut out = Vec::with_capacity(self.columns.len());
        out.push(row.protocol_number.to_string());
        out.extend(self.receiver_cells(row).into_iter().map(opt));
        out.push(if row.received {
            render.received.clone()
        } else {
            render.unreceived.clone()
        });
        out.extend(row.sender_columns.iter().map(opt));
        out.push(match row.transit_time {
            TransitTime::Micros(v) => v.to_string(),
            TransitTime::Unknown => render.absent.clone(),
        });
        out
    }

    pub fn to_table(&self, render: &RenderOptions) -> Table {
        Table {
            headers: self.columns.clone(),
            rows: self.rows.iter().map(|r| self.cells(r, render)).collect(),
        }
    }

    /// `{"columns": [...], "rows": [[...], ...]}` with typed cells: numbers
    /// for protocol and transit, `"unknown"` for unknown transit, booleans for
    /// received, `null` for absent.
    pub fn to_json(&self) -> Value {
        let opt = |v: &Option<String>| match v {
            Some(s) => Value::String(s.clone()),
            None => Value::Null,
        };
        let rows: Vec<Value> = self
            .rows
            .iter()
            .map(|row| {
                let mut cells = vec![json!(row.protocol_number)];
                cells.extend(self.receiver_cells(row).into_iter().map(opt));
                cells.push(Value::Bool(row.received));
                cells.extend(row.sender_columns.iter().map(opt));
                cells.push(json!(row.transit_time));
                Value::Array(cells)
            })
            .collect();
        json!({ "columns": self.columns, "rows": rows })
    }
}

/// Receiver column names in header order, source address included.
fn receiver_names(receiver: &LogLayout) -> Vec<&str> {
    let mut names: Vec<&str> = receiver.extra_columns.iter().map(String::as_str).collect();
    if let Some(src) = receiver.source_column.as_deref() {
        names.insert(receiver.source_position.min(names.len()), src);
    }
    names
}

/// Output column names for the given layouts.
///
/// A non-key column present on both sides, or one that collides with a
/// derived column, gets its side's suffix. If the suffixed name is itself
/// taken, a counter is appended (`Note_send2`, `Note_send3`, ...) so every
/// output name is unique.
pub fn output_columns(
    receiver: &LogLayout,
    sender: &LogLayout,
    names: &ColumnNames,
) -> Vec<String> {
    let receiver_names = receiver_names(receiver);
    let sender_names: Vec<&str> = sender.extra_columns.iter().map(String::as_str).collect();

    let reserved = [
        names.key.as_str(),
        names.received.as_str(),
        names.transit_time.as_str(),
    ];
    let mut taken: BTreeSet<String> = receiver_names
        .iter()
        .chain(sender_names.iter())
        .chain(reserved.iter())
        .map(|n| n.to_string())
        .collect();

    let mut rename = |name: &str, other: &[&str], suffix: &str| {
        if !other.iter().chain(reserved.iter()).any(|o| *o == name) {
            return name.to_string();
        }
        let mut candidate = format!("{name}{suffix}");
        let mut n = 2;
        while taken.contains(&candidate) {
            candidate = format!("{name}{suffix}{n}");
            n += 1;
        }
        taken.insert(candidate.clone());
        candidate
    };

    let mut out = Vec::with_capacity(receiver_names.len() + sender_names.len() + 3);
    out.push(names.key.clone());
    for &n in &receiver_names {
        out.push(rename(n, &sender_names, &names.receiver_suffix));
    }
    out.push(names.received.clone());
    for &n in &sender_names {
        out.push(rename(n, &receiver_names, &names.sender_suffix));
    }
    out.push(names.transit_time.clone());
    out
}

/// Order rows by protocol number and attach the output column set.
pub fn assemble(
    receiver: &LogLayout,
    sender: &LogLayout,
    names: &ColumnNames,
    mut rows: Vec<ReconciledRow>,
) -> Report {
    rows.sort_by_key(|r| r.protocol_number);
    Report {
        columns: output_columns(receiver, sender, names),
        rows,
        receiver_source_at: receiver
            .source_column
            .as_ref()
            .map(|_| receiver.source_position.min(receiver.extra_columns.len())),
    }
}
