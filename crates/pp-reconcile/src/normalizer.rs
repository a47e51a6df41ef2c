//! Raw log → typed probe records.
//!
//! Protocol numbers become `u8`, timestamps `Option<u64>`. A recognized
//! marker collapses to its configured effect; any other value that is not a
//! non-negative integer is a [`ReconcileError::Malformed`]. Nothing is
//! skipped: a log either normalizes completely or not at all.
//!
//! It does **not** join, classify, or sort.

use std::str::FromStr;

use pp_logs::{RawLog, RawRecord, RawValue};

use crate::error::ReconcileError;
use crate::options::{ColumnNames, MarkerEffect, MarkerPolicy};
use crate::types::{
    LogLayout, LogSide, NormalizedLog, ProbeAttempt, ProbeCapture, ProtocolNumber,
};

// ---------------------------------------------------------------------------
// Cell coercion
// ---------------------------------------------------------------------------

/// Parse trimmed plain decimal digits. Signs, fractions and exponents fail.
fn parse_digits<T: FromStr>(s: &str) -> Option<T> {
    let t = s.trim();
    if t.is_empty() || !t.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    t.parse().ok()
}

/// Coerce a key cell. Keys are required: markers and absent values fail.
pub fn coerce_protocol_number(raw: &RawValue) -> Option<ProtocolNumber> {
    match raw {
        RawValue::Text(s) => parse_digits(s),
        RawValue::Int(v) => ProtocolNumber::try_from(*v).ok(),
        RawValue::Absent => None,
    }
}

/// A cell that is neither a non-negative integer nor a recognized marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MalformedCell;

/// Coerce a timestamp cell. `Ok(None)` is an absent time.
pub fn coerce_micros(
    raw: &RawValue,
    markers: &MarkerPolicy,
) -> Result<Option<u64>, MalformedCell> {
    match raw {
        RawValue::Absent => Ok(None),
        RawValue::Int(v) => u64::try_from(*v).map(Some).map_err(|_| MalformedCell),
        RawValue::Text(s) => match markers.lookup(s) {
            Some(MarkerEffect::Absent) => Ok(None),
            Some(MarkerEffect::Zero) => Ok(Some(0)),
            None => parse_digits::<u64>(s).map(Some).ok_or(MalformedCell),
        },
    }
}

/// Coerce a pass-through cell: markers and absent values become `None`.
pub fn coerce_text(raw: &RawValue, markers: &MarkerPolicy) -> Option<String> {
    match raw {
        RawValue::Absent => None,
        RawValue::Int(v) => Some(v.to_string()),
        RawValue::Text(s) if markers.is_marker(s) => None,
        RawValue::Text(s) => Some(s.trim().to_string()),
    }
}

fn raw_display(raw: &RawValue) -> String {
    match raw {
        RawValue::Text(s) => s.clone(),
        RawValue::Int(v) => v.to_string(),
        RawValue::Absent => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Log normalization
// ---------------------------------------------------------------------------

struct SideColumns<'a> {
    side: LogSide,
    key: &'a str,
    time: &'a str,
    source: Option<&'a str>,
}

struct Normalized {
    protocol_number: ProtocolNumber,
    time: Option<u64>,
    source: Option<String>,
    columns: Vec<Option<String>>,
}

fn layout_for(log: &RawLog, cols: &SideColumns<'_>) -> Result<LogLayout, ReconcileError> {
    if log.columns.is_empty() && log.is_empty() {
        return Ok(LogLayout::empty(cols.side));
    }
    if !log.is_empty() {
        for required in [cols.key, cols.time] {
            if !log.has_column(required) {
                return Err(ReconcileError::MissingColumn {
                    side: cols.side,
                    column: required.to_string(),
                });
            }
        }
    }

    let source_column = cols
        .source
        .filter(|s| log.has_column(s))
        .map(str::to_string);

    let extra_columns = log
        .columns
        .iter()
        .filter(|c| {
            c.as_str() != cols.key
                && c.as_str() != cols.time
                && Some(c.as_str()) != source_column.as_deref()
        })
        .cloned()
        .collect();

    let source_position = match source_column.as_deref() {
        Some(src) => log
            .columns
            .iter()
            .take_while(|c| c.as_str() != src)
            .filter(|c| c.as_str() != cols.key && c.as_str() != cols.time)
            .count(),
        None => 0,
    };

    Ok(LogLayout {
        side: cols.side,
        source_column,
        source_position,
        extra_columns,
    })
}

fn normalize_record(
    rec: &RawRecord,
    layout: &LogLayout,
    cols: &SideColumns<'_>,
    markers: &MarkerPolicy,
) -> Result<Normalized, ReconcileError> {
    let key_raw = rec.get(cols.key);
    let protocol_number =
        coerce_protocol_number(key_raw).ok_or_else(|| ReconcileError::Malformed {
            side: cols.side,
            row: rec.row,
            protocol_number: None,
            field: cols.key.to_string(),
            raw: raw_display(key_raw),
        })?;

    let time_raw = rec.get(cols.time);
    let time = coerce_micros(time_raw, markers).map_err(|_| ReconcileError::Malformed {
        side: cols.side,
        row: rec.row,
        protocol_number: Some(protocol_number),
        field: cols.time.to_string(),
        raw: raw_display(time_raw),
    })?;

    let source = layout
        .source_column
        .as_deref()
        .and_then(|c| coerce_text(rec.get(c), markers));

    let columns = layout
        .extra_columns
        .iter()
        .map(|c| coerce_text(rec.get(c), markers))
        .collect();

    Ok(Normalized {
        protocol_number,
        time,
        source,
        columns,
    })
}

fn normalize_side(
    log: &RawLog,
    cols: &SideColumns<'_>,
    markers: &MarkerPolicy,
) -> Result<(LogLayout, Vec<Normalized>), ReconcileError> {
    let layout = layout_for(log, cols)?;
    let records = log
        .records
        .iter()
        .map(|rec| normalize_record(rec, &layout, cols, markers))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((layout, records))
}

/// Normalize a sender log into [`ProbeAttempt`]s.
pub fn normalize_attempts(
    log: &RawLog,
    columns: &ColumnNames,
    markers: &MarkerPolicy,
) -> Result<NormalizedLog<ProbeAttempt>, ReconcileError> {
    let cols = SideColumns {
        side: LogSide::Sender,
        key: &columns.key,
        time: &columns.send_time,
        source: None,
    };
    let (layout, recs) = normalize_side(log, &cols, markers)?;
    Ok(NormalizedLog {
        layout,
        records: recs
            .into_iter()
            .map(|n| ProbeAttempt {
                protocol_number: n.protocol_number,
                send_time_micros: n.time,
                columns: n.columns,
            })
            .collect(),
    })
}

/// Normalize a receiver log into [`ProbeCapture`]s.
pub fn normalize_captures(
    log: &RawLog,
    columns: &ColumnNames,
    markers: &MarkerPolicy,
) -> Result<NormalizedLog<ProbeCapture>, ReconcileError> {
    let cols = SideColumns {
        side: LogSide::Receiver,
        key: &columns.key,
        time: &columns.recv_time,
        source: Some(&columns.source_address),
    };
    let (layout, recs) = normalize_side(log, &cols, markers)?;
    Ok(NormalizedLog {
        layout,
        records: recs
            .into_iter()
            .map(|n| ProbeCapture {
                protocol_number: n.protocol_number,
                recv_time_micros: n.time,
                source_address: n.source,
                columns: n.columns,
            })
            .collect(),
    })
}
