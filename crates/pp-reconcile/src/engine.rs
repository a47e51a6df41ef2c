use pp_logs::RawLog;
use tracing::debug;

use crate::assemble::{assemble, Report};
use crate::derive::derive_row;
use crate::error::ReconcileError;
use crate::join::outer_join;
use crate::normalizer::{normalize_attempts, normalize_captures};
use crate::options::{ColumnNames, EngineConfig};
use crate::types::{NormalizedLog, ProbeAttempt, ProbeCapture};

/// Reconcile a drained sender log against a drained receiver log.
///
/// Normalize → join → derive → assemble. Any error aborts before a report
/// exists; there is no partial result.
pub fn reconcile(
    sender: &RawLog,
    receiver: &RawLog,
    config: &EngineConfig,
) -> Result<Report, ReconcileError> {
    let attempts = normalize_attempts(sender, &config.columns, &config.markers)?;
    let captures = normalize_captures(receiver, &config.columns, &config.markers)?;
    reconcile_normalized(&attempts, &captures, &config.columns)
}

/// Reconcile already-typed records.
pub fn reconcile_normalized(
    attempts: &NormalizedLog<ProbeAttempt>,
    captures: &NormalizedLog<ProbeCapture>,
    columns: &ColumnNames,
) -> Result<Report, ReconcileError> {
    let joined = outer_join(&attempts.records, &captures.records)?;

    let sender_width = attempts.layout.extra_columns.len();
    let receiver_width = captures.layout.extra_columns.len();
    let rows = joined
        .iter()
        .map(|(pn, pair)| derive_row(*pn, pair, sender_width, receiver_width))
        .collect();

    let report = assemble(&captures.layout, &attempts.layout, columns, rows);

    debug!(
        attempts = attempts.records.len(),
        captures = captures.records.len(),
        rows = report.len(),
        received = report.rows.iter().filter(|r| r.received).count(),
        "reconciled probe logs"
    );

    Ok(report)
}
