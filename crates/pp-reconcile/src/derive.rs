use crate::join::JoinedPair;
use crate::types::{ProtocolNumber, ReconciledRow, TransitTime};

/// Transit time from the two timestamps.
///
/// Unknown unless both are present and `recv > send`. A receive at or
/// before the send points at clock skew, so no duration is reported.
pub fn transit_time(send: Option<u64>, recv: Option<u64>) -> TransitTime {
    match (send, recv) {
        (Some(s), Some(r)) if r > s => TransitTime::Micros(r - s),
        _ => TransitTime::Unknown,
    }
}

/// Build the report row for one joined pair.
///
/// `sender_width` / `receiver_width` are the extra-column counts of each
/// layout; a missing side contributes that many absent cells.
pub fn derive_row(
    protocol_number: ProtocolNumber,
    pair: &JoinedPair<'_>,
    sender_width: usize,
    receiver_width: usize,
) -> ReconciledRow {
    let send = pair.attempt.and_then(|a| a.send_time_micros);
    let recv = pair.capture.and_then(|c| c.recv_time_micros);

    ReconciledRow {
        protocol_number,
        received: pair.capture.is_some(),
        source_address: pair.capture.and_then(|c| c.source_address.clone()),
        receiver_columns: pair
            .capture
            .map(|c| c.columns.clone())
            .unwrap_or_else(|| vec![None; receiver_width]),
        sender_columns: pair
            .attempt
            .map(|a| a.columns.clone())
            .unwrap_or_else(|| vec![None; sender_width]),
        transit_time: transit_time(send, recv),
    }
}
