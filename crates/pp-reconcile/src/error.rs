use std::fmt;

use crate::types::{LogSide, ProtocolNumber};

/// Why a reconcile run was aborted. No report is produced alongside any of
/// these.
///
/// A receive time at or before the send time is deliberately absent from
/// this list: it yields an unknown transit time, not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReconcileError {
    /// A key or timestamp cell was neither a number nor a recognized marker.
    Malformed {
        side: LogSide,
        /// 1-based record position within its log.
        row: usize,
        /// `None` when the key cell itself is the malformed one.
        protocol_number: Option<ProtocolNumber>,
        field: String,
        raw: String,
    },
    /// The same protocol number appears twice in one log.
    DuplicateKey {
        side: LogSide,
        protocol_number: ProtocolNumber,
    },
    /// A non-empty log lacks its key or timestamp column.
    MissingColumn { side: LogSide, column: String },
}

impl ReconcileError {
    pub fn side(&self) -> LogSide {
        match self {
            ReconcileError::Malformed { side, .. }
            | ReconcileError::DuplicateKey { side, .. }
            | ReconcileError::MissingColumn { side, .. } => *side,
        }
    }

    pub fn protocol_number(&self) -> Option<ProtocolNumber> {
        match self {
            ReconcileError::Malformed {
                protocol_number, ..
            } => *protocol_number,
            ReconcileError::DuplicateKey {
                protocol_number, ..
            } => Some(*protocol_number),
            ReconcileError::MissingColumn { .. } => None,
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            ReconcileError::Malformed { field, .. } => Some(field),
            ReconcileError::MissingColumn { column, .. } => Some(column),
            ReconcileError::DuplicateKey { .. } => None,
        }
    }
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileError::Malformed {
                side,
                row,
                protocol_number: Some(pn),
                field,
                raw,
            } => write!(
                f,
                "malformed {side} record {row} (protocol {pn}): field '{field}' = '{raw}'"
            ),
            ReconcileError::Malformed {
                side,
                row,
                protocol_number: None,
                field,
                raw,
            } => write!(
                f,
                "malformed {side} record {row}: field '{field}' = '{raw}'"
            ),
            ReconcileError::DuplicateKey {
                side,
                protocol_number,
            } => write!(
                f,
                "duplicate protocol number {protocol_number} in {side} log"
            ),
            ReconcileError::MissingColumn { side, column } => {
                write!(f, "{side} log has no '{column}' column")
            }
        }
    }
}

impl std::error::Error for ReconcileError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_malformed_with_key() {
        let e = ReconcileError::Malformed {
            side: LogSide::Sender,
            row: 3,
            protocol_number: Some(6),
            field: "Time (μs) (Client)".to_string(),
            raw: "soon".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "malformed sender record 3 (protocol 6): field 'Time (μs) (Client)' = 'soon'"
        );
        assert_eq!(e.protocol_number(), Some(6));
        assert_eq!(e.field(), Some("Time (μs) (Client)"));
    }

    #[test]
    fn display_duplicate() {
        let e = ReconcileError::DuplicateKey {
            side: LogSide::Receiver,
            protocol_number: 17,
        };
        assert_eq!(e.to_string(), "duplicate protocol number 17 in receiver log");
        assert_eq!(e.side(), LogSide::Receiver);
        assert_eq!(e.field(), None);
    }

    #[test]
    fn display_missing_column() {
        let e = ReconcileError::MissingColumn {
            side: LogSide::Sender,
            column: "Protocol Number".to_string(),
        };
        assert_eq!(e.to_string(), "sender log has no 'Protocol Number' column");
        assert_eq!(e.protocol_number(), None);
    }
}
