use std::fmt;

use serde::{Serialize, Serializer};

/// IP protocol field value; the join key between the two logs.
pub type ProtocolNumber = u8;

/// Which log a record (or an error) came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSide {
    Sender,
    Receiver,
}

impl fmt::Display for LogSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogSide::Sender => write!(f, "sender"),
            LogSide::Receiver => write!(f, "receiver"),
        }
    }
}

/// Column layout of one normalized log.
///
/// `extra_columns` are every column other than the key, the timestamp and
/// (receiver only) the source address, in source order. Record `columns`
/// vectors are aligned with it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLayout {
    pub side: LogSide,
    /// Set when the log carries the source-address column.
    pub source_column: Option<String>,
    /// How many of `extra_columns` precede the source column in the header.
    pub source_position: usize,
    pub extra_columns: Vec<String>,
}

impl LogLayout {
    /// Layout of a log with no columns at all.
    pub fn empty(side: LogSide) -> Self {
        Self {
            side,
            source_column: None,
            source_position: 0,
            extra_columns: Vec::new(),
        }
    }
}

/// One attempted transmission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeAttempt {
    pub protocol_number: ProtocolNumber,
    pub send_time_micros: Option<u64>,
    pub columns: Vec<Option<String>>,
}

/// One captured packet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeCapture {
    pub protocol_number: ProtocolNumber,
    pub recv_time_micros: Option<u64>,
    pub source_address: Option<String>,
    pub columns: Vec<Option<String>>,
}

/// A normalized log: layout plus typed records in source order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedLog<T> {
    pub layout: LogLayout,
    pub records: Vec<T>,
}

/// Receive time minus send time, when it can be trusted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum TransitTime {
    /// Strictly positive duration.
    Micros(u64),
    /// A timestamp was missing, or receive did not come after send.
    Unknown,
}

impl TransitTime {
    pub fn micros(&self) -> Option<u64> {
        match self {
            TransitTime::Micros(v) => Some(*v),
            TransitTime::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, TransitTime::Micros(_))
    }
}

impl fmt::Display for TransitTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitTime::Micros(v) => write!(f, "{v}"),
            TransitTime::Unknown => write!(f, "unknown"),
        }
    }
}

impl Serialize for TransitTime {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            TransitTime::Micros(v) => s.serialize_u64(*v),
            TransitTime::Unknown => s.serialize_str("unknown"),
        }
    }
}

/// One line of the reconciled report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReconciledRow {
    pub protocol_number: ProtocolNumber,
    pub received: bool,
    pub source_address: Option<String>,
    /// Aligned with the receiver layout's `extra_columns`.
    pub receiver_columns: Vec<Option<String>>,
    /// Aligned with the sender layout's `extra_columns`.
    pub sender_columns: Vec<Option<String>>,
    pub transit_time: TransitTime,
}
