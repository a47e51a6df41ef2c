//! Engine options: column names, absent-value markers, rendering glyphs.
//!
//! Every field has a default matching the probe tools' log format, so an
//! empty config document deserializes to a working [`EngineConfig`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Names of the columns the engine reads and writes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnNames {
    /// Join key present in both logs.
    pub key: String,
    /// Sender timestamp column (dropped from the report).
    pub send_time: String,
    /// Receiver timestamp column (dropped from the report).
    pub recv_time: String,
    /// Receiver column holding the captured packet's source address.
    pub source_address: String,
    /// Derived: received / unreceived.
    pub received: String,
    /// Derived: receive time minus send time.
    pub transit_time: String,
    /// Appended to a receiver column whose name also appears in the sender log.
    pub receiver_suffix: String,
    /// Appended to a sender column whose name also appears in the receiver log.
    pub sender_suffix: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            key: "Protocol Number".to_string(),
            send_time: "Time (μs) (Client)".to_string(),
            recv_time: "Time (μs) (Server)".to_string(),
            source_address: "Source IP (Server)".to_string(),
            received: "Received (Server)".to_string(),
            transit_time: "Time difference (μs)".to_string(),
            receiver_suffix: "_recv".to_string(),
            sender_suffix: "_send".to_string(),
        }
    }
}

/// What a recognized marker cell means for a timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerEffect {
    /// No value.
    Absent,
    /// Read as `0`. Reproduces the legacy fill-with-zero merge; a zero send
    /// time then yields the full receive time as transit.
    Zero,
}

/// Cell values that stand for "no value" in a log. Both the configured
/// markers and the cells they are matched against are trimmed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, MarkerEffect>",
    into = "BTreeMap<String, MarkerEffect>"
)]
pub struct MarkerPolicy {
    markers: BTreeMap<String, MarkerEffect>,
}

impl MarkerPolicy {
    pub fn with(mut self, marker: impl Into<String>, effect: MarkerEffect) -> Self {
        let marker = marker.into();
        self.markers.insert(marker.trim().to_string(), effect);
        self
    }

    pub fn lookup(&self, cell: &str) -> Option<MarkerEffect> {
        self.markers.get(cell.trim()).copied()
    }

    pub fn is_marker(&self, cell: &str) -> bool {
        self.lookup(cell).is_some()
    }
}

impl Default for MarkerPolicy {
    fn default() -> Self {
        let markers = ["-", "", "nan", "NaN"]
            .into_iter()
            .map(|m| (m.to_string(), MarkerEffect::Absent))
            .collect();
        Self { markers }
    }
}

impl From<BTreeMap<String, MarkerEffect>> for MarkerPolicy {
    fn from(raw: BTreeMap<String, MarkerEffect>) -> Self {
        let markers = raw
            .into_iter()
            .map(|(m, effect)| (m.trim().to_string(), effect))
            .collect();
        Self { markers }
    }
}

impl From<MarkerPolicy> for BTreeMap<String, MarkerEffect> {
    fn from(policy: MarkerPolicy) -> Self {
        policy.markers
    }
}

/// Text used when projecting a report to table cells.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderOptions {
    pub received: String,
    pub unreceived: String,
    /// Written for absent cells and unknown transit times.
    pub absent: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            received: "🫡".to_string(),
            unreceived: "🤯".to_string(),
            absent: "-".to_string(),
        }
    }
}

/// Everything a reconcile run is parameterized by.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub columns: ColumnNames,
    pub markers: MarkerPolicy,
    pub render: RenderOptions,
}
