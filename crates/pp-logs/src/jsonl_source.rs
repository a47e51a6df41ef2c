//! JSON-lines log source.
//!
//! One JSON object per line, e.g.
//!
//! ```text
//! {"Protocol Number": 6, "Time (μs) (Client)": 100}
//! {"Protocol Number": 17, "Time (μs) (Client)": null}
//! ```
//!
//! Integers become [`RawValue::Int`], strings [`RawValue::Text`], `null`
//! [`RawValue::Absent`]. Anything else (floats, bools, nested values) is a
//! decode error. Column order is first-seen order; within one object keys
//! come back sorted.

use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::source::{LogSource, RawLog, RawRecord, RawValue, SourceError};

#[derive(Debug, Clone)]
enum Origin {
    File(PathBuf),
    Text(String),
}

/// A [`LogSource`] over JSON-lines text.
#[derive(Debug, Clone)]
pub struct JsonLinesLogSource {
    origin: Origin,
}

impl JsonLinesLogSource {
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

impl LogSource for JsonLinesLogSource {
    fn name(&self) -> &'static str {
        "jsonl"
    }

    fn drain(&mut self) -> Result<RawLog, SourceError> {
        let log = match &self.origin {
            Origin::File(p) => {
                let mut buf = String::new();
                std::fs::File::open(p)
                    .and_then(|mut f| f.read_to_string(&mut buf))
                    .map_err(|e| SourceError::Io(format!("read '{}': {e}", p.display())))?;
                parse_json_lines(&buf)?
            }
            Origin::Text(s) => parse_json_lines(s)?,
        };
        debug!(
            columns = log.columns.len(),
            records = log.records.len(),
            "drained jsonl log"
        );
        Ok(log)
    }
}

/// Parse JSON-lines text into a raw log. Blank lines are skipped.
pub fn parse_json_lines(src: &str) -> Result<RawLog, SourceError> {
    let mut log = RawLog::default();

    for (i, line) in src.lines().enumerate() {
        let line_no = i + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let v: Value = serde_json::from_str(line).map_err(|e| SourceError::Decode {
            line: line_no,
            message: e.to_string(),
        })?;
        let obj = match v {
            Value::Object(m) => m,
            other => {
                return Err(SourceError::Decode {
                    line: line_no,
                    message: format!("expected a JSON object, got {}", kind(&other)),
                })
            }
        };

        let mut rec = RawRecord::new(log.records.len() + 1);
        for (col, val) in obj {
            let raw = to_raw(&col, val, line_no)?;
            if !log.has_column(&col) {
                log.columns.push(col.clone());
            }
            rec.values.insert(col, raw);
        }
        log.records.push(rec);
    }

    Ok(log)
}

fn to_raw(col: &str, v: Value, line: usize) -> Result<RawValue, SourceError> {
    match v {
        Value::Null => Ok(RawValue::Absent),
        Value::String(s) => Ok(RawValue::Text(s)),
        Value::Number(n) => n.as_i64().map(RawValue::Int).ok_or_else(|| SourceError::Decode {
            line,
            message: format!("field '{col}': number {n} is not an i64 integer"),
        }),
        other => Err(SourceError::Decode {
            line,
            message: format!("field '{col}': unsupported {} value", kind(&other)),
        }),
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
