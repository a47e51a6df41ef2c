//! pp-config
//!
//! Layered YAML configuration for the reconciler:
//! - later documents deep-merge over earlier ones
//! - the merged tree is hashed over its canonical JSON form
//! - leaves nothing reads are reported (warn) or rejected (fail)
//! - the typed [`EngineConfig`] is extracted with defaults for every field

use anyhow::{bail, Context, Result};
use pp_reconcile::EngineConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// JSON-pointer prefixes read by [`engine_config`]. A leaf under any of them
/// is consumed; every other leaf is unused.
pub const CONSUMED_PREFIXES: &[&str] = &["/columns", "/markers", "/render"];

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

impl LoadedConfig {
    /// No layers at all: an empty object, hashed like any other config.
    pub fn empty() -> Result<Self> {
        load_layered_yaml_from_strings(&[])
    }
}

pub fn load_layered_yaml<P: AsRef<Path>>(paths: &[P]) -> Result<LoadedConfig> {
    let mut docs: Vec<String> = Vec::new();
    for p in paths {
        let p = p.as_ref();
        let raw = fs::read_to_string(p)
            .with_context(|| format!("failed to read yaml path: {}", p.display()))?;
        docs.push(raw);
    }

    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    // Earlier docs are base, later docs override.
    let mut merged = Value::Object(Map::new());
    for (i, raw) in yaml_docs.iter().enumerate() {
        let v_yaml: serde_yaml::Value =
            serde_yaml::from_str(raw).with_context(|| format!("invalid yaml in layer {i}"))?;
        if v_yaml.is_null() {
            // Empty file.
            continue;
        }
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        merged = deep_merge(merged, v_json);
    }

    let canonical_json = canonicalize_json(&merged)?;
    let config_hash = sha256_hex(canonical_json.as_bytes());
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
    })
}

fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

/// Compact JSON with object keys sorted at every level.
fn canonicalize_json(v: &Value) -> Result<String> {
    serde_json::to_string(&sort_keys(v)).context("canonical json serialize failed")
}

fn sort_keys(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut out = Map::new();
            for k in keys {
                out.insert(k.clone(), sort_keys(&map[k]));
            }
            Value::Object(out)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

// ---------------------------------------------------------------------------
// Typed view
// ---------------------------------------------------------------------------

/// Extract the engine options. Absent sections and fields take defaults;
/// a misspelled field inside a known section is an error.
pub fn engine_config(loaded: &LoadedConfig) -> Result<EngineConfig> {
    serde_json::from_value(loaded.config_json.clone()).with_context(|| {
        format!(
            "invalid engine config (config_hash={})",
            loaded.config_hash
        )
    })
}

// ---------------------------------------------------------------------------
// Unused-key guard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusedKeyPolicy {
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnusedKeyReport {
    /// Consumed JSON-pointer prefixes used for this analysis (sorted, unique)
    pub consumed_prefixes: Vec<String>,
    /// Unused leaf pointers (sorted)
    pub unused_leaf_pointers: Vec<String>,
}

impl UnusedKeyReport {
    pub fn is_clean(&self) -> bool {
        self.unused_leaf_pointers.is_empty()
    }
}

/// Report config leaves that nothing reads.
/// `Fail` turns a non-clean report into an error; `Warn` always returns it.
pub fn report_unused_keys(config_json: &Value, policy: UnusedKeyPolicy) -> Result<UnusedKeyReport> {
    let consumed: BTreeSet<String> = CONSUMED_PREFIXES
        .iter()
        .map(|p| normalize_pointer(p))
        .collect();
    let consumed_prefixes: Vec<String> = consumed.into_iter().collect();

    let mut leaves: Vec<String> = Vec::new();
    collect_leaf_pointers(config_json, "", &mut leaves);

    let mut unused: Vec<String> = leaves
        .into_iter()
        .filter(|lp| !consumed_prefixes.iter().any(|cp| is_prefix_pointer(cp, lp)))
        .collect();
    unused.sort();
    unused.dedup();

    let report = UnusedKeyReport {
        consumed_prefixes,
        unused_leaf_pointers: unused,
    };

    if policy == UnusedKeyPolicy::Fail && !report.is_clean() {
        bail!(
            "CONFIG_UNUSED_KEYS: {} unused config leaf key(s) detected. First few: {}",
            report.unused_leaf_pointers.len(),
            preview_list(&report.unused_leaf_pointers, 12)
        );
    }

    Ok(report)
}

/// Leading "/", no trailing "/" unless the pointer is just "/".
fn normalize_pointer(p: &str) -> String {
    let mut s = p.trim().to_string();
    if s.is_empty() {
        return "/".to_string();
    }
    if !s.starts_with('/') {
        s.insert(0, '/');
    }
    while s.ends_with('/') && s.len() > 1 {
        s.pop();
    }
    s
}

/// "/a/b" covers "/a/b" and "/a/b/c" but not "/a/bc". "/" covers everything.
fn is_prefix_pointer(prefix: &str, leaf: &str) -> bool {
    if prefix == "/" || leaf == prefix {
        return true;
    }
    leaf.strip_prefix(prefix)
        .map(|rest| rest.starts_with('/'))
        .unwrap_or(false)
}

fn collect_leaf_pointers(v: &Value, prefix: &str, out: &mut Vec<String>) {
    match v {
        Value::Object(map) => {
            for (k, vv) in map {
                let next = format!("{}/{}", prefix, escape_pointer_token(k));
                collect_leaf_pointers(vv, &next, out);
            }
        }
        Value::Array(arr) => {
            for (i, vv) in arr.iter().enumerate() {
                let next = format!("{prefix}/{i}");
                collect_leaf_pointers(vv, &next, out);
            }
        }
        _ => {
            let p = if prefix.is_empty() {
                "/".to_string()
            } else {
                prefix.to_string()
            };
            out.push(p);
        }
    }
}

fn escape_pointer_token(s: &str) -> String {
    s.replace('~', "~0").replace('/', "~1")
}

fn preview_list(items: &[String], n: usize) -> String {
    let take = items.iter().take(n).collect::<Vec<_>>();
    format!("{take:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pp_reconcile::MarkerEffect;
    use serde_json::json;

    #[test]
    fn deep_merge_overrides_leaves_and_keeps_siblings() {
        let base = json!({"columns": {"key": "A", "send_time": "S"}, "x": 1});
        let over = json!({"columns": {"key": "B"}});
        assert_eq!(
            deep_merge(base, over),
            json!({"columns": {"key": "B", "send_time": "S"}, "x": 1})
        );
    }

    #[test]
    fn canonical_json_sorts_nested_keys() {
        let v = json!({"b": {"z": 1, "a": 2}, "a": [ {"d": 1, "c": 2} ]});
        assert_eq!(
            canonicalize_json(&v).unwrap(),
            r#"{"a":[{"c":2,"d":1}],"b":{"a":2,"z":1}}"#
        );
    }

    #[test]
    fn prefix_pointer_respects_token_boundary() {
        assert!(is_prefix_pointer("/columns", "/columns/key"));
        assert!(is_prefix_pointer("/columns", "/columns"));
        assert!(!is_prefix_pointer("/columns", "/columnsx/key"));
        assert!(is_prefix_pointer("/", "/anything"));
    }

    #[test]
    fn pointer_tokens_escape_slash_and_tilde() {
        let mut out = Vec::new();
        collect_leaf_pointers(&json!({"a/b": {"c~d": 1}}), "", &mut out);
        assert_eq!(out, vec!["/a~1b/c~0d"]);
    }

    #[test]
    fn empty_config_gives_defaults_and_is_clean() {
        let loaded = LoadedConfig::empty().unwrap();
        assert_eq!(loaded.canonical_json, "{}");
        assert_eq!(engine_config(&loaded).unwrap(), EngineConfig::default());
        assert!(report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Fail)
            .unwrap()
            .is_clean());
    }

    #[test]
    fn empty_yaml_layer_is_skipped() {
        let a = load_layered_yaml_from_strings(&["columns:\n  key: P\n", ""]).unwrap();
        let b = load_layered_yaml_from_strings(&["columns:\n  key: P\n"]).unwrap();
        assert_eq!(a.config_hash, b.config_hash);
    }

    #[test]
    fn engine_config_reads_overrides() {
        let loaded = load_layered_yaml_from_strings(&[r#"
columns:
  key: "Proto"
markers:
  "?": zero
render:
  received: "yes"
"#])
        .unwrap();
        let cfg = engine_config(&loaded).unwrap();
        assert_eq!(cfg.columns.key, "Proto");
        assert_eq!(cfg.columns.send_time, "Time (μs) (Client)");
        assert_eq!(cfg.markers.lookup("?"), Some(MarkerEffect::Zero));
        // A given marker map replaces the defaults.
        assert_eq!(cfg.markers.lookup("-"), None);
        assert_eq!(cfg.render.received, "yes");
        assert_eq!(cfg.render.unreceived, "🤯");
    }

    #[test]
    fn engine_config_rejects_misspelled_column_field() {
        let loaded = load_layered_yaml_from_strings(&["columns:\n  protocol: x\n"]).unwrap();
        let err = engine_config(&loaded).unwrap_err();
        assert!(format!("{err:#}").contains("invalid engine config"));
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let err = load_layered_yaml_from_strings(&["columns: [unclosed"]).unwrap_err();
        assert!(err.to_string().contains("invalid yaml in layer 0"));
    }
}
